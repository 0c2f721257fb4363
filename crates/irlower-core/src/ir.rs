//! Statement and expression nodes.
//!
//! The node set is closed: every pass matches exhaustively over [`Stmt`] and
//! [`Expr`], so adding a variant is a compile error in every pass that has
//! not been taught about it.

use ordered_float::OrderedFloat;

use crate::{FunctionId, Span, ValueId};

/// A function body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Body {
    pub stmts: Vec<Stmt>,
}

impl Body {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }
}

/// Literal constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    Null,
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Lt,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::Lt => "<",
        }
    }
}

/// A function call.
///
/// Receiver arguments are kept apart from ordinary arguments so that a pass can
/// tell an instance call (`obj.f(x)`) from a static call (`f(obj, x)`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub callee: FunctionId,
    pub dispatch_receiver: Option<Box<Expr>>,
    pub extension_receiver: Option<Box<Expr>>,
    pub args: Vec<Expr>,
    pub span: Span,
}

impl Call {
    pub fn new(callee: FunctionId) -> Self {
        Self {
            callee,
            dispatch_receiver: None,
            extension_receiver: None,
            args: Vec::new(),
            span: Span::SYNTHETIC,
        }
    }

    pub fn with_dispatch_receiver(mut self, receiver: Expr) -> Self {
        self.dispatch_receiver = Some(Box::new(receiver));
        self
    }

    pub fn with_extension_receiver(mut self, receiver: Expr) -> Self {
        self.extension_receiver = Some(Box::new(receiver));
        self
    }

    pub fn with_args(mut self, args: Vec<Expr>) -> Self {
        self.args = args;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Retarget this call at `callee`, turning receiver arguments into
    /// leading ordinary arguments: dispatch receiver, extension receiver,
    /// then the original arguments. The span is kept.
    pub fn promote_receivers(&mut self, callee: FunctionId) {
        let args = std::mem::take(&mut self.args);
        let mut promoted = Vec::with_capacity(args.len() + 2);
        promoted.extend(self.dispatch_receiver.take().map(|receiver| *receiver));
        promoted.extend(self.extension_receiver.take().map(|receiver| *receiver));
        promoted.extend(args);
        self.callee = callee;
        self.args = promoted;
    }
}

/// A return from the function named by `target`.
///
/// Returns name their target explicitly because they may appear inside
/// local functions nested in the body of another function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Return {
    pub target: FunctionId,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Const(Constant),
    /// Read a receiver, parameter or local.
    Get(ValueId),
    /// Write a local, yielding the written value.
    Set {
        target: ValueId,
        value: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call(Call),
    /// Conditional expression.
    When {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
}

impl Expr {
    pub fn int(value: i64) -> Self {
        Expr::Const(Constant::Int(value))
    }

    pub fn float(value: f64) -> Self {
        Expr::Const(Constant::Float(OrderedFloat(value)))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Const(Constant::Str(value.into()))
    }

    pub fn get(value: ValueId) -> Self {
        Expr::Get(value)
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn call(call: Call) -> Self {
        Expr::Call(call)
    }

    pub fn as_call(&self) -> Option<&Call> {
        match self {
            Expr::Call(call) => Some(call),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Expr(Expr),
    /// Declare a local, optionally initialized.
    Let {
        value: ValueId,
        name: String,
        init: Option<Expr>,
    },
    Return(Return),
    If {
        cond: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Vec<Stmt>,
    },
    While {
        cond: Expr,
        body: Vec<Stmt>,
    },
    Block(Vec<Stmt>),
    /// A function declared inside a body. The function itself lives in the arena.
    LocalFunction(FunctionId),
}

impl Stmt {
    pub fn ret(target: FunctionId, value: Expr) -> Self {
        Stmt::Return(Return {
            target,
            value,
            span: Span::SYNTHETIC,
        })
    }

    pub fn as_return(&self) -> Option<&Return> {
        match self {
            Stmt::Return(ret) => Some(ret),
            _ => None,
        }
    }
}
