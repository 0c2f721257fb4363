//! Textual IR dumps.
//!
//! Dumps are for debugging and for assertions in tests. A dangling id prints
//! as `<unknown fn#N>` instead of failing, so a dump can be taken of a
//! module that a failed pass left half rewritten.

use std::fmt::{self, Write};

use crate::{
    Call, Constant, ContainerId, Declaration, Expr, FunctionId, IrModule, Param, Stmt,
};

const INDENT: &str = "    ";

/// Display adapter for a container and everything declared in it.
pub struct ContainerDump<'m> {
    module: &'m IrModule,
    id: ContainerId,
}

/// Display adapter for a single function.
pub struct FunctionDump<'m> {
    module: &'m IrModule,
    id: FunctionId,
}

impl IrModule {
    pub fn dump_container(&self, id: ContainerId) -> ContainerDump<'_> {
        ContainerDump { module: self, id }
    }

    pub fn dump_function(&self, id: FunctionId) -> FunctionDump<'_> {
        FunctionDump { module: self, id }
    }
}

impl fmt::Display for ContainerDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Printer::new(self.module, f).container(self.id, 0)
    }
}

impl fmt::Display for FunctionDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Printer::new(self.module, f).function(self.id, 0)
    }
}

struct Printer<'m, 'f, W: Write> {
    module: &'m IrModule,
    out: &'f mut W,
}

impl<'m, 'f, W: Write> Printer<'m, 'f, W> {
    fn new(module: &'m IrModule, out: &'f mut W) -> Self {
        Self { module, out }
    }

    fn indent(&mut self, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            self.out.write_str(INDENT)?;
        }
        Ok(())
    }

    fn container(&mut self, id: ContainerId, depth: usize) -> fmt::Result {
        let Ok(container) = self.module.container(id) else {
            self.indent(depth)?;
            return writeln!(self.out, "<unknown {id}>");
        };
        self.indent(depth)?;
        writeln!(self.out, "class {} {{", container.name)?;
        for decl in &container.declarations {
            match decl {
                Declaration::Function(function) => self.function(*function, depth + 1)?,
                Declaration::Container(inner) => self.container(*inner, depth + 1)?,
                Declaration::Field(field) => {
                    self.indent(depth + 1)?;
                    write!(self.out, "field {}", field.name)?;
                    if let Some(init) = &field.initializer {
                        self.out.write_str(" = ")?;
                        self.expr(init)?;
                    }
                    self.out.write_char('\n')?;
                }
            }
        }
        self.indent(depth)?;
        writeln!(self.out, "}}")
    }

    fn function(&mut self, id: FunctionId, depth: usize) -> fmt::Result {
        let Ok(function) = self.module.function(id) else {
            self.indent(depth)?;
            return writeln!(self.out, "<unknown {id}>");
        };
        self.indent(depth)?;
        if function.is_static() {
            self.out.write_str("static ")?;
        }
        write!(self.out, "fun {}@{id}(", function.name)?;
        let mut first = true;
        let receivers = [
            ("this", &function.dispatch_receiver),
            ("receiver", &function.extension_receiver),
        ];
        for (role, param) in receivers {
            if let Some(param) = param {
                self.separator(&mut first)?;
                write!(self.out, "{role} ")?;
                self.param(param)?;
            }
        }
        for param in &function.params {
            self.separator(&mut first)?;
            self.param(param)?;
        }
        write!(self.out, ") [{}]", function.origin.as_str())?;

        match &function.body {
            None => self.out.write_char('\n'),
            Some(body) => {
                self.out.write_str(" {\n")?;
                self.stmts(&body.stmts, depth + 1)?;
                self.indent(depth)?;
                writeln!(self.out, "}}")
            }
        }
    }

    fn param(&mut self, param: &Param) -> fmt::Result {
        write!(self.out, "{}: {}", param.value, param.name)
    }

    fn separator(&mut self, first: &mut bool) -> fmt::Result {
        if !std::mem::take(first) {
            self.out.write_str(", ")?;
        }
        Ok(())
    }

    fn stmts(&mut self, stmts: &[Stmt], depth: usize) -> fmt::Result {
        for stmt in stmts {
            self.stmt(stmt, depth)?;
        }
        Ok(())
    }

    fn stmt(&mut self, stmt: &Stmt, depth: usize) -> fmt::Result {
        if let Stmt::LocalFunction(id) = stmt {
            return self.function(*id, depth);
        }
        self.indent(depth)?;
        match stmt {
            Stmt::Expr(expr) => self.expr(expr)?,
            Stmt::Let { value, name, init } => {
                write!(self.out, "let {value}: {name}")?;
                if let Some(init) = init {
                    self.out.write_str(" = ")?;
                    self.expr(init)?;
                }
            }
            Stmt::Return(ret) => {
                write!(self.out, "return@{} ", ret.target)?;
                self.expr(&ret.value)?;
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.out.write_str("if ")?;
                self.expr(cond)?;
                self.out.write_str(" {\n")?;
                self.stmts(then_branch, depth + 1)?;
                self.indent(depth)?;
                self.out.write_str("} else {\n")?;
                self.stmts(else_branch, depth + 1)?;
                self.indent(depth)?;
                self.out.write_char('}')?;
            }
            Stmt::While { cond, body } => {
                self.out.write_str("while ")?;
                self.expr(cond)?;
                self.out.write_str(" {\n")?;
                self.stmts(body, depth + 1)?;
                self.indent(depth)?;
                self.out.write_char('}')?;
            }
            Stmt::Block(stmts) => {
                self.out.write_str("{\n")?;
                self.stmts(stmts, depth + 1)?;
                self.indent(depth)?;
                self.out.write_char('}')?;
            }
            Stmt::LocalFunction(_) => unreachable!("local functions are printed above"),
        }
        self.out.write_char('\n')
    }

    fn expr(&mut self, expr: &Expr) -> fmt::Result {
        match expr {
            Expr::Const(constant) => self.constant(constant),
            Expr::Get(value) => write!(self.out, "{value}"),
            Expr::Set { target, value } => {
                write!(self.out, "{target} = ")?;
                self.expr(value)
            }
            Expr::Binary { op, lhs, rhs } => {
                self.out.write_char('(')?;
                self.expr(lhs)?;
                write!(self.out, " {} ", op.as_str())?;
                self.expr(rhs)?;
                self.out.write_char(')')
            }
            Expr::Call(call) => self.call(call),
            Expr::When {
                cond,
                then_branch,
                else_branch,
            } => {
                self.out.write_str("when ")?;
                self.expr(cond)?;
                self.out.write_str(" then ")?;
                self.expr(then_branch)?;
                self.out.write_str(" else ")?;
                self.expr(else_branch)
            }
        }
    }

    fn call(&mut self, call: &Call) -> fmt::Result {
        if let Some(receiver) = &call.dispatch_receiver {
            self.expr(receiver)?;
            self.out.write_char('.')?;
        }
        if let Some(receiver) = &call.extension_receiver {
            self.expr(receiver)?;
            self.out.write_str("->")?;
        }
        match self.module.function(call.callee) {
            Ok(callee) => write!(self.out, "{}@{}(", callee.name, call.callee)?,
            Err(_) => write!(self.out, "<unknown {}>(", call.callee)?,
        }
        let mut first = true;
        for arg in &call.args {
            self.separator(&mut first)?;
            self.expr(arg)?;
        }
        self.out.write_char(')')
    }

    fn constant(&mut self, constant: &Constant) -> fmt::Result {
        match constant {
            Constant::Null => self.out.write_str("null"),
            Constant::Bool(value) => write!(self.out, "{value}"),
            Constant::Int(value) => write!(self.out, "{value}"),
            Constant::Float(value) => write!(self.out, "{value}"),
            Constant::Str(value) => write!(self.out, "{value:?}"),
        }
    }
}
