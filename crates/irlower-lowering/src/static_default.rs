//! Static default-argument dispatcher lowering.
//!
//! Some targets cannot (or should not) dispatch default-argument adapters
//! through the receiver. For every dispatcher that still has a dispatch
//! receiver this pass substitutes a static stub whose leading parameters are
//! the receivers, then fixes up every reference in the visited container:
//!
//! ```text
//! class Greeter {                          class Greeter {
//!     fun f(this self, a) {                    static fun f(self, a) {
//!         return@f self.helper() + a   ==>         return@f' self.helper() + a
//!     }                                        }
//!     fun g(this self) {                       fun g(this self) {
//!         return@g self.f(2)                       return@g f'(self, 2)
//!     }                                        }
//! }                                        }
//! ```
//!
//! The traversal is pre-order: a node is rewritten first, then its children
//! are visited, so calls nested in the arguments of a rewritten call and
//! declarations nested in a relocated body are lowered by the same walk.

use irlower_core::{
    Call, ContainerId, Declaration, Expr, FunctionId, IrModule, LoweringError, Result, Return,
    Stmt, StubFactory,
};
use tracing::{debug, trace};

use crate::LoweringStats;
use crate::registry::StubRegistry;

/// One lowering invocation over one container.
///
/// The stub registry lives exactly as long as this value, so stubs are never
/// shared between containers.
pub struct StaticDefaultFunctionLowering<'a> {
    module: &'a mut IrModule,
    registry: StubRegistry<'a>,
    /// Container passed to [`lower`](Self::lower).
    root: Option<ContainerId>,
    stats: LoweringStats,
}

impl<'a> StaticDefaultFunctionLowering<'a> {
    pub fn new(module: &'a mut IrModule, factory: &'a dyn StubFactory) -> Self {
        Self {
            module,
            registry: StubRegistry::new(factory),
            root: None,
            stats: LoweringStats::default(),
        }
    }

    /// Lower `container` and everything nested in it.
    ///
    /// On error the container may be partly rewritten; the caller must treat
    /// the module as unusable.
    #[cfg_attr(feature = "profiling", profiling::function)]
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn lower(mut self, container: ContainerId) -> Result<LoweringStats> {
        self.root = Some(container);
        self.visit_container(container)?;
        self.stats.stubs_created = self.registry.len();
        debug!(stats = ?self.stats, "static default lowering finished");
        Ok(self.stats)
    }

    fn visit_container(&mut self, id: ContainerId) -> Result<()> {
        let mut declarations = std::mem::take(&mut self.module.container_mut(id)?.declarations);
        let result = declarations
            .iter_mut()
            .try_for_each(|decl| self.visit_declaration(decl));
        self.module.container_mut(id)?.declarations = declarations;
        result
    }

    fn visit_declaration(&mut self, decl: &mut Declaration) -> Result<()> {
        match decl {
            Declaration::Function(id) => *id = self.visit_function(*id)?,
            Declaration::Container(inner) => self.visit_container(*inner)?,
            Declaration::Field(field) => {
                if let Some(init) = &mut field.initializer {
                    self.visit_expr(init)?;
                }
            }
        }
        Ok(())
    }

    /// Visit a function declaration, returning the id that should stand in
    /// its place: the stub for an eligible dispatcher, otherwise `id` itself.
    fn visit_function(&mut self, id: FunctionId) -> Result<FunctionId> {
        let declared = if self.module.function(id)?.is_default_dispatcher_with_receiver() {
            let stub = self.registry.get_or_create(self.module, id)?;
            self.registry.factory().move_body(self.module, id, stub)?;
            self.stats.declarations_replaced += 1;
            debug!(original = %id, stub = %stub, "replaced dispatcher declaration");
            stub
        } else {
            id
        };
        self.visit_body(declared)?;
        Ok(declared)
    }

    fn visit_body(&mut self, id: FunctionId) -> Result<()> {
        let Some(mut body) = self.module.function_mut(id)?.body.take() else {
            return Ok(());
        };
        let result = self.visit_stmts(&mut body.stmts);
        self.module.function_mut(id)?.body = Some(body);
        result
    }

    fn visit_stmts(&mut self, stmts: &mut [Stmt]) -> Result<()> {
        stmts.iter_mut().try_for_each(|stmt| self.visit_stmt(stmt))
    }

    fn visit_stmt(&mut self, stmt: &mut Stmt) -> Result<()> {
        match stmt {
            Stmt::Expr(expr) => self.visit_expr(expr),
            Stmt::Let { init, .. } => match init {
                Some(init) => self.visit_expr(init),
                None => Ok(()),
            },
            Stmt::Return(ret) => self.visit_return(ret),
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.visit_expr(cond)?;
                self.visit_stmts(then_branch)?;
                self.visit_stmts(else_branch)
            }
            Stmt::While { cond, body } => {
                self.visit_expr(cond)?;
                self.visit_stmts(body)
            }
            Stmt::Block(stmts) => self.visit_stmts(stmts),
            Stmt::LocalFunction(id) => {
                *id = self.visit_function(*id)?;
                Ok(())
            }
        }
    }

    fn visit_return(&mut self, ret: &mut Return) -> Result<()> {
        // Dangling targets are a bug upstream; surface them here.
        self.module.function(ret.target)?;
        if let Some(stub) = self.registry.stub_for(ret.target) {
            trace!(from = %ret.target, to = %stub, "retargeted return");
            ret.target = stub;
            self.stats.returns_retargeted += 1;
        }
        self.visit_expr(&mut ret.value)
    }

    fn visit_expr(&mut self, expr: &mut Expr) -> Result<()> {
        match expr {
            Expr::Const(_) | Expr::Get(_) => Ok(()),
            Expr::Set { value, .. } => self.visit_expr(value),
            Expr::Binary { lhs, rhs, .. } => {
                self.visit_expr(lhs)?;
                self.visit_expr(rhs)
            }
            Expr::Call(call) => self.visit_call(call),
            Expr::When {
                cond,
                then_branch,
                else_branch,
            } => {
                self.visit_expr(cond)?;
                self.visit_expr(then_branch)?;
                self.visit_expr(else_branch)
            }
        }
    }

    fn visit_call(&mut self, call: &mut Call) -> Result<()> {
        let callee = self.module.function(call.callee)?;
        // Calls without a dispatch receiver argument already have the static
        // shape (or are some other call form) and are left as they are.
        if callee.origin.is_default_dispatcher() && call.dispatch_receiver.is_some() {
            let parent = callee.parent;
            if !self.owns(parent)? {
                return Err(LoweringError::ForeignDispatcher {
                    callee: call.callee,
                    container: parent,
                });
            }
            let stub = self.registry.get_or_create(self.module, call.callee)?;
            trace!(from = %call.callee, to = %stub, "rewrote dispatcher call");
            call.promote_receivers(stub);
            self.stats.calls_rewritten += 1;
        }

        if let Some(receiver) = &mut call.dispatch_receiver {
            self.visit_expr(receiver)?;
        }
        if let Some(receiver) = &mut call.extension_receiver {
            self.visit_expr(receiver)?;
        }
        call.args.iter_mut().try_for_each(|arg| self.visit_expr(arg))
    }

    /// Whether `container` is the lowered container or nested inside it.
    fn owns(&self, mut container: ContainerId) -> Result<bool> {
        loop {
            if Some(container) == self.root {
                return Ok(true);
            }
            match self.module.container(container)?.parent {
                Some(parent) => container = parent,
                None => return Ok(false),
            }
        }
    }
}
