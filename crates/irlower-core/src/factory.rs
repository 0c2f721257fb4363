//! Static stub construction and body relocation.
//!
//! The lowering pass does not know how to build declarations; it asks a
//! [`StubFactory`] for them. [`DefaultStubFactory`] is the factory used by the
//! compiler; tests substitute their own to check how the pass reacts to a
//! misbehaving collaborator.

use rustc_hash::FxHashMap;

use crate::{
    Expr, Function, FunctionFlags, FunctionId, IrModule, LoweringError, Param, Result, Stmt,
    ValueId,
};

/// Builds static variants of functions and moves bodies between functions.
pub trait StubFactory {
    /// Create a static function named and parented like `original` whose
    /// parameters are the original's receivers followed by its parameters.
    /// The new function has no body.
    fn create_static_variant(
        &self,
        module: &mut IrModule,
        original: FunctionId,
    ) -> Result<FunctionId>;

    /// Transfer the body of `from` into `to`, leaving `from` bodiless.
    fn move_body(&self, module: &mut IrModule, from: FunctionId, to: FunctionId) -> Result<()>;
}

/// The standard factory.
///
/// Stub parameters get fresh value slots. [`move_body`](StubFactory::move_body)
/// rewrites every read and write of the source function's receivers and
/// parameters onto the target's parameters, pairing them positionally.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStubFactory;

impl DefaultStubFactory {
    pub fn new() -> Self {
        Self
    }
}

impl StubFactory for DefaultStubFactory {
    fn create_static_variant(
        &self,
        module: &mut IrModule,
        original: FunctionId,
    ) -> Result<FunctionId> {
        let source = module.function(original)?;
        let name = source.name.clone();
        let parent = source.parent;
        let origin = source.origin;
        let flags = source.flags | FunctionFlags::STATIC | FunctionFlags::LOWERED;
        let names: Vec<String> = source.all_params().map(|p| p.name.clone()).collect();

        let mut stub = Function::new(name, parent, origin);
        stub.flags = flags;
        stub.params = names
            .into_iter()
            .map(|name| Param::new(module.fresh_value(), name))
            .collect();

        Ok(module.add_function(stub))
    }

    fn move_body(&self, module: &mut IrModule, from: FunctionId, to: FunctionId) -> Result<()> {
        if module.function(to)?.body.is_some() {
            return Err(LoweringError::BodyAlreadyMoved { from, to });
        }

        let source = module.function(from)?;
        let target = module.function(to)?;
        if source.all_params().count() != target.all_params().count() {
            return Err(LoweringError::MalformedStub {
                original: from,
                stub: to,
                reason: "parameter lists differ in length".to_string(),
            });
        }
        let remap: FxHashMap<ValueId, ValueId> = source
            .all_params()
            .zip(target.all_params())
            .map(|(old, new)| (old.value, new.value))
            .collect();

        let Some(mut body) = module.function_mut(from)?.body.take() else {
            return Ok(());
        };
        let result = remap_stmts(module, &mut body.stmts, &remap);
        module.function_mut(to)?.body = Some(body);
        result
    }
}

fn remap_stmts(
    module: &mut IrModule,
    stmts: &mut [Stmt],
    remap: &FxHashMap<ValueId, ValueId>,
) -> Result<()> {
    stmts
        .iter_mut()
        .try_for_each(|stmt| remap_stmt(module, stmt, remap))
}

fn remap_stmt(
    module: &mut IrModule,
    stmt: &mut Stmt,
    remap: &FxHashMap<ValueId, ValueId>,
) -> Result<()> {
    match stmt {
        Stmt::Expr(expr) => remap_expr(expr, remap),
        Stmt::Let { init, .. } => {
            if let Some(init) = init {
                remap_expr(init, remap);
            }
        }
        Stmt::Return(ret) => remap_expr(&mut ret.value, remap),
        Stmt::If {
            cond,
            then_branch,
            else_branch,
        } => {
            remap_expr(cond, remap);
            remap_stmts(module, then_branch, remap)?;
            remap_stmts(module, else_branch, remap)?;
        }
        Stmt::While { cond, body } => {
            remap_expr(cond, remap);
            remap_stmts(module, body, remap)?;
        }
        Stmt::Block(stmts) => remap_stmts(module, stmts, remap)?,
        // The local function's body lives in the arena but may capture the
        // enclosing receivers and parameters.
        Stmt::LocalFunction(id) => {
            let Some(mut body) = module.function_mut(*id)?.body.take() else {
                return Ok(());
            };
            let result = remap_stmts(module, &mut body.stmts, remap);
            module.function_mut(*id)?.body = Some(body);
            result?;
        }
    }
    Ok(())
}

fn remap_expr(expr: &mut Expr, remap: &FxHashMap<ValueId, ValueId>) {
    match expr {
        Expr::Const(_) => {}
        Expr::Get(value) => {
            if let Some(new) = remap.get(value) {
                *value = *new;
            }
        }
        Expr::Set { target, value } => {
            if let Some(new) = remap.get(target) {
                *target = *new;
            }
            remap_expr(value, remap);
        }
        Expr::Binary { lhs, rhs, .. } => {
            remap_expr(lhs, remap);
            remap_expr(rhs, remap);
        }
        Expr::Call(call) => {
            if let Some(receiver) = &mut call.dispatch_receiver {
                remap_expr(receiver, remap);
            }
            if let Some(receiver) = &mut call.extension_receiver {
                remap_expr(receiver, remap);
            }
            for arg in &mut call.args {
                remap_expr(arg, remap);
            }
        }
        Expr::When {
            cond,
            then_branch,
            else_branch,
        } => {
            remap_expr(cond, remap);
            remap_expr(then_branch, remap);
            remap_expr(else_branch, remap);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BinaryOp, Body, Call, DeclarationOrigin};

    struct Fixture {
        module: IrModule,
        original: FunctionId,
        helper: FunctionId,
        this: ValueId,
        a: ValueId,
    }

    fn fixture() -> Fixture {
        let mut module = IrModule::new();
        let c = module.add_container("Greeter", None);
        let helper = module.add_function(Function::new("helper", c, DeclarationOrigin::Defined));

        let this = module.fresh_value();
        let a = module.fresh_value();
        let mut f = Function::new("f", c, DeclarationOrigin::FunctionForDefaultParameter);
        f.flags = FunctionFlags::FINAL;
        f.dispatch_receiver = Some(Param::new(this, "self"));
        f.params.push(Param::new(a, "a"));
        let original = module.add_function(f);

        let call = Call::new(helper).with_dispatch_receiver(Expr::get(this));
        module.function_mut(original).unwrap().body = Some(Body::new(vec![Stmt::ret(
            original,
            Expr::binary(BinaryOp::Add, Expr::call(call), Expr::get(a)),
        )]));

        Fixture {
            module,
            original,
            helper,
            this,
            a,
        }
    }

    #[test]
    fn static_variant_has_receivers_as_leading_params() {
        let mut fx = fixture();
        let stub = DefaultStubFactory
            .create_static_variant(&mut fx.module, fx.original)
            .unwrap();

        let original = fx.module.function(fx.original).unwrap().clone();
        let stub = fx.module.function(stub).unwrap();
        assert_eq!(stub.name, original.name);
        assert_eq!(stub.parent, original.parent);
        assert_eq!(stub.origin, original.origin);
        assert!(stub.dispatch_receiver.is_none());
        assert!(stub.is_static());
        assert!(stub.flags.contains(FunctionFlags::FINAL | FunctionFlags::LOWERED));
        assert!(stub.body.is_none());
        let names: Vec<_> = stub.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["self", "a"]);
        assert_ne!(stub.params[0].value, fx.this);
        assert_ne!(stub.params[1].value, fx.a);
    }

    #[test]
    fn move_body_transfers_and_remaps() {
        let mut fx = fixture();
        let stub = DefaultStubFactory
            .create_static_variant(&mut fx.module, fx.original)
            .unwrap();
        DefaultStubFactory
            .move_body(&mut fx.module, fx.original, stub)
            .unwrap();

        assert!(fx.module.function(fx.original).unwrap().body.is_none());
        let stub_fn = fx.module.function(stub).unwrap();
        let (new_this, new_a) = (stub_fn.params[0].value, stub_fn.params[1].value);
        let body = stub_fn.body.as_ref().unwrap();
        let ret = body.stmts[0].as_return().unwrap();

        // Return targets are the lowering pass's business, not the factory's.
        assert_eq!(ret.target, fx.original);
        let expected_call = Call::new(fx.helper).with_dispatch_receiver(Expr::get(new_this));
        assert_eq!(
            ret.value,
            Expr::binary(BinaryOp::Add, Expr::call(expected_call), Expr::get(new_a))
        );
    }

    #[test]
    fn move_body_remaps_captures_in_local_functions() {
        let mut fx = fixture();
        let c = fx.module.function(fx.original).unwrap().parent;
        let mut inner = Function::new("inner", c, DeclarationOrigin::Defined);
        inner.flags = FunctionFlags::LOCAL;
        let inner = fx.module.add_function(inner);
        let nested = Function::new("nested", c, DeclarationOrigin::Defined);
        let nested = fx.module.add_function(nested);
        fx.module.function_mut(nested).unwrap().body =
            Some(Body::new(vec![Stmt::ret(nested, Expr::get(fx.a))]));
        fx.module.function_mut(inner).unwrap().body = Some(Body::new(vec![
            Stmt::LocalFunction(nested),
            Stmt::ret(inner, Expr::get(fx.this)),
        ]));
        fx.module
            .function_mut(fx.original)
            .unwrap()
            .body
            .as_mut()
            .unwrap()
            .stmts
            .insert(0, Stmt::LocalFunction(inner));

        let stub = DefaultStubFactory
            .create_static_variant(&mut fx.module, fx.original)
            .unwrap();
        DefaultStubFactory
            .move_body(&mut fx.module, fx.original, stub)
            .unwrap();

        let stub_fn = fx.module.function(stub).unwrap();
        let (new_this, new_a) = (stub_fn.params[0].value, stub_fn.params[1].value);
        let inner_body = &fx.module.function(inner).unwrap().body.as_ref().unwrap().stmts;
        assert_eq!(inner_body[1].as_return().unwrap().value, Expr::get(new_this));
        let nested_body = &fx.module.function(nested).unwrap().body.as_ref().unwrap().stmts;
        assert_eq!(nested_body[0].as_return().unwrap().value, Expr::get(new_a));
    }

    #[test]
    fn move_body_into_occupied_function_fails() {
        let mut fx = fixture();
        let stub = DefaultStubFactory
            .create_static_variant(&mut fx.module, fx.original)
            .unwrap();
        fx.module.function_mut(stub).unwrap().body = Some(Body::default());

        let err = DefaultStubFactory
            .move_body(&mut fx.module, fx.original, stub)
            .unwrap_err();
        assert_eq!(
            err,
            LoweringError::BodyAlreadyMoved {
                from: fx.original,
                to: stub
            }
        );
        assert!(fx.module.function(fx.original).unwrap().body.is_some());
    }

    #[test]
    fn move_body_rejects_mismatched_params() {
        let mut fx = fixture();
        let c = fx.module.function(fx.original).unwrap().parent;
        let target = fx
            .module
            .add_function(Function::new("f", c, DeclarationOrigin::Synthetic));

        let err = DefaultStubFactory
            .move_body(&mut fx.module, fx.original, target)
            .unwrap_err();
        assert!(matches!(err, LoweringError::MalformedStub { .. }));
    }
}
