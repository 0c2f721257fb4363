//! Convenience builder for assembling IR by hand.
//!
//! The front end produces IR directly into an [`IrModule`]; this builder is for
//! tests, benchmarks and tools that need small modules without a parser.
//!
//! ```
//! use irlower_core::{BinaryOp, Expr, IrBuilder, Stmt};
//!
//! let mut b = IrBuilder::new();
//! let greeter = b.container("Greeter");
//! let f = b
//!     .function(greeter, "f")
//!     .dispatcher()
//!     .receiver("self")
//!     .param("a")
//!     .declare()
//!     .unwrap();
//! let sum = Expr::binary(BinaryOp::Add, Expr::get(f.params[0]), Expr::int(1));
//! b.set_body(f.id, vec![Stmt::ret(f.id, sum)]).unwrap();
//! let module = b.finish();
//! assert_eq!(module.declared_functions(greeter).unwrap().count(), 1);
//! ```

use crate::{
    Body, ContainerId, Declaration, DeclarationOrigin, Expr, Field, Function, FunctionFlags,
    FunctionId, IrModule, Param, Result, Stmt, ValueId,
};

/// Builds an [`IrModule`] incrementally.
#[derive(Debug, Default)]
pub struct IrBuilder {
    module: IrModule,
}

/// Ids handed out when a function is declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredFunction {
    pub id: FunctionId,
    pub dispatch_receiver: Option<ValueId>,
    pub extension_receiver: Option<ValueId>,
    pub params: Vec<ValueId>,
}

impl IrBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level container.
    pub fn container(&mut self, name: &str) -> ContainerId {
        self.module.add_container(name, None)
    }

    /// Add a container nested in `parent` and list it among `parent`'s declarations.
    pub fn nested_container(&mut self, parent: ContainerId, name: &str) -> Result<ContainerId> {
        let id = self.module.add_container(name, Some(parent));
        self.module
            .container_mut(parent)?
            .declarations
            .push(Declaration::Container(id));
        Ok(id)
    }

    pub fn field(&mut self, container: ContainerId, name: &str, init: Option<Expr>) -> Result<()> {
        self.module
            .container_mut(container)?
            .declarations
            .push(Declaration::Field(Field {
                name: name.to_string(),
                initializer: init,
            }));
        Ok(())
    }

    /// Start a function in `container`.
    pub fn function(&mut self, container: ContainerId, name: &str) -> FunctionBuilder<'_> {
        FunctionBuilder {
            builder: self,
            function: Function::new(name, container, DeclarationOrigin::Defined),
            dispatch_receiver: None,
            extension_receiver: None,
            params: Vec::new(),
        }
    }

    /// Allocate a value slot for a local variable.
    pub fn local(&mut self) -> ValueId {
        self.module.fresh_value()
    }

    pub fn set_body(&mut self, id: FunctionId, stmts: Vec<Stmt>) -> Result<()> {
        self.module.function_mut(id)?.body = Some(Body::new(stmts));
        Ok(())
    }

    pub fn module(&self) -> &IrModule {
        &self.module
    }

    pub fn finish(self) -> IrModule {
        self.module
    }
}

/// Describes one function before it is added to the arena.
pub struct FunctionBuilder<'b> {
    builder: &'b mut IrBuilder,
    function: Function,
    dispatch_receiver: Option<String>,
    extension_receiver: Option<String>,
    params: Vec<String>,
}

impl<'b> FunctionBuilder<'b> {
    /// Mark the function as a default-argument dispatcher.
    pub fn dispatcher(self) -> Self {
        self.origin(DeclarationOrigin::FunctionForDefaultParameter)
    }

    pub fn origin(mut self, origin: DeclarationOrigin) -> Self {
        self.function.origin = origin;
        self
    }

    pub fn flags(mut self, flags: FunctionFlags) -> Self {
        self.function.flags |= flags;
        self
    }

    pub fn receiver(mut self, name: &str) -> Self {
        self.dispatch_receiver = Some(name.to_string());
        self
    }

    pub fn extension_receiver(mut self, name: &str) -> Self {
        self.extension_receiver = Some(name.to_string());
        self
    }

    pub fn param(mut self, name: &str) -> Self {
        self.params.push(name.to_string());
        self
    }

    /// Add the function to the arena and to its container's declarations.
    pub fn declare(self) -> Result<DeclaredFunction> {
        let container = self.function.parent;
        let (builder, declared) = self.build();
        builder
            .module
            .container_mut(container)?
            .declarations
            .push(Declaration::Function(declared.id));
        Ok(declared)
    }

    /// Add the function to the arena only. The caller places it in a body
    /// with [`Stmt::LocalFunction`].
    pub fn declare_local(self) -> DeclaredFunction {
        let (_, declared) = self.flags(FunctionFlags::LOCAL).build();
        declared
    }

    fn build(self) -> (&'b mut IrBuilder, DeclaredFunction) {
        let FunctionBuilder {
            builder,
            mut function,
            dispatch_receiver: dispatch_name,
            extension_receiver: extension_name,
            params: param_names,
        } = self;
        let module = &mut builder.module;

        function.dispatch_receiver =
            dispatch_name.map(|name| Param::new(module.fresh_value(), name));
        function.extension_receiver =
            extension_name.map(|name| Param::new(module.fresh_value(), name));
        function.params = param_names
            .into_iter()
            .map(|name| Param::new(module.fresh_value(), name))
            .collect();

        let dispatch_receiver = function.dispatch_receiver.as_ref().map(|p| p.value);
        let extension_receiver = function.extension_receiver.as_ref().map(|p| p.value);
        let params = function.params.iter().map(|p| p.value).collect();
        let id = module.add_function(function);
        (
            builder,
            DeclaredFunction {
                id,
                dispatch_receiver,
                extension_receiver,
                params,
            },
        )
    }
}
