//! Shared helpers for integration tests.

#![allow(dead_code)]

use irlower::prelude::*;
use tracing_subscriber::EnvFilter;

/// Route `tracing` output to the test harness.
///
/// Set `IRLOWER_LOG=debug` (or any `EnvFilter` directive) to see pass output.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("IRLOWER_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// The function declared under `name` in `container`.
pub fn declared(module: &IrModule, container: ContainerId, name: &str) -> FunctionId {
    module
        .find_declared(container, name)
        .expect("container exists")
        .unwrap_or_else(|| panic!("no function `{name}` declared"))
}

/// Statements of a function body.
pub fn body(module: &IrModule, id: FunctionId) -> &[Stmt] {
    &module
        .function(id)
        .expect("function exists")
        .body
        .as_ref()
        .expect("function has a body")
        .stmts
}

/// The `Greeter` container used across tests:
///
/// ```text
/// class Greeter {
///     fun helper(this self)
///     fun f(this self, a = 1) { return self.helper() + a }
///     fun main(this self) { return f(self, 2) }
/// }
/// ```
pub struct Greeter {
    pub module: IrModule,
    pub container: ContainerId,
    pub helper: FunctionId,
    pub f: FunctionId,
    pub main: FunctionId,
    pub main_self: ValueId,
}

pub fn greeter() -> Greeter {
    let mut b = IrBuilder::new();
    let container = b.container("Greeter");
    let helper = b
        .function(container, "helper")
        .receiver("self")
        .declare()
        .unwrap();
    let f = b
        .function(container, "f")
        .dispatcher()
        .receiver("self")
        .param("a")
        .declare()
        .unwrap();
    let main = b
        .function(container, "main")
        .receiver("self")
        .declare()
        .unwrap();

    let f_self = f.dispatch_receiver.unwrap();
    let helper_call = Call::new(helper.id).with_dispatch_receiver(Expr::get(f_self));
    let sum = Expr::binary(BinaryOp::Add, Expr::call(helper_call), Expr::get(f.params[0]));
    b.set_body(f.id, vec![Stmt::ret(f.id, sum)]).unwrap();

    let main_self = main.dispatch_receiver.unwrap();
    let f_call = Call::new(f.id)
        .with_dispatch_receiver(Expr::get(main_self))
        .with_args(vec![Expr::int(2)])
        .with_span(Span::new(120, 128));
    b.set_body(main.id, vec![Stmt::ret(main.id, Expr::call(f_call))])
        .unwrap();

    Greeter {
        module: b.finish(),
        container,
        helper: helper.id,
        f: f.id,
        main: main.id,
        main_self,
    }
}
