//! irlower
//!
//! Backend lowering for a tree-shaped compiler IR.
//!
//! ## Crates
//!
//! - [`ir`] (`irlower-core`): the IR arena, nodes, stub factory and errors
//! - [`lowering`] (`irlower-lowering`): lowering phases and the phase pipeline
//!
//! ## Example
//!
//! ```
//! use irlower::prelude::*;
//!
//! let mut b = IrBuilder::new();
//! let greeter = b.container("Greeter");
//! let f = b
//!     .function(greeter, "greet")
//!     .dispatcher()
//!     .receiver("self")
//!     .param("name")
//!     .declare()
//!     .unwrap();
//! b.set_body(f.id, vec![Stmt::ret(f.id, Expr::get(f.params[0]))]).unwrap();
//! let mut module = b.finish();
//!
//! let stats = irlower::lower_static_default_functions(&mut module, greeter).unwrap();
//! assert_eq!(stats.stubs_created, 1);
//! let stub = module.find_declared(greeter, "greet").unwrap().unwrap();
//! assert!(module.function(stub).unwrap().is_static());
//! ```

pub use irlower_core as ir;
pub use irlower_lowering as lowering;

use irlower_core::{ContainerId, DefaultStubFactory, IrModule, Result};
use irlower_lowering::{LoweringStats, StaticDefaultFunctionLowering};

pub mod prelude {
    pub use irlower_core::{
        BinaryOp, Body, Call, Constant, ContainerId, Declaration, DeclarationOrigin,
        DefaultStubFactory, Expr, Function, FunctionFlags, FunctionId, IrBuilder, IrFile,
        IrModule, LoweringError, Param, Return, Span, Stmt, StubFactory, ValueId,
    };
    pub use irlower_lowering::{
        LoweringOptions, LoweringPhase, LoweringStats, PhasePipeline, PipelineReport,
        StaticDefaultFunctionLowering, StaticDefaultFunctionPhase, StaticStubPolicy,
        TargetDescription, TargetPlatform,
    };
}

/// Lower the default-argument dispatchers of one container with the
/// standard stub factory.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn lower_static_default_functions(
    module: &mut IrModule,
    container: ContainerId,
) -> Result<LoweringStats> {
    tracing::debug!(%container, "lowering static default functions");
    StaticDefaultFunctionLowering::new(module, &DefaultStubFactory).lower(container)
}
