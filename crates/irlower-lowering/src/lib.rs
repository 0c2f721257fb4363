//! IR lowering phases.
//!
//! ## Architecture
//!
//! - **Phase driver** ([`PhasePipeline`]): runs phases over a file in order,
//!   enforcing declared prerequisites and target-dependent enablement
//! - **Static default functions** ([`StaticDefaultFunctionPhase`]): turns
//!   default-argument dispatchers with a receiver into static stubs, one
//!   container at a time
//!
//! ## Modules
//!
//! - [`options`]: Target predicate and lowering options
//! - [`phase`]: Phase trait, statistics and the pipeline
//! - [`registry`]: Dispatcher → stub cache
//! - [`static_default`]: The container rewriter

pub mod options;
pub mod phase;
pub mod registry;
pub mod static_default;

pub use options::{LoweringOptions, StaticStubPolicy, TargetDescription, TargetPlatform};
pub use phase::{
    LoweringPhase, LoweringStats, PhasePipeline, PhaseRun, PipelineReport,
    StaticDefaultFunctionPhase,
};
pub use registry::StubRegistry;
pub use static_default::StaticDefaultFunctionLowering;
