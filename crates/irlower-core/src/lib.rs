//! IR data model shared by the lowering phases.
//!
//! ## Modules
//!
//! - [`ids`]: Arena identifiers ([`FunctionId`], [`ContainerId`], [`ValueId`])
//! - [`module`]: The [`IrModule`] arena, containers and declarations
//! - [`function`]: Function declarations, origins and flags
//! - [`ir`]: Statement and expression nodes
//! - [`factory`]: Static stub construction and body relocation
//! - [`builder`]: Hand assembly of IR for tests and tools
//! - [`error`]: Internal lowering errors

pub mod builder;
mod display;
pub mod error;
pub mod factory;
pub mod function;
pub mod ids;
pub mod ir;
pub mod module;
mod span;

pub use builder::{DeclaredFunction, FunctionBuilder, IrBuilder};
pub use display::{ContainerDump, FunctionDump};
pub use error::{LoweringError, Result};
pub use factory::{DefaultStubFactory, StubFactory};
pub use function::{DeclarationOrigin, Function, FunctionFlags, Param};
pub use ids::{ContainerId, FunctionId, ValueId};
pub use ir::{BinaryOp, Body, Call, Constant, Expr, Return, Stmt};
pub use module::{Container, Declaration, Field, IrFile, IrModule};
pub use span::Span;
