//! Lowering configuration.
//!
//! Whether a target needs receiver-free default-argument stubs is a backend
//! decision the lowering crate does not make; it is asked of a
//! [`TargetPlatform`]. [`LoweringOptions`] lets the driver override that answer.

/// Facts about the compilation target that lowering phases consult.
pub trait TargetPlatform {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Whether default-argument dispatchers must be emitted as static
    /// functions taking their receivers as ordinary parameters.
    fn requires_static_default_stubs(&self) -> bool;
}

/// A target described by plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDescription {
    pub name: String,
    pub static_default_stubs: bool,
}

impl TargetDescription {
    pub fn new(name: impl Into<String>, static_default_stubs: bool) -> Self {
        Self {
            name: name.into(),
            static_default_stubs,
        }
    }
}

impl TargetPlatform for TargetDescription {
    fn name(&self) -> &str {
        &self.name
    }

    fn requires_static_default_stubs(&self) -> bool {
        self.static_default_stubs
    }
}

/// When to run the static default-argument stub rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StaticStubPolicy {
    /// Follow the target platform.
    #[default]
    Auto,
    Always,
    Never,
}

impl StaticStubPolicy {
    pub fn resolve(self, platform: &dyn TargetPlatform) -> bool {
        match self {
            StaticStubPolicy::Auto => platform.requires_static_default_stubs(),
            StaticStubPolicy::Always => true,
            StaticStubPolicy::Never => false,
        }
    }
}

/// Options for the lowering pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoweringOptions {
    pub static_default_stubs: StaticStubPolicy,
}

impl LoweringOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_static_default_stubs(mut self, policy: StaticStubPolicy) -> Self {
        self.static_default_stubs = policy;
        self
    }
}
