//! Static stub registry.
//!
//! Maps each default-argument dispatcher to the static stub that replaces it.
//! A stub is created the first time it is asked for, whether that is at the
//! dispatcher's declaration or at a call site visited earlier, and every later
//! request returns the same stub.
//!
//! A registry belongs to one lowering invocation over one container and is
//! dropped with it.

use irlower_core::{FunctionId, IrModule, LoweringError, Result, StubFactory};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Cache of dispatcher → static stub.
pub struct StubRegistry<'f> {
    factory: &'f dyn StubFactory,
    stubs: FxHashMap<FunctionId, FunctionId>,
}

impl<'f> StubRegistry<'f> {
    pub fn new(factory: &'f dyn StubFactory) -> Self {
        Self {
            factory,
            stubs: FxHashMap::default(),
        }
    }

    pub fn factory(&self) -> &'f dyn StubFactory {
        self.factory
    }

    /// Get the stub for `original`, creating it on first request.
    ///
    /// `original` must be a default-argument dispatcher with a dispatch
    /// receiver. The new stub is checked against the original before it is
    /// cached, so a misbehaving factory is caught here rather than in codegen.
    pub fn get_or_create(
        &mut self,
        module: &mut IrModule,
        original: FunctionId,
    ) -> Result<FunctionId> {
        let function = module.function(original)?;
        if !function.is_default_dispatcher_with_receiver() {
            return Err(LoweringError::IneligibleFunction {
                id: original,
                name: function.name.clone(),
            });
        }
        if let Some(&stub) = self.stubs.get(&original) {
            return Ok(stub);
        }

        let stub = self.factory.create_static_variant(module, original)?;
        validate_stub(module, original, stub)?;
        debug!(
            original = %original,
            stub = %stub,
            name = %module.function(stub)?.name,
            "created static default stub"
        );
        self.stubs.insert(original, stub);
        Ok(stub)
    }

    /// The stub already created for `original`, if any.
    pub fn stub_for(&self, original: FunctionId) -> Option<FunctionId> {
        self.stubs.get(&original).copied()
    }

    pub fn contains(&self, original: FunctionId) -> bool {
        self.stubs.contains_key(&original)
    }

    /// Number of stubs created so far.
    pub fn len(&self) -> usize {
        self.stubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stubs.is_empty()
    }

    /// All (original, stub) pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (FunctionId, FunctionId)> + '_ {
        self.stubs.iter().map(|(original, stub)| (*original, *stub))
    }
}

fn validate_stub(module: &IrModule, original: FunctionId, stub: FunctionId) -> Result<()> {
    let malformed = |reason: &str| LoweringError::MalformedStub {
        original,
        stub,
        reason: reason.to_string(),
    };

    if stub == original {
        return Err(malformed("stub reuses the original's identity"));
    }
    let source = module.function(original)?;
    let target = module.function(stub)?;
    if target.dispatch_receiver.is_some() || target.extension_receiver.is_some() {
        return Err(malformed("stub keeps a receiver parameter"));
    }
    if !target.is_static() {
        return Err(malformed("stub is not marked static"));
    }
    if target.name != source.name {
        return Err(malformed("stub name differs from the original"));
    }
    if target.parent != source.parent {
        return Err(malformed("stub parent differs from the original"));
    }
    if target.params.len() != source.receiver_count() + source.params.len() {
        return Err(malformed("stub parameters are not receivers followed by parameters"));
    }
    if target.body.is_some() {
        return Err(malformed("stub already has a body"));
    }
    Ok(())
}
