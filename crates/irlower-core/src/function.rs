//! Function declarations.
//!
//! A [`Function`] is owned by the [`IrModule`](crate::IrModule) arena and listed
//! in its parent container's declarations. Its receivers are kept apart from its
//! ordinary parameters: a dispatch receiver is the implicit `self` of an
//! instance method, an extension receiver is the explicit receiver of an
//! extension function.

use bitflags::bitflags;

use crate::{Body, ContainerId, ValueId};

/// Which phase or language feature produced a declaration.
///
/// Origins are assigned upstream; lowering only reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeclarationOrigin {
    /// Written by the user.
    #[default]
    Defined,
    /// Synthesized adapter that fills in omitted trailing arguments and
    /// forwards to the real implementation.
    FunctionForDefaultParameter,
    /// Synthesized by some other compiler phase.
    Synthetic,
}

impl DeclarationOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationOrigin::Defined => "defined",
            DeclarationOrigin::FunctionForDefaultParameter => "default-dispatcher",
            DeclarationOrigin::Synthetic => "synthetic",
        }
    }

    /// Whether this origin marks a default-argument dispatcher.
    #[inline]
    pub fn is_default_dispatcher(&self) -> bool {
        matches!(self, DeclarationOrigin::FunctionForDefaultParameter)
    }
}

bitflags! {
    /// Modifiers attached to a function declaration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FunctionFlags: u16 {
        /// Dispatched without a receiver.
        const STATIC = 1 << 0;
        /// Cannot be overridden.
        const FINAL = 1 << 1;
        /// Not visible outside its container.
        const PRIVATE = 1 << 2;
        /// Declared inside another function's body.
        const LOCAL = 1 << 3;
        /// Produced by lowering rather than by the front end.
        const LOWERED = 1 << 4;
    }
}

/// A receiver or ordinary parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    /// Value slot that body expressions read through `Expr::Get`.
    pub value: ValueId,
    /// Source name, kept for dumps and debug info.
    pub name: String,
}

impl Param {
    pub fn new(value: ValueId, name: impl Into<String>) -> Self {
        Self {
            value,
            name: name.into(),
        }
    }
}

/// A function declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    /// Container that owns this declaration.
    pub parent: ContainerId,
    pub origin: DeclarationOrigin,
    pub flags: FunctionFlags,
    /// Implicit receiver of an instance method.
    pub dispatch_receiver: Option<Param>,
    /// Explicit receiver of an extension function.
    pub extension_receiver: Option<Param>,
    pub params: Vec<Param>,
    /// `None` for bodiless declarations and for functions whose body was moved away.
    pub body: Option<Body>,
}

impl Function {
    /// Create a bodiless, receiver-less function.
    pub fn new(name: impl Into<String>, parent: ContainerId, origin: DeclarationOrigin) -> Self {
        Self {
            name: name.into(),
            parent,
            origin,
            flags: FunctionFlags::empty(),
            dispatch_receiver: None,
            extension_receiver: None,
            params: Vec::new(),
            body: None,
        }
    }

    /// Whether the function is a default-argument dispatcher that still
    /// carries a dispatch receiver, i.e. a candidate for the static stub rewrite.
    pub fn is_default_dispatcher_with_receiver(&self) -> bool {
        self.origin.is_default_dispatcher() && self.dispatch_receiver.is_some()
    }

    pub fn is_static(&self) -> bool {
        self.flags.contains(FunctionFlags::STATIC)
    }

    /// Number of receiver parameters (dispatch and extension).
    pub fn receiver_count(&self) -> usize {
        usize::from(self.dispatch_receiver.is_some())
            + usize::from(self.extension_receiver.is_some())
    }

    /// All value slots the body may read as parameters, in calling order:
    /// dispatch receiver, extension receiver, then ordinary parameters.
    pub fn all_params(&self) -> impl Iterator<Item = &Param> {
        self.dispatch_receiver
            .iter()
            .chain(self.extension_receiver.iter())
            .chain(self.params.iter())
    }
}
