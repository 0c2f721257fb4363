//! Arena identifiers for IR entities.
//!
//! Every function, container and value slot in an [`IrModule`](crate::IrModule)
//! is addressed by a dense index assigned at creation time. Identity is the
//! index: two ids compare equal exactly when they name the same arena slot,
//! so ids are the keys used by caches that must not outlive the module.

use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            /// Create an id from a raw arena index.
            #[inline]
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            /// Get the underlying index.
            #[inline]
            pub const fn index(self) -> u32 {
                self.0
            }

            #[inline]
            pub(crate) fn slot(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<u32> for $name {
            fn from(index: u32) -> Self {
                Self::new(index)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

arena_id!(
    /// Identifies a function declaration in the module arena.
    FunctionId,
    "fn#"
);

arena_id!(
    /// Identifies a declaration container (a class-like scope).
    ContainerId,
    "container#"
);

arena_id!(
    /// Identifies a value slot: a receiver, a parameter or a local variable.
    ValueId,
    "v"
);
