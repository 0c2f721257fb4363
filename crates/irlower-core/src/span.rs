//! Source offsets carried by IR nodes.
//!
//! Lowering never inspects positions; it only has to carry them across
//! rewrites so later phases can still emit line tables.

use std::fmt;

/// A half-open byte range `[start, end)` in the original source file.
///
/// Synthesized nodes that have no source counterpart use [`Span::SYNTHETIC`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Start offset in bytes.
    pub start: u32,
    /// End offset in bytes (exclusive).
    pub end: u32,
}

impl Span {
    /// Marker for nodes created by the compiler with no source location.
    pub const SYNTHETIC: Span = Span {
        start: u32::MAX,
        end: u32::MAX,
    };

    /// Create a span covering `[start, end)`.
    #[inline]
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start {start} is past end {end}");
        Self { start, end }
    }

    /// Whether this span marks a compiler-synthesized node.
    #[inline]
    pub fn is_synthetic(&self) -> bool {
        *self == Self::SYNTHETIC
    }

    /// Length of the covered range in bytes. Synthetic spans are empty.
    #[inline]
    pub fn len(&self) -> u32 {
        if self.is_synthetic() {
            0
        } else {
            self.end.saturating_sub(self.start)
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Smallest span covering both `self` and `other`.
    ///
    /// A synthetic span contributes nothing to the result.
    pub fn merge(self, other: Span) -> Span {
        match (self.is_synthetic(), other.is_synthetic()) {
            (true, _) => other,
            (_, true) => self,
            _ => Span {
                start: self.start.min(other.start),
                end: self.end.max(other.end),
            },
        }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::SYNTHETIC
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_synthetic() {
            write!(f, "<synthetic>")
        } else {
            write!(f, "{}..{}", self.start, self.end)
        }
    }
}
