//! Element-wise operations applied lazily to block expressions.
//!
//! A scaled block carries one of two element operations beside its numeric
//! factor:
//! - `Identity`: no transformation
//! - `Conj`: complex conjugate
//!
//! The two form a group under composition, and each element is its own
//! inverse:
//! ```text
//!   compose | Id   | Conj
//! ----------|------|------
//!   Id      | Id   | Conj
//!   Conj    | Conj | Id
//! ```
//!
//! The tag is a runtime value rather than a type parameter so that folding
//! rules (scale-of-conjugate, conjugate-of-conjugate) are plain case
//! analysis over the tag.

use crate::scalar::Conjugate;

/// Element operation applied to every tile value before scaling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ElementOp {
    /// f(x) = x
    #[default]
    Identity,
    /// f(x) = conj(x)
    Conj,
}

impl ElementOp {
    /// Whether this operation is the identity (no-op).
    #[inline]
    pub const fn is_identity(self) -> bool {
        matches!(self, ElementOp::Identity)
    }

    /// Whether this operation conjugates.
    #[inline]
    pub const fn is_conj(self) -> bool {
        matches!(self, ElementOp::Conj)
    }

    /// Compose `self` then `other`.
    #[inline]
    pub const fn compose(self, other: ElementOp) -> ElementOp {
        match (self, other) {
            (ElementOp::Identity, op) | (op, ElementOp::Identity) => op,
            (ElementOp::Conj, ElementOp::Conj) => ElementOp::Identity,
        }
    }

    /// Apply the operation to a value.
    #[inline(always)]
    pub fn apply<T: Conjugate>(self, value: T) -> T {
        match self {
            ElementOp::Identity => value,
            ElementOp::Conj => value.conj(),
        }
    }
}
