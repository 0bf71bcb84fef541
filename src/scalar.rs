//! # Scalar Trait
//!
//! The base floating-point type of an element decomposition. Every leaf of
//! an element type shares one `Scalar`; a type mixing `f32` and `f64`
//! leaves cannot implement [`Element`](crate::Element) at all, which turns
//! the "single base type" invariant into a compile error rather than a
//! runtime check.

use core::fmt::Debug;

use crate::element::Element;

/// Runtime tag for the base floating-point type, carried by structural
/// descriptors so type-erased code can still compare base types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScalarKind {
    /// 32-bit IEEE 754.
    F32,
    /// 64-bit IEEE 754.
    F64,
}

impl core::fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ScalarKind::F32 => write!(f, "f32"),
            ScalarKind::F64 => write!(f, "f64"),
        }
    }
}

/// The base numeric type of a packed field: `f32` or `f64`.
///
/// `Scalar: Element<Scalar = Self>` makes every scalar usable directly as a
/// one-lane element type, so scalar fields and lane projections need no
/// special casing.
pub trait Scalar:
    num_traits::Float
    + Element<Scalar = Self>
    + Copy
    + Default
    + Debug
    + PartialEq
    + Send
    + Sync
    + 'static
{
    /// Runtime tag for this scalar type.
    const KIND: ScalarKind;
}

impl Scalar for f32 {
    const KIND: ScalarKind = ScalarKind::F32;
}

impl Scalar for f64 {
    const KIND: ScalarKind = ScalarKind::F64;
}
