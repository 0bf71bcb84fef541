//! # Gridflow
//!
//! Struct-of-arrays field layouts for spectral-element and
//! finite-difference climate grids.
//!
//! ## Design Philosophy
//!
//! **The type IS the layout.**
//!
//! - An element type ([`Element`]) decomposes, at compile time, into a
//!   flat sequence of numeric lanes over one base scalar: nested records,
//!   tuples and fixed arrays all flatten to offsets known to the compiler.
//! - A layout variant ([`Column`], [`Plane`], [`ExtrudedLaneInner`],
//!   [`ExtrudedLaneOuter`]) is a pure index-arithmetic type deciding which
//!   axis varies fastest in one shared contiguous buffer.
//! - A field ([`Field`]) is the pairing of the two over an owned or
//!   borrowed backing store; slabs, columns and lane projections are
//!   borrowed restrictions of the same storage, never copies.
//! - Broadcast expressions ([`Broadcast`], [`BroadcastExt`]) are lazy
//!   value types; materializing one walks the iteration space once,
//!   packing results straight into a destination buffer with no
//!   intermediate structured values.
//!
//! Everything is monomorphized: there is no runtime dispatch over element
//! types or layout variants, and the pack/unpack hot path unrolls to plain
//! loads and stores.
//!
//! ## Example
//!
//! ```
//! use gridflow::{BroadcastExt, Complex, Field, Plane};
//!
//! let layout = Plane::new(2, 2)?;
//! let a = Field::<Complex<f64>, _>::from_fn(layout, |p| Complex::new(p as f64, 0.0));
//!
//! // Deferred: nothing is computed here.
//! let expr = &a * 2.0 + 1.0;
//!
//! // One pass, packed straight into a fresh container.
//! let out: Field<Complex<f64>, _> = expr.materialize()?;
//! assert_eq!(out.get(3)?, Complex::new(7.0, 0.0));
//! # Ok::<(), gridflow::LayoutError>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod backing;
mod broadcast;
mod complex;
mod element;
mod error;
mod field;
mod scalar;
mod shape;
mod view;

/// Layout variants and their indexing contracts.
pub mod layout;

pub use backing::{Backing, Buffer, BufferMut, HostBuffer};
pub use broadcast::{
    materialize_both, splat, Broadcast, BroadcastDest, BroadcastExt, Diff, Map, Negate, Prod,
    Splat, Sum, Zip,
};
pub use complex::Complex;
pub use element::Element;
pub use error::{LayoutError, LayoutResult};
pub use field::{Field, Slab, SlabMut};
pub use layout::{
    Axis, Column, ExtrudedLaneInner, ExtrudedLaneOuter, LaneSlot, Layout, Plane, SizeSpec,
};
pub use scalar::{Scalar, ScalarKind};
pub use shape::TypeShape;
pub use view::{FieldView, FieldViewMut, SlabView, SlabViewMut};
