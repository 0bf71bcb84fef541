//! # Layout Variants
//!
//! A closed family of container layouts, each a distinct mapping from
//! (element, node, level, lane) coordinates to an index into one contiguous
//! backing array. Variants differ in which axis varies fastest:
//!
//! | Variant                                   | Memory order (fastest last)             |
//! |-------------------------------------------|-----------------------------------------|
//! | [`Column`]                                | `[level, lane]`                         |
//! | [`Plane`]                                 | `[element, lane, node_j, node_i]`       |
//! | [`ExtrudedLaneInner`]                     | `[element, node_j, node_i, level, lane]`|
//! | [`ExtrudedLaneOuter`]                     | `[lane, element, node_j, node_i, level]`|
//!
//! Lane-innermost variants favor hardware vectorization of one point's
//! lanes; lane-outermost variants keep each lane contiguous over all points,
//! favoring reductions. The lane placement is part of the layout *type*:
//! the set of variants is sealed and known at compile time, and all
//! broadcast dispatch over them is monomorphized.
//!
//! [`Axis::Point`] is not a storage axis and never appears in a variant's
//! `AXES` order: it names the canonical linear point index (all non-lane
//! axes flattened, in `AXES` order) used by `extent` queries and bounds
//! errors.
//!
//! Index arithmetic is a pure, total function of the coordinate tuple and
//! the static extents. The hot path ([`Layout::slot`]) is unchecked; every
//! coordinate entry point (`point_index`) is bounds-checked and fails with
//! [`LayoutError::IndexOutOfRange`].

mod column;
mod extruded;
mod plane;

pub use column::Column;
pub use extruded::{ExtrudedLaneInner, ExtrudedLaneOuter};
pub use plane::Plane;

use crate::error::{LayoutError, LayoutResult};

/// Axes a layout can expose. Not every variant carries every axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// Horizontal mesh element index.
    Element,
    /// First in-element nodal index.
    NodeI,
    /// Second in-element nodal index.
    NodeJ,
    /// Vertical level index.
    Level,
    /// Field-lane index within one packed element value.
    Lane,
    /// Canonical linear point index (all non-lane axes flattened).
    Point,
}

impl core::fmt::Display for Axis {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Axis::Element => "element",
            Axis::NodeI => "node_i",
            Axis::NodeJ => "node_j",
            Axis::Level => "level",
            Axis::Lane => "lane",
            Axis::Point => "point",
        };
        write!(f, "{name}")
    }
}

/// Position of one point's lanes inside the backing array.
///
/// Leaf lane `k` of the point lives at `base + k * stride`. Lane-innermost
/// layouts produce `stride == 1`; lane-outermost layouts stride by the
/// total point count. All pack/unpack recursion is phrased in terms of
/// slots so element code never sees the layout variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneSlot {
    /// Index of lane 0.
    pub base: usize,
    /// Distance between consecutive lanes.
    pub stride: usize,
}

impl LaneSlot {
    /// Flat index of lane `k`.
    #[inline(always)]
    pub const fn lane(self, k: usize) -> usize {
        self.base + k * self.stride
    }

    /// The slot shifted forward by `lanes` lanes, used when recursing into
    /// the members of an aggregate element type.
    #[inline(always)]
    pub const fn skip(self, lanes: usize) -> Self {
        LaneSlot {
            base: self.base + lanes * self.stride,
            stride: self.stride,
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Column {}
    impl Sealed for super::Plane {}
    impl Sealed for super::ExtrudedLaneInner {}
    impl Sealed for super::ExtrudedLaneOuter {}
}

/// Indexing contract shared by the layout variants.
///
/// Sealed: the variant set is fixed at design time and dispatch over it is
/// static. Implementations are plain `Copy` value types holding only their
/// extents.
pub trait Layout: sealed::Sealed + Copy + Clone + PartialEq + Eq + core::fmt::Debug {
    /// Memory order of this variant's axes, fastest-varying last.
    const AXES: &'static [Axis];

    /// Total number of points (all non-lane slots).
    fn points(&self) -> usize;

    /// Lane slot of the canonical point `point`, given the element type's
    /// lane count. Pure arithmetic, no bounds check: the fast path for
    /// loops whose iteration space was validated once up front.
    fn slot(&self, point: usize, lanes: usize) -> LaneSlot;

    /// Extent of `axis`, or `None` if this variant does not carry it.
    fn extent(&self, axis: Axis) -> Option<usize>;

    /// Required backing-array length for an element type with `lanes` lanes.
    #[inline]
    fn len_for(&self, lanes: usize) -> usize {
        self.points() * lanes
    }
}

/// Bounds check shared by all coordinate entry points.
#[inline]
pub(crate) fn check_axis(axis: Axis, index: usize, extent: usize) -> LayoutResult<()> {
    if index < extent {
        Ok(())
    } else {
        Err(LayoutError::IndexOutOfRange {
            axis,
            index,
            extent,
        })
    }
}

/// Extent validation shared by all layout constructors.
#[inline]
pub(crate) fn require_nonzero(axis: Axis, extent: usize) -> LayoutResult<usize> {
    if extent == 0 {
        Err(LayoutError::construction(format!(
            "{axis} extent must be positive"
        )))
    } else {
        Ok(extent)
    }
}

/// Size descriptor handed over by the mesh/space layer.
///
/// One descriptor can build any of the layout variants; fields irrelevant
/// to a variant are simply ignored by its builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizeSpec {
    /// Horizontal mesh element count.
    pub elements: usize,
    /// Nodal quadrature points per in-element axis.
    pub nodes: usize,
    /// Vertical level count.
    pub levels: usize,
}

impl SizeSpec {
    /// Build a [`Column`] layout from the level count.
    pub fn column(&self) -> LayoutResult<Column> {
        Column::new(self.levels)
    }

    /// Build a [`Plane`] layout from the element and node counts.
    pub fn plane(&self) -> LayoutResult<Plane> {
        Plane::new(self.elements, self.nodes)
    }

    /// Build a lane-innermost extruded layout.
    pub fn extruded_lane_inner(&self) -> LayoutResult<ExtrudedLaneInner> {
        ExtrudedLaneInner::new(self.elements, self.nodes, self.levels)
    }

    /// Build a lane-outermost extruded layout.
    pub fn extruded_lane_outer(&self) -> LayoutResult<ExtrudedLaneOuter> {
        ExtrudedLaneOuter::new(self.elements, self.nodes, self.levels)
    }
}
