//! # Planar Spectral-Element Layout
//!
//! A 2-D mesh of spectral elements, each carrying a square `nodes × nodes`
//! nodal grid. Memory order `[element, lane, node_j, node_i]`: the lane
//! axis sits between the element and the nodal axes, so each
//! (element, lane) pair owns one contiguous `nodes²` slab. Reductions over
//! a single lane of one element are reads of a raw contiguous slice.

use core::ops::Range;

use super::{check_axis, require_nonzero, Axis, LaneSlot, Layout};
use crate::error::LayoutResult;

/// Planar element layout: `elements` spectral elements of `nodes × nodes`
/// quadrature points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plane {
    elements: usize,
    nodes: usize,
}

impl Plane {
    /// Create a planar layout. Fails when either extent is zero.
    pub fn new(elements: usize, nodes: usize) -> LayoutResult<Self> {
        Ok(Plane {
            elements: require_nonzero(Axis::Element, elements)?,
            nodes: require_nonzero(Axis::NodeI, nodes)?,
        })
    }

    /// Number of mesh elements.
    #[inline]
    pub fn elements(&self) -> usize {
        self.elements
    }

    /// Nodal points per in-element axis.
    #[inline]
    pub fn nodes(&self) -> usize {
        self.nodes
    }

    /// Points per element (`nodes²`).
    #[inline]
    pub fn points_per_element(&self) -> usize {
        self.nodes * self.nodes
    }

    /// Bounds-checked canonical point index of `(element, node_j, node_i)`.
    #[inline]
    pub fn point_index(&self, element: usize, node_j: usize, node_i: usize) -> LayoutResult<usize> {
        check_axis(Axis::Element, element, self.elements)?;
        check_axis(Axis::NodeJ, node_j, self.nodes)?;
        check_axis(Axis::NodeI, node_i, self.nodes)?;
        Ok((element * self.nodes + node_j) * self.nodes + node_i)
    }

    /// Flat range of scalar indices holding lane `lane` of element
    /// `element`, for an element type with `lanes` lanes. The range is
    /// contiguous by construction of the memory order.
    #[inline]
    pub fn lane_range(&self, element: usize, lane: usize, lanes: usize) -> Range<usize> {
        let npe = self.points_per_element();
        let start = (element * lanes + lane) * npe;
        start..start + npe
    }

    /// Flat range of scalar indices holding the elements `range`, for an
    /// element type with `lanes` lanes.
    #[inline]
    pub(crate) fn element_range(&self, range: Range<usize>, lanes: usize) -> Range<usize> {
        let per_element = lanes * self.points_per_element();
        range.start * per_element..range.end * per_element
    }
}

impl Layout for Plane {
    const AXES: &'static [Axis] = &[Axis::Element, Axis::Lane, Axis::NodeJ, Axis::NodeI];

    #[inline(always)]
    fn points(&self) -> usize {
        self.elements * self.nodes * self.nodes
    }

    #[inline(always)]
    fn slot(&self, point: usize, lanes: usize) -> LaneSlot {
        let npe = self.nodes * self.nodes;
        let element = point / npe;
        let node = point % npe;
        LaneSlot {
            base: element * lanes * npe + node,
            stride: npe,
        }
    }

    fn extent(&self, axis: Axis) -> Option<usize> {
        match axis {
            Axis::Element => Some(self.elements),
            Axis::NodeI | Axis::NodeJ => Some(self.nodes),
            Axis::Point => Some(self.points()),
            _ => None,
        }
    }
}
