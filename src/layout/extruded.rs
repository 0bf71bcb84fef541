//! # Extruded Layouts
//!
//! Horizontal spectral elements extruded by a vertical level axis, in both
//! supported lane placements:
//!
//! - [`ExtrudedLaneInner`]: `[element, node_j, node_i, level, lane]`. The
//!   lanes of one point are adjacent; vertical columns are contiguous
//!   `levels × lanes` runs. The vectorization-friendly order.
//! - [`ExtrudedLaneOuter`]: `[lane, element, node_j, node_i, level]`. Each
//!   lane is one contiguous plane over all points. The reduction-friendly
//!   order.
//!
//! Both share one canonical point enumeration
//! `((element · nodes + node_j) · nodes + node_i) · levels + level`, so a
//! field can be re-laid-out between placements without renumbering points.

use super::{check_axis, require_nonzero, Axis, LaneSlot, Layout};
use crate::error::LayoutResult;

fn validated(elements: usize, nodes: usize, levels: usize) -> LayoutResult<(usize, usize, usize)> {
    Ok((
        require_nonzero(Axis::Element, elements)?,
        require_nonzero(Axis::NodeI, nodes)?,
        require_nonzero(Axis::Level, levels)?,
    ))
}

#[inline]
fn canonical_point(
    nodes: usize,
    levels: usize,
    element: usize,
    node_j: usize,
    node_i: usize,
    level: usize,
) -> usize {
    ((element * nodes + node_j) * nodes + node_i) * levels + level
}

macro_rules! extruded_common {
    () => {
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

        /// Number of vertical levels.
        #[inline]
        pub fn levels(&self) -> usize {
            self.levels
        }

        /// Points per element (`nodes² · levels`).
        #[inline]
        pub fn points_per_element(&self) -> usize {
            self.nodes * self.nodes * self.levels
        }

        /// Bounds-checked canonical point index of
        /// `(element, node_j, node_i, level)`.
        #[inline]
        pub fn point_index(
            &self,
            element: usize,
            node_j: usize,
            node_i: usize,
            level: usize,
        ) -> LayoutResult<usize> {
            check_axis(Axis::Element, element, self.elements)?;
            check_axis(Axis::NodeJ, node_j, self.nodes)?;
            check_axis(Axis::NodeI, node_i, self.nodes)?;
            check_axis(Axis::Level, level, self.levels)?;
            Ok(canonical_point(
                self.nodes,
                self.levels,
                element,
                node_j,
                node_i,
                level,
            ))
        }
    };
}

/// Extruded layout with the lane axis innermost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtrudedLaneInner {
    elements: usize,
    nodes: usize,
    levels: usize,
}

impl ExtrudedLaneInner {
    /// Create the layout. Fails when any extent is zero.
    pub fn new(elements: usize, nodes: usize, levels: usize) -> LayoutResult<Self> {
        let (elements, nodes, levels) = validated(elements, nodes, levels)?;
        Ok(ExtrudedLaneInner {
            elements,
            nodes,
            levels,
        })
    }

    extruded_common!();
}

impl Layout for ExtrudedLaneInner {
    const AXES: &'static [Axis] = &[
        Axis::Element,
        Axis::NodeJ,
        Axis::NodeI,
        Axis::Level,
        Axis::Lane,
    ];

    #[inline(always)]
    fn points(&self) -> usize {
        self.elements * self.nodes * self.nodes * self.levels
    }

    #[inline(always)]
    fn slot(&self, point: usize, lanes: usize) -> LaneSlot {
        LaneSlot {
            base: point * lanes,
            stride: 1,
        }
    }

    fn extent(&self, axis: Axis) -> Option<usize> {
        match axis {
            Axis::Element => Some(self.elements),
            Axis::NodeI | Axis::NodeJ => Some(self.nodes),
            Axis::Level => Some(self.levels),
            Axis::Point => Some(self.points()),
            Axis::Lane => None,
        }
    }
}

/// Extruded layout with the lane axis outermost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtrudedLaneOuter {
    elements: usize,
    nodes: usize,
    levels: usize,
}

impl ExtrudedLaneOuter {
    /// Create the layout. Fails when any extent is zero.
    pub fn new(elements: usize, nodes: usize, levels: usize) -> LayoutResult<Self> {
        let (elements, nodes, levels) = validated(elements, nodes, levels)?;
        Ok(ExtrudedLaneOuter {
            elements,
            nodes,
            levels,
        })
    }

    extruded_common!();
}

impl Layout for ExtrudedLaneOuter {
    const AXES: &'static [Axis] = &[
        Axis::Lane,
        Axis::Element,
        Axis::NodeJ,
        Axis::NodeI,
        Axis::Level,
    ];

    #[inline(always)]
    fn points(&self) -> usize {
        self.elements * self.nodes * self.nodes * self.levels
    }

    #[inline(always)]
    fn slot(&self, point: usize, _lanes: usize) -> LaneSlot {
        LaneSlot {
            base: point,
            stride: self.points(),
        }
    }

    fn extent(&self, axis: Axis) -> Option<usize> {
        match axis {
            Axis::Element => Some(self.elements),
            Axis::NodeI | Axis::NodeJ => Some(self.nodes),
            Axis::Level => Some(self.levels),
            Axis::Point => Some(self.points()),
            Axis::Lane => None,
        }
    }
}
