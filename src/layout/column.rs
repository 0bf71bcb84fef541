//! # Point-Column Layout
//!
//! A single vertical column of points: axes `[level, lane]`, lane
//! innermost. The natural layout for single-column physics (radiation,
//! vertical diffusion) and the sub-layout produced by extracting a column
//! from an extruded field.

use super::{check_axis, require_nonzero, Axis, LaneSlot, Layout};
use crate::error::LayoutResult;

/// Vertical point-column layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Column {
    levels: usize,
}

impl Column {
    /// Create a column layout with `levels` vertical levels.
    ///
    /// Fails with a construction error when `levels` is zero.
    pub fn new(levels: usize) -> LayoutResult<Self> {
        Ok(Column {
            levels: require_nonzero(Axis::Level, levels)?,
        })
    }

    /// Number of vertical levels.
    #[inline]
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Bounds-checked canonical point index of `level`.
    #[inline]
    pub fn point_index(&self, level: usize) -> LayoutResult<usize> {
        check_axis(Axis::Level, level, self.levels)?;
        Ok(level)
    }
}

impl Layout for Column {
    const AXES: &'static [Axis] = &[Axis::Level, Axis::Lane];

    #[inline(always)]
    fn points(&self) -> usize {
        self.levels
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
            Axis::Level => Some(self.levels),
            Axis::Point => Some(self.levels),
            _ => None,
        }
    }
}
