//! # Strided Field Views
//!
//! Typed projection views: a [`FieldView`] restricts a parent field to a
//! subrange of its lanes and reads that subrange as its own element type,
//! still through the parent's layout arithmetic and storage. The scalar
//! lane projection is the one-lane special case.
//!
//! Sub-structures whose scalars are contiguous in memory (planar and
//! lane-innermost slabs and columns) are borrowed [`Field`](crate::Field)s
//! over a sub-layout; see the slab/column methods on `Field`. Lane-outermost
//! sub-structures are never contiguous (each lane lives in its own plane),
//! so their slabs and columns are [`SlabView`]s: restrictions to a
//! contiguous range of the parent's canonical points, evaluated through the
//! parent's slot arithmetic.

use core::marker::PhantomData;

use crate::element::Element;
use crate::error::LayoutResult;
use crate::layout::{Axis, Layout};

/// Read-only view over lanes `[first, first + T::LANES)` of a parent field
/// with `parent_lanes` lanes per point.
#[derive(Clone, Copy)]
pub struct FieldView<'a, T: Element, L> {
    layout: L,
    parent_lanes: usize,
    first: usize,
    data: &'a [T::Scalar],
    _elem: PhantomData<T>,
}

impl<'a, T: Element, L: Layout> FieldView<'a, T, L> {
    pub(crate) fn new(layout: L, parent_lanes: usize, first: usize, data: &'a [T::Scalar]) -> Self {
        FieldView {
            layout,
            parent_lanes,
            first,
            data,
            _elem: PhantomData,
        }
    }

    /// The parent's layout.
    #[inline]
    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Total point count.
    #[inline]
    pub fn points(&self) -> usize {
        self.layout.points()
    }

    /// Unpack the projected value at canonical point `point`,
    /// bounds-checked.
    pub fn get(&self, point: usize) -> LayoutResult<T> {
        crate::layout::check_axis(Axis::Point, point, self.points())?;
        Ok(self.get_unchecked(point))
    }

    /// Unpack without the bounds check.
    #[inline(always)]
    pub fn get_unchecked(&self, point: usize) -> T {
        debug_assert!(point < self.points());
        let slot = self.layout.slot(point, self.parent_lanes).skip(self.first);
        T::read(self.data, slot)
    }

    /// Iterate over projected values in canonical point order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.points()).map(move |p| self.get_unchecked(p))
    }
}

/// Mutable view over lanes `[first, first + T::LANES)` of a parent field.
pub struct FieldViewMut<'a, T: Element, L> {
    layout: L,
    parent_lanes: usize,
    first: usize,
    data: &'a mut [T::Scalar],
    _elem: PhantomData<T>,
}

impl<'a, T: Element, L: Layout> FieldViewMut<'a, T, L> {
    pub(crate) fn new(
        layout: L,
        parent_lanes: usize,
        first: usize,
        data: &'a mut [T::Scalar],
    ) -> Self {
        FieldViewMut {
            layout,
            parent_lanes,
            first,
            data,
            _elem: PhantomData,
        }
    }

    /// The parent's layout.
    #[inline]
    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Total point count.
    #[inline]
    pub fn points(&self) -> usize {
        self.layout.points()
    }

    /// Reborrow as a read-only view.
    pub fn as_view(&self) -> FieldView<'_, T, L> {
        FieldView::new(self.layout, self.parent_lanes, self.first, self.data)
    }

    /// Unpack the projected value at canonical point `point`,
    /// bounds-checked.
    pub fn get(&self, point: usize) -> LayoutResult<T> {
        crate::layout::check_axis(Axis::Point, point, self.points())?;
        Ok(self.get_unchecked(point))
    }

    /// Unpack without the bounds check.
    #[inline(always)]
    pub fn get_unchecked(&self, point: usize) -> T {
        debug_assert!(point < self.points());
        let slot = self.layout.slot(point, self.parent_lanes).skip(self.first);
        T::read(self.data, slot)
    }

    /// Pack `value` at canonical point `point`, bounds-checked. Writes
    /// land in the parent's storage.
    pub fn set(&mut self, point: usize, value: T) -> LayoutResult<()> {
        crate::layout::check_axis(Axis::Point, point, self.points())?;
        self.set_unchecked(point, value);
        Ok(())
    }

    /// Pack without the bounds check.
    #[inline(always)]
    pub fn set_unchecked(&mut self, point: usize, value: T) {
        debug_assert!(point < self.points());
        let slot = self.layout.slot(point, self.parent_lanes).skip(self.first);
        value.write(self.data, slot);
    }

    /// Overwrite the projected lanes of every point with `value`.
    pub fn fill(&mut self, value: T) {
        for p in 0..self.points() {
            self.set_unchecked(p, value);
        }
    }
}

/// Read-only view over the contiguous parent-point range
/// `[first, first + count)`, keeping the parent's lane placement.
///
/// Point `p` of the view is point `first + p` of the parent, so the view's
/// lanes stride exactly as the parent's do. This is the slab/column shape
/// for lane-outermost layouts, where one sub-structure's scalars form
/// `LANES` disjoint runs rather than one slice.
#[derive(Clone, Copy)]
pub struct SlabView<'a, S: Element, L> {
    layout: L,
    first: usize,
    count: usize,
    data: &'a [S::Scalar],
    _elem: PhantomData<S>,
}

impl<'a, S: Element, L: Layout> SlabView<'a, S, L> {
    pub(crate) fn new(layout: L, first: usize, count: usize, data: &'a [S::Scalar]) -> Self {
        SlabView {
            layout,
            first,
            count,
            data,
            _elem: PhantomData,
        }
    }

    /// The parent's layout.
    #[inline]
    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Number of points in the view.
    #[inline]
    pub fn points(&self) -> usize {
        self.count
    }

    /// Unpack the value at view point `point`, bounds-checked.
    pub fn get(&self, point: usize) -> LayoutResult<S> {
        crate::layout::check_axis(Axis::Point, point, self.count)?;
        Ok(self.get_unchecked(point))
    }

    /// Unpack without the bounds check.
    #[inline(always)]
    pub fn get_unchecked(&self, point: usize) -> S {
        debug_assert!(point < self.count);
        let slot = self.layout.slot(self.first + point, S::LANES);
        S::read(self.data, slot)
    }

    /// Iterate over the view's values in canonical point order.
    pub fn iter(&self) -> impl Iterator<Item = S> + '_ {
        (0..self.count).map(move |p| self.get_unchecked(p))
    }
}

/// Mutable view over the contiguous parent-point range
/// `[first, first + count)`.
pub struct SlabViewMut<'a, S: Element, L> {
    layout: L,
    first: usize,
    count: usize,
    data: &'a mut [S::Scalar],
    _elem: PhantomData<S>,
}

impl<'a, S: Element, L: Layout> SlabViewMut<'a, S, L> {
    pub(crate) fn new(layout: L, first: usize, count: usize, data: &'a mut [S::Scalar]) -> Self {
        SlabViewMut {
            layout,
            first,
            count,
            data,
            _elem: PhantomData,
        }
    }

    /// The parent's layout.
    #[inline]
    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Number of points in the view.
    #[inline]
    pub fn points(&self) -> usize {
        self.count
    }

    /// Reborrow as a read-only view.
    pub fn as_view(&self) -> SlabView<'_, S, L> {
        SlabView::new(self.layout, self.first, self.count, self.data)
    }

    /// Unpack the value at view point `point`, bounds-checked.
    pub fn get(&self, point: usize) -> LayoutResult<S> {
        crate::layout::check_axis(Axis::Point, point, self.count)?;
        Ok(self.get_unchecked(point))
    }

    /// Unpack without the bounds check.
    #[inline(always)]
    pub fn get_unchecked(&self, point: usize) -> S {
        debug_assert!(point < self.count);
        let slot = self.layout.slot(self.first + point, S::LANES);
        S::read(self.data, slot)
    }

    /// Pack `value` at view point `point`, bounds-checked. Writes land in
    /// the parent's storage.
    pub fn set(&mut self, point: usize, value: S) -> LayoutResult<()> {
        crate::layout::check_axis(Axis::Point, point, self.count)?;
        self.set_unchecked(point, value);
        Ok(())
    }

    /// Pack without the bounds check.
    #[inline(always)]
    pub fn set_unchecked(&mut self, point: usize, value: S) {
        debug_assert!(point < self.count);
        let slot = self.layout.slot(self.first + point, S::LANES);
        value.write(self.data, slot);
    }

    /// Overwrite every point of the view with `value`.
    pub fn fill(&mut self, value: S) {
        for p in 0..self.count {
            self.set_unchecked(p, value);
        }
    }
}
