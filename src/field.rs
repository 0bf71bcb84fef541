//! # Field Containers
//!
//! [`Field<S, L, B>`] is the owning struct-of-arrays container: one
//! contiguous backing buffer of `points × S::LANES` scalars, addressed
//! through a [`Layout`] variant. Sub-structuring (slabs, columns, lane
//! projection) reuses the same type with a borrowed buffer or a dedicated
//! strided view, never separate storage.
//!
//! Bounds policy: coordinate and point accessors are checked by default
//! and return [`LayoutError::IndexOutOfRange`]; `*_unchecked` variants are
//! the fast path for loops whose iteration space was validated once.

use core::marker::PhantomData;
use core::ops::Range;

use crate::backing::{Backing, Buffer, BufferMut, HostBuffer};
use crate::element::Element;
use crate::error::{LayoutError, LayoutResult};
use crate::layout::{Axis, Column, ExtrudedLaneInner, ExtrudedLaneOuter, Layout, Plane};
use crate::view::{FieldView, FieldViewMut, SlabView, SlabViewMut};

/// A field of element-type values packed over a layout's points.
///
/// `S` is the element type, `L` the layout variant, `B` the backing store
/// (owned [`HostBuffer`] by default; borrowed slices for slab views).
pub struct Field<S: Element, L, B = HostBuffer<<S as Element>::Scalar>> {
    layout: L,
    buf: B,
    _elem: PhantomData<S>,
}

/// A non-owning slab view: a `Field` over a borrowed scalar slice.
pub type Slab<'a, S, L> = Field<S, L, &'a [<S as Element>::Scalar]>;

/// A mutable non-owning slab view.
pub type SlabMut<'a, S, L> = Field<S, L, &'a mut [<S as Element>::Scalar]>;

// ============================================================================
// Construction
// ============================================================================

impl<S: Element, L: Layout, B: Backing<S::Scalar>> Field<S, L, B> {
    /// Zero-initialized field over `layout`.
    pub fn zeroed(layout: L) -> Self {
        let len = layout.len_for(S::LANES);
        log::debug!(
            "allocating field: layout={layout:?} lanes={} len={len}",
            S::LANES
        );
        Field {
            layout,
            buf: B::zeroed(len),
            _elem: PhantomData,
        }
    }

    /// Field filled by evaluating `generator` at every canonical point.
    pub fn from_fn(layout: L, mut generator: impl FnMut(usize) -> S) -> Self {
        let mut field = Self::zeroed(layout);
        let buf = field.buf.as_mut_slice();
        for p in 0..layout.points() {
            generator(p).write(buf, layout.slot(p, S::LANES));
        }
        field
    }

    /// Adopt an existing scalar vector without copying.
    ///
    /// Fails with a construction error unless the vector length is exactly
    /// `points × LANES`.
    pub fn from_raw(layout: L, data: Vec<S::Scalar>) -> LayoutResult<Self> {
        let expected = layout.len_for(S::LANES);
        if data.len() != expected {
            return Err(LayoutError::construction(format!(
                "backing length {} does not match layout {layout:?} with {} lanes (expected {expected})",
                data.len(),
                S::LANES
            )));
        }
        Ok(Field {
            layout,
            buf: B::adopt(data),
            _elem: PhantomData,
        })
    }
}

impl<S: Element, L: Layout, B> Field<S, L, B> {
    /// Assemble a field from parts already known to be consistent.
    #[inline]
    pub(crate) fn from_parts(layout: L, buf: B) -> Self {
        Field {
            layout,
            buf,
            _elem: PhantomData,
        }
    }

    /// The layout this field is addressed through.
    #[inline]
    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Total point count.
    #[inline]
    pub fn points(&self) -> usize {
        self.layout.points()
    }

    /// Extent of `axis`, if the layout carries it; the lane axis reports
    /// the element type's lane count.
    pub fn extent(&self, axis: Axis) -> Option<usize> {
        match axis {
            Axis::Lane => Some(S::LANES),
            _ => self.layout.extent(axis),
        }
    }
}

// ============================================================================
// Read access
// ============================================================================

impl<S: Element, L: Layout, B: Buffer<S::Scalar>> Field<S, L, B> {
    /// The raw backing slice, in layout memory order.
    #[inline]
    pub fn as_slice(&self) -> &[S::Scalar] {
        self.buf.as_slice()
    }

    /// Unpack the value at canonical point `point`, bounds-checked.
    pub fn get(&self, point: usize) -> LayoutResult<S> {
        crate::layout::check_axis(Axis::Point, point, self.points())?;
        Ok(self.get_unchecked(point))
    }

    /// Unpack without the bounds check. The caller must have validated
    /// `point < points()`.
    #[inline(always)]
    pub fn get_unchecked(&self, point: usize) -> S {
        debug_assert!(point < self.points());
        S::read(self.buf.as_slice(), self.layout.slot(point, S::LANES))
    }

    /// Iterate over all values in canonical point order.
    pub fn iter(&self) -> impl Iterator<Item = S> + '_ {
        (0..self.points()).map(move |p| self.get_unchecked(p))
    }

    /// Zero-copy reinterpretation as a field of a structurally identical
    /// element type.
    ///
    /// Fails with a type mismatch unless the two element types decompose
    /// to the same [`TypeShape`](crate::TypeShape): same lane count is not
    /// enough, names and nesting must agree.
    pub fn reinterpret<T>(self) -> LayoutResult<Field<T, L, B>>
    where
        T: Element<Scalar = S::Scalar>,
    {
        if S::shape() != T::shape() {
            return Err(LayoutError::TypeMismatch {
                expected: S::shape().to_string(),
                actual: T::shape().to_string(),
            });
        }
        Ok(Field {
            layout: self.layout,
            buf: self.buf,
            _elem: PhantomData,
        })
    }

    /// Typed view over the parent lanes `lanes`, reading values of type
    /// `T`.
    ///
    /// Fails with [`LayoutError::IndexOutOfRange`] when the range exceeds
    /// the parent's lanes and with [`LayoutError::TypeMismatch`] when its
    /// width differs from `T::LANES`.
    pub fn project<T>(&self, lanes: Range<usize>) -> LayoutResult<FieldView<'_, T, L>>
    where
        T: Element<Scalar = S::Scalar>,
    {
        check_projection::<S, T>(&lanes)?;
        Ok(FieldView::new(
            self.layout,
            S::LANES,
            lanes.start,
            self.buf.as_slice(),
        ))
    }

    /// Scalar view over leaf lane `k`.
    pub fn lane(&self, k: usize) -> LayoutResult<FieldView<'_, S::Scalar, L>> {
        self.project::<S::Scalar>(k..k + 1)
    }
}

// ============================================================================
// Write access
// ============================================================================

impl<S: Element, L: Layout, B: BufferMut<S::Scalar>> Field<S, L, B> {
    /// The raw backing slice, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [S::Scalar] {
        self.buf.as_mut_slice()
    }

    /// Pack `value` at canonical point `point`, bounds-checked.
    pub fn set(&mut self, point: usize, value: S) -> LayoutResult<()> {
        crate::layout::check_axis(Axis::Point, point, self.points())?;
        self.set_unchecked(point, value);
        Ok(())
    }

    /// Pack without the bounds check.
    #[inline(always)]
    pub fn set_unchecked(&mut self, point: usize, value: S) {
        debug_assert!(point < self.points());
        let slot = self.layout.slot(point, S::LANES);
        value.write(self.buf.as_mut_slice(), slot);
    }

    /// Overwrite every point with `value`.
    pub fn fill(&mut self, value: S) {
        let layout = self.layout;
        let buf = self.buf.as_mut_slice();
        for p in 0..layout.points() {
            value.write(buf, layout.slot(p, S::LANES));
        }
    }

    /// Mutable typed view over the parent lanes `lanes`.
    pub fn project_mut<T>(&mut self, lanes: Range<usize>) -> LayoutResult<FieldViewMut<'_, T, L>>
    where
        T: Element<Scalar = S::Scalar>,
    {
        check_projection::<S, T>(&lanes)?;
        Ok(FieldViewMut::new(
            self.layout,
            S::LANES,
            lanes.start,
            self.buf.as_mut_slice(),
        ))
    }

    /// Mutable scalar view over leaf lane `k`.
    pub fn lane_mut(&mut self, k: usize) -> LayoutResult<FieldViewMut<'_, S::Scalar, L>> {
        self.project_mut::<S::Scalar>(k..k + 1)
    }
}

fn check_projection<S: Element, T: Element>(lanes: &Range<usize>) -> LayoutResult<()> {
    if lanes.start > lanes.end {
        return Err(LayoutError::construction(format!(
            "malformed lane range {}..{}",
            lanes.start, lanes.end
        )));
    }
    if lanes.end > S::LANES {
        return Err(LayoutError::IndexOutOfRange {
            axis: Axis::Lane,
            index: lanes.end,
            extent: S::LANES,
        });
    }
    if lanes.len() != T::LANES {
        return Err(LayoutError::TypeMismatch {
            expected: format!("{} lanes", lanes.len()),
            actual: format!("{} ({} lanes)", T::shape(), T::LANES),
        });
    }
    Ok(())
}

// ============================================================================
// Sub-structuring: planar slabs
// ============================================================================

impl<S: Element, B: Buffer<S::Scalar>> Field<S, Plane, B> {
    /// View of one element's points, sharing the backing storage.
    ///
    /// Checked eagerly: an out-of-range element fails here, not on first
    /// access.
    pub fn slab(&self, element: usize) -> LayoutResult<Slab<'_, S, Plane>> {
        self.slab_range(element..element + 1)
    }

    /// View of a contiguous range of elements.
    pub fn slab_range(&self, elements: Range<usize>) -> LayoutResult<Slab<'_, S, Plane>> {
        let (sub, range) = self.plane_slab_parts(&elements)?;
        Ok(Field::from_parts(sub, &self.buf.as_slice()[range]))
    }

    /// Contiguous slice holding lane `lane` of element `element`, for
    /// lane reductions over raw memory.
    pub fn lane_slab(&self, element: usize, lane: usize) -> LayoutResult<&[S::Scalar]> {
        crate::layout::check_axis(Axis::Element, element, self.layout.elements())?;
        crate::layout::check_axis(Axis::Lane, lane, S::LANES)?;
        let range = self.layout.lane_range(element, lane, S::LANES);
        Ok(&self.buf.as_slice()[range])
    }

    fn plane_slab_parts(&self, elements: &Range<usize>) -> LayoutResult<(Plane, Range<usize>)> {
        if elements.start >= elements.end {
            return Err(LayoutError::construction("empty element range"));
        }
        crate::layout::check_axis(Axis::Element, elements.end - 1, self.layout.elements())?;
        let sub = Plane::new(elements.len(), self.layout.nodes())?;
        let range = self.layout.element_range(elements.clone(), S::LANES);
        Ok((sub, range))
    }
}

impl<S: Element, B: BufferMut<S::Scalar>> Field<S, Plane, B> {
    /// Mutable view of one element's points.
    pub fn slab_mut(&mut self, element: usize) -> LayoutResult<SlabMut<'_, S, Plane>> {
        let (sub, range) = self.plane_slab_parts(&(element..element + 1))?;
        Ok(Field::from_parts(sub, &mut self.buf.as_mut_slice()[range]))
    }
}

// ============================================================================
// Sub-structuring: extruded slabs and columns
// ============================================================================

impl<S: Element, B: Buffer<S::Scalar>> Field<S, ExtrudedLaneInner, B> {
    /// View of one element's points (all nodes, all levels).
    pub fn slab(&self, element: usize) -> LayoutResult<Slab<'_, S, ExtrudedLaneInner>> {
        let (sub, range) = self.extruded_slab_parts(element)?;
        Ok(Field::from_parts(sub, &self.buf.as_slice()[range]))
    }

    /// Vertical column view at horizontal position
    /// `(element, node_j, node_i)`.
    pub fn column(
        &self,
        element: usize,
        node_j: usize,
        node_i: usize,
    ) -> LayoutResult<Slab<'_, S, Column>> {
        let (sub, range) = self.column_parts(element, node_j, node_i)?;
        Ok(Field::from_parts(sub, &self.buf.as_slice()[range]))
    }

    fn extruded_slab_parts(
        &self,
        element: usize,
    ) -> LayoutResult<(ExtrudedLaneInner, Range<usize>)> {
        crate::layout::check_axis(Axis::Element, element, self.layout.elements())?;
        let sub = ExtrudedLaneInner::new(1, self.layout.nodes(), self.layout.levels())?;
        let per_element = self.layout.points_per_element() * S::LANES;
        let start = element * per_element;
        Ok((sub, start..start + per_element))
    }

    fn column_parts(
        &self,
        element: usize,
        node_j: usize,
        node_i: usize,
    ) -> LayoutResult<(Column, Range<usize>)> {
        let first = self.layout.point_index(element, node_j, node_i, 0)?;
        let sub = Column::new(self.layout.levels())?;
        let start = first * S::LANES;
        Ok((sub, start..start + self.layout.levels() * S::LANES))
    }
}

impl<S: Element, B: BufferMut<S::Scalar>> Field<S, ExtrudedLaneInner, B> {
    /// Mutable view of one element's points.
    pub fn slab_mut(&mut self, element: usize) -> LayoutResult<SlabMut<'_, S, ExtrudedLaneInner>> {
        let (sub, range) = self.extruded_slab_parts(element)?;
        Ok(Field::from_parts(sub, &mut self.buf.as_mut_slice()[range]))
    }

    /// Mutable vertical column view.
    pub fn column_mut(
        &mut self,
        element: usize,
        node_j: usize,
        node_i: usize,
    ) -> LayoutResult<SlabMut<'_, S, Column>> {
        let (sub, range) = self.column_parts(element, node_j, node_i)?;
        Ok(Field::from_parts(sub, &mut self.buf.as_mut_slice()[range]))
    }
}

impl<S: Element, B: Buffer<S::Scalar>> Field<S, ExtrudedLaneOuter, B> {
    /// Contiguous slice holding lane `lane` over every point, the payoff
    /// of the lane-outermost placement.
    pub fn lane_plane(&self, lane: usize) -> LayoutResult<&[S::Scalar]> {
        crate::layout::check_axis(Axis::Lane, lane, S::LANES)?;
        let points = self.layout.points();
        Ok(&self.buf.as_slice()[lane * points..(lane + 1) * points])
    }

    /// View of one element's points, sharing the backing storage.
    ///
    /// With the lane axis outermost one element's scalars form `LANES`
    /// disjoint runs, so the view strides through the parent rather than
    /// borrowing one slice. Checked eagerly.
    pub fn slab(&self, element: usize) -> LayoutResult<SlabView<'_, S, ExtrudedLaneOuter>> {
        let (first, count) = self.element_point_range(element)?;
        Ok(SlabView::new(self.layout, first, count, self.buf.as_slice()))
    }

    /// Vertical column view at horizontal position
    /// `(element, node_j, node_i)`.
    pub fn column(
        &self,
        element: usize,
        node_j: usize,
        node_i: usize,
    ) -> LayoutResult<SlabView<'_, S, ExtrudedLaneOuter>> {
        let first = self.layout.point_index(element, node_j, node_i, 0)?;
        let count = self.layout.levels();
        Ok(SlabView::new(self.layout, first, count, self.buf.as_slice()))
    }

    fn element_point_range(&self, element: usize) -> LayoutResult<(usize, usize)> {
        crate::layout::check_axis(Axis::Element, element, self.layout.elements())?;
        let per_element = self.layout.points_per_element();
        Ok((element * per_element, per_element))
    }
}

impl<S: Element, B: BufferMut<S::Scalar>> Field<S, ExtrudedLaneOuter, B> {
    /// Mutable contiguous slice holding lane `lane` over every point.
    pub fn lane_plane_mut(&mut self, lane: usize) -> LayoutResult<&mut [S::Scalar]> {
        crate::layout::check_axis(Axis::Lane, lane, S::LANES)?;
        let points = self.layout.points();
        Ok(&mut self.buf.as_mut_slice()[lane * points..(lane + 1) * points])
    }

    /// Mutable view of one element's points.
    pub fn slab_mut(
        &mut self,
        element: usize,
    ) -> LayoutResult<SlabViewMut<'_, S, ExtrudedLaneOuter>> {
        let (first, count) = self.element_point_range(element)?;
        let layout = self.layout;
        Ok(SlabViewMut::new(
            layout,
            first,
            count,
            self.buf.as_mut_slice(),
        ))
    }

    /// Mutable vertical column view.
    pub fn column_mut(
        &mut self,
        element: usize,
        node_j: usize,
        node_i: usize,
    ) -> LayoutResult<SlabViewMut<'_, S, ExtrudedLaneOuter>> {
        let first = self.layout.point_index(element, node_j, node_i, 0)?;
        let count = self.layout.levels();
        let layout = self.layout;
        Ok(SlabViewMut::new(
            layout,
            first,
            count,
            self.buf.as_mut_slice(),
        ))
    }
}

// ============================================================================
// Trait plumbing
// ============================================================================

impl<S: Element, L: Layout, B: Buffer<S::Scalar>> core::fmt::Debug for Field<S, L, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Field")
            .field("element", &S::shape().to_string())
            .field("layout", &self.layout)
            .field("len", &self.buf.len())
            .finish()
    }
}

impl<S: Element, L: Layout, B: Clone> Clone for Field<S, L, B> {
    fn clone(&self) -> Self {
        Field {
            layout: self.layout,
            buf: self.buf.clone(),
            _elem: PhantomData,
        }
    }
}

impl<S, L, B, B2> PartialEq<Field<S, L, B2>> for Field<S, L, B>
where
    S: Element,
    L: Layout,
    B: Buffer<S::Scalar>,
    B2: Buffer<S::Scalar>,
{
    fn eq(&self, other: &Field<S, L, B2>) -> bool {
        self.layout == other.layout && self.buf.as_slice() == other.buf.as_slice()
    }
}
