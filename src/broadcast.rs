//! # Broadcasting Engine
//!
//! Deferred elementwise computation over packed fields. Building an
//! expression allocates nothing and computes nothing: combinators are
//! plain value types capturing their operands, so the expression's *type*
//! is the compute graph. Evaluation walks the shared iteration space once,
//! unpacking operands and packing results through the element
//! decomposition, with no intermediate structured storage.
//!
//! Shape discipline: every container operand must agree on the layout
//! (variant and extents); scalars and [`Splat`] constants broadcast to any
//! shape. Disagreement surfaces as [`LayoutError::ShapeMismatch`] when the
//! expression's extents are resolved: at materialization, before any
//! write occurs.
//!
//! Aliasing between a materialization destination and a source is ruled
//! out structurally: the destination is `&mut` while sources are borrowed
//! shared, so Rust's borrow rules refuse the overlap at compile time.

use crate::backing::BufferMut;
use crate::element::Element;
use crate::error::{LayoutError, LayoutResult};
use crate::field::Field;
use crate::layout::Layout;
use crate::view::{FieldView, FieldViewMut};

/// A deferred elementwise expression over layout `L`.
///
/// `extents` resolves the iteration space: `Some(layout)` once any
/// container operand is involved, `None` for pure-constant expressions,
/// and a shape-mismatch error when container operands disagree.
pub trait Broadcast<L: Layout> {
    /// Element type this expression produces per point.
    type Elem: Element;

    /// Resolve the expression's layout, validating operand agreement.
    fn extents(&self) -> LayoutResult<Option<L>>;

    /// Evaluate at canonical point `point`. Pure and
    /// coordinate-independent: no two points observe each other.
    fn eval_at(&self, point: usize) -> Self::Elem;
}

/// Merge the extents of two sub-expressions, failing on disagreement.
fn merge_extents<L: Layout>(a: Option<L>, b: Option<L>) -> LayoutResult<Option<L>> {
    match (a, b) {
        (Some(left), Some(right)) if left != right => {
            Err(LayoutError::shape_mismatch(left, right))
        }
        (Some(layout), _) | (_, Some(layout)) => Ok(Some(layout)),
        (None, None) => Ok(None),
    }
}

// ============================================================================
// Sources
// ============================================================================

impl<S, L, B> Broadcast<L> for &Field<S, L, B>
where
    S: Element,
    L: Layout,
    B: crate::backing::Buffer<S::Scalar>,
{
    type Elem = S;

    fn extents(&self) -> LayoutResult<Option<L>> {
        Ok(Some(*self.layout()))
    }

    #[inline(always)]
    fn eval_at(&self, point: usize) -> S {
        self.get_unchecked(point)
    }
}

impl<T, L> Broadcast<L> for FieldView<'_, T, L>
where
    T: Element,
    L: Layout,
{
    type Elem = T;

    fn extents(&self) -> LayoutResult<Option<L>> {
        Ok(Some(*self.layout()))
    }

    #[inline(always)]
    fn eval_at(&self, point: usize) -> T {
        self.get_unchecked(point)
    }
}

/// A constant operand broadcast to every point.
#[derive(Clone, Copy, Debug)]
pub struct Splat<S>(pub S);

impl<S: Element, L: Layout> Broadcast<L> for Splat<S> {
    type Elem = S;

    fn extents(&self) -> LayoutResult<Option<L>> {
        Ok(None)
    }

    #[inline(always)]
    fn eval_at(&self, _point: usize) -> S {
        self.0
    }
}

// Bare scalar literals are constant operands, so `&field + 1.0` reads the
// way the physics is written.
macro_rules! impl_scalar_broadcast {
    ($($ty:ty),+) => {
        $(
            impl<L: Layout> Broadcast<L> for $ty {
                type Elem = $ty;

                fn extents(&self) -> LayoutResult<Option<L>> {
                    Ok(None)
                }

                #[inline(always)]
                fn eval_at(&self, _point: usize) -> $ty {
                    *self
                }
            }
        )+
    };
}

impl_scalar_broadcast!(f32, f64);

// ============================================================================
// Combinators
// ============================================================================

/// Apply a pure function to each evaluated element.
#[derive(Clone, Copy, Debug)]
pub struct Map<E, F> {
    expr: E,
    f: F,
}

impl<L, E, F, Out> Broadcast<L> for Map<E, F>
where
    L: Layout,
    E: Broadcast<L>,
    F: Fn(E::Elem) -> Out,
    Out: Element,
{
    type Elem = Out;

    fn extents(&self) -> LayoutResult<Option<L>> {
        self.expr.extents()
    }

    #[inline(always)]
    fn eval_at(&self, point: usize) -> Out {
        (self.f)(self.expr.eval_at(point))
    }
}

/// Pair two expressions pointwise. N-ary broadcasting is nested zips;
/// the paired element is a tuple element, so `zip(a, b).map(|(x, y)| …)`
/// stays inside the element machinery.
#[derive(Clone, Copy, Debug)]
pub struct Zip<A, B> {
    left: A,
    right: B,
}

impl<L, A, B> Broadcast<L> for Zip<A, B>
where
    L: Layout,
    A: Broadcast<L>,
    B: Broadcast<L>,
    B::Elem: Element<Scalar = <A::Elem as Element>::Scalar>,
{
    type Elem = (A::Elem, B::Elem);

    fn extents(&self) -> LayoutResult<Option<L>> {
        merge_extents(self.left.extents()?, self.right.extents()?)
    }

    #[inline(always)]
    fn eval_at(&self, point: usize) -> Self::Elem {
        (self.left.eval_at(point), self.right.eval_at(point))
    }
}

// ============================================================================
// Arithmetic nodes
// ============================================================================

macro_rules! define_binary_node {
    ($name:ident, $trait:ident, $method:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug)]
        pub struct $name<A, B>(pub A, pub B);

        impl<L, A, B> Broadcast<L> for $name<A, B>
        where
            L: Layout,
            A: Broadcast<L>,
            B: Broadcast<L>,
            A::Elem: core::ops::$trait<B::Elem>,
            <A::Elem as core::ops::$trait<B::Elem>>::Output: Element,
        {
            type Elem = <A::Elem as core::ops::$trait<B::Elem>>::Output;

            fn extents(&self) -> LayoutResult<Option<L>> {
                merge_extents(self.0.extents()?, self.1.extents()?)
            }

            #[inline(always)]
            fn eval_at(&self, point: usize) -> Self::Elem {
                core::ops::$trait::$method(self.0.eval_at(point), self.1.eval_at(point))
            }
        }
    };
}

define_binary_node!(Sum, Add, add, "Pointwise addition: `L + R`.");
define_binary_node!(Diff, Sub, sub, "Pointwise subtraction: `L - R`.");
define_binary_node!(Prod, Mul, mul, "Pointwise multiplication: `L * R`.");

/// Pointwise negation: `-E`.
#[derive(Clone, Copy, Debug)]
pub struct Negate<E>(pub E);

impl<L, E> Broadcast<L> for Negate<E>
where
    L: Layout,
    E: Broadcast<L>,
    E::Elem: core::ops::Neg,
    <E::Elem as core::ops::Neg>::Output: Element,
{
    type Elem = <E::Elem as core::ops::Neg>::Output;

    fn extents(&self) -> LayoutResult<Option<L>> {
        self.0.extents()
    }

    #[inline(always)]
    fn eval_at(&self, point: usize) -> Self::Elem {
        -self.0.eval_at(point)
    }
}

// Operator sugar on sources and combinators. Fields and views get the
// same treatment so sub-structures compose like whole containers.

macro_rules! impl_expr_ops {
    ($ty:ty ; $($generics:tt)*) => {
        impl<$($generics)* R> core::ops::Add<R> for $ty {
            type Output = Sum<Self, R>;
            fn add(self, rhs: R) -> Self::Output {
                Sum(self, rhs)
            }
        }

        impl<$($generics)* R> core::ops::Sub<R> for $ty {
            type Output = Diff<Self, R>;
            fn sub(self, rhs: R) -> Self::Output {
                Diff(self, rhs)
            }
        }

        impl<$($generics)* R> core::ops::Mul<R> for $ty {
            type Output = Prod<Self, R>;
            fn mul(self, rhs: R) -> Self::Output {
                Prod(self, rhs)
            }
        }

        impl<$($generics)*> core::ops::Neg for $ty {
            type Output = Negate<Self>;
            fn neg(self) -> Self::Output {
                Negate(self)
            }
        }
    };
}

impl_expr_ops!(&'f Field<S, L, B> ; 'f, S: Element, L, B,);
impl_expr_ops!(FieldView<'f, T, L> ; 'f, T: Element, L,);
impl_expr_ops!(Splat<S> ; S,);
impl_expr_ops!(Map<E, F> ; E, F,);
impl_expr_ops!(Zip<A, B> ; A, B,);
impl_expr_ops!(Sum<A, B> ; A, B,);
impl_expr_ops!(Diff<A, B> ; A, B,);
impl_expr_ops!(Prod<A, B> ; A, B,);
impl_expr_ops!(Negate<E> ; E,);

// ============================================================================
// Materialization
// ============================================================================

/// A caller-provided destination for in-place materialization.
///
/// Implemented by fields over mutable backing and by mutable lane
/// projections, so an expression can evaluate straight into one lane of a
/// packed record as easily as into a whole container.
pub trait BroadcastDest<L: Layout> {
    /// Element type accepted per point.
    type Elem: Element;

    /// The destination's layout, validated against the expression's
    /// extents before any write.
    fn dest_layout(&self) -> L;

    /// Pack `value` at canonical point `point`. The iteration space was
    /// already validated against [`BroadcastDest::dest_layout`].
    fn put(&mut self, point: usize, value: Self::Elem);
}

impl<S, L, B> BroadcastDest<L> for Field<S, L, B>
where
    S: Element,
    L: Layout,
    B: BufferMut<S::Scalar>,
{
    type Elem = S;

    fn dest_layout(&self) -> L {
        *self.layout()
    }

    #[inline(always)]
    fn put(&mut self, point: usize, value: S) {
        self.set_unchecked(point, value);
    }
}

impl<T, L> BroadcastDest<L> for FieldViewMut<'_, T, L>
where
    T: Element,
    L: Layout,
{
    type Elem = T;

    fn dest_layout(&self) -> L {
        *self.layout()
    }

    #[inline(always)]
    fn put(&mut self, point: usize, value: T) {
        self.set_unchecked(point, value);
    }
}

/// Fluent expression building and evaluation.
///
/// Blanket-implemented for every [`Broadcast`] expression.
pub trait BroadcastExt<L: Layout>: Broadcast<L> + Sized {
    /// Apply a pure function to each element.
    fn map<Out, F>(self, f: F) -> Map<Self, F>
    where
        F: Fn(Self::Elem) -> Out,
        Out: Element,
    {
        Map { expr: self, f }
    }

    /// Pair with another expression pointwise.
    fn zip<R>(self, right: R) -> Zip<Self, R>
    where
        R: Broadcast<L>,
    {
        Zip { left: self, right }
    }

    /// Evaluate into a freshly allocated field.
    ///
    /// Fails with a shape mismatch when container operands disagree and
    /// with a construction error when the expression has no container
    /// operand to take extents from.
    fn materialize(&self) -> LayoutResult<Field<Self::Elem, L>> {
        let layout = self.extents()?.ok_or_else(|| {
            LayoutError::construction("cannot materialize an expression with no container operand")
        })?;
        log::trace!(
            "materializing into fresh field: layout={layout:?} lanes={}",
            Self::Elem::LANES
        );
        let mut dest = Field::<Self::Elem, L>::zeroed(layout);
        self.write_into(&mut dest, layout);
        Ok(dest)
    }

    /// Evaluate into an existing destination without allocating.
    ///
    /// The destination extents must match the expression's exactly. Any
    /// [`BroadcastDest`] works: a whole field, a borrowed slab, or a
    /// mutable lane projection.
    fn materialize_into<D>(&self, dest: &mut D) -> LayoutResult<()>
    where
        D: BroadcastDest<L, Elem = Self::Elem>,
    {
        let dest_layout = dest.dest_layout();
        if let Some(layout) = self.extents()? {
            if layout != dest_layout {
                return Err(LayoutError::shape_mismatch(layout, dest_layout));
            }
        }
        self.write_into(dest, dest_layout);
        Ok(())
    }

    /// Shared evaluation loop. Extents are already validated.
    #[doc(hidden)]
    fn write_into<D>(&self, dest: &mut D, layout: L)
    where
        D: BroadcastDest<L, Elem = Self::Elem>,
    {
        for p in 0..layout.points() {
            dest.put(p, self.eval_at(p));
        }
    }
}

impl<L: Layout, E: Broadcast<L>> BroadcastExt<L> for E {}

/// Evaluate two independent expressions over one shared iteration space
/// in a single fused pass.
///
/// Semantically identical to materializing them sequentially; the fusion
/// only walks the iteration space once. Both destinations and both
/// expressions must agree on the layout.
pub fn materialize_both<L, E1, E2, D1, D2>(
    first: (&mut D1, &E1),
    second: (&mut D2, &E2),
) -> LayoutResult<()>
where
    L: Layout,
    E1: Broadcast<L>,
    E2: Broadcast<L>,
    D1: BroadcastDest<L, Elem = E1::Elem>,
    D2: BroadcastDest<L, Elem = E2::Elem>,
{
    let (dest1, expr1) = first;
    let (dest2, expr2) = second;
    let layout = dest1.dest_layout();
    if dest2.dest_layout() != layout {
        return Err(LayoutError::shape_mismatch(layout, dest2.dest_layout()));
    }
    if let Some(expr_layout) = expr1.extents()? {
        if expr_layout != layout {
            return Err(LayoutError::shape_mismatch(expr_layout, layout));
        }
    }
    if let Some(expr_layout) = expr2.extents()? {
        if expr_layout != layout {
            return Err(LayoutError::shape_mismatch(expr_layout, layout));
        }
    }

    for p in 0..layout.points() {
        dest1.put(p, expr1.eval_at(p));
        dest2.put(p, expr2.eval_at(p));
    }
    Ok(())
}

/// Convenience constructor for a constant operand.
pub fn splat<S: Element>(value: S) -> Splat<S> {
    Splat(value)
}
