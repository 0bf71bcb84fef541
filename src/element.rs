//! # Element Types: Recursive Decomposition and Pack/Unpack
//!
//! An element type is a fixed-shape value built from one base scalar type
//! and nested aggregates of it. [`Element`] decomposes such a type, at
//! compile time, into a flat sequence of numeric lanes:
//!
//! - `LANES` is the total leaf count, a monomorphized constant.
//! - Within an aggregate, member `k` starts at the sum of the lane counts
//!   of members `0..k`; offsets fall out of the recursion, no table is
//!   stored at runtime.
//! - [`Element::read`] and [`Element::write`] are the pack/unpack hot path:
//!   compile-time-unrolled recursion over the decomposition, inlineable,
//!   branch-free for a statically known element type. `read` constructs
//!   values by direct field initialization, never through user
//!   constructors.
//!
//! The base scalar type is the associated [`Element::Scalar`]; an aggregate
//! mixing `f32` and `f64` leaves has no consistent associated type and
//! fails to implement `Element`: the mixed-base-type error is a compile
//! error, before any instance exists.
//!
//! User records are declared through [`soa_element!`](crate::soa_element),
//! which generates the struct, its `Element` impl, and named lane-range
//! accessors for typed projection.

use core::marker::PhantomData;

use crate::layout::LaneSlot;
use crate::scalar::Scalar;
use crate::shape::TypeShape;

/// A value type packable into a struct-of-arrays layout.
///
/// Implementors are `f32`/`f64` themselves, fixed-size arrays and tuples
/// of elements sharing one scalar, [`Complex`](crate::Complex), and
/// records generated by [`soa_element!`](crate::soa_element).
pub trait Element: Copy + 'static {
    /// The single base floating-point type of every leaf.
    type Scalar: Scalar;

    /// Total number of leaf numeric lanes.
    const LANES: usize;

    /// Unpack one value from `buf` at `slot`. Leaf `k` of the
    /// decomposition is read from `slot.lane(k)`.
    fn read(buf: &[Self::Scalar], slot: LaneSlot) -> Self;

    /// Pack `self` into `buf` at `slot`, the dual of [`Element::read`].
    fn write(self, buf: &mut [Self::Scalar], slot: LaneSlot);

    /// Runtime structural descriptor. Must satisfy
    /// `Self::shape().lanes() == Self::LANES`.
    fn shape() -> TypeShape;
}

// ============================================================================
// Leaf scalars
// ============================================================================

macro_rules! impl_scalar_element {
    ($($ty:ty),+) => {
        $(
            impl Element for $ty {
                type Scalar = $ty;
                const LANES: usize = 1;

                #[inline(always)]
                fn read(buf: &[$ty], slot: LaneSlot) -> Self {
                    buf[slot.base]
                }

                #[inline(always)]
                fn write(self, buf: &mut [$ty], slot: LaneSlot) {
                    buf[slot.base] = self;
                }

                fn shape() -> TypeShape {
                    TypeShape::Leaf(<$ty as Scalar>::KIND)
                }
            }
        )+
    };
}

impl_scalar_element!(f32, f64);

// ============================================================================
// Zero-sized aggregates
// ============================================================================

impl<F: Scalar> Element for PhantomData<F> {
    type Scalar = F;
    const LANES: usize = 0;

    #[inline(always)]
    fn read(_buf: &[F], _slot: LaneSlot) -> Self {
        PhantomData
    }

    #[inline(always)]
    fn write(self, _buf: &mut [F], _slot: LaneSlot) {}

    fn shape() -> TypeShape {
        TypeShape::Unit
    }
}

// ============================================================================
// Fixed-size arrays
// ============================================================================

impl<S: Element, const K: usize> Element for [S; K] {
    type Scalar = S::Scalar;
    const LANES: usize = S::LANES * K;

    #[inline(always)]
    fn read(buf: &[S::Scalar], slot: LaneSlot) -> Self {
        core::array::from_fn(|i| S::read(buf, slot.skip(i * S::LANES)))
    }

    #[inline(always)]
    fn write(self, buf: &mut [S::Scalar], slot: LaneSlot) {
        for (i, member) in self.into_iter().enumerate() {
            member.write(buf, slot.skip(i * S::LANES));
        }
    }

    fn shape() -> TypeShape {
        TypeShape::Array {
            len: K,
            elem: Box::new(S::shape()),
        }
    }
}

// ============================================================================
// Tuples
// ============================================================================

macro_rules! impl_tuple_element {
    ($first:ident $(, $rest:ident)+) => {
        impl<$first: Element $(, $rest)+> Element for ($first, $($rest),+)
        where
            $($rest: Element<Scalar = <$first as Element>::Scalar>),+
        {
            type Scalar = <$first as Element>::Scalar;
            const LANES: usize =
                <$first as Element>::LANES $(+ <$rest as Element>::LANES)+;

            #[inline(always)]
            #[allow(non_snake_case)]
            fn read(buf: &[Self::Scalar], slot: LaneSlot) -> Self {
                let mut lane = 0usize;
                let $first = <$first as Element>::read(buf, slot);
                lane += <$first as Element>::LANES;
                $(
                    let $rest = <$rest as Element>::read(buf, slot.skip(lane));
                    lane += <$rest as Element>::LANES;
                )+
                let _ = lane;
                ($first, $($rest),+)
            }

            #[inline(always)]
            #[allow(non_snake_case)]
            fn write(self, buf: &mut [Self::Scalar], slot: LaneSlot) {
                let ($first, $($rest),+) = self;
                let mut lane = 0usize;
                <$first as Element>::write($first, buf, slot);
                lane += <$first as Element>::LANES;
                $(
                    <$rest as Element>::write($rest, buf, slot.skip(lane));
                    lane += <$rest as Element>::LANES;
                )+
                let _ = lane;
            }

            fn shape() -> TypeShape {
                TypeShape::Tuple(vec![
                    <$first as Element>::shape(),
                    $(<$rest as Element>::shape()),+
                ])
            }
        }
    };
}

impl_tuple_element!(A, B);
impl_tuple_element!(A, B, C);
impl_tuple_element!(A, B, C, D);
impl_tuple_element!(A, B, C, D, E);
impl_tuple_element!(A, B, C, D, E, G);
impl_tuple_element!(A, B, C, D, E, G, H);
impl_tuple_element!(A, B, C, D, E, G, H, I);

// ============================================================================
// Record declaration macro
// ============================================================================

/// Declares a named record element type.
///
/// Generates the struct (generic over its [`Scalar`]), the [`Element`]
/// impl with compile-time lane offsets in field declaration order, and a
/// `lanes_of(name)` accessor returning the lane range of a field for typed
/// projection. Values are reconstructed by direct field initialization;
/// any validating constructor the user adds separately is bypassed by the
/// packing engine.
///
/// ```
/// use gridflow::soa_element;
///
/// soa_element! {
///     /// Horizontal wind components.
///     pub struct Wind<F> {
///         pub u: F,
///         pub v: F,
///     }
/// }
///
/// assert_eq!(<Wind<f64> as gridflow::Element>::LANES, 2);
/// assert_eq!(Wind::<f64>::lanes_of("v"), Some(1..2));
/// ```
#[macro_export]
macro_rules! soa_element {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident<$f:ident> {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $fty:ty ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq)]
        $vis struct $name<$f: $crate::Scalar> {
            $( $(#[$fmeta])* $fvis $field : $fty, )+
        }

        impl<$f: $crate::Scalar> $crate::Element for $name<$f> {
            type Scalar = $f;
            const LANES: usize = 0 $(+ <$fty as $crate::Element>::LANES)+;

            #[inline(always)]
            fn read(buf: &[$f], slot: $crate::LaneSlot) -> Self {
                let mut lane = 0usize;
                $(
                    let $field = <$fty as $crate::Element>::read(buf, slot.skip(lane));
                    lane += <$fty as $crate::Element>::LANES;
                )+
                let _ = lane;
                Self { $($field),+ }
            }

            #[inline(always)]
            fn write(self, buf: &mut [$f], slot: $crate::LaneSlot) {
                let mut lane = 0usize;
                $(
                    <$fty as $crate::Element>::write(self.$field, buf, slot.skip(lane));
                    lane += <$fty as $crate::Element>::LANES;
                )+
                let _ = lane;
            }

            fn shape() -> $crate::TypeShape {
                $crate::TypeShape::Record {
                    name: stringify!($name),
                    fields: vec![
                        $( (stringify!($field), <$fty as $crate::Element>::shape()) ),+
                    ],
                }
            }
        }

        impl<$f: $crate::Scalar> $name<$f> {
            /// Lane range occupied by the named field, in declaration
            /// order, for use with typed projection.
            $vis fn lanes_of(field: &str) -> Option<::core::ops::Range<usize>> {
                let mut lane = 0usize;
                $(
                    if field == stringify!($field) {
                        return Some(lane..lane + <$fty as $crate::Element>::LANES);
                    }
                    lane += <$fty as $crate::Element>::LANES;
                )+
                let _ = lane;
                None
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::ScalarKind;

    fn packed(slot_stride: usize) -> LaneSlot {
        LaneSlot {
            base: 0,
            stride: slot_stride,
        }
    }

    #[test]
    fn scalar_reads_a_single_lane() {
        let buf = [7.5f64, 1.0];
        assert_eq!(f64::read(&buf, packed(1)), 7.5);
    }

    #[test]
    fn tuple_lanes_are_declaration_ordered() {
        let buf = [1.0f64, 2.0, 3.0];
        let v = <(f64, (f64, f64))>::read(&buf, packed(1));
        assert_eq!(v, (1.0, (2.0, 3.0)));
        assert_eq!(<(f64, (f64, f64))>::LANES, 3);
    }

    #[test]
    fn strided_slot_reads_every_kth_lane() {
        // Lane-outer style storage: leaves of one point are stride apart.
        let buf = [1.0f64, 9.0, 2.0, 9.0, 3.0, 9.0];
        let v = <[f64; 3]>::read(&buf, packed(2));
        assert_eq!(v, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn write_is_the_dual_of_read() {
        let mut buf = [0.0f64; 4];
        (4.0, [5.0, 6.0], 7.0).write(&mut buf, packed(1));
        assert_eq!(buf, [4.0, 5.0, 6.0, 7.0]);
        assert_eq!(<(f64, [f64; 2], f64)>::read(&buf, packed(1)), (4.0, [5.0, 6.0], 7.0));
    }

    #[test]
    fn phantom_members_occupy_no_lanes() {
        assert_eq!(<(f64, PhantomData<f64>, f64)>::LANES, 2);
        let buf = [1.0f64, 2.0];
        let (a, _, b) = <(f64, PhantomData<f64>, f64)>::read(&buf, packed(1));
        assert_eq!((a, b), (1.0, 2.0));
    }

    #[test]
    fn shapes_agree_with_lane_counts() {
        assert_eq!(<(f32, [f32; 4])>::shape().lanes(), <(f32, [f32; 4])>::LANES);
        assert_eq!(
            f32::shape(),
            TypeShape::Leaf(ScalarKind::F32)
        );
    }

    soa_element! {
        /// A moist-thermodynamic test record.
        pub struct Thermo<F> {
            pub density: F,
            pub momentum: [F; 2],
            pub energy: F,
        }
    }

    #[test]
    fn record_offsets_follow_declaration_order() {
        assert_eq!(Thermo::<f64>::LANES, 4);
        assert_eq!(Thermo::<f64>::lanes_of("density"), Some(0..1));
        assert_eq!(Thermo::<f64>::lanes_of("momentum"), Some(1..3));
        assert_eq!(Thermo::<f64>::lanes_of("energy"), Some(3..4));
        assert_eq!(Thermo::<f64>::lanes_of("entropy"), None);
    }

    #[test]
    fn record_round_trips_through_a_buffer() {
        let v = Thermo {
            density: 1.2f64,
            momentum: [3.0, 4.0],
            energy: 5.0,
        };
        let mut buf = [0.0f64; 4];
        v.write(&mut buf, packed(1));
        assert_eq!(buf, [1.2, 3.0, 4.0, 5.0]);
        assert_eq!(Thermo::read(&buf, packed(1)), v);
    }

    #[test]
    fn record_shape_carries_field_names() {
        match Thermo::<f32>::shape() {
            TypeShape::Record { name, fields } => {
                assert_eq!(name, "Thermo");
                assert_eq!(fields[0].0, "density");
                assert_eq!(fields[1].0, "momentum");
                assert_eq!(fields[2].0, "energy");
            }
            other => panic!("expected a record shape, got {other:?}"),
        }
    }
}
