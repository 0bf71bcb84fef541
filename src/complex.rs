//! # Complex Elements
//!
//! A two-lane complex number over the base scalar. Mixed complex/scalar
//! arithmetic follows the usual embedding of the reals: a scalar operand
//! touches only the real lane.

use core::ops::{Add, Mul, Neg, Sub};

use crate::element::Element;
use crate::layout::LaneSlot;
use crate::scalar::Scalar;
use crate::shape::TypeShape;

/// Complex number element: lane 0 is the real part, lane 1 the imaginary.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Complex<F: Scalar> {
    /// Real part.
    pub re: F,
    /// Imaginary part.
    pub im: F,
}

impl<F: Scalar> Complex<F> {
    /// Construct from real and imaginary parts.
    #[inline(always)]
    pub fn new(re: F, im: F) -> Self {
        Complex { re, im }
    }

    /// The complex conjugate.
    #[inline(always)]
    pub fn conj(self) -> Self {
        Complex {
            re: self.re,
            im: -self.im,
        }
    }

    /// Squared magnitude `re² + im²`.
    #[inline(always)]
    pub fn abs2(self) -> F {
        self.re * self.re + self.im * self.im
    }
}

impl<F: Scalar> Element for Complex<F> {
    type Scalar = F;
    const LANES: usize = 2;

    #[inline(always)]
    fn read(buf: &[F], slot: LaneSlot) -> Self {
        Complex {
            re: buf[slot.lane(0)],
            im: buf[slot.lane(1)],
        }
    }

    #[inline(always)]
    fn write(self, buf: &mut [F], slot: LaneSlot) {
        buf[slot.lane(0)] = self.re;
        buf[slot.lane(1)] = self.im;
    }

    fn shape() -> TypeShape {
        TypeShape::Record {
            name: "Complex",
            fields: vec![
                ("re", TypeShape::Leaf(F::KIND)),
                ("im", TypeShape::Leaf(F::KIND)),
            ],
        }
    }
}

impl<F: Scalar> Add for Complex<F> {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Complex {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl<F: Scalar> Sub for Complex<F> {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Complex {
            re: self.re - rhs.re,
            im: self.im - rhs.im,
        }
    }
}

impl<F: Scalar> Mul for Complex<F> {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Complex {
            re: self.re * rhs.re - self.im * rhs.im,
            im: self.re * rhs.im + self.im * rhs.re,
        }
    }
}

impl<F: Scalar> Neg for Complex<F> {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Complex {
            re: -self.re,
            im: -self.im,
        }
    }
}

// Scalar operands touch only the real lane (addition/subtraction) or scale
// both lanes (multiplication).

impl<F: Scalar> Add<F> for Complex<F> {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: F) -> Self {
        Complex {
            re: self.re + rhs,
            im: self.im,
        }
    }
}

impl<F: Scalar> Sub<F> for Complex<F> {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: F) -> Self {
        Complex {
            re: self.re - rhs,
            im: self.im,
        }
    }
}

impl<F: Scalar> Mul<F> for Complex<F> {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: F) -> Self {
        Complex {
            re: self.re * rhs,
            im: self.im * rhs,
        }
    }
}
