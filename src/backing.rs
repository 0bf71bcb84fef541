//! # Backing Storage
//!
//! The allocation seam between layouts and memory. All indexing and offset
//! arithmetic in this crate is phrased against plain scalar slices, so an
//! accelerator backend only has to supply allocation and adoption (the
//! [`Backing`] trait) while read/write access goes through the narrower
//! [`Buffer`]/[`BufferMut`] traits, which borrowed views implement too.

use crate::scalar::Scalar;

/// Read access to a contiguous run of scalars.
pub trait Buffer<F: Scalar> {
    /// The full scalar slice.
    fn as_slice(&self) -> &[F];

    /// Number of scalars.
    #[inline]
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether the buffer is empty.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Mutable access to a contiguous run of scalars.
pub trait BufferMut<F: Scalar>: Buffer<F> {
    /// The full scalar slice, mutably.
    fn as_mut_slice(&mut self) -> &mut [F];
}

/// An owned, allocatable backing store, and the accelerator hook.
///
/// A device backend substitutes its own implementation here; nothing else
/// in the crate changes, because index arithmetic never depends on the
/// buffer type.
pub trait Backing<F: Scalar>: BufferMut<F> + Sized {
    /// Allocate `len` scalars, zero-initialized.
    fn zeroed(len: usize) -> Self;

    /// Adopt an existing host vector without copying.
    fn adopt(data: Vec<F>) -> Self;
}

impl<F: Scalar> Buffer<F> for &[F] {
    #[inline(always)]
    fn as_slice(&self) -> &[F] {
        self
    }
}

impl<F: Scalar> Buffer<F> for &mut [F] {
    #[inline(always)]
    fn as_slice(&self) -> &[F] {
        self
    }
}

impl<F: Scalar> BufferMut<F> for &mut [F] {
    #[inline(always)]
    fn as_mut_slice(&mut self) -> &mut [F] {
        self
    }
}

/// Host-memory backing store over a `Vec`.
#[derive(Debug, Clone, PartialEq)]
pub struct HostBuffer<F> {
    data: Vec<F>,
}

impl<F: Scalar> HostBuffer<F> {
    /// Consume the buffer, returning the underlying vector.
    pub fn into_vec(self) -> Vec<F> {
        self.data
    }
}

impl<F: Scalar> Buffer<F> for HostBuffer<F> {
    #[inline(always)]
    fn as_slice(&self) -> &[F] {
        &self.data
    }
}

impl<F: Scalar> BufferMut<F> for HostBuffer<F> {
    #[inline(always)]
    fn as_mut_slice(&mut self) -> &mut [F] {
        &mut self.data
    }
}

impl<F: Scalar> Backing<F> for HostBuffer<F> {
    fn zeroed(len: usize) -> Self {
        HostBuffer {
            data: vec![F::zero(); len],
        }
    }

    fn adopt(data: Vec<F>) -> Self {
        HostBuffer { data }
    }
}
