use std::marker::PhantomData;

use num_traits::{Float, PrimInt, Signed};
use stoat_core::{Result, Scalar, Shape, Tensor};

use crate::algebra::{ExtendedField, Field, FloatField, IntRing, Ring};
use crate::broadcast::broadcast_tensors;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

// Elementwise dispatch - applying scalar operations across tensors.
//
// NdAlgebra wraps a scalar algebra instance and lifts it to tensors:
// unary operations walk one tensor, binary operations first align both
// operands through the broadcasting engine and then walk the unified
// index space. Every operation allocates a fresh owned output buffer;
// inputs are only ever read, and no view ever aliases the output.
//
// With the `parallel` feature the fill loop switches to rayon once the
// output is large enough to pay for the fork. Each output position is
// written by exactly one task and the per-position offset is computed
// directly from the position, so the serial and parallel paths produce
// identical buffers.

/// Outputs below this element count fill serially even with the
/// `parallel` feature enabled.
#[cfg(feature = "parallel")]
const PARALLEL_CUTOVER: usize = 16_384;

fn from_filled<T: Scalar>(shape: Shape, values: Vec<T>) -> Tensor<T> {
    Tensor::from_vec(values, shape).expect("fill length matches shape size")
}

/// Tensor-level operations over an injected scalar algebra.
///
/// The algebra instance decides what the elements can do: a [`Ring`] gets
/// `add`/`sub`/`mul`/`neg`, a [`Field`] adds `div`, an [`ExtendedField`]
/// adds `pow` and the transcendental maps. Asking for an operation the
/// algebra cannot provide is a compile-time error, not a runtime one.
pub struct NdAlgebra<T: Scalar, A> {
    scalars: A,
    _elem: PhantomData<T>,
}

impl<T: Scalar, A: Default> Default for NdAlgebra<T, A> {
    fn default() -> Self {
        NdAlgebra::new(A::default())
    }
}

impl<T: Scalar, A> NdAlgebra<T, A> {
    pub fn new(scalars: A) -> Self {
        NdAlgebra {
            scalars,
            _elem: PhantomData,
        }
    }

    /// The underlying scalar algebra.
    pub fn scalars(&self) -> &A {
        &self.scalars
    }

    /// Apply `f` to every element, into a fresh owned tensor of the same
    /// shape.
    pub fn map<F>(&self, tensor: &Tensor<T>, f: F) -> Tensor<T>
    where
        F: Fn(T) -> T + Sync,
    {
        let layout = tensor.layout();
        let guard = tensor.storage();

        #[cfg(feature = "parallel")]
        if layout.size() >= PARALLEL_CUTOVER {
            let data: Vec<T> = (0..layout.size())
                .into_par_iter()
                .map(|n| f(guard[layout.offset_of_nth(n)]))
                .collect();
            drop(guard);
            return from_filled(tensor.shape().clone(), data);
        }

        let data: Vec<T> = layout.offsets().map(|o| f(guard[o])).collect();
        drop(guard);
        from_filled(tensor.shape().clone(), data)
    }

    /// Apply `f` pairwise across two broadcast-aligned tensors, into a
    /// fresh owned tensor of the unified shape.
    ///
    /// Single-element operands fold immediately: the scalar operation runs
    /// once and the result is replicated, skipping the broadcast walk. The
    /// outcome is identical to the general path.
    pub fn zip<F>(&self, lhs: &Tensor<T>, rhs: &Tensor<T>, f: F) -> Result<Tensor<T>>
    where
        F: Fn(T, T) -> T + Sync,
    {
        if lhs.size() == 1 && rhs.size() == 1 {
            let unified = Shape::broadcast(lhs.shape(), rhs.shape())?;
            let folded = f(lhs.value()?, rhs.value()?);
            return Ok(Tensor::full(unified, folded));
        }

        let views = broadcast_tensors(&[lhs, rhs])?;
        let (lv, rv) = (&views[0], &views[1]);
        let (lhs_layout, rhs_layout) = (lv.layout(), rv.layout());
        let (lhs_guard, rhs_guard) = (lv.storage(), rv.storage());

        #[cfg(feature = "parallel")]
        if lhs_layout.size() >= PARALLEL_CUTOVER {
            let data: Vec<T> = (0..lhs_layout.size())
                .into_par_iter()
                .map(|n| {
                    f(
                        lhs_guard[lhs_layout.offset_of_nth(n)],
                        rhs_guard[rhs_layout.offset_of_nth(n)],
                    )
                })
                .collect();
            drop(lhs_guard);
            drop(rhs_guard);
            return Ok(from_filled(lv.shape().clone(), data));
        }

        let data: Vec<T> = lhs_layout
            .offsets()
            .zip(rhs_layout.offsets())
            .map(|(a, b)| f(lhs_guard[a], rhs_guard[b]))
            .collect();
        drop(lhs_guard);
        drop(rhs_guard);
        Ok(from_filled(lv.shape().clone(), data))
    }
}

impl<T: Scalar, A: Ring<T>> NdAlgebra<T, A> {
    /// A tensor of zeros.
    pub fn zeros(&self, shape: impl Into<Shape>) -> Tensor<T> {
        Tensor::full(shape, self.scalars.zero())
    }

    /// A tensor of ones.
    pub fn ones(&self, shape: impl Into<Shape>) -> Tensor<T> {
        Tensor::full(shape, self.scalars.one())
    }

    /// Elementwise addition with broadcasting.
    pub fn add(&self, lhs: &Tensor<T>, rhs: &Tensor<T>) -> Result<Tensor<T>> {
        self.zip(lhs, rhs, |a, b| self.scalars.add(a, b))
    }

    /// Elementwise subtraction with broadcasting.
    pub fn sub(&self, lhs: &Tensor<T>, rhs: &Tensor<T>) -> Result<Tensor<T>> {
        self.zip(lhs, rhs, |a, b| self.scalars.sub(a, b))
    }

    /// Elementwise multiplication with broadcasting.
    pub fn mul(&self, lhs: &Tensor<T>, rhs: &Tensor<T>) -> Result<Tensor<T>> {
        self.zip(lhs, rhs, |a, b| self.scalars.mul(a, b))
    }

    /// Elementwise negation.
    pub fn neg(&self, tensor: &Tensor<T>) -> Tensor<T> {
        self.map(tensor, |v| self.scalars.neg(v))
    }

    /// Add a scalar to every element.
    pub fn add_scalar(&self, tensor: &Tensor<T>, value: T) -> Tensor<T> {
        self.map(tensor, |v| self.scalars.add(v, value))
    }

    /// Multiply every element by a scalar.
    pub fn mul_scalar(&self, tensor: &Tensor<T>, value: T) -> Tensor<T> {
        self.map(tensor, |v| self.scalars.mul(v, value))
    }
}

impl<T: Scalar, A: Field<T>> NdAlgebra<T, A> {
    /// Elementwise division with broadcasting.
    pub fn div(&self, lhs: &Tensor<T>, rhs: &Tensor<T>) -> Result<Tensor<T>> {
        self.zip(lhs, rhs, |a, b| self.scalars.div(a, b))
    }
}

impl<T: Scalar, A: ExtendedField<T>> NdAlgebra<T, A> {
    /// Elementwise power with broadcasting.
    pub fn pow(&self, base: &Tensor<T>, exponent: &Tensor<T>) -> Result<Tensor<T>> {
        self.zip(base, exponent, |a, b| self.scalars.pow(a, b))
    }

    /// Elementwise exponential.
    pub fn exp(&self, tensor: &Tensor<T>) -> Tensor<T> {
        self.map(tensor, |v| self.scalars.exp(v))
    }

    /// Elementwise natural logarithm.
    pub fn ln(&self, tensor: &Tensor<T>) -> Tensor<T> {
        self.map(tensor, |v| self.scalars.ln(v))
    }

    /// Elementwise square root.
    pub fn sqrt(&self, tensor: &Tensor<T>) -> Tensor<T> {
        self.map(tensor, |v| self.scalars.sqrt(v))
    }

    /// Elementwise sine.
    pub fn sin(&self, tensor: &Tensor<T>) -> Tensor<T> {
        self.map(tensor, |v| self.scalars.sin(v))
    }

    /// Elementwise cosine.
    pub fn cos(&self, tensor: &Tensor<T>) -> Tensor<T> {
        self.map(tensor, |v| self.scalars.cos(v))
    }

    /// Elementwise tangent.
    pub fn tan(&self, tensor: &Tensor<T>) -> Tensor<T> {
        self.map(tensor, |v| self.scalars.tan(v))
    }
}

/// The elementwise algebra of any floating-point element type.
pub fn float_algebra<T: Scalar + Float>() -> NdAlgebra<T, FloatField<T>> {
    NdAlgebra::new(FloatField::new())
}

/// The elementwise algebra of any signed integer element type.
pub fn int_algebra<T: Scalar + PrimInt + Signed>() -> NdAlgebra<T, IntRing<T>> {
    NdAlgebra::new(IntRing::new())
}
