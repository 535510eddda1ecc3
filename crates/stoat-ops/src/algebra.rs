use std::marker::PhantomData;

use num_traits::{Float, PrimInt, Signed};
use stoat_core::Scalar;

// Scalar algebras - the capability objects behind every tensor operation.
//
// The dispatcher never computes on scalars itself; it is handed an algebra
// instance and calls through it. Capabilities are tiered the way the math
// is tiered:
//
//   Ring          zero/one, add/sub/mul, negation
//   Field         Ring + division
//   ExtendedField Field + power and the transcendental functions
//
// An operation asks for the weakest tier it needs, so integer elements get
// the full elementwise machinery for add/mul while division and exp stay
// compile-time errors for them. Instances are zero-sized and passed by
// value at the call site; everything monomorphizes.

/// Additive and multiplicative structure over a scalar type.
pub trait Ring<T: Scalar>: Send + Sync {
    fn zero(&self) -> T;
    fn one(&self) -> T;
    fn add(&self, lhs: T, rhs: T) -> T;
    fn sub(&self, lhs: T, rhs: T) -> T;
    fn mul(&self, lhs: T, rhs: T) -> T;
    fn neg(&self, value: T) -> T;
}

/// A ring with division.
pub trait Field<T: Scalar>: Ring<T> {
    fn div(&self, lhs: T, rhs: T) -> T;
}

/// A field with power and transcendental operations.
pub trait ExtendedField<T: Scalar>: Field<T> {
    fn pow(&self, base: T, exponent: T) -> T;
    fn exp(&self, value: T) -> T;
    fn ln(&self, value: T) -> T;
    fn sqrt(&self, value: T) -> T;
    fn sin(&self, value: T) -> T;
    fn cos(&self, value: T) -> T;
    fn tan(&self, value: T) -> T;
}

/// The extended field of any floating-point element type.
///
/// Works for `f32`/`f64` and for the `half` types through their num-traits
/// support.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FloatField<T> {
    _marker: PhantomData<T>,
}

impl<T> FloatField<T> {
    pub const fn new() -> Self {
        FloatField {
            _marker: PhantomData,
        }
    }
}

impl<T: Scalar + Float> Ring<T> for FloatField<T> {
    fn zero(&self) -> T {
        T::zero()
    }
    fn one(&self) -> T {
        T::one()
    }
    fn add(&self, lhs: T, rhs: T) -> T {
        lhs + rhs
    }
    fn sub(&self, lhs: T, rhs: T) -> T {
        lhs - rhs
    }
    fn mul(&self, lhs: T, rhs: T) -> T {
        lhs * rhs
    }
    fn neg(&self, value: T) -> T {
        -value
    }
}

impl<T: Scalar + Float> Field<T> for FloatField<T> {
    fn div(&self, lhs: T, rhs: T) -> T {
        lhs / rhs
    }
}

impl<T: Scalar + Float> ExtendedField<T> for FloatField<T> {
    fn pow(&self, base: T, exponent: T) -> T {
        base.powf(exponent)
    }
    fn exp(&self, value: T) -> T {
        value.exp()
    }
    fn ln(&self, value: T) -> T {
        value.ln()
    }
    fn sqrt(&self, value: T) -> T {
        value.sqrt()
    }
    fn sin(&self, value: T) -> T {
        value.sin()
    }
    fn cos(&self, value: T) -> T {
        value.cos()
    }
    fn tan(&self, value: T) -> T {
        value.tan()
    }
}

/// The ring of a signed integer element type. No division tier: integer
/// division truncates, which is not the field contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntRing<T> {
    _marker: PhantomData<T>,
}

impl<T> IntRing<T> {
    pub const fn new() -> Self {
        IntRing {
            _marker: PhantomData,
        }
    }
}

impl<T: Scalar + PrimInt + Signed> Ring<T> for IntRing<T> {
    fn zero(&self) -> T {
        T::zero()
    }
    fn one(&self) -> T {
        T::one()
    }
    fn add(&self, lhs: T, rhs: T) -> T {
        lhs + rhs
    }
    fn sub(&self, lhs: T, rhs: T) -> T {
        lhs - rhs
    }
    fn mul(&self, lhs: T, rhs: T) -> T {
        lhs * rhs
    }
    fn neg(&self, value: T) -> T {
        -value
    }
}

pub type F32Field = FloatField<f32>;
pub type F64Field = FloatField<f64>;
pub type I32Ring = IntRing<i32>;
pub type I64Ring = IntRing<i64>;
