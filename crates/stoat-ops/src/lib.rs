//! # stoat-ops
//!
//! Computation layer for stoat tensors.
//!
//! This crate provides:
//! - [`Ring`] / [`Field`] / [`ExtendedField`] - scalar algebra capability
//!   traits, with [`FloatField`] and [`IntRing`] instances
//! - the broadcasting engine: [`broadcast_shapes`], [`broadcast_to`],
//!   [`broadcast_tensors`], [`broadcast_outer_tensors`]
//! - [`NdAlgebra`] - elementwise dispatch of an injected scalar algebra
//!   across one or two tensors
//! - [`dot`] - batched matrix product over outer-broadcast operands
//! - random constructors (feature `rand`, on by default)
//!
//! The `parallel` feature switches large elementwise fills to rayon.

pub mod algebra;
pub mod broadcast;
pub mod elementwise;
pub mod linalg;
#[cfg(feature = "rand")]
pub mod random;

pub use algebra::{ExtendedField, Field, FloatField, IntRing, Ring};
pub use algebra::{F32Field, F64Field, I32Ring, I64Ring};
pub use broadcast::{broadcast_outer_tensors, broadcast_shapes, broadcast_tensors, broadcast_to};
pub use elementwise::{float_algebra, int_algebra, NdAlgebra};
pub use linalg::dot;
#[cfg(feature = "rand")]
pub use random::{rand_normal, rand_normal_with, rand_uniform, rand_uniform_with};
