//! # stoat-core
//!
//! Core tensor primitives for stoat.
//!
//! This crate provides:
//! - [`Shape`] - axis sizes, linear size, row-major strides, broadcast unification
//! - [`Layout`] - shape + strides + offset, the multi-index to buffer mapping
//! - [`Tensor`] - an n-dimensional value over a flat shared buffer, with
//!   owned buffers and read-only views (transpose, narrow, broadcast, ...)
//! - [`Scalar`] - the element bound for tensor storage
//! - [`Error`] / [`Result`] - the workspace error type
//!
//! Computation (scalar algebras, the broadcasting engine entry points, and
//! elementwise dispatch) lives in `stoat-ops`; this crate is only the data
//! model.

pub mod error;
pub mod layout;
pub mod scalar;
pub mod shape;
pub mod tensor;

#[cfg(test)]
mod property_tests;

pub use error::{Error, Result};
pub use layout::{IndexedOffsets, Layout, Offsets};
pub use scalar::Scalar;
pub use shape::Shape;
pub use tensor::{Elements, Tensor};
