//! # Stoat
//!
//! A generic n-dimensional tensor core in Rust.
//!
//! This is the top-level facade crate that re-exports everything you need.
//!
//! ## Usage
//!
//! ```rust
//! use stoat::prelude::*;
//!
//! let nd = float_algebra::<f64>();
//! let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], (2, 3)).unwrap();
//! let b = Tensor::from_vec(vec![10.0, 20.0, 30.0], (1, 3)).unwrap();
//! let sum = nd.add(&a, &b).unwrap();
//! assert_eq!(sum.to_vec(), vec![11.0, 22.0, 33.0, 14.0, 25.0, 36.0]);
//! ```
//!
//! ## Architecture
//!
//! | Crate | Purpose |
//! |-------|---------|
//! | `stoat-core` | Shape, Layout (strides), Tensor, views, errors |
//! | `stoat-ops` | Scalar algebras, broadcasting engine, elementwise dispatch, dot |
//!
//! ## Features
//!
//! - `rand` (default) - random tensor constructors
//! - `parallel` - rayon-backed elementwise fills for large outputs

/// Re-export core types.
pub use stoat_core::{
    Elements, Error, IndexedOffsets, Layout, Offsets, Result, Scalar, Shape, Tensor,
};

/// Re-export the computation layer.
pub use stoat_ops::{
    broadcast_outer_tensors, broadcast_shapes, broadcast_tensors, broadcast_to, dot,
    float_algebra, int_algebra, ExtendedField, F32Field, F64Field, Field, FloatField, I32Ring,
    I64Ring, IntRing, NdAlgebra, Ring,
};

#[cfg(feature = "rand")]
pub use stoat_ops::{rand_normal, rand_normal_with, rand_uniform, rand_uniform_with};

/// Everything most callers want in scope.
pub mod prelude {
    pub use crate::{
        broadcast_outer_tensors, broadcast_shapes, broadcast_tensors, broadcast_to, dot,
        float_algebra, int_algebra, Error, ExtendedField, F32Field, F64Field, Field, NdAlgebra,
        Result, Ring, Scalar, Shape, Tensor,
    };
    #[cfg(feature = "rand")]
    pub use crate::{rand_normal, rand_uniform};
}
