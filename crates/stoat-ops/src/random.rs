use rand::Rng;
use rand_distr::StandardNormal;
use stoat_core::{Scalar, Shape, Tensor};

// Random tensor constructors. Thin wrappers over the generator-fill
// constructor; the `_with` variants take an explicit Rng so callers can
// seed for reproducibility.

/// A tensor of uniform values in `[0, 1)`.
pub fn rand_uniform<T: Scalar>(shape: impl Into<Shape>) -> Tensor<T> {
    rand_uniform_with(&mut rand::thread_rng(), shape)
}

/// A tensor of uniform values in `[0, 1)` drawn from `rng`.
pub fn rand_uniform_with<T: Scalar, R: Rng + ?Sized>(
    rng: &mut R,
    shape: impl Into<Shape>,
) -> Tensor<T> {
    Tensor::from_fn(shape, |_| T::from_f64(rng.gen::<f64>()))
}

/// A tensor of standard normal values (mean 0, std 1).
pub fn rand_normal<T: Scalar>(shape: impl Into<Shape>) -> Tensor<T> {
    rand_normal_with(&mut rand::thread_rng(), shape)
}

/// A tensor of standard normal values drawn from `rng`.
pub fn rand_normal_with<T: Scalar, R: Rng + ?Sized>(
    rng: &mut R,
    shape: impl Into<Shape>,
) -> Tensor<T> {
    Tensor::from_fn(shape, |_| {
        let v: f64 = rng.sample(StandardNormal);
        T::from_f64(v)
    })
}
