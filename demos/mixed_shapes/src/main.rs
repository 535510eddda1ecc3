// Combining tensors of different shapes without copying anything:
// a generated diagonal, a flat-data matrix, and a scalar, all pulled
// through one elementwise expression by the broadcasting engine.

use stoat::prelude::*;

fn main() -> Result<()> {
    let nd = float_algebra::<f64>();

    // A 2x2 diagonal built from a generator over multi-indices.
    let diagonal = Tensor::from_fn((2, 2), |idx| if idx[0] == idx[1] { 2.0 } else { 0.0 });

    // A matrix from flat row-major data.
    let matrix = Tensor::from_vec(vec![0.0, 1.0, 0.0, 3.0], (2, 2))?;

    // A scalar that broadcasts across both.
    let two = Tensor::scalar(2.0);

    // exp(diagonal) + 2 * matrix
    let result = nd.add(&nd.exp(&diagonal), &nd.mul(&two, &matrix)?)?;

    println!("exp(diagonal) + 2 * matrix, shape {}:", result.shape());
    for (index, value) in result.elements() {
        println!("  {:?} -> {:.4}", index, value);
    }

    // The same operands aligned for a batched product instead.
    let stacked = Tensor::from_fn((3, 2, 2), |idx| (idx[0] * 4 + idx[1] * 2 + idx[2]) as f64);
    let product = dot(nd.scalars(), &stacked, &matrix)?;
    println!("stacked @ matrix, shape {}:", product.shape());
    println!("  {:?}", product.to_vec());

    Ok(())
}
