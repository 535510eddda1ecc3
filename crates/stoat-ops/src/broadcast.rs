use stoat_core::{bail, Error, Result, Scalar, Shape, Tensor};

// Broadcasting engine - shape unification and zero-copy alignment.
//
// Two policies live here:
//
//   broadcast_tensors       all operands are viewed at one shared unified
//                           shape; this is what elementwise operations use
//   broadcast_outer_tensors batched-matrix alignment; every operand keeps
//                           its own trailing two (matrix) axes and only the
//                           leading batch axes are unified across operands
//
// Both hand back views: stride-0 axes instead of replicated data. The view
// tensors reject writes, so aliasing stays read-only by construction.

/// Unify any number of shapes under the broadcasting rule.
///
/// The unified rank is the maximum rank over all operands and each axis is
/// unified across all operands simultaneously, so a leading 1-axis from a
/// higher-rank operand survives:
///
/// ```
/// use stoat_core::Shape;
/// use stoat_ops::broadcast_shapes;
///
/// let unified = broadcast_shapes(&[
///     Shape::from((2, 3)),
///     Shape::from((1, 3)),
///     Shape::from((1, 1, 1)),
/// ]).unwrap();
/// assert_eq!(unified, Shape::from((1, 2, 3)));
/// ```
pub fn broadcast_shapes(shapes: &[Shape]) -> Result<Shape> {
    let Some((first, rest)) = shapes.split_first() else {
        bail!("broadcast_shapes: no shapes given");
    };
    let mut unified = first.clone();
    for shape in rest {
        unified = Shape::broadcast(&unified, shape)?;
    }
    Ok(unified)
}

/// View a tensor at a broadcast target shape without copying.
///
/// Every source axis, right-aligned against the target, must be size 1 or
/// equal to the target size; expanded and padded axes get stride 0.
/// The result is a read-only view; `set` through it fails.
pub fn broadcast_to<T: Scalar>(tensor: &Tensor<T>, target: &Shape) -> Result<Tensor<T>> {
    tensor.broadcast_to(target)
}

/// Align all operands at their shared unified shape.
///
/// This is ordinary elementwise-operation broadcasting: the result of the
/// operation has the unified shape and so does every returned view.
pub fn broadcast_tensors<T: Scalar>(tensors: &[&Tensor<T>]) -> Result<Vec<Tensor<T>>> {
    let shapes: Vec<Shape> = tensors.iter().map(|t| t.shape().clone()).collect();
    let unified = broadcast_shapes(&shapes)?;
    tensors.iter().map(|t| t.broadcast_to(&unified)).collect()
}

/// Align operands for a batched matrix operation.
///
/// Each operand must have rank >= 2 and keeps its own trailing two axes
/// untouched; the remaining leading (batch) axes are unified across all
/// operands and every operand is viewed at `unified_batch ++ own_matrix`.
/// The operands therefore end up with distinct shapes, unlike
/// [`broadcast_tensors`] which forces one shared shape. A list of plain
/// matrices (all rank 2 exactly) passes through unchanged.
pub fn broadcast_outer_tensors<T: Scalar>(tensors: &[&Tensor<T>]) -> Result<Vec<Tensor<T>>> {
    for t in tensors {
        if t.rank() < 2 {
            return Err(Error::RankMismatch {
                expected: 2,
                got: t.rank(),
            });
        }
    }
    if tensors.iter().all(|t| t.rank() == 2) {
        return Ok(tensors.iter().map(|t| (*t).clone()).collect());
    }

    let batch_shapes: Vec<Shape> = tensors
        .iter()
        .map(|t| Shape::from(&t.dims()[..t.rank() - 2]))
        .collect();
    let batch = broadcast_shapes(&batch_shapes)?;

    tensors
        .iter()
        .map(|t| {
            let matrix = &t.dims()[t.rank() - 2..];
            let target: Vec<usize> = batch.dims().iter().chain(matrix).copied().collect();
            t.broadcast_to(&Shape::new(target))
        })
        .collect()
}
