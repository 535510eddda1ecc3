use stoat_core::{Error, Layout, Result, Scalar, Shape, Tensor};

use crate::algebra::Ring;
use crate::broadcast::broadcast_outer_tensors;

// Batched matrix product.
//
// `dot` is the consumer the outer-broadcast policy exists for: operand
// batch axes are aligned without copying, each operand keeps its own
// matrix axes, and the contraction runs per aligned batch entry.
//
// Rank handling follows the usual conventions:
//   vector . vector -> scalar
//   matrix . vector -> vector (the vector is read as a column)
//   vector . matrix -> vector (the vector is read as a row)
//   higher ranks    -> batched matmul over broadcast-aligned batch axes
//
// Rank-1 operands are promoted to matrices for the contraction and the
// promoted axis is squeezed back off the result.

/// Matrix product of two tensors with batch broadcasting.
pub fn dot<T: Scalar, A: Ring<T>>(alg: &A, lhs: &Tensor<T>, rhs: &Tensor<T>) -> Result<Tensor<T>> {
    if lhs.rank() == 0 || rhs.rank() == 0 {
        return Err(Error::RankMismatch {
            expected: 1,
            got: 0,
        });
    }
    let lhs_promoted = lhs.rank() == 1;
    let rhs_promoted = rhs.rank() == 1;
    let lhs2 = if lhs_promoted {
        lhs.unsqueeze(0)?
    } else {
        lhs.clone()
    };
    let rhs2 = if rhs_promoted {
        rhs.unsqueeze(1)?
    } else {
        rhs.clone()
    };

    let views = broadcast_outer_tensors(&[&lhs2, &rhs2])?;
    let (lv, rv) = (&views[0], &views[1]);

    let lrank = lv.rank();
    let rrank = rv.rank();
    let m = lv.dims()[lrank - 2];
    let k1 = lv.dims()[lrank - 1];
    let k2 = rv.dims()[rrank - 2];
    let n = rv.dims()[rrank - 1];
    if k1 != k2 {
        return Err(Error::MatmulShapeMismatch { m, k1, k2, n });
    }

    let batch = Shape::from(&lv.dims()[..lrank - 2]);
    let mut out_dims = batch.dims().to_vec();
    out_dims.push(m);
    out_dims.push(n);
    let out_shape = Shape::new(out_dims);

    let lhs_guard = lv.storage();
    let rhs_guard = rv.storage();
    let lhs_layout = lv.layout();
    let rhs_layout = rv.layout();

    // Index scratch buffers: batch components up front, matrix components
    // rewritten in the loops below.
    let mut lidx = vec![0usize; lrank];
    let mut ridx = vec![0usize; rrank];
    let mut out = Vec::with_capacity(out_shape.size());

    for (bidx, _) in Layout::contiguous(batch.clone()).indexed_offsets() {
        lidx[..lrank - 2].copy_from_slice(&bidx);
        ridx[..rrank - 2].copy_from_slice(&bidx);
        for i in 0..m {
            lidx[lrank - 2] = i;
            for j in 0..n {
                ridx[rrank - 1] = j;
                let mut acc = alg.zero();
                for k in 0..k1 {
                    lidx[lrank - 1] = k;
                    ridx[rrank - 2] = k;
                    let a = lhs_guard[lhs_layout.flat_offset(&lidx)];
                    let b = rhs_guard[rhs_layout.flat_offset(&ridx)];
                    acc = alg.add(acc, alg.mul(a, b));
                }
                out.push(acc);
            }
        }
    }
    drop(lhs_guard);
    drop(rhs_guard);

    let mut result = Tensor::from_vec(out, out_shape)?;
    let batch_rank = batch.rank();
    if rhs_promoted {
        result = result.squeeze(batch_rank + 1)?;
    }
    if lhs_promoted {
        result = result.squeeze(batch_rank)?;
    }
    if lhs_promoted || rhs_promoted {
        // Squeezing produced a view over the freshly built buffer; hand the
        // caller an owned tensor like every other operation does.
        result = result.contiguous();
    }
    Ok(result)
}
