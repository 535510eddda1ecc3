// Elementwise dispatch and the batched matrix product, end to end.

use stoat::prelude::*;

fn assert_close(actual: &[f64], expected: &[f64], tol: f64) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert!(
            (a - e).abs() <= tol,
            "index {i}: {a} != {e} (tol={tol})"
        );
    }
}

#[test]
fn minus_with_mixed_shapes() {
    let nd = float_algebra::<f64>();
    let tensor1 = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], (2, 3)).unwrap();
    let tensor2 = Tensor::from_vec(vec![10.0, 20.0, 30.0], (1, 3)).unwrap();
    let tensor3 = Tensor::from_vec(vec![500.0], (1, 1, 1)).unwrap();

    let tensor21 = nd.sub(&tensor2, &tensor1).unwrap();
    assert_eq!(tensor21.shape(), &Shape::from((2, 3)));
    assert_eq!(tensor21.to_vec(), vec![9.0, 18.0, 27.0, 6.0, 15.0, 24.0]);

    let tensor31 = nd.sub(&tensor3, &tensor1).unwrap();
    assert_eq!(tensor31.shape(), &Shape::from((1, 2, 3)));
    assert_eq!(
        tensor31.to_vec(),
        vec![499.0, 498.0, 497.0, 496.0, 495.0, 494.0]
    );

    let tensor32 = nd.sub(&tensor3, &tensor2).unwrap();
    assert_eq!(tensor32.shape(), &Shape::from((1, 1, 3)));
    assert_eq!(tensor32.to_vec(), vec![490.0, 480.0, 470.0]);
}

#[test]
fn subtraction_antisymmetry_across_broadcasts() {
    let nd = float_algebra::<f64>();
    let cases: Vec<(Tensor<f64>, Tensor<f64>)> = vec![
        (
            Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], (2, 2)).unwrap(),
            Tensor::from_vec(vec![0.5, -1.5], (1, 2)).unwrap(),
        ),
        (
            Tensor::scalar(3.0),
            Tensor::from_vec(vec![1.0, 2.0, 3.0], 3).unwrap(),
        ),
        (
            Tensor::from_vec(vec![1.0, 2.0], (2, 1)).unwrap(),
            Tensor::from_vec(vec![10.0, 20.0, 30.0], (1, 3)).unwrap(),
        ),
    ];
    for (a, b) in cases {
        let ab = nd.sub(&a, &b).unwrap();
        let ba = nd.neg(&nd.sub(&b, &a).unwrap());
        assert_eq!(ab.shape(), ba.shape());
        assert_eq!(ab.to_vec(), ba.to_vec());
    }
}

#[test]
fn exp_then_ln_is_identity_for_positive_inputs() {
    let nd = float_algebra::<f64>();
    let t = Tensor::from_vec(vec![0.1, 0.5, 1.0, 2.0, 10.0, 100.0], (2, 3)).unwrap();
    let roundtrip = nd.ln(&nd.exp(&t));
    assert_close(&roundtrip.to_vec(), &t.to_vec(), 1e-9);
}

#[test]
fn trig_on_generated_grid() {
    let nd = float_algebra::<f64>();
    let t = Tensor::from_fn(4, |idx| idx[0] as f64);
    let s = nd.sin(&t);
    let c = nd.cos(&t);
    // sin^2 + cos^2 = 1 everywhere.
    let ones = nd
        .add(&nd.mul(&s, &s).unwrap(), &nd.mul(&c, &c).unwrap())
        .unwrap();
    assert_close(&ones.to_vec(), &[1.0, 1.0, 1.0, 1.0], 1e-12);
}

#[test]
fn division_and_sqrt() {
    let nd = float_algebra::<f64>();
    let a = Tensor::from_vec(vec![1.0, 4.0, 9.0, 16.0], (2, 2)).unwrap();
    let b = Tensor::scalar(4.0);
    let q = nd.div(&a, &b).unwrap();
    assert_close(&q.to_vec(), &[0.25, 1.0, 2.25, 4.0], 1e-12);
    let r = nd.sqrt(&a);
    assert_close(&r.to_vec(), &[1.0, 2.0, 3.0, 4.0], 1e-12);
}

#[test]
fn folded_scalars_match_general_path() {
    let nd = float_algebra::<f64>();
    let a = Tensor::scalar(3.0);
    let b = Tensor::from_vec(vec![4.0], (1, 1)).unwrap();
    // One operand per path: fold (both size 1) vs general (forced by a
    // larger operand of the same values).
    let folded = nd.add(&a, &b).unwrap();
    let wide = Tensor::from_vec(vec![4.0, 4.0], (1, 2)).unwrap();
    let general = nd.add(&a, &wide).unwrap();
    assert_eq!(folded.dims(), &[1, 1]);
    assert_eq!(folded.value().unwrap(), 7.0);
    assert_eq!(general.to_vec(), vec![7.0, 7.0]);
}

#[test]
fn outputs_are_fresh_and_owned() {
    let nd = float_algebra::<f64>();
    let a = Tensor::from_vec(vec![1.0, 2.0], 2).unwrap();
    let b = nd.add_scalar(&a, 1.0);
    b.set(&[0], 100.0).unwrap();
    // The input is untouched by writes to the output.
    assert_eq!(a.to_vec(), vec![1.0, 2.0]);
}

#[test]
fn integer_elementwise_with_broadcast() {
    let nd = int_algebra::<i32>();
    let a = Tensor::from_vec(vec![1, 2, 3, 4, 5, 6], (2, 3)).unwrap();
    let row = Tensor::from_vec(vec![10, 100, 1000], (1, 3)).unwrap();
    let sum = nd.add(&a, &row).unwrap();
    assert_eq!(sum.to_vec(), vec![11, 102, 1003, 14, 105, 1006]);

    // Adding zeros is the identity.
    let same = nd.add(&a, &nd.zeros((2, 3))).unwrap();
    assert_eq!(same.to_vec(), a.to_vec());
}

#[test]
fn dot_products() {
    let nd = float_algebra::<f64>();
    let a = Tensor::from_vec(vec![1.0, 2.0, 3.0], 3).unwrap();
    let b = Tensor::from_vec(vec![4.0, 5.0, 6.0], 3).unwrap();
    assert_eq!(dot(nd.scalars(), &a, &b).unwrap().value().unwrap(), 32.0);

    let m = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], (2, 2)).unwrap();
    let mm = dot(nd.scalars(), &m, &m).unwrap();
    assert_eq!(mm.to_vec(), vec![7.0, 10.0, 15.0, 22.0]);
}

#[test]
fn dot_batches_broadcast() {
    let nd = float_algebra::<f64>();
    // Batch of three scaled identities times a shared vector.
    let batch = Tensor::from_fn((3, 2, 2), |idx| {
        if idx[1] == idx[2] {
            (idx[0] + 1) as f64
        } else {
            0.0
        }
    });
    let v = Tensor::from_vec(vec![1.0, -1.0], 2).unwrap();
    let out = dot(nd.scalars(), &batch, &v).unwrap();
    assert_eq!(out.dims(), &[3, 2]);
    assert_eq!(out.to_vec(), vec![1.0, -1.0, 2.0, -2.0, 3.0, -3.0]);
}
