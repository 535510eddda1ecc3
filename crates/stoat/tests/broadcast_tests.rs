// The broadcasting engine, exercised end to end through the facade.

use stoat::prelude::*;

#[test]
fn broadcast_shapes_unifies_across_all_operands() {
    let unified = broadcast_shapes(&[
        Shape::from((2, 3)),
        Shape::from((1, 3)),
        Shape::from((1, 1, 1)),
    ])
    .unwrap();
    assert_eq!(unified, Shape::from((1, 2, 3)));

    let unified = broadcast_shapes(&[
        Shape::from((6, 7)),
        Shape::from((5, 6, 1)),
        Shape::from(7),
        Shape::from((5, 1, 7)),
    ])
    .unwrap();
    assert_eq!(unified, Shape::from((5, 6, 7)));
}

#[test]
fn broadcast_to_repeats_rows() {
    let tensor1 = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], (2, 3)).unwrap();
    let tensor2 = Tensor::from_vec(vec![10.0, 20.0, 30.0], (1, 3)).unwrap();

    let res = broadcast_to(&tensor2, tensor1.shape()).unwrap();
    assert_eq!(res.shape(), &Shape::from((2, 3)));
    assert_eq!(res.to_vec(), vec![10.0, 20.0, 30.0, 10.0, 20.0, 30.0]);
}

#[test]
fn broadcast_tensors_forces_one_shared_shape() {
    let tensor1 = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], (2, 3)).unwrap();
    let tensor2 = Tensor::from_vec(vec![10.0, 20.0, 30.0], (1, 3)).unwrap();
    let tensor3 = Tensor::from_vec(vec![500.0], (1, 1, 1)).unwrap();

    let res = broadcast_tensors(&[&tensor1, &tensor2, &tensor3]).unwrap();

    assert_eq!(res[0].shape(), &Shape::from((1, 2, 3)));
    assert_eq!(res[1].shape(), &Shape::from((1, 2, 3)));
    assert_eq!(res[2].shape(), &Shape::from((1, 2, 3)));

    assert_eq!(res[0].to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    assert_eq!(res[1].to_vec(), vec![10.0, 20.0, 30.0, 10.0, 20.0, 30.0]);
    assert_eq!(res[2].to_vec(), vec![500.0; 6]);
}

#[test]
fn broadcast_outer_tensors_keeps_slots_disjoint() {
    let tensor1 = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], (2, 3)).unwrap();
    let tensor2 = Tensor::from_vec(vec![10.0, 20.0, 30.0], (1, 3)).unwrap();
    let tensor3 = Tensor::from_vec(vec![500.0], (1, 1, 1)).unwrap();

    let res = broadcast_outer_tensors(&[&tensor1, &tensor2, &tensor3]).unwrap();

    assert_eq!(res[0].shape(), &Shape::from((1, 2, 3)));
    assert_eq!(res[1].shape(), &Shape::from((1, 1, 3)));
    assert_eq!(res[2].shape(), &Shape::from((1, 1, 1)));

    assert_eq!(res[0].to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    assert_eq!(res[1].to_vec(), vec![10.0, 20.0, 30.0]);
    assert_eq!(res[2].to_vec(), vec![500.0]);
}

#[test]
fn broadcast_outer_tensors_higher_rank_shapes() {
    let tensor1 = Tensor::full([2, 1, 3, 2, 3], 0.0);
    let tensor2 = Tensor::full([4, 2, 5, 1, 3, 3], 0.0);
    let tensor3 = Tensor::from_vec(vec![500.0], (1, 1)).unwrap();

    let res = broadcast_outer_tensors(&[&tensor1, &tensor2, &tensor3]).unwrap();

    assert_eq!(res[0].shape(), &Shape::from([4, 2, 5, 3, 2, 3]));
    assert_eq!(res[1].shape(), &Shape::from([4, 2, 5, 3, 3, 3]));
    assert_eq!(res[2].shape(), &Shape::from([4, 2, 5, 3, 1, 1]));
}

#[test]
fn broadcast_to_rejects_incompatible_targets() {
    let t = Tensor::from_vec(vec![1.0, 2.0, 3.0], 3).unwrap();
    assert!(matches!(
        broadcast_to(&t, &Shape::from((2, 4))),
        Err(Error::BroadcastMismatch { .. })
    ));
    // Shrinking is never broadcasting.
    let m = Tensor::from_vec(vec![1.0; 6], (2, 3)).unwrap();
    assert!(broadcast_to(&m, &Shape::from(3)).is_err());
}

#[test]
fn broadcast_views_share_storage_and_stay_read_only() {
    let t = Tensor::from_vec(vec![10.0, 20.0, 30.0], (1, 3)).unwrap();
    let view = broadcast_to(&t, &Shape::from((2, 3))).unwrap();

    assert!(view.is_view());
    assert_eq!(view.storage().len(), 3);
    assert!(matches!(
        view.set(&[1, 2], 0.0),
        Err(Error::ReadOnlyView { .. })
    ));

    // Writes through the owner are visible through the live view.
    t.set(&[0, 0], 11.0).unwrap();
    assert_eq!(view.get(&[1, 0]).unwrap(), 11.0);
}

#[test]
fn scalar_broadcasts_everywhere() {
    let s = Tensor::scalar(7.0);
    let v = broadcast_to(&s, &Shape::from((2, 2, 2))).unwrap();
    assert_eq!(v.to_vec(), vec![7.0; 8]);
}
