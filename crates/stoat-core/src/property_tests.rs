//! Property-based tests for the shape/stride/layout model.
//!
//! These verify the structural invariants over randomly generated shapes
//! rather than hand-picked fixtures.

use proptest::prelude::*;

use crate::layout::Layout;
use crate::shape::Shape;
use crate::tensor::Tensor;

// Shapes of rank 0..=4 with small axes; rank 0 is the scalar shape.
fn shape_strategy() -> impl Strategy<Value = Shape> {
    prop::collection::vec(1usize..5, 0..=4).prop_map(Shape::new)
}

proptest! {
    #[test]
    fn size_is_product_of_dims(shape in shape_strategy()) {
        // The empty product is 1, which is exactly the scalar-shape case.
        let product: usize = shape.dims().iter().product();
        prop_assert_eq!(shape.size(), product);
    }

    #[test]
    fn offsets_are_a_bijection(shape in shape_strategy()) {
        // Row-major offsets of a contiguous layout hit every slot in
        // [0, size) exactly once, in order.
        let layout = Layout::contiguous(shape.clone());
        let offsets: Vec<usize> = layout.offsets().collect();
        let expected: Vec<usize> = (0..shape.size()).collect();
        prop_assert_eq!(offsets, expected);
    }

    #[test]
    fn checked_offset_agrees_with_walk(shape in shape_strategy()) {
        let layout = Layout::contiguous(shape);
        for (index, flat) in layout.indexed_offsets() {
            prop_assert_eq!(layout.offset_of(&index).unwrap(), flat);
        }
    }

    #[test]
    fn nth_offset_agrees_with_walk(shape in shape_strategy()) {
        let layout = Layout::contiguous(shape);
        for (n, flat) in layout.offsets().enumerate() {
            prop_assert_eq!(layout.offset_of_nth(n), flat);
        }
    }

    #[test]
    fn row_major_roundtrip(shape in shape_strategy()) {
        let data: Vec<i64> = (0..shape.size() as i64).collect();
        let tensor = Tensor::from_vec(data.clone(), shape).unwrap();
        let read_back: Vec<i64> = tensor.elements().map(|(_, v)| v).collect();
        prop_assert_eq!(read_back, data);
    }

    #[test]
    fn broadcast_is_commutative(a in shape_strategy(), b in shape_strategy()) {
        let ab = Shape::broadcast(&a, &b);
        let ba = Shape::broadcast(&b, &a);
        match (ab, ba) {
            (Ok(x), Ok(y)) => prop_assert_eq!(x, y),
            (Err(_), Err(_)) => {}
            _ => prop_assert!(false, "one direction unified, the other failed"),
        }
    }

    #[test]
    fn broadcast_with_self_is_identity(a in shape_strategy()) {
        prop_assert_eq!(Shape::broadcast(&a, &a).unwrap(), a);
    }

    #[test]
    fn broadcast_view_matches_logical_repeat(a in shape_strategy(), b in shape_strategy()) {
        // Whenever two shapes unify, viewing a tensor of the first shape at
        // the unified shape must agree with get() through the original
        // tensor at the wrapped-down index.
        if let Ok(unified) = Shape::broadcast(&a, &b) {
            let data: Vec<i64> = (0..a.size() as i64).collect();
            let tensor = Tensor::from_vec(data, a.clone()).unwrap();
            let view = tensor.broadcast_to(&unified).unwrap();
            let pad = unified.rank() - a.rank();
            for (index, value) in view.elements() {
                let src_index: Vec<usize> = index[pad..]
                    .iter()
                    .zip(a.dims().iter())
                    .map(|(&i, &d)| if d == 1 { 0 } else { i })
                    .collect();
                prop_assert_eq!(tensor.get(&src_index).unwrap(), value);
            }
        }
    }
}
