//! Property tests for the stacking round trip

mod common;

use common::{ne_bytes, parse_npy};
use npyfile::prelude::*;
use proptest::prelude::*;
use std::io::Cursor;

/// Per-slice shape plus the values of every slice
fn stack_strategy() -> impl Strategy<Value = (Vec<usize>, Vec<Vec<i32>>)> {
    prop::collection::vec(1usize..5, 0..4).prop_flat_map(|shape| {
        let len: usize = shape.iter().product();
        let slices = prop::collection::vec(prop::collection::vec(any::<i32>(), len), 1..8);
        (Just(shape), slices)
    })
}

proptest! {
    /// N uniform slices decode as shape (N,) + slice shape with the slices in order
    #[test]
    fn test_stack_round_trip(
        (shape, slices) in stack_strategy(),
        fortran in any::<bool>(),
    ) {
        let order = if fortran { MemoryOrder::ColumnMajor } else { MemoryOrder::RowMajor };
        let mut writer = NpyWriter::new(Cursor::new(Vec::new()), WriterConfig::compact()).unwrap();
        for values in &slices {
            writer.write(&TypedSlice::new(values, shape.clone(), order).unwrap()).unwrap();
        }
        let bytes = writer.into_inner().unwrap().into_inner();

        let file = parse_npy(&bytes);
        let mut expected_shape = vec![slices.len() as u64];
        expected_shape.extend(shape.iter().map(|&d| d as u64));
        prop_assert_eq!(&file.shape, &expected_shape);
        prop_assert_eq!(file.fortran_order, order.classify_dense(&shape).is_fortran());
        prop_assert_eq!(&file.descr, &ElementType::native(DType::I32).descr());

        let expected: Vec<u8> = slices.iter().flat_map(|values| ne_bytes(values)).collect();
        prop_assert_eq!(file.body, expected);
    }

    /// Any rejected slice leaves the body untouched
    #[test]
    fn test_rejected_slice_writes_nothing(
        first in prop::collection::vec(any::<u8>(), 1..16),
        second in prop::collection::vec(any::<u8>(), 1..16),
    ) {
        prop_assume!(first.len() != second.len());

        let mut writer = NpyWriter::new(Cursor::new(Vec::new()), WriterConfig::compact()).unwrap();
        writer.write(&TypedSlice::from_values(&first)).unwrap();
        let rejected = writer.write(&TypedSlice::from_values(&second));
        let is_shape_mismatch = matches!(rejected, Err(WriterError::ShapeMismatch { .. }));
        prop_assert!(is_shape_mismatch);

        let bytes = writer.into_inner().unwrap().into_inner();
        prop_assert_eq!(&bytes[128..], first.as_slice());
    }
}
