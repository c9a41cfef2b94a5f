use proptest::prelude::*;
use scanfix_array::{chunk, chunk_value, uniq, uniq_value};
use serde_json::{json, Value};

proptest! {
    #[test]
    fn prop_concatenated_chunks_reproduce_input(
        items in proptest::collection::vec(any::<i32>(), 0..200),
        size in 1..50i64
    ) {
        let groups = chunk(&items, size).unwrap();
        let flat: Vec<i32> = groups.iter().flatten().copied().collect();
        prop_assert_eq!(flat, items);
    }

    #[test]
    fn prop_only_last_chunk_is_short(
        items in proptest::collection::vec(any::<u8>(), 1..200),
        size in 1..50i64
    ) {
        let groups = chunk(&items, size).unwrap();
        let size = usize::try_from(size).unwrap();
        let (last, full) = groups.split_last().unwrap();

        prop_assert!(full.iter().all(|g| g.len() == size));
        prop_assert!(!last.is_empty() && last.len() <= size);
        prop_assert_eq!(groups.len(), items.len().div_ceil(size));
    }

    #[test]
    fn prop_non_positive_sizes_rejected(
        items in proptest::collection::vec(any::<i32>(), 0..20),
        size in i64::MIN..1
    ) {
        prop_assert!(chunk(&items, size).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn prop_uniq_has_no_duplicates_and_keeps_every_value(
        items in proptest::collection::vec(0..10u8, 0..100)
    ) {
        let out = uniq(&items);
        for (i, v) in out.iter().enumerate() {
            prop_assert!(!out[i + 1..].contains(v));
        }
        prop_assert!(items.iter().all(|v| out.contains(v)));
    }

    #[test]
    fn prop_uniq_value_matches_typed_uniq(
        items in proptest::collection::vec(0..10i64, 0..60)
    ) {
        let typed: Vec<Value> = uniq(&items).into_iter().map(Value::from).collect();
        let dynamic = uniq_value(&json!(items)).unwrap();
        prop_assert_eq!(dynamic, Value::Array(typed));
    }
}

#[test]
fn test_chunk_value_empty_array() {
    assert_eq!(chunk_value(&json!([]), 4).unwrap(), json!([]));
}

#[test]
fn test_dynamic_entry_points_reject_scalars_and_objects() {
    let inputs = [json!(1), json!("a,b"), json!({"items": [1, 2]})];
    for input in &inputs {
        assert!(chunk_value(input, 2).is_err());
        assert!(uniq_value(input).is_err());
    }
}
