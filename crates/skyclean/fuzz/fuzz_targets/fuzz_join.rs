//! Fuzz target for correspondence scoring and the merge.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use skyclean::join::{correspondence, merge};
use skyclean::{ColumnType, JoinStrategy, Table, Value};

#[derive(Arbitrary, Debug)]
struct Input {
    left: Vec<Option<i16>>,
    right: Vec<Option<i16>>,
}

fn table(keys: &[Option<i16>]) -> Table {
    Table::new(
        vec!["id".into(), "v".into()],
        vec![ColumnType::NullableInteger, ColumnType::Integer],
        keys.iter()
            .enumerate()
            .map(|(i, k)| vec![Value::from(k.map(i64::from)), Value::Int(i as i64)])
            .collect(),
    )
}

fuzz_target!(|input: Input| {
    if input.left.len() > 500 || input.right.len() > 500 {
        return;
    }
    let (left, right) = (table(&input.left), table(&input.right));

    let c = correspondence(&left, &right, "id").expect("key present");
    assert!((0.0..=100.0).contains(&c.match_left));
    assert!((0.0..=100.0).contains(&c.match_right));

    let strategy = JoinStrategy::from_correspondence(&c);
    let merged = merge(&left, &right, "id", strategy, ("_x", "_y")).expect("key present");
    assert_eq!(merged.column_count(), 3);
});
