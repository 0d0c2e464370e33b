use crate::dataset::flat_row::FlatRow;
use crate::error::{RowMismatch, SchemaMismatchError};
use itertools::Itertools;
use std::collections::BTreeSet;

/// The outcome of checking a batch against the schema of its first row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsistencyReport {
    pub consistent: bool,
    pub mismatches: Vec<RowMismatch>,
}

impl ConsistencyReport {
    pub fn into_result(self) -> Result<(), SchemaMismatchError> {
        if self.consistent {
            Ok(())
        } else {
            Err(SchemaMismatchError { mismatches: self.mismatches })
        }
    }
}

/// Compares the key set of every row with the key set of the first row.
///
/// An empty batch, or a batch of one row, is consistent.
pub fn verify_consistency(rows: &[FlatRow]) -> ConsistencyReport {
    let Some((reference, rest)) = rows.split_first() else {
        return ConsistencyReport { consistent: true, mismatches: Vec::new() };
    };
    let schema: BTreeSet<&str> = reference.keys().map(String::as_str).collect();
    let mismatches: Vec<RowMismatch> = rest
        .iter()
        .enumerate()
        .filter_map(|(offset, row)| {
            let keys: BTreeSet<&str> = row.keys().map(String::as_str).collect();
            if keys == schema {
                return None;
            }
            Some(RowMismatch {
                row_index: offset + 1,
                missing_from_row: schema.difference(&keys).map(|k| k.to_string()).collect(),
                extra_in_row: keys.difference(&schema).map(|k| k.to_string()).collect(),
            })
        })
        .collect();
    for mismatch in &mismatches {
        log::warn!(
            "row {} does not match the batch schema: missing [{}], extra [{}]",
            mismatch.row_index,
            mismatch.missing_from_row.iter().join(", "),
            mismatch.extra_in_row.iter().join(", ")
        );
    }
    ConsistencyReport { consistent: mismatches.is_empty(), mismatches }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn row(value: Value) -> FlatRow {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn missing_key_is_reported() {
        let rows = vec![
            row(json!({"a": 1, "b": 2})),
            row(json!({"a": 1, "b": 2})),
            row(json!({"a": 1})),
        ];
        let report = verify_consistency(&rows);
        assert!(!report.consistent);
        assert_eq!(
            report.mismatches,
            vec![RowMismatch {
                row_index: 2,
                missing_from_row: BTreeSet::from(["b".to_string()]),
                extra_in_row: BTreeSet::new(),
            }]
        );
    }

    #[test]
    fn extra_keys_and_multiple_rows_are_reported() {
        let rows = vec![
            row(json!({"a": 1})),
            row(json!({"a": 1, "c": 3})),
            row(json!({"a": 1})),
            row(json!({"d": 1})),
        ];
        let report = verify_consistency(&rows);
        let indexes: Vec<usize> = report.mismatches.iter().map(|m| m.row_index).collect();
        assert_eq!(indexes, vec![1, 3]);
        assert_eq!(report.mismatches[0].extra_in_row, BTreeSet::from(["c".to_string()]));
        assert_eq!(report.mismatches[1].missing_from_row, BTreeSet::from(["a".to_string()]));
        assert_eq!(report.mismatches[1].extra_in_row, BTreeSet::from(["d".to_string()]));
    }

    #[test]
    fn values_do_not_matter_only_keys() {
        let rows = vec![row(json!({"a": 1, "b": null})), row(json!({"b": "x", "a": 2.5}))];
        assert!(verify_consistency(&rows).into_result().is_ok());
    }

    #[test]
    fn empty_batch_is_consistent() {
        assert!(verify_consistency(&[]).consistent);
    }

    #[test]
    fn mismatch_converts_to_error() {
        let rows = vec![row(json!({"a": 1})), row(json!({}))];
        let err = verify_consistency(&rows).into_result().unwrap_err();
        assert_eq!(err.mismatches.len(), 1);
        assert_eq!(err.mismatches[0].row_index, 1);
    }
}
