use crate::error::CollaboratorError;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One row of the output dataset: field name to scalar (number, string, bool or null).
pub type FlatRow = Map<String, Value>;

/// A row as it comes out of the source database.
pub type DatabaseRecord = FlatRow;

/// Converts every numeric column to `f64` so integer and decimal columns pack the same way.
///
/// Nested values are not scalars; they are kept as their JSON text so the row stays flat.
pub fn normalize_database_record(record: &DatabaseRecord) -> FlatRow {
    record
        .iter()
        .map(|(column, value)| {
            let normalized = match value {
                Value::Number(n) => n.as_f64().map(Value::from).unwrap_or(Value::Null),
                Value::Array(_) | Value::Object(_) => {
                    log::warn!("column `{}` holds a nested value, storing it as text", column);
                    Value::String(value.to_string())
                }
                other => other.clone(),
            };
            (column.clone(), normalized)
        })
        .collect()
}

/// Reads the photo id out of a record. Numeric ids are rendered without a fractional part.
pub fn photo_id_of(record: &DatabaseRecord, column: &str) -> Option<String> {
    match record.get(column)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => match (n.as_u64(), n.as_i64(), n.as_f64()) {
            (Some(u), _, _) => Some(u.to_string()),
            (None, Some(i), _) => Some(i.to_string()),
            (None, None, Some(f)) if f.fract() == 0.0 => Some(format!("{}", f as i64)),
            (None, None, Some(f)) => Some(f.to_string()),
            _ => None,
        },
        _ => None,
    }
}

/// Reads an exported query result: a json array with one object per database row.
pub fn read_database_records(filepath: &Path) -> Result<Vec<DatabaseRecord>, CollaboratorError> {
    let file = File::open(filepath).map_err(|source| CollaboratorError::Io {
        path: filepath.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CollaboratorError::Json {
        path: filepath.to_path_buf(),
        source,
    })
}
