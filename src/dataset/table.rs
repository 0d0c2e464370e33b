use crate::dataset::consistency::verify_consistency;
use crate::dataset::flat_row::FlatRow;
use crate::error::SchemaMismatchError;
use ndarray::{Array2, ArrayBase, Dim, OwnedRepr};
use serde_json::Value;
use std::io::{self, Write};

/// Rows that all share one column set.
///
/// A `Dataset` can only be built from a consistent batch, so every row has a value for
/// every column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<FlatRow>,
}

impl Dataset {
    pub fn from_rows(rows: Vec<FlatRow>) -> Result<Self, SchemaMismatchError> {
        verify_consistency(&rows).into_result()?;
        let columns = rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default();
        Ok(Dataset { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[FlatRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows x columns as floats. Booleans become 0/1; strings and nulls become NaN.
    pub fn to_numeric_matrix(&self) -> ArrayBase<OwnedRepr<f64>, Dim<[usize; 2]>> {
        let mut matrix = Array2::from_elem((self.rows.len(), self.columns.len()), f64::NAN);
        for (row_ix, row) in self.rows.iter().enumerate() {
            for (col_ix, column) in self.columns.iter().enumerate() {
                matrix[[row_ix, col_ix]] = match row.get(column) {
                    Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
                    Some(Value::Bool(b)) => f64::from(u8::from(*b)),
                    _ => f64::NAN,
                };
            }
        }
        matrix
    }

    /// Columns holding at least one value that is neither a number nor a boolean.
    pub fn non_numeric_columns(&self) -> Vec<&str> {
        let matrix = self.to_numeric_matrix();
        self.columns
            .iter()
            .zip(matrix.columns())
            .filter(|(_, values)| values.iter().any(|v| v.is_nan()))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Writes the rows as a json array of objects.
    pub fn write_json<W: Write>(&self, writer: W) -> io::Result<()> {
        serde_json::to_writer_pretty(writer, &self.rows).map_err(io::Error::from)
    }
}
