//! In-memory typed table.

use crate::input::RawTable;

use super::types::ColumnType;
use super::value::Value;

/// Typed tabular data: named columns aligned by row index.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Column headers, in order.
    pub headers: Vec<String>,
    /// Storage type of each column.
    pub dtypes: Vec<ColumnType>,
    /// Row data (row-major order).
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table from parts. Every row must be as wide as `headers`.
    pub fn new(headers: Vec<String>, dtypes: Vec<ColumnType>, rows: Vec<Vec<Value>>) -> Self {
        debug_assert_eq!(headers.len(), dtypes.len());
        debug_assert!(rows.iter().all(|r| r.len() == headers.len()));
        Self {
            headers,
            dtypes,
            rows,
        }
    }

    /// Build a typed table from raw strings, inferring each column's type.
    pub fn from_raw(raw: &RawTable) -> Self {
        let dtypes: Vec<ColumnType> = (0..raw.column_count())
            .map(|col| infer_column_type(raw.rows.iter().map(|r| r[col].as_str())))
            .collect();

        let rows = raw
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&dtypes)
                    .map(|(cell, dtype)| parse_cell(cell, *dtype))
                    .collect()
            })
            .collect();

        Self::new(raw.headers.clone(), dtypes, rows)
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    /// Get a column index by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().map(move |row| &row[index])
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Count missing cells in a column.
    pub fn null_count(&self, index: usize) -> usize {
        self.column_values(index).filter(|v| v.is_null()).count()
    }

    /// Append a column, or replace it if a column with that name exists.
    pub fn put_column(&mut self, name: impl Into<String>, dtype: ColumnType, values: Vec<Value>) {
        debug_assert_eq!(values.len(), self.row_count());
        let name = name.into();
        match self.column_index(&name) {
            Some(idx) => {
                self.dtypes[idx] = dtype;
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.headers.push(name);
                self.dtypes.push(dtype);
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
    }
}

/// Infer the narrowest type that holds every non-missing cell.
fn infer_column_type<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnType {
    let mut saw_value = false;
    let mut saw_null = false;
    let mut all_int = true;
    let mut all_numeric = true;

    for cell in cells {
        if RawTable::is_null_value(cell) {
            saw_null = true;
            continue;
        }
        saw_value = true;
        let trimmed = cell.trim();
        if trimmed.parse::<i64>().is_ok() {
            continue;
        }
        all_int = false;
        if trimmed.parse::<f64>().is_err() {
            all_numeric = false;
            break;
        }
    }

    match (saw_value, all_int, all_numeric) {
        (false, _, _) => ColumnType::Float,
        (true, true, _) if saw_null => ColumnType::NullableInteger,
        (true, true, _) => ColumnType::Integer,
        (true, false, true) => ColumnType::Float,
        _ => ColumnType::Text,
    }
}

/// Parse one raw cell under an inferred column type.
fn parse_cell(cell: &str, dtype: ColumnType) -> Value {
    if RawTable::is_null_value(cell) {
        return Value::Null;
    }
    let trimmed = cell.trim();
    match dtype {
        ColumnType::Integer | ColumnType::NullableInteger => {
            trimmed.parse().map(Value::Int).unwrap_or(Value::Null)
        }
        ColumnType::Float => trimmed.parse().map(Value::Float).unwrap_or(Value::Null),
        ColumnType::Text => Value::Text(cell.to_string()),
    }
}
