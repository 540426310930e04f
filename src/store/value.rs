//! Driver-neutral statement arguments, rows and outcomes.

use super::StoreError;

/// A single argument or column value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Int(i64),
    Text(String),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Expected type of a result column.
///
/// Backends decode each column as the requested type, so a text column whose
/// stored value happens to be numeric still comes back as [`Value::Text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Text,
}

/// One result row, columns in select-list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn column(&self, index: usize) -> Result<&Value, StoreError> {
        self.values.get(index).ok_or_else(|| {
            StoreError::Decode(format!(
                "column index {index} out of bounds (row has {} columns)",
                self.values.len()
            ))
        })
    }

    /// Read an integer column.
    pub fn get_i64(&self, index: usize) -> Result<i64, StoreError> {
        match self.column(index)? {
            Value::Int(v) => Ok(*v),
            other => Err(StoreError::Decode(format!(
                "column {index}: expected integer, found {other:?}"
            ))),
        }
    }

    /// Read a text column.
    pub fn get_str(&self, index: usize) -> Result<&str, StoreError> {
        match self.column(index)? {
            Value::Text(s) => Ok(s),
            other => Err(StoreError::Decode(format!(
                "column {index}: expected text, found {other:?}"
            ))),
        }
    }
}

/// What a write statement reported back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    last_insert_id: u64,
    rows_affected: u64,
}

impl ExecOutcome {
    pub fn new(last_insert_id: u64, rows_affected: u64) -> Self {
        Self {
            last_insert_id,
            rows_affected,
        }
    }

    /// Id generated by the most recent insert on this connection.
    pub fn last_insert_id(&self) -> Result<i64, StoreError> {
        i64::try_from(self.last_insert_id).map_err(|_| StoreError::OutOfRange {
            what: "last insert id",
            value: self.last_insert_id,
        })
    }

    /// Number of rows the statement changed.
    pub fn rows_affected(&self) -> Result<i64, StoreError> {
        i64::try_from(self.rows_affected).map_err(|_| StoreError::OutOfRange {
            what: "rows affected",
            value: self.rows_affected,
        })
    }
}
