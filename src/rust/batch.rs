use std::collections::HashSet;
use std::fmt;

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Empty,
}

impl Value {
    /// Interprets a raw cell as read from a delimited file.
    ///
    /// Blank cells become `Empty`, anything that parses as a float becomes
    /// `Number`, everything else is kept verbatim as `Text`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(number) => Value::Number(number),
            Err(_) => Value::Text(raw.to_string()),
        }
    }

    /// Numeric view of the cell, parsing numeric text. `None` for empty and
    /// non-numeric cells.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Number(n) => Some(*n as f32),
            Value::Text(s) => s.trim().parse::<f32>().ok(),
            Value::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Empty => Ok(()),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Number(f64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(v as f64)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(f64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchError {
    #[error("Row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),
}

/// An in-memory table: named columns and rows of cells.
///
/// Every row is exactly as wide as the header and column names are unique.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Batch {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Batch {
    /// Builds a batch, checking row widths and column-name uniqueness.
    ///
    /// # Example
    /// ```
    /// use cardioscreen::{Batch, Value};
    ///
    /// let batch = Batch::new(
    ///     vec!["age", "chol"],
    ///     vec![vec![Value::from(63), Value::from(233)]],
    /// ).unwrap();
    /// assert_eq!(batch.len(), 1);
    /// ```
    pub fn new<S: Into<String>>(columns: Vec<S>, rows: Vec<Vec<Value>>) -> Result<Self, BatchError> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();

        let mut seen = HashSet::new();
        if let Some(dup) = columns.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(BatchError::DuplicateColumn(dup.clone()));
        }

        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns.len()) {
            return Err(BatchError::RaggedRow {
                row,
                expected: columns.len(),
                actual: cells.len(),
            });
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Copies the named columns, in the given order, into a new batch.
    /// Returns `None` if any name is absent or repeated.
    pub fn select(&self, names: &[&str]) -> Option<Batch> {
        let mut seen = HashSet::new();
        if !names.iter().all(|n| seen.insert(*n)) {
            return None;
        }
        let indices = names
            .iter()
            .map(|n| self.column_index(n))
            .collect::<Option<Vec<_>>>()?;

        let columns = names.iter().map(|n| n.to_string()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Some(Batch { columns, rows })
    }

    /// Skips the checks in [`Batch::new`]; callers guarantee unique columns
    /// and rows of header width.
    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<Vec<Value>>) {
        (self.columns, self.rows)
    }
}
