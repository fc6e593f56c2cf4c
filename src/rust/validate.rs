use log::{debug, warn};

use crate::batch::{Batch, Value};
use crate::schema::Schema;

/// The batch lacks one or more required columns.
///
/// `missing` is in schema order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Missing required columns: {}", .missing.join(", "))]
pub struct MissingFieldsError {
    missing: Vec<String>,
}

impl MissingFieldsError {
    pub fn missing(&self) -> &[String] {
        &self.missing
    }
}

/// A batch known to carry every schema column.
///
/// Keeps the source table intact and exposes a projection onto the schema
/// columns in schema order. Extra source columns are invisible through the
/// projection but remain available via [`ValidatedBatch::source`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBatch {
    source: Batch,
    schema: Schema,
    indices: Vec<usize>,
}

impl ValidatedBatch {
    /// Projected column names; always equal to the schema fields.
    pub fn columns(&self) -> &[String] {
        self.schema.fields()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Cells of row `row` in schema order.
    pub fn row(&self, row: usize) -> Option<Vec<&Value>> {
        let cells = self.source.rows().get(row)?;
        Some(self.indices.iter().map(move |&i| &cells[i]).collect())
    }

    /// Iterates the projected rows in source order.
    pub fn iter_rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        self.source
            .rows()
            .iter()
            .map(move |cells| self.indices.iter().map(move |&i| &cells[i]).collect())
    }

    /// Materializes the projection as a standalone batch.
    pub fn to_batch(&self) -> Batch {
        let rows = self
            .iter_rows()
            .map(|cells| cells.into_iter().cloned().collect())
            .collect();
        Batch::from_parts(self.schema.fields().to_vec(), rows)
    }

    /// The batch as it was handed to [`validate`], extra columns included.
    pub fn source(&self) -> &Batch {
        &self.source
    }

    pub fn into_source(self) -> Batch {
        self.source
    }
}

/// Checks that `batch` has every column in `schema`.
///
/// Succeeds with a view ordered by the schema, or fails listing every absent
/// field in schema order. Cell contents are not inspected.
///
/// # Example
/// ```
/// use cardioscreen::{validate, Batch, Schema};
///
/// let batch = Batch::new(vec!["age", "sex"], vec![]).unwrap();
/// let err = validate(batch, &Schema::new(["sex", "age", "thal"])).unwrap_err();
/// assert_eq!(err.missing(), ["thal"]);
/// ```
pub fn validate(batch: Batch, schema: &Schema) -> Result<ValidatedBatch, MissingFieldsError> {
    let mut indices = Vec::with_capacity(schema.len());
    let mut missing = Vec::new();

    for field in schema.fields() {
        match batch.column_index(field) {
            Some(i) => indices.push(i),
            None => missing.push(field.clone()),
        }
    }

    if !missing.is_empty() {
        warn!("Rejecting batch of {} rows, missing columns: {:?}", batch.len(), missing);
        return Err(MissingFieldsError { missing });
    }

    let extra = batch.columns().len() - indices.len();
    if extra > 0 {
        debug!("Ignoring {} column(s) outside the schema", extra);
    }

    Ok(ValidatedBatch {
        source: batch,
        schema: schema.clone(),
        indices,
    })
}
