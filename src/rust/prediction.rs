use std::fmt;
use serde::{Deserialize, Serialize};

use crate::batch::{Batch, Value};

/// Name of the column added to classified tables.
pub const PREDICTION_COLUMN: &str = "Prediction";

/// Human-readable outcome of a heart-disease classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "Heart Disease")]
    HeartDisease,
    #[serde(rename = "No Heart Disease")]
    NoHeartDisease,
}

impl Label {
    /// Maps a raw classifier output to a label. Only `1` is positive.
    pub fn from_raw(raw: i64) -> Self {
        if raw == 1 {
            Label::HeartDisease
        } else {
            Label::NoHeartDisease
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::HeartDisease => "Heart Disease",
            Label::NoHeartDisease => "No Heart Disease",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LabelCounts {
    pub heart_disease: usize,
    pub no_heart_disease: usize,
}

impl LabelCounts {
    pub fn total(&self) -> usize {
        self.heart_disease + self.no_heart_disease
    }
}

/// A classified table: the source batch plus one label per row.
///
/// Built once by [`classify`](crate::classify) and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    batch: Batch,
    labels: Vec<Label>,
}

impl PredictionResult {
    pub(crate) fn new(batch: Batch, labels: Vec<Label>) -> Self {
        debug_assert_eq!(batch.len(), labels.len());
        Self { batch, labels }
    }

    /// Source columns followed by the prediction column.
    pub fn columns(&self) -> Vec<&str> {
        self.batch
            .columns()
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(PREDICTION_COLUMN))
            .collect()
    }

    /// The classified table without its labels.
    pub fn batch(&self) -> &Batch {
        &self.batch
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterates `(cells, label)` pairs in row order.
    pub fn iter(&self) -> impl Iterator<Item = (&[Value], Label)> + '_ {
        self.batch
            .rows()
            .iter()
            .map(Vec::as_slice)
            .zip(self.labels.iter().copied())
    }

    pub fn counts(&self) -> LabelCounts {
        self.labels.iter().fold(LabelCounts::default(), |mut acc, label| {
            match label {
                Label::HeartDisease => acc.heart_disease += 1,
                Label::NoHeartDisease => acc.no_heart_disease += 1,
            }
            acc
        })
    }

    /// Rows that received `label`, in original order.
    pub fn rows_with_label(&self, label: Label) -> PredictionResult {
        let (columns, rows) = self.batch.clone().into_parts();
        let (rows, labels): (Vec<_>, Vec<_>) = rows
            .into_iter()
            .zip(self.labels.iter().copied())
            .filter(|(_, l)| *l == label)
            .unzip();
        PredictionResult::new(Batch::from_parts(columns, rows), labels)
    }

    /// Narrows the result to the named source columns (the prediction column
    /// is always kept). `None` if a name is not a source column.
    pub fn select(&self, names: &[&str]) -> Option<PredictionResult> {
        let batch = self.batch.select(names)?;
        Some(PredictionResult::new(batch, self.labels.clone()))
    }
}
