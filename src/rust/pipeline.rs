use crate::adapter::classify;
use crate::batch::Batch;
use crate::classifier::{Classifier, ClassifierError};
use crate::prediction::PredictionResult;
use crate::schema::Schema;
use crate::validate::{validate, MissingFieldsError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    MissingFields(#[from] MissingFieldsError),
    #[error("Classification failed: {0}")]
    Classifier(#[from] ClassifierError),
}

/// Validates `batch` against `schema`, then classifies it.
///
/// Each call is independent: a failed batch leaves nothing behind, so the
/// caller may resubmit a corrected one with the same classifier.
pub fn predict_batch<C>(batch: Batch, schema: &Schema, classifier: &C) -> Result<PredictionResult, PipelineError>
where
    C: Classifier + ?Sized,
{
    let validated = validate(batch, schema)?;
    Ok(classify(validated, classifier)?)
}
