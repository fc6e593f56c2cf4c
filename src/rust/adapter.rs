use ndarray::Array2;
use log::{debug, error, info};

use crate::classifier::{Classifier, ClassifierError};
use crate::prediction::{Label, PredictionResult};
use crate::validate::ValidatedBatch;

/// Coerces the projected cells of `batch` into a row-major `f32` matrix.
///
/// Numbers pass through, numeric text is parsed, and the first empty,
/// non-numeric or non-finite cell aborts with [`ClassifierError::InvalidValue`].
/// Values beyond the `f32` range count as non-finite.
pub fn to_features(batch: &ValidatedBatch) -> Result<Array2<f32>, ClassifierError> {
    let width = batch.columns().len();
    let mut data = Vec::with_capacity(batch.len() * width);

    for (row, cells) in batch.iter_rows().enumerate() {
        for (col, cell) in cells.into_iter().enumerate() {
            let value = cell.as_f32().filter(|v| v.is_finite()).ok_or_else(|| ClassifierError::InvalidValue {
                row,
                column: batch.columns()[col].clone(),
                value: cell.to_string(),
            })?;
            data.push(value);
        }
    }

    Array2::from_shape_vec((batch.len(), width), data)
        .map_err(|e| ClassifierError::PredictionError(format!("Failed to create feature matrix: {}", e)))
}

/// Runs `classifier` once over the whole batch and labels every row.
///
/// Row `i` of the result carries the label for row `i` of the input. The
/// result keeps every source column, including ones outside the schema,
/// although only schema columns reach the classifier. Either every row gets a
/// label or an error is returned.
///
/// # Example
/// ```
/// use cardioscreen::{classify, from_fn, validate, Batch, Label, Schema, Value};
/// use ndarray::Array2;
///
/// let batch = Batch::new(vec!["x"], vec![vec![Value::from(1)], vec![Value::from(0)]]).unwrap();
/// let validated = validate(batch, &Schema::new(["x"])).unwrap();
/// let echo = from_fn(|x: &Array2<f32>| Ok(x.column(0).iter().map(|v| *v as i64).collect()));
///
/// let result = classify(validated, &echo).unwrap();
/// assert_eq!(result.labels(), [Label::HeartDisease, Label::NoHeartDisease]);
/// ```
pub fn classify<C>(batch: ValidatedBatch, classifier: &C) -> Result<PredictionResult, ClassifierError>
where
    C: Classifier + ?Sized,
{
    let features = to_features(&batch)?;
    debug!("Classifying {} rows x {} features", features.nrows(), features.ncols());

    let raw = classifier.predict(&features).map_err(|e| {
        error!("Classifier failed on batch of {} rows: {}", batch.len(), e);
        e
    })?;

    if raw.len() != batch.len() {
        return Err(ClassifierError::ShapeMismatch {
            expected: batch.len(),
            actual: raw.len(),
        });
    }

    let labels: Vec<Label> = raw.into_iter().map(Label::from_raw).collect();
    info!("Labelled {} rows", labels.len());

    Ok(PredictionResult::new(batch.into_source(), labels))
}
