use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use ndarray::Array2;
use ort::session::Session;
use ort::value::Tensor;
use log::debug;

use super::error::ClassifierError;
use super::{Classifier, ClassifierInfo};

/// A binary classifier backed by an ONNX Runtime session.
///
/// The model is expected to:
/// - Accept one `f32` input of shape `[batch_size, n_features]`
/// - Emit class labels as its first output, either `i64` (the usual export
///   of scikit-learn style models) or `f32` values rounded to the nearest class
///
/// This type is `Send + Sync`; share it across threads with `Arc`.
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use cardioscreen::{Classifier, OnnxClassifier};
/// use ndarray::Array2;
///
/// let classifier = OnnxClassifier::builder()
///     .with_model_file("models/heart_disease.onnx")?
///     .build()?;
///
/// let labels = classifier.predict(&Array2::zeros((1, 13)))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct OnnxClassifier {
    model_path: PathBuf,
    input_name: String,
    session: Arc<Session>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<OnnxClassifier>();
    }
};

impl OnnxClassifier {
    /// Creates a new OnnxClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::OnnxClassifierBuilder {
        super::builder::OnnxClassifierBuilder::new()
    }

    pub(crate) fn new(model_path: PathBuf, session: Session) -> Self {
        let input_name = session.inputs[0].name.clone();
        Self {
            model_path,
            input_name,
            session: Arc::new(session),
        }
    }

    /// Returns information about the loaded model
    pub fn info(&self) -> ClassifierInfo {
        ClassifierInfo {
            model_path: self.model_path.to_string_lossy().to_string(),
            input_name: self.input_name.clone(),
            output_names: self.session.outputs.iter().map(|o| o.name.clone()).collect(),
        }
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &Array2<f32>) -> Result<Vec<i64>, ClassifierError> {
        let rows = features.nrows();
        debug!("Running ONNX inference on {}x{} features", rows, features.ncols());

        let input = Tensor::from_array(features.as_standard_layout().into_owned())
            .map_err(|e| ClassifierError::ModelError(format!("Failed to create input tensor: {}", e)))?;

        let mut input_tensors = HashMap::new();
        input_tensors.insert(self.input_name.as_str(), input);

        let outputs = self.session.run(input_tensors)
            .map_err(|e| ClassifierError::ModelError(format!("Failed to run model: {}", e)))?;

        let labels: Vec<i64> = match outputs[0].try_extract_tensor::<i64>() {
            Ok(tensor) => tensor.iter().copied().collect(),
            Err(_) => outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| ClassifierError::ModelError(format!("Failed to extract output tensor: {}", e)))?
                .iter()
                .map(|v| v.round() as i64)
                .collect(),
        };

        if labels.len() != rows {
            return Err(ClassifierError::ShapeMismatch {
                expected: rows,
                actual: labels.len(),
            });
        }
        Ok(labels)
    }
}
