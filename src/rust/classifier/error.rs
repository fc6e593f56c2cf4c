use ort::Error as OrtError;
use std::fmt;

/// Represents the different ways a classification call can fail.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// Error occurred while loading or running the ONNX model
    ModelError(String),
    /// Error occurred while assembling a classifier
    BuildError(String),
    /// The classifier itself reported a failure
    PredictionError(String),
    /// A cell could not be coerced to a number
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
    /// The classifier returned a different number of outputs than rows given
    ShapeMismatch { expected: usize, actual: usize },
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModelError(msg) => write!(f, "Model error: {}", msg),
            Self::BuildError(msg) => write!(f, "Build error: {}", msg),
            Self::PredictionError(msg) => write!(f, "Prediction error: {}", msg),
            Self::InvalidValue { row, column, value } => write!(
                f,
                "Invalid value in row {}, column '{}': {:?} is not numeric",
                row, column, value
            ),
            Self::ShapeMismatch { expected, actual } => write!(
                f,
                "Shape mismatch: expected {} predictions, got {}",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for ClassifierError {}

impl From<OrtError> for ClassifierError {
    fn from(err: OrtError) -> Self {
        ClassifierError::BuildError(err.to_string())
    }
}
