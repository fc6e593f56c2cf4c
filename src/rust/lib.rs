//! Schema-checked batch inference for pre-trained heart-disease classifiers.
//!
//! A table of patient records is validated against the 13 required fields,
//! projected to the model's column order, classified in one call, and each
//! row labelled `"Heart Disease"` or `"No Heart Disease"`.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use cardioscreen::{from_fn, predict_batch, Batch, Label, Schema, Value};
//! use ndarray::Array2;
//!
//! let columns = vec![
//!     "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg",
//!     "thalach", "exang", "oldpeak", "slope", "ca", "thal",
//! ];
//! let row = [63.0, 1.0, 3.0, 145.0, 233.0, 1.0, 0.0, 150.0, 0.0, 2.3, 0.0, 0.0, 1.0]
//!     .into_iter()
//!     .map(Value::from)
//!     .collect();
//! let batch = Batch::new(columns, vec![row])?;
//!
//! // Any `Classifier` works here; `OnnxClassifier` loads a real model.
//! let classifier = from_fn(|x: &Array2<f32>| Ok(vec![1; x.nrows()]));
//!
//! let result = predict_batch(batch, &Schema::heart_disease(), &classifier)?;
//! assert_eq!(result.labels(), [Label::HeartDisease]);
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! Classifiers are `Send + Sync` and never mutated by inference, so one
//! instance can be shared across threads with `Arc` while each thread submits
//! its own batch.

mod adapter;
mod batch;
pub mod classifier;
pub mod model_manager;
mod pipeline;
mod prediction;
pub mod report;
mod runtime;
mod schema;
pub mod table;
mod validate;

pub use adapter::{classify, to_features};
pub use batch::{Batch, BatchError, Value};
pub use classifier::{from_fn, Classifier, ClassifierError, ClassifierInfo, FnClassifier, OnnxClassifier, OnnxClassifierBuilder};
pub use model_manager::{ModelError, ModelInfo, ModelManager, ModelSource};
pub use pipeline::{predict_batch, PipelineError};
pub use prediction::{Label, LabelCounts, PredictionResult, PREDICTION_COLUMN};
pub use runtime::{create_session_builder, OptimizationLevel, RuntimeConfig};
pub use schema::{Schema, HEART_DISEASE_FIELDS};
pub use table::TableError;
pub use validate::{validate, MissingFieldsError, ValidatedBatch};

pub fn init_logger() {
    env_logger::init();
}
