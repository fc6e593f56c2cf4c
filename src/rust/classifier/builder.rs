use std::path::{Path, PathBuf};
use ort::session::Session;
use log::{info, error};

use super::error::ClassifierError;
use super::model::OnnxClassifier;
use crate::runtime::{RuntimeConfig, create_session_builder};

/// A builder for constructing an [`OnnxClassifier`] with a fluent interface.
#[derive(Default, Debug)]
pub struct OnnxClassifierBuilder {
    model_path: Option<PathBuf>,
    session: Option<Session>,
    runtime_config: RuntimeConfig,
}

impl OnnxClassifierBuilder {
    /// Creates a new empty builder with the default runtime configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the runtime configuration for ONNX model execution.
    ///
    /// Must be called before [`with_model_file`](Self::with_model_file) to
    /// take effect.
    ///
    /// # Example
    /// ```
    /// use cardioscreen::{OnnxClassifierBuilder, RuntimeConfig};
    ///
    /// let builder = OnnxClassifierBuilder::new()
    ///     .with_runtime_config(RuntimeConfig::with_threads(2));
    /// ```
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Loads an ONNX classifier from a local file
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder instance if successful, or an error if:
    ///   - The path is empty or a model was already set
    ///   - The file doesn't exist
    ///   - ONNX Runtime fails to load it
    ///   - The model does not have one input and at least one output
    pub fn with_model_file(mut self, model_path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let model_path = model_path.as_ref();
        if model_path.as_os_str().is_empty() {
            return Err(ClassifierError::BuildError("Model path cannot be empty".to_string()));
        }
        if self.model_path.is_some() {
            return Err(ClassifierError::BuildError("Model path already set".to_string()));
        }
        if !model_path.exists() {
            return Err(ClassifierError::BuildError(format!(
                "Model file not found: {}",
                model_path.display()
            )));
        }

        let session = create_session_builder(&self.runtime_config)?
            .commit_from_file(model_path)
            .map_err(|e| {
                error!("Failed to load model {}: {}", model_path.display(), e);
                ClassifierError::BuildError(format!("Failed to load model: {}", e))
            })?;

        Self::validate_model(&session)?;
        info!("Model structure validated successfully");

        self.model_path = Some(model_path.to_path_buf());
        self.session = Some(session);
        Ok(self)
    }

    /// Builds and returns the final classifier
    pub fn build(mut self) -> Result<OnnxClassifier, ClassifierError> {
        let model_path = self.model_path.take()
            .ok_or_else(|| ClassifierError::BuildError("Model path must be set".to_string()))?;
        let session = self.session.take()
            .ok_or_else(|| ClassifierError::BuildError("No ONNX model loaded".into()))?;

        Ok(OnnxClassifier::new(model_path, session))
    }

    /// Validates that the model takes a single feature tensor and produces
    /// at least one output
    fn validate_model(session: &Session) -> Result<(), ClassifierError> {
        if session.inputs.len() != 1 {
            return Err(ClassifierError::ModelError(format!(
                "Model must have exactly 1 input (the feature matrix), found {}",
                session.inputs.len()
            )));
        }
        if session.outputs.is_empty() {
            return Err(ClassifierError::ModelError(
                "Model must have at least 1 output for class labels".to_string(),
            ));
        }
        Ok(())
    }
}
