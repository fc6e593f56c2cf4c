use ndarray::Array2;

mod error;
mod model;
pub mod builder;

pub use error::ClassifierError;
pub use model::OnnxClassifier;
pub use builder::OnnxClassifierBuilder;

/// A pre-trained binary classifier.
///
/// Receives one row per record, columns in schema order, and returns one raw
/// class scalar per row in the same order. Implementations must be immutable
/// once built so a single instance can serve many batches concurrently.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &Array2<f32>) -> Result<Vec<i64>, ClassifierError>;
}

/// Adapts a closure into a [`Classifier`].
///
/// # Example
/// ```
/// use cardioscreen::{from_fn, Classifier};
/// use ndarray::Array2;
///
/// let always_healthy = from_fn(|x: &Array2<f32>| Ok(vec![0; x.nrows()]));
/// assert_eq!(always_healthy.predict(&Array2::zeros((2, 13))).unwrap(), vec![0, 0]);
/// ```
pub fn from_fn<F>(f: F) -> FnClassifier<F>
where
    F: Fn(&Array2<f32>) -> Result<Vec<i64>, ClassifierError> + Send + Sync,
{
    FnClassifier(f)
}

/// Classifier backed by a closure; see [`from_fn`].
#[derive(Clone)]
pub struct FnClassifier<F>(F);

impl<F> Classifier for FnClassifier<F>
where
    F: Fn(&Array2<f32>) -> Result<Vec<i64>, ClassifierError> + Send + Sync,
{
    fn predict(&self, features: &Array2<f32>) -> Result<Vec<i64>, ClassifierError> {
        (self.0)(features)
    }
}

/// Information about a loaded ONNX classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Path to the ONNX model file
    pub model_path: String,
    /// Name of the model's feature input
    pub input_name: String,
    /// Names of the model outputs; the first carries the class labels
    pub output_names: Vec<String>,
}
