//! Classifier loading, registry and inference dispatch

pub mod inference;
pub mod loader;
pub mod registry;

pub use inference::InferenceEngine;
pub use loader::{LoadedModel, ModelLoader};
pub use registry::ModelRegistry;

/// A pre-trained binary classifier.
///
/// Implementations take one feature row in training column order and return
/// the raw predicted class label. Callers validate the label range.
pub trait Classifier: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Predict the class label for a single-row batch.
    fn predict(&self, features: &[f32]) -> anyhow::Result<i64>;
}
