//! ONNX model loader

use crate::models::Classifier;
use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Loaded ONNX classifier with metadata
pub struct LoadedModel {
    /// Model name
    pub name: String,
    /// ONNX Runtime session; running it needs exclusive access
    session: Mutex<Session>,
    /// Input name for the model
    pub input_name: String,
    /// Output carrying the predicted class label
    pub label_output: String,
    /// Output carrying class probabilities, when the graph has one
    pub probability_output: Option<String>,
}

impl LoadedModel {
    /// Pick the class with the highest probability from a `[1, n]` tensor.
    fn argmax(data: &[f32]) -> Option<i64> {
        data.iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(class, _)| class as i64)
    }
}

impl Classifier for LoadedModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &[f32]) -> Result<i64> {
        // Prepare input tensor - shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor = Tensor::from_array((shape, features.to_vec()))
            .context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let outputs = session.run(ort::inputs![&self.input_name => input_tensor])?;

        if let Some(output) = outputs.get(&self.label_output) {
            if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
                let label = data
                    .first()
                    .copied()
                    .ok_or_else(|| anyhow::anyhow!("Empty label tensor"))?;
                debug!(model = %self.name, label = label, "Extracted label");
                return Ok(label);
            }
        }

        // Graphs exported without a usable label output still carry probabilities
        if let Some(name) = &self.probability_output {
            if let Some(output) = outputs.get(name) {
                if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
                    if let Some(label) = Self::argmax(data) {
                        debug!(model = %self.name, label = label, "Derived label from probabilities");
                        return Ok(label);
                    }
                }
            }
        }

        anyhow::bail!("Model {} produced no readable label output", self.name)
    }
}

/// Loader for ONNX models
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Load a single ONNX classifier from file
    pub fn load_model<P: AsRef<Path>>(&self, path: P, name: &str) -> Result<LoadedModel> {
        let path = path.as_ref();

        info!(model = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let label_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .or_else(|| session.outputs.first())
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "output_label".to_string());

        let probability_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .map(|o| o.name.clone());

        info!(
            model = %name,
            input = %input_name,
            label_output = %label_output,
            probability_output = ?probability_output,
            "Model loaded successfully"
        );

        Ok(LoadedModel {
            name: name.to_string(),
            session: Mutex::new(session),
            input_name,
            label_output,
            probability_output,
        })
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax() {
        assert_eq!(LoadedModel::argmax(&[0.2, 0.8]), Some(1));
        assert_eq!(LoadedModel::argmax(&[0.9, 0.1]), Some(0));
        assert_eq!(LoadedModel::argmax(&[]), None);
    }

    #[test]
    fn test_loader_thread_floor() {
        assert_eq!(ModelLoader::with_threads(0).onnx_threads, 1);
        assert_eq!(ModelLoader::default().onnx_threads, 1);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ModelLoader::new();
        let result = loader.load_model(dir.path().join("absent.onnx"), "absent");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_corrupt_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.onnx");
        std::fs::write(&path, b"not an onnx graph").unwrap();

        let loader = ModelLoader::new();
        assert!(loader.load_model(&path, "corrupt").is_err());
    }
}
