//! Load-once registry of domain classifiers
//!
//! The registry is built explicitly at startup and never mutated afterwards.
//! A domain whose artifact fails to load is recorded as a load error and
//! stays disabled; the remaining domains are unaffected.

use crate::config::ModelsConfig;
use crate::error::AssessmentError;
use crate::models::loader::ModelLoader;
use crate::models::Classifier;
use crate::types::domain::Domain;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Classifiers keyed by domain, plus the load errors of missing ones
#[derive(Default)]
pub struct ModelRegistry {
    models: BTreeMap<Domain, Arc<dyn Classifier>>,
    load_errors: BTreeMap<Domain, AssessmentError>,
}

impl ModelRegistry {
    /// Create an empty registry. Every domain is unavailable until a model
    /// is added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every domain's artifact from the configured models directory.
    ///
    /// Never fails: each domain that cannot be loaded is recorded as a
    /// `ModelLoad` error instead.
    pub fn load(config: &ModelsConfig) -> Self {
        let loader = ModelLoader::with_threads(config.onnx_threads);
        let models_dir = Path::new(&config.models_dir);
        let mut registry = Self::new();

        for domain in Domain::ALL {
            let path = models_dir.join(config.files.for_domain(domain));

            if !path.exists() {
                warn!(domain = %domain, path = %path.display(), "Model file not found");
                registry = registry.with_load_error(AssessmentError::ModelLoad {
                    domain,
                    path: path.display().to_string(),
                    reason: "model file not found".to_string(),
                });
                continue;
            }

            match loader.load_model(&path, domain.slug()) {
                Ok(model) => registry = registry.with_model(domain, model),
                Err(e) => {
                    warn!(domain = %domain, error = %e, "Failed to load model, domain disabled");
                    registry = registry.with_load_error(AssessmentError::ModelLoad {
                        domain,
                        path: path.display().to_string(),
                        reason: format!("{:#}", e),
                    });
                }
            }
        }

        info!(
            loaded = registry.models.len(),
            failed = registry.load_errors.len(),
            "Model registry ready"
        );

        registry
    }

    /// Register a classifier for `domain`, clearing any earlier load error.
    pub fn with_model<C: Classifier + 'static>(mut self, domain: Domain, classifier: C) -> Self {
        self.load_errors.remove(&domain);
        self.models.insert(domain, Arc::new(classifier));
        self
    }

    /// Record that `error.domain()` could not be loaded.
    pub fn with_load_error(mut self, error: AssessmentError) -> Self {
        let domain = error.domain();
        self.models.remove(&domain);
        self.load_errors.insert(domain, error);
        self
    }

    /// Classifier for `domain`, or `ModelUnavailable` if it never loaded.
    pub fn get(&self, domain: Domain) -> Result<&dyn Classifier, AssessmentError> {
        self.models
            .get(&domain)
            .map(|m| m.as_ref())
            .ok_or(AssessmentError::ModelUnavailable { domain })
    }

    pub fn is_available(&self, domain: Domain) -> bool {
        self.models.contains_key(&domain)
    }

    /// Domains with a loaded model, in sidebar order
    pub fn available_domains(&self) -> Vec<Domain> {
        self.models.keys().copied().collect()
    }

    /// Load error recorded for `domain`, if any
    pub fn load_error(&self, domain: Domain) -> Option<&AssessmentError> {
        self.load_errors.get(&domain)
    }

    /// All recorded load errors, in sidebar order
    pub fn load_errors(&self) -> Vec<&AssessmentError> {
        self.load_errors.values().collect()
    }
}
