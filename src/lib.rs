//! HealthGuard Library
//!
//! A clinical risk screening service. Three pre-trained binary classifiers
//! (diabetes, heart disease, Parkinson's disease) are loaded once at startup
//! and served behind per-domain web forms and a JSON API.

pub mod config;
pub mod error;
pub mod form;
pub mod metrics;
pub mod models;
pub mod types;
pub mod web;

pub use config::AppConfig;
pub use error::AssessmentError;
pub use form::FormParser;
pub use models::{inference::InferenceEngine, registry::ModelRegistry, Classifier};
pub use types::{domain::Domain, verdict::Assessment};
