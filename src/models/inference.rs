//! Inference dispatch for assessment submissions
//!
//! One submission runs synchronously through availability check, parsing,
//! prediction and verdict mapping. A failure at any step ends the submission
//! without calling the classifier for anything partial.

use crate::config::AppConfig;
use crate::error::{AssessmentError, InputProblem};
use crate::form::FormParser;
use crate::metrics::AssessmentMetrics;
use crate::models::registry::ModelRegistry;
use crate::types::domain::Domain;
use crate::types::measurements::MeasurementSet;
use crate::types::verdict::{Assessment, Verdict};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Dispatcher from parsed submissions to the loaded domain classifiers
pub struct InferenceEngine {
    /// Classifiers loaded at startup
    registry: ModelRegistry,
    /// Text-to-record parser
    parser: FormParser,
    /// Shared outcome counters
    metrics: Arc<AssessmentMetrics>,
}

impl InferenceEngine {
    /// Create an engine around an already built registry
    pub fn new(registry: ModelRegistry) -> Self {
        Self::with_metrics(registry, Arc::new(AssessmentMetrics::new()))
    }

    /// Create an engine that records into existing metrics
    pub fn with_metrics(registry: ModelRegistry, metrics: Arc<AssessmentMetrics>) -> Self {
        info!(
            available = ?registry.available_domains(),
            "Inference engine initialized"
        );

        Self {
            registry,
            parser: FormParser::new(),
            metrics,
        }
    }

    /// Load every model named in the configuration and build an engine
    pub fn from_config(config: &AppConfig, metrics: Arc<AssessmentMetrics>) -> Self {
        Self::with_metrics(ModelRegistry::load(&config.models), metrics)
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> &Arc<AssessmentMetrics> {
        &self.metrics
    }

    /// Run a parsed record through its domain's classifier
    pub fn predict(&self, measurements: &MeasurementSet) -> Result<Verdict, AssessmentError> {
        let domain = measurements.domain();
        let classifier = self.registry.get(domain)?;
        let features = measurements.to_features();

        let label = classifier.predict(&features).map_err(|e| {
            error!(domain = %domain, model = %classifier.name(), error = %e, "Inference failed");
            AssessmentError::ModelContractViolation {
                domain,
                detail: format!("inference failed: {:#}", e),
            }
        })?;

        debug!(domain = %domain, label = label, "Model prediction");

        Verdict::from_label(domain, label)
    }

    /// Assess a keyed form submission
    pub fn assess_form(
        &self,
        domain: Domain,
        form: &HashMap<String, String>,
    ) -> Result<Assessment, AssessmentError> {
        self.assess_with(domain, || self.parser.parse_fields(domain, form))
    }

    /// Assess a positional submission, values in field order
    pub fn assess_values<S: AsRef<str>>(
        &self,
        domain: Domain,
        values: &[S],
    ) -> Result<Assessment, AssessmentError> {
        self.assess_with(domain, || self.parser.parse_positional(domain, values))
    }

    /// Reject a submission whose body could not be read as values.
    ///
    /// A disabled domain still reports `ModelUnavailable` first.
    pub fn reject_malformed(&self, domain: Domain, detail: String) -> AssessmentError {
        let err = match self.registry.get(domain) {
            Err(e) => e,
            Ok(_) => AssessmentError::InvalidInput {
                domain,
                problems: vec![InputProblem::Malformed { detail }],
            },
        };

        self.metrics.record_error(&err);
        debug!(domain = %domain, error = %err, "Malformed submission rejected");
        err
    }

    fn assess_with(
        &self,
        domain: Domain,
        parse: impl FnOnce() -> Result<MeasurementSet, AssessmentError>,
    ) -> Result<Assessment, AssessmentError> {
        let start_time = Instant::now();

        let outcome = self
            .registry
            .get(domain)
            .and_then(|_| parse())
            .and_then(|measurements| {
                let verdict = self.predict(&measurements)?;
                Ok(Assessment::new(domain, label_of(verdict), verdict))
            });

        let processing_time = start_time.elapsed();

        match outcome {
            Ok(assessment) => {
                self.metrics
                    .record_assessment(domain, processing_time, assessment.verdict);
                info!(
                    assessment_id = %assessment.assessment_id,
                    domain = %domain,
                    verdict = assessment.verdict.as_str(),
                    processing_time_us = processing_time.as_micros(),
                    "Assessment rendered"
                );
                Ok(assessment.with_processing_time(processing_time.as_micros() as u64))
            }
            Err(e) => {
                self.metrics.record_error(&e);
                debug!(domain = %domain, error = %e, "Assessment rejected");
                Err(e)
            }
        }
    }
}

fn label_of(verdict: Verdict) -> i64 {
    match verdict {
        Verdict::HighRisk => 1,
        Verdict::LowRisk => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Classifier;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Recording {
        label: i64,
        calls: Arc<AtomicUsize>,
        last_len: Arc<AtomicUsize>,
    }

    impl Classifier for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        fn predict(&self, features: &[f32]) -> anyhow::Result<i64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.last_len.store(features.len(), Ordering::SeqCst);
            Ok(self.label)
        }
    }

    struct Failing;

    impl Classifier for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn predict(&self, _features: &[f32]) -> anyhow::Result<i64> {
            anyhow::bail!("session run failed")
        }
    }

    fn engine_with(
        domain: Domain,
        label: i64,
    ) -> (InferenceEngine, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let last_len = Arc::new(AtomicUsize::new(0));
        let registry = ModelRegistry::new().with_model(
            domain,
            Recording {
                label,
                calls: calls.clone(),
                last_len: last_len.clone(),
            },
        );
        (InferenceEngine::new(registry), calls, last_len)
    }

    #[test]
    fn test_diabetes_low_risk_scenario() {
        let (engine, calls, last_len) = engine_with(Domain::Diabetes, 0);
        let values = ["2", "120", "70", "30", "80", "25.0", "0.5", "33"];

        let assessment = engine.assess_values(Domain::Diabetes, &values).unwrap();

        assert_eq!(assessment.verdict, Verdict::LowRisk);
        assert_eq!(assessment.label, 0);
        assert_eq!(assessment.message.headline, "Low Diabetes Risk");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(last_len.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn test_invalid_input_never_reaches_model() {
        let (engine, calls, _) = engine_with(Domain::Diabetes, 1);
        let values = ["2", "abc", "70", "30", "80", "25.0", "0.5", "33"];

        let err = engine.assess_values(Domain::Diabetes, &values).unwrap_err();

        assert!(matches!(err, AssessmentError::InvalidInput { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            engine.metrics().domain_counters(Domain::Diabetes).invalid_input,
            1
        );
    }

    #[test]
    fn test_f32_overflow_never_reaches_model() {
        let (engine, calls, _) = engine_with(Domain::Diabetes, 0);
        let values = ["1e300", "120", "70", "30", "80", "25.0", "0.5", "33"];

        let err = engine.assess_values(Domain::Diabetes, &values).unwrap_err();

        assert_eq!(err.invalid_fields(), vec!["pregnancies"]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_malformed_body_counts_as_invalid_input() {
        let (engine, _, _) = engine_with(Domain::Diabetes, 0);

        let err = engine.reject_malformed(Domain::Diabetes, "not json".to_string());
        assert_eq!(err.kind(), "invalid_input_error");
        assert_eq!(
            engine.metrics().domain_counters(Domain::Diabetes).invalid_input,
            1
        );

        let err = engine.reject_malformed(Domain::Heart, "not json".to_string());
        assert_eq!(
            err,
            AssessmentError::ModelUnavailable {
                domain: Domain::Heart
            }
        );
    }

    #[test]
    fn test_unavailable_domain_wins_over_invalid_input() {
        let (engine, _, _) = engine_with(Domain::Diabetes, 1);

        let err = engine.assess_values(Domain::Heart, &["x"]).unwrap_err();

        assert_eq!(
            err,
            AssessmentError::ModelUnavailable {
                domain: Domain::Heart
            }
        );
    }

    #[test]
    fn test_out_of_range_label_is_contract_violation() {
        let (engine, _, _) = engine_with(Domain::Diabetes, 7);
        let values = ["2", "120", "70", "30", "80", "25.0", "0.5", "33"];

        let err = engine.assess_values(Domain::Diabetes, &values).unwrap_err();

        assert!(matches!(
            err,
            AssessmentError::ModelContractViolation {
                domain: Domain::Diabetes,
                ..
            }
        ));
    }

    #[test]
    fn test_runtime_failure_is_contract_violation() {
        let registry = ModelRegistry::new().with_model(Domain::Heart, Failing);
        let engine = InferenceEngine::new(registry);
        let values: Vec<String> = (0..13).map(|i| i.to_string()).collect();

        let err = engine.assess_values(Domain::Heart, &values).unwrap_err();

        match err {
            AssessmentError::ModelContractViolation { detail, .. } => {
                assert!(detail.contains("session run failed"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
