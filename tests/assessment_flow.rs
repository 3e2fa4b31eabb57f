//! End-to-end assessment behaviour with stub classifiers standing in for
//! the ONNX artifacts.

use healthguard::config::ModelsConfig;
use healthguard::error::AssessmentError;
use healthguard::types::verdict::{Severity, Verdict};
use healthguard::{Classifier, Domain, InferenceEngine, ModelRegistry};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Returns a fixed label and records every feature row it receives.
struct StubClassifier {
    label: i64,
    rows: Arc<Mutex<Vec<Vec<f32>>>>,
}

impl StubClassifier {
    fn new(label: i64) -> (Self, Arc<Mutex<Vec<Vec<f32>>>>) {
        let rows = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                label,
                rows: rows.clone(),
            },
            rows,
        )
    }
}

impl Classifier for StubClassifier {
    fn name(&self) -> &str {
        "stub"
    }

    fn predict(&self, features: &[f32]) -> anyhow::Result<i64> {
        self.rows.lock().unwrap().push(features.to_vec());
        Ok(self.label)
    }
}

/// Alternates between 0 and 1 on every call.
struct Alternating(AtomicUsize);

impl Classifier for Alternating {
    fn name(&self) -> &str {
        "alternating"
    }

    fn predict(&self, _features: &[f32]) -> anyhow::Result<i64> {
        Ok((self.0.fetch_add(1, Ordering::SeqCst) % 2) as i64)
    }
}

fn numeric_values(domain: Domain) -> Vec<String> {
    (0..domain.arity()).map(|i| format!("{}.5", i)).collect()
}

#[test]
fn every_domain_yields_one_of_two_verdicts() {
    let registry = Domain::ALL.into_iter().fold(ModelRegistry::new(), |r, d| {
        r.with_model(d, Alternating(AtomicUsize::new(0)))
    });
    let engine = InferenceEngine::new(registry);

    for domain in Domain::ALL {
        for _ in 0..4 {
            let assessment = engine
                .assess_values(domain, &numeric_values(domain))
                .unwrap();
            match assessment.verdict {
                Verdict::HighRisk => assert_eq!(assessment.message.severity, Severity::Danger),
                Verdict::LowRisk => assert_eq!(assessment.message.severity, Severity::Success),
            }
        }
    }
}

#[test]
fn wrong_arity_is_rejected_before_inference() {
    let mut rows_by_domain = Vec::new();
    let mut registry = ModelRegistry::new();
    for domain in Domain::ALL {
        let (stub, rows) = StubClassifier::new(1);
        registry = registry.with_model(domain, stub);
        rows_by_domain.push(rows);
    }
    let engine = InferenceEngine::new(registry);

    for domain in Domain::ALL {
        let mut short = numeric_values(domain);
        short.pop();
        let mut long = numeric_values(domain);
        long.push("1".to_string());

        for values in [short, long] {
            let err = engine.assess_values(domain, &values).unwrap_err();
            assert!(matches!(err, AssessmentError::InvalidInput { domain: d, .. } if d == domain));
        }
    }

    for rows in rows_by_domain {
        assert!(rows.lock().unwrap().is_empty());
    }
}

#[test]
fn single_non_numeric_field_aborts_submission() {
    for domain in Domain::ALL {
        let (stub, rows) = StubClassifier::new(0);
        let engine = InferenceEngine::new(ModelRegistry::new().with_model(domain, stub));

        for bad in ["", "abc"] {
            for position in [0, domain.arity() / 2, domain.arity() - 1] {
                let mut values = numeric_values(domain);
                values[position] = bad.to_string();

                let err = engine.assess_values(domain, &values).unwrap_err();
                assert_eq!(
                    err.invalid_fields(),
                    vec![domain.fields()[position].key],
                    "{domain} position {position} value {bad:?}"
                );
            }
        }

        assert!(rows.lock().unwrap().is_empty());
    }
}

#[test]
fn missing_model_file_only_disables_its_domain() {
    let dir = tempfile::tempdir().unwrap();
    let config = ModelsConfig {
        models_dir: dir.path().display().to_string(),
        ..ModelsConfig::default()
    };

    // Nothing on disk: load records a failure for every domain, then the
    // two domains that do have a model get one.
    let registry = ModelRegistry::load(&config)
        .with_model(Domain::Diabetes, StubClassifier::new(0).0)
        .with_model(Domain::Parkinsons, StubClassifier::new(1).0);
    let engine = InferenceEngine::new(registry);

    assert_eq!(engine.registry().load_errors().len(), 1);
    for _ in 0..3 {
        let err = engine
            .assess_values(Domain::Heart, &numeric_values(Domain::Heart))
            .unwrap_err();
        assert_eq!(
            err,
            AssessmentError::ModelUnavailable {
                domain: Domain::Heart
            }
        );
    }

    assert!(engine
        .assess_values(Domain::Diabetes, &numeric_values(Domain::Diabetes))
        .is_ok());
    assert!(engine
        .assess_values(Domain::Parkinsons, &numeric_values(Domain::Parkinsons))
        .is_ok());
}

#[test]
fn diabetes_scenario_renders_low_risk() {
    let (stub, rows) = StubClassifier::new(0);
    let engine = InferenceEngine::new(ModelRegistry::new().with_model(Domain::Diabetes, stub));

    let values = ["2", "120", "70", "30", "80", "25.0", "0.5", "33"];
    let assessment = engine.assess_values(Domain::Diabetes, &values).unwrap();

    assert_eq!(assessment.verdict, Verdict::LowRisk);
    assert_eq!(assessment.message.headline, "Low Diabetes Risk");
    assert_eq!(assessment.message.severity, Severity::Success);
    assert_eq!(
        *rows.lock().unwrap(),
        vec![vec![2.0, 120.0, 70.0, 30.0, 80.0, 25.0, 0.5, 33.0]]
    );
}

#[test]
fn heart_scenario_empty_chol_never_reaches_model() {
    let (stub, rows) = StubClassifier::new(1);
    let engine = InferenceEngine::new(ModelRegistry::new().with_model(Domain::Heart, stub));

    let form: HashMap<String, String> = Domain::Heart
        .fields()
        .iter()
        .map(|f| {
            let value = if f.key == "chol" { "" } else { "1" };
            (f.key.to_string(), value.to_string())
        })
        .collect();

    let err = engine.assess_form(Domain::Heart, &form).unwrap_err();

    assert!(matches!(err, AssessmentError::InvalidInput { domain: Domain::Heart, .. }));
    assert_eq!(err.invalid_fields(), vec!["chol"]);
    assert!(rows.lock().unwrap().is_empty());
}

#[test]
fn non_binary_label_is_contract_violation() {
    let (stub, _) = StubClassifier::new(3);
    let engine = InferenceEngine::new(ModelRegistry::new().with_model(Domain::Parkinsons, stub));

    let err = engine
        .assess_values(Domain::Parkinsons, &numeric_values(Domain::Parkinsons))
        .unwrap_err();

    assert_eq!(err.kind(), "model_contract_violation_error");
    assert_eq!(
        engine
            .metrics()
            .domain_counters(Domain::Parkinsons)
            .contract_violations,
        1
    );
}
