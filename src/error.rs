//! Error taxonomy for assessments
//!
//! Every variant is recovered at the boundary of the affected domain and
//! shown to the user; none of them terminates the process.

use crate::types::domain::Domain;
use serde::Serialize;
use std::fmt;

/// Why a single form field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// Field was not submitted at all
    Missing,
    /// Field was submitted blank
    Empty,
    /// Text does not parse as a real number
    NotNumeric,
    /// Parsed to NaN or infinity
    NotFinite,
    /// Finite, but too large in magnitude for the model's `f32` input
    OutOfRange,
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FieldErrorKind::Missing => "missing",
            FieldErrorKind::Empty => "empty",
            FieldErrorKind::NotNumeric => "not a number",
            FieldErrorKind::NotFinite => "not a finite number",
            FieldErrorKind::OutOfRange => "outside the supported numeric range",
        };
        f.write_str(text)
    }
}

/// One reason a submission failed validation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "problem", rename_all = "snake_case")]
pub enum InputProblem {
    /// Positional submission carried the wrong number of values
    Arity { expected: usize, actual: usize },
    /// A named field could not be parsed
    Field {
        key: String,
        label: String,
        kind: FieldErrorKind,
    },
    /// Request body did not have a recognisable shape
    Malformed { detail: String },
}

impl fmt::Display for InputProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputProblem::Arity { expected, actual } => {
                write!(f, "expected {} values, got {}", expected, actual)
            }
            InputProblem::Field { label, kind, .. } => write!(f, "{}: {}", label, kind),
            InputProblem::Malformed { detail } => write!(f, "malformed request: {}", detail),
        }
    }
}

/// Domain-scoped assessment failure
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssessmentError {
    /// Artifact missing or unreadable at startup; the domain stays disabled.
    #[error("{domain} model could not be loaded from {path}: {reason}")]
    ModelLoad {
        domain: Domain,
        path: String,
        reason: String,
    },

    /// At least one submitted value was rejected; nothing reached the model.
    #[error("invalid input for {domain}: {}", join_problems(.problems))]
    InvalidInput {
        domain: Domain,
        problems: Vec<InputProblem>,
    },

    /// Submit attempted against a domain whose model failed to load.
    #[error("{domain} model is unavailable")]
    ModelUnavailable { domain: Domain },

    /// The classifier did not honour its binary predict contract.
    #[error("{domain} model violated its contract: {detail}")]
    ModelContractViolation { domain: Domain, detail: String },
}

fn join_problems(problems: &[InputProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl AssessmentError {
    /// Domain the error is scoped to
    pub fn domain(&self) -> Domain {
        match self {
            AssessmentError::ModelLoad { domain, .. }
            | AssessmentError::InvalidInput { domain, .. }
            | AssessmentError::ModelUnavailable { domain }
            | AssessmentError::ModelContractViolation { domain, .. } => *domain,
        }
    }

    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AssessmentError::ModelLoad { .. } => "model_load_error",
            AssessmentError::InvalidInput { .. } => "invalid_input_error",
            AssessmentError::ModelUnavailable { .. } => "model_unavailable_error",
            AssessmentError::ModelContractViolation { .. } => "model_contract_violation_error",
        }
    }

    /// Form keys of the fields that failed validation
    pub fn invalid_fields(&self) -> Vec<&str> {
        match self {
            AssessmentError::InvalidInput { problems, .. } => problems
                .iter()
                .filter_map(|p| match p {
                    InputProblem::Field { key, .. } => Some(key.as_str()),
                    InputProblem::Arity { .. } | InputProblem::Malformed { .. } => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}
