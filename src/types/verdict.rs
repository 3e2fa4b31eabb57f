//! Verdicts and assessment records

use crate::error::AssessmentError;
use crate::types::domain::Domain;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Binary outcome of a domain classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    HighRisk,
    LowRisk,
}

impl Verdict {
    /// Map a raw classifier label onto a verdict.
    ///
    /// Only 0 and 1 are valid; anything else means the model broke its
    /// binary contract.
    pub fn from_label(domain: Domain, label: i64) -> Result<Self, AssessmentError> {
        match label {
            1 => Ok(Verdict::HighRisk),
            0 => Ok(Verdict::LowRisk),
            other => Err(AssessmentError::ModelContractViolation {
                domain,
                detail: format!("label {} is not 0 or 1", other),
            }),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Verdict::HighRisk => Severity::Danger,
            Verdict::LowRisk => Severity::Success,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::HighRisk => "high_risk",
            Verdict::LowRisk => "low_risk",
        }
    }
}

/// Visual state of the verdict card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Danger,
    Success,
}

impl Severity {
    /// Card background colour
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Danger => "#e74c3c",
            Severity::Success => "#27ae60",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Danger => "\u{1F6A8}",
            Severity::Success => "\u{2705}",
        }
    }
}

/// Rendered verdict text for one domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VerdictMessage {
    pub headline: &'static str,
    pub advice: &'static str,
    pub severity: Severity,
}

impl VerdictMessage {
    /// Fixed message for a domain's verdict.
    pub fn for_verdict(domain: Domain, verdict: Verdict) -> Self {
        let (headline, advice) = match (domain, verdict) {
            (Domain::Diabetes, Verdict::HighRisk) => (
                "High Diabetes Risk",
                "Consult a healthcare professional immediately",
            ),
            (Domain::Diabetes, Verdict::LowRisk) => {
                ("Low Diabetes Risk", "Maintain healthy lifestyle habits")
            }
            (Domain::Heart, Verdict::HighRisk) => (
                "Cardiac Risk Detected",
                "Immediate medical consultation recommended",
            ),
            (Domain::Heart, Verdict::LowRisk) => {
                ("Healthy Cardiac Profile", "Continue with regular checkups")
            }
            (Domain::Parkinsons, Verdict::HighRisk) => (
                "Neurological Risk Detected",
                "Consult a neurologist immediately",
            ),
            (Domain::Parkinsons, Verdict::LowRisk) => (
                "Normal Neurological Profile",
                "Maintain regular health monitoring",
            ),
        };

        Self {
            headline,
            advice,
            severity: verdict.severity(),
        }
    }
}

/// Render a raw classifier label as a verdict message.
pub fn render_label(domain: Domain, label: i64) -> Result<VerdictMessage, AssessmentError> {
    let verdict = Verdict::from_label(domain, label)?;
    Ok(VerdictMessage::for_verdict(domain, verdict))
}

/// Outcome of one successful submission
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    /// Unique assessment identifier
    pub assessment_id: String,

    pub domain: Domain,

    /// Raw label returned by the classifier
    pub label: i64,

    pub verdict: Verdict,

    pub message: VerdictMessage,

    /// Wall time spent parsing and predicting, in microseconds
    pub processing_time_us: u64,

    pub timestamp: DateTime<Utc>,
}

impl Assessment {
    pub fn new(domain: Domain, label: i64, verdict: Verdict) -> Self {
        Self {
            assessment_id: uuid::Uuid::new_v4().to_string(),
            domain,
            label,
            verdict,
            message: VerdictMessage::for_verdict(domain, verdict),
            processing_time_us: 0,
            timestamp: Utc::now(),
        }
    }

    pub fn with_processing_time(mut self, processing_time_us: u64) -> Self {
        self.processing_time_us = processing_time_us;
        self
    }
}
