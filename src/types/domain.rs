//! Assessment domains and their input field catalogues

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One labelled measurement on a domain's input form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Form key posted by the browser
    pub key: &'static str,
    /// Label shown next to the text input
    pub label: &'static str,
}

const fn field(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec { key, label }
}

/// Diabetes fields, in the order the model was trained on.
pub const DIABETES_FIELDS: [FieldSpec; 8] = [
    field("pregnancies", "Number of Pregnancies"),
    field("glucose", "Glucose Level"),
    field("blood_pressure", "Blood Pressure"),
    field("skin_thickness", "Skin Thickness"),
    field("insulin", "Insulin Level"),
    field("bmi", "BMI Value"),
    field("diabetes_pedigree_function", "Diabetes Pedigree Function"),
    field("age", "Age of the Person"),
];

/// Heart disease fields, in the order the model was trained on.
pub const HEART_FIELDS: [FieldSpec; 13] = [
    field("age", "Age"),
    field("sex", "Sex (0=Female, 1=Male)"),
    field("cp", "Chest Pain Type (0-3)"),
    field("trestbps", "Resting Blood Pressure"),
    field("chol", "Serum Cholesterol"),
    field("fbs", "Fasting Blood Sugar"),
    field("restecg", "Resting ECG"),
    field("thalach", "Max Heart Rate"),
    field("exang", "Exercise Induced Angina"),
    field("oldpeak", "ST Depression"),
    field("slope", "Slope of Peak Exercise"),
    field("ca", "Major Vessels"),
    field("thal", "Thalassemia"),
];

/// Parkinson's voice-measurement fields, in the order the model was trained on.
pub const PARKINSONS_FIELDS: [FieldSpec; 22] = [
    field("fo", "Mean Fundamental Frequency (Hz)"),
    field("fhi", "Maximum Fundamental Frequency (Hz)"),
    field("flo", "Minimum Fundamental Frequency (Hz)"),
    field("jitter_percent", "Jitter Percentage"),
    field("jitter_abs", "Absolute Jitter"),
    field("rap", "Relative Average Perturbation"),
    field("ppq", "Pitch Period Perturbation"),
    field("ddp", "Difference of Differences of Pitch"),
    field("shimmer", "Shimmer (Amplitude Variation)"),
    field("shimmer_db", "Shimmer (dB)"),
    field("apq3", "3-point Amplitude Perturbation"),
    field("apq5", "5-point Amplitude Perturbation"),
    field("apq", "Amplitude Perturbation Quotient"),
    field("dda", "Degree of Amplitude Perturbation"),
    field("nhr", "Noise-to-Harmonics Ratio"),
    field("hnr", "Harmonics-to-Noise Ratio"),
    field("rpde", "Recurrence Period Density Entropy"),
    field("dfa", "Detrended Fluctuation Analysis"),
    field("spread1", "Fundamental Frequency Variation 1"),
    field("spread2", "Fundamental Frequency Variation 2"),
    field("d2", "Correlation Dimension"),
    field("ppe", "Pitch Period Entropy"),
];

/// An independent assessment area with its own model and input form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Diabetes,
    Heart,
    Parkinsons,
}

impl Domain {
    /// All domains in sidebar order
    pub const ALL: [Domain; 3] = [Domain::Diabetes, Domain::Heart, Domain::Parkinsons];

    /// URL path segment and config key
    pub fn slug(&self) -> &'static str {
        match self {
            Domain::Diabetes => "diabetes",
            Domain::Heart => "heart",
            Domain::Parkinsons => "parkinsons",
        }
    }

    /// Name shown in the navigation menu
    pub fn display_name(&self) -> &'static str {
        match self {
            Domain::Diabetes => "Diabetes",
            Domain::Heart => "Heart Disease",
            Domain::Parkinsons => "Parkinson's Disease",
        }
    }

    /// Heading of the domain's form page
    pub fn page_title(&self) -> &'static str {
        match self {
            Domain::Diabetes => "Diabetes Risk Assessment",
            Domain::Heart => "Cardiac Health Assessment",
            Domain::Parkinsons => "Neurological Health Assessment",
        }
    }

    /// Caption of the submit button
    pub fn submit_label(&self) -> &'static str {
        match self {
            Domain::Diabetes => "Assess Diabetes Risk",
            Domain::Heart => "Assess Cardiac Risk",
            Domain::Parkinsons => "Assess Neurological Health",
        }
    }

    /// Ordered input fields
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            Domain::Diabetes => &DIABETES_FIELDS,
            Domain::Heart => &HEART_FIELDS,
            Domain::Parkinsons => &PARKINSONS_FIELDS,
        }
    }

    /// Number of features the domain's model expects
    pub fn arity(&self) -> usize {
        self.fields().len()
    }

    /// Default artifact file name inside the models directory
    pub fn default_model_file(&self) -> &'static str {
        match self {
            Domain::Diabetes => "diabetes_model.onnx",
            Domain::Heart => "heart_model.onnx",
            Domain::Parkinsons => "parkinsons_model.onnx",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Domain {
    type Err = UnknownDomain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::ALL
            .into_iter()
            .find(|d| d.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownDomain(s.to_string()))
    }
}

/// Returned when a path segment names no known domain
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown assessment domain: {0}")]
pub struct UnknownDomain(pub String);
