//! Type definitions for HealthGuard assessments

pub mod domain;
pub mod measurements;
pub mod verdict;

pub use domain::{Domain, FieldSpec};
pub use measurements::{
    DiabetesMeasurements, HeartMeasurements, MeasurementSet, Measurements, ParkinsonsMeasurements,
};
pub use verdict::{Assessment, Severity, Verdict, VerdictMessage};
