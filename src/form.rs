//! Form input parsing.
//!
//! Turns the literal text a user typed into a domain's measurement record.
//! Parsing is all-or-nothing: every field is checked, every failure is
//! reported, and no record is produced unless all fields parse.

use crate::error::{AssessmentError, FieldErrorKind, InputProblem};
use crate::types::domain::{Domain, FieldSpec};
use crate::types::measurements::MeasurementSet;
use std::collections::HashMap;

/// Parse one field's text as a finite real number.
///
/// Values are fed to the models as `f32`, so anything that would overflow
/// that type is rejected here as well.
pub fn parse_number(raw: &str) -> Result<f64, FieldErrorKind> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldErrorKind::Empty);
    }

    let value: f64 = trimmed.parse().map_err(|_| FieldErrorKind::NotNumeric)?;
    if !value.is_finite() {
        return Err(FieldErrorKind::NotFinite);
    }
    if !(value as f32).is_finite() {
        return Err(FieldErrorKind::OutOfRange);
    }

    Ok(value)
}

fn field_problem(spec: &FieldSpec, kind: FieldErrorKind) -> InputProblem {
    InputProblem::Field {
        key: spec.key.to_string(),
        label: spec.label.to_string(),
        kind,
    }
}

/// Parser that converts submitted text into measurement records.
///
/// Values are read in the domain's documented field order, which is the
/// order the models expect.
pub struct FormParser;

impl FormParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a keyed form submission (the HTML form path).
    ///
    /// Keys that do not belong to the domain are ignored.
    pub fn parse_fields(
        &self,
        domain: Domain,
        form: &HashMap<String, String>,
    ) -> Result<MeasurementSet, AssessmentError> {
        let texts: Vec<Option<&str>> = domain
            .fields()
            .iter()
            .map(|spec| form.get(spec.key).map(String::as_str))
            .collect();

        self.parse_texts(domain, &texts)
    }

    /// Parse a positional submission (the JSON API path).
    ///
    /// The number of values must equal the domain's arity.
    pub fn parse_positional<S: AsRef<str>>(
        &self,
        domain: Domain,
        values: &[S],
    ) -> Result<MeasurementSet, AssessmentError> {
        if values.len() != domain.arity() {
            return Err(AssessmentError::InvalidInput {
                domain,
                problems: vec![InputProblem::Arity {
                    expected: domain.arity(),
                    actual: values.len(),
                }],
            });
        }

        let texts: Vec<Option<&str>> = values.iter().map(|v| Some(v.as_ref())).collect();
        self.parse_texts(domain, &texts)
    }

    fn parse_texts(
        &self,
        domain: Domain,
        texts: &[Option<&str>],
    ) -> Result<MeasurementSet, AssessmentError> {
        let mut values = Vec::with_capacity(domain.arity());
        let mut problems = Vec::new();

        for (spec, text) in domain.fields().iter().zip(texts) {
            match text {
                None => problems.push(field_problem(spec, FieldErrorKind::Missing)),
                Some(raw) => match parse_number(raw) {
                    Ok(value) => values.push(value),
                    Err(kind) => problems.push(field_problem(spec, kind)),
                },
            }
        }

        if !problems.is_empty() {
            return Err(AssessmentError::InvalidInput { domain, problems });
        }

        MeasurementSet::from_values(domain, &values)
    }
}

impl Default for FormParser {
    fn default() -> Self {
        Self::new()
    }
}
