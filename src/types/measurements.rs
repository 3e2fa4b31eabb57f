//! Fixed-arity measurement records, one per domain
//!
//! Each record names every feature its model expects. Converting a record to
//! a feature vector is the only place the training-time column order lives.

use crate::error::{AssessmentError, InputProblem};
use crate::types::domain::Domain;
use serde::Serialize;

/// A parsed, complete set of measurements for one domain.
pub trait Measurements: Sized {
    /// Domain whose model consumes this record
    const DOMAIN: Domain;

    /// Build the record from values in form order.
    ///
    /// Fails with `InvalidInput` when `values` does not have exactly the
    /// domain's arity.
    fn from_values(values: &[f64]) -> Result<Self, AssessmentError>;

    /// Feature vector in the order the model was trained on.
    fn to_features(&self) -> Vec<f32>;
}

fn arity_error(domain: Domain, actual: usize) -> AssessmentError {
    AssessmentError::InvalidInput {
        domain,
        problems: vec![InputProblem::Arity {
            expected: domain.arity(),
            actual,
        }],
    }
}

/// Pima-style diabetes screening inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiabetesMeasurements {
    pub pregnancies: f64,
    pub glucose: f64,
    pub blood_pressure: f64,
    pub skin_thickness: f64,
    pub insulin: f64,
    pub bmi: f64,
    pub diabetes_pedigree_function: f64,
    pub age: f64,
}

impl Measurements for DiabetesMeasurements {
    const DOMAIN: Domain = Domain::Diabetes;

    fn from_values(values: &[f64]) -> Result<Self, AssessmentError> {
        let &[pregnancies, glucose, blood_pressure, skin_thickness, insulin, bmi, diabetes_pedigree_function, age] =
            values
        else {
            return Err(arity_error(Self::DOMAIN, values.len()));
        };

        Ok(Self {
            pregnancies,
            glucose,
            blood_pressure,
            skin_thickness,
            insulin,
            bmi,
            diabetes_pedigree_function,
            age,
        })
    }

    fn to_features(&self) -> Vec<f32> {
        vec![
            self.pregnancies as f32,
            self.glucose as f32,
            self.blood_pressure as f32,
            self.skin_thickness as f32,
            self.insulin as f32,
            self.bmi as f32,
            self.diabetes_pedigree_function as f32,
            self.age as f32,
        ]
    }
}

/// Cleveland-style heart disease inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeartMeasurements {
    pub age: f64,
    /// 0 = female, 1 = male
    pub sex: f64,
    /// Chest pain type (0-3)
    pub cp: f64,
    /// Resting blood pressure
    pub trestbps: f64,
    /// Serum cholesterol
    pub chol: f64,
    /// Fasting blood sugar
    pub fbs: f64,
    /// Resting ECG result
    pub restecg: f64,
    /// Maximum heart rate achieved
    pub thalach: f64,
    /// Exercise induced angina
    pub exang: f64,
    /// ST depression induced by exercise
    pub oldpeak: f64,
    /// Slope of the peak exercise ST segment
    pub slope: f64,
    /// Number of major vessels
    pub ca: f64,
    /// Thalassemia
    pub thal: f64,
}

impl Measurements for HeartMeasurements {
    const DOMAIN: Domain = Domain::Heart;

    fn from_values(values: &[f64]) -> Result<Self, AssessmentError> {
        let &[age, sex, cp, trestbps, chol, fbs, restecg, thalach, exang, oldpeak, slope, ca, thal] =
            values
        else {
            return Err(arity_error(Self::DOMAIN, values.len()));
        };

        Ok(Self {
            age,
            sex,
            cp,
            trestbps,
            chol,
            fbs,
            restecg,
            thalach,
            exang,
            oldpeak,
            slope,
            ca,
            thal,
        })
    }

    fn to_features(&self) -> Vec<f32> {
        vec![
            self.age as f32,
            self.sex as f32,
            self.cp as f32,
            self.trestbps as f32,
            self.chol as f32,
            self.fbs as f32,
            self.restecg as f32,
            self.thalach as f32,
            self.exang as f32,
            self.oldpeak as f32,
            self.slope as f32,
            self.ca as f32,
            self.thal as f32,
        ]
    }
}

/// Voice-recording biomarkers used by the Parkinson's model
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParkinsonsMeasurements {
    /// MDVP:Fo(Hz)
    pub fo: f64,
    /// MDVP:Fhi(Hz)
    pub fhi: f64,
    /// MDVP:Flo(Hz)
    pub flo: f64,
    /// MDVP:Jitter(%)
    pub jitter_percent: f64,
    /// MDVP:Jitter(Abs)
    pub jitter_abs: f64,
    /// MDVP:RAP
    pub rap: f64,
    /// MDVP:PPQ
    pub ppq: f64,
    /// Jitter:DDP
    pub ddp: f64,
    /// MDVP:Shimmer
    pub shimmer: f64,
    /// MDVP:Shimmer(dB)
    pub shimmer_db: f64,
    /// Shimmer:APQ3
    pub apq3: f64,
    /// Shimmer:APQ5
    pub apq5: f64,
    /// MDVP:APQ
    pub apq: f64,
    /// Shimmer:DDA
    pub dda: f64,
    pub nhr: f64,
    pub hnr: f64,
    pub rpde: f64,
    pub dfa: f64,
    pub spread1: f64,
    pub spread2: f64,
    pub d2: f64,
    pub ppe: f64,
}

impl Measurements for ParkinsonsMeasurements {
    const DOMAIN: Domain = Domain::Parkinsons;

    fn from_values(values: &[f64]) -> Result<Self, AssessmentError> {
        let &[fo, fhi, flo, jitter_percent, jitter_abs, rap, ppq, ddp, shimmer, shimmer_db, apq3, apq5, apq, dda, nhr, hnr, rpde, dfa, spread1, spread2, d2, ppe] =
            values
        else {
            return Err(arity_error(Self::DOMAIN, values.len()));
        };

        Ok(Self {
            fo,
            fhi,
            flo,
            jitter_percent,
            jitter_abs,
            rap,
            ppq,
            ddp,
            shimmer,
            shimmer_db,
            apq3,
            apq5,
            apq,
            dda,
            nhr,
            hnr,
            rpde,
            dfa,
            spread1,
            spread2,
            d2,
            ppe,
        })
    }

    fn to_features(&self) -> Vec<f32> {
        vec![
            self.fo as f32,
            self.fhi as f32,
            self.flo as f32,
            self.jitter_percent as f32,
            self.jitter_abs as f32,
            self.rap as f32,
            self.ppq as f32,
            self.ddp as f32,
            self.shimmer as f32,
            self.shimmer_db as f32,
            self.apq3 as f32,
            self.apq5 as f32,
            self.apq as f32,
            self.dda as f32,
            self.nhr as f32,
            self.hnr as f32,
            self.rpde as f32,
            self.dfa as f32,
            self.spread1 as f32,
            self.spread2 as f32,
            self.d2 as f32,
            self.ppe as f32,
        ]
    }
}

/// Measurements for whichever domain was submitted
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "domain", rename_all = "lowercase")]
pub enum MeasurementSet {
    Diabetes(DiabetesMeasurements),
    Heart(HeartMeasurements),
    Parkinsons(ParkinsonsMeasurements),
}

impl MeasurementSet {
    /// Build the record for `domain` from values in form order.
    pub fn from_values(domain: Domain, values: &[f64]) -> Result<Self, AssessmentError> {
        Ok(match domain {
            Domain::Diabetes => Self::Diabetes(DiabetesMeasurements::from_values(values)?),
            Domain::Heart => Self::Heart(HeartMeasurements::from_values(values)?),
            Domain::Parkinsons => Self::Parkinsons(ParkinsonsMeasurements::from_values(values)?),
        })
    }

    pub fn domain(&self) -> Domain {
        match self {
            Self::Diabetes(_) => DiabetesMeasurements::DOMAIN,
            Self::Heart(_) => HeartMeasurements::DOMAIN,
            Self::Parkinsons(_) => ParkinsonsMeasurements::DOMAIN,
        }
    }

    pub fn to_features(&self) -> Vec<f32> {
        match self {
            Self::Diabetes(m) => m.to_features(),
            Self::Heart(m) => m.to_features(),
            Self::Parkinsons(m) => m.to_features(),
        }
    }
}

impl From<DiabetesMeasurements> for MeasurementSet {
    fn from(m: DiabetesMeasurements) -> Self {
        Self::Diabetes(m)
    }
}

impl From<HeartMeasurements> for MeasurementSet {
    fn from(m: HeartMeasurements) -> Self {
        Self::Heart(m)
    }
}

impl From<ParkinsonsMeasurements> for MeasurementSet {
    fn from(m: ParkinsonsMeasurements) -> Self {
        Self::Parkinsons(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diabetes_from_values() {
        let values = [2.0, 120.0, 70.0, 30.0, 80.0, 25.0, 0.5, 33.0];
        let m = DiabetesMeasurements::from_values(&values).unwrap();

        assert_eq!(m.glucose, 120.0);
        assert_eq!(m.age, 33.0);
        assert_eq!(
            m.to_features(),
            vec![2.0, 120.0, 70.0, 30.0, 80.0, 25.0, 0.5, 33.0]
        );
    }

    #[test]
    fn test_arity_mismatch_rejected() {
        for domain in Domain::ALL {
            for len in [domain.arity() - 1, domain.arity() + 1] {
                let values = vec![1.0; len];
                let err = MeasurementSet::from_values(domain, &values).unwrap_err();
                assert_eq!(
                    err,
                    AssessmentError::InvalidInput {
                        domain,
                        problems: vec![InputProblem::Arity {
                            expected: domain.arity(),
                            actual: len,
                        }],
                    }
                );
            }
        }
    }

    #[test]
    fn test_feature_vector_matches_arity() {
        for domain in Domain::ALL {
            let values: Vec<f64> = (0..domain.arity()).map(|i| i as f64).collect();
            let set = MeasurementSet::from_values(domain, &values).unwrap();

            assert_eq!(set.domain(), domain);
            let features = set.to_features();
            assert_eq!(features.len(), domain.arity());
            // Order preserved end to end
            assert_eq!(features.first(), Some(&0.0));
            assert_eq!(features.last(), Some(&((domain.arity() - 1) as f32)));
        }
    }

    #[test]
    fn test_heart_named_fields() {
        let values: Vec<f64> = (1..=13).map(|i| i as f64).collect();
        let m = HeartMeasurements::from_values(&values).unwrap();
        assert_eq!(m.chol, 5.0);
        assert_eq!(m.thal, 13.0);
    }
}
