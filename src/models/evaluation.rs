use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{ActivityLevel, RiskLevel};

/// The nine health indicators submitted for one patient.
///
/// Numeric fields accept JSON numbers or numeric strings, since HTML form
/// inputs post their values as text. Anything else is a deserialization error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientMetrics {
    #[serde(deserialize_with = "coerce::integer")]
    pub age: i32,
    #[serde(deserialize_with = "coerce::real")]
    pub bmi: f64,
    #[serde(deserialize_with = "coerce::integer")]
    pub glucose: i32,
    /// Systolic blood pressure (mmHg).
    #[serde(deserialize_with = "coerce::integer")]
    pub bp: i32,
    #[serde(deserialize_with = "coerce::integer")]
    pub hdl: i32,
    #[serde(deserialize_with = "coerce::integer")]
    pub ldl: i32,
    #[serde(deserialize_with = "coerce::boolean")]
    pub smoking: bool,
    pub activity_level: ActivityLevel,
    #[serde(deserialize_with = "coerce::boolean")]
    pub family_history: bool,
}

/// Output of the scoring engine, returned verbatim to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_score: f64,
    pub level: RiskLevel,
    pub recommendations: Vec<String>,
}

/// A scored submission that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvaluation {
    pub metrics: PatientMetrics,
    pub assessment: RiskAssessment,
}

/// One persisted evaluation. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub id: i64,
    #[serde(flatten)]
    pub metrics: PatientMetrics,
    pub risk_score: f64,
    pub level: RiskLevel,
    pub created_at: DateTime<Utc>,
}

mod coerce {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Bool(bool),
        Int(i64),
        Float(f64),
        Text(String),
    }

    pub fn integer<'de, D: Deserializer<'de>>(de: D) -> Result<i32, D::Error> {
        let value = match Scalar::deserialize(de)? {
            Scalar::Int(n) => n as f64,
            Scalar::Float(f) => f,
            Scalar::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| D::Error::custom(format!("expected an integer, got {s:?}")))?,
            Scalar::Bool(b) => return Err(D::Error::custom(format!("expected an integer, got {b}"))),
        };
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(D::Error::custom(format!("expected an integer, got {value}")));
        }
        if value < i32::MIN as f64 || value > i32::MAX as f64 {
            return Err(D::Error::custom(format!("integer out of range: {value}")));
        }
        Ok(value as i32)
    }

    pub fn real<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
        let value = match Scalar::deserialize(de)? {
            Scalar::Int(n) => n as f64,
            Scalar::Float(f) => f,
            Scalar::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| D::Error::custom(format!("expected a number, got {s:?}")))?,
            Scalar::Bool(b) => return Err(D::Error::custom(format!("expected a number, got {b}"))),
        };
        if !value.is_finite() {
            return Err(D::Error::custom("expected a finite number"));
        }
        Ok(value)
    }

    pub fn boolean<'de, D: Deserializer<'de>>(de: D) -> Result<bool, D::Error> {
        match Scalar::deserialize(de)? {
            Scalar::Bool(b) => Ok(b),
            Scalar::Text(s) => match s.trim() {
                "true" => Ok(true),
                "false" => Ok(false),
                other => Err(D::Error::custom(format!("expected a boolean, got {other:?}"))),
            },
            Scalar::Int(n) => Err(D::Error::custom(format!("expected a boolean, got {n}"))),
            Scalar::Float(f) => Err(D::Error::custom(format!("expected a boolean, got {f}"))),
        }
    }
}
