use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::error::PredictError;

/// Self-reported vehicle condition. Echoed back, not priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Excellent,
    #[default]
    Good,
    Fair,
    Poor,
}

impl Condition {
    pub const ALL: [Condition; 4] = [
        Condition::Excellent,
        Condition::Good,
        Condition::Fair,
        Condition::Poor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Excellent => "excellent",
            Condition::Good => "good",
            Condition::Fair => "fair",
            Condition::Poor => "poor",
        }
    }
}

impl FromStr for Condition {
    type Err = PredictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Condition::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                PredictError::invalid(
                    "condition",
                    format!("expected one of excellent, good, fair, poor (got {wanted:?})"),
                )
            })
    }
}

/// A vehicle that passed boundary validation. This is also what `factors` echoes,
/// so `make` and `model` come back trimmed and numbers in their normalised form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleDescription {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub mileage: u64,
    pub condition: Condition,
}

impl VehicleDescription {
    pub fn new(make: &str, model: &str, year: i32, mileage: u64) -> Self {
        VehicleDescription {
            make: make.to_string(),
            model: model.to_string(),
            year,
            mileage,
            condition: Condition::default(),
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }
}

/// Request body as it arrives. Fields stay loosely typed so that a bad value
/// produces a precise `PredictError` instead of a generic deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub make: Option<Value>,
    #[serde(default)]
    pub model: Option<Value>,
    #[serde(default)]
    pub year: Option<Value>,
    #[serde(default)]
    pub mileage: Option<Value>,
    #[serde(default)]
    pub condition: Option<Value>,
}

impl PredictRequest {
    pub fn validate(&self) -> Result<VehicleDescription, PredictError> {
        let make = text_field("make", self.make.as_ref())?;
        let model = text_field("model", self.model.as_ref())?;

        let year = integer_field("year", self.year.as_ref())?;
        let year = i32::try_from(year)
            .map_err(|_| PredictError::invalid("year", format!("{year} is out of range")))?;

        let mileage = integer_field("mileage", self.mileage.as_ref())?;
        let mileage = u64::try_from(mileage)
            .map_err(|_| PredictError::invalid("mileage", "must not be negative"))?;

        let condition = match self.condition.as_ref() {
            None | Some(Value::Null) => Condition::default(),
            Some(Value::String(s)) if s.trim().is_empty() => Condition::default(),
            Some(Value::String(s)) => s.parse()?,
            Some(other) => {
                return Err(PredictError::invalid(
                    "condition",
                    format!("expected a string, got {other}"),
                ))
            }
        };

        Ok(VehicleDescription {
            make,
            model,
            year,
            mileage,
            condition,
        })
    }
}

fn text_field(name: &'static str, value: Option<&Value>) -> Result<String, PredictError> {
    match value {
        None | Some(Value::Null) => Err(PredictError::MissingField(name)),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Err(PredictError::invalid(name, "must not be empty"))
            } else {
                Ok(trimmed.to_string())
            }
        }
        Some(other) => Err(PredictError::invalid(
            name,
            format!("expected a string, got {other}"),
        )),
    }
}

// Form inputs post numbers as strings, so "2020" is as good as 2020.
fn integer_field(name: &'static str, value: Option<&Value>) -> Result<i64, PredictError> {
    match value {
        None | Some(Value::Null) => Err(PredictError::MissingField(name)),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            if n.as_u64().is_some() {
                return Err(PredictError::invalid(name, format!("{n} is out of range")));
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
                _ => Err(PredictError::invalid(
                    name,
                    format!("expected a whole number, got {n}"),
                )),
            }
        }
        Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| {
            PredictError::invalid(name, format!("expected a whole number, got {s:?}"))
        }),
        Some(other) => Err(PredictError::invalid(
            name,
            format!("expected a number, got {other}"),
        )),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePrediction {
    pub price: u64,
    pub confidence: f64,
    pub factors: VehicleDescription,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    pub prediction: PricePrediction,
}

impl PredictResponse {
    pub fn new(prediction: PricePrediction) -> Self {
        PredictResponse {
            success: true,
            prediction,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchPredictResponse {
    pub success: bool,
    pub predictions: Vec<PricePrediction>,
}

impl BatchPredictResponse {
    pub fn new(predictions: Vec<PricePrediction>) -> Self {
        BatchPredictResponse {
            success: true,
            predictions,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        HealthStatus {
            status: "ok",
            timestamp: iso_timestamp(),
        }
    }
}

/// Envelope for the auxiliary endpoints (model info, stats, fallback).
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
            timestamp: iso_timestamp(),
        }
    }

    pub fn error(message: &str) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.to_string()),
            timestamp: iso_timestamp(),
        }
    }
}

fn iso_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> PredictRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn accepts_complete_request() {
        let vehicle = request(json!({
            "make": "Toyota",
            "model": "Camry",
            "year": 2020,
            "mileage": 50000,
            "condition": "excellent"
        }))
        .validate()
        .unwrap();

        assert_eq!(
            vehicle,
            VehicleDescription::new("Toyota", "Camry", 2020, 50000)
                .with_condition(Condition::Excellent)
        );
    }

    #[test]
    fn condition_defaults_to_good() {
        for condition in [json!(null), json!(""), json!("   ")] {
            let vehicle = request(json!({
                "make": "Honda", "model": "Civic", "year": 2018, "mileage": 1,
                "condition": condition
            }))
            .validate()
            .unwrap();
            assert_eq!(vehicle.condition, Condition::Good);
        }

        let vehicle = request(json!({"make": "Honda", "model": "Civic", "year": 2018, "mileage": 1}))
            .validate()
            .unwrap();
        assert_eq!(vehicle.condition, Condition::Good);
    }

    #[test]
    fn condition_is_case_insensitive() {
        assert_eq!(" Poor ".parse::<Condition>().unwrap(), Condition::Poor);
        assert_eq!("FAIR".parse::<Condition>().unwrap(), Condition::Fair);
        assert!(matches!(
            "mint".parse::<Condition>(),
            Err(PredictError::InvalidField { field: "condition", .. })
        ));
    }

    #[test]
    fn numeric_strings_and_integral_floats_are_accepted() {
        let vehicle = request(json!({
            "make": " Ford ", "model": "Focus", "year": "2015", "mileage": 72000.0
        }))
        .validate()
        .unwrap();

        assert_eq!(vehicle.make, "Ford");
        assert_eq!(vehicle.year, 2015);
        assert_eq!(vehicle.mileage, 72000);
    }

    #[test]
    fn missing_and_blank_text_fields_are_rejected() {
        let err = request(json!({"model": "Camry", "year": 2020, "mileage": 1}))
            .validate()
            .unwrap_err();
        assert_eq!(err, PredictError::MissingField("make"));

        let err = request(json!({"make": "Toyota", "model": "  ", "year": 2020, "mileage": 1}))
            .validate()
            .unwrap_err();
        assert!(matches!(err, PredictError::InvalidField { field: "model", .. }));
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let cases = [
            (json!("abc"), json!(1), "year"),
            (json!(2020.5), json!(1), "year"),
            (json!(true), json!(1), "year"),
            (json!(2020), json!(-5), "mileage"),
            (json!(2020), json!("lots"), "mileage"),
            (json!(9_999_999_999_i64), json!(1), "year"),
        ];
        for (year, mileage, field) in cases {
            let err = request(json!({
                "make": "Toyota", "model": "Camry", "year": year, "mileage": mileage
            }))
            .validate()
            .unwrap_err();
            match err {
                PredictError::InvalidField { field: got, .. } => assert_eq!(got, field),
                other => panic!("unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn factors_serialize_with_lowercase_condition() {
        let vehicle = VehicleDescription::new("Toyota", "Camry", 2020, 50000);
        let value = serde_json::to_value(&vehicle).unwrap();
        assert_eq!(
            value,
            json!({"make": "Toyota", "model": "Camry", "year": 2020, "mileage": 50000, "condition": "good"})
        );
    }

    #[test]
    fn error_envelope_has_no_data() {
        let response = ApiResponse::<String>::error("nope");
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error.as_deref(), Some("nope"));
    }
}
