use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Everything that can go wrong between an inbound request and the estimator.
///
/// The estimator itself is infallible; every variant here is raised at the HTTP boundary.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("invalid value for `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("batch must contain at least one vehicle")]
    EmptyBatch,

    #[error("batch of {size} vehicles exceeds the limit of {limit}")]
    BatchTooLarge { size: usize, limit: usize },

    #[error("vehicle {index}: {source}")]
    InBatch {
        index: usize,
        source: Box<PredictError>,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl PredictError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        PredictError::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, PredictError::Internal(_))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl ResponseError for PredictError {
    fn status_code(&self) -> StatusCode {
        if self.is_internal() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::BAD_REQUEST
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            success: false,
            error: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_bad_request() {
        let errors = [
            PredictError::MissingField("make"),
            PredictError::invalid("year", "not a number"),
            PredictError::MalformedBody("EOF".into()),
            PredictError::EmptyBatch,
            PredictError::BatchTooLarge { size: 5, limit: 2 },
        ];
        for err in errors {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "{err}");
        }
    }

    #[test]
    fn internal_error_maps_to_500() {
        let err = PredictError::Internal("pool gone".into());
        assert!(err.is_internal());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn batch_error_names_the_vehicle() {
        let err = PredictError::InBatch {
            index: 3,
            source: Box::new(PredictError::MissingField("mileage")),
        };
        assert_eq!(err.to_string(), "vehicle 3: missing required field `mileage`");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
