use rust_decimal::{Decimal, prelude::FromPrimitive};
use serde_json::Value;
use thiserror::Error;

use super::FieldError;
use crate::client::ClientError;

/// Shown for any transport or server failure.
pub const UNAVAILABLE_MESSAGE: &str = "Unable to fetch prediction. Please try again.";

/// Shown when the service answers but not with a usable price.
pub const UNEXPECTED_RESPONSE_MESSAGE: &str = "Unexpected response from API.";

/// Reasons a service response is not a usable prediction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    #[error("response is not a JSON object: {0}")]
    NotAnObject(String),

    #[error("response has no predicted_price field")]
    MissingPrice,

    #[error("predicted_price is not a usable amount: {0}")]
    InvalidPrice(String),
}

/// A response that passed shape validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictionResponse {
    pub predicted_price: Decimal,
}

impl PredictionResponse {
    /// Validates a raw service response.
    ///
    /// `predicted_price` must be present and a finite, non-negative JSON
    /// number. Strings, `null` and other shapes are rejected.
    pub fn from_json(value: &Value) -> Result<Self, ResponseError> {
        let object = value
            .as_object()
            .ok_or_else(|| ResponseError::NotAnObject(value.to_string()))?;

        let raw = match object.get("predicted_price") {
            None | Some(Value::Null) => return Err(ResponseError::MissingPrice),
            Some(raw) => raw,
        };

        let Value::Number(number) = raw else {
            return Err(ResponseError::InvalidPrice(raw.to_string()));
        };

        let converted = if let Some(n) = number.as_u64() {
            Some(Decimal::from(n))
        } else if let Some(n) = number.as_i64() {
            Some(Decimal::from(n))
        } else {
            number.as_f64().and_then(Decimal::from_f64)
        };
        let price = converted.ok_or_else(|| ResponseError::InvalidPrice(number.to_string()))?;

        if price.is_sign_negative() && !price.is_zero() {
            return Err(ResponseError::InvalidPrice(number.to_string()));
        }

        Ok(Self {
            predicted_price: price,
        })
    }
}

/// Everything that can end a submission without a price.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictionError {
    #[error("form is incomplete or invalid")]
    InvalidForm(Vec<FieldError>),

    #[error("prediction service unavailable: {0}")]
    Unavailable(#[from] ClientError),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(#[from] ResponseError),
}

impl PredictionError {
    /// Short text suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            PredictionError::InvalidForm(errors) => {
                let details = errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                format!("Please check the form: {details}")
            }
            PredictionError::Unavailable(_) => UNAVAILABLE_MESSAGE.to_string(),
            PredictionError::UnexpectedResponse(_) => UNEXPECTED_RESPONSE_MESSAGE.to_string(),
        }
    }
}

/// Outcome of the most recent submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionResult {
    Price(Decimal),
    Failed(PredictionError),
}

impl PredictionResult {
    pub fn price(&self) -> Option<Decimal> {
        match self {
            PredictionResult::Price(price) => Some(*price),
            PredictionResult::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&PredictionError> {
        match self {
            PredictionResult::Price(_) => None,
            PredictionResult::Failed(error) => Some(error),
        }
    }
}
