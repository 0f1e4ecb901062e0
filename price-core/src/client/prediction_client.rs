use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::models::RequestPayload;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Could not decode response: {0}")]
    Decode(String),
}

/// One round trip to the prediction service.
///
/// Implementations return the response body untouched; shape validation
/// happens in [`PredictionResponse::from_json`](crate::models::PredictionResponse::from_json)
/// so every backend is held to the same rules.
#[async_trait]
pub trait PredictionClient: Send + Sync {
    async fn predict(
        &self,
        payload: &RequestPayload,
    ) -> Result<Value, ClientError>;
}
