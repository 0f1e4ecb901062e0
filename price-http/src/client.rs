use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use price_core::client::{ClientConfig, ClientError, PredictionClient};
use price_core::models::RequestPayload;

/// [`PredictionClient`] that posts JSON over HTTP(S).
///
/// No timeout and no retry: a request runs until the transport gives up.
#[derive(Debug, Clone)]
pub struct HttpPredictionClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpPredictionClient {
    /// Resolve the endpoint from `config` and build the underlying
    /// `reqwest` client.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let endpoint = config.endpoint()?;
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Configuration(format!("cannot build HTTP client: {e}")))?;

        Ok(Self { http, endpoint })
    }

    /// Use an already configured `reqwest` client (proxy, TLS roots, ...).
    pub fn with_http(
        http: reqwest::Client,
        config: &ClientConfig,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            endpoint: config.endpoint()?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PredictionClient for HttpPredictionClient {
    async fn predict(
        &self,
        payload: &RequestPayload,
    ) -> Result<Value, ClientError> {
        debug!(endpoint = %self.endpoint, "POST prediction request");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // Diagnostic only.
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "prediction service returned an error status");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
