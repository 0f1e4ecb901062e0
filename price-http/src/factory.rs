use async_trait::async_trait;

use price_core::client::{ClientConfig, ClientError, ClientFactory, PredictionClient};

use crate::client::HttpPredictionClient;

/// [`ClientFactory`] for the `"http"` backend.
///
/// ```rust,no_run
/// use price_core::client::ClientRegistry;
/// use price_http::HttpClientFactory;
///
/// let mut registry = ClientRegistry::new();
/// registry.register(Box::new(HttpClientFactory));
/// ```
pub struct HttpClientFactory;

#[async_trait]
impl ClientFactory for HttpClientFactory {
    fn backend_name(&self) -> &'static str {
        "http"
    }

    async fn create(
        &self,
        config: &ClientConfig,
    ) -> Result<Box<dyn PredictionClient>, ClientError> {
        let client = HttpPredictionClient::new(config)?;
        tracing::debug!(endpoint = %client.endpoint(), "http prediction client ready");
        Ok(Box::new(client))
    }
}

#[cfg(test)]
mod tests {
    use price_core::client::{ClientConfig, ClientError, ClientFactory, ClientRegistry};

    use super::HttpClientFactory;

    #[test]
    fn backend_name_is_http() {
        assert_eq!(HttpClientFactory.backend_name(), "http");
    }

    #[tokio::test]
    async fn registry_builds_http_client_from_default_config() {
        let mut registry = ClientRegistry::new();
        registry.register(Box::new(HttpClientFactory));

        let result = registry.create(&ClientConfig::default()).await;
        assert!(result.is_ok(), "failed to create http client: {:?}", result.err());
    }

    #[tokio::test]
    async fn bad_endpoint_surfaces_configuration_error() {
        let config = ClientConfig::with_base_url("localhost:8000");

        match HttpClientFactory.create(&config).await {
            Err(ClientError::Configuration(_)) => {}
            Err(other) => panic!("expected Configuration error, got {other:?}"),
            Ok(_) => panic!("expected Configuration error, got a client"),
        }
    }
}
