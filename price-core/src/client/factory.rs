use std::collections::HashMap;

use async_trait::async_trait;
use url::Url;

use super::prediction_client::{ClientError, PredictionClient};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_PREDICT_PATH: &str = "/predict";

/// Where and how to reach the prediction service.
///
/// Built explicitly by the caller and handed to a [`ClientRegistry`];
/// nothing in this crate reads the process environment.
///
/// | field          | default                 |
/// |----------------|-------------------------|
/// | `backend`      | `http`                  |
/// | `base_url`     | `http://localhost:8000` |
/// | `predict_path` | `/predict`              |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"http"`).
    pub backend: String,
    /// Scheme, host and optional path prefix of the service.
    pub base_url: String,
    /// Appended to `base_url`. Empty means post to `base_url` itself.
    pub predict_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend: "http".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            predict_path: DEFAULT_PREDICT_PATH.to_string(),
        }
    }
}

impl ClientConfig {
    /// Default configuration pointed at another service.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Full URL the request is posted to.
    ///
    /// Exactly one `/` separates the base and the path regardless of how
    /// either side is written.
    ///
    /// # Errors
    /// [`ClientError::Configuration`] when the base URL is blank, does not
    /// parse, or is not `http`/`https`.
    pub fn endpoint(&self) -> Result<Url, ClientError> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(ClientError::Configuration(
                "prediction service base URL is empty".to_string(),
            ));
        }

        let path = self.predict_path.trim();
        let joined = if path.is_empty() {
            base.to_string()
        } else {
            format!(
                "{}/{}",
                base.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        };

        let url = Url::parse(&joined).map_err(|e| {
            ClientError::Configuration(format!("invalid endpoint '{joined}': {e}"))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ClientError::Configuration(format!(
                "unsupported scheme '{other}' in endpoint '{joined}'"
            ))),
        }
    }
}

/// One implementation per transport. Each backend crate exports a unit
/// struct implementing this trait, registered with a [`ClientRegistry`] at
/// startup.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Build a ready-to-use client for `config`.
    async fn create(
        &self,
        config: &ClientConfig,
    ) -> Result<Box<dyn PredictionClient>, ClientError>;
}

/// Registry of [`ClientFactory`] instances, keyed by backend name.
pub struct ClientRegistry {
    factories: HashMap<&'static str, Box<dyn ClientFactory>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a backend factory, replacing any previous one with the same
    /// name.
    pub fn register(
        &mut self,
        factory: Box<dyn ClientFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the factory that matches `config.backend`.
    ///
    /// # Errors
    /// * [`ClientError::Configuration`]: no factory is registered for the
    ///   requested backend name.
    /// * Any error the chosen factory itself returns.
    pub async fn create(
        &self,
        config: &ClientConfig,
    ) -> Result<Box<dyn PredictionClient>, ClientError> {
        let factory = self
            .factories
            .get(config.backend.as_str())
            .ok_or_else(|| {
                ClientError::Configuration(format!(
                    "unknown backend '{}'; available: {:?}",
                    config.backend,
                    self.available_backends()
                ))
            })?;

        factory.create(config).await
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}
