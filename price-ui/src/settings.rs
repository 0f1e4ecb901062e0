//! Optional TOML settings file.
//!
//! ```toml
//! [api]
//! backend = "http"
//! base_url = "https://prices.example.com"
//! predict_path = "/predict"
//!
//! [display]
//! currency_symbol = "₦"
//! group_separator = ","
//! decimal_separator = "."
//! max_fraction_digits = 3
//! ```
//!
//! Every key is optional. Command-line values win over the file, the file
//! wins over the built-in defaults.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use price_core::{ClientConfig, NumberFormat};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid settings file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiSettings {
    pub backend: String,
    pub base_url: String,
    pub predict_path: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        let config = ClientConfig::default();
        Self {
            backend: config.backend,
            base_url: config.base_url,
            predict_path: config.predict_path,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub api: ApiSettings,
    pub display: NumberFormat,
}

/// Values supplied on the command line (or its environment fallback).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub backend: Option<String>,
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(path) => {
                let settings = Self::load(path)?;
                tracing::debug!(path = %path.display(), "settings loaded");
                Ok(settings)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn apply_overrides(
        &mut self,
        overrides: &Overrides,
    ) {
        if let Some(base_url) = &overrides.base_url {
            self.api.base_url = base_url.clone();
        }
        if let Some(backend) = &overrides.backend {
            self.api.backend = backend.clone();
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            backend: self.api.backend.clone(),
            base_url: self.api.base_url.clone(),
            predict_path: self.api.predict_path.clone(),
        }
    }
}
