use reqwest::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue};
use reqwest::StatusCode;
use tracing::debug;

use super::domain::{Identifier, RegistryRecord};
use crate::config::RegistryConfig;

/// Header carrying the registry subscription key (`Ocp-Apim-Subscription-Key`).
pub const SUBSCRIPTION_KEY_HEADER: &str = "ocp-apim-subscription-key";

/// Lookup failure reported by a registry implementation.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("no registry record for identifier")]
    NotFound,
    #[error("registry responded with status {0}")]
    Status(u16),
    #[error("registry transport failure: {0}")]
    Transport(String),
    #[error("registry payload could not be decoded: {0}")]
    Decode(String),
}

/// Source of truth for patient identity, looked up by identifier.
#[async_trait::async_trait]
pub trait PatientRegistry: Send + Sync {
    async fn lookup(&self, identifier: &Identifier) -> Result<RegistryRecord, RegistryError>;
}

/// Error building an HTTP registry client from configuration.
#[derive(Debug, thiserror::Error)]
pub enum RegistryClientError {
    #[error("subscription key is not a valid header value")]
    InvalidSubscriptionKey(#[from] InvalidHeaderValue),
    #[error("unable to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// `PatientRegistry` backed by the remote HTTP API.
#[derive(Debug, Clone)]
pub struct HttpPatientRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPatientRegistry {
    pub fn new(config: &RegistryConfig) -> Result<Self, RegistryClientError> {
        let mut key = HeaderValue::from_str(&config.subscription_key)?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(SUBSCRIPTION_KEY_HEADER), key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn record_url(&self, identifier: &Identifier) -> String {
        format!("{}/{}", self.base_url, identifier.as_str())
    }
}

#[async_trait::async_trait]
impl PatientRegistry for HttpPatientRegistry {
    async fn lookup(&self, identifier: &Identifier) -> Result<RegistryRecord, RegistryError> {
        let url = self.record_url(identifier);
        debug!(base_url = %self.base_url, "querying patient registry");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| RegistryError::Transport(err.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(RegistryError::NotFound),
            status if !status.is_success() => Err(RegistryError::Status(status.as_u16())),
            _ => response
                .json::<RegistryRecord>()
                .await
                .map_err(|err| RegistryError::Decode(err.to_string())),
        }
    }
}
