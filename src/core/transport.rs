//! HTTP transport seam: the collaborator contract and its reqwest implementation

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::core::config::ClientConfig;
use crate::core::errors::{ClientError, Result};

/// Request parameters keyed by their wire names
pub type Params = BTreeMap<String, Value>;

/// Contract the client needs from an HTTP transport.
///
/// Both methods take a relative endpoint path and a parameter map and return
/// the decoded JSON response. Implementations own all transport concerns:
/// authentication, TLS, timeouts. Implementations must be safe to share
/// across threads if the client is used concurrently; this crate adds no
/// coordination of its own.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Issue a GET request against `path` with `params`
    async fn get(&self, path: &str, params: &Params) -> Result<Value>;

    /// Issue a POST request against `path` with `params`
    async fn post(&self, path: &str, params: &Params) -> Result<Value>;
}

impl<T: Transport + Send + Sync> Transport for Arc<T> {
    async fn get(&self, path: &str, params: &Params) -> Result<Value> {
        (**self).get(path, params).await
    }

    async fn post(&self, path: &str, params: &Params) -> Result<Value> {
        (**self).post(path, params).await
    }
}

/// Transport backed by a shared `reqwest::Client`.
///
/// GET parameters travel in the query string, POST parameters as a form
/// body; the configured API key is appended to every request. No retries
/// and no caching at this layer.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a transport from a validated configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Create from environment
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::load()?)
    }

    /// Absolute URL for a relative endpoint path
    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Flatten params into wire pairs, appending the API key
    fn wire_params(&self, params: &Params) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = params
            .iter()
            .map(|(key, value)| (key.clone(), stringify(value)))
            .collect();
        pairs.push(("api-key".to_string(), self.config.api_key.clone()));
        pairs
    }

    /// Map the response to decoded JSON or an API error
    async fn decode(response: reqwest::Response) -> Result<Value> {
        let status = response.status();

        if status.is_success() {
            let json = response.json().await?;
            Ok(json)
        } else {
            let status_code = status.as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(ClientError::Api {
                status: status_code,
                message,
            })
        }
    }
}

impl Transport for HttpTransport {
    async fn get(&self, path: &str, params: &Params) -> Result<Value> {
        debug!("GET {} with {} params", path, params.len());

        let response = self
            .client
            .get(self.endpoint(path))
            .query(&self.wire_params(params))
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn post(&self, path: &str, params: &Params) -> Result<Value> {
        debug!("POST {} with {} params", path, params.len());

        let response = self
            .client
            .post(self.endpoint(path))
            .form(&self.wire_params(params))
            .send()
            .await?;

        Self::decode(response).await
    }
}

/// Render a parameter value for the wire.
///
/// Strings pass through as-is (including pre-serialized JSON payloads);
/// everything else uses its JSON rendering.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
