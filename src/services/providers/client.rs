//! Shared HTTP plumbing for provider adapters

use crate::config::ProviderSettings;
use crate::error::{ConfigurationError, ProviderError};
use futures_util::future::try_join_all;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{ProviderKind, ProviderSnapshot};

/// How a provider expects its API key
#[derive(Debug, Clone)]
pub enum AuthStyle {
    /// `?<param>=<key>`
    QueryParam(&'static str),
    /// `<header>: <key>`
    Header(&'static str),
    /// `Authorization: Bearer <key>`
    Bearer,
    None,
}

#[derive(Debug, Clone)]
pub struct ProviderClient {
    kind: ProviderKind,
    base_url: String,
    api_key: Option<String>,
    auth: AuthStyle,
    http: Client,
}

impl ProviderClient {
    /// Validate settings and build the client; a keyed auth style requires a key
    pub fn new(
        kind: ProviderKind,
        settings: &ProviderSettings,
        auth: AuthStyle,
        timeout: Duration,
    ) -> Result<Self, ConfigurationError> {
        let prefix = kind.env_prefix();
        let base_url = settings
            .base_url
            .as_deref()
            .ok_or_else(|| ConfigurationError::missing(kind.display_name(), format!("{}_BASE_URL", prefix)))?;

        Url::parse(base_url).map_err(|e| {
            ConfigurationError::invalid(format!("{}_BASE_URL", prefix), base_url, e.to_string())
        })?;

        let api_key = match auth {
            AuthStyle::None => None,
            _ => Some(settings.api_key.clone().ok_or_else(|| {
                ConfigurationError::missing(kind.display_name(), format!("{}_API_KEY", prefix))
            })?),
        };

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigurationError::invalid("HTTP_TIMEOUT_SECS", format!("{:?}", timeout), e.to_string()))?;

        Ok(Self {
            kind,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            auth,
            http,
        })
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// GET `<base><path>` and decode the body as JSON
    pub async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ProviderError> {
        let endpoint = format!("{}{}", self.base_url, path);
        let mut request = self.http.get(&endpoint).query(query);

        if let Some(key) = &self.api_key {
            request = match &self.auth {
                AuthStyle::QueryParam(param) => request.query(&[(*param, key.as_str())]),
                AuthStyle::Header(header) => request.header(*header, key),
                AuthStyle::Bearer => request.bearer_auth(key),
                AuthStyle::None => request,
            };
        }

        let provider = self.kind.display_name();
        let response = request.send().await.map_err(|source| ProviderError::Transport {
            provider: provider.to_string(),
            endpoint: path.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: provider.to_string(),
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| ProviderError::Transport {
            provider: provider.to_string(),
            endpoint: path.to_string(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|e| ProviderError::Malformed {
            provider: provider.to_string(),
            endpoint: path.to_string(),
            reason: e.to_string(),
        })
    }

    /// One GET per `(metric, path)` pair, each read at the same JSON pointer
    pub async fn fetch_endpoints(
        &self,
        endpoints: &[(&'static str, &'static str)],
        query: &[(&str, &str)],
        pointer: &str,
    ) -> Result<ProviderSnapshot, ProviderError> {
        let values = try_join_all(endpoints.iter().map(|(metric, path)| async move {
            let body = self.get_json(path, query).await?;
            Ok::<_, ProviderError>((metric.to_string(), self.value_or_zero(&body, pointer, metric)))
        }))
        .await?;

        Ok(values.into_iter().collect())
    }

    /// Read a scalar at `pointer`, defaulting to 0 when absent
    pub fn value_or_zero(&self, body: &Value, pointer: &str, metric: &str) -> f64 {
        extract_number(body, pointer).unwrap_or_else(|| {
            debug!(
                provider = self.kind.name(),
                metric = metric,
                pointer = pointer,
                "Field missing from provider payload, defaulting to 0"
            );
            0.0
        })
    }
}

/// Number at a JSON pointer; numeric strings are accepted
pub fn extract_number(body: &Value, pointer: &str) -> Option<f64> {
    match body.pointer(pointer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}
