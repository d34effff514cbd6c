//! Error taxonomy for the update pipeline
//!
//! Each boundary owns one error type:
//! - `ConfigurationError`: missing or invalid settings, raised at construction
//! - `ProviderError`: a single provider fetch failed
//! - `CycleAbortError`: the whole update cycle was abandoned before any write
//! - `StoreError`: a persistence call failed for one indicator
//! - `NotificationChannelError`: one channel failed after exhausting retries

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("{component}: required setting {setting} is not configured")]
    MissingSetting {
        component: String,
        setting: String,
    },

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigurationError {
    pub fn missing(component: impl Into<String>, setting: impl Into<String>) -> Self {
        Self::MissingSetting {
            component: component.into(),
            setting: setting.into(),
        }
    }

    pub fn invalid(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider}: request to {endpoint} failed: {source}")]
    Transport {
        provider: String,
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider}: {endpoint} returned HTTP {status}")]
    Status {
        provider: String,
        endpoint: String,
        status: u16,
    },

    #[error("{provider}: malformed payload from {endpoint}: {reason}")]
    Malformed {
        provider: String,
        endpoint: String,
        reason: String,
    },
}

impl ProviderError {
    pub fn provider(&self) -> &str {
        match self {
            Self::Transport { provider, .. }
            | Self::Status { provider, .. }
            | Self::Malformed { provider, .. } => provider,
        }
    }
}

#[derive(Debug, Error)]
pub enum CycleAbortError {
    #[error("update cycle aborted: provider {provider} failed: {source}")]
    ProviderFailed {
        provider: String,
        #[source]
        source: ProviderError,
    },

    #[error("update cycle aborted: all {count} providers failed")]
    AllProvidersFailed { count: usize },

    #[error("update cycle aborted: no providers configured")]
    NoProviders,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection unavailable")]
    Unavailable,

    #[error("indicator {0} not found")]
    NotFound(u32),

    #[error("store query failed: {0}")]
    Query(String),

    #[error("stored record is invalid: {0}")]
    InvalidRecord(String),
}

impl From<tokio_postgres::Error> for StoreError {
    fn from(err: tokio_postgres::Error) -> Self {
        Self::Query(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum NotificationChannelError {
    #[error("channel {0} is not configured")]
    NotConfigured(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("webhook returned HTTP {0}")]
    Status(u16),

    #[error("webhook rejected message: errcode {code}: {message}")]
    Rejected { code: i64, message: String },

    #[error("email could not be built: {0}")]
    InvalidEmail(String),

    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}
