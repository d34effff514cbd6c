//! Environment-based configuration
//!
//! All settings are read once at startup. Numeric values that fail to parse
//! fall back to their defaults; enumerated values that fail to parse are a
//! `ConfigurationError`.

use crate::error::ConfigurationError;
use crate::models::{Comparison, Severity};
use crate::services::providers::ProviderKind;
use std::collections::HashMap;
use std::env;
use std::time::Duration;

/// Deployment environment (`APP_ENV`), defaults to `sandbox`
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

/// QuestDB connection string, if persistent storage is configured
pub fn get_questdb_url() -> Option<String> {
    env::var("QUESTDB_URL").ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub http_timeout: Duration,
    pub providers: ProvidersConfig,
    pub scheduler: SchedulerConfig,
    pub aggregator: AggregatorConfig,
    pub detection: DetectionConfig,
    pub notifications: NotificationConfig,
    pub comparisons: HashMap<u32, Comparison>,
}

#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProvidersConfig {
    pub enabled: Vec<ProviderKind>,
    pub settings: HashMap<ProviderKind, ProviderSettings>,
}

impl ProvidersConfig {
    pub fn settings(&self, kind: ProviderKind) -> ProviderSettings {
        self.settings.get(&kind).cloned().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub interval_seconds: u64,
    pub run_on_start: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Any provider failure aborts the cycle
    #[default]
    AllOrNothing,
    /// Successful providers are committed, failed ones are logged and dropped
    Partial,
}

#[derive(Debug, Clone, Default)]
pub struct AggregatorConfig {
    pub failure_policy: FailurePolicy,
}

#[derive(Debug, Clone)]
pub struct DetectionConfig {
    /// Number of history points (K) fed to trend and volatility detection
    pub history_window: usize,
    pub stability_epsilon: f64,
    pub trend_min_confidence: f64,
    pub trend_min_change: f64,
    pub volatility_multiple: f64,
    pub volatility_min_points: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            history_window: 10,
            stability_epsilon: 0.01,
            trend_min_confidence: 0.6,
            trend_min_change: 0.10,
            volatility_multiple: 3.0,
            volatility_min_points: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackoffKind {
    #[default]
    Fixed,
    Exponential,
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total delivery attempts per channel, including the first
    pub max_retries: usize,
    pub delay: Duration,
    pub backoff: BackoffKind,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_secs(1),
            backoff: BackoffKind::Fixed,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: u16,
    pub user: Option<String>,
    pub pass: Option<String>,
    pub from: Option<String>,
    pub recipient: Option<String>,
    pub starttls: bool,
}

#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub smtp: SmtpConfig,
    pub dingding_webhook: Option<String>,
    pub wecom_webhook: Option<String>,
    pub retry: RetryConfig,
    pub min_severity: Severity,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            smtp: SmtpConfig {
                port: 587,
                starttls: true,
                ..SmtpConfig::default()
            },
            dingding_webhook: None,
            wecom_webhook: None,
            retry: RetryConfig::default(),
            min_severity: Severity::Low,
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Ok(Self {
            port: env_var_parse("PORT", 8080),
            http_timeout: parse_http_timeout(env_var("HTTP_TIMEOUT_SECS")),
            providers: providers_from_env()?,
            scheduler: SchedulerConfig {
                interval_seconds: env_var_parse("UPDATE_INTERVAL_SECONDS", 300),
                run_on_start: env_var_bool("RUN_ON_START", true),
            },
            aggregator: AggregatorConfig {
                failure_policy: parse_failure_policy(env_var("AGGREGATOR_FAILURE_POLICY"))?,
            },
            detection: detection_from_env(),
            notifications: notifications_from_env()?,
            comparisons: match env_var("INDICATOR_COMPARISONS") {
                Some(raw) => parse_comparisons(&raw)?,
                None => HashMap::new(),
            },
        })
    }
}

fn providers_from_env() -> Result<ProvidersConfig, ConfigurationError> {
    let enabled = match env_var("PROVIDERS_ENABLED") {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|name| {
                name.parse::<ProviderKind>()
                    .map_err(|reason| ConfigurationError::invalid("PROVIDERS_ENABLED", name, reason))
            })
            .collect::<Result<Vec<_>, _>>()?,
        None => ProviderKind::all().to_vec(),
    };

    let settings = ProviderKind::all()
        .into_iter()
        .map(|kind| {
            let prefix = kind.env_prefix();
            let settings = ProviderSettings {
                base_url: env_var(&format!("{}_BASE_URL", prefix))
                    .or_else(|| kind.default_base_url().map(str::to_string)),
                api_key: env_var(&format!("{}_API_KEY", prefix)),
            };
            (kind, settings)
        })
        .collect();

    Ok(ProvidersConfig { enabled, settings })
}

fn detection_from_env() -> DetectionConfig {
    let defaults = DetectionConfig::default();
    DetectionConfig {
        history_window: env_var_parse("HISTORY_WINDOW", defaults.history_window).max(2),
        stability_epsilon: env_var_parse("TREND_STABILITY_EPSILON", defaults.stability_epsilon),
        trend_min_confidence: env_var_parse("TREND_MIN_CONFIDENCE", defaults.trend_min_confidence),
        trend_min_change: env_var_parse("TREND_MIN_CHANGE", defaults.trend_min_change),
        volatility_multiple: env_var_parse("VOLATILITY_SPIKE_MULTIPLE", defaults.volatility_multiple),
        volatility_min_points: env_var_parse("VOLATILITY_MIN_POINTS", defaults.volatility_min_points),
    }
}

fn notifications_from_env() -> Result<NotificationConfig, ConfigurationError> {
    let user = env_var("SMTP_USER");
    let smtp = SmtpConfig {
        host: env_var("SMTP_HOST"),
        port: env_var_parse("SMTP_PORT", 587),
        from: env_var("SMTP_FROM").or_else(|| user.clone()),
        user,
        pass: env_var("SMTP_PASS"),
        recipient: env_var("ALERT_EMAIL"),
        starttls: env_var_bool("SMTP_STARTTLS", true),
    };

    let backoff = match env_var("NOTIFY_BACKOFF") {
        Some(raw) => parse_backoff(&raw)?,
        None => BackoffKind::Fixed,
    };

    let min_severity = match env_var("NOTIFY_MIN_SEVERITY") {
        Some(raw) => raw
            .parse::<Severity>()
            .map_err(|reason| ConfigurationError::invalid("NOTIFY_MIN_SEVERITY", &raw, reason))?,
        None => Severity::Low,
    };

    Ok(NotificationConfig {
        smtp,
        dingding_webhook: env_var("DINGDING_WEBHOOK"),
        wecom_webhook: env_var("WECOM_WEBHOOK"),
        retry: RetryConfig {
            max_retries: env_var_parse("NOTIFY_MAX_RETRIES", 3usize).max(1),
            delay: Duration::from_millis(env_var_parse("NOTIFY_RETRY_DELAY_MS", 1000)),
            backoff,
        },
        min_severity,
    })
}

/// Outbound request timeout; unparseable falls back to 30s and 0 is raised to 1s
pub fn parse_http_timeout(raw: Option<String>) -> Duration {
    let secs = raw
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(30)
        .max(1);
    Duration::from_secs(secs)
}

pub fn parse_failure_policy(raw: Option<String>) -> Result<FailurePolicy, ConfigurationError> {
    match raw.as_deref().map(|s| s.trim().to_ascii_lowercase()) {
        None => Ok(FailurePolicy::AllOrNothing),
        Some(value) => match value.as_str() {
            "all_or_nothing" | "all-or-nothing" => Ok(FailurePolicy::AllOrNothing),
            "partial" => Ok(FailurePolicy::Partial),
            _ => Err(ConfigurationError::invalid(
                "AGGREGATOR_FAILURE_POLICY",
                value.clone(),
                "expected all_or_nothing or partial",
            )),
        },
    }
}

pub fn parse_backoff(raw: &str) -> Result<BackoffKind, ConfigurationError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "fixed" | "constant" => Ok(BackoffKind::Fixed),
        "exponential" => Ok(BackoffKind::Exponential),
        _ => Err(ConfigurationError::invalid(
            "NOTIFY_BACKOFF",
            raw,
            "expected fixed or exponential",
        )),
    }
}

/// Parse `"3:lte,11:eq"` into per-indicator comparison rules
pub fn parse_comparisons(raw: &str) -> Result<HashMap<u32, Comparison>, ConfigurationError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (id, op) = entry.split_once(':').ok_or_else(|| {
                ConfigurationError::invalid("INDICATOR_COMPARISONS", entry, "expected <id>:<gte|lte|eq>")
            })?;
            let id = id.trim().parse::<u32>().map_err(|e| {
                ConfigurationError::invalid("INDICATOR_COMPARISONS", entry, e.to_string())
            })?;
            let comparison = op
                .parse::<Comparison>()
                .map_err(|reason| ConfigurationError::invalid("INDICATOR_COMPARISONS", entry, reason))?;
            Ok((id, comparison))
        })
        .collect()
}

fn env_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_var_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}
