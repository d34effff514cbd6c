//! Multi-channel alert delivery with bounded per-channel retry
//!
//! Channels are attempted concurrently. Each channel gets `max_retries` total
//! attempts; a channel that still fails is reported in its result and never
//! affects the others.

pub mod email;
pub mod format;
pub mod webhook;

pub use email::EmailChannel;
pub use format::format_alert;
pub use webhook::{WebhookChannel, WebhookKind};

use crate::config::{BackoffKind, NotificationConfig, RetryConfig};
use crate::error::{ConfigurationError, NotificationChannelError};
use crate::models::Anomaly;
use async_trait::async_trait;
use backon::{ConstantBuilder, ExponentialBuilder, Retryable};
use futures_util::future::join_all;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[async_trait]
pub trait NotificationChannel: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the channel has every setting it needs to deliver
    fn is_configured(&self) -> bool;

    async fn send(&self, title: &str, message: &str) -> Result<(), NotificationChannelError>;
}

/// Outcome of delivering one alert to one channel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationResult {
    pub channel: String,
    pub success: bool,
    pub attempts: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct Notifier {
    channels: Vec<Arc<dyn NotificationChannel>>,
    retry: RetryConfig,
}

impl Notifier {
    pub fn new(retry: RetryConfig) -> Self {
        Self {
            channels: Vec::new(),
            retry,
        }
    }

    pub fn with_channel(mut self, channel: Arc<dyn NotificationChannel>) -> Self {
        self.channels.push(channel);
        self
    }

    /// Email plus both webhooks; unconfigured ones are kept and skipped at send time
    pub fn from_config(
        config: &NotificationConfig,
        timeout: Duration,
    ) -> Result<Self, ConfigurationError> {
        let webhook_error =
            |e: NotificationChannelError| ConfigurationError::invalid("HTTP_TIMEOUT_SECS", format!("{:?}", timeout), e.to_string());

        Ok(Self::new(config.retry.clone())
            .with_channel(Arc::new(EmailChannel::new(&config.smtp)?))
            .with_channel(Arc::new(
                WebhookChannel::dingtalk(config.dingding_webhook.clone(), timeout)
                    .map_err(webhook_error)?,
            ))
            .with_channel(Arc::new(
                WebhookChannel::wecom(config.wecom_webhook.clone(), timeout)
                    .map_err(webhook_error)?,
            )))
    }

    pub fn configured_channels(&self) -> Vec<&str> {
        self.channels
            .iter()
            .filter(|c| c.is_configured())
            .map(|c| c.name())
            .collect()
    }

    /// Deliver to every configured channel, one result per channel
    pub async fn notify_all(&self, title: &str, message: &str) -> Vec<NotificationResult> {
        let mut active = Vec::new();
        for channel in &self.channels {
            if channel.is_configured() {
                active.push(channel.clone());
            } else {
                warn!(channel = channel.name(), "Notification channel not configured, skipping");
            }
        }

        if active.is_empty() {
            warn!("No notification channels configured");
            return Vec::new();
        }

        let results = join_all(
            active
                .iter()
                .map(|channel| self.deliver(channel.as_ref(), title, message)),
        )
        .await;

        let delivered = results.iter().filter(|r| r.success).count();
        info!(
            delivered = delivered,
            failed = results.len() - delivered,
            "Notification fan-out finished"
        );
        results
    }

    pub async fn notify_anomaly(&self, anomaly: &Anomaly) -> Vec<NotificationResult> {
        let (title, message) = format_alert(anomaly);
        self.notify_all(&title, &message).await
    }

    async fn deliver(
        &self,
        channel: &dyn NotificationChannel,
        title: &str,
        message: &str,
    ) -> NotificationResult {
        let name = channel.name().to_string();
        let attempts = AtomicUsize::new(0);
        let counter = &attempts;

        let attempt = move || async move {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            debug!(channel = channel.name(), attempt = n, "Sending notification");
            channel.send(title, message).await
        };
        let on_retry = |e: &NotificationChannelError, delay: Duration| {
            warn!(
                channel = channel.name(),
                error = %e,
                retry_in_ms = delay.as_millis() as u64,
                "Notification attempt failed, retrying"
            );
        };

        // max_times counts retries after the first attempt
        let retries = self.retry.max_retries.saturating_sub(1);
        let outcome = match self.retry.backoff {
            BackoffKind::Fixed => {
                attempt
                    .retry(
                        ConstantBuilder::default()
                            .with_delay(self.retry.delay)
                            .with_max_times(retries),
                    )
                    .sleep(tokio::time::sleep)
                    .notify(on_retry)
                    .await
            }
            BackoffKind::Exponential => {
                attempt
                    .retry(
                        ExponentialBuilder::default()
                            .with_min_delay(self.retry.delay)
                            .with_max_times(retries),
                    )
                    .sleep(tokio::time::sleep)
                    .notify(on_retry)
                    .await
            }
        };

        let attempts = attempts.load(Ordering::SeqCst);
        match outcome {
            Ok(()) => NotificationResult {
                channel: name,
                success: true,
                attempts,
                error: None,
            },
            Err(e) => {
                error!(channel = %name, attempts = attempts, error = %e, "Notification channel failed");
                NotificationResult {
                    channel: name,
                    success: false,
                    attempts,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
