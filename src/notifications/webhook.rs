//! DingTalk and WeCom group-robot webhooks

use super::format::markdown_body;
use super::NotificationChannel;
use crate::error::NotificationChannelError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookKind {
    DingTalk,
    WeCom,
}

impl WebhookKind {
    pub fn name(&self) -> &'static str {
        match self {
            WebhookKind::DingTalk => "dingtalk",
            WebhookKind::WeCom => "wecom",
        }
    }

    /// Robot message body for this service
    pub fn payload(&self, title: &str, message: &str) -> Value {
        let text = markdown_body(title, message);
        match self {
            WebhookKind::DingTalk => json!({
                "msgtype": "markdown",
                "markdown": { "title": title, "text": text },
            }),
            WebhookKind::WeCom => json!({
                "msgtype": "markdown",
                "markdown": { "content": text },
            }),
        }
    }
}

pub struct WebhookChannel {
    kind: WebhookKind,
    url: Option<String>,
    client: Client,
}

impl WebhookChannel {
    pub fn new(kind: WebhookKind, url: Option<String>, timeout: Duration) -> Result<Self, NotificationChannelError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { kind, url, client })
    }

    pub fn dingtalk(url: Option<String>, timeout: Duration) -> Result<Self, NotificationChannelError> {
        Self::new(WebhookKind::DingTalk, url, timeout)
    }

    pub fn wecom(url: Option<String>, timeout: Duration) -> Result<Self, NotificationChannelError> {
        Self::new(WebhookKind::WeCom, url, timeout)
    }
}

#[async_trait]
impl NotificationChannel for WebhookChannel {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    async fn send(&self, title: &str, message: &str) -> Result<(), NotificationChannelError> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| NotificationChannelError::NotConfigured(self.kind.name().to_string()))?;

        let response = self
            .client
            .post(url)
            .json(&self.kind.payload(title, message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotificationChannelError::Status(status.as_u16()));
        }

        // Both robots answer 200 with a non-zero errcode on rejection
        let body = response.text().await?;
        if let Ok(reply) = serde_json::from_str::<Value>(&body) {
            let code = reply.get("errcode").and_then(Value::as_i64).unwrap_or(0);
            if code != 0 {
                let message = reply
                    .get("errmsg")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                return Err(NotificationChannelError::Rejected { code, message });
            }
        }

        debug!(channel = self.kind.name(), "Webhook delivered");
        Ok(())
    }
}
