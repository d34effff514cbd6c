//! SMTP email channel

use super::format::html_body;
use super::NotificationChannel;
use crate::config::SmtpConfig;
use crate::error::{ConfigurationError, NotificationChannelError};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

/// Sends HTML alerts; configured only when host, credentials and recipient are set
pub struct EmailChannel {
    mailer: Option<Mailer>,
}

impl EmailChannel {
    pub fn new(config: &SmtpConfig) -> Result<Self, ConfigurationError> {
        let (host, user, pass, recipient) = match (
            config.host.as_deref(),
            config.user.as_deref(),
            config.pass.as_deref(),
            config.recipient.as_deref(),
        ) {
            (Some(host), Some(user), Some(pass), Some(recipient)) => (host, user, pass, recipient),
            _ => return Ok(Self { mailer: None }),
        };

        let from_address = config.from.as_deref().unwrap_or(user);
        let from: Mailbox = from_address
            .parse()
            .map_err(|e: lettre::address::AddressError| {
                ConfigurationError::invalid("SMTP_FROM", from_address, e.to_string())
            })?;
        let to: Mailbox = recipient
            .parse()
            .map_err(|e: lettre::address::AddressError| {
                ConfigurationError::invalid("ALERT_EMAIL", recipient, e.to_string())
            })?;

        let builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| ConfigurationError::invalid("SMTP_HOST", host, e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        };

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(user.to_string(), pass.to_string()))
            .build();

        Ok(Self {
            mailer: Some(Mailer { transport, from, to }),
        })
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &str {
        "email"
    }

    fn is_configured(&self) -> bool {
        self.mailer.is_some()
    }

    async fn send(&self, title: &str, message: &str) -> Result<(), NotificationChannelError> {
        let mailer = self
            .mailer
            .as_ref()
            .ok_or_else(|| NotificationChannelError::NotConfigured("email".to_string()))?;

        let email = Message::builder()
            .from(mailer.from.clone())
            .to(mailer.to.clone())
            .subject(title)
            .header(ContentType::TEXT_HTML)
            .body(html_body(title, message))
            .map_err(|e| NotificationChannelError::InvalidEmail(e.to_string()))?;

        mailer.transport.send(email).await?;
        debug!(channel = "email", "Email delivered");
        Ok(())
    }
}
