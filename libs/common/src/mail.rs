//! Outbound mail delivery
//!
//! Notification emails leave the process through the [`MailTransport`]
//! trait. Production deployments send through AWS SES; when no sender
//! address is configured the [`LogMailer`] records the message in the logs
//! instead, which keeps local development free of cloud credentials.

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::error::DisplayErrorContext;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use tracing::info;

use crate::error::MailError;

/// Mail configuration
#[derive(Debug, Clone, Default)]
pub struct MailConfig {
    /// Sender address; `None` disables real delivery
    pub from_address: Option<String>,
}

impl MailConfig {
    /// Create a new MailConfig from environment variables
    ///
    /// # Environment Variables
    /// - `MAIL_FROM`: Verified SES sender address. When unset or blank,
    ///   messages are only logged.
    ///
    /// AWS region and credentials are read by the SDK from its standard
    /// variables (`AWS_REGION`, `AWS_ACCESS_KEY_ID`, ...).
    pub fn from_env() -> Self {
        let from_address = std::env::var("MAIL_FROM")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self { from_address }
    }
}

/// A rendered email ready for delivery
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Something that can deliver an [`EmailMessage`]
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Short transport name for logs
    fn name(&self) -> &'static str;

    /// Deliver a single message
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError>;
}

/// Mail transport backed by AWS SES v2
pub struct SesMailer {
    client: SesClient,
    from_address: String,
}

impl SesMailer {
    /// Create a new SES mailer from an already configured client
    pub fn new(client: SesClient, from_address: impl Into<String>) -> Self {
        Self {
            client,
            from_address: from_address.into(),
        }
    }
}

fn utf8_content(data: &str) -> Result<Content, MailError> {
    Content::builder()
        .data(data)
        .charset("UTF-8")
        .build()
        .map_err(|e| MailError::Build(e.to_string()))
}

#[async_trait]
impl MailTransport for SesMailer {
    fn name(&self) -> &'static str {
        "ses"
    }

    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        let destination = Destination::builder()
            .to_addresses(&message.to)
            .build();

        let body = Body::builder()
            .html(utf8_content(&message.html)?)
            .text(utf8_content(&message.text)?)
            .build();

        let ses_message = Message::builder()
            .subject(utf8_content(&message.subject)?)
            .body(body)
            .build();

        let content = EmailContent::builder().simple(ses_message).build();

        self.client
            .send_email()
            .from_email_address(&self.from_address)
            .destination(destination)
            .content(content)
            .send()
            .await
            .map_err(|e| MailError::Delivery(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }
}

/// Mail transport that only logs what it would have sent
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl MailTransport for LogMailer {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            "Mail delivery disabled, message not sent"
        );
        Ok(())
    }
}

/// Build the transport selected by the configuration
///
/// Loads the AWS SDK configuration only when a sender address is present.
pub async fn build_transport(config: &MailConfig) -> Arc<dyn MailTransport> {
    match &config.from_address {
        Some(from) => {
            let aws_config = aws_config::load_from_env().await;
            info!("Mail transport: SES, sender {}", from);
            Arc::new(SesMailer::new(SesClient::new(&aws_config), from.clone()))
        }
        None => {
            info!("Mail transport: log only (MAIL_FROM not set)");
            Arc::new(LogMailer)
        }
    }
}
