//! SMTP transport over implicit TLS, authenticated with the sender's own credentials.
//!
//! A connection is opened per message because every request carries different credentials.

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Attachment as MailAttachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::{authentication::Credentials, Error as SmtpError},
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

use crate::delivery::{DeliveryError, MailTransport, OutgoingEmail};

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 465;

/// Reply codes a relay sends when it rejects or requires authentication.
const AUTH_REPLY_CODES: [&str; 4] = ["454", "530", "534", "535"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl SmtpConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_SMTP_PORT,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    pub fn relay(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }
}

/// Builds the MIME message: a plain-text body plus the attachment, if any.
fn build_message(email: &OutgoingEmail) -> Result<Message, DeliveryError> {
    let from: Mailbox = email
        .sender
        .email
        .parse()
        .map_err(|e| DeliveryError::Other(format!("invalid sender address: {e}")))?;
    let to_address: Address = email
        .recipient_email
        .parse()
        .map_err(|e| DeliveryError::Other(format!("invalid recipient address: {e}")))?;
    let to = Mailbox::new(Some(email.recipient_name.clone()), to_address);

    let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(email.body.clone()));
    if let Some(attachment) = &email.attachment {
        let content_type = ContentType::parse(&attachment.content_type)
            .map_err(|e| DeliveryError::Other(format!("invalid attachment type: {e}")))?;
        parts = parts.singlepart(
            MailAttachment::new(attachment.filename.clone())
                .body(attachment.data.to_vec(), content_type),
        );
    }

    Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject.clone())
        .multipart(parts)
        .map_err(|e| DeliveryError::Other(e.to_string()))
}

/// Sorts a failure into auth, network, or other using the reply code when the relay sent one.
fn classify(reply_code: Option<&str>, reached_server: bool, message: String) -> DeliveryError {
    match reply_code {
        Some(code) if AUTH_REPLY_CODES.contains(&code) => DeliveryError::Authentication(message),
        Some(_) => DeliveryError::Other(message),
        None if !reached_server => DeliveryError::Network(message),
        None => DeliveryError::Other(message),
    }
}

fn delivery_error(err: SmtpError) -> DeliveryError {
    let reply_code = err.status().map(|code| code.to_string());
    // Client-side failures (bad message, no auth mechanism) happen with a live connection.
    let reached_server = err.is_response() || err.is_client();
    let reached_server = reached_server && !err.is_timeout();
    classify(reply_code.as_deref(), reached_server, err.to_string())
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), DeliveryError> {
        let message = build_message(email)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)
            .map_err(|e| DeliveryError::Network(e.to_string()))?
            .port(self.config.port)
            .credentials(Credentials::new(
                email.sender.email.clone(),
                email.sender.password.clone(),
            ))
            .timeout(Some(self.config.timeout))
            .build();

        debug!("Sending '{}' via {}", email.subject, self.relay());
        transport.send(message).await.map_err(delivery_error)?;
        Ok(())
    }
}
