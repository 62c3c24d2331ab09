//! Mail delivery: the contract between a reviewed draft and whatever sends it.
//!
//! `smtp::SmtpMailer` is the shipped transport. Setting `SMTP_HOST` to an empty value
//! disables delivery, and the send route then answers 501.

pub mod handlers;
pub mod smtp;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::resume::is_pdf;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("could not reach mail server: {0}")]
    Network(String),

    #[error("mail delivery failed: {0}")]
    Other(String),
}

/// Credentials for the sending account (an app password for most hosted providers).
#[derive(Clone)]
pub struct SenderCredentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for SenderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SenderCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

impl Attachment {
    pub fn pdf(filename: impl Into<String>, data: Bytes) -> Self {
        Self {
            filename: filename.into(),
            content_type: "application/pdf".to_string(),
            data,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub sender: SenderCredentials,
    pub recipient_email: String,
    pub recipient_name: String,
    pub subject: String,
    pub body: String,
    pub attachment: Option<Attachment>,
}

impl OutgoingEmail {
    /// Checks that a message is complete enough to hand to a transport.
    /// Returns a user-facing reason for the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.subject.trim().is_empty() || self.body.trim().is_empty() {
            return Err("Email subject or body cannot be empty".to_string());
        }
        if self.sender.email.trim().is_empty() || self.sender.password.is_empty() {
            return Err("Sender email and app password are required".to_string());
        }
        if !looks_like_address(&self.recipient_email) {
            return Err("A valid recipient email address is required".to_string());
        }
        match &self.attachment {
            None => Err("A resume PDF attachment is required".to_string()),
            Some(a) if !is_pdf(&a.data) => {
                Err(format!("Attachment '{}' is not a PDF file", a.filename))
            }
            Some(_) => Ok(()),
        }
    }
}

fn looks_like_address(address: &str) -> bool {
    let address = address.trim();
    match address.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !address.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Sends a validated message. Implementations map their failures onto `DeliveryError`.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), DeliveryError>;
}
