//! Axum route handler for sending a reviewed draft.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::delivery::{Attachment, OutgoingEmail, SenderCredentials};
use crate::errors::AppError;
use crate::state::AppState;

const DEFAULT_RECIPIENT_NAME: &str = "Hiring Manager";

#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    pub status: String,
    pub recipient: String,
    pub subject: String,
}

/// Collects the multipart form into an `OutgoingEmail`. Unknown fields are ignored.
async fn read_send_form(mut multipart: Multipart) -> Result<OutgoingEmail, AppError> {
    let mut text = std::collections::HashMap::new();
    let mut attachment = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "resume" {
            let filename = field.file_name().unwrap_or("resume.pdf").to_string();
            let data: Bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
            if !data.is_empty() {
                attachment = Some(Attachment::pdf(filename, data));
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Could not read field '{name}': {e}")))?;
            text.insert(name, value);
        }
    }

    let mut take = |key: &str| text.remove(key).unwrap_or_default();
    let recipient_name = match take("recipient_name") {
        name if name.trim().is_empty() => DEFAULT_RECIPIENT_NAME.to_string(),
        name => name,
    };

    Ok(OutgoingEmail {
        sender: SenderCredentials {
            email: take("sender_email").trim().to_string(),
            password: take("sender_password"),
        },
        recipient_email: take("recipient_email").trim().to_string(),
        recipient_name,
        subject: take("subject").trim().to_string(),
        body: take("body"),
        attachment,
    })
}

/// POST /api/v1/emails/send
///
/// Multipart form: sender_email, sender_password, recipient_email, recipient_name,
/// subject, body, and a `resume` PDF file. Returns 501 when mail delivery is switched off.
pub async fn handle_send_email(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SendEmailResponse>, AppError> {
    let mailer = state.mailer.clone().ok_or(AppError::NotImplemented)?;

    let email = read_send_form(multipart).await?;
    email.validate().map_err(AppError::Validation)?;

    mailer.send(&email).await?;
    info!(
        "Sent '{}' to {} with {} attached",
        email.subject,
        email.recipient_email,
        email
            .attachment
            .as_ref()
            .map_or("nothing", |a| a.filename.as_str())
    );

    Ok(Json(SendEmailResponse {
        status: "sent".to_string(),
        recipient: email.recipient_email,
        subject: email.subject,
    }))
}
