use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::delivery::DeliveryError;
use crate::llm_client::LlmError;

/// Guidance attached to every extraction parse failure.
pub const JSON_PARSE_HINT: &str =
    "Could not parse the job description into structured JSON. Try shortening the input.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    /// The model's extraction output was not usable JSON.
    #[error("Could not parse the job description into structured JSON. Try shortening the input. ({0})")]
    JsonParse(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Not implemented")]
    NotImplemented,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::JsonParse(detail) => {
                tracing::warn!("Extraction output was not valid JSON: {detail}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "JSON_PARSE_ERROR",
                    JSON_PARSE_HINT.to_string(),
                )
            }
            AppError::Llm(LlmError::Configuration(msg)) => {
                tracing::error!("LLM configuration error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    "The completion service is not configured".to_string(),
                )
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (StatusCode::BAD_GATEWAY, "LLM_ERROR", e.to_string())
            }
            AppError::Pdf(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "PDF_ERROR", msg.clone()),
            AppError::Delivery(e) => {
                tracing::error!("Delivery error: {e}");
                let (status, code) = match e {
                    DeliveryError::Authentication(_) => {
                        (StatusCode::BAD_GATEWAY, "SMTP_AUTH_ERROR")
                    }
                    DeliveryError::Network(_) => {
                        (StatusCode::SERVICE_UNAVAILABLE, "SMTP_NETWORK_ERROR")
                    }
                    DeliveryError::Other(_) => (StatusCode::BAD_GATEWAY, "SMTP_ERROR"),
                };
                (status, code, e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
            AppError::NotImplemented => (
                StatusCode::NOT_IMPLEMENTED,
                "NOT_IMPLEMENTED",
                "This endpoint is not available in this deployment".to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
