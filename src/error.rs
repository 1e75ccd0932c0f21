//! Error types for the two halves of an interaction.
//!
//! [`WebhookError`] covers everything that can go wrong before the HTTP response is written and is
//! turned into that response.  [`AskError`] covers the deferred half of `/ask`, which runs after
//! the response is gone and can only be reported through a follow-up edit.

use crate::followup::NotifyError;
use crate::llm::CompletionError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing signature headers or PUBLIC_KEY")]
    MissingCredentials,
    #[error("Bad request signature")]
    BadSignature,
}

/// Failures surfaced synchronously in the webhook response.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Invalid JSON")]
    InvalidJson(#[source] serde_json::Error),

    #[error("unknown interaction type")]
    UnknownInteractionType(u64),

    #[error("unknown command")]
    UnknownCommand(String),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::InvalidJson(_) | Self::UnknownInteractionType(_) | Self::UnknownCommand(_) => {
                StatusCode::BAD_REQUEST
            }
        };

        match &self {
            Self::InvalidJson(e) => tracing::warn!(error = %e, "Rejected interaction body"),
            Self::UnknownInteractionType(kind) => {
                tracing::error!(kind, "Unknown interaction type")
            }
            Self::UnknownCommand(name) => tracing::error!(%name, "Unknown command"),
            Self::MethodNotAllowed | Self::Auth(_) => {
                tracing::debug!(error = %self, "Rejected webhook request")
            }
        }

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Failures of the deferred half of `/ask`.
#[derive(Debug, Error)]
pub enum AskError {
    #[error("Missing APP_ID (or YOUR_APP_ID) in environment")]
    MissingApplicationId,

    #[error("Missing interaction token")]
    MissingToken,

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error(transparent)]
    Notify(#[from] NotifyError),
}
