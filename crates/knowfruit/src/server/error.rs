//! Mapping from pipeline failures to HTTP responses.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use knowfruit_core::{KnowFruitError, PipelineError};

use super::templates::error_page;

/// Errors a request handler can produce.
#[derive(Debug)]
pub enum AppError {
    /// The classification pipeline failed
    Classify(KnowFruitError),
    /// The multipart body could not be read
    Multipart(MultipartError),
    /// The form had no `file` field
    MissingFile,
    /// No info page exists for this fruit
    UnknownFruit(String),
    /// A page template failed to render
    Render(minijinja::Error),
}

impl From<KnowFruitError> for AppError {
    fn from(err: KnowFruitError) -> Self {
        AppError::Classify(err)
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Multipart(err)
    }
}

impl From<minijinja::Error> for AppError {
    fn from(err: minijinja::Error) -> Self {
        AppError::Render(err)
    }
}

impl AppError {
    /// Status code and the message shown to the user.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Classify(KnowFruitError::Pipeline(err)) => match err {
                PipelineError::Decode { .. } => (
                    StatusCode::BAD_REQUEST,
                    "We couldn't read that file as an image. Please upload a JPEG or PNG photo."
                        .to_string(),
                ),
                PipelineError::FileTooLarge { max_mb, .. } => (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    format!("That file is too large. Please upload an image under {max_mb}MB."),
                ),
                PipelineError::ImageTooLarge { max_dim, .. } => (
                    StatusCode::BAD_REQUEST,
                    format!("That image is too large. Please keep both sides under {max_dim} pixels."),
                ),
                PipelineError::Inference { .. } => (
                    StatusCode::BAD_GATEWAY,
                    "The fruit classifier is unavailable right now. Please try again.".to_string(),
                ),
                PipelineError::Timeout { .. } => (
                    StatusCode::GATEWAY_TIMEOUT,
                    "The fruit classifier took too long to answer. Please try again.".to_string(),
                ),
            },
            AppError::Classify(_) | AppError::Render(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong on our side.".to_string(),
            ),
            AppError::Multipart(err) => (err.status(), err.body_text()),
            AppError::MissingFile => (
                StatusCode::BAD_REQUEST,
                "No file was uploaded. Please choose a photo first.".to_string(),
            ),
            AppError::UnknownFruit(name) => (
                StatusCode::NOT_FOUND,
                format!("We don't have any information about {name}."),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        match &self {
            AppError::Classify(err) if status.is_server_error() => {
                tracing::error!("Request failed: {err}")
            }
            AppError::Render(err) => tracing::error!("Template error: {err}"),
            _ => tracing::info!(status = status.as_u16(), "Request rejected: {message}"),
        }

        let title = status.canonical_reason().unwrap_or("Error");
        (status, error_page(title, &message)).into_response()
    }
}
