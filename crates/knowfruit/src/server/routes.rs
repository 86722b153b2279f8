//! Request handlers.

use axum::extract::{Multipart, Path, State};
use axum::response::Html;
use axum::Json;
use knowfruit_core::{display_names, strip_cut_suffix};
use serde::Serialize;

use super::{AppError, AppState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[tracing::instrument(name = "GET /", skip_all)]
pub async fn upload_form(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(state.templates.upload()?)
}

#[tracing::instrument(name = "POST /", skip_all)]
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let bytes = read_file_field(&mut multipart).await?;
    tracing::debug!("Received upload of {} bytes", bytes.len());

    let ranked = state.classify(bytes).await?;
    let names = display_names(&ranked);
    tracing::info!(top = ?ranked.top(), "Classified upload");

    Ok(state.templates.choose(&names)?)
}

#[tracing::instrument(name = "GET /fruits", skip_all)]
pub async fn fruit_page(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Html<String>, AppError> {
    // `info` strips the cut suffix itself; strip here only for the title.
    let display = strip_cut_suffix(&name);
    let info = state
        .fruit_info
        .info(&name)
        .ok_or_else(|| AppError::UnknownFruit(display.to_string()))?;
    Ok(state.templates.fruit(display, info)?)
}

#[tracing::instrument(name = "GET /health")]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: knowfruit_core::VERSION.to_string(),
    })
}

/// Pull the bytes of the `file` form field, skipping any others.
async fn read_file_field(multipart: &mut Multipart) -> Result<Vec<u8>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            let data = field.bytes().await?;
            if data.is_empty() {
                return Err(AppError::MissingFile);
            }
            return Ok(data.to_vec());
        }
    }
    Err(AppError::MissingFile)
}
