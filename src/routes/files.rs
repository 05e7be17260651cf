//! Artifact serving routes
//!
//! Serves split page files (and zip bundles) from the artifact store.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    routing::get,
    Router,
};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create the files router
pub fn router() -> Router<AppState> {
    Router::new().route("/:request_id/:filename", get(serve_artifact))
}

/// Serve one artifact, or 404 if it is unknown or already swept.
async fn serve_artifact(
    State(state): State<AppState>,
    Path((request_id, filename)): Path<(String, String)>,
) -> Result<Response> {
    let bytes = state.store().resolve(&request_id, &filename).await?;

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, guess_content_type(&filename))
        .header(header::CONTENT_LENGTH, bytes.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", filename),
        )
        .body(Body::from(bytes))
        .map_err(|e| AppError::Io(std::io::Error::other(e)))?)
}

/// Guess content type from file extension
fn guess_content_type(filename: &str) -> &'static str {
    match filename.rsplit('.').next().unwrap_or("") {
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}
