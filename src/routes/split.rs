//! Split routes
//!
//! The request orchestrator: resolve the source PDF (by URL or raw body),
//! split it into pages, publish the pages under a fresh request identifier,
//! and hand back one public URL per page.
//!
//! Endpoints:
//! - POST /pdf-split - split into per-page files
//! - POST /pdf-split-zip - split and additionally bundle the pages as a zip

use std::io::{Cursor, Write};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::fetch::FetchedPdf;
use crate::splitter::{sanitize_basename, split_pages};
use crate::state::AppState;

/// Attempts at claiming a fresh identifier before giving up. Collisions on
/// v4 UUIDs are negligible; more than a couple in a row means the store is
/// misbehaving.
const MAX_ID_ATTEMPTS: usize = 4;

#[derive(Deserialize)]
struct SplitRequest {
    #[serde(rename = "pdf-url")]
    pdf_url: String,
}

#[derive(Serialize, Deserialize)]
pub struct SplitResponse {
    pub files: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct SplitZipResponse {
    pub zip: String,
}

/// Create the split router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pdf-split", post(pdf_split))
        .route("/pdf-split-zip", post(pdf_split_zip))
}

/// POST /pdf-split
async fn pdf_split(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SplitResponse>> {
    let published = split_and_publish(&state, &headers, body).await?;

    Ok(Json(SplitResponse {
        files: published
            .filenames
            .iter()
            .map(|name| format!("/files/{}/{}", published.request_id, name))
            .collect(),
    }))
}

/// POST /pdf-split-zip
async fn pdf_split_zip(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SplitZipResponse>> {
    let published = split_and_publish(&state, &headers, body).await?;

    let zip_name = format!("{}.zip", published.prefix);
    let zip_bytes = match build_zip(&published.filenames, &published.pages) {
        Ok(bytes) => bytes,
        Err(e) => {
            let _ = state.store().purge(&published.request_id).await;
            return Err(e);
        }
    };
    if let Err(e) = state
        .store()
        .put(&published.request_id, &zip_name, &zip_bytes)
        .await
    {
        let _ = state.store().purge(&published.request_id).await;
        return Err(e);
    }

    Ok(Json(SplitZipResponse {
        zip: format!("/files/{}/{}", published.request_id, zip_name),
    }))
}

/// A freshly published artifact set.
struct Published {
    request_id: String,
    prefix: String,
    /// Page file names, 1-based, in source page order.
    filenames: Vec<String>,
    /// The page bytes, kept for zip packaging; dropped when the response is
    /// built.
    pages: Vec<Vec<u8>>,
}

/// The full ingest -> split -> publish flow shared by both endpoints.
///
/// No artifacts exist on disk until splitting has succeeded, and a failed
/// write purges the whole namespace, so failures never leave a partial
/// artifact set discoverable.
async fn split_and_publish(
    state: &AppState,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Published> {
    let source = obtain_source(state, headers, body).await?;
    let source_name = source.file_name;

    let pages = tokio::task::spawn_blocking(move || split_pages(&source.bytes))
        .await
        .map_err(|e| AppError::Io(std::io::Error::other(e)))??;

    let request_id = claim_request_id(state).await?;
    let prefix = format!("{}_{}", sanitize_basename(&source_name), request_id);

    let mut filenames = Vec::with_capacity(pages.len());
    for (index, page) in pages.iter().enumerate() {
        let filename = format!("{}_page_{}.pdf", prefix, index + 1);
        if let Err(e) = state.store().put(&request_id, &filename, page).await {
            let _ = state.store().purge(&request_id).await;
            return Err(e);
        }
        filenames.push(filename);
    }

    tracing::info!(
        request_id = %request_id,
        source = %source_name,
        pages = filenames.len(),
        "Published split artifact set"
    );

    Ok(Published {
        request_id,
        prefix,
        filenames,
        pages,
    })
}

/// Resolve the source PDF from the request.
///
/// A JSON body must carry a `pdf-url` to download; any other content type is
/// treated as the PDF bytes themselves.
async fn obtain_source(state: &AppState, headers: &HeaderMap, body: Bytes) -> Result<FetchedPdf> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if content_type.contains("application/json") {
        let request: SplitRequest = serde_json::from_slice(&body)
            .map_err(|e| AppError::InvalidInput(format!("Invalid JSON payload: {e}")))?;
        let url = parse_source_url(&request.pdf_url)?;
        return state.retriever().fetch_pdf(url).await;
    }

    if body.is_empty() {
        return Err(AppError::InvalidInput(
            "PDF binary data is required in the request body".to_string(),
        ));
    }

    Ok(FetchedPdf {
        bytes: body.to_vec(),
        file_name: "source.pdf".to_string(),
    })
}

/// Syntactic URL validation, ahead of any network activity.
fn parse_source_url(raw: &str) -> Result<reqwest::Url> {
    let url = reqwest::Url::parse(raw)
        .map_err(|_| AppError::InvalidInput(format!("Invalid URL: {raw:?}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::InvalidInput(format!(
            "Unsupported URL scheme: {other:?}"
        ))),
    }
}

/// Generate a request identifier and claim its namespace, regenerating on
/// the (negligible) chance of a collision.
async fn claim_request_id(state: &AppState) -> Result<String> {
    for _ in 0..MAX_ID_ATTEMPTS {
        let id = Uuid::new_v4().simple().to_string();
        if state.store().create_namespace(&id).await? {
            return Ok(id);
        }
        tracing::warn!(request_id = %id, "Request identifier collision, regenerating");
    }
    Err(AppError::Io(std::io::Error::other(
        "could not claim a request identifier namespace",
    )))
}

/// Package the page files into a single in-memory zip archive.
fn build_zip(filenames: &[String], pages: &[Vec<u8>]) -> Result<Vec<u8>> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();

    for (name, bytes) in filenames.iter().zip(pages) {
        writer
            .start_file(name.as_str(), options)
            .map_err(|e| AppError::Io(std::io::Error::other(e)))?;
        writer
            .write_all(bytes)
            .map_err(AppError::Io)?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| AppError::Io(std::io::Error::other(e)))?;
    Ok(cursor.into_inner())
}
