//! Source PDF retrieval
//!
//! Downloads the source document from a caller-supplied URL with a bounded
//! timeout, a bounded redirect chain, and a size cap, and verifies the
//! response is plausibly a PDF before handing it to the splitter.

use reqwest::Url;

use crate::config::FetchConfig;
use crate::error::{AppError, Result};

/// Redirect chain bound for source downloads.
const MAX_REDIRECTS: usize = 10;

/// A downloaded source document.
pub struct FetchedPdf {
    pub bytes: Vec<u8>,
    /// File name taken from the final URL's path, `downloaded.pdf` fallback.
    pub file_name: String,
}

/// HTTP client wrapper for fetching source PDFs.
#[derive(Clone)]
pub struct Retriever {
    client: reqwest::Client,
    max_bytes: u64,
}

impl Retriever {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| AppError::UpstreamFetch(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_bytes: config.max_bytes,
        })
    }

    /// GET the source PDF, returning its bytes and a file name for prefixing
    /// the generated artifacts.
    pub async fn fetch_pdf(&self, url: Url) -> Result<FetchedPdf> {
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::UpstreamFetch(format!("Download of {url} timed out"))
            } else {
                AppError::UpstreamFetch(format!("Failed to download {url}: {e}"))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamFetch(format!(
                "Source returned HTTP {status}"
            )));
        }

        if let Some(len) = response.content_length() {
            if len > self.max_bytes {
                return Err(AppError::UpstreamFetch(format!(
                    "Source PDF is {len} bytes, limit is {}",
                    self.max_bytes
                )));
            }
        }

        let file_name = file_name_from(response.url());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::UpstreamFetch(format!("Failed to read response body: {e}")))?;

        if bytes.is_empty() {
            return Err(AppError::UpstreamFetch("Source returned an empty body".to_string()));
        }
        // Servers that omit Content-Length are still held to the cap
        if bytes.len() as u64 > self.max_bytes {
            return Err(AppError::UpstreamFetch(format!(
                "Source PDF is {} bytes, limit is {}",
                bytes.len(),
                self.max_bytes
            )));
        }
        if !bytes.starts_with(b"%PDF") {
            return Err(AppError::UpstreamFetch(
                "Source does not look like a PDF".to_string(),
            ));
        }

        tracing::debug!(url = %url, size = bytes.len(), "Downloaded source PDF");

        Ok(FetchedPdf {
            bytes: bytes.to_vec(),
            file_name,
        })
    }
}

/// Derive a file name from the last non-empty path segment of the final URL.
fn file_name_from(url: &Url) -> String {
    if let Some(segments) = url.path_segments() {
        if let Some(last) = segments.filter(|s| !s.is_empty()).last() {
            if last.contains('.') {
                return last.to_string();
            }
        }
    }
    "downloaded.pdf".to_string()
}
