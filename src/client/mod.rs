//! Blocking client for the generation backend.
//!
//! The backend owns upload storage, OCR and PDF generation. This client
//! only moves bytes and JSON between the wizard state and its endpoints:
//!
//! - `POST /api/upload` (multipart `file`)
//! - `POST /api/ocr/{pdf_id}`
//! - `POST /api/generate`
//! - `GET /api/download/{pdf_id}/{copy_number}`
//!
//! Calls are strictly sequential and never retried. Each call takes a
//! [`CancelToken`]; cancellation is observed before the request is sent
//! and between chunks of a download.

pub mod cancel;
pub mod types;

pub use cancel::CancelToken;
pub use types::{
    default_file_name, GeneratedOutput, GenerationRequest, OcrResponse, OutputKind,
    UploadResponse,
};

use crate::config::ClientConfig;
use crate::domain::TextSection;
use crate::engine::check_num_copies;
use crate::error::{BatchError, BatchResult};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::{multipart, Client, Response};
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};
use types::ErrorBody;

const CHUNK_SIZE: usize = 64 * 1024;

/// Upper bound on the buffer reserved from a declared `Content-Length`.
const MAX_PREALLOC: u64 = 16 * CHUNK_SIZE as u64;

/// HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    /// Builds a client from configuration.
    pub fn new(config: &ClientConfig) -> BatchResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Uploads a PDF and returns the id the backend assigned to it.
    pub fn upload(&self, path: &Path, cancel: &CancelToken) -> BatchResult<UploadResponse> {
        const ENDPOINT: &str = "/api/upload";

        if !path.is_file() {
            return Err(BatchError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Input file does not exist",
                ),
            });
        }
        cancel.check("upload")?;

        let part = multipart::Part::file(path)
            .map_err(|source| BatchError::Io {
                path: path.to_path_buf(),
                source,
            })?
            .mime_str("application/pdf")?;
        let form = multipart::Form::new().part("file", part);

        debug!(path = %path.display(), "uploading document");
        let response = self.http.post(self.url(ENDPOINT)).multipart(form).send()?;
        let upload: UploadResponse = parse_json(ENDPOINT, check_status(ENDPOINT, response)?)?;
        info!(pdf_id = %upload.pdf_id, "document uploaded");
        Ok(upload)
    }

    /// Runs OCR on an uploaded document.
    pub fn detect_sections(
        &self,
        pdf_id: &str,
        cancel: &CancelToken,
    ) -> BatchResult<Vec<TextSection>> {
        let endpoint = format!("/api/ocr/{}", pdf_id);
        cancel.check("ocr")?;

        debug!(pdf_id, "requesting text detection");
        let response = self.http.post(self.url(&endpoint)).send()?;
        let ocr: OcrResponse = parse_json(&endpoint, check_status(&endpoint, response)?)?;
        cancel.check("ocr")?;

        info!(pdf_id, sections = ocr.sections.len(), "text detection finished");
        Ok(ocr.sections)
    }

    /// Requests generation of the batch and downloads the result.
    ///
    /// `progress` receives the bytes downloaded so far and the total size
    /// when the backend declares one.
    pub fn generate<F>(
        &self,
        request: &GenerationRequest,
        cancel: &CancelToken,
        progress: F,
    ) -> BatchResult<GeneratedOutput>
    where
        F: FnMut(u64, Option<u64>),
    {
        const ENDPOINT: &str = "/api/generate";

        check_num_copies(request.num_copies)?;
        if request.rules.is_empty() {
            return Err(BatchError::invalid_input(
                "rules",
                "at least one rule is required",
            ));
        }
        for rule in &request.rules {
            rule.validate()?;
        }
        cancel.check("generate")?;

        info!(
            pdf_id = %request.pdf_id,
            copies = request.num_copies,
            rules = request.rules.len(),
            "requesting generation"
        );
        let response = self.http.post(self.url(ENDPOINT)).json(request).send()?;
        let response = check_status(ENDPOINT, response)?;
        read_output(ENDPOINT, &request.pdf_id, response, cancel, progress)
    }

    /// Downloads one previously generated copy.
    pub fn download_copy(
        &self,
        pdf_id: &str,
        copy_number: u32,
        cancel: &CancelToken,
    ) -> BatchResult<GeneratedOutput> {
        let endpoint = format!("/api/download/{}/{}", pdf_id, copy_number);
        cancel.check("download")?;

        let response = self.http.get(self.url(&endpoint)).send()?;
        let response = check_status(&endpoint, response)?;
        let mut output = read_output(&endpoint, pdf_id, response, cancel, |_, _| {})?;
        // No Content-Disposition: name it the way the backend names copies.
        if output.file_name == default_file_name(output.kind, pdf_id) {
            output.file_name = format!("copy_{}.{}", copy_number, output.kind.extension());
        }
        Ok(output)
    }
}

/// Turns non-success responses into [`BatchError::Http`], preferring the
/// backend's `detail` message.
fn check_status(endpoint: &str, response: Response) -> BatchResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.detail)
        .ok()
        .filter(|d| !d.is_empty())
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

    Err(BatchError::Http {
        endpoint: endpoint.to_string(),
        status: Some(status.as_u16()),
        message,
    })
}

fn parse_json<T: DeserializeOwned>(endpoint: &str, response: Response) -> BatchResult<T> {
    let body = response.text()?;
    serde_json::from_str(&body).map_err(|source| BatchError::Serialization {
        context: format!("response from {}", endpoint),
        source,
    })
}

fn content_disposition_filename(header: &str) -> Option<String> {
    static PATTERN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r#"filename\s*=\s*"?([^";]+)"?"#).expect("Valid content-disposition regex")
    });
    PATTERN
        .captures(header)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
}

fn read_output<F>(
    endpoint: &str,
    pdf_id: &str,
    mut response: Response,
    cancel: &CancelToken,
    mut progress: F,
) -> BatchResult<GeneratedOutput>
where
    F: FnMut(u64, Option<u64>),
{
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let kind = OutputKind::from_content_type(&content_type).ok_or_else(|| BatchError::Http {
        endpoint: endpoint.to_string(),
        status: Some(response.status().as_u16()),
        message: format!("unexpected content type '{}'", content_type),
    })?;
    let file_name = response
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .and_then(content_disposition_filename)
        .unwrap_or_else(|| default_file_name(kind, pdf_id));

    let total = response.content_length();
    let mut bytes = Vec::with_capacity(total.map_or(0, |t| t.min(MAX_PREALLOC)) as usize);
    let mut buffer = vec![0u8; CHUNK_SIZE];
    loop {
        cancel.check(endpoint)?;
        let count = response.read(&mut buffer).map_err(|err| BatchError::Http {
            endpoint: endpoint.to_string(),
            status: None,
            message: format!("failed to read response body: {}", err),
        })?;
        if count == 0 {
            break;
        }
        bytes.extend_from_slice(&buffer[..count]);
        progress(bytes.len() as u64, total);
    }
    if let Some(total) = total.filter(|t| (bytes.len() as u64) < *t) {
        return Err(BatchError::Http {
            endpoint: endpoint.to_string(),
            status: None,
            message: format!("response body ended after {} of {} bytes", bytes.len(), total),
        });
    }

    debug!(endpoint, bytes = bytes.len(), kind = ?kind, "download finished");
    Ok(GeneratedOutput {
        kind,
        content_type,
        file_name,
        bytes,
    })
}
