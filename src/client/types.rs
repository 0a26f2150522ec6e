//! Request and response bodies exchanged with the backend.

use crate::domain::{ReplacementRule, TextSection};
use crate::error::{BatchError, BatchResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Response of `POST /api/upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub pdf_id: String,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Response of `POST /api/ocr/{pdf_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrResponse {
    pub sections: Vec<TextSection>,
}

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub pdf_id: String,
    pub rules: Vec<ReplacementRule>,
    pub num_copies: u32,
    /// OCR geometry of the sections the rules refer to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<TextSection>,
}

/// Error body returned by the backend on failure.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: String,
}

/// What the backend sent back for a generation or download request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// A single PDF document
    Pdf,
    /// A zip archive of PDF documents
    Zip,
}

impl OutputKind {
    /// Classifies a `Content-Type` header value, ignoring parameters.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "application/pdf" => Some(Self::Pdf),
            "application/zip" | "application/x-zip-compressed" => Some(Self::Zip),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Zip => "zip",
        }
    }
}

/// A downloaded document or archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedOutput {
    pub kind: OutputKind,
    pub content_type: String,
    /// File name from `Content-Disposition`, or one derived from the pdf id
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl GeneratedOutput {
    /// Writes the payload to `path`.
    pub fn save(&self, path: &Path) -> BatchResult<()> {
        std::fs::write(path, &self.bytes).map_err(|source| BatchError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// File name the web client used for each kind of output.
pub fn default_file_name(kind: OutputKind, pdf_id: &str) -> String {
    match kind {
        OutputKind::Zip => format!("generated_pdfs_{}.zip", pdf_id),
        OutputKind::Pdf => format!("generated_{}.pdf", pdf_id),
    }
}
