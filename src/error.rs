//! Error types for the batch-generation library.
//!
//! Rule validation failures, backend failures and local I/O problems all
//! surface through [`BatchError`]. None of them is fatal: callers keep the
//! previous wizard state and report the condition.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for batch operations.
pub type BatchResult<T> = Result<T, BatchError>;

/// Error type for all rule, wizard and backend operations.
#[derive(Debug)]
pub enum BatchError {
    /// A rule carried a `type` discriminant other than serial, random or custom
    InvalidRuleType { value: String },

    /// An update targeted a section that has no rule
    RuleNotFound { section_id: String },

    /// Random bounds where min > max
    InvalidRange { min: i64, max: i64 },

    /// A section id that is not among the detected sections
    SectionNotFound { section_id: String },

    /// Invalid configuration or parameters
    InvalidInput { parameter: String, reason: String },

    /// Error occurred while reading or writing files
    Io { path: PathBuf, source: io::Error },

    /// The backend rejected a request or could not be reached
    Http {
        endpoint: String,
        status: Option<u16>,
        message: String,
    },

    /// The caller cancelled the operation
    Cancelled { operation: String },

    /// JSON encoding or decoding failed
    Serialization {
        context: String,
        source: serde_json::Error,
    },
}

impl BatchError {
    /// Shorthand for [`BatchError::InvalidInput`].
    pub fn invalid_input(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for failures caused by rule or wizard validation
    /// rather than by I/O or the backend.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidRuleType { .. }
                | Self::RuleNotFound { .. }
                | Self::InvalidRange { .. }
                | Self::SectionNotFound { .. }
                | Self::InvalidInput { .. }
        )
    }
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRuleType { value } => {
                write!(
                    f,
                    "Invalid rule type '{}': expected serial, random or custom",
                    value
                )
            }
            Self::RuleNotFound { section_id } => {
                write!(f, "No rule found for section '{}'", section_id)
            }
            Self::InvalidRange { min, max } => {
                write!(
                    f,
                    "Invalid random range: min {} is greater than max {}",
                    min, max
                )
            }
            Self::SectionNotFound { section_id } => {
                write!(f, "Section '{}' not found among detected sections", section_id)
            }
            Self::InvalidInput { parameter, reason } => {
                write!(f, "Invalid input for '{}': {}", parameter, reason)
            }
            Self::Io { path, source } => {
                write!(f, "IO error for path '{}': {}", path.display(), source)
            }
            Self::Http {
                endpoint,
                status,
                message,
            } => {
                if let Some(code) = status {
                    write!(f, "Request to {} failed ({}): {}", endpoint, code, message)
                } else {
                    write!(f, "Request to {} failed: {}", endpoint, message)
                }
            }
            Self::Cancelled { operation } => write!(f, "Operation '{}' was cancelled", operation),
            Self::Serialization { context, source } => {
                write!(f, "Serialization error in {}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialization { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for BatchError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for BatchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            context: "json".to_string(),
            source: err,
        }
    }
}

impl From<reqwest::Error> for BatchError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map(|url| url.path().to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        Self::Http {
            endpoint,
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}
