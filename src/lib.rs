//! Replacement-rule engine and backend client for batch PDF generation.
//!
//! A batch starts from one uploaded PDF. The backend detects text sections,
//! the user selects some of them and attaches a replacement rule to each,
//! and the backend renders N copies with every rule evaluated per copy.
//! This crate holds everything on the client side of that workflow.
//!
//! # Features
//!
//! - **Rule Evaluation**: serial numbers, uniform random numbers and custom text
//! - **Number Formats**: printf-style templates such as `%04d`
//! - **Stable Previews**: a non-random rendering of each rule for display
//! - **Wizard State**: pure reducers for selecting sections and editing rules
//! - **Backend Client**: upload, OCR, generation and download with cancellation
//!
//! # Architecture
//!
//! - [`domain`]: Sections, rules and number formats
//! - [`engine`]: Rule evaluation, previews and batch plans
//! - [`wizard`]: Workflow state and its transitions
//! - [`client`]: HTTP client for the generation backend
//! - [`config`]: Client configuration
//! - [`error`]: Error handling
//!
//! # Quick Start
//!
//! ```
//! use pdf_batch::{RuleEngine, RuleKind, TextSection, WizardState};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let section = TextSection::new("section_0", "INV-0001");
//! let state = WizardState::new()
//!     .pdf_uploaded("3f2a")
//!     .sections_detected(vec![section.clone()])
//!     .select_section(&section)?;
//!
//! let rule = state.rule_for("section_0").unwrap().clone()
//!     .with_kind(RuleKind::Serial { start_value: 42 })
//!     .with_prefix("INV-")
//!     .with_format("%04d");
//! let state = state.update_rule("section_0", rule)?.set_num_copies(3)?;
//!
//! let plan = RuleEngine::new().plan(state.rules(), state.num_copies())?;
//! assert_eq!(plan.column("section_0"), vec!["INV-0042", "INV-0043", "INV-0044"]);
//! # Ok(())
//! # }
//! ```
//!
//! # Talking to the Backend
//!
//! ```no_run
//! use pdf_batch::{BackendClient, CancelToken, ClientConfig};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = BackendClient::new(&ClientConfig::load(None)?)?;
//! let cancel = CancelToken::new();
//!
//! let upload = client.upload(Path::new("invoice.pdf"), &cancel)?;
//! let sections = client.detect_sections(&upload.pdf_id, &cancel)?;
//! println!("{} sections detected", sections.len());
//! # Ok(())
//! # }
//! ```

// Public API
pub mod client;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod wizard;

// Re-exports for convenient access
pub use client::{BackendClient, CancelToken, GeneratedOutput, GenerationRequest, OutputKind};
pub use config::ClientConfig;
pub use domain::{parse_rules, NumberFormat, RawRule, ReplacementRule, RuleKind, TextSection};
pub use engine::{preview, BatchPlan, RuleEngine, MAX_COPIES};
pub use error::{BatchError, BatchResult};
pub use wizard::{WizardState, WizardStep};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_creation() {
        let _engine = RuleEngine::new();
    }

    #[test]
    fn test_default_rule_preview() {
        let rule = ReplacementRule::new("section_0", "INV-0001");
        assert_eq!(preview(&rule).unwrap(), "1");
    }
}
