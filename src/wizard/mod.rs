//! Wizard state and its reducers.
//!
//! The whole workflow state lives in one [`WizardState`] value. Every
//! transition is a pure function from the current state to a new one, so
//! a failed transition leaves the caller holding the previous state.

pub mod step;

pub use step::WizardStep;

use crate::client::GenerationRequest;
use crate::domain::{find_section, ReplacementRule, TextSection};
use crate::engine::{self, check_num_copies};
use crate::error::{BatchError, BatchResult};

/// Number of copies requested until the user changes it.
pub const DEFAULT_NUM_COPIES: u32 = 10;

/// State of one batch-editing session.
///
/// `selected` and `rules` always hold the same section ids in the same
/// order: a rule exists exactly while its section is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    pdf_id: Option<String>,
    sections: Vec<TextSection>,
    selected: Vec<TextSection>,
    rules: Vec<ReplacementRule>,
    num_copies: u32,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            pdf_id: None,
            sections: Vec::new(),
            selected: Vec::new(),
            rules: Vec::new(),
            num_copies: DEFAULT_NUM_COPIES,
        }
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pdf_id(&self) -> Option<&str> {
        self.pdf_id.as_deref()
    }

    pub fn sections(&self) -> &[TextSection] {
        &self.sections
    }

    pub fn selected(&self) -> &[TextSection] {
        &self.selected
    }

    pub fn rules(&self) -> &[ReplacementRule] {
        &self.rules
    }

    pub fn num_copies(&self) -> u32 {
        self.num_copies
    }

    pub fn rule_for(&self, section_id: &str) -> Option<&ReplacementRule> {
        self.rules.iter().find(|r| r.section_id == section_id)
    }

    pub fn is_selected(&self, section_id: &str) -> bool {
        self.selected.iter().any(|s| s.id == section_id)
    }

    /// A new document was uploaded; everything derived from the previous
    /// document is discarded. The copy count is kept.
    pub fn pdf_uploaded(&self, pdf_id: impl Into<String>) -> Self {
        Self {
            pdf_id: Some(pdf_id.into()),
            num_copies: self.num_copies,
            ..Self::default()
        }
    }

    /// OCR finished for the current document.
    pub fn sections_detected(&self, sections: Vec<TextSection>) -> Self {
        Self {
            sections,
            ..self.clone()
        }
    }

    /// Selects a section and creates its default rule.
    ///
    /// Selecting an already selected section changes nothing.
    pub fn select_section(&self, section: &TextSection) -> BatchResult<Self> {
        if self.is_selected(&section.id) {
            return Ok(self.clone());
        }
        if find_section(&self.sections, &section.id).is_none() {
            return Err(BatchError::SectionNotFound {
                section_id: section.id.clone(),
            });
        }

        let mut next = self.clone();
        next.selected.push(section.clone());
        next.rules.push(ReplacementRule::for_section(section));
        Ok(next)
    }

    /// Deselects a section and drops its rule. Unknown ids are ignored.
    pub fn deselect_section(&self, section_id: &str) -> Self {
        let mut next = self.clone();
        next.selected.retain(|s| s.id != section_id);
        next.rules.retain(|r| r.section_id != section_id);
        next
    }

    /// Replaces the rule for `section_id`.
    pub fn update_rule(&self, section_id: &str, rule: ReplacementRule) -> BatchResult<Self> {
        if rule.section_id != section_id {
            return Err(BatchError::invalid_input(
                "section_id",
                format!(
                    "rule for '{}' cannot replace the rule for '{}'",
                    rule.section_id, section_id
                ),
            ));
        }
        rule.validate()?;

        let position = self
            .rules
            .iter()
            .position(|r| r.section_id == section_id)
            .ok_or_else(|| BatchError::RuleNotFound {
                section_id: section_id.to_string(),
            })?;

        let mut next = self.clone();
        next.rules[position] = rule;
        Ok(next)
    }

    /// Sets the number of copies to generate.
    pub fn set_num_copies(&self, num_copies: u32) -> BatchResult<Self> {
        check_num_copies(num_copies)?;
        Ok(Self {
            num_copies,
            ..self.clone()
        })
    }

    /// Steps shown to the user, in order.
    pub fn visible_steps(&self) -> Vec<WizardStep> {
        let mut steps = vec![WizardStep::Upload];
        if !self.sections.is_empty() {
            steps.push(WizardStep::SelectSections);
        }
        if !self.selected.is_empty() {
            steps.push(WizardStep::ConfigureRules);
        }
        if !self.rules.is_empty() {
            steps.push(WizardStep::Generate);
        }
        steps
    }

    /// The furthest step the user can work on.
    pub fn current_step(&self) -> WizardStep {
        self.visible_steps()
            .last()
            .copied()
            .unwrap_or(WizardStep::Upload)
    }

    /// Preview text for every configured rule.
    pub fn previews(&self) -> Vec<(String, BatchResult<String>)> {
        self.rules
            .iter()
            .map(|r| (r.section_id.clone(), engine::preview(r)))
            .collect()
    }

    /// Builds the generation request for the configured rules.
    ///
    /// The request carries the OCR geometry of every section a rule refers
    /// to, so the backend does not need to re-run detection.
    pub fn generation_request(&self) -> BatchResult<GenerationRequest> {
        let pdf_id = self
            .pdf_id
            .clone()
            .ok_or_else(|| BatchError::invalid_input("pdf_id", "no document uploaded"))?;
        if self.rules.is_empty() {
            return Err(BatchError::invalid_input(
                "rules",
                "select at least one section",
            ));
        }
        for rule in &self.rules {
            rule.validate()?;
        }

        let sections = self
            .rules
            .iter()
            .filter_map(|r| find_section(&self.selected, &r.section_id).cloned())
            .collect();

        Ok(GenerationRequest {
            pdf_id,
            rules: self.rules.clone(),
            num_copies: self.num_copies,
            sections,
        })
    }
}
