//! Batch plans: every copy's replacement texts, computed up front.

use serde::Serialize;

/// Largest batch the generator accepts in one request.
pub const MAX_COPIES: u32 = 1000;

/// The text one rule produces for one copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replacement {
    pub section_id: String,
    pub original_text: String,
    pub text: String,
}

/// Replacements for a single generated copy, in rule order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyPlan {
    /// Zero-based copy index
    pub index: u32,
    pub replacements: Vec<Replacement>,
}

impl CopyPlan {
    /// One-based number used in generated file names.
    pub fn copy_number(&self) -> u32 {
        self.index + 1
    }

    /// Returns the replacement text for a section, if a rule covers it.
    pub fn text_for(&self, section_id: &str) -> Option<&str> {
        self.replacements
            .iter()
            .find(|r| r.section_id == section_id)
            .map(|r| r.text.as_str())
    }
}

/// Replacement texts for a whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchPlan {
    pub copies: Vec<CopyPlan>,
}

impl BatchPlan {
    pub fn len(&self) -> usize {
        self.copies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.copies.is_empty()
    }

    /// All texts generated for one section, in copy order.
    pub fn column(&self, section_id: &str) -> Vec<&str> {
        self.copies
            .iter()
            .filter_map(|copy| copy.text_for(section_id))
            .collect()
    }
}
