//! The four wizard steps.

use std::fmt;

/// A step of the linear batch-editing workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    Upload,
    SelectSections,
    ConfigureRules,
    Generate,
}

impl WizardStep {
    /// One-based position shown to the user.
    pub fn number(self) -> u8 {
        match self {
            Self::Upload => 1,
            Self::SelectSections => 2,
            Self::ConfigureRules => 3,
            Self::Generate => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Upload => "Upload PDF",
            Self::SelectSections => "Select Text Sections to Edit",
            Self::ConfigureRules => "Configure Replacement Rules",
            Self::Generate => "Generate PDF Copies",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {}: {}", self.number(), self.title())
    }
}
