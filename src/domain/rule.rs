//! Replacement rules.
//!
//! A rule describes how one selected section is rewritten across the
//! generated copies. In memory the rule kind is a sum type; on the wire it
//! is the flat record the generation backend accepts (see [`RawRule`]).

use super::format::NumberFormat;
use super::section::TextSection;
use crate::error::{BatchError, BatchResult};
use serde::{Deserialize, Serialize};

/// Default seed for serial rules.
pub const DEFAULT_START_VALUE: i64 = 1;

/// Default lower bound for random rules.
pub const DEFAULT_RANDOM_MIN: i64 = 1;

/// Default upper bound for random rules.
pub const DEFAULT_RANDOM_MAX: i64 = 100;

/// How a rule produces its value for each copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    /// `start_value + copy_index`
    Serial { start_value: i64 },

    /// Uniform draw from the closed interval `[min, max]`
    Random { min: i64, max: i64 },

    /// The same literal text in every copy
    Custom { text: String },
}

impl RuleKind {
    /// Serial numbering starting at [`DEFAULT_START_VALUE`].
    pub fn serial() -> Self {
        Self::Serial {
            start_value: DEFAULT_START_VALUE,
        }
    }

    /// Random numbers between the default bounds.
    pub fn random() -> Self {
        Self::Random {
            min: DEFAULT_RANDOM_MIN,
            max: DEFAULT_RANDOM_MAX,
        }
    }

    /// The wire discriminant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Serial { .. } => "serial",
            Self::Random { .. } => "random",
            Self::Custom { .. } => "custom",
        }
    }
}

impl Default for RuleKind {
    fn default() -> Self {
        Self::serial()
    }
}

/// A user-configured replacement for one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRule", into = "RawRule")]
pub struct ReplacementRule {
    pub section_id: String,
    /// Detected text at selection time, shown to the user and used by the
    /// backend to locate the text to replace.
    pub original_text: String,
    pub kind: RuleKind,
    pub prefix: String,
    pub suffix: String,
    pub format: Option<NumberFormat>,
}

impl ReplacementRule {
    /// Creates a serial rule with default settings.
    pub fn new(section_id: impl Into<String>, original_text: impl Into<String>) -> Self {
        Self {
            section_id: section_id.into(),
            original_text: original_text.into(),
            kind: RuleKind::default(),
            prefix: String::new(),
            suffix: String::new(),
            format: None,
        }
    }

    /// The default rule created when a section is selected.
    pub fn for_section(section: &TextSection) -> Self {
        Self::new(section.id.clone(), section.text.clone())
    }

    pub fn with_kind(mut self, kind: RuleKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Sets the number format. An empty template clears it.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        let format = format.into();
        self.format = (!format.is_empty()).then(|| NumberFormat::new(format));
        self
    }

    /// Checks the invariants the type system cannot express.
    pub fn validate(&self) -> BatchResult<()> {
        if self.section_id.is_empty() {
            return Err(BatchError::invalid_input(
                "section_id",
                "rule must reference a section",
            ));
        }
        if let RuleKind::Random { min, max } = self.kind {
            if min > max {
                return Err(BatchError::InvalidRange { min, max });
            }
        }
        Ok(())
    }
}

/// Flat wire representation of a rule.
///
/// Field names match the generation backend's request schema. Fields that
/// do not apply to the rule's type are omitted when serializing and
/// ignored when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRule {
    pub section_id: String,
    #[serde(default)]
    pub original_text: String,
    #[serde(rename = "type")]
    pub rule_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_max: Option<i64>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_text: Option<String>,
}

impl TryFrom<RawRule> for ReplacementRule {
    type Error = BatchError;

    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        let kind = match raw.rule_type.as_str() {
            "serial" => RuleKind::Serial {
                start_value: raw.start_value.unwrap_or(DEFAULT_START_VALUE),
            },
            "random" => RuleKind::Random {
                min: raw.random_min.unwrap_or(DEFAULT_RANDOM_MIN),
                max: raw.random_max.unwrap_or(DEFAULT_RANDOM_MAX),
            },
            "custom" => RuleKind::Custom {
                text: raw.custom_text.ok_or_else(|| {
                    BatchError::invalid_input("custom_text", "custom rules require custom_text")
                })?,
            },
            other => {
                return Err(BatchError::InvalidRuleType {
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            section_id: raw.section_id,
            original_text: raw.original_text,
            kind,
            prefix: raw.prefix.unwrap_or_default(),
            suffix: raw.suffix.unwrap_or_default(),
            format: raw
                .format
                .filter(|f| !f.is_empty())
                .map(NumberFormat::new),
        })
    }
}

impl From<ReplacementRule> for RawRule {
    fn from(rule: ReplacementRule) -> Self {
        let mut raw = RawRule {
            rule_type: rule.kind.type_name().to_string(),
            section_id: rule.section_id,
            original_text: rule.original_text,
            prefix: Some(rule.prefix),
            suffix: Some(rule.suffix),
            format: rule.format.map(|f| f.as_str().to_string()),
            ..Default::default()
        };
        match rule.kind {
            RuleKind::Serial { start_value } => raw.start_value = Some(start_value),
            RuleKind::Random { min, max } => {
                raw.random_min = Some(min);
                raw.random_max = Some(max);
            }
            RuleKind::Custom { text } => raw.custom_text = Some(text),
        }
        raw
    }
}

/// Parses a JSON array of wire-format rules.
///
/// Unlike plain `serde_json::from_str`, conversion failures keep their
/// [`BatchError`] variant (e.g. [`BatchError::InvalidRuleType`]).
pub fn parse_rules(json: &str) -> BatchResult<Vec<ReplacementRule>> {
    let raw: Vec<RawRule> =
        serde_json::from_str(json).map_err(|source| BatchError::Serialization {
            context: "rules".to_string(),
            source,
        })?;
    raw.into_iter().map(ReplacementRule::try_from).collect()
}
