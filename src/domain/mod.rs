//! Domain models for sections, replacement rules and number formats.
//!
//! These types are shared by the rule engine, the wizard reducers and the
//! backend client. They carry no behavior beyond validation and wire
//! conversion.

pub mod format;
pub mod rule;
pub mod section;

pub use format::{textualize, FormatError, NumberFormat};
pub use rule::{
    parse_rules, RawRule, ReplacementRule, RuleKind, DEFAULT_RANDOM_MAX, DEFAULT_RANDOM_MIN,
    DEFAULT_START_VALUE,
};
pub use section::{find_section, TextSection};
