//! Rule evaluation engine.
//!
//! Maps a [`ReplacementRule`] and a copy index to the replacement text for
//! that copy, and renders stable previews for display before generation.
//! The engine owns its random source, so evaluation of random rules takes
//! `&mut self` while previews never draw.

pub mod plan;
pub mod source;

pub use plan::{BatchPlan, CopyPlan, Replacement, MAX_COPIES};
pub use source::draw_inclusive;

use crate::domain::{textualize, ReplacementRule, RuleKind};
use crate::error::{BatchError, BatchResult};
use rand_core::{OsRng, RngCore};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Evaluates replacement rules against a random source.
///
/// # Examples
///
/// ```
/// use pdf_batch::{ReplacementRule, RuleEngine, RuleKind};
///
/// let rule = ReplacementRule::new("section_0", "INV-0001")
///     .with_kind(RuleKind::Serial { start_value: 100 })
///     .with_prefix("INV-")
///     .with_suffix("-2024")
///     .with_format("%04d");
///
/// let mut engine = RuleEngine::new();
/// assert_eq!(engine.evaluate(&rule, 0).unwrap(), "INV-0100-2024");
/// assert_eq!(engine.evaluate(&rule, 1).unwrap(), "INV-0101-2024");
/// ```
#[derive(Debug, Clone)]
pub struct RuleEngine<R = OsRng> {
    rng: R,
}

impl RuleEngine<OsRng> {
    /// Creates an engine drawing from the operating system's generator.
    pub fn new() -> Self {
        Self { rng: OsRng }
    }
}

impl Default for RuleEngine<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> RuleEngine<R> {
    /// Creates an engine drawing from `rng`. Pass a seeded generator for
    /// repeatable random rules.
    pub fn with_source(rng: R) -> Self {
        Self { rng }
    }

    /// Produces the replacement text for copy `copy_index`.
    ///
    /// Serial rules yield `start_value + copy_index`; random rules draw
    /// uniformly from their bounds on every call; custom rules yield their
    /// literal text. Prefix and suffix wrap the result.
    pub fn evaluate(&mut self, rule: &ReplacementRule, copy_index: u32) -> BatchResult<String> {
        rule.validate()?;
        let body = match &rule.kind {
            RuleKind::Serial { start_value } => {
                textualize(serial_value(*start_value, copy_index)?, rule.format.as_ref())
            }
            RuleKind::Random { min, max } => {
                let value = draw_inclusive(&mut self.rng, *min, *max)?;
                textualize(value, rule.format.as_ref())
            }
            RuleKind::Custom { text } => text.clone(),
        };
        Ok(compose(rule, &body))
    }

    /// Renders the preview of `rule`. See [`preview`].
    pub fn preview(&self, rule: &ReplacementRule) -> BatchResult<String> {
        preview(rule)
    }

    /// Evaluates every rule for every copy in `0..num_copies`.
    ///
    /// All rules are validated before any value is produced, so a failure
    /// never yields a partial plan.
    pub fn plan(&mut self, rules: &[ReplacementRule], num_copies: u32) -> BatchResult<BatchPlan> {
        check_num_copies(num_copies)?;

        let mut seen = HashSet::new();
        for rule in rules {
            rule.validate()?;
            if !seen.insert(rule.section_id.as_str()) {
                return Err(BatchError::invalid_input(
                    "rules",
                    format!("more than one rule for section '{}'", rule.section_id),
                ));
            }
            if let Some(err) = rule.format.as_ref().and_then(|f| f.error()) {
                warn!(
                    section = %rule.section_id,
                    format = rule.format.as_ref().map(|f| f.as_str()).unwrap_or_default(),
                    "format template unusable ({}), using plain numbers",
                    err
                );
            }
        }

        let mut copies = Vec::with_capacity(num_copies as usize);
        for index in 0..num_copies {
            let replacements = rules
                .iter()
                .map(|rule| {
                    Ok(Replacement {
                        section_id: rule.section_id.clone(),
                        original_text: rule.original_text.clone(),
                        text: self.evaluate(rule, index)?,
                    })
                })
                .collect::<BatchResult<Vec<_>>>()?;
            copies.push(CopyPlan {
                index,
                replacements,
            });
        }

        debug!(copies = num_copies, rules = rules.len(), "batch plan computed");
        Ok(BatchPlan { copies })
    }
}

/// Renders a stable, non-random representation of a rule's output.
///
/// Serial rules show copy 0, random rules show their lower bound and
/// custom rules show their literal text. Calling this repeatedly with the
/// same rule always returns the same string.
pub fn preview(rule: &ReplacementRule) -> BatchResult<String> {
    rule.validate()?;
    let body = match &rule.kind {
        RuleKind::Serial { start_value } => {
            textualize(serial_value(*start_value, 0)?, rule.format.as_ref())
        }
        RuleKind::Random { min, .. } => textualize(*min, rule.format.as_ref()),
        RuleKind::Custom { text } => text.clone(),
    };
    Ok(compose(rule, &body))
}

/// Rejects batch sizes outside `1..=MAX_COPIES`.
pub fn check_num_copies(num_copies: u32) -> BatchResult<()> {
    if num_copies == 0 || num_copies > MAX_COPIES {
        return Err(BatchError::invalid_input(
            "num_copies",
            format!("must be between 1 and {}, got {}", MAX_COPIES, num_copies),
        ));
    }
    Ok(())
}

fn serial_value(start_value: i64, copy_index: u32) -> BatchResult<i64> {
    start_value
        .checked_add(i64::from(copy_index))
        .ok_or_else(|| {
            BatchError::invalid_input(
                "start_value",
                format!("{} + {} overflows", start_value, copy_index),
            )
        })
}

fn compose(rule: &ReplacementRule, body: &str) -> String {
    format!("{}{}{}", rule.prefix, body, rule.suffix)
}
