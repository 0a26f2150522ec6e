//! Test fixtures for sections, rules and random sources.

use pdf_batch::{ReplacementRule, RuleKind, TextSection, WizardState};
use rand_core::{impls, RngCore};

/// Sections shaped like the backend's OCR output.
pub fn sample_sections() -> Vec<TextSection> {
    vec![
        TextSection::new("section_0", "INV-0001")
            .with_bounds(72.0, 90.0, 110.0, 14.0)
            .on_page(0),
        TextSection::new("section_1", "ACME Corporation")
            .with_bounds(72.0, 120.0, 160.0, 14.0)
            .on_page(0),
        TextSection::new("section_2", "Ticket 042")
            .with_bounds(300.0, 700.0, 90.0, 12.0)
            .on_page(1),
    ]
}

/// A wizard state with an uploaded document and detected sections.
pub fn detected_state() -> WizardState {
    WizardState::new()
        .pdf_uploaded("3f2a9c")
        .sections_detected(sample_sections())
}

pub fn serial_rule(section_id: &str, start_value: i64) -> ReplacementRule {
    ReplacementRule::new(section_id, "original").with_kind(RuleKind::Serial { start_value })
}

pub fn random_rule(section_id: &str, min: i64, max: i64) -> ReplacementRule {
    ReplacementRule::new(section_id, "original").with_kind(RuleKind::Random { min, max })
}

pub fn custom_rule(section_id: &str, text: &str) -> ReplacementRule {
    ReplacementRule::new(section_id, "original").with_kind(RuleKind::Custom {
        text: text.to_string(),
    })
}

/// Random source returning scripted values in order, cycling at the end.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    values: Vec<u64>,
    position: usize,
}

impl ScriptedRng {
    pub fn new(values: Vec<u64>) -> Self {
        assert!(!values.is_empty(), "ScriptedRng needs at least one value");
        Self {
            values,
            position: 0,
        }
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        let v = self.values[self.position % self.values.len()];
        self.position += 1;
        v
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Small seedable generator (SplitMix64) for repeatable test draws.
#[derive(Debug, Clone)]
pub struct SeededRng(u64);

impl SeededRng {
    pub fn seed(seed: u64) -> Self {
        Self(seed)
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
