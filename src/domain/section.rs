//! Text regions reported by the OCR backend.

use serde::{Deserialize, Serialize};

/// A detected region of text on a page.
///
/// Sections are produced by the backend and never modified locally.
/// Coordinates are in the page image's pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSection {
    pub id: String,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Zero-based page index
    pub page: u32,
}

impl TextSection {
    /// Creates a section at the page origin with zero size.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            page: 0,
        }
    }

    /// Sets the region geometry.
    pub fn with_bounds(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the zero-based page index.
    pub fn on_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}

/// Finds a section by id.
pub fn find_section<'a>(sections: &'a [TextSection], id: &str) -> Option<&'a TextSection> {
    sections.iter().find(|s| s.id == id)
}
