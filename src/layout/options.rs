//! Layout options and glyph metrics.

use crate::model::TextStyle;
use unicode_width::UnicodeWidthChar;

/// Options controlling text measurement and line spacing.
///
/// Glyph widths are approximated from the font size using each character's
/// Unicode display width: zero-width characters (combining marks) take no
/// space, narrow ones (Latin, digits, punctuation) and wide ones (CJK,
/// full-width forms, emoji) each take a fixed fraction of the em size.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    /// Advance of a narrow glyph as a fraction of the font size
    pub narrow_glyph_ratio: f32,

    /// Advance of a wide glyph as a fraction of the font size
    pub wide_glyph_ratio: f32,

    /// Multiplier applied to every line height (1.0 = device spacing)
    pub line_spacing: f32,

    /// Minimum line height as a multiple of the font size
    pub min_line_factor: f32,
}

impl LayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the narrow glyph ratio.
    pub fn with_narrow_glyph_ratio(mut self, ratio: f32) -> Self {
        self.narrow_glyph_ratio = ratio;
        self
    }

    /// Set the wide glyph ratio.
    pub fn with_wide_glyph_ratio(mut self, ratio: f32) -> Self {
        self.wide_glyph_ratio = ratio;
        self
    }

    /// Set the line spacing multiplier.
    pub fn with_line_spacing(mut self, spacing: f32) -> Self {
        self.line_spacing = spacing;
        self
    }

    /// Approximate rendered width of `text` at `size`.
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        text.chars().map(|c| self.glyph_ratio(c)).sum::<f32>() * size
    }

    /// Advance of one character as a fraction of the font size.
    fn glyph_ratio(&self, c: char) -> f32 {
        // Control characters have no display width; tabs still advance.
        match c.width() {
            Some(0) => 0.0,
            Some(1) | None => self.narrow_glyph_ratio,
            Some(_) => self.wide_glyph_ratio,
        }
    }

    /// Line advance for a run style.
    pub fn line_height(&self, style: &TextStyle) -> f32 {
        style
            .paragraph
            .line_height()
            .max(style.size * self.min_line_factor)
            * self.line_spacing
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            narrow_glyph_ratio: 0.55,
            wide_glyph_ratio: 1.0,
            line_spacing: 1.0,
            min_line_factor: 1.2,
        }
    }
}
