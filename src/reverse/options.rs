//! Reverse builder options.

use crate::layout::LayoutOptions;
use crate::model::{ParagraphKind, DEVICE_HEIGHT, DEVICE_WIDTH};

/// Options for building a document from plain text.
#[derive(Debug, Clone, PartialEq)]
pub struct ReverseOptions {
    /// Page width in device units
    pub page_width: f32,

    /// Page height in device units
    pub page_height: f32,

    /// Left and right margin
    pub margin_x: f32,

    /// Top margin; the first text block starts here
    pub margin_top: f32,

    /// Bottom margin; blocks ending below it overflow
    pub margin_bottom: f32,

    /// Minimum advance per laid-out line, and the gap between paragraphs
    pub line_height: f32,

    /// Font size of generated runs
    pub font_size: f32,

    /// Recognize `#` headings, `-`/`*` bullets and `[ ]`/`[x]` checkboxes
    pub detect_markup: bool,

    /// Layout options used to count wrapped lines
    pub layout: LayoutOptions,
}

impl ReverseOptions {
    /// Create new reverse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_page_size(mut self, width: f32, height: f32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    /// Set all margins to the same value.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin_x = margin;
        self.margin_top = margin;
        self.margin_bottom = margin;
        self
    }

    /// Set the fixed line height.
    pub fn with_line_height(mut self, height: f32) -> Self {
        self.line_height = height;
        self
    }

    /// Set the font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Enable or disable light markup detection.
    pub fn with_markup(mut self, detect: bool) -> Self {
        self.detect_markup = detect;
        self
    }

    /// Set the layout options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// Width available to text blocks.
    pub fn text_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin_x
    }

    /// Lowest y a block may reach.
    pub fn bottom(&self) -> f32 {
        self.page_height - self.margin_bottom
    }
}

impl Default for ReverseOptions {
    fn default() -> Self {
        Self {
            page_width: DEVICE_WIDTH,
            page_height: DEVICE_HEIGHT,
            margin_x: 120.0,
            margin_top: 120.0,
            margin_bottom: 120.0,
            line_height: ParagraphKind::Plain.line_height(),
            font_size: ParagraphKind::Plain.default_size(),
            detect_markup: false,
            layout: LayoutOptions::default(),
        }
    }
}
