//! Reverse builder: plain text to a text-only Scene Model document.
//!
//! The resulting document has one page with one layer. Each paragraph
//! (text separated by a blank line) becomes one text block whose runs are
//! split at the source line breaks. Blocks are stacked down the page by
//! their laid-out height, never less than the fixed line height per line;
//! paragraphs that do not fit on the page are dropped and reported as a
//! [`DiagnosticKind::LayoutOverflow`].
//!
//! # Example
//!
//! ```
//! use rmink::reverse::ReverseBuilder;
//!
//! let output = ReverseBuilder::new().build("Hello\nWorld\n\nSecond paragraph").unwrap();
//! assert_eq!(output.document.page_count(), 1);
//! assert!(output.diagnostics.is_empty());
//! ```

mod options;

pub use options::ReverseOptions;

use crate::error::{Error, Result};
use crate::layout::layout_text_block;
use crate::model::{Document, Layer, Page, ParagraphKind, TextBlock, TextRun, TextStyle};
use crate::render::{DiagnosticKind, Diagnostics, Location};
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Label of the single layer the reverse builder produces.
pub const TEXT_LAYER: &str = "Layer 1";

/// Output of the reverse builder.
#[derive(Debug, Clone)]
pub struct ReverseOutput {
    /// The synthesized document
    pub document: Document,

    /// Overflow warnings
    pub diagnostics: Diagnostics,
}

/// Builds a document from plain text.
#[derive(Debug, Clone, Default)]
pub struct ReverseBuilder {
    options: ReverseOptions,
}

impl ReverseBuilder {
    /// Create a builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with custom options.
    pub fn with_options(options: ReverseOptions) -> Self {
        Self { options }
    }

    /// Get the options.
    pub fn options(&self) -> &ReverseOptions {
        &self.options
    }

    /// Build a one-page document from `text`.
    pub fn build(&self, text: &str) -> Result<ReverseOutput> {
        let options = &self.options;
        self.validate()?;

        let markup = if options.detect_markup {
            Some(MarkupRules::new()?)
        } else {
            None
        };

        let normalized = normalize_text(text);
        let paragraphs: Vec<&str> = if normalized.is_empty() {
            Vec::new()
        } else {
            normalized.split("\n\n").collect()
        };

        let mut layer = Layer::new(TEXT_LAYER);
        let mut diagnostics = Diagnostics::new();
        let mut y = options.margin_top;

        for (index, paragraph) in paragraphs.iter().enumerate() {
            let mut block = self.paragraph_block(paragraph, y, markup.as_ref());
            let layout = layout_text_block(&block, &options.layout);
            let height = (layout.len() as f32 * options.line_height).max(layout.height());

            if y + height > options.bottom() {
                let dropped = paragraphs.len() - index;
                diagnostics.push(
                    DiagnosticKind::LayoutOverflow,
                    Location::page(1),
                    format!(
                        "text exceeds one page; {} of {} paragraphs dropped",
                        dropped,
                        paragraphs.len()
                    ),
                );
                break;
            }

            block.y = y;
            layer.add_text_block(block);
            y += height + options.line_height;
        }

        log::debug!(
            "Built text document with {} of {} paragraphs",
            layer.elements.len(),
            paragraphs.len()
        );

        let mut page = Page::new(1, options.page_width, options.page_height);
        page.add_layer(layer);
        let mut document = Document::new();
        document.add_page(page);

        Ok(ReverseOutput {
            document,
            diagnostics,
        })
    }

    fn validate(&self) -> Result<()> {
        let o = &self.options;
        let values = [o.page_width, o.page_height, o.line_height, o.font_size];
        if values.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(Error::malformed(
                "page size, line height and font size must be positive",
            ));
        }
        if o.text_width() <= 0.0 || o.bottom() <= o.margin_top {
            return Err(Error::malformed("margins leave no room for text"));
        }
        Ok(())
    }

    fn paragraph_block(&self, paragraph: &str, y: f32, markup: Option<&MarkupRules>) -> TextBlock {
        let options = &self.options;
        let mut block = TextBlock::new(options.margin_x, y, options.text_width());
        let lines: Vec<&str> = paragraph.split('\n').collect();

        for (i, line) in lines.iter().enumerate() {
            let (kind, text) = match markup {
                Some(rules) => rules.classify(line),
                None => (ParagraphKind::Plain, *line),
            };
            let mut style = TextStyle::for_paragraph(kind);
            if kind != ParagraphKind::Heading {
                style.size = options.font_size;
            }
            let mut run = TextRun::new(text).with_style(style);
            if i + 1 < lines.len() {
                run = run.with_break();
            }
            block.add_run(run);
        }
        block
    }
}

/// Light markup recognized when detection is enabled.
struct MarkupRules {
    heading: Regex,
    bullet: Regex,
    checkbox: Regex,
}

impl MarkupRules {
    fn new() -> Result<Self> {
        Ok(Self {
            heading: compile(r"^#{1,6}\s+(.*)$")?,
            bullet: compile(r"^(\s*)[-*\u{2022}]\s+(.*)$")?,
            checkbox: compile(r"^\[([ xX])\]\s+(.*)$")?,
        })
    }

    fn classify<'t>(&self, line: &'t str) -> (ParagraphKind, &'t str) {
        if let Some(body) = self.heading.captures(line).and_then(|c| c.get(1)) {
            return (ParagraphKind::Heading, body.as_str());
        }
        if let Some(caps) = self.checkbox.captures(line) {
            let kind = match caps.get(1).map(|m| m.as_str()) {
                Some(" ") => ParagraphKind::Checkbox,
                _ => ParagraphKind::CheckboxChecked,
            };
            if let Some(body) = caps.get(2) {
                return (kind, body.as_str());
            }
        }
        if let Some(caps) = self.bullet.captures(line) {
            let indented = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
            let kind = if indented {
                ParagraphKind::Bullet2
            } else {
                ParagraphKind::Bullet
            };
            if let Some(body) = caps.get(2) {
                return (kind, body.as_str());
            }
        }
        (ParagraphKind::Plain, line)
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::Other(format!("Invalid markup pattern: {}", e)))
}

/// Normalize text the way a reverse-then-extract round trip does.
///
/// Applies NFC, converts CRLF and CR to LF, strips trailing whitespace from
/// every line, collapses runs of blank lines into one and removes leading
/// and trailing blank lines.
pub fn normalize_text(text: &str) -> String {
    let text: String = text.nfc().collect();
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.split('\n').map(str::trim_end) {
        if line.is_empty() {
            blank_run += 1;
            continue;
        }
        if !out.is_empty() {
            out.push_str(if blank_run > 0 { "\n\n" } else { "\n" });
        }
        blank_run = 0;
        out.push_str(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Element;
    use crate::render::{plain_text, RenderOptions};

    fn blocks(doc: &Document) -> Vec<&TextBlock> {
        doc.pages[0]
            .elements()
            .filter_map(|e| match e {
                Element::TextBlock(block) => Some(block),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("a  \r\nb\r\rc"), "a\nb\n\nc");
        assert_eq!(normalize_text("\n\n  \nx\n\n\n\ny\n\n"), "x\n\ny");
        assert_eq!(normalize_text("  indented"), "  indented");
        assert_eq!(normalize_text("e\u{301}"), "\u{e9}");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_paragraphs_become_blocks() {
        let output = ReverseBuilder::new()
            .build("Hello\nWorld\n\nSecond")
            .unwrap();
        let doc = &output.document;
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.pages[0].layers.len(), 1);

        let blocks = blocks(doc);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].runs.len(), 2);
        assert!(blocks[0].runs[0].line_break);
        assert!(!blocks[0].runs[1].line_break);
        assert!(blocks[1].y > blocks[0].y);
        assert!(doc.pages[0].elements().all(|e| !e.is_stroke()));
    }

    #[test]
    fn test_blocks_advance_by_fixed_line_height() {
        let options = ReverseOptions::new().with_line_height(100.0);
        let output = ReverseBuilder::with_options(options).build("a\nb\n\nc").unwrap();
        let blocks = blocks(&output.document);
        assert_eq!(blocks[0].y, 120.0);
        assert_eq!(blocks[1].y, 120.0 + 2.0 * 100.0 + 100.0);
    }

    #[test]
    fn test_short_line_height_never_overlaps_laid_out_lines() {
        let options = ReverseOptions::new().with_line_height(50.0);
        let output = ReverseBuilder::with_options(options).build("a\nb\n\nc").unwrap();
        let blocks = blocks(&output.document);
        assert_eq!(blocks[1].y, 120.0 + 2.0 * 71.0 + 50.0);
    }

    #[test]
    fn test_headings_advance_by_their_own_height() {
        let options = ReverseOptions::new().with_markup(true);
        let output = ReverseBuilder::with_options(options.clone())
            .build("# A\n# B\n# C\n\nnext")
            .unwrap();
        let blocks = blocks(&output.document);
        let first = layout_text_block(blocks[0], &options.layout);
        assert_eq!(first.height(), 3.0 * 150.0);
        assert_eq!(blocks[1].y, blocks[0].y + first.height() + options.line_height);
    }

    #[test]
    fn test_tall_headings_overflow_the_page() {
        // Fifteen heading lines fit at the plain line height but not at
        // the heading line height.
        let text = vec!["# Heading"; 15].join("\n");
        let options = ReverseOptions::new().with_markup(true);
        let output = ReverseBuilder::with_options(options).build(&text).unwrap();
        assert!(blocks(&output.document).is_empty());
        let overflow: Vec<_> = output
            .diagnostics
            .of_kind(DiagnosticKind::LayoutOverflow)
            .collect();
        assert_eq!(overflow.len(), 1);
        assert!(overflow[0].message.contains("1 of 1 paragraphs dropped"));
    }

    #[test]
    fn test_left_inverse_of_plain_text() {
        let text = "First line\nsecond line\r\n\r\n\r\nAnother paragraph with trailing space   \n";
        let output = ReverseBuilder::new().build(text).unwrap();
        let extracted = plain_text(&output.document, &RenderOptions::default()).unwrap();
        assert_eq!(extracted, normalize_text(text));
    }

    #[test]
    fn test_long_lines_round_trip_through_soft_wraps() {
        let text = "word ".repeat(80);
        let output = ReverseBuilder::new().build(&text).unwrap();
        let extracted = plain_text(&output.document, &RenderOptions::default()).unwrap();
        assert_eq!(extracted, normalize_text(&text));
    }

    #[test]
    fn test_overflow_drops_paragraphs_with_diagnostic() {
        let text = vec!["paragraph"; 30].join("\n\n");
        let output = ReverseBuilder::new().build(&text).unwrap();
        let kept = blocks(&output.document).len();
        assert!(kept > 0 && kept < 30);

        let overflow: Vec<_> = output
            .diagnostics
            .of_kind(DiagnosticKind::LayoutOverflow)
            .collect();
        assert_eq!(overflow.len(), 1);
        assert!(overflow[0]
            .message
            .contains(&format!("{} of 30 paragraphs dropped", 30 - kept)));
    }

    #[test]
    fn test_empty_text_gives_empty_page() {
        let output = ReverseBuilder::new().build(" \n\n ").unwrap();
        assert_eq!(output.document.page_count(), 1);
        assert!(blocks(&output.document).is_empty());
    }

    #[test]
    fn test_markup_detection() {
        let options = ReverseOptions::new().with_markup(true);
        let output = ReverseBuilder::with_options(options)
            .build("# Title\n- item\n  * nested\n[ ] todo\n[x] done\nplain")
            .unwrap();
        let blocks = blocks(&output.document);
        let kinds: Vec<_> = blocks[0].runs.iter().map(|r| r.style.paragraph).collect();
        assert_eq!(
            kinds,
            vec![
                ParagraphKind::Heading,
                ParagraphKind::Bullet,
                ParagraphKind::Bullet2,
                ParagraphKind::Checkbox,
                ParagraphKind::CheckboxChecked,
                ParagraphKind::Plain,
            ]
        );
        assert_eq!(blocks[0].runs[0].text, "Title");
        assert_eq!(blocks[0].runs[2].text, "nested");
    }

    #[test]
    fn test_invalid_options() {
        let options = ReverseOptions::new().with_margin(800.0);
        assert!(matches!(
            ReverseBuilder::with_options(options).build("x"),
            Err(Error::MalformedInput(_))
        ));
    }
}
