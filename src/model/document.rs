//! Document-level types.

use super::{Element, Page};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An ink document: an ordered sequence of pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata (title, identifier, timestamps)
    pub metadata: Metadata,

    /// Pages in render order
    pub pages: Vec<Page>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            metadata: Metadata::default(),
            pages: Vec::new(),
        }
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Count elements by variant across every page and layer.
    ///
    /// Hidden layers are included: the counts describe the document, not a
    /// particular rendering of it.
    pub fn element_counts(&self) -> ElementCounts {
        let mut counts = ElementCounts::default();
        for element in self
            .pages
            .iter()
            .flat_map(|p| p.layers.iter())
            .flat_map(|l| l.elements.iter())
        {
            match element {
                Element::Stroke(_) => counts.strokes += 1,
                Element::TextBlock(_) => counts.text_blocks += 1,
                Element::Unknown(_) => counts.unknown += 1,
            }
        }
        counts
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-variant element totals of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementCounts {
    /// Number of strokes (including eraser strokes)
    pub strokes: u32,

    /// Number of text blocks
    pub text_blocks: u32,

    /// Number of preserved unrecognized elements
    pub unknown: u32,
}

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Stable document identifier assigned by the device
    pub id: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,

    /// Scene format version reported by the decoder (e.g., "6")
    pub source_version: Option<String>,
}

impl Metadata {
    /// Create metadata with a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Color, Layer, PenKind, Stroke, TextBlock};

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.page_count(), 0);
        assert!(doc.get_page(0).is_none());
        assert!(doc.get_page(1).is_none());
    }

    #[test]
    fn test_element_counts_include_hidden_layers() {
        let mut page = Page::remarkable(1);
        let mut visible = Layer::new("Layer 1");
        visible.add_stroke(Stroke::new(PenKind::Ballpoint, Color::BLACK, 2.0));
        visible.add_text_block(TextBlock::new(10.0, 10.0, 300.0));
        let mut hidden = Layer::new("Layer 2").hidden();
        hidden.add_stroke(Stroke::new(PenKind::Fineliner, Color::BLUE, 2.0));
        page.add_layer(visible);
        page.add_layer(hidden);

        let mut doc = Document::new();
        doc.add_page(page);

        let counts = doc.element_counts();
        assert_eq!(counts.strokes, 2);
        assert_eq!(counts.text_blocks, 1);
        assert_eq!(counts.unknown, 0);
    }

    #[test]
    fn test_metadata_with_title() {
        let metadata = Metadata::with_title("Notes");
        assert_eq!(metadata.title.as_deref(), Some("Notes"));
        assert!(metadata.id.is_none());
    }
}
