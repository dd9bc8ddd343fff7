//! Rendering result with outputs, diagnostics and statistics.

use super::diagnostics::Diagnostics;
use crate::model::ElementCounts;
use serde::Serialize;

/// Result of rendering a document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderResult {
    /// Emitted outputs, in emission order
    pub outputs: Vec<Output>,

    /// Non-fatal conditions met while emitting
    pub diagnostics: Diagnostics,

    /// Conversion statistics (zero unless collection was enabled)
    pub stats: ConversionStats,
}

impl RenderResult {
    /// Create a result with outputs and diagnostics.
    pub fn new(outputs: Vec<Output>, diagnostics: Diagnostics) -> Self {
        Self {
            outputs,
            diagnostics,
            stats: ConversionStats::default(),
        }
    }

    /// The first output.
    pub fn primary(&self) -> Option<&Output> {
        self.outputs.first()
    }

    /// Find an output by name.
    pub fn output(&self, name: &str) -> Option<&Output> {
        self.outputs.iter().find(|o| o.name == name)
    }

    /// The first output as UTF-8 text, if it is text.
    pub fn text(&self) -> Option<&str> {
        self.primary().and_then(|o| o.as_str())
    }

    /// Check if no diagnostics were raised.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Total size of all outputs in bytes.
    pub fn total_bytes(&self) -> usize {
        self.outputs.iter().map(|o| o.bytes.len()).sum()
    }
}

/// One emitted artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Output {
    /// Suggested file name
    pub name: String,

    /// MIME type
    pub mime_type: &'static str,

    /// Content
    #[serde(skip)]
    pub bytes: Vec<u8>,

    /// Shared description for outputs that belong together
    pub manifest: Option<Manifest>,
}

impl Output {
    /// Create an output.
    pub fn new(name: impl Into<String>, mime_type: &'static str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type,
            bytes,
            manifest: None,
        }
    }

    /// Attach a manifest.
    pub fn with_manifest(mut self, manifest: Manifest) -> Self {
        self.manifest = Some(manifest);
        self
    }

    /// Content as UTF-8 text.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    /// Get the content length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Identity and element counts of the document a set of outputs came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    /// Document identifier
    pub document_id: String,

    /// Element counts over the rendered pages
    pub counts: ElementCounts,
}

/// Statistics collected during conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    /// Pages rendered
    pub page_count: u32,

    /// Layers visited (including hidden ones)
    pub layer_count: u32,

    /// Strokes visited
    pub stroke_count: u32,

    /// Point samples across all strokes
    pub point_count: u32,

    /// Text blocks visited
    pub text_block_count: u32,

    /// Laid-out text lines
    pub line_count: u32,

    /// Unknown elements skipped by visual output
    pub skipped_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl ConversionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ConversionStats) {
        self.page_count += other.page_count;
        self.layer_count += other.layer_count;
        self.stroke_count += other.stroke_count;
        self.point_count += other.point_count;
        self.text_block_count += other.text_block_count;
        self.line_count += other.line_count;
        self.skipped_count += other.skipped_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}
