//! Rendering module: stroke rendering, the shared page painter and the
//! format emitters.
//!
//! Every emitter takes a [`Document`] by reference and never mutates it.
//! Emitters are selected through the closed [`OutputFormat`] enum so that
//! adding a format is a compile-time change to [`render`].

mod canvas;
mod diagnostics;
mod inkml;
mod json;
mod options;
mod pdf;
mod pen;
mod result;
mod stroke;
mod svg;
mod text;
mod tldraw;

pub use canvas::{paint_page, Canvas, CanvasItem, CanvasLayer, Shape, TextLine, TextSpan};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Location};
pub use inkml::{document_id, to_inkml};
pub use json::{to_json, to_json_string, JsonFormat};
pub use options::{PageSelection, RenderOptions, DEFAULT_SCALE};
pub use pdf::to_pdf;
pub use pen::{LineCap, PenProfile};
pub use result::{ConversionStats, Manifest, Output, RenderResult};
pub use stroke::{
    render_stroke, RenderedDot, RenderedPath, RenderedStroke, Segment, SegmentShape, Vec2,
};
pub use svg::{render_page, to_svg};
pub use text::{plain_text, to_text};
pub use tldraw::to_tldraw;

use crate::error::{Error, Result};
use crate::layout::layout_text_block;
use crate::model::{Document, Element, Page};
use std::fmt;
use std::str::FromStr;

/// Output format of a conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// One SVG document per page
    #[default]
    Svg,

    /// A single paginated PDF
    Pdf,

    /// Plain text of all text blocks
    Text,

    /// InkML stroke markup plus an optional text companion
    InkMl,

    /// Scene Model dump
    Json,

    /// tldraw whiteboard file
    Tldraw,
}

impl OutputFormat {
    /// All formats, in declaration order.
    pub const ALL: [OutputFormat; 6] = [
        OutputFormat::Svg,
        OutputFormat::Pdf,
        OutputFormat::Text,
        OutputFormat::InkMl,
        OutputFormat::Json,
        OutputFormat::Tldraw,
    ];

    /// File extension of the primary output.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Text => "txt",
            OutputFormat::InkMl => "inkml",
            OutputFormat::Json => "json",
            OutputFormat::Tldraw => "tldr",
        }
    }

    /// MIME type of the primary output.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Svg => "image/svg+xml",
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Text => "text/plain",
            OutputFormat::InkMl => "application/inkml+xml",
            OutputFormat::Json | OutputFormat::Tldraw => "application/json",
        }
    }

    /// Whether the format draws ink.
    pub fn is_visual(self) -> bool {
        matches!(self, OutputFormat::Svg | OutputFormat::Pdf)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "pdf" => Ok(OutputFormat::Pdf),
            "txt" | "text" => Ok(OutputFormat::Text),
            "inkml" => Ok(OutputFormat::InkMl),
            "json" => Ok(OutputFormat::Json),
            "tldr" | "tldraw" => Ok(OutputFormat::Tldraw),
            other => Err(Error::Other(format!("Unknown output format: {}", other))),
        }
    }
}

/// Render a document to the given format.
pub fn render(doc: &Document, format: OutputFormat, options: &RenderOptions) -> Result<RenderResult> {
    let mut result = match format {
        OutputFormat::Svg => to_svg(doc, options)?,
        OutputFormat::Pdf => to_pdf(doc, options)?,
        OutputFormat::Text => to_text(doc, options)?,
        OutputFormat::InkMl => to_inkml(doc, options)?,
        OutputFormat::Json => to_json(doc, options)?,
        OutputFormat::Tldraw => to_tldraw(doc, options)?,
    };
    if options.collect_stats {
        result.stats = collect_stats(doc, options)?;
    }
    log::debug!(
        "Rendered {} as {}: {} outputs, {} diagnostics",
        options.file_stem,
        format,
        result.outputs.len(),
        result.diagnostics.len()
    );
    Ok(result)
}

/// Compute statistics over the selected pages.
pub fn collect_stats(doc: &Document, options: &RenderOptions) -> Result<ConversionStats> {
    let mut stats = ConversionStats::new();
    for page in selected_pages(doc, options)? {
        stats.page_count += 1;
        stats.layer_count += page.layers.len() as u32;
        for element in page.elements() {
            match element {
                Element::Stroke(stroke) => {
                    stats.stroke_count += 1;
                    stats.point_count += stroke.points.len() as u32;
                }
                Element::TextBlock(block) => {
                    let layout = layout_text_block(block, &options.layout);
                    stats.text_block_count += 1;
                    stats.line_count += layout.len() as u32;
                    stats.count_text(&block.source_text());
                }
                Element::Unknown(_) => stats.skipped_count += 1,
            }
        }
    }
    Ok(stats)
}

/// Pages selected by the options, in document order.
pub(crate) fn selected_pages<'a>(
    doc: &'a Document,
    options: &RenderOptions,
) -> Result<Vec<&'a Page>> {
    if doc.is_empty() {
        return Err(Error::EmptyDocument);
    }
    let count = doc.page_count();
    if let Some(max) = options.page_selection.max_page() {
        if max > count {
            return Err(Error::PageOutOfRange(max, count));
        }
    }
    Ok(doc
        .pages
        .iter()
        .filter(|page| options.page_selection.includes(page.number))
        .collect())
}
