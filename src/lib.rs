//! # rmink
//!
//! Digital-ink document conversion library for Rust.
//!
//! This library takes pages of pen strokes and text boxes, as decoded from
//! a tablet notebook snapshot, and converts them to SVG, PDF, plain text,
//! InkML, JSON or a tldraw whiteboard file. It can also go the other way
//! and turn plain text into a text-only document ready to be serialized
//! back to the device.
//!
//! ## Quick Start
//!
//! ```
//! use rmink::scene::{DecodedItem, DecodedLayer, DecodedLine, DecodedNotebook, DecodedPage, DecodedPoint};
//! use rmink::{build_document, render, OutputFormat, RenderOptions};
//!
//! fn main() -> rmink::Result<()> {
//!     let line = DecodedLine::new(15, 0, 2.0).with_points(vec![
//!         DecodedPoint::new(-100.0, 200.0, 128.0),
//!         DecodedPoint::new(100.0, 200.0, 255.0),
//!     ]);
//!     let layer = DecodedLayer::new("Layer 1").with_item(DecodedItem::Line(line));
//!     let notebook = DecodedNotebook::new(vec![DecodedPage::new().with_layer(layer)]);
//!
//!     // Build the Scene Model
//!     let doc = build_document(&notebook)?;
//!
//!     // Convert to SVG
//!     let result = render::render(&doc, OutputFormat::Svg, &RenderOptions::default())?;
//!     assert!(result.text().unwrap().contains("<path"));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Multiple output formats**: SVG, PDF, plain text, InkML, JSON, tldraw
//! - **Pressure-aware strokes**: per-pen width, opacity and smoothing rules
//! - **Text layout**: explicit breaks and width wrapping for text boxes
//! - **Reverse path**: plain text to a text-only document
//! - **Parallel processing**: Uses Rayon for batch conversion

pub mod builder;
pub mod convert;
pub mod error;
pub mod layout;
pub mod model;
pub mod render;
pub mod reverse;
pub mod scene;

// Re-export commonly used types
pub use builder::{BuildOptions, SceneBuilder};
pub use convert::{convert, convert_batch, ConvertOptions};
pub use error::{Error, Result};
pub use layout::{layout_text_block, LayoutOptions, LayoutResult};
pub use model::{
    Color, Document, Element, Layer, Metadata, Page, ParagraphKind, PenKind, Point, Stroke,
    TextBlock, TextRun, TextStyle,
};
pub use render::{
    Diagnostic, DiagnosticKind, Diagnostics, JsonFormat, OutputFormat, PageSelection,
    PenProfile, RenderOptions, RenderResult,
};
pub use reverse::{ReverseBuilder, ReverseOptions, ReverseOutput};
pub use scene::DecodedNotebook;

/// Build a Scene Model document from a decoded notebook.
///
/// # Example
///
/// ```
/// use rmink::build_document;
/// use rmink::scene::{DecodedNotebook, DecodedPage};
///
/// let doc = build_document(&DecodedNotebook::new(vec![DecodedPage::new()])).unwrap();
/// assert_eq!(doc.page_count(), 1);
/// ```
pub fn build_document(notebook: &DecodedNotebook) -> Result<Document> {
    SceneBuilder::new().build(notebook)
}

/// Build a document from a decoded notebook given as JSON.
pub fn build_document_from_json(json: &str) -> Result<Document> {
    build_document(&DecodedNotebook::from_json(json)?)
}

/// Extract the plain text of a document.
///
/// # Example
///
/// ```
/// use rmink::{extract_text, text_to_document};
///
/// let doc = text_to_document("Hello\nWorld").unwrap();
/// assert_eq!(extract_text(&doc).unwrap(), "Hello\nWorld");
/// ```
pub fn extract_text(doc: &Document) -> Result<String> {
    render::plain_text(doc, &RenderOptions::default())
}

/// Render a document to SVG with default options, one string per page.
pub fn to_svg(doc: &Document) -> Result<Vec<String>> {
    let result = render::to_svg(doc, &RenderOptions::default())?;
    Ok(result
        .outputs
        .into_iter()
        .map(|o| String::from_utf8_lossy(&o.bytes).into_owned())
        .collect())
}

/// Render a document to PDF bytes with default options.
pub fn to_pdf(doc: &Document) -> Result<Vec<u8>> {
    let result = render::to_pdf(doc, &RenderOptions::default())?;
    Ok(result
        .outputs
        .into_iter()
        .next()
        .map(|o| o.bytes)
        .unwrap_or_default())
}

/// Render a document to InkML with default options.
pub fn to_inkml(doc: &Document) -> Result<String> {
    let result = render::to_inkml(doc, &RenderOptions::default())?;
    Ok(result.text().unwrap_or_default().to_string())
}

/// Render a document to a tldraw file with default options.
pub fn to_tldraw(doc: &Document) -> Result<String> {
    let result = render::to_tldraw(doc, &RenderOptions::default())?;
    Ok(result.text().unwrap_or_default().to_string())
}

/// Serialize a document to JSON.
///
/// # Example
///
/// ```
/// use rmink::{text_to_document, to_json, JsonFormat};
///
/// let doc = text_to_document("note").unwrap();
/// let json = to_json(&doc, JsonFormat::Compact).unwrap();
/// assert!(json.contains("note"));
/// ```
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    render::to_json_string(doc, format)
}

/// Build a text-only document from plain text with default options.
///
/// Overflow diagnostics are logged; use [`ReverseBuilder`] to inspect them.
pub fn text_to_document(text: &str) -> Result<Document> {
    Ok(ReverseBuilder::new().build(text)?.document)
}

/// Builder for building and converting ink documents.
///
/// # Example
///
/// ```
/// use rmink::RmInk;
/// use rmink::scene::{DecodedNotebook, DecodedPage, DecodedRun, DecodedText};
///
/// let text = DecodedText::new(-468.0, 94.0, 936.0).with_run(DecodedRun::new("Hello"));
/// let notebook = DecodedNotebook::new(vec![DecodedPage::new().with_root_text(text)]);
///
/// let text = RmInk::new()
///     .with_pages_str("1")?
///     .build(&notebook)?
///     .to_text()?;
/// assert_eq!(text, "Hello");
/// # Ok::<(), rmink::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RmInk {
    build_options: BuildOptions,
    render_options: RenderOptions,
}

impl RmInk {
    /// Create a new RmInk builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set Model Builder options.
    pub fn with_build_options(mut self, options: BuildOptions) -> Self {
        self.build_options = options;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.render_options = self.render_options.with_pages(pages);
        self
    }

    /// Set page selection from a string such as `"1,3,5-7"`.
    pub fn with_pages_str(self, pages: &str) -> Result<Self> {
        let selection = PageSelection::parse(pages).map_err(Error::InvalidPageRange)?;
        Ok(self.with_pages(selection))
    }

    /// Draw hidden layers in visual output.
    pub fn with_hidden_layers(mut self) -> Self {
        self.render_options = self.render_options.with_hidden_layers(true);
        self
    }

    /// Leave out the white page background.
    pub fn transparent(mut self) -> Self {
        self.render_options = self.render_options.with_background(false);
        self
    }

    /// Set the output scale (device units to points).
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.render_options = self.render_options.with_scale(scale);
        self
    }

    /// Override the rendering rules of a pen.
    pub fn with_pen_profile(mut self, pen: PenKind, profile: PenProfile) -> Self {
        self.render_options = self.render_options.with_pen_profile(pen, profile);
        self
    }

    /// Set the output file stem.
    pub fn with_file_stem(mut self, stem: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_file_stem(stem);
        self
    }

    /// Enable statistics collection.
    pub fn with_stats(mut self) -> Self {
        self.render_options = self.render_options.with_stats(true);
        self
    }

    /// Build a decoded notebook and return a result wrapper.
    pub fn build(self, notebook: &DecodedNotebook) -> Result<RmInkResult> {
        let document = SceneBuilder::with_options(self.build_options).build(notebook)?;
        Ok(RmInkResult {
            document,
            render_options: self.render_options,
        })
    }

    /// Build a decoded notebook given as JSON.
    pub fn build_json(self, json: &str) -> Result<RmInkResult> {
        let notebook = DecodedNotebook::from_json(json)?;
        self.build(&notebook)
    }

    /// Wrap an already built document.
    pub fn document(self, document: Document) -> RmInkResult {
        RmInkResult {
            document,
            render_options: self.render_options,
        }
    }
}

/// A built document with rendering options attached.
#[derive(Debug, Clone)]
pub struct RmInkResult {
    document: Document,
    render_options: RenderOptions,
}

impl RmInkResult {
    /// Get the built document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Take the built document.
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Render to any format.
    pub fn render(&self, format: OutputFormat) -> Result<RenderResult> {
        render::render(&self.document, format, &self.render_options)
    }

    /// Render to SVG, one output per page.
    pub fn to_svg(&self) -> Result<RenderResult> {
        self.render(OutputFormat::Svg)
    }

    /// Render to a single PDF.
    pub fn to_pdf(&self) -> Result<RenderResult> {
        self.render(OutputFormat::Pdf)
    }

    /// Render to InkML with its text companion.
    pub fn to_inkml(&self) -> Result<RenderResult> {
        self.render(OutputFormat::InkMl)
    }

    /// Render the selected pages to a tldraw file.
    pub fn to_tldraw(&self) -> Result<String> {
        let result = self.render(OutputFormat::Tldraw)?;
        Ok(result.text().unwrap_or_default().to_string())
    }

    /// Extract plain text.
    pub fn to_text(&self) -> Result<String> {
        render::plain_text(&self.document, &self.render_options)
    }

    /// Serialize the selected pages to JSON.
    pub fn to_json(&self) -> Result<String> {
        let result = self.render(OutputFormat::Json)?;
        Ok(result.text().unwrap_or_default().to_string())
    }
}
