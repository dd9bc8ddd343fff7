//! One-call conversion pipeline: decoded notebook to emitted outputs.
//!
//! A conversion runs the Model Builder and then one emitter. Every stage
//! consumes an immutable input and produces a new value, so independent
//! notebooks can be converted in parallel with [`convert_batch`].
//!
//! # Example
//!
//! ```
//! use rmink::convert::{convert, ConvertOptions};
//! use rmink::render::OutputFormat;
//! use rmink::scene::{DecodedNotebook, DecodedPage, DecodedRun, DecodedText};
//!
//! let text = DecodedText::new(-468.0, 94.0, 936.0).with_run(DecodedRun::new("Hello"));
//! let page = DecodedPage::new().with_root_text(text);
//! let notebook = DecodedNotebook::new(vec![page]);
//!
//! let options = ConvertOptions::new().with_format(OutputFormat::Text);
//! let result = convert(&notebook, &options)?;
//! assert_eq!(result.text(), Some("Hello"));
//! # Ok::<(), rmink::Error>(())
//! ```

use crate::builder::{BuildOptions, SceneBuilder};
use crate::error::Result;
use crate::model::Document;
use crate::render::{self, ConversionStats, RenderOptions, RenderResult};
use crate::scene::DecodedNotebook;
use rayon::prelude::*;

pub use crate::render::OutputFormat;

/// Options for a full conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Model Builder options
    pub build: BuildOptions,

    /// Rendering options
    pub render: RenderOptions,

    /// Output format
    pub format: OutputFormat,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set Model Builder options.
    pub fn with_build_options(mut self, options: BuildOptions) -> Self {
        self.build = options;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Enable statistics collection.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.render.collect_stats = collect;
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}

/// Build a notebook and render it.
pub fn convert(notebook: &DecodedNotebook, options: &ConvertOptions) -> Result<RenderResult> {
    let document = SceneBuilder::with_options(options.build.clone()).build(notebook)?;
    convert_document(&document, options)
}

/// Render an already built document.
pub fn convert_document(document: &Document, options: &ConvertOptions) -> Result<RenderResult> {
    render::render(document, options.format, &options.render)
}

/// Convert independent notebooks in parallel.
///
/// Results are returned in input order; one failed notebook does not
/// affect the others.
pub fn convert_batch(
    notebooks: &[DecodedNotebook],
    options: &ConvertOptions,
) -> Vec<Result<RenderResult>> {
    let results: Vec<Result<RenderResult>> = notebooks
        .par_iter()
        .map(|notebook| convert(notebook, options))
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    log::debug!(
        "Converted {} notebooks as {} ({} failed)",
        notebooks.len(),
        options.format,
        failed
    );
    results
}

/// Sum the statistics of successful batch results.
pub fn batch_stats(results: &[Result<RenderResult>]) -> ConversionStats {
    let mut total = ConversionStats::new();
    for result in results.iter().flatten() {
        total.merge(&result.stats);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::scene::{DecodedRun, DecodedPage, DecodedText};

    fn notebook(text: &str) -> DecodedNotebook {
        let root = DecodedText::new(-468.0, 94.0, 936.0).with_run(DecodedRun::new(text));
        DecodedNotebook::new(vec![DecodedPage::new().with_root_text(root)])
    }

    #[test]
    fn test_convert_options_builder() {
        let options = ConvertOptions::new()
            .with_stats(true)
            .with_format(OutputFormat::Pdf);

        assert!(options.render.collect_stats);
        assert_eq!(options.format, OutputFormat::Pdf);
    }

    #[test]
    fn test_convert_text() {
        let options = ConvertOptions::new().with_format(OutputFormat::Text);
        let result = convert(&notebook("Hello"), &options).unwrap();
        assert_eq!(result.text(), Some("Hello"));
    }

    #[test]
    fn test_convert_batch_keeps_order_and_isolates_failures() {
        let notebooks = vec![
            notebook("first"),
            DecodedNotebook::new(Vec::new()),
            notebook("third"),
        ];
        let options = ConvertOptions::new()
            .with_format(OutputFormat::Text)
            .with_stats(true);
        let results = convert_batch(&notebooks, &options);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().text(), Some("first"));
        assert!(matches!(results[1], Err(Error::EmptyDocument)));
        assert_eq!(results[2].as_ref().unwrap().text(), Some("third"));

        let stats = batch_stats(&results);
        assert_eq!(stats.page_count, 2);
        assert_eq!(stats.word_count, 2);
    }
}
