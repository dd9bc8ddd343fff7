//! JSON rendering of the Scene Model.

use super::diagnostics::Diagnostics;
use super::options::{PageSelection, RenderOptions};
use super::result::{Output, RenderResult};
use crate::error::{Error, Result};
use crate::model::Document;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a document to JSON.
pub fn to_json_string(doc: &Document, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Dump the selected pages of a document as JSON.
pub fn to_json(doc: &Document, options: &RenderOptions) -> Result<RenderResult> {
    let json = if options.page_selection == PageSelection::All {
        to_json_string(doc, options.json_format)?
    } else {
        let selected = Document {
            metadata: doc.metadata.clone(),
            pages: super::selected_pages(doc, options)?
                .into_iter()
                .cloned()
                .collect(),
        };
        to_json_string(&selected, options.json_format)?
    };

    let output = Output::new(
        format!("{}.json", options.file_stem),
        "application/json",
        json.into_bytes(),
    );
    Ok(RenderResult::new(vec![output], Diagnostics::new()))
}
