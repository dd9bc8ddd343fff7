//! Plain text rendering.

use super::diagnostics::Diagnostics;
use super::options::RenderOptions;
use super::result::{Output, RenderResult};
use crate::error::Result;
use crate::layout::layout_text_block;
use crate::model::{Document, Element};

/// Convert a document to plain text.
///
/// Text blocks are visited in document order (pages, then layers bottom to
/// top, hidden layers included). Each laid-out line ends with a line break
/// and blocks are separated by a blank line. Strokes are ignored.
pub fn to_text(doc: &Document, options: &RenderOptions) -> Result<RenderResult> {
    let text = plain_text(doc, options)?;
    let output = Output::new(
        format!("{}.txt", options.file_stem),
        "text/plain",
        text.into_bytes(),
    );
    Ok(RenderResult::new(vec![output], Diagnostics::new()))
}

/// Extract the plain text of the selected pages.
pub fn plain_text(doc: &Document, options: &RenderOptions) -> Result<String> {
    let mut blocks = Vec::new();
    for page in super::selected_pages(doc, options)? {
        for element in page.elements() {
            if let Element::TextBlock(block) = element {
                let text = layout_text_block(block, &options.layout).text(options.join_soft_wraps);
                if !text.is_empty() {
                    blocks.push(text);
                }
            }
        }
    }
    log::debug!("Extracted {} text blocks", blocks.len());
    Ok(blocks.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Color, Layer, Page, PenKind, Stroke, TextBlock, TextStyle};

    fn block(lines: &[&str]) -> TextBlock {
        let mut block = TextBlock::new(0.0, 0.0, 0.0);
        for (i, line) in lines.iter().enumerate() {
            block.add_text(*line, TextStyle::plain());
            if i + 1 < lines.len() {
                block.add_line_break();
            }
        }
        block
    }

    #[test]
    fn test_to_text() {
        let mut layer = Layer::new("Layer 1");
        layer.add_text_block(block(&["Hello, world!", "Second line."]));
        layer.add_stroke(Stroke::new(PenKind::Ballpoint, Color::BLACK, 2.0));
        layer.add_text_block(block(&["Next block."]));
        let mut page = Page::remarkable(1);
        page.add_layer(layer);
        let mut doc = Document::new();
        doc.add_page(page);

        let result = to_text(&doc, &RenderOptions::default()).unwrap();
        assert_eq!(
            result.text(),
            Some("Hello, world!\nSecond line.\n\nNext block.")
        );
        assert_eq!(result.outputs[0].name, "document.txt");
    }

    #[test]
    fn test_hidden_layers_still_yield_text() {
        let mut hidden = Layer::new("Layer 2").hidden();
        hidden.add_text_block(block(&["secret"]));
        let mut page = Page::remarkable(1);
        page.add_layer(hidden);
        let mut doc = Document::new();
        doc.add_page(page);

        assert_eq!(plain_text(&doc, &RenderOptions::default()).unwrap(), "secret");
    }

    #[test]
    fn test_empty_blocks_are_skipped() {
        let mut layer = Layer::new("Layer 1");
        layer.add_text_block(TextBlock::new(0.0, 0.0, 100.0));
        layer.add_text_block(block(&["only"]));
        let mut page = Page::remarkable(1);
        page.add_layer(layer);
        let mut doc = Document::new();
        doc.add_page(page);

        assert_eq!(plain_text(&doc, &RenderOptions::default()).unwrap(), "only");
    }
}
