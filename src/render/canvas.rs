//! Per-page paint list shared by the visual emitters.
//!
//! A [`Canvas`] is what a page looks like once strokes are rendered and text
//! blocks are laid out: an ordered list of paths, dots and positioned text
//! lines per layer. Both the SVG and PDF emitters draw from it, so their
//! geometry and z-order always agree.

use super::diagnostics::{DiagnosticKind, Diagnostics, Location};
use super::options::RenderOptions;
use super::stroke::{render_stroke, RenderedDot, RenderedPath, RenderedStroke};
use crate::layout::layout_text_block;
use crate::model::{Element, Page, ParagraphKind, TextStyle, UnknownReason};

/// Drawable content of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    /// Page number (1-indexed)
    pub page: u32,
    /// Page width in device units
    pub width: f32,
    /// Page height in device units
    pub height: f32,
    /// Drawn layers, bottom to top
    pub layers: Vec<CanvasLayer>,
}

/// Drawable content of one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasLayer {
    /// Index of the layer on its page
    pub index: usize,
    /// Layer label
    pub label: String,
    /// Painted items in element order
    pub items: Vec<CanvasItem>,
}

/// One painted item and the element it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasItem {
    /// Element index within the layer
    pub element: usize,
    /// What to draw
    pub shape: Shape,
}

/// What gets drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A stroke with two or more points
    Path(RenderedPath),
    /// A single-point stroke
    Dot(RenderedDot),
    /// One laid-out line of a text block
    Text(TextLine),
}

/// A positioned line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Left edge in device units
    pub x: f32,
    /// Baseline in device units
    pub baseline: f32,
    /// Paragraph marker to draw before the text
    pub marker: Option<ParagraphKind>,
    /// Style of the marker (the line's first fragment)
    pub marker_style: TextStyle,
    /// Non-empty spans, left to right
    pub spans: Vec<TextSpan>,
}

/// A styled span of a text line.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// Span text
    pub text: String,
    /// Span style
    pub style: TextStyle,
}

impl Canvas {
    /// Iterate over every item, bottom to top.
    pub fn items(&self) -> impl Iterator<Item = &CanvasItem> {
        self.layers.iter().flat_map(|l| l.items.iter())
    }

    /// Number of rendered paths.
    pub fn path_count(&self) -> usize {
        self.items()
            .filter(|i| matches!(i.shape, Shape::Path(_)))
            .count()
    }
}

/// Paint a page.
///
/// Hidden layers are skipped unless the options include them. Unknown
/// elements are skipped with a diagnostic. Laying out a text block never
/// changes any other element's coordinates.
pub fn paint_page(page: &Page, options: &RenderOptions, diagnostics: &mut Diagnostics) -> Canvas {
    let mut canvas = Canvas {
        page: page.number,
        width: page.width,
        height: page.height,
        layers: Vec::new(),
    };

    for (layer_index, layer) in page.layers.iter().enumerate() {
        if !layer.visible && !options.include_hidden_layers {
            log::debug!(
                "Page {}: skipping hidden layer '{}'",
                page.number,
                layer.label
            );
            continue;
        }

        let mut items = Vec::new();
        for (element_index, element) in layer.elements.iter().enumerate() {
            let push = |items: &mut Vec<CanvasItem>, shape| {
                items.push(CanvasItem {
                    element: element_index,
                    shape,
                })
            };
            match element {
                Element::Stroke(stroke) => {
                    match render_stroke(stroke, &options.pen_profile(stroke.pen)) {
                        RenderedStroke::Path(path) => push(&mut items, Shape::Path(path)),
                        RenderedStroke::Dot(dot) => push(&mut items, Shape::Dot(dot)),
                        RenderedStroke::Nothing => {}
                    }
                }
                Element::TextBlock(block) => {
                    for line in layout_text_block(block, &options.layout).lines {
                        if line.is_empty() {
                            continue;
                        }
                        let first_style = line.fragments.first().map_or(line.style, |f| f.style);
                        let marker = if line.starts_paragraph() {
                            first_style.paragraph.marker().map(|_| first_style.paragraph)
                        } else {
                            None
                        };
                        let spans = line
                            .fragments
                            .into_iter()
                            .filter(|f| !f.text.is_empty())
                            .map(|f| TextSpan {
                                text: f.text,
                                style: f.style,
                            })
                            .collect();
                        push(
                            &mut items,
                            Shape::Text(TextLine {
                                x: line.x,
                                baseline: line.baseline,
                                marker,
                                marker_style: first_style,
                                spans,
                            }),
                        );
                    }
                }
                Element::Unknown(unknown) => {
                    let kind = match unknown.reason {
                        UnknownReason::PenType { .. } => DiagnosticKind::UnsupportedPenType,
                        UnknownReason::Content { .. } => DiagnosticKind::UnsupportedElement,
                    };
                    diagnostics.push(
                        kind,
                        Location::element(page.number, layer_index, element_index),
                        format!("skipped {}", unknown.reason),
                    );
                }
            }
        }

        canvas.layers.push(CanvasLayer {
            index: layer_index,
            label: layer.label.clone(),
            items,
        });
    }

    canvas
}
