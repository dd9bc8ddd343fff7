//! Model Builder: decoded scene primitives to Scene Model.
//!
//! Every decoded item maps to exactly one [`Element`]. Group frames (affine
//! matrix, plain translation, text anchors) are resolved into final device
//! coordinates here, so the Scene Model never carries a transform.
//!
//! The build either succeeds for the whole notebook or fails with
//! [`Error::MalformedInput`]; no partially built document is returned.
//!
//! # Example
//!
//! ```
//! use rmink::builder::SceneBuilder;
//! use rmink::scene::{DecodedItem, DecodedLayer, DecodedLine, DecodedNotebook, DecodedPage, DecodedPoint};
//!
//! let line = DecodedLine::new(15, 0, 2.0).with_points(vec![
//!     DecodedPoint::new(0.0, 100.0, 128.0),
//!     DecodedPoint::new(10.0, 100.0, 255.0),
//! ]);
//! let page = DecodedPage::new().with_layer(DecodedLayer::new("Layer 1").with_item(DecodedItem::Line(line)));
//! let doc = SceneBuilder::new().build(&DecodedNotebook::new(vec![page])).unwrap();
//! assert_eq!(doc.element_counts().strokes, 1);
//! ```

mod options;
mod transform;

pub use options::BuildOptions;
pub use transform::Transform;

use crate::error::{Error, Result};
use crate::layout::{layout_text_block, LayoutResult};
use crate::model::{
    Color, Document, Element, FontWeight, Layer, Page, ParagraphKind, PenKind, Point, Stroke,
    TextBlock, TextRun, TextStyle, UnknownElement, UnknownReason,
};
use crate::scene::{
    DecodedGroup, DecodedItem, DecodedLine, DecodedNotebook, DecodedPage, DecodedText,
};
use std::f32::consts::TAU;

/// Label of the layer holding a page's root text.
pub const ROOT_TEXT_LAYER: &str = "Text";

/// Builds Scene Model documents from decoded notebooks.
#[derive(Debug, Clone, Default)]
pub struct SceneBuilder {
    options: BuildOptions,
}

impl SceneBuilder {
    /// Create a builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with the given options.
    pub fn with_options(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Get the build options.
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Build a document.
    pub fn build(&self, notebook: &DecodedNotebook) -> Result<Document> {
        if notebook.pages.is_empty() {
            return Err(Error::EmptyDocument);
        }

        let mut doc = Document::new();
        doc.metadata = notebook.metadata.clone();
        for (index, page) in notebook.pages.iter().enumerate() {
            doc.add_page(self.build_page(index as u32 + 1, page)?);
        }

        let counts = doc.element_counts();
        log::debug!(
            "Built document: {} pages, {} strokes, {} text blocks, {} unknown",
            doc.page_count(),
            counts.strokes,
            counts.text_blocks,
            counts.unknown
        );
        Ok(doc)
    }

    fn build_page(&self, number: u32, decoded: &DecodedPage) -> Result<Page> {
        let width = page_dimension(decoded.width, self.options.page_width, "width", number)?;
        let height = page_dimension(decoded.height, self.options.page_height, "height", number)?;

        let center = if self.options.centered_origin {
            width / 2.0
        } else {
            0.0
        };
        let root = Transform::translate(center, 0.0);

        let mut ctx = PageContext {
            number,
            options: &self.options,
            root_layout: None,
        };
        let mut page = Page::new(number, width, height);

        if let Some(text) = &decoded.root_text {
            let block = ctx.convert_text(text, &root)?;
            ctx.root_layout = Some(layout_text_block(&block, &self.options.layout));
            let mut layer = Layer::new(ROOT_TEXT_LAYER);
            layer.add_text_block(block);
            page.add_layer(layer);
        }

        for decoded_layer in &decoded.layers {
            let mut layer = Layer::new(decoded_layer.label.clone());
            layer.visible = decoded_layer.visible;
            for item in &decoded_layer.items {
                ctx.collect(item, &root, &mut layer.elements)?;
            }
            page.add_layer(layer);
        }

        Ok(page)
    }
}

fn page_dimension(value: Option<f32>, default: f32, name: &str, page: u32) -> Result<f32> {
    let value = value.unwrap_or(default);
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::malformed(format!(
            "page {}: {} must be positive, got {}",
            page, name, value
        )))
    }
}

/// Per-page state: the laid-out root text used for anchor resolution.
struct PageContext<'a> {
    number: u32,
    options: &'a BuildOptions,
    root_layout: Option<LayoutResult>,
}

impl PageContext<'_> {
    fn collect(
        &self,
        item: &DecodedItem,
        frame: &Transform,
        out: &mut Vec<Element>,
    ) -> Result<()> {
        match item {
            DecodedItem::Group(group) => {
                let frame = self.group_frame(group, frame)?;
                for child in &group.children {
                    self.collect(child, &frame, out)?;
                }
            }
            DecodedItem::Line(line) => out.push(self.convert_line(line, frame)?),
            DecodedItem::Text(text) => out.push(Element::TextBlock(self.convert_text(text, frame)?)),
            DecodedItem::Other { name, point_count } => {
                log::warn!("Page {}: keeping unsupported item '{}'", self.number, name);
                out.push(Element::Unknown(UnknownElement {
                    reason: UnknownReason::Content { name: name.clone() },
                    point_count: *point_count,
                }));
            }
        }
        Ok(())
    }

    fn group_frame(&self, group: &DecodedGroup, parent: &Transform) -> Result<Transform> {
        let local = group.matrix.map(Transform::from_matrix).unwrap_or_default();
        let placement = match (&group.anchor, group.translate) {
            (Some(anchor), _) => {
                let y = self.resolve_anchor(anchor.text_offset)?;
                Transform::translate(anchor.origin_x, y)
            }
            (None, Some([dx, dy])) => Transform::translate(dx, dy),
            (None, None) => Transform::IDENTITY,
        };

        let frame = local.then(&placement).then(parent);
        if !frame.is_finite() {
            return Err(self.malformed(format!(
                "group {} has a non-finite transform",
                group.label.as_deref().unwrap_or("<unnamed>")
            )));
        }
        Ok(frame)
    }

    /// Y of the bottom of the root text line containing `offset`.
    fn resolve_anchor(&self, offset: usize) -> Result<f32> {
        let layout = self
            .root_layout
            .as_ref()
            .ok_or_else(|| self.malformed("group anchor without root text".to_string()))?;

        let len = layout.lines.last().map_or(0, |l| l.end);
        if offset > len {
            return Err(self.malformed(format!(
                "anchor offset {} is past the end of the root text ({} characters)",
                offset, len
            )));
        }

        layout
            .line_at_offset(offset)
            .map(|line| line.y + line.height)
            .ok_or_else(|| self.malformed("group anchor into empty root text".to_string()))
    }

    fn convert_line(&self, line: &DecodedLine, frame: &Transform) -> Result<Element> {
        if !line.thickness_scale.is_finite() || line.thickness_scale < 0.0 {
            return Err(self.malformed(format!(
                "stroke thickness must be non-negative, got {}",
                line.thickness_scale
            )));
        }

        let Some(pen) = PenKind::from_device_id(line.tool) else {
            log::warn!(
                "Page {}: unsupported pen type {}, keeping stroke as unknown",
                self.number,
                line.tool
            );
            return Ok(Element::Unknown(UnknownElement {
                reason: UnknownReason::PenType { id: line.tool },
                point_count: line.points.len(),
            }));
        };

        let color = match line.argb {
            Some(argb) => Color::from_argb(argb),
            None => Color::from_device_id(line.color).unwrap_or_else(|| {
                log::warn!(
                    "Page {}: unknown color id {}, using black",
                    self.number,
                    line.color
                );
                Color::BLACK
            }),
        };

        let mut stroke = Stroke::new(
            pen,
            color,
            line.thickness_scale * self.options.width_per_thickness,
        );
        for (i, raw) in line.points.iter().enumerate() {
            let samples = [Some(raw.x), Some(raw.y), Some(raw.pressure), raw.speed, raw.direction];
            if samples.iter().flatten().any(|v| !v.is_finite()) {
                return Err(self.malformed(format!("stroke point {} is not finite", i)));
            }
            let (x, y) = frame.apply(raw.x, raw.y);
            stroke.push(Point {
                x,
                y,
                pressure: (raw.pressure / 255.0).clamp(0.0, 1.0),
                tilt: raw.direction.map(|d| d * TAU / 255.0),
                speed: raw.speed,
            });
        }
        Ok(Element::Stroke(stroke))
    }

    fn convert_text(&self, text: &DecodedText, frame: &Transform) -> Result<TextBlock> {
        if ![text.pos_x, text.pos_y, text.width].iter().all(|v| v.is_finite()) {
            return Err(self.malformed("text position is not finite".to_string()));
        }

        let styles = text
            .styles
            .iter()
            .map(|s| {
                let paragraph = ParagraphKind::from_device_id(s.paragraph).unwrap_or_else(|| {
                    log::warn!(
                        "Page {}: unknown paragraph style {}, using plain",
                        self.number,
                        s.paragraph
                    );
                    ParagraphKind::Plain
                });
                let style = TextStyle::for_paragraph(paragraph);
                match s.font_size {
                    Some(size) if size.is_finite() && size > 0.0 => Ok(style.with_size(size)),
                    Some(size) => Err(self.malformed(format!("invalid font size {}", size))),
                    None => Ok(style),
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let (x, y) = frame.apply(text.pos_x, text.pos_y);
        let mut block = TextBlock::new(x, y, text.width);

        for (i, run) in text.runs.iter().enumerate() {
            let mut style = match styles.get(run.style) {
                Some(style) => *style,
                None if styles.is_empty() && run.style == 0 => TextStyle::plain(),
                None => {
                    return Err(self.malformed(format!(
                        "text run {} references style {} but only {} styles are defined",
                        i,
                        run.style,
                        styles.len()
                    )))
                }
            };
            if let Some(bold) = run.bold {
                style.weight = if bold {
                    FontWeight::Bold
                } else {
                    FontWeight::Normal
                };
            }
            style.italic = run.italic;

            // Embedded breaks become explicit run breaks.
            let mut pieces = run.text.split(['\n', '\u{2028}', '\u{2029}']).peekable();
            while let Some(piece) = pieces.next() {
                let mut out = TextRun::new(piece).with_style(style);
                out.line_break = pieces.peek().is_some() || run.line_break;
                block.add_run(out);
            }
        }
        Ok(block)
    }

    fn malformed(&self, msg: String) -> Error {
        Error::malformed(format!("page {}: {}", self.number, msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{
        DecodedAnchor, DecodedLayer, DecodedPoint, DecodedRun, DecodedTextStyle,
    };

    fn line(tool: u32, points: &[(f32, f32)]) -> DecodedLine {
        DecodedLine::new(tool, 0, 2.0).with_points(
            points
                .iter()
                .map(|&(x, y)| DecodedPoint::new(x, y, 255.0))
                .collect(),
        )
    }

    fn single_page(items: Vec<DecodedItem>) -> DecodedNotebook {
        let mut layer = DecodedLayer::new("Layer 1");
        layer.items = items;
        DecodedNotebook::new(vec![DecodedPage::new().with_layer(layer)])
    }

    fn strokes(doc: &Document) -> Vec<&Stroke> {
        doc.pages[0]
            .elements()
            .filter_map(|e| match e {
                Element::Stroke(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_empty_notebook_is_rejected() {
        let result = SceneBuilder::new().build(&DecodedNotebook::default());
        assert!(matches!(result, Err(Error::EmptyDocument)));
    }

    #[test]
    fn test_centered_origin_is_resolved() {
        let doc = SceneBuilder::new()
            .build(&single_page(vec![DecodedItem::Line(line(15, &[(0.0, 5.0)]))]))
            .unwrap();
        let stroke = strokes(&doc)[0];
        assert_eq!(stroke.pen, PenKind::Ballpoint);
        assert_eq!(stroke.width, 4.0);
        assert_eq!((stroke.points[0].x, stroke.points[0].y), (702.0, 5.0));
        assert_eq!(stroke.points[0].pressure, 1.0);
    }

    #[test]
    fn test_uncentered_origin() {
        let options = BuildOptions::new().with_centered_origin(false);
        let doc = SceneBuilder::with_options(options)
            .build(&single_page(vec![DecodedItem::Line(line(15, &[(3.0, 5.0)]))]))
            .unwrap();
        assert_eq!(strokes(&doc)[0].points[0].x, 3.0);
    }

    #[test]
    fn test_group_translate_and_matrix_compose() {
        let inner = DecodedGroup {
            matrix: Some([2.0, 0.0, 0.0, 2.0, 0.0, 0.0]),
            children: vec![DecodedItem::Line(line(15, &[(1.0, 1.0)]))],
            ..Default::default()
        };
        let outer = DecodedGroup {
            translate: Some([10.0, 20.0]),
            children: vec![DecodedItem::Group(inner)],
            ..Default::default()
        };
        let options = BuildOptions::new().with_centered_origin(false);
        let doc = SceneBuilder::with_options(options)
            .build(&single_page(vec![DecodedItem::Group(outer)]))
            .unwrap();
        let p = strokes(&doc)[0].points[0];
        assert_eq!((p.x, p.y), (12.0, 22.0));
    }

    #[test]
    fn test_unknown_pen_is_preserved() {
        let doc = SceneBuilder::new()
            .build(&single_page(vec![
                DecodedItem::Line(line(99, &[(0.0, 0.0), (1.0, 1.0)])),
                DecodedItem::Other {
                    name: "glyph_range".into(),
                    point_count: 0,
                },
            ]))
            .unwrap();
        let counts = doc.element_counts();
        assert_eq!(counts.unknown, 2);
        assert_eq!(counts.strokes, 0);
        match doc.pages[0].elements().next() {
            Some(Element::Unknown(u)) => {
                assert_eq!(u.reason, UnknownReason::PenType { id: 99 });
                assert_eq!(u.point_count, 2);
            }
            other => panic!("expected unknown element, got {:?}", other),
        };
    }

    #[test]
    fn test_style_index_out_of_range_is_malformed() {
        let text = DecodedText::new(0.0, 0.0, 500.0).with_run(DecodedRun::new("x").with_style(3));
        let result = SceneBuilder::new().build(&single_page(vec![DecodedItem::Text(text)]));
        assert!(matches!(result, Err(Error::MalformedInput(msg)) if msg.contains("style 3")));
    }

    #[test]
    fn test_non_finite_point_is_malformed() {
        let result = SceneBuilder::new().build(&single_page(vec![DecodedItem::Line(line(
            15,
            &[(f32::NAN, 0.0)],
        ))]));
        assert!(matches!(result, Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_non_positive_page_size_is_malformed() {
        let page = DecodedPage {
            width: Some(0.0),
            ..Default::default()
        };
        let result = SceneBuilder::new().build(&DecodedNotebook::new(vec![page]));
        assert!(matches!(result, Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_degenerate_strokes_are_not_malformed() {
        let doc = SceneBuilder::new()
            .build(&single_page(vec![
                DecodedItem::Line(line(15, &[])),
                DecodedItem::Line(line(15, &[(0.0, 0.0)])),
            ]))
            .unwrap();
        assert_eq!(doc.element_counts().strokes, 2);
    }

    #[test]
    fn test_root_text_goes_to_bottom_layer_and_embedded_breaks_split() {
        let root = DecodedText::new(-468.0, 94.0, 936.0)
            .with_run(DecodedRun::new("Hello\nWorld"));
        let page = DecodedPage::new()
            .with_root_text(root)
            .with_layer(DecodedLayer::new("Layer 1"));
        let doc = SceneBuilder::new().build(&DecodedNotebook::new(vec![page])).unwrap();

        let page = &doc.pages[0];
        assert_eq!(page.layers[0].label, ROOT_TEXT_LAYER);
        let Element::TextBlock(block) = &page.layers[0].elements[0] else {
            panic!("expected text block");
        };
        assert_eq!(block.x, 234.0);
        assert_eq!(block.runs.len(), 2);
        assert!(block.runs[0].line_break);
        assert!(!block.runs[1].line_break);
        assert_eq!(block.source_text(), "Hello\nWorld");
    }

    #[test]
    fn test_anchor_places_group_below_its_line() {
        let root = DecodedText::new(-468.0, 100.0, 936.0)
            .with_run(DecodedRun::new("first").with_break())
            .with_run(DecodedRun::new("second"));
        let group = DecodedGroup {
            anchor: Some(DecodedAnchor {
                text_offset: 8,
                origin_x: -468.0,
            }),
            children: vec![DecodedItem::Line(line(15, &[(0.0, 0.0)]))],
            ..Default::default()
        };
        let page = DecodedPage::new()
            .with_root_text(root)
            .with_layer(DecodedLayer::new("Layer 1").with_item(DecodedItem::Group(group)));
        let doc = SceneBuilder::new().build(&DecodedNotebook::new(vec![page])).unwrap();

        let p = strokes(&doc)[0].points[0];
        assert_eq!(p.x, 234.0);
        assert_eq!(p.y, 100.0 + 71.0 + 71.0);
    }

    #[test]
    fn test_anchor_without_root_text_is_malformed() {
        let group = DecodedGroup {
            anchor: Some(DecodedAnchor {
                text_offset: 0,
                origin_x: 0.0,
            }),
            ..Default::default()
        };
        let result = SceneBuilder::new().build(&single_page(vec![DecodedItem::Group(group)]));
        assert!(matches!(result, Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_anchor_past_end_is_malformed() {
        let root = DecodedText::new(0.0, 0.0, 500.0).with_run(DecodedRun::new("abc"));
        let group = DecodedGroup {
            anchor: Some(DecodedAnchor {
                text_offset: 10,
                origin_x: 0.0,
            }),
            ..Default::default()
        };
        let page = DecodedPage::new()
            .with_root_text(root)
            .with_layer(DecodedLayer::new("L").with_item(DecodedItem::Group(group)));
        let result = SceneBuilder::new().build(&DecodedNotebook::new(vec![page]));
        assert!(matches!(result, Err(Error::MalformedInput(msg)) if msg.contains("past the end")));
    }

    #[test]
    fn test_style_table_and_bold_override() {
        let mut text = DecodedText::new(0.0, 0.0, 500.0);
        text.styles = vec![DecodedTextStyle::new(1), DecodedTextStyle::new(2)];
        text.runs = vec![
            DecodedRun::new("Title").with_style(1).with_break(),
            DecodedRun {
                bold: Some(true),
                ..DecodedRun::new("strong")
            },
        ];
        let doc = SceneBuilder::new()
            .build(&single_page(vec![DecodedItem::Text(text)]))
            .unwrap();
        let Some(Element::TextBlock(block)) = doc.pages[0].elements().next() else {
            panic!("expected text block");
        };
        assert_eq!(block.runs[0].style.paragraph, ParagraphKind::Heading);
        assert_eq!(block.runs[0].style.size, 44.0);
        assert!(block.runs[1].style.is_bold());
        assert_eq!(block.runs[1].style.paragraph, ParagraphKind::Plain);
    }

    #[test]
    fn test_export_then_build_restores_document() {
        let root = DecodedText::new(-468.0, 94.0, 936.0)
            .with_run(DecodedRun::new("Note").with_break())
            .with_run(DecodedRun::new("body"));
        let page = DecodedPage::new().with_root_text(root).with_layer(
            DecodedLayer::new("Layer 1")
                .with_item(DecodedItem::Line(line(17, &[(0.0, 0.0), (4.0, 8.0)]))),
        );
        let builder = SceneBuilder::new();
        let doc = builder.build(&DecodedNotebook::new(vec![page])).unwrap();

        let exported = DecodedNotebook::from_document(&doc);
        let rebuilt = builder.build(&exported).unwrap();
        assert_eq!(rebuilt, doc);
    }
}
