//! tldraw (`.tldr`) rendering.
//!
//! Every selected page becomes a tldraw page. Ink is taken from the shared
//! page painter, so erasers, hidden layers and unknown elements follow the
//! same rules as SVG and PDF. Visible strokes become `draw` shapes
//! (highlighters become `highlight` shapes) whose points are relative to the
//! shape origin and carry pressure as `z`. Laid-out text lines become `text`
//! shapes. Ids and fractional index keys are derived from positions, so
//! equal documents give byte-identical files.

use super::canvas::{paint_page, Shape, TextLine};
use super::diagnostics::Diagnostics;
use super::json::JsonFormat;
use super::options::RenderOptions;
use super::result::{Output, RenderResult};
use crate::error::{Error, Result};
use crate::model::{Color, Document, Element, FontWeight, Page, ParagraphKind, PenKind, Stroke};
use serde::Serialize;
use serde_json::{json, Map, Value};

const FILE_FORMAT_VERSION: u32 = 1;
const SCHEMA_VERSION: u32 = 2;

/// Record migration sequences the file declares.
const SEQUENCES: [(&str, u32); 11] = [
    ("com.tldraw.store", 4),
    ("com.tldraw.asset", 1),
    ("com.tldraw.camera", 1),
    ("com.tldraw.document", 2),
    ("com.tldraw.instance", 25),
    ("com.tldraw.instance_page_state", 5),
    ("com.tldraw.page", 1),
    ("com.tldraw.shape", 4),
    ("com.tldraw.shape.draw", 2),
    ("com.tldraw.shape.highlight", 1),
    ("com.tldraw.shape.text", 3),
];

const BASE62: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShapeRecord {
    id: String,
    type_name: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    parent_id: String,
    index: String,
    x: f32,
    y: f32,
    rotation: f32,
    is_locked: bool,
    opacity: f32,
    meta: Map<String, Value>,
    props: ShapeProps,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ShapeProps {
    Draw(DrawProps),
    Text(TextProps),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DrawProps {
    segments: Vec<DrawSegment>,
    color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fill: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dash: Option<&'static str>,
    size: &'static str,
    is_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_closed: Option<bool>,
    is_pen: bool,
    scale: f32,
}

#[derive(Debug, Serialize)]
struct DrawSegment {
    #[serde(rename = "type")]
    kind: &'static str,
    points: Vec<DrawPoint>,
}

#[derive(Debug, Serialize)]
struct DrawPoint {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextProps {
    color: &'static str,
    size: &'static str,
    w: f32,
    font: &'static str,
    text_align: &'static str,
    auto_size: bool,
    scale: f32,
    rich_text: Value,
}

/// Render the selected pages of a document to a single tldraw file.
pub fn to_tldraw(doc: &Document, options: &RenderOptions) -> Result<RenderResult> {
    let pages = super::selected_pages(doc, options)?;
    let mut diagnostics = Diagnostics::new();

    let mut records = vec![json!({
        "id": "document:document",
        "typeName": "document",
        "gridSize": 10,
        "name": doc.metadata.title.clone().unwrap_or_default(),
        "meta": {},
    })];

    let mut shape_count = 0;
    for (position, page) in pages.iter().enumerate() {
        let page_id = format!("page:{}", page.number);
        records.push(json!({
            "id": page_id,
            "typeName": "page",
            "name": format!("Page {}", page.number),
            "index": index_key(position + 1),
            "meta": {},
        }));

        for shape in page_shapes(page, &page_id, options, &mut diagnostics) {
            records.push(serde_json::to_value(shape).map_err(tldraw_error)?);
            shape_count += 1;
        }
    }

    let sequences: Map<String, Value> = SEQUENCES
        .iter()
        .map(|(name, version)| (name.to_string(), Value::from(*version)))
        .collect();
    let file = json!({
        "tldrawFileFormatVersion": FILE_FORMAT_VERSION,
        "schema": {
            "schemaVersion": SCHEMA_VERSION,
            "sequences": sequences,
        },
        "records": records,
    });

    let text = match options.json_format {
        JsonFormat::Pretty => serde_json::to_string_pretty(&file),
        JsonFormat::Compact => serde_json::to_string(&file),
    }
    .map_err(tldraw_error)?;

    log::debug!(
        "Rendered {} pages to tldraw with {} shapes",
        pages.len(),
        shape_count
    );
    let output = Output::new(
        format!("{}.tldr", options.file_stem),
        "application/json",
        text.into_bytes(),
    );
    Ok(RenderResult::new(vec![output], diagnostics))
}

fn tldraw_error(e: serde_json::Error) -> Error {
    Error::Render(format!("tldraw serialization error: {}", e))
}

fn page_shapes(
    page: &Page,
    page_id: &str,
    options: &RenderOptions,
    diagnostics: &mut Diagnostics,
) -> Vec<ShapeRecord> {
    let canvas = paint_page(page, options, diagnostics);
    let mut shapes = Vec::new();

    for layer in &canvas.layers {
        for item in &layer.items {
            let n = shapes.len() + 1;
            let record = match &item.shape {
                Shape::Path(path) => {
                    stroke_at(page, layer.index, item.element).map(|s| draw_shape(s, path.opacity))
                }
                Shape::Dot(dot) => {
                    stroke_at(page, layer.index, item.element).map(|s| draw_shape(s, dot.opacity))
                }
                Shape::Text(line) => Some(text_shape(line, options)),
            };
            if let Some(mut record) = record {
                record.id = format!("shape:{}-{}", page.number, n);
                record.parent_id = page_id.to_string();
                record.index = index_key(n);
                shapes.push(record);
            }
        }
    }
    shapes
}

fn stroke_at(page: &Page, layer: usize, element: usize) -> Option<&Stroke> {
    match page.layers.get(layer)?.elements.get(element)? {
        Element::Stroke(stroke) => Some(stroke),
        _ => None,
    }
}

fn draw_shape(stroke: &Stroke, opacity: f32) -> ShapeRecord {
    let (ox, oy) = stroke.points.first().map_or((0.0, 0.0), |p| (p.x, p.y));
    let points = stroke
        .points
        .iter()
        .map(|p| DrawPoint {
            x: p.x - ox,
            y: p.y - oy,
            z: p.pressure.clamp(0.0, 1.0),
        })
        .collect();
    let highlight = stroke.pen == PenKind::Highlighter;

    let props = DrawProps {
        segments: vec![DrawSegment {
            kind: "free",
            points,
        }],
        color: color_name(stroke.color),
        fill: (!highlight).then_some("none"),
        dash: (!highlight).then_some("draw"),
        size: size_name(stroke.width),
        is_complete: true,
        is_closed: (!highlight).then_some(false),
        is_pen: true,
        scale: 1.0,
    };
    shape_record(
        if highlight { "highlight" } else { "draw" },
        ox,
        oy,
        opacity,
        ShapeProps::Draw(props),
    )
}

fn text_shape(line: &TextLine, options: &RenderOptions) -> ShapeRecord {
    let mut content = Vec::new();
    let mut width = 0.0;
    if let Some(marker) = line.marker.and_then(ParagraphKind::marker) {
        content.push(json!({ "type": "text", "text": marker }));
        width += options.layout.measure(marker, line.marker_style.size);
    }
    for span in &line.spans {
        width += options.layout.measure(&span.text, span.style.size);
        let mut marks = Vec::new();
        if span.style.weight == FontWeight::Bold {
            marks.push(json!({ "type": "bold" }));
        }
        if span.style.italic {
            marks.push(json!({ "type": "italic" }));
        }
        content.push(if marks.is_empty() {
            json!({ "type": "text", "text": span.text })
        } else {
            json!({ "type": "text", "text": span.text, "marks": marks })
        });
    }

    let props = TextProps {
        color: "black",
        size: match line.marker_style.paragraph {
            ParagraphKind::Heading => "l",
            ParagraphKind::Bullet2 => "s",
            _ => "m",
        },
        w: width,
        font: "sans",
        text_align: "start",
        auto_size: true,
        scale: 1.0,
        rich_text: json!({
            "type": "doc",
            "content": [{
                "type": "paragraph",
                "attrs": { "dir": "auto" },
                "content": content,
            }],
        }),
    };
    let top = line.baseline - line.marker_style.size;
    shape_record("text", line.x, top, 1.0, ShapeProps::Text(props))
}

fn shape_record(kind: &'static str, x: f32, y: f32, opacity: f32, props: ShapeProps) -> ShapeRecord {
    ShapeRecord {
        id: String::new(),
        type_name: "shape",
        kind,
        parent_id: String::new(),
        index: String::new(),
        x,
        y,
        rotation: 0.0,
        is_locked: false,
        opacity,
        meta: Map::new(),
        props,
    }
}

/// tldraw color name for a device color; colors off the palette draw black.
fn color_name(color: Color) -> &'static str {
    match color.device_id() {
        Some(1 | 8) => "grey",
        Some(2) => "white",
        Some(3 | 9 | 13) => "yellow",
        Some(4) => "green",
        Some(5) => "light-red",
        Some(6) => "blue",
        Some(7) => "red",
        Some(10) => "light-green",
        Some(11) => "light-blue",
        Some(12) => "light-violet",
        _ => "black",
    }
}

/// tldraw size bucket for a base width in device units.
fn size_name(width: f32) -> &'static str {
    if width <= 2.0 {
        "s"
    } else if width <= 4.0 {
        "m"
    } else if width <= 6.0 {
        "l"
    } else {
        "xl"
    }
}

/// Fractional index key for the `n`th item (1-based): `a1`..`az`, then
/// `b10`..`bzz`, and so on. Keys sort in the same order as `n`.
fn index_key(n: usize) -> String {
    let mut digits = Vec::new();
    let mut rest = n.max(1);
    while rest > 0 {
        digits.push(BASE62[rest % 62]);
        rest /= 62;
    }
    digits.reverse();
    let head = b'a' + (digits.len() as u8 - 1);
    let mut key = String::with_capacity(digits.len() + 1);
    key.push(char::from(head));
    key.extend(digits.into_iter().map(char::from));
    key
}
