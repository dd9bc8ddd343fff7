//! Paginated document (PDF) rendering.
//!
//! Draws the same [`Canvas`] as the SVG emitter, one PDF page per Scene
//! Model page. The page's content stream flips the y axis once so all
//! geometry is written in device units; each path segment is stroked with
//! its own width. Text uses the standard Helvetica family with WinAnsi
//! encoding; characters outside that encoding are written as `?` and
//! reported as [`DiagnosticKind::EmitFailure`].

use super::canvas::{paint_page, Canvas, Shape, TextLine};
use super::diagnostics::{DiagnosticKind, Diagnostics, Location};
use super::options::RenderOptions;
use super::result::{Output, RenderResult};
use super::stroke::{RenderedDot, RenderedPath, SegmentShape, Vec2};
use crate::error::{Error, Result};
use crate::model::{Color, Document, Metadata, ParagraphKind, TextStyle};
use chrono::{DateTime, Utc};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Object, ObjectId, Stream, StringFormat};
use std::collections::BTreeMap;

const PRODUCER: &str = concat!("rmink ", env!("CARGO_PKG_VERSION"));

/// Bezier circle constant.
const KAPPA: f32 = 0.552_284_8;

/// Render the selected pages of a document to a single PDF.
pub fn to_pdf(doc: &Document, options: &RenderOptions) -> Result<RenderResult> {
    let pages = super::selected_pages(doc, options)?;
    let mut diagnostics = Diagnostics::new();
    let mut pdf = lopdf::Document::with_version("1.5");

    let pages_id = pdf.new_object_id();
    let fonts = FontSet::register(&mut pdf);
    let mut kids = Vec::with_capacity(pages.len());

    for page in &pages {
        let canvas = paint_page(page, options, &mut diagnostics);
        let mut painter = PagePainter::new(&canvas, options);
        painter.paint(&canvas, &mut diagnostics);

        let content = Content {
            operations: painter.ops,
        }
        .encode()
        .map_err(|e| Error::Render(format!("PDF content error: {}", e)))?;
        let content_id = pdf.add_object(Stream::new(dictionary! {}, content));

        let mut resources = dictionary! {
            "Font" => fonts.resource_dict(),
        };
        if !painter.opacities.is_empty() {
            let mut states = Dictionary::new();
            for (key, alpha) in &painter.opacities {
                states.set(
                    gs_name(*key),
                    dictionary! {
                        "Type" => "ExtGState",
                        "CA" => *alpha,
                        "ca" => *alpha,
                    },
                );
            }
            resources.set("ExtGState", states);
        }

        let media_box: Vec<Object> = vec![
            0.into(),
            0.into(),
            (canvas.width * options.scale).into(),
            (canvas.height * options.scale).into(),
        ];
        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => media_box,
            "Resources" => resources,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = pdf.add_object(info_dict(&doc.metadata));
    pdf.trailer.set("Root", catalog_id);
    pdf.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    pdf.save_to(&mut bytes)
        .map_err(|e| Error::Render(format!("PDF serialization error: {}", e)))?;

    log::debug!("Rendered {} pages to PDF ({} bytes)", count, bytes.len());
    let output = Output::new(
        format!("{}.pdf", options.file_stem),
        "application/pdf",
        bytes,
    );
    Ok(RenderResult::new(vec![output], diagnostics))
}

/// The four standard Helvetica faces.
struct FontSet {
    ids: [ObjectId; 4],
}

impl FontSet {
    const FACES: [&'static str; 4] = [
        "Helvetica",
        "Helvetica-Bold",
        "Helvetica-Oblique",
        "Helvetica-BoldOblique",
    ];

    fn register(pdf: &mut lopdf::Document) -> Self {
        let ids = Self::FACES.map(|face| {
            pdf.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => face,
                "Encoding" => "WinAnsiEncoding",
            })
        });
        Self { ids }
    }

    fn resource_dict(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        for (i, id) in self.ids.iter().enumerate() {
            dict.set(format!("F{}", i + 1), Object::Reference(*id));
        }
        dict
    }

    /// Resource name of the face for a style.
    fn resource_name(style: &TextStyle) -> &'static str {
        match (style.is_bold(), style.italic) {
            (false, false) => "F1",
            (true, false) => "F2",
            (false, true) => "F3",
            (true, true) => "F4",
        }
    }
}

/// Content-stream builder for one page.
struct PagePainter {
    ops: Vec<Operation>,
    /// Graphics states in use, keyed by opacity in thousandths
    opacities: BTreeMap<u32, f32>,
}

impl PagePainter {
    fn new(canvas: &Canvas, options: &RenderOptions) -> Self {
        let s = options.scale;
        let mut ops = vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    s.into(),
                    0.into(),
                    0.into(),
                    (-s).into(),
                    0.into(),
                    (canvas.height * s).into(),
                ],
            ),
        ];
        if options.background {
            ops.push(Operation::new("g", vec![1.into()]));
            ops.push(Operation::new(
                "re",
                vec![0.into(), 0.into(), canvas.width.into(), canvas.height.into()],
            ));
            ops.push(Operation::new("f", vec![]));
        }
        Self {
            ops,
            opacities: BTreeMap::new(),
        }
    }

    fn paint(&mut self, canvas: &Canvas, diagnostics: &mut Diagnostics) {
        for layer in &canvas.layers {
            for item in &layer.items {
                match &item.shape {
                    Shape::Path(path) => self.path(path),
                    Shape::Dot(dot) => self.dot(dot),
                    Shape::Text(line) => {
                        let replaced = self.text(line);
                        if replaced > 0 {
                            diagnostics.push(
                                DiagnosticKind::EmitFailure,
                                Location::element(canvas.page, layer.index, item.element),
                                format!(
                                    "replaced {} characters outside WinAnsi encoding with '?'",
                                    replaced
                                ),
                            );
                        }
                    }
                }
            }
        }
        self.op("Q", vec![]);
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.ops.push(Operation::new(operator, operands));
    }

    fn point_op(&mut self, operator: &str, points: &[Vec2]) {
        let operands = points
            .iter()
            .flat_map(|&(x, y)| [Object::from(x), Object::from(y)])
            .collect();
        self.op(operator, operands);
    }

    fn opacity(&mut self, opacity: f32) {
        if opacity >= 1.0 {
            return;
        }
        let key = (opacity * 1000.0).round() as u32;
        self.opacities.insert(key, key as f32 / 1000.0);
        self.op("gs", vec![Object::Name(gs_name(key).into_bytes())]);
    }

    fn color(&mut self, operator: &str, color: Color) {
        let (r, g, b) = color.rgb_fractions();
        self.op(operator, vec![r.into(), g.into(), b.into()]);
    }

    fn path(&mut self, path: &RenderedPath) {
        self.op("q", vec![]);
        self.opacity(path.opacity);
        self.color("RG", path.color);
        self.op("J", vec![path.cap.pdf_style().into()]);
        self.op("j", vec![1.into()]);
        for segment in &path.segments {
            self.op("w", vec![segment.width.into()]);
            self.point_op("m", &[segment.from]);
            match segment.shape {
                SegmentShape::Line => self.point_op("l", &[segment.to]),
                SegmentShape::Cubic(c1, c2) => self.point_op("c", &[c1, c2, segment.to]),
            }
            self.op("S", vec![]);
        }
        self.op("Q", vec![]);
    }

    fn dot(&mut self, dot: &RenderedDot) {
        let (cx, cy) = dot.center;
        let r = dot.radius;
        let k = r * KAPPA;
        self.op("q", vec![]);
        self.opacity(dot.opacity);
        self.color("rg", dot.color);
        self.point_op("m", &[(cx + r, cy)]);
        self.point_op("c", &[(cx + r, cy + k), (cx + k, cy + r), (cx, cy + r)]);
        self.point_op("c", &[(cx - k, cy + r), (cx - r, cy + k), (cx - r, cy)]);
        self.point_op("c", &[(cx - r, cy - k), (cx - k, cy - r), (cx, cy - r)]);
        self.point_op("c", &[(cx + k, cy - r), (cx + r, cy - k), (cx + r, cy)]);
        self.op("f", vec![]);
        self.op("Q", vec![]);
    }

    /// Draw a text line; returns how many characters were replaced.
    fn text(&mut self, line: &TextLine) -> usize {
        let mut replaced = 0;
        self.op("BT", vec![]);
        self.op("g", vec![0.into()]);
        self.op(
            "Tm",
            vec![
                1.into(),
                0.into(),
                0.into(),
                (-1).into(),
                line.x.into(),
                line.baseline.into(),
            ],
        );
        if let Some(marker) = line.marker.and_then(pdf_marker) {
            self.show(marker, &line.marker_style);
        }
        for span in &line.spans {
            replaced += self.show(&span.text, &span.style);
        }
        self.op("ET", vec![]);
        replaced
    }

    fn show(&mut self, text: &str, style: &TextStyle) -> usize {
        let (bytes, replaced) = win_ansi(text);
        self.op(
            "Tf",
            vec![
                Object::Name(FontSet::resource_name(style).as_bytes().to_vec()),
                style.size.into(),
            ],
        );
        self.op("Tj", vec![Object::String(bytes, StringFormat::Literal)]);
        replaced
    }
}

fn gs_name(key: u32) -> String {
    format!("GS{}", key)
}

/// Paragraph markers written with WinAnsi characters.
fn pdf_marker(kind: ParagraphKind) -> Option<&'static str> {
    match kind {
        ParagraphKind::Bullet => Some("\u{2022} "),
        ParagraphKind::Bullet2 => Some("- "),
        ParagraphKind::Checkbox => Some("[ ] "),
        ParagraphKind::CheckboxChecked => Some("[x] "),
        _ => None,
    }
}

/// Encode text as WinAnsi bytes; returns the bytes and the number of
/// characters replaced with `?`.
fn win_ansi(text: &str) -> (Vec<u8>, usize) {
    let mut bytes = Vec::with_capacity(text.len());
    let mut replaced = 0;
    for c in text.chars() {
        let code = match c as u32 {
            0x20..=0x7e | 0xa0..=0xff => Some(c as u32 as u8),
            _ => match c {
                '\u{20ac}' => Some(0x80),
                '\u{201a}' => Some(0x82),
                '\u{0192}' => Some(0x83),
                '\u{201e}' => Some(0x84),
                '\u{2026}' => Some(0x85),
                '\u{2020}' => Some(0x86),
                '\u{2021}' => Some(0x87),
                '\u{02c6}' => Some(0x88),
                '\u{2030}' => Some(0x89),
                '\u{0160}' => Some(0x8a),
                '\u{2039}' => Some(0x8b),
                '\u{0152}' => Some(0x8c),
                '\u{017d}' => Some(0x8e),
                '\u{2018}' => Some(0x91),
                '\u{2019}' => Some(0x92),
                '\u{201c}' => Some(0x93),
                '\u{201d}' => Some(0x94),
                '\u{2022}' => Some(0x95),
                '\u{2013}' => Some(0x96),
                '\u{2014}' => Some(0x97),
                '\u{02dc}' => Some(0x98),
                '\u{2122}' => Some(0x99),
                '\u{0161}' => Some(0x9a),
                '\u{203a}' => Some(0x9b),
                '\u{0153}' => Some(0x9c),
                '\u{017e}' => Some(0x9e),
                '\u{0178}' => Some(0x9f),
                '\t' => Some(b' '),
                _ => None,
            },
        };
        match code {
            Some(b) => bytes.push(b),
            None => {
                bytes.push(b'?');
                replaced += 1;
            }
        }
    }
    (bytes, replaced)
}

fn info_dict(metadata: &Metadata) -> Dictionary {
    let mut info = dictionary! {
        "Producer" => Object::string_literal(PRODUCER),
    };
    if let Some(title) = &metadata.title {
        info.set("Title", text_string(title));
    }
    if let Some(created) = metadata.created {
        info.set("CreationDate", pdf_date(created));
    }
    if let Some(modified) = metadata.modified {
        info.set("ModDate", pdf_date(modified));
    }
    info
}

/// PDF text string: literal for ASCII, UTF-16BE with a byte order mark
/// otherwise.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xfe, 0xff];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn pdf_date(date: DateTime<Utc>) -> Object {
    Object::string_literal(date.format("D:%Y%m%d%H%M%SZ").to_string())
}
