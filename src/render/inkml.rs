//! Ink-interchange (InkML) rendering.
//!
//! Produces two coordinated outputs: an InkML document carrying every
//! stroke's raw geometry (coordinates, pressure and, where present, tilt and
//! speed written without rounding) and an optional plain-text companion.
//! Both carry the same [`Manifest`] so a downstream consumer can pair them
//! back into one logical page.

use super::diagnostics::{DiagnosticKind, Diagnostics, Location};
use super::options::RenderOptions;
use super::pen::{LineCap, PenProfile};
use super::result::{Manifest, Output, RenderResult};
use super::svg::escape;
use super::text::plain_text;
use crate::error::{Error, Result};
use crate::model::{Color, Document, Element, ElementCounts, Page, PenKind, Stroke};
use md5::{Digest, Md5};
use std::fmt::{self, Write};

const PRESSURE_CONTEXT: &str = "ctxPressure";
const MOTION_CONTEXT: &str = "ctxMotion";

/// Render the selected pages of a document to InkML plus a text companion.
pub fn to_inkml(doc: &Document, options: &RenderOptions) -> Result<RenderResult> {
    let pages = super::selected_pages(doc, options)?;
    let manifest = Manifest {
        document_id: document_id(doc)?,
        counts: count_elements(&pages),
    };

    let mut diagnostics = Diagnostics::new();
    let mut writer = InkWriter::new(options);
    let mut xml = String::new();
    writer
        .write_document(&mut xml, &pages, &manifest, &mut diagnostics)
        .map_err(|e| Error::Render(format!("InkML formatting error: {}", e)))?;

    let mut outputs = vec![Output::new(
        format!("{}.inkml", options.file_stem),
        "application/inkml+xml",
        xml.into_bytes(),
    )
    .with_manifest(manifest.clone())];

    if options.text_companion {
        let text = plain_text(doc, options)?;
        outputs.push(
            Output::new(
                format!("{}.txt", options.file_stem),
                "text/plain",
                text.into_bytes(),
            )
            .with_manifest(manifest),
        );
    }

    log::debug!(
        "Rendered {} traces with {} brushes to InkML",
        writer.trace_count,
        writer.brushes.len()
    );
    Ok(RenderResult::new(outputs, diagnostics))
}

/// Stable identifier of a document: its metadata id, or the MD5 of its
/// JSON serialization.
pub fn document_id(doc: &Document) -> Result<String> {
    if let Some(id) = &doc.metadata.id {
        return Ok(id.clone());
    }
    let bytes = serde_json::to_vec(doc)
        .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))?;
    Ok(format!("{:x}", Md5::digest(&bytes)))
}

fn count_elements(pages: &[&Page]) -> ElementCounts {
    let mut counts = ElementCounts::default();
    for element in pages.iter().flat_map(|p| p.elements()) {
        match element {
            Element::Stroke(_) => counts.strokes += 1,
            Element::TextBlock(_) => counts.text_blocks += 1,
            Element::Unknown(_) => counts.unknown += 1,
        }
    }
    counts
}

/// Brush identity: one brush per distinct pen look.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Brush {
    pen: PenKind,
    color: Color,
    width: f32,
    opacity: f32,
    cap: LineCap,
    ignore_pressure: bool,
}

impl Brush {
    fn for_stroke(stroke: &Stroke, profile: &PenProfile) -> Self {
        Self {
            pen: stroke.pen,
            color: stroke.color,
            width: stroke.width * profile.width_scale,
            opacity: (profile.opacity * stroke.color.alpha()).clamp(0.0, 1.0),
            cap: profile.cap,
            ignore_pressure: !profile.is_pressure_sensitive(),
        }
    }

    fn raster_op(&self) -> &'static str {
        match self.pen {
            PenKind::Highlighter | PenKind::Shader => "maskPen",
            PenKind::Eraser | PenKind::EraseArea => "noOperation",
            _ => "copyPen",
        }
    }

    fn tip(&self) -> &'static str {
        match self.cap {
            LineCap::Square | LineCap::Butt => "rectangle",
            LineCap::Round => "ellipse",
        }
    }
}

struct InkWriter<'a> {
    options: &'a RenderOptions,
    brushes: Vec<Brush>,
    trace_count: usize,
}

impl<'a> InkWriter<'a> {
    fn new(options: &'a RenderOptions) -> Self {
        Self {
            options,
            brushes: Vec::new(),
            trace_count: 0,
        }
    }

    fn brush_index(&mut self, brush: Brush) -> usize {
        match self.brushes.iter().position(|b| *b == brush) {
            Some(i) => i,
            None => {
                self.brushes.push(brush);
                self.brushes.len() - 1
            }
        }
    }

    fn write_document(
        &mut self,
        out: &mut String,
        pages: &[&Page],
        manifest: &Manifest,
        diagnostics: &mut Diagnostics,
    ) -> fmt::Result {
        // Traces first, so the brush table is known before definitions.
        let mut groups = String::new();
        for page in pages {
            self.write_page(&mut groups, page, diagnostics)?;
        }

        writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(out, r#"<inkml:ink xmlns:inkml="http://www.w3.org/2003/InkML">"#)?;
        writeln!(
            out,
            r#"  <inkml:annotation type="documentID">{}</inkml:annotation>"#,
            escape(&manifest.document_id)
        )?;
        writeln!(
            out,
            r#"  <inkml:annotation type="strokeCount">{}</inkml:annotation>"#,
            manifest.counts.strokes
        )?;
        writeln!(
            out,
            r#"  <inkml:annotation type="textBlockCount">{}</inkml:annotation>"#,
            manifest.counts.text_blocks
        )?;
        self.write_definitions(out)?;
        out.push_str(&groups);
        writeln!(out, "</inkml:ink>")
    }

    fn write_definitions(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "  <inkml:definitions>")?;
        write_context(out, PRESSURE_CONTEXT, &["X", "Y", "F"])?;
        write_context(out, MOTION_CONTEXT, &["X", "Y", "F", "OA", "V"])?;
        for (i, brush) in self.brushes.iter().enumerate() {
            writeln!(out, r#"    <inkml:brush xml:id="brush{}">"#, i + 1)?;
            let properties = [
                ("width", format!("{}", brush.width)),
                ("height", format!("{}", brush.width)),
                ("color", brush.color.to_hex()),
                ("transparency", format!("{}", 1.0 - brush.opacity)),
                ("tip", brush.tip().to_string()),
                ("rasterOp", brush.raster_op().to_string()),
                ("ignorePressure", brush.ignore_pressure.to_string()),
                ("antiAliased", "true".to_string()),
                ("fitToCurve", "false".to_string()),
            ];
            for (name, value) in properties {
                writeln!(
                    out,
                    r#"      <inkml:brushProperty name="{}" value="{}"/>"#,
                    name, value
                )?;
            }
            writeln!(
                out,
                r#"      <inkml:annotation type="pen">{}</inkml:annotation>"#,
                brush.pen.name()
            )?;
            writeln!(out, "    </inkml:brush>")?;
        }
        writeln!(out, "  </inkml:definitions>")
    }

    fn write_page(
        &mut self,
        out: &mut String,
        page: &Page,
        diagnostics: &mut Diagnostics,
    ) -> fmt::Result {
        writeln!(
            out,
            r#"  <inkml:traceGroup xml:id="page{}">"#,
            page.number
        )?;
        for (layer_index, layer) in page.layers.iter().enumerate() {
            for (element_index, element) in layer.elements.iter().enumerate() {
                match element {
                    Element::Stroke(stroke) => self.write_trace(out, stroke)?,
                    Element::TextBlock(_) => {}
                    Element::Unknown(unknown) => diagnostics.push(
                        DiagnosticKind::UnsupportedElement,
                        Location::element(page.number, layer_index, element_index),
                        format!("no ink geometry written for {}", unknown.reason),
                    ),
                }
            }
        }
        writeln!(out, "  </inkml:traceGroup>")
    }

    fn write_trace(&mut self, out: &mut String, stroke: &Stroke) -> fmt::Result {
        let profile = self.options.pen_profile(stroke.pen);
        let brush = self.brush_index(Brush::for_stroke(stroke, &profile)) + 1;
        let with_motion = !stroke.is_empty() && stroke.points.iter().all(|p| p.has_motion());
        let context = if with_motion {
            MOTION_CONTEXT
        } else {
            PRESSURE_CONTEXT
        };

        self.trace_count += 1;
        write!(
            out,
            r##"    <inkml:trace xml:id="t{}" contextRef="#{}" brushRef="#brush{}">"##,
            self.trace_count, context, brush
        )?;
        for (i, p) in stroke.points.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            write!(out, "{} {} {}", p.x, p.y, p.pressure)?;
            if let (true, Some(tilt), Some(speed)) = (with_motion, p.tilt, p.speed) {
                write!(out, " {} {}", tilt, speed)?;
            }
        }
        writeln!(out, "</inkml:trace>")
    }
}

fn write_context(out: &mut String, id: &str, channels: &[&str]) -> fmt::Result {
    writeln!(out, r#"    <inkml:context xml:id="{}">"#, id)?;
    writeln!(out, r#"      <inkml:inkSource xml:id="{}Source">"#, id)?;
    writeln!(out, "        <inkml:traceFormat>")?;
    for channel in channels {
        let units = match *channel {
            "X" | "Y" => r#" units="dev""#,
            "OA" => r#" units="rad""#,
            _ => "",
        };
        writeln!(
            out,
            r#"          <inkml:channel name="{}" type="decimal"{}/>"#,
            channel, units
        )?;
    }
    writeln!(out, "        </inkml:traceFormat>")?;
    writeln!(out, "      </inkml:inkSource>")?;
    writeln!(out, "    </inkml:context>")
}
