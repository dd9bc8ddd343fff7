//! Vector graphics (SVG) rendering.
//!
//! One SVG document per page. The `viewBox` is in device units so every
//! coordinate is written exactly as stored in the Scene Model; `width` and
//! `height` carry the scaled output size.

use super::canvas::{paint_page, Canvas, Shape, TextLine};
use super::diagnostics::Diagnostics;
use super::options::RenderOptions;
use super::result::{Output, RenderResult};
use super::stroke::{RenderedDot, RenderedPath, SegmentShape};
use crate::error::{Error, Result};
use crate::model::{Document, Page};
use std::fmt::{self, Write};

pub(crate) const FONT_FAMILY: &str = "Helvetica, Arial, sans-serif";

/// Render the selected pages of a document to SVG, one output per page.
pub fn to_svg(doc: &Document, options: &RenderOptions) -> Result<RenderResult> {
    let pages = super::selected_pages(doc, options)?;
    let mut diagnostics = Diagnostics::new();
    let mut outputs = Vec::with_capacity(pages.len());

    for page in &pages {
        let svg = render_page(page, options, &mut diagnostics)?;
        let name = if pages.len() == 1 {
            format!("{}.svg", options.file_stem)
        } else {
            format!("{}-{}.svg", options.file_stem, page.number)
        };
        outputs.push(Output::new(name, "image/svg+xml", svg.into_bytes()));
    }

    log::debug!("Rendered {} pages to SVG", outputs.len());
    Ok(RenderResult::new(outputs, diagnostics))
}

/// Render one page to an SVG string.
pub fn render_page(
    page: &Page,
    options: &RenderOptions,
    diagnostics: &mut Diagnostics,
) -> Result<String> {
    let canvas = paint_page(page, options, diagnostics);
    let mut out = String::new();
    write_canvas(&mut out, &canvas, options)
        .map_err(|e| Error::Render(format!("SVG formatting error: {}", e)))?;
    Ok(out)
}

fn write_canvas(out: &mut String, canvas: &Canvas, options: &RenderOptions) -> fmt::Result {
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        num(canvas.width * options.scale),
        num(canvas.height * options.scale),
        num(canvas.width),
        num(canvas.height)
    )?;
    if options.background {
        writeln!(
            out,
            r#"  <rect x="0" y="0" width="{}" height="{}" fill="white"/>"#,
            num(canvas.width),
            num(canvas.height)
        )?;
    }

    for layer in &canvas.layers {
        writeln!(
            out,
            r#"  <g id="layer-{}" data-label="{}">"#,
            layer.index + 1,
            escape(&layer.label)
        )?;
        for item in &layer.items {
            match &item.shape {
                Shape::Path(path) => write_path(out, path)?,
                Shape::Dot(dot) => write_dot(out, dot)?,
                Shape::Text(line) => write_text(out, line)?,
            }
        }
        writeln!(out, "  </g>")?;
    }

    writeln!(out, "</svg>")
}

fn write_path(out: &mut String, path: &RenderedPath) -> fmt::Result {
    let mut d = String::new();
    if let Some(first) = path.segments.first() {
        write!(d, "M{},{}", num(first.from.0), num(first.from.1))?;
    }
    for segment in &path.segments {
        match segment.shape {
            SegmentShape::Line => write!(d, " L{},{}", num(segment.to.0), num(segment.to.1))?,
            SegmentShape::Cubic(c1, c2) => write!(
                d,
                " C{},{} {},{} {},{}",
                num(c1.0),
                num(c1.1),
                num(c2.0),
                num(c2.1),
                num(segment.to.0),
                num(segment.to.1)
            )?,
        }
    }

    write!(
        out,
        r#"    <path d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linecap="{}" stroke-linejoin="round""#,
        d,
        path.color.to_hex(),
        num(path.mean_width()),
        path.cap.svg_name()
    )?;
    if path.opacity < 1.0 {
        write!(out, r#" stroke-opacity="{}""#, num(path.opacity))?;
    }
    if !path.has_uniform_width() {
        let widths: Vec<String> = path.widths().into_iter().map(num).collect();
        write!(out, r#" data-widths="{}""#, widths.join(" "))?;
    }
    writeln!(out, r#" data-pen="{}"/>"#, path.pen.name())
}

fn write_dot(out: &mut String, dot: &RenderedDot) -> fmt::Result {
    write!(
        out,
        r#"    <circle cx="{}" cy="{}" r="{}" fill="{}""#,
        num(dot.center.0),
        num(dot.center.1),
        num(dot.radius),
        dot.color.to_hex()
    )?;
    if dot.opacity < 1.0 {
        write!(out, r#" fill-opacity="{}""#, num(dot.opacity))?;
    }
    writeln!(out, r#" data-pen="{}"/>"#, dot.pen.name())
}

fn write_text(out: &mut String, line: &TextLine) -> fmt::Result {
    write!(
        out,
        r#"    <text x="{}" y="{}" font-family="{}" font-size="{}" fill="black" xml:space="preserve">"#,
        num(line.x),
        num(line.baseline),
        FONT_FAMILY,
        num(line.marker_style.size)
    )?;
    if let Some(marker) = line.marker.and_then(|kind| kind.marker()) {
        write!(out, "<tspan>{}</tspan>", escape(marker))?;
    }
    for span in &line.spans {
        out.push_str("<tspan");
        if span.style.size != line.marker_style.size {
            write!(out, r#" font-size="{}""#, num(span.style.size))?;
        }
        if span.style.is_bold() {
            out.push_str(r#" font-weight="bold""#);
        }
        if span.style.italic {
            out.push_str(r#" font-style="italic""#);
        }
        write!(out, ">{}</tspan>", escape(&span.text))?;
    }
    writeln!(out, "</text>")
}

/// Format a number with at most three decimals and no trailing zeros.
pub(crate) fn num(value: f32) -> String {
    let s = format!("{:.3}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Escape text for XML content and attribute values.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r') => {}
            c => out.push(c),
        }
    }
    out
}
