//! Export of a Scene Model back into decoded-primitive shape.

use super::{
    DecodedItem, DecodedLayer, DecodedLine, DecodedNotebook, DecodedPage, DecodedPoint,
    DecodedRun, DecodedText, DecodedTextStyle,
};
use crate::builder::BuildOptions;
use crate::model::{Document, Element, Page, Point, Stroke, TextBlock, TextStyle, UnknownReason};
use std::f32::consts::TAU;

impl DecodedNotebook {
    /// Convert a Scene Model document into the decoder's primitive shape,
    /// ready for the external snapshot serializer.
    ///
    /// Coordinates are shifted back to the page-centered x origin and
    /// pressure and tilt return to their raw 0 to 255 ranges. The first text
    /// block of each page becomes the page's root text; a layer emptied by
    /// that move is dropped. Unknown elements come back as `Other` items.
    ///
    /// This inverts a build with default [`BuildOptions`].
    pub fn from_document(doc: &Document) -> Self {
        Self::from_document_with(doc, &BuildOptions::default())
    }

    /// Convert a document built with `options`, inverting its origin, page
    /// size default and width factor.
    pub fn from_document_with(doc: &Document, options: &BuildOptions) -> Self {
        let pages = doc
            .pages
            .iter()
            .map(|page| export_page(page, options))
            .collect();
        log::debug!("Exported {} pages to decoded primitives", doc.pages.len());
        Self {
            metadata: doc.metadata.clone(),
            pages,
        }
    }
}

fn export_page(page: &Page, options: &BuildOptions) -> DecodedPage {
    let center = if options.centered_origin {
        page.width / 2.0
    } else {
        0.0
    };
    let mut root_text = None;
    let mut layers = Vec::with_capacity(page.layers.len());

    for layer in &page.layers {
        let mut items = Vec::with_capacity(layer.elements.len());
        let mut hoisted = false;
        for element in &layer.elements {
            match element {
                Element::TextBlock(block) if root_text.is_none() => {
                    root_text = Some(export_text(block, center));
                    hoisted = true;
                }
                _ => items.push(export_element(element, center, options)),
            }
        }
        if hoisted && items.is_empty() {
            continue;
        }
        layers.push(DecodedLayer {
            label: layer.label.clone(),
            visible: layer.visible,
            items,
        });
    }

    let custom_size = page.width != options.page_width || page.height != options.page_height;
    DecodedPage {
        width: custom_size.then_some(page.width),
        height: custom_size.then_some(page.height),
        root_text,
        layers,
    }
}

fn export_element(element: &Element, center: f32, options: &BuildOptions) -> DecodedItem {
    match element {
        Element::Stroke(stroke) => DecodedItem::Line(export_stroke(stroke, center, options)),
        Element::TextBlock(block) => DecodedItem::Text(export_text(block, center)),
        Element::Unknown(unknown) => {
            let name = match &unknown.reason {
                UnknownReason::PenType { id } => format!("line/pen-{}", id),
                UnknownReason::Content { name } => name.clone(),
            };
            DecodedItem::Other {
                name,
                point_count: unknown.point_count,
            }
        }
    }
}

fn export_stroke(stroke: &Stroke, center: f32, options: &BuildOptions) -> DecodedLine {
    let (color, argb) = match stroke.color.device_id() {
        Some(id) => (id, None),
        None => (0, Some(stroke.color.to_argb())),
    };
    DecodedLine {
        tool: stroke.pen.device_id(),
        color,
        argb,
        thickness_scale: thickness(stroke.width, options.width_per_thickness),
        points: stroke
            .points
            .iter()
            .map(|p| export_point(p, center))
            .collect(),
    }
}

/// Device thickness for a base width; a factor that cannot be inverted
/// leaves the width as is.
fn thickness(width: f32, factor: f32) -> f32 {
    if factor.is_finite() && factor > 0.0 {
        width / factor
    } else {
        width
    }
}

fn export_point(point: &Point, center: f32) -> DecodedPoint {
    DecodedPoint {
        x: point.x - center,
        y: point.y,
        pressure: point.pressure * 255.0,
        speed: point.speed,
        direction: point.tilt.map(|t| t * 255.0 / TAU),
    }
}

fn export_text(block: &TextBlock, center: f32) -> DecodedText {
    let mut styles: Vec<DecodedTextStyle> = Vec::new();
    let mut runs = Vec::with_capacity(block.runs.len());

    for run in &block.runs {
        let entry = style_entry(&run.style);
        let index = match styles.iter().position(|s| *s == entry) {
            Some(i) => i,
            None => {
                styles.push(entry);
                styles.len() - 1
            }
        };
        let default_bold = TextStyle::for_paragraph(run.style.paragraph).is_bold();
        runs.push(DecodedRun {
            text: run.text.clone(),
            style: index,
            bold: (run.style.is_bold() != default_bold).then_some(run.style.is_bold()),
            italic: run.style.italic,
            line_break: run.line_break,
        });
    }

    if styles.is_empty() {
        styles.push(DecodedTextStyle::new(1));
    }

    DecodedText {
        pos_x: block.x - center,
        pos_y: block.y,
        width: block.width,
        styles,
        runs,
    }
}

fn style_entry(style: &TextStyle) -> DecodedTextStyle {
    let default_size = style.paragraph.default_size();
    DecodedTextStyle {
        paragraph: style.paragraph.device_id(),
        font_size: (style.size != default_size).then_some(style.size),
    }
}
