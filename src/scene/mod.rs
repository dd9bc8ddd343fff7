//! Decoded scene primitives.
//!
//! These types describe what the external snapshot decoder hands to the
//! converter: pages of layers holding groups, lines and text items in the
//! device's own coordinate conventions (x centered on the page, raw pressure
//! and tilt samples, style tables referenced by index). They are plain data
//! and deserialize from JSON so a decoder in any process can feed them in.
//!
//! The [`crate::builder`] module turns a [`DecodedNotebook`] into a
//! [`crate::model::Document`]; [`DecodedNotebook::from_document`] goes the
//! other way for the external serializer.

mod export;

use crate::error::Result;
use crate::model::Metadata;
use serde::{Deserialize, Serialize};

/// Everything decoded from one notebook snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedNotebook {
    /// Notebook metadata
    #[serde(default)]
    pub metadata: Metadata,

    /// Decoded pages in order
    pub pages: Vec<DecodedPage>,
}

impl DecodedNotebook {
    /// Create a notebook from pages.
    pub fn new(pages: Vec<DecodedPage>) -> Self {
        Self {
            metadata: Metadata::default(),
            pages,
        }
    }

    /// Parse a JSON dump produced by a decoder.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One decoded page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedPage {
    /// Canvas width override in device units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,

    /// Canvas height override in device units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,

    /// The page's root text item; group anchors refer into it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_text: Option<DecodedText>,

    /// Layers, bottom to top
    #[serde(default)]
    pub layers: Vec<DecodedLayer>,
}

impl DecodedPage {
    /// Create an empty page with the default canvas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root text.
    pub fn with_root_text(mut self, text: DecodedText) -> Self {
        self.root_text = Some(text);
        self
    }

    /// Append a layer.
    pub fn with_layer(mut self, layer: DecodedLayer) -> Self {
        self.layers.push(layer);
        self
    }
}

/// A decoded top-level layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedLayer {
    /// Layer label
    #[serde(default)]
    pub label: String,

    /// Visibility flag
    #[serde(default = "default_visible")]
    pub visible: bool,

    /// Items in painter's order
    #[serde(default)]
    pub items: Vec<DecodedItem>,
}

fn default_visible() -> bool {
    true
}

impl DecodedLayer {
    /// Create a visible, empty layer.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            visible: true,
            items: Vec::new(),
        }
    }

    /// Append an item.
    pub fn with_item(mut self, item: DecodedItem) -> Self {
        self.items.push(item);
        self
    }
}

/// A decoded scene item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecodedItem {
    /// A group whose children share a coordinate frame
    Group(DecodedGroup),
    /// A pen stroke
    Line(DecodedLine),
    /// A text item
    Text(DecodedText),
    /// Any item type the decoder knows but this converter does not model
    Other {
        /// Source type name
        name: String,
        /// Number of point samples the item carried
        #[serde(default)]
        point_count: usize,
    },
}

/// A decoded group and its coordinate frame.
///
/// Child coordinates are mapped first by `matrix`, then translated by the
/// resolved anchor (or by `translate` when there is no anchor), then by the
/// enclosing frames.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedGroup {
    /// Group label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Anchor into the page's root text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<DecodedAnchor>,

    /// Plain translation, used when there is no anchor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate: Option<[f32; 2]>,

    /// Affine matrix `[a, b, c, d, e, f]`: x' = a x + c y + e, y' = b x + d y + f
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<[f32; 6]>,

    /// Child items
    #[serde(default)]
    pub children: Vec<DecodedItem>,
}

/// A group's attachment to a character of the root text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecodedAnchor {
    /// Character offset into the root text (breaks count as one character)
    pub text_offset: usize,

    /// Horizontal origin of the group in device coordinates
    pub origin_x: f32,
}

/// A decoded stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedLine {
    /// Device pen id
    pub tool: u32,

    /// Device palette color id
    pub color: u32,

    /// Explicit 0xAARRGGBB color overriding the palette
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argb: Option<u32>,

    /// Device thickness setting
    pub thickness_scale: f32,

    /// Point samples in drawing order
    #[serde(default)]
    pub points: Vec<DecodedPoint>,
}

impl DecodedLine {
    /// Create a line without points.
    pub fn new(tool: u32, color: u32, thickness_scale: f32) -> Self {
        Self {
            tool,
            color,
            argb: None,
            thickness_scale,
            points: Vec::new(),
        }
    }

    /// Replace the point list.
    pub fn with_points(mut self, points: Vec<DecodedPoint>) -> Self {
        self.points = points;
        self
    }
}

/// A raw point sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecodedPoint {
    /// X in device coordinates (page-centered)
    pub x: f32,

    /// Y in device coordinates
    pub y: f32,

    /// Raw pressure, 0 to 255
    pub pressure: f32,

    /// Raw speed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,

    /// Raw direction, 0 to 255 for a full turn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<f32>,
}

impl DecodedPoint {
    /// Create a point without motion samples.
    pub fn new(x: f32, y: f32, pressure: f32) -> Self {
        Self {
            x,
            y,
            pressure,
            speed: None,
            direction: None,
        }
    }

    /// Attach raw speed and direction.
    pub fn with_motion(mut self, speed: f32, direction: f32) -> Self {
        self.speed = Some(speed);
        self.direction = Some(direction);
        self
    }
}

/// A decoded text item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedText {
    /// Left edge in device coordinates (page-centered)
    pub pos_x: f32,

    /// Top edge in device coordinates
    pub pos_y: f32,

    /// Bounding width
    pub width: f32,

    /// Style table referenced by runs
    #[serde(default)]
    pub styles: Vec<DecodedTextStyle>,

    /// Runs in source order
    #[serde(default)]
    pub runs: Vec<DecodedRun>,
}

impl DecodedText {
    /// Create a text item with a single plain style.
    pub fn new(pos_x: f32, pos_y: f32, width: f32) -> Self {
        Self {
            pos_x,
            pos_y,
            width,
            styles: vec![DecodedTextStyle::new(1)],
            runs: Vec::new(),
        }
    }

    /// Append a run.
    pub fn with_run(mut self, run: DecodedRun) -> Self {
        self.runs.push(run);
        self
    }
}

/// An entry of a text item's style table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecodedTextStyle {
    /// Device paragraph style id
    pub paragraph: u32,

    /// Font size override in device units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
}

impl DecodedTextStyle {
    /// Create a style entry for a device paragraph id.
    pub fn new(paragraph: u32) -> Self {
        Self {
            paragraph,
            font_size: None,
        }
    }
}

/// A decoded text run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedRun {
    /// Run text; may contain embedded line breaks
    pub text: String,

    /// Index into the owning text item's style table
    #[serde(default)]
    pub style: usize,

    /// Explicit weight; `None` uses the paragraph style's weight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,

    /// Italic formatting
    #[serde(default)]
    pub italic: bool,

    /// The source inserted a line break after this run
    #[serde(default)]
    pub line_break: bool,
}

impl DecodedRun {
    /// Create a run using style 0.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: 0,
            bold: None,
            italic: false,
            line_break: false,
        }
    }

    /// Use another style table entry.
    pub fn with_style(mut self, style: usize) -> Self {
        self.style = style;
        self
    }

    /// Mark a line break after this run.
    pub fn with_break(mut self) -> Self {
        self.line_break = true;
        self
    }
}
