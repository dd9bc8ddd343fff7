//! Page, layer and element types.

use super::{Stroke, TextBlock};
use serde::{Deserialize, Serialize};

/// Device canvas width in device units.
pub(crate) const DEVICE_WIDTH: f32 = 1404.0;

/// Device canvas height in device units.
pub(crate) const DEVICE_HEIGHT: f32 = 1872.0;

/// A single page: a fixed canvas with layers in painter's order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Canvas width in device units
    pub width: f32,

    /// Canvas height in device units
    pub height: f32,

    /// Layers, bottom to top
    pub layers: Vec<Layer>,
}

impl Page {
    /// Create a new page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            layers: Vec::new(),
        }
    }

    /// Create a page with the device's native canvas size.
    pub fn remarkable(number: u32) -> Self {
        Self::new(number, DEVICE_WIDTH, DEVICE_HEIGHT)
    }

    /// Add a layer on top of the existing ones.
    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Check if the page has no elements in any layer.
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(|l| l.elements.is_empty())
    }

    /// Get the number of layers on the page.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Get page dimensions as (width, height) tuple.
    pub fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Iterate over every element of every layer, bottom to top.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.layers.iter().flat_map(|l| l.elements.iter())
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::remarkable(1)
    }
}

/// An ordered group of elements with a visibility flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Layer label shown by the device
    pub label: String,

    /// Hidden layers are skipped by visual output but still yield text
    pub visible: bool,

    /// Elements in painter's order
    pub elements: Vec<Element>,
}

impl Layer {
    /// Create a new visible layer.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            visible: true,
            elements: Vec::new(),
        }
    }

    /// Mark the layer hidden.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Append an element.
    pub fn add_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Append a stroke.
    pub fn add_stroke(&mut self, stroke: Stroke) {
        self.elements.push(Element::Stroke(stroke));
    }

    /// Append a text block.
    pub fn add_text_block(&mut self, block: TextBlock) {
        self.elements.push(Element::TextBlock(block));
    }
}

/// A drawable element on a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    /// A pen stroke
    Stroke(Stroke),

    /// A text box
    TextBlock(TextBlock),

    /// An element the builder could not classify, kept for diagnostics
    Unknown(UnknownElement),
}

impl Element {
    /// Check if this element is a stroke.
    pub fn is_stroke(&self) -> bool {
        matches!(self, Element::Stroke(_))
    }

    /// Check if this element is a text block.
    pub fn is_text_block(&self) -> bool {
        matches!(self, Element::TextBlock(_))
    }

    /// Short variant name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Stroke(_) => "stroke",
            Element::TextBlock(_) => "text block",
            Element::Unknown(_) => "unknown",
        }
    }
}

/// A preserved record of an element the builder did not recognize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnknownElement {
    /// Why the element could not be classified
    pub reason: UnknownReason,

    /// Number of point samples the source element carried
    pub point_count: usize,
}

/// Cause of an [`UnknownElement`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnknownReason {
    /// A stroke whose device pen id has no known pen kind
    PenType {
        /// Raw device pen id
        id: u32,
    },
    /// A scene item of a content type this model does not represent
    Content {
        /// Source type name
        name: String,
    },
}

impl std::fmt::Display for UnknownReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnknownReason::PenType { id } => write!(f, "unsupported pen type {}", id),
            UnknownReason::Content { name } => write!(f, "unsupported content '{}'", name),
        }
    }
}
