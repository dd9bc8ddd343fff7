//! Model Builder options.

use crate::layout::LayoutOptions;
use crate::model::{DEVICE_HEIGHT, DEVICE_WIDTH};

/// Options for building a Scene Model from decoded primitives.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    /// Page width used when a decoded page carries none
    pub page_width: f32,

    /// Page height used when a decoded page carries none
    pub page_height: f32,

    /// Decoded x coordinates are relative to the horizontal page center
    pub centered_origin: bool,

    /// Base stroke width per unit of device thickness
    pub width_per_thickness: f32,

    /// Layout options used to position the root text for anchor resolution
    pub layout: LayoutOptions,
}

impl BuildOptions {
    /// Create new build options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default page size.
    pub fn with_page_size(mut self, width: f32, height: f32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    /// Enable or disable the page-centered x origin.
    pub fn with_centered_origin(mut self, centered: bool) -> Self {
        self.centered_origin = centered;
        self
    }

    /// Set the width per thickness unit.
    pub fn with_width_per_thickness(mut self, factor: f32) -> Self {
        self.width_per_thickness = factor;
        self
    }

    /// Set the layout options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            page_width: DEVICE_WIDTH,
            page_height: DEVICE_HEIGHT,
            centered_origin: true,
            width_per_thickness: 2.0,
            layout: LayoutOptions::default(),
        }
    }
}
