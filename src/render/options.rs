//! Rendering options and configuration.

use super::json::JsonFormat;
use super::pen::PenProfile;
use crate::layout::LayoutOptions;
use crate::model::PenKind;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

/// Device units to PDF points / CSS pixels (226 dpi device, 72 dpi output).
pub const DEFAULT_SCALE: f32 = 72.0 / 226.0;

/// Options for rendering a document.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Output units per device unit
    pub scale: f32,

    /// Page selection
    pub page_selection: PageSelection,

    /// Draw hidden layers in visual output (text output always includes them)
    pub include_hidden_layers: bool,

    /// Paint a white page background in visual output
    pub background: bool,

    /// Join soft-wrapped lines with a space in plain text
    pub join_soft_wraps: bool,

    /// Write the plain-text companion next to InkML output
    pub text_companion: bool,

    /// Pen rule overrides, by pen kind
    pub pen_profiles: BTreeMap<PenKind, PenProfile>,

    /// File stem used to name outputs
    pub file_stem: String,

    /// JSON output formatting
    pub json_format: JsonFormat,

    /// Text layout options
    pub layout: LayoutOptions,

    /// Collect conversion statistics during rendering
    pub collect_stats: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output scale.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.page_selection = selection;
        self
    }

    /// Set specific page range.
    pub fn with_page_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.page_selection = PageSelection::Range(range);
        self
    }

    /// Set specific pages.
    pub fn with_page_list(mut self, pages: Vec<u32>) -> Self {
        self.page_selection = PageSelection::Pages(pages);
        self
    }

    /// Draw hidden layers in visual output.
    pub fn with_hidden_layers(mut self, include: bool) -> Self {
        self.include_hidden_layers = include;
        self
    }

    /// Enable or disable the white background.
    pub fn with_background(mut self, background: bool) -> Self {
        self.background = background;
        self
    }

    /// Join soft-wrapped lines in plain text.
    pub fn with_joined_soft_wraps(mut self, join: bool) -> Self {
        self.join_soft_wraps = join;
        self
    }

    /// Enable or disable the InkML text companion.
    pub fn with_text_companion(mut self, include: bool) -> Self {
        self.text_companion = include;
        self
    }

    /// Add or replace the rendering rule of a pen kind.
    pub fn with_pen_profile(mut self, pen: PenKind, profile: PenProfile) -> Self {
        self.pen_profiles.insert(pen, profile);
        self
    }

    /// Set the output file stem.
    pub fn with_file_stem(mut self, stem: impl Into<String>) -> Self {
        self.file_stem = stem.into();
        self
    }

    /// Set the JSON format.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// Set the layout options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// Enable statistics collection during rendering.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }

    /// Rendering rule for a pen kind: the override if one is set, else the
    /// built-in rule.
    pub fn pen_profile(&self, pen: PenKind) -> PenProfile {
        self.pen_profiles
            .get(&pen)
            .copied()
            .unwrap_or_else(|| PenProfile::for_pen(pen))
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            page_selection: PageSelection::All,
            include_hidden_layers: false,
            background: true,
            join_soft_wraps: true,
            text_companion: true,
            pen_profiles: BTreeMap::new(),
            file_stem: "document".to_string(),
            json_format: JsonFormat::Pretty,
            layout: LayoutOptions::default(),
            collect_stats: false,
        }
    }
}

/// Page selection for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Render all pages
    #[default]
    All,
    /// Render a range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Render specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Highest page number the selection names explicitly.
    pub fn max_page(&self) -> Option<u32> {
        match self {
            PageSelection::All => None,
            PageSelection::Range(range) => Some(*range.end()),
            PageSelection::Pages(pages) => pages.iter().max().copied(),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        // Simple range (e.g., "1-10")
        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let start: u32 = start.trim().parse().map_err(|_| "Invalid start page")?;
                let end: u32 = end.trim().parse().map_err(|_| "Invalid end page")?;
                if start == 0 || start > end {
                    return Err(format!("Invalid range {}-{}", start, end));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = BTreeSet::new();
        for part in s.split(',') {
            let part = part.trim();
            let (start, end) = match part.split_once('-') {
                Some((start, end)) => (
                    start.trim().parse::<u32>().map_err(|_| "Invalid page number")?,
                    end.trim().parse::<u32>().map_err(|_| "Invalid page number")?,
                ),
                None => {
                    let p: u32 = part.parse().map_err(|_| "Invalid page number")?;
                    (p, p)
                }
            };
            if start == 0 {
                return Err("Page numbers start at 1".to_string());
            }
            if start > end {
                return Err(format!("Invalid range {}-{}", start, end));
            }
            pages.extend(start..=end);
        }

        let pages = pages.into_iter().collect();
        Ok(PageSelection::Pages(pages))
    }
}
