//! Stroke, point, pen and color types.

use serde::{Deserialize, Serialize};

/// One continuous pen gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Pen kind governing width and opacity rules
    pub pen: PenKind,

    /// Base color
    pub color: Color,

    /// Base width in device units
    pub width: f32,

    /// Point samples in drawing order
    pub points: Vec<Point>,
}

impl Stroke {
    /// Create a stroke with no points.
    pub fn new(pen: PenKind, color: Color, width: f32) -> Self {
        Self {
            pen,
            color,
            width,
            points: Vec::new(),
        }
    }

    /// Replace the point list.
    pub fn with_points(mut self, points: Vec<Point>) -> Self {
        self.points = points;
        self
    }

    /// Append a point.
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Number of point samples.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the stroke has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Axis-aligned bounds as (min_x, min_y, max_x, max_y).
    pub fn bounds(&self) -> Option<(f32, f32, f32, f32)> {
        let first = self.points.first()?;
        let init = (first.x, first.y, first.x, first.y);
        Some(self.points.iter().fold(init, |(x0, y0, x1, y1), p| {
            (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y))
        }))
    }
}

/// A pressure-tagged point sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X position in device units
    pub x: f32,

    /// Y position in device units
    pub y: f32,

    /// Normalized pressure, 0.0 to 1.0
    pub pressure: f32,

    /// Pen tilt direction in radians, when the device reported it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilt: Option<f32>,

    /// Pen speed in device units, when the device reported it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
}

impl Point {
    /// Create a point without motion data.
    pub fn new(x: f32, y: f32, pressure: f32) -> Self {
        Self {
            x,
            y,
            pressure,
            tilt: None,
            speed: None,
        }
    }

    /// Attach tilt and speed samples.
    pub fn with_motion(mut self, tilt: f32, speed: f32) -> Self {
        self.tilt = Some(tilt);
        self.speed = Some(speed);
        self
    }

    /// Check if tilt and speed are both present.
    pub fn has_motion(&self) -> bool {
        self.tilt.is_some() && self.speed.is_some()
    }
}

/// Ink style of a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenKind {
    /// Pressure-sensitive brush with smoothed curves
    Paintbrush,
    /// Textured pencil
    Pencil,
    /// Ballpoint pen
    Ballpoint,
    /// Broad marker
    Marker,
    /// Constant-width fineliner
    Fineliner,
    /// Translucent highlighter
    Highlighter,
    /// Stroke eraser
    Eraser,
    /// Constant-width mechanical pencil
    MechanicalPencil,
    /// Area eraser
    EraseArea,
    /// Tilt-sensitive calligraphy pen
    Calligraphy,
    /// Translucent shader
    Shader,
}

impl PenKind {
    /// All known pen kinds.
    pub const ALL: [PenKind; 11] = [
        PenKind::Paintbrush,
        PenKind::Pencil,
        PenKind::Ballpoint,
        PenKind::Marker,
        PenKind::Fineliner,
        PenKind::Highlighter,
        PenKind::Eraser,
        PenKind::MechanicalPencil,
        PenKind::EraseArea,
        PenKind::Calligraphy,
        PenKind::Shader,
    ];

    /// Map a device pen id to a pen kind. Both firmware generations of ids
    /// are accepted.
    pub fn from_device_id(id: u32) -> Option<Self> {
        match id {
            0 | 12 => Some(PenKind::Paintbrush),
            1 | 14 => Some(PenKind::Pencil),
            2 | 15 => Some(PenKind::Ballpoint),
            3 | 16 => Some(PenKind::Marker),
            4 | 17 => Some(PenKind::Fineliner),
            5 | 18 => Some(PenKind::Highlighter),
            6 => Some(PenKind::Eraser),
            7 | 13 => Some(PenKind::MechanicalPencil),
            8 => Some(PenKind::EraseArea),
            21 => Some(PenKind::Calligraphy),
            23 => Some(PenKind::Shader),
            _ => None,
        }
    }

    /// Current-generation device pen id.
    pub fn device_id(self) -> u32 {
        match self {
            PenKind::Paintbrush => 12,
            PenKind::Pencil => 14,
            PenKind::Ballpoint => 15,
            PenKind::Marker => 16,
            PenKind::Fineliner => 17,
            PenKind::Highlighter => 18,
            PenKind::Eraser => 6,
            PenKind::MechanicalPencil => 13,
            PenKind::EraseArea => 8,
            PenKind::Calligraphy => 21,
            PenKind::Shader => 23,
        }
    }

    /// Check if this pen removes ink rather than depositing it.
    pub fn is_eraser(self) -> bool {
        matches!(self, PenKind::Eraser | PenKind::EraseArea)
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            PenKind::Paintbrush => "Paintbrush",
            PenKind::Pencil => "Pencil",
            PenKind::Ballpoint => "Ballpoint",
            PenKind::Marker => "Marker",
            PenKind::Fineliner => "Fineliner",
            PenKind::Highlighter => "Highlighter",
            PenKind::Eraser => "Eraser",
            PenKind::MechanicalPencil => "MechanicalPencil",
            PenKind::EraseArea => "EraseArea",
            PenKind::Calligraphy => "Calligraphy",
            PenKind::Shader => "Shader",
        }
    }
}

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel (255 = opaque)
    pub a: u8,
}

/// Device palette, indexed by device color id.
const PALETTE: [Color; 14] = [
    Color::rgb(0, 0, 0),
    Color::rgb(144, 144, 144),
    Color::rgb(255, 255, 255),
    Color::rgb(251, 247, 25),
    Color::rgb(0, 255, 0),
    Color::rgb(255, 192, 203),
    Color::rgb(78, 105, 201),
    Color::rgb(179, 62, 57),
    Color::rgb(125, 125, 125),
    Color::rgb(255, 237, 117),
    Color::rgb(161, 216, 125),
    Color::rgb(139, 208, 229),
    Color::rgb(183, 130, 205),
    Color::rgb(247, 232, 81),
];

impl Color {
    /// Black
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// White
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Device blue
    pub const BLUE: Color = Color::rgb(78, 105, 201);
    /// Device red
    pub const RED: Color = Color::rgb(179, 62, 57);
    /// Device highlight yellow
    pub const HIGHLIGHT: Color = Color::rgb(255, 237, 117);

    /// Create an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color from a packed 0xAARRGGBB value.
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Pack into 0xAARRGGBB.
    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Look up a device palette color.
    pub fn from_device_id(id: u32) -> Option<Self> {
        PALETTE.get(id as usize).copied()
    }

    /// Palette id of this color, if it is a palette color.
    pub fn device_id(self) -> Option<u32> {
        PALETTE.iter().position(|c| *c == self).map(|i| i as u32)
    }

    /// Hex string without alpha (e.g., "#4e69c9").
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a 0.0 to 1.0 fraction.
    pub fn alpha(self) -> f32 {
        self.a as f32 / 255.0
    }

    /// Channels as 0.0 to 1.0 fractions.
    pub fn rgb_fractions(self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}
