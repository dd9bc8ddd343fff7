//! Pen-rendering rules.
//!
//! Each [`PenKind`] maps to a [`PenProfile`] describing how point pressure
//! and tilt become stroke width, the fixed opacity, the line cap and whether
//! the path is smoothed. New or changed rules are supplied through
//! [`crate::render::RenderOptions::with_pen_profile`] without touching the
//! renderer.

use crate::model::{PenKind, Point};
use serde::{Deserialize, Serialize};

/// Line cap style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    /// Half-disc past each end
    #[default]
    Round,
    /// Half-square past each end
    Square,
    /// Flat, ending exactly at the endpoint
    Butt,
}

impl LineCap {
    /// SVG `stroke-linecap` value.
    pub fn svg_name(self) -> &'static str {
        match self {
            LineCap::Round => "round",
            LineCap::Square => "square",
            LineCap::Butt => "butt",
        }
    }

    /// PDF `J` operand.
    pub fn pdf_style(self) -> i64 {
        match self {
            LineCap::Butt => 0,
            LineCap::Round => 1,
            LineCap::Square => 2,
        }
    }
}

/// Rendering rule for one pen kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenProfile {
    /// Multiplier applied to the stroke's base width
    pub width_scale: f32,

    /// Share of the width driven by pressure (0.0 = constant width)
    pub pressure_weight: f32,

    /// Share of the width driven by tilt (0.0 = ignore tilt)
    pub tilt_weight: f32,

    /// Fixed opacity, independent of pressure
    pub opacity: f32,

    /// Line cap
    pub cap: LineCap,

    /// Smooth the centerline with curves instead of straight segments
    pub smooth: bool,

    /// Whether the pen deposits ink at all
    pub visible: bool,
}

impl PenProfile {
    /// Constant-width, opaque, round-capped pen.
    pub const fn solid(width_scale: f32) -> Self {
        Self {
            width_scale,
            pressure_weight: 0.0,
            tilt_weight: 0.0,
            opacity: 1.0,
            cap: LineCap::Round,
            smooth: false,
            visible: true,
        }
    }

    /// A pen that renders to nothing.
    pub const fn invisible() -> Self {
        Self {
            visible: false,
            opacity: 0.0,
            ..Self::solid(1.0)
        }
    }

    /// Default rule for a pen kind.
    pub fn for_pen(pen: PenKind) -> Self {
        match pen {
            PenKind::Ballpoint => Self {
                pressure_weight: 0.5,
                ..Self::solid(1.0)
            },
            PenKind::Fineliner => Self::solid(1.0),
            PenKind::Marker => Self {
                pressure_weight: 0.3,
                ..Self::solid(1.5)
            },
            PenKind::Pencil => Self {
                pressure_weight: 0.6,
                opacity: 0.9,
                ..Self::solid(1.0)
            },
            PenKind::MechanicalPencil => Self {
                opacity: 0.7,
                ..Self::solid(1.0)
            },
            PenKind::Paintbrush => Self {
                pressure_weight: 0.8,
                smooth: true,
                ..Self::solid(1.5)
            },
            PenKind::Calligraphy => Self {
                pressure_weight: 0.3,
                tilt_weight: 0.5,
                smooth: true,
                ..Self::solid(1.5)
            },
            PenKind::Highlighter => Self {
                opacity: 0.3,
                cap: LineCap::Square,
                ..Self::solid(7.5)
            },
            PenKind::Shader => Self {
                opacity: 0.15,
                ..Self::solid(6.0)
            },
            PenKind::Eraser | PenKind::EraseArea => Self::invisible(),
        }
    }

    /// Width at one point for a stroke of `base` width.
    pub fn point_width(&self, base: f32, point: &Point) -> f32 {
        let pressure = point.pressure.clamp(0.0, 1.0);
        let mut factor = 1.0 - self.pressure_weight + self.pressure_weight * pressure;
        if let Some(tilt) = point.tilt {
            factor *= 1.0 - self.tilt_weight + self.tilt_weight * tilt.sin().abs();
        }
        (base * self.width_scale * factor).max(0.0)
    }

    /// Check if width varies with the point samples.
    pub fn is_pressure_sensitive(&self) -> bool {
        self.pressure_weight != 0.0 || self.tilt_weight != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ballpoint_width_follows_pressure() {
        let profile = PenProfile::for_pen(PenKind::Ballpoint);
        let light = profile.point_width(4.0, &Point::new(0.0, 0.0, 0.0));
        let half = profile.point_width(4.0, &Point::new(0.0, 0.0, 0.5));
        let full = profile.point_width(4.0, &Point::new(0.0, 0.0, 1.0));
        assert_eq!(light, 2.0);
        assert_eq!(half, 3.0);
        assert_eq!(full, 4.0);
    }

    #[test]
    fn test_fineliner_is_constant() {
        let profile = PenProfile::for_pen(PenKind::Fineliner);
        assert!(!profile.is_pressure_sensitive());
        assert_eq!(
            profile.point_width(4.0, &Point::new(0.0, 0.0, 0.1)),
            profile.point_width(4.0, &Point::new(0.0, 0.0, 0.9))
        );
    }

    #[test]
    fn test_highlighter_opacity_is_fixed() {
        let profile = PenProfile::for_pen(PenKind::Highlighter);
        assert_eq!(profile.opacity, 0.3);
        assert_eq!(profile.cap, LineCap::Square);
        assert_eq!(profile.point_width(2.0, &Point::new(0.0, 0.0, 0.2)), 15.0);
    }

    #[test]
    fn test_erasers_are_invisible() {
        assert!(!PenProfile::for_pen(PenKind::Eraser).visible);
        assert!(!PenProfile::for_pen(PenKind::EraseArea).visible);
        assert!(PenKind::ALL
            .iter()
            .filter(|p| !p.is_eraser())
            .all(|p| PenProfile::for_pen(*p).visible));
    }
}
