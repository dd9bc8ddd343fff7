//! Stroke Renderer: strokes to vector path descriptions.

use super::pen::{LineCap, PenProfile};
use crate::model::{Color, PenKind, Stroke};

/// A 2D position in device units.
pub type Vec2 = (f32, f32);

/// Result of rendering one stroke.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedStroke {
    /// Two or more points: a connected path
    Path(RenderedPath),
    /// Exactly one point: a filled dot
    Dot(RenderedDot),
    /// Nothing to draw (no points, or an eraser-class pen)
    Nothing,
}

/// Centerline geometry plus style of a rendered stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPath {
    /// Pen the stroke was drawn with
    pub pen: PenKind,
    /// Ink color
    pub color: Color,
    /// Effective opacity (pen opacity times color alpha)
    pub opacity: f32,
    /// Cap drawn at both ends
    pub cap: LineCap,
    /// Segments in input point order; segment `i` joins point `i` and `i + 1`
    pub segments: Vec<Segment>,
}

/// One piece of a rendered path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Start point
    pub from: Vec2,
    /// End point
    pub to: Vec2,
    /// Straight or curved
    pub shape: SegmentShape,
    /// Stroke width along this segment
    pub width: f32,
}

/// Geometry between a segment's endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentShape {
    /// Straight line
    Line,
    /// Cubic Bezier with two control points
    Cubic(Vec2, Vec2),
}

/// A single-point stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDot {
    /// Pen the stroke was drawn with
    pub pen: PenKind,
    /// The single point's position
    pub center: Vec2,
    /// Half the point's width
    pub radius: f32,
    /// Ink color
    pub color: Color,
    /// Effective opacity (pen opacity times color alpha)
    pub opacity: f32,
}

impl RenderedPath {
    /// Path vertices in input order: the first segment's start, then every
    /// segment's end.
    pub fn vertices(&self) -> Vec<Vec2> {
        let mut out = Vec::with_capacity(self.segments.len() + 1);
        if let Some(first) = self.segments.first() {
            out.push(first.from);
        }
        out.extend(self.segments.iter().map(|s| s.to));
        out
    }

    /// Per-segment widths.
    pub fn widths(&self) -> Vec<f32> {
        self.segments.iter().map(|s| s.width).collect()
    }

    /// Mean segment width.
    pub fn mean_width(&self) -> f32 {
        if self.segments.is_empty() {
            return 0.0;
        }
        self.segments.iter().map(|s| s.width).sum::<f32>() / self.segments.len() as f32
    }

    /// Check if every segment has the same width.
    pub fn has_uniform_width(&self) -> bool {
        match self.segments.first() {
            Some(first) => self.segments.iter().all(|s| s.width == first.width),
            None => true,
        }
    }
}

/// Render a stroke with a pen profile.
///
/// Points are connected in input order. Each segment's width is the mean
/// of its two endpoint widths. Profiles with `smooth` set get Catmull-Rom
/// curves through the same vertices. Strokes with no points and eraser-class
/// pens render to [`RenderedStroke::Nothing`]; a single point becomes a dot.
pub fn render_stroke(stroke: &Stroke, profile: &PenProfile) -> RenderedStroke {
    if stroke.pen.is_eraser() || !profile.visible {
        return RenderedStroke::Nothing;
    }

    let opacity = (profile.opacity * stroke.color.alpha()).clamp(0.0, 1.0);
    let widths: Vec<f32> = stroke
        .points
        .iter()
        .map(|p| profile.point_width(stroke.width, p))
        .collect();

    match stroke.points.as_slice() {
        [] => RenderedStroke::Nothing,
        [only] => RenderedStroke::Dot(RenderedDot {
            pen: stroke.pen,
            center: (only.x, only.y),
            radius: widths[0] / 2.0,
            color: stroke.color,
            opacity,
        }),
        points => {
            let vertices: Vec<Vec2> = points.iter().map(|p| (p.x, p.y)).collect();
            let segments = (0..vertices.len() - 1)
                .map(|i| Segment {
                    from: vertices[i],
                    to: vertices[i + 1],
                    shape: if profile.smooth {
                        catmull_rom(&vertices, i)
                    } else {
                        SegmentShape::Line
                    },
                    width: (widths[i] + widths[i + 1]) / 2.0,
                })
                .collect();
            RenderedStroke::Path(RenderedPath {
                pen: stroke.pen,
                color: stroke.color,
                opacity,
                cap: profile.cap,
                segments,
            })
        }
    }
}

/// Bezier control points for the segment `i -> i + 1`.
fn catmull_rom(v: &[Vec2], i: usize) -> SegmentShape {
    let p0 = v[i.saturating_sub(1)];
    let p1 = v[i];
    let p2 = v[i + 1];
    let p3 = v[(i + 2).min(v.len() - 1)];
    let c1 = (p1.0 + (p2.0 - p0.0) / 6.0, p1.1 + (p2.1 - p0.1) / 6.0);
    let c2 = (p2.0 - (p3.0 - p1.0) / 6.0, p2.1 - (p3.1 - p1.1) / 6.0);
    SegmentShape::Cubic(c1, c2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point;

    fn stroke(pen: PenKind, points: &[(f32, f32, f32)]) -> Stroke {
        Stroke::new(pen, Color::BLACK, 4.0).with_points(
            points
                .iter()
                .map(|&(x, y, p)| Point::new(x, y, p))
                .collect(),
        )
    }

    fn render(stroke: &Stroke) -> RenderedStroke {
        render_stroke(stroke, &PenProfile::for_pen(stroke.pen))
    }

    #[test]
    fn test_path_keeps_point_order() {
        let s = stroke(
            PenKind::Ballpoint,
            &[(5.0, 5.0, 0.5), (0.0, 0.0, 0.5), (9.0, 1.0, 0.5), (2.0, 8.0, 0.5)],
        );
        let RenderedStroke::Path(path) = render(&s) else {
            panic!("expected path");
        };
        assert_eq!(path.segments.len(), 3);
        assert_eq!(
            path.vertices(),
            vec![(5.0, 5.0), (0.0, 0.0), (9.0, 1.0), (2.0, 8.0)]
        );
    }

    #[test]
    fn test_segment_width_interpolates_pressure() {
        let s = stroke(PenKind::Ballpoint, &[(0.0, 0.0, 0.0), (1.0, 0.0, 1.0)]);
        let RenderedStroke::Path(path) = render(&s) else {
            panic!("expected path");
        };
        assert_eq!(path.widths(), vec![3.0]);
        assert!(path.has_uniform_width());
    }

    #[test]
    fn test_degenerate_strokes() {
        assert_eq!(render(&stroke(PenKind::Ballpoint, &[])), RenderedStroke::Nothing);

        let RenderedStroke::Dot(dot) = render(&stroke(PenKind::Ballpoint, &[(3.0, 4.0, 1.0)]))
        else {
            panic!("expected dot");
        };
        assert_eq!(dot.center, (3.0, 4.0));
        assert_eq!(dot.radius, 2.0);
    }

    #[test]
    fn test_eraser_renders_nothing() {
        let s = stroke(PenKind::Eraser, &[(0.0, 0.0, 1.0), (5.0, 5.0, 1.0)]);
        assert_eq!(render(&s), RenderedStroke::Nothing);
    }

    #[test]
    fn test_highlighter_has_fixed_alpha() {
        let s = stroke(PenKind::Highlighter, &[(0.0, 0.0, 0.1), (5.0, 0.0, 0.9)]);
        let RenderedStroke::Path(path) = render(&s) else {
            panic!("expected path");
        };
        assert_eq!(path.opacity, 0.3);
        assert_eq!(path.cap, LineCap::Square);
    }

    #[test]
    fn test_paintbrush_is_smoothed_through_same_vertices() {
        let s = stroke(
            PenKind::Paintbrush,
            &[(0.0, 0.0, 1.0), (10.0, 0.0, 1.0), (10.0, 10.0, 1.0)],
        );
        let RenderedStroke::Path(path) = render(&s) else {
            panic!("expected path");
        };
        assert!(path
            .segments
            .iter()
            .all(|s| matches!(s.shape, SegmentShape::Cubic(..))));
        assert_eq!(path.vertices(), vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
    }
}
