//! Infill pattern factory.
//!
//! A pattern is a lazy value: it carries its parameters and yields line
//! segments only when asked, so the dense line set is never materialized
//! beyond the bounding rectangle being filled.

use crate::geometry::{BoundingBox, Line, Lines, Point};
use crate::Micrometer;

/// Direction of the parallel lines produced by a [`LinearPattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatternDirection {
    /// Lines parallel to the y axis, stepping along x.
    #[default]
    Vertical,
    /// Lines at +45°.
    DiagonalUp,
    /// Lines at -45° (135°).
    DiagonalDown,
}

/// A dense set of parallel line segments covering a bounding rectangle at
/// a fixed spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearPattern {
    min: Point,
    max: Point,
    spacing: Micrometer,
    direction: PatternDirection,
}

impl LinearPattern {
    /// Create a pattern of vertical lines covering `[min, max]`.
    pub fn new(min: Point, max: Point, spacing: Micrometer) -> Self {
        Self {
            min,
            max,
            spacing,
            direction: PatternDirection::Vertical,
        }
    }

    /// Create a pattern with an explicit line direction.
    pub fn with_direction(
        min: Point,
        max: Point,
        spacing: Micrometer,
        direction: PatternDirection,
    ) -> Self {
        Self {
            min,
            max,
            spacing,
            direction,
        }
    }

    /// The line spacing in micrometers.
    #[inline]
    pub fn spacing(&self) -> Micrometer {
        self.spacing
    }

    /// Produce the pattern's line segments.
    ///
    /// Vertical lines run from `min.y` to `max.y` at `min.x, min.x +
    /// spacing, …` up to and including `max.x`. Diagonal lines are spaced
    /// `spacing` apart measured perpendicular to the lines and are clamped
    /// to the bounding rectangle.
    pub fn lines(&self) -> Lines {
        if self.spacing <= 0 || self.min.x > self.max.x || self.min.y > self.max.y {
            return Vec::new();
        }
        match self.direction {
            PatternDirection::Vertical => self.vertical_lines(),
            PatternDirection::DiagonalUp => self.diagonal_lines(true),
            PatternDirection::DiagonalDown => self.diagonal_lines(false),
        }
    }

    fn vertical_lines(&self) -> Lines {
        let mut lines = Vec::new();
        let mut x = self.min.x;
        while x <= self.max.x {
            lines.push(Line::new(
                Point::new(x, self.min.y),
                Point::new(x, self.max.y),
            ));
            x += self.spacing;
        }
        lines
    }

    fn diagonal_lines(&self, up: bool) -> Lines {
        // Lines x - y = c (up) or x + y = c (down); spacing measured
        // perpendicular to the lines means the intercept steps by
        // spacing * sqrt(2).
        let step = ((self.spacing as f64) * std::f64::consts::SQRT_2).round() as Micrometer;
        let step = step.max(1);
        let (c_min, c_max) = if up {
            (self.min.x - self.max.y, self.max.x - self.min.y)
        } else {
            (self.min.x + self.min.y, self.max.x + self.max.y)
        };

        let mut lines = Vec::new();
        let mut c = c_min;
        while c <= c_max {
            if let Some(line) = self.diagonal_clamped(c, up) {
                lines.push(line);
            }
            c += step;
        }
        lines
    }

    fn diagonal_clamped(&self, c: Micrometer, up: bool) -> Option<Line> {
        // Solve for the y interval where the line stays inside the box.
        let (y_lo, y_hi) = if up {
            // x = y + c
            (
                self.min.y.max(self.min.x - c),
                self.max.y.min(self.max.x - c),
            )
        } else {
            // x = c - y
            (
                self.min.y.max(c - self.max.x),
                self.max.y.min(c - self.min.x),
            )
        };
        if y_lo >= y_hi {
            return None;
        }
        let x_at = |y: Micrometer| if up { y + c } else { c - y };
        Some(Line::new(
            Point::new(x_at(y_lo), y_lo),
            Point::new(x_at(y_hi), y_hi),
        ))
    }
}

/// Pattern for solid (bottom/top) fill: axis-aligned lines one extrusion
/// width apart.
pub fn solid_pattern(bounds: &BoundingBox, line_width: Micrometer) -> LinearPattern {
    LinearPattern::new(bounds.min(), bounds.max(), line_width)
}

/// Pattern for sparse interior fill: diagonal lines whose direction
/// alternates 45°/135° with the layer index, crosshatching consecutive
/// layers deterministically.
pub fn sparse_pattern(
    bounds: &BoundingBox,
    spacing: Micrometer,
    layer_index: usize,
) -> LinearPattern {
    let direction = if layer_index % 2 == 0 {
        PatternDirection::DiagonalUp
    } else {
        PatternDirection::DiagonalDown
    };
    LinearPattern::with_direction(bounds.min(), bounds.max(), spacing, direction)
}

/// Line spacing for sparse infill at the given density.
///
/// At 100% density a 10mm span takes `10_000 / extrusion_width` lines;
/// the density scales the line count, and the spacing is the span divided
/// by the scaled count. Returns `None` at 0% (no sparse infill).
pub fn sparse_line_spacing(
    extrusion_width: Micrometer,
    infill_percent: u32,
) -> Option<Micrometer> {
    if infill_percent == 0 || extrusion_width <= 0 {
        return None;
    }
    let mm10: Micrometer = 10_000;
    let lines_per_10mm_full = mm10 / extrusion_width;
    let lines_per_10mm = lines_per_10mm_full as f64 * infill_percent as f64 / 100.0;
    Some((mm10 as f64 / lines_per_10mm) as Micrometer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_line_count() {
        // floor((max.x - min.x) / spacing) + 1 lines
        let pattern = LinearPattern::new(Point::new(0, 0), Point::new(10_000, 10_000), 400);
        let lines = pattern.lines();
        assert_eq!(lines.len(), 10_000 / 400 + 1);
        assert_eq!(lines[0].a, Point::new(0, 0));
        assert_eq!(lines[0].b, Point::new(0, 10_000));
        assert_eq!(lines.last().unwrap().a.x, 10_000);
    }

    #[test]
    fn test_vertical_line_count_non_divisible() {
        let pattern = LinearPattern::new(Point::new(0, 0), Point::new(1_000, 1_000), 300);
        // Lines at 0, 300, 600, 900
        assert_eq!(pattern.lines().len(), 4);
    }

    #[test]
    fn test_degenerate_pattern() {
        let pattern = LinearPattern::new(Point::new(0, 0), Point::new(-1, 10), 400);
        assert!(pattern.lines().is_empty());
        let zero = LinearPattern::new(Point::new(0, 0), Point::new(10, 10), 0);
        assert!(zero.lines().is_empty());
    }

    #[test]
    fn test_diagonal_lines_stay_in_bounds() {
        let pattern = LinearPattern::with_direction(
            Point::new(0, 0),
            Point::new(10_000, 10_000),
            2_000,
            PatternDirection::DiagonalUp,
        );
        let lines = pattern.lines();
        assert!(!lines.is_empty());
        for line in &lines {
            for p in [line.a, line.b] {
                assert!(p.x >= 0 && p.x <= 10_000);
                assert!(p.y >= 0 && p.y <= 10_000);
            }
            // 45° slope
            let d = line.direction();
            assert_eq!(d.x, d.y);
        }
    }

    #[test]
    fn test_diagonal_down_slope() {
        let pattern = LinearPattern::with_direction(
            Point::new(0, 0),
            Point::new(10_000, 10_000),
            2_000,
            PatternDirection::DiagonalDown,
        );
        for line in pattern.lines() {
            let d = line.direction();
            assert_eq!(d.x, -d.y);
        }
    }

    #[test]
    fn test_sparse_pattern_alternates() {
        let bounds =
            BoundingBox::from_points(&[Point::new(0, 0), Point::new(10_000, 10_000)]);
        let even = sparse_pattern(&bounds, 2_000, 4);
        let odd = sparse_pattern(&bounds, 2_000, 5);
        assert_ne!(even, odd);
        // Deterministic in the layer index
        assert_eq!(even, sparse_pattern(&bounds, 2_000, 4));
    }

    #[test]
    fn test_sparse_line_spacing() {
        // 400µm width at 20%: 25 lines/10mm at 100% → 5 lines → 2mm apart
        assert_eq!(sparse_line_spacing(400, 20), Some(2_000));
        // 100% density degenerates to one line width
        assert_eq!(sparse_line_spacing(400, 100), Some(400));
        // 0% yields no sparse infill
        assert_eq!(sparse_line_spacing(400, 0), None);
    }
}
