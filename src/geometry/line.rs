//! Line segment type.

use super::Point;
use crate::Micrometer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A line segment defined by two endpoints.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Line {
    pub a: Point,
    pub b: Point,
}

impl Line {
    /// Create a new line segment from two points.
    #[inline]
    pub const fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    /// Get the direction vector (b - a).
    #[inline]
    pub fn direction(&self) -> Point {
        self.b - self.a
    }

    /// Get the midpoint of the line segment.
    #[inline]
    pub fn midpoint(&self) -> Point {
        Point::new((self.a.x + self.b.x) / 2, (self.a.y + self.b.y) / 2)
    }

    /// Get the squared length of the line segment.
    #[inline]
    pub fn length_squared(&self) -> i128 {
        self.a.distance_squared(&self.b)
    }

    /// Get the length of the line segment, in micrometers.
    #[inline]
    pub fn length(&self) -> f64 {
        self.a.distance(&self.b)
    }

    /// Check if this line segment is degenerate (zero length).
    #[inline]
    pub fn is_point(&self) -> bool {
        self.a == self.b
    }

    /// Reverse the direction of the line segment.
    #[inline]
    pub fn reversed(&self) -> Self {
        Self {
            a: self.b,
            b: self.a,
        }
    }

    /// Interpolate along the segment; `t` in [0, 1] maps a → b.
    pub fn point_at(&self, t: f64) -> Point {
        let d = self.direction();
        Point::new(
            (self.a.x as f64 + d.x as f64 * t).round() as Micrometer,
            (self.a.y as f64 + d.y as f64 * t).round() as Micrometer,
        )
    }

    /// Parameter of the proper crossing between this segment and `other`.
    ///
    /// Returns `Some(t)` (position along `self`) when the segments cross at
    /// a single point, with a half-open bound on `other` so that a crossing
    /// exactly at `other.b` is attributed to the next edge of a ring.
    /// Collinear overlaps return `None`.
    pub fn crossing_parameter(&self, other: &Line) -> Option<f64> {
        let r = self.direction();
        let s = other.direction();
        let denom = r.cross(&s);
        if denom == 0 {
            return None;
        }
        let qp = other.a - self.a;
        let t_num = qp.cross(&s);
        let u_num = qp.cross(&r);
        let t = t_num as f64 / denom as f64;
        let u = u_num as f64 / denom as f64;
        if (0.0..=1.0).contains(&t) && (0.0..1.0).contains(&u) {
            Some(t)
        } else {
            None
        }
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} -> {:?}", self.a, self.b)
    }
}

/// A list of line segments.
pub type Lines = Vec<Line>;
