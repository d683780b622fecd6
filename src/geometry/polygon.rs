//! Closed polygon type.
//!
//! A polygon stores its vertices without repeating the first point; the
//! edge from the last vertex back to the first is implicit. Sign
//! convention: positive signed area = counter-clockwise = solid outline,
//! negative = clockwise = hole.

use super::{BoundingBox, Line, Point};
use crate::Micrometer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A closed polygon defined by a sequence of vertices.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    /// Create a new empty polygon.
    #[inline]
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a polygon from a vector of points.
    /// A trailing point equal to the first is dropped.
    pub fn from_points(mut points: Vec<Point>) -> Self {
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        Self { points }
    }

    /// Create an axis-aligned rectangle from two opposite corners.
    pub fn rectangle(min: Point, max: Point) -> Self {
        Self {
            points: vec![
                min,
                Point::new(max.x, min.y),
                max,
                Point::new(min.x, max.y),
            ],
        }
    }

    /// Get the vertices of this polygon.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Get the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the polygon has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Add a vertex.
    #[inline]
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Get the edge from vertex `index` to the following vertex
    /// (wrapping around to the first).
    #[inline]
    pub fn edge(&self, index: usize) -> Line {
        Line::new(self.points[index], self.points[(index + 1) % self.points.len()])
    }

    /// Iterate over all edges, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = Line> + '_ {
        (0..self.points.len()).map(move |i| self.edge(i))
    }

    /// Twice the signed area, exact.
    ///
    /// Positive for counter-clockwise polygons, negative for clockwise.
    pub fn signed_area_doubled(&self) -> i128 {
        let n = self.points.len();
        if n < 3 {
            return 0;
        }
        let mut sum = 0i128;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            sum += a.cross(&b);
        }
        sum
    }

    /// Signed area in square micrometers.
    #[inline]
    pub fn area(&self) -> f64 {
        self.signed_area_doubled() as f64 / 2.0
    }

    /// Whether the polygon winds counter-clockwise (solid outline).
    #[inline]
    pub fn is_ccw(&self) -> bool {
        self.signed_area_doubled() > 0
    }

    /// Reverse the winding direction.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Force counter-clockwise winding (outline convention).
    pub fn make_ccw(&mut self) {
        if self.signed_area_doubled() < 0 {
            self.reverse();
        }
    }

    /// Force clockwise winding (hole convention).
    pub fn make_cw(&mut self) {
        if self.signed_area_doubled() > 0 {
            self.reverse();
        }
    }

    /// Remove consecutive duplicate vertices, including a duplicate pair
    /// across the closing edge.
    pub fn remove_duplicate_points(&mut self) {
        self.points.dedup();
        while self.points.len() > 1 && self.points.first() == self.points.last() {
            self.points.pop();
        }
    }

    /// Even-odd point containment test.
    ///
    /// Points exactly on an edge may be reported on either side; the
    /// slicer never relies on boundary queries.
    pub fn contains_point(&self, p: &Point) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.points[j];
            let b = self.points[i];
            if (a.y > p.y) != (b.y > p.y) {
                let cross = (b.x - a.x) as i128 * (p.y - a.y) as i128
                    - (p.x - a.x) as i128 * (b.y - a.y) as i128;
                let hit = if b.y > a.y { cross > 0 } else { cross < 0 };
                if hit {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Translate all vertices by a vector.
    pub fn translate(&mut self, offset: Point) {
        for p in &mut self.points {
            *p += offset;
        }
    }

    /// Get the bounding box of the polygon.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points)
    }

    /// Squared gap between the last and first vertex.
    /// Zero for conditioned polygons; used while closing stitched chains.
    pub fn closing_gap_squared(&self) -> i128 {
        match (self.points.first(), self.points.last()) {
            (Some(f), Some(l)) => f.distance_squared(l),
            _ => 0,
        }
    }
}

impl fmt::Debug for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.points.iter()).finish()
    }
}

/// A list of polygons.
pub type Polygons = Vec<Polygon>;

/// Helper for tests and callers working in micrometers directly.
pub fn square(center: Point, half_extent: Micrometer) -> Polygon {
    Polygon::rectangle(
        Point::new(center.x - half_extent, center.y - half_extent),
        Point::new(center.x + half_extent, center.y + half_extent),
    )
}
