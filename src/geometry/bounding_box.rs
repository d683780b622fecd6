//! Axis-aligned bounding boxes for 2D and 3D point sets.

use super::{Point, Point3};
use crate::Micrometer;
use serde::{Deserialize, Serialize};

/// A 2D axis-aligned bounding box.
///
/// A freshly created box is empty (inverted bounds); expanding it with
/// points makes it valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    min: Point,
    max: Point,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundingBox {
    /// Create an empty bounding box.
    pub fn new() -> Self {
        Self {
            min: Point::new(Micrometer::MAX, Micrometer::MAX),
            max: Point::new(Micrometer::MIN, Micrometer::MIN),
        }
    }

    /// Create a bounding box from explicit corners.
    pub fn from_corners(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Create a bounding box covering a set of points.
    pub fn from_points(points: &[Point]) -> Self {
        let mut bb = Self::new();
        for p in points {
            bb.expand(*p);
        }
        bb
    }

    /// Whether the box contains no points yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Grow the box to contain a point.
    #[inline]
    pub fn expand(&mut self, p: Point) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Grow the box to contain another box.
    pub fn merge(&mut self, other: &BoundingBox) {
        if !other.is_empty() {
            self.expand(other.min);
            self.expand(other.max);
        }
    }

    /// Minimum corner.
    #[inline]
    pub fn min(&self) -> Point {
        self.min
    }

    /// Maximum corner.
    #[inline]
    pub fn max(&self) -> Point {
        self.max
    }

    /// Box extents (max - min).
    #[inline]
    pub fn size(&self) -> Point {
        self.max - self.min
    }

    /// Box center.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new((self.min.x + self.max.x) / 2, (self.min.y + self.max.y) / 2)
    }

    /// Whether a point lies inside the box (inclusive).
    #[inline]
    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// A 3D axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox3 {
    min: Point3,
    max: Point3,
}

impl Default for BoundingBox3 {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundingBox3 {
    /// Create an empty bounding box.
    pub fn new() -> Self {
        Self {
            min: Point3::new(Micrometer::MAX, Micrometer::MAX, Micrometer::MAX),
            max: Point3::new(Micrometer::MIN, Micrometer::MIN, Micrometer::MIN),
        }
    }

    /// Whether the box contains no points yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grow the box to contain a point.
    #[inline]
    pub fn expand(&mut self, p: Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Minimum corner.
    #[inline]
    pub fn min(&self) -> Point3 {
        self.min
    }

    /// Maximum corner.
    #[inline]
    pub fn max(&self) -> Point3 {
        self.max
    }

    /// Box extents (max - min).
    #[inline]
    pub fn size(&self) -> Point3 {
        self.max - self.min
    }

    /// Box center.
    #[inline]
    pub fn center(&self) -> Point3 {
        Point3::new(
            (self.min.x + self.max.x) / 2,
            (self.min.y + self.max.y) / 2,
            (self.min.z + self.max.z) / 2,
        )
    }
}
