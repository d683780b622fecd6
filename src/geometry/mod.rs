//! Geometry primitives for the slicer.
//!
//! This module provides the fundamental geometric types used throughout the
//! slicing pipeline:
//! - [`Point`] and [`Point3`] - 2D and 3D points with integer micrometer
//!   coordinates
//! - [`Line`] - Line segment between two points
//! - [`Polygon`] - Closed polygon (boundary)
//! - [`Polyline`] - Open polyline (path)
//! - [`LayerPart`] - Polygon with holes (one disjoint region of a layer)
//! - [`BoundingBox`] and [`BoundingBox3`] - Axis-aligned bounding boxes
//!
//! ## Coordinate System
//!
//! All coordinates are signed integer micrometers (1 µm quantum), so every
//! comparison at this layer is exact; no tolerance is used. Conversion
//! helpers to and from millimeters live in the crate root and are only used
//! at the boundary (file parsing, CLI, g-code text).
//!
//! Orientation convention: positive signed area = counter-clockwise = solid
//! outline; negative = clockwise = hole.

mod bounding_box;
mod line;
mod part;
mod point;
mod polygon;
mod polyline;

pub use bounding_box::{BoundingBox, BoundingBox3};
pub use line::{Line, Lines};
pub use part::{LayerPart, LayerParts};
pub use point::{Point, Point3, Points, Points3};
pub use polygon::{square, Polygon, Polygons};
pub use polyline::{Polyline, Polylines};

use crate::Micrometer;

/// Linear interpolation between two points, rounding to the micrometer grid.
#[inline]
pub fn lerp(a: Point, b: Point, t: f64) -> Point {
    Point::new(
        (a.x as f64 + (b.x - a.x) as f64 * t).round() as Micrometer,
        (a.y as f64 + (b.y - a.y) as f64 * t).round() as Micrometer,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        let a = Point::new(0, 0);
        let b = Point::new(100, 100);
        assert_eq!(lerp(a, b, 0.5), Point::new(50, 50));
        assert_eq!(lerp(a, b, 0.0), a);
        assert_eq!(lerp(a, b, 1.0), b);
    }
}
