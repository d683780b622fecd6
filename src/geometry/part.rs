//! Layer part type: one disjoint region of a layer.

use super::{BoundingBox, Point, Polygon, Polygons};
use serde::{Deserialize, Serialize};

/// One disjoint region of a layer: an outline polygon plus zero or more
/// hole polygons lying strictly inside it.
///
/// Invariant after construction through [`LayerPart::normalized`] or the
/// slicer: the outline winds counter-clockwise, holes wind clockwise.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerPart {
    outline: Polygon,
    holes: Polygons,
}

impl LayerPart {
    /// Create a part from an outline without holes.
    pub fn new(outline: Polygon) -> Self {
        Self {
            outline,
            holes: Vec::new(),
        }
    }

    /// Create a part from an outline and holes.
    pub fn with_holes(outline: Polygon, holes: Polygons) -> Self {
        Self { outline, holes }
    }

    /// Create a part and enforce the winding convention
    /// (outline CCW, holes CW).
    pub fn normalized(mut outline: Polygon, mut holes: Polygons) -> Self {
        outline.make_ccw();
        for hole in &mut holes {
            hole.make_cw();
        }
        Self { outline, holes }
    }

    /// The outer boundary.
    #[inline]
    pub fn outline(&self) -> &Polygon {
        &self.outline
    }

    /// The hole boundaries.
    #[inline]
    pub fn holes(&self) -> &[Polygon] {
        &self.holes
    }

    /// Attach a hole to this part.
    pub fn push_hole(&mut self, hole: Polygon) {
        self.holes.push(hole);
    }

    /// Whether the part has no outline geometry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    /// Net area (outline minus holes) in square micrometers.
    ///
    /// With the winding convention in place the hole areas are negative,
    /// so a plain sum yields the net value.
    pub fn area(&self) -> f64 {
        self.outline.area() + self.holes.iter().map(Polygon::area).sum::<f64>()
    }

    /// Even-odd containment: inside the outline and outside every hole.
    pub fn contains_point(&self, p: &Point) -> bool {
        self.outline.contains_point(p) && !self.holes.iter().any(|h| h.contains_point(p))
    }

    /// Bounding box of the outline.
    pub fn bounding_box(&self) -> BoundingBox {
        self.outline.bounding_box()
    }

    /// Translate the whole part by a vector.
    pub fn translate(&mut self, offset: Point) {
        self.outline.translate(offset);
        for hole in &mut self.holes {
            hole.translate(offset);
        }
    }
}

impl From<Polygon> for LayerPart {
    fn from(outline: Polygon) -> Self {
        Self::new(outline)
    }
}

/// A list of layer parts.
pub type LayerParts = Vec<LayerPart>;

#[cfg(test)]
mod tests {
    use super::*;

    fn part_with_hole() -> LayerPart {
        let outline = Polygon::rectangle(Point::new(0, 0), Point::new(1000, 1000));
        let hole = Polygon::rectangle(Point::new(300, 300), Point::new(700, 700));
        LayerPart::normalized(outline, vec![hole])
    }

    #[test]
    fn test_normalized_winding() {
        let part = part_with_hole();
        assert!(part.outline().is_ccw());
        assert!(!part.holes()[0].is_ccw());
    }

    #[test]
    fn test_area_subtracts_holes() {
        let part = part_with_hole();
        // 1000² - 400²
        assert!((part.area() - (1_000_000.0 - 160_000.0)).abs() < 1e-6);
    }

    #[test]
    fn test_contains_point_respects_holes() {
        let part = part_with_hole();
        assert!(part.contains_point(&Point::new(100, 100)));
        assert!(!part.contains_point(&Point::new(500, 500)));
        assert!(!part.contains_point(&Point::new(2000, 500)));
    }

    #[test]
    fn test_translate() {
        let mut part = part_with_hole();
        part.translate(Point::new(50, 0));
        assert!(part.contains_point(&Point::new(40, 100)));
        assert!(!part.contains_point(&Point::new(520, 500)));
    }
}
