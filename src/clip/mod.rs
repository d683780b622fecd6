//! Clipping adapter: polygon boolean operations, insets and infill
//! clipping on top of the geo-clipper engine.
//!
//! These operations are essential for:
//! - Computing perimeter insets
//! - Bottom/top region extraction (layer boolean operations)
//! - Infill line clipping
//!
//! ## Numeric policy
//!
//! The engine is driven with a scale factor of 1.0: crate coordinates are
//! already integer micrometers, so the engine's internal fixed-point
//! coordinates are exactly the crate's coordinates. Repeated boolean
//! operations on the same inputs are therefore bit-identical.

pub mod pattern;

pub use pattern::{solid_pattern, sparse_line_spacing, sparse_pattern, LinearPattern};

use crate::geometry::{LayerPart, LayerParts, Line, Point, Polygon, Polyline, Polylines};
use crate::{Micrometer, Result};
use geo::{Coord as GeoCoord, LineString, MultiPolygon, Polygon as GeoPolygon};
use geo_clipper::{Clipper, EndType, JoinType};

/// Scale factor passed to the clipping engine. Coordinates are integer
/// micrometers already, so no further scaling is wanted.
const CLIPPER_SCALE: f64 = 1.0;

/// Join type for offset corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffsetJoinType {
    /// Square corners
    #[default]
    Square,
    /// Round corners
    Round,
    /// Mitered corners
    Miter,
}

impl From<OffsetJoinType> for JoinType {
    fn from(jt: OffsetJoinType) -> Self {
        match jt {
            OffsetJoinType::Square => JoinType::Square,
            OffsetJoinType::Round => JoinType::Round(0.25),
            OffsetJoinType::Miter => JoinType::Miter(2.0),
        }
    }
}

fn ring_coords(poly: &Polygon) -> Vec<GeoCoord<f64>> {
    let mut ring: Vec<GeoCoord<f64>> = poly
        .points()
        .iter()
        .map(|p| GeoCoord {
            x: p.x as f64,
            y: p.y as f64,
        })
        .collect();
    // geo rings are explicitly closed
    if let (Some(first), Some(last)) = (ring.first().copied(), ring.last()) {
        if first != *last {
            ring.push(first);
        }
    }
    ring
}

fn part_to_geo(part: &LayerPart) -> GeoPolygon<f64> {
    let holes: Vec<LineString<f64>> = part
        .holes()
        .iter()
        .map(|h| LineString::new(ring_coords(h)))
        .collect();
    GeoPolygon::new(LineString::new(ring_coords(part.outline())), holes)
}

fn parts_to_geo_multi(parts: &[LayerPart]) -> MultiPolygon<f64> {
    MultiPolygon::new(parts.iter().map(part_to_geo).collect())
}

fn ring_to_polygon(ring: &LineString<f64>) -> Polygon {
    let points: Vec<Point> = ring
        .coords()
        .map(|c| Point::new(c.x.round() as Micrometer, c.y.round() as Micrometer))
        .collect();
    let mut poly = Polygon::from_points(points);
    poly.remove_duplicate_points();
    poly
}

fn geo_to_part(geo_poly: &GeoPolygon<f64>) -> LayerPart {
    let outline = ring_to_polygon(geo_poly.exterior());
    let holes: Vec<Polygon> = geo_poly
        .interiors()
        .iter()
        .map(ring_to_polygon)
        .filter(|h| h.len() >= 3)
        .collect();
    LayerPart::normalized(outline, holes)
}

fn multi_to_parts(multi: &MultiPolygon<f64>) -> LayerParts {
    multi
        .0
        .iter()
        .map(geo_to_part)
        .filter(|p| p.outline().len() >= 3)
        .collect()
}

// ============================================================================
// Boolean operations
// ============================================================================

/// Regions of `subject` not covered by the union of `clips`.
///
/// An empty result is valid (the subject is fully covered); `Err` is
/// reserved for engine failure.
pub fn difference(subject: &LayerPart, clips: &[LayerPart]) -> Result<LayerParts> {
    if subject.is_empty() {
        return Ok(Vec::new());
    }
    if clips.is_empty() {
        return Ok(vec![subject.clone()]);
    }
    let subject_geo = parts_to_geo_multi(std::slice::from_ref(subject));
    let clips_geo = parts_to_geo_multi(clips);
    let result = subject_geo.difference(&clips_geo, CLIPPER_SCALE);
    Ok(multi_to_parts(&result))
}

/// Regions common to `subject` and the union of `clips`.
pub fn intersection(subject: &LayerPart, clips: &[LayerPart]) -> Result<LayerParts> {
    if subject.is_empty() || clips.is_empty() {
        return Ok(Vec::new());
    }
    let subject_geo = parts_to_geo_multi(std::slice::from_ref(subject));
    let clips_geo = parts_to_geo_multi(clips);
    let result = subject_geo.intersection(&clips_geo, CLIPPER_SCALE);
    Ok(multi_to_parts(&result))
}

/// Union of a set of possibly overlapping parts.
pub fn union(parts: &[LayerPart]) -> Result<LayerParts> {
    match parts.len() {
        0 => Ok(Vec::new()),
        1 => Ok(vec![parts[0].clone()]),
        _ => {
            let first = parts_to_geo_multi(&parts[..1]);
            let rest = parts_to_geo_multi(&parts[1..]);
            let result = first.union(&rest, CLIPPER_SCALE);
            Ok(multi_to_parts(&result))
        }
    }
}

// ============================================================================
// Offsetting
// ============================================================================

/// Offset a part by `delta` micrometers. Positive grows, negative shrinks.
pub fn offset_part(part: &LayerPart, delta: Micrometer, join_type: OffsetJoinType) -> LayerParts {
    if part.is_empty() {
        return Vec::new();
    }
    let geo = part_to_geo(part);
    let result = geo.offset(
        delta as f64,
        join_type.into(),
        EndType::ClosedPolygon,
        CLIPPER_SCALE,
    );
    multi_to_parts(&result)
}

/// Successive inward insets of a part.
///
/// Ring `i` (0-based) is offset from the boundary by `distance/2 +
/// i * distance`, so that the first extruded bead centerline sits one
/// half-width inside the surface and subsequent beads step by exactly one
/// width. Each ring may split into several islands; a part too small for a
/// ring ends the sequence.
pub fn inset(part: &LayerPart, distance: Micrometer, count: usize) -> Vec<LayerParts> {
    let mut rings = Vec::new();
    for i in 0..count {
        let offset = distance / 2 + distance * i as Micrometer;
        let ring = offset_part(part, -offset, OffsetJoinType::Square);
        if ring.is_empty() {
            break;
        }
        rings.push(ring);
    }
    rings
}

// ============================================================================
// Infill clipping
// ============================================================================

/// Intersect a pattern's line set with a fill region.
///
/// The fill boundary is first offset by `line_width/2` inward minus the
/// two overlap allowances (each a percentage of line width); the overlap
/// terms move the boundary outward so fill lines tie into the surrounding
/// perimeter bead. The pattern lines are clipped to the resulting regions
/// and, when `clip` is given, additionally to that part so lines cannot
/// leak past the innermost wall of a neighboring feature.
pub fn fill(
    area: &LayerPart,
    clip: Option<&LayerPart>,
    line_width: Micrometer,
    pattern: &LinearPattern,
    overlap_percent: u32,
    extra_overlap_percent: u32,
) -> Polylines {
    let overlap = (overlap_percent + extra_overlap_percent) as Micrometer;
    let boundary_inset = line_width / 2 - line_width * overlap / 100;
    let regions = offset_part(area, -boundary_inset, OffsetJoinType::Square);
    if regions.is_empty() {
        return Vec::new();
    }

    let mut result = Polylines::new();
    for line in pattern.lines() {
        for piece in clip_segment_to_parts(&line, &regions) {
            match clip {
                Some(c) => {
                    for sub in clip_segment_to_parts(&piece, std::slice::from_ref(c)) {
                        result.push(Polyline::segment(sub.a, sub.b));
                    }
                }
                None => result.push(Polyline::segment(piece.a, piece.b)),
            }
        }
    }
    result
}

/// Clip one line segment against a set of parts, keeping the covered
/// intervals.
///
/// Crossing parameters against every boundary edge split the segment;
/// interval membership is decided at the interval midpoint. Adjacent kept
/// intervals are merged so tangential crossings do not split a segment.
pub fn clip_segment_to_parts(line: &Line, parts: &[LayerPart]) -> Vec<Line> {
    if line.is_point() || parts.is_empty() {
        return Vec::new();
    }

    let mut ts = vec![0.0f64, 1.0];
    for part in parts {
        for edge in part.outline().edges() {
            if let Some(t) = line.crossing_parameter(&edge) {
                ts.push(t);
            }
        }
        for hole in part.holes() {
            for edge in hole.edges() {
                if let Some(t) = line.crossing_parameter(&edge) {
                    ts.push(t);
                }
            }
        }
    }
    ts.sort_by(f64::total_cmp);
    ts.dedup_by(|a, b| (*a - *b).abs() < 1e-9);

    let mut result: Vec<Line> = Vec::new();
    for w in ts.windows(2) {
        let mid = line.point_at((w[0] + w[1]) / 2.0);
        if !parts.iter().any(|p| p.contains_point(&mid)) {
            continue;
        }
        let a = line.point_at(w[0]);
        let b = line.point_at(w[1]);
        if a == b {
            continue;
        }
        match result.last_mut() {
            Some(prev) if prev.b == a => prev.b = b,
            _ => result.push(Line::new(a, b)),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{square, BoundingBox, Point};

    fn square_part(center: Point, half: Micrometer) -> LayerPart {
        LayerPart::new(square(center, half))
    }

    #[test]
    fn test_difference_disjoint() {
        let a = square_part(Point::new(0, 0), 5_000);
        let b = square_part(Point::new(20_000, 0), 5_000);
        let result = difference(&a, &[b]).unwrap();
        assert_eq!(result.len(), 1);
        assert!((result[0].area() - a.area()).abs() < 1.0);
    }

    #[test]
    fn test_difference_covered() {
        let a = square_part(Point::new(0, 0), 5_000);
        let b = square_part(Point::new(0, 0), 6_000);
        let result = difference(&a, &[b]).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_difference_partial() {
        // Clip covers the right half
        let a = square_part(Point::new(0, 0), 5_000);
        let b = LayerPart::new(Polygon::rectangle(
            Point::new(0, -5_000),
            Point::new(5_000, 5_000),
        ));
        let result = difference(&a, &[b]).unwrap();
        assert_eq!(result.len(), 1);
        assert!((result[0].area() - 50_000_000.0).abs() < 1_000.0);
    }

    #[test]
    fn test_difference_produces_hole() {
        let a = square_part(Point::new(0, 0), 5_000);
        let inner = square_part(Point::new(0, 0), 2_000);
        // Subtracting a through-hole region leaves a part with a hole
        let result = difference(&a, &[inner]).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].holes().len(), 1);
        assert!(result[0].outline().is_ccw());
        assert!(!result[0].holes()[0].is_ccw());
    }

    #[test]
    fn test_intersection() {
        let a = square_part(Point::new(0, 0), 5_000);
        let b = square_part(Point::new(5_000, 0), 5_000);
        let result = intersection(&a, &[b]).unwrap();
        assert_eq!(result.len(), 1);
        // 5mm x 10mm strip
        assert!((result[0].area() - 50_000_000.0).abs() < 1_000.0);
    }

    #[test]
    fn test_intersection_empty_clip() {
        let a = square_part(Point::new(0, 0), 5_000);
        assert!(intersection(&a, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_union_overlapping() {
        let a = square_part(Point::new(0, 0), 5_000);
        let b = square_part(Point::new(5_000, 0), 5_000);
        let result = union(&[a, b]).unwrap();
        assert_eq!(result.len(), 1);
        // 15mm x 10mm
        assert!((result[0].area() - 150_000_000.0).abs() < 1_000.0);
    }

    #[test]
    fn test_inset_square() {
        // 10mm square, 400µm beads, two rings
        let part = square_part(Point::new(0, 0), 5_000);
        let rings = inset(&part, 400, 2);
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0].len(), 1);
        assert_eq!(rings[1].len(), 1);

        // Ring 0 centerline sits 200µm inside the wall, ring 1 at 600µm
        let b0 = rings[0][0].bounding_box();
        assert_eq!(b0.min(), Point::new(-4_800, -4_800));
        assert_eq!(b0.max(), Point::new(4_800, 4_800));
        let b1 = rings[1][0].bounding_box();
        assert_eq!(b1.min(), Point::new(-4_400, -4_400));
        assert_eq!(b1.max(), Point::new(4_400, 4_400));
    }

    #[test]
    fn test_inset_rings_nest_strictly() {
        let part = square_part(Point::new(0, 0), 5_000);
        let rings = inset(&part, 400, 2);
        for ring in &rings {
            for island in ring {
                assert!(island.area() < part.area());
                for p in island.outline().points() {
                    assert!(part.contains_point(p));
                }
            }
        }
    }

    #[test]
    fn test_inset_too_small() {
        // 300µm square cannot take a 400µm bead
        let part = square_part(Point::new(0, 0), 150);
        let rings = inset(&part, 400, 2);
        assert!(rings.is_empty());
    }

    #[test]
    fn test_inset_count_limited_by_size() {
        // 2mm square fits two 400µm rings (200, 600 µm) but not five
        let part = square_part(Point::new(0, 0), 1_000);
        let rings = inset(&part, 400, 5);
        assert!(rings.len() < 5);
        assert!(!rings.is_empty());
    }

    #[test]
    fn test_clip_segment_inside() {
        let part = square_part(Point::new(0, 0), 5_000);
        let line = Line::new(Point::new(-2_000, 0), Point::new(2_000, 0));
        let pieces = clip_segment_to_parts(&line, &[part]);
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0], line);
    }

    #[test]
    fn test_clip_segment_crossing() {
        let part = square_part(Point::new(0, 0), 5_000);
        let line = Line::new(Point::new(-10_000, 0), Point::new(10_000, 0));
        let pieces = clip_segment_to_parts(&line, &[part]);
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].a, Point::new(-5_000, 0));
        assert_eq!(pieces[0].b, Point::new(5_000, 0));
    }

    #[test]
    fn test_clip_segment_through_hole() {
        let outline = square(Point::new(0, 0), 5_000);
        let hole = square(Point::new(0, 0), 1_000);
        let part = LayerPart::normalized(outline, vec![hole]);
        let line = Line::new(Point::new(-10_000, 0), Point::new(10_000, 0));
        let pieces = clip_segment_to_parts(&line, &[part]);
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].a, Point::new(-5_000, 0));
        assert_eq!(pieces[0].b, Point::new(-1_000, 0));
        assert_eq!(pieces[1].a, Point::new(1_000, 0));
        assert_eq!(pieces[1].b, Point::new(5_000, 0));
    }

    #[test]
    fn test_clip_segment_outside() {
        let part = square_part(Point::new(0, 0), 5_000);
        let line = Line::new(Point::new(-10_000, 8_000), Point::new(10_000, 8_000));
        assert!(clip_segment_to_parts(&line, &[part]).is_empty());
    }

    #[test]
    fn test_fill_square_line_count() {
        // 10mm square, 400µm lines, 50% overlap plus 200% interior widening:
        // the boundary grows by 800µm, so every pattern line over the
        // bounding box survives: floor(10000/400) + 1 = 26.
        let part = square_part(Point::new(0, 0), 5_000);
        let bounds = BoundingBox::from_corners(Point::new(-5_000, -5_000), Point::new(5_000, 5_000));
        let pattern = solid_pattern(&bounds, 400);
        let lines = fill(&part, None, 400, &pattern, 50, 200);
        assert_eq!(lines.len(), 26);
    }

    #[test]
    fn test_fill_no_overlap_shrinks_region() {
        // Without any overlap the boundary insets by half a line width,
        // so the outermost pattern lines are dropped.
        let part = square_part(Point::new(0, 0), 5_000);
        let bounds = BoundingBox::from_corners(Point::new(-5_000, -5_000), Point::new(5_000, 5_000));
        let pattern = solid_pattern(&bounds, 400);
        let lines = fill(&part, None, 400, &pattern, 0, 0);
        assert!(lines.len() < 26);
        assert!(!lines.is_empty());
        // Every surviving segment stays inside the shrunk boundary
        for pl in &lines {
            for p in pl.points() {
                assert!(p.x.abs() <= 4_800 && p.y.abs() <= 4_800);
            }
        }
    }

    #[test]
    fn test_fill_clipped_to_clip_part() {
        let area = square_part(Point::new(0, 0), 5_000);
        let clip = square_part(Point::new(0, 0), 2_000);
        let bounds = BoundingBox::from_corners(Point::new(-5_000, -5_000), Point::new(5_000, 5_000));
        let pattern = solid_pattern(&bounds, 400);
        let lines = fill(&area, Some(&clip), 400, &pattern, 50, 200);
        assert!(!lines.is_empty());
        for pl in &lines {
            for p in pl.points() {
                assert!(p.x.abs() <= 2_000 && p.y.abs() <= 2_000);
            }
        }
    }

    #[test]
    fn test_fill_empty_when_area_vanishes() {
        // Tiny area with no overlap vanishes under the half-width inset
        let part = square_part(Point::new(0, 0), 150);
        let bounds = BoundingBox::from_corners(Point::new(-150, -150), Point::new(150, 150));
        let pattern = solid_pattern(&bounds, 400);
        assert!(fill(&part, None, 400, &pattern, 0, 0).is_empty());
    }

    #[test]
    fn test_boolean_operations_deterministic() {
        let a = square_part(Point::new(123, 456), 5_000);
        let b = square_part(Point::new(4_321, -987), 3_333);
        let d1 = difference(&a, &[b.clone()]).unwrap();
        let d2 = difference(&a, &[b]).unwrap();
        assert_eq!(d1, d2);
    }
}
