//! Slicing: cutting the optimized mesh into horizontal polygonal layers.
//!
//! For every face and every layer plane crossing it, the slicer computes
//! the intersection segment and remembers which face edge the segment ends
//! on. Segments are then stitched into closed polygons by walking the
//! face-neighbor topology: the next segment lives on the neighbor across
//! the edge the current segment ends on. Walks that hit an open edge yield
//! open chains, which are closed heuristically (endpoint joining within
//! `JoinPolygonSnapDistance`, then accepting short gaps below
//! `FinishPolygonSnapDistance`); unclosable chains are discarded and
//! counted.
//!
//! Finally the polygons of each layer are classified by orientation and
//! containment into [`LayerPart`]s: outlines counter-clockwise, holes
//! clockwise attached to their closest enclosing outline.

mod layer;

pub use layer::{
    AttributeKind, InsetIslands, LayerAttribute, PartInsets, PartitionedLayer, Perimeters,
};

use crate::config::Options;
use crate::geometry::{lerp, LayerPart, LayerParts, Point, Point3, Polygon, Polygons};
use crate::optimize::{OptimizedFace, OptimizedModel};
use crate::{Micrometer, Result};
use log::{debug, warn};
use std::collections::HashMap;

/// One face-plane intersection segment.
///
/// `end_face` is the neighbor across the face edge the segment ends on;
/// the stitching walk continues there.
#[derive(Clone, Copy, Debug)]
struct SliceSegment {
    start: Point,
    end: Point,
    end_face: Option<usize>,
    added: bool,
}

/// Segments of one layer plus the face-to-segment index used by the
/// stitching walk.
#[derive(Default)]
struct LayerIntersections {
    segments: Vec<SliceSegment>,
    face_to_segment: HashMap<usize, usize>,
}

impl LayerIntersections {
    fn add(&mut self, face_index: usize, segment: SliceSegment) {
        self.face_to_segment.insert(face_index, self.segments.len());
        self.segments.push(segment);
    }
}

/// Counters reported once per slicing run.
#[derive(Default)]
struct StitchCounters {
    open_chains: usize,
    discarded: usize,
}

/// The slicing pass.
pub struct Slicer<'a> {
    options: &'a Options,
}

impl<'a> Slicer<'a> {
    /// Create a slicer reading layer thicknesses and stitching snap
    /// distances from the options.
    pub fn new(options: &'a Options) -> Self {
        Self { options }
    }

    /// Cut the model into layers. Slicing always succeeds; a layer with
    /// zero parts is a valid outcome (a gap in the object).
    pub fn slice(&self, model: &OptimizedModel) -> Result<Vec<PartitionedLayer>> {
        let initial = self.options.print.initial_layer_thickness;
        let thickness = self.options.print.layer_thickness;
        let layer_count = if model.bounds().is_empty() {
            0
        } else {
            ((model.bounds().max().z - initial).div_euclid(thickness) + 1).max(0) as usize
        };
        let heights: Vec<Micrometer> = (0..layer_count)
            .map(|i| layer_height(initial, thickness, i))
            .collect();
        debug!("slicing into {} layers", layer_count);

        let mut intersections: Vec<LayerIntersections> = Vec::new();
        intersections.resize_with(layer_count, LayerIntersections::default);

        for (face_index, face) in model.faces().iter().enumerate() {
            let p = [
                model.face_point(face, 0),
                model.face_point(face, 1),
                model.face_point(face, 2),
            ];
            let min_z = p[0].z.min(p[1].z).min(p[2].z);
            let max_z = p[0].z.max(p[1].z).max(p[2].z);

            // Only planes strictly inside the face's z-range can cross it.
            let first = heights.partition_point(|&z| z <= min_z);
            for layer_index in first..layer_count {
                let z = heights[layer_index];
                if z >= max_z {
                    break;
                }
                if let Some(segment) = slice_face(face, &p, z) {
                    intersections[layer_index].add(face_index, segment);
                }
            }
        }

        let mut counters = StitchCounters::default();
        let layers = intersections
            .into_iter()
            .zip(heights)
            .map(|(mut layer, z)| {
                let polygons = make_polygons(
                    &mut layer,
                    self.options.join_polygon_snap_distance,
                    self.options.finish_polygon_snap_distance,
                    &mut counters,
                );
                PartitionedLayer::new(z, partition_polygons(polygons))
            })
            .collect();

        if counters.open_chains > 0 {
            warn!(
                "stitching left {} open polygons ({} discarded)",
                counters.open_chains, counters.discarded
            );
        }
        Ok(layers)
    }
}

/// World z of layer `i`: the first layer is cut through its own middle,
/// subsequent layers step by the layer thickness.
fn layer_height(initial: Micrometer, thickness: Micrometer, i: usize) -> Micrometer {
    if i == 0 {
        initial / 2
    } else {
        initial + thickness * (i as Micrometer - 1)
    }
}

/// Interpolate the crossing of edge (a, b) with the plane at `z`.
///
/// The interpolation always runs from the lower vertex index to the
/// higher so both faces sharing the edge compute the identical point.
fn interpolate_edge(a: Point3, ia: usize, b: Point3, ib: usize, z: Micrometer) -> Point {
    let (a, b) = if ia <= ib { (a, b) } else { (b, a) };
    let t = (z - a.z) as f64 / (b.z - a.z) as f64;
    lerp(a.xy(), b.xy(), t)
}

/// Intersect one face with the plane at `z`.
///
/// The vertex below/above classification picks the segment direction so
/// that outlines of a solid wind counter-clockwise; vertices exactly on
/// the plane count as above. Flat faces produce nothing. The returned
/// segment ends on the face edge whose neighbor continues the walk.
fn slice_face(face: &OptimizedFace, p: &[Point3; 3], z: Micrometer) -> Option<SliceSegment> {
    let [a, b, c] = *p;
    let v = face.vertices;
    let n = face.neighbors;

    // (pivot, start edge endpoint, end edge endpoint, end edge index)
    let (p0, i0, p1, i1, p2, i2, end_edge) = if a.z < z && b.z >= z && c.z >= z {
        (a, v[0], c, v[2], b, v[1], 0)
    } else if a.z > z && b.z < z && c.z < z {
        (a, v[0], b, v[1], c, v[2], 2)
    } else if b.z < z && a.z >= z && c.z >= z {
        (b, v[1], a, v[0], c, v[2], 1)
    } else if b.z > z && a.z < z && c.z < z {
        (b, v[1], c, v[2], a, v[0], 0)
    } else if c.z < z && a.z >= z && b.z >= z {
        (c, v[2], b, v[1], a, v[0], 2)
    } else if c.z > z && a.z < z && b.z < z {
        (c, v[2], a, v[0], b, v[1], 1)
    } else {
        return None;
    };

    Some(SliceSegment {
        start: interpolate_edge(p0, i0, p1, i1, z),
        end: interpolate_edge(p0, i0, p2, i2, z),
        end_face: n[end_edge],
        added: false,
    })
}

/// Stitch a layer's segments into polygons by walking face neighbors.
fn make_polygons(
    layer: &mut LayerIntersections,
    join_snap: Micrometer,
    finish_snap: Micrometer,
    counters: &mut StitchCounters,
) -> Polygons {
    let mut polygons = Polygons::new();
    let mut open_chains: Vec<Vec<Point>> = Vec::new();

    for start in 0..layer.segments.len() {
        if layer.segments[start].added {
            continue;
        }
        let mut chain = vec![layer.segments[start].start];
        let mut closed = false;
        let mut current = start;
        loop {
            layer.segments[current].added = true;
            chain.push(layer.segments[current].end);
            let Some(next_face) = layer.segments[current].end_face else {
                break;
            };
            let Some(&next) = layer.face_to_segment.get(&next_face) else {
                break;
            };
            if next == start {
                closed = true;
                break;
            }
            if layer.segments[next].added {
                break;
            }
            current = next;
        }

        if closed {
            // The last end coincides with the first start; from_points
            // drops exact duplicates, conditioning removes near ones.
            polygons.push(Polygon::from_points(chain));
        } else {
            open_chains.push(chain);
        }
    }

    counters.open_chains += open_chains.len();
    close_open_chains(open_chains, join_snap, finish_snap, &mut polygons, counters);

    polygons.retain_mut(|poly| {
        poly.remove_duplicate_points();
        poly.len() >= 3
    });
    polygons
}

/// Close open chains heuristically: first join chain ends within the
/// join snap distance (closing a chain onto itself when its own ends
/// meet), then accept remaining chains whose gap stays below the finish
/// snap distance. Whatever is left is discarded.
fn close_open_chains(
    mut chains: Vec<Vec<Point>>,
    join_snap: Micrometer,
    finish_snap: Micrometer,
    polygons: &mut Polygons,
    counters: &mut StitchCounters,
) {
    let join2 = join_snap as i128 * join_snap as i128;
    let finish2 = finish_snap as i128 * finish_snap as i128;

    loop {
        // Best pending connection over all chain-end pairs.
        let mut best: Option<(usize, usize, bool, i128)> = None;
        for i in 0..chains.len() {
            let tail = *chains[i].last().unwrap();
            for j in 0..chains.len() {
                if i == j {
                    let d2 = tail.distance_squared(&chains[i][0]);
                    if chains[i].len() >= 3
                        && d2 < join2
                        && best.map_or(true, |b| d2 < b.3)
                    {
                        best = Some((i, i, false, d2));
                    }
                    continue;
                }
                let d_head = tail.distance_squared(&chains[j][0]);
                if d_head < join2 && best.map_or(true, |b| d_head < b.3) {
                    best = Some((i, j, false, d_head));
                }
                let d_tail = tail.distance_squared(chains[j].last().unwrap());
                if d_tail < join2 && best.map_or(true, |b| d_tail < b.3) {
                    best = Some((i, j, true, d_tail));
                }
            }
        }

        let Some((i, j, reversed, _)) = best else {
            break;
        };
        if i == j {
            let chain = chains.swap_remove(i);
            polygons.push(Polygon::from_points(chain));
            continue;
        }
        let mut other = chains.swap_remove(j);
        // swap_remove may have moved chain i
        let i = if i == chains.len() { j } else { i };
        if reversed {
            other.reverse();
        }
        chains[i].extend(other);
    }

    for chain in chains {
        let gap2 = match (chain.first(), chain.last()) {
            (Some(f), Some(l)) => f.distance_squared(l),
            _ => i128::MAX,
        };
        if chain.len() >= 3 && gap2 < finish2 {
            polygons.push(Polygon::from_points(chain));
        } else {
            counters.discarded += 1;
        }
    }
}

/// Classify and nest a layer's polygons into parts.
///
/// Polygons are processed from largest absolute area to smallest. A
/// polygon enclosed by an even number of larger polygons is an outline
/// (forced counter-clockwise); an odd count makes it a hole (forced
/// clockwise) of the closest enclosing outline.
fn partition_polygons(polygons: Polygons) -> LayerParts {
    let polygons: Polygons = polygons
        .into_iter()
        .filter(|p| p.len() >= 3 && p.signed_area_doubled() != 0)
        .collect();

    let mut order: Vec<usize> = (0..polygons.len()).collect();
    order.sort_by_key(|&i| (std::cmp::Reverse(polygons[i].signed_area_doubled().abs()), i));

    let mut parts: LayerParts = Vec::new();
    // Part index for polygons that became outlines, in processing order.
    let mut outline_part: Vec<(usize, Option<usize>)> = Vec::new();

    for &idx in &order {
        let probe = polygons[idx].points()[0];
        let mut depth = 0usize;
        let mut closest_outline: Option<usize> = None;
        for &(enclosing_idx, part) in &outline_part {
            if polygons[enclosing_idx].contains_point(&probe) {
                depth += 1;
                if let Some(part) = part {
                    // Processing order runs large to small, so the last
                    // containing outline is the closest one.
                    closest_outline = Some(part);
                }
            }
        }

        let mut poly = polygons[idx].clone();
        if depth % 2 == 0 {
            poly.make_ccw();
            parts.push(LayerPart::new(poly));
            outline_part.push((idx, Some(parts.len() - 1)));
        } else {
            poly.make_cw();
            // A hole with no enclosing outline is geometric noise.
            if let Some(part) = closest_outline {
                parts[part].push_hole(poly);
            }
            outline_part.push((idx, None));
        }
    }
    parts
}
