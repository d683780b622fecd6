//! Mesh optimization: triangle soup to indexed mesh with topology.
//!
//! The optimizer welds duplicate vertices, builds an indexed face table,
//! and resolves, for every oriented face edge, the neighboring face that
//! carries the opposite edge. Open edges (no opposite) are tolerated - the
//! slicer copes with them - but their count is reported.
//!
//! Face neighbor links form a mutual reference graph; faces live in one
//! arena (`Vec`) and neighbors are plain indices into it, `None` standing
//! for an open edge.

use crate::config::Options;
use crate::geometry::{BoundingBox3, Point3};
use crate::mesh::{Triangle, TriangleMesh};
use crate::{Micrometer, Result};
use log::{debug, warn};
use std::collections::HashMap;

/// One face of an optimized model: vertex indices into the point table and
/// the neighbor face across each oriented edge `(v[i], v[i+1])`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OptimizedFace {
    pub vertices: [usize; 3],
    pub neighbors: [Option<usize>; 3],
}

/// An indexed mesh with vertex welding applied and face-neighbor topology
/// resolved.
#[derive(Clone, Debug, Default)]
pub struct OptimizedModel {
    points: Vec<Point3>,
    faces: Vec<OptimizedFace>,
    bounds: BoundingBox3,
    open_edge_count: usize,
}

impl OptimizedModel {
    /// Build an optimized model from a triangle soup.
    ///
    /// `meld_distance` widens the vertex hash key by rounding coordinates
    /// to that quantum, welding near-duplicate vertices; zero welds exact
    /// duplicates only. Degenerate faces (two vertices welded together)
    /// are dropped.
    pub fn from_mesh(mesh: &TriangleMesh, meld_distance: Micrometer) -> Self {
        let quantize = |c: Micrometer| -> Micrometer {
            if meld_distance > 0 {
                (c + meld_distance / 2).div_euclid(meld_distance)
            } else {
                c
            }
        };

        let mut points: Vec<Point3> = Vec::new();
        let mut index_of: HashMap<(Micrometer, Micrometer, Micrometer), usize> = HashMap::new();
        let mut faces: Vec<OptimizedFace> = Vec::new();
        let mut bounds = BoundingBox3::new();
        let mut degenerate = 0usize;

        for triangle in mesh.triangles() {
            let mut indices = [0usize; 3];
            for (slot, vertex) in indices.iter_mut().zip(triangle.vertices) {
                let key = (quantize(vertex.x), quantize(vertex.y), quantize(vertex.z));
                *slot = *index_of.entry(key).or_insert_with(|| {
                    points.push(vertex);
                    bounds.expand(vertex);
                    points.len() - 1
                });
            }
            if indices[0] == indices[1] || indices[1] == indices[2] || indices[2] == indices[0] {
                degenerate += 1;
                continue;
            }
            faces.push(OptimizedFace {
                vertices: indices,
                neighbors: [None; 3],
            });
        }
        if degenerate > 0 {
            debug!("dropped {} degenerate faces during welding", degenerate);
        }

        // Oriented edge (a, b) -> owning face; the neighbor across an edge
        // is the face carrying (b, a).
        let mut edge_owner: HashMap<(usize, usize), usize> = HashMap::new();
        let mut duplicate_edges = 0usize;
        for (face_idx, face) in faces.iter().enumerate() {
            for i in 0..3 {
                let a = face.vertices[i];
                let b = face.vertices[(i + 1) % 3];
                if edge_owner.insert((a, b), face_idx).is_some() {
                    duplicate_edges += 1;
                }
            }
        }
        if duplicate_edges > 0 {
            warn!(
                "{} oriented edges are shared by more than one face (non-manifold mesh)",
                duplicate_edges
            );
        }

        let mut open_edge_count = 0usize;
        for face_idx in 0..faces.len() {
            for i in 0..3 {
                let a = faces[face_idx].vertices[i];
                let b = faces[face_idx].vertices[(i + 1) % 3];
                match edge_owner.get(&(b, a)) {
                    Some(&neighbor) => faces[face_idx].neighbors[i] = Some(neighbor),
                    None => open_edge_count += 1,
                }
            }
        }

        Self {
            points,
            faces,
            bounds,
            open_edge_count,
        }
    }

    /// The welded vertex table.
    #[inline]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// The face table with neighbor topology.
    #[inline]
    pub fn faces(&self) -> &[OptimizedFace] {
        &self.faces
    }

    /// Axis-aligned bounds of the model.
    #[inline]
    pub fn bounds(&self) -> &BoundingBox3 {
        &self.bounds
    }

    /// Number of oriented edges without a neighboring face.
    #[inline]
    pub fn open_edge_count(&self) -> usize {
        self.open_edge_count
    }

    /// Vertex `i` of a face.
    #[inline]
    pub fn face_point(&self, face: &OptimizedFace, i: usize) -> Point3 {
        self.points[face.vertices[i]]
    }

    /// Translate the model so that its x/y center lies at `center` and its
    /// lowest point sits on the build plate (z = 0).
    pub fn center_on(&mut self, center: Point3) {
        if self.bounds.is_empty() {
            return;
        }
        let model_center = self.bounds.center();
        let offset = Point3::new(
            center.x - model_center.x,
            center.y - model_center.y,
            -self.bounds.min().z,
        );
        let mut bounds = BoundingBox3::new();
        for p in &mut self.points {
            *p = *p + offset;
            bounds.expand(*p);
        }
        self.bounds = bounds;
    }

    /// Reconstruct a triangle soup from the indexed representation.
    pub fn to_triangle_mesh(&self) -> TriangleMesh {
        let mut mesh = TriangleMesh::new();
        for face in &self.faces {
            mesh.push(Triangle::new(
                self.points[face.vertices[0]],
                self.points[face.vertices[1]],
                self.points[face.vertices[2]],
            ));
        }
        mesh
    }
}

/// The mesh optimization pass: welding, topology, and bed centering per
/// the configured options.
pub struct Optimizer<'a> {
    options: &'a Options,
}

impl<'a> Optimizer<'a> {
    /// Create an optimizer reading `MeldDistance` and the printer center
    /// from the options.
    pub fn new(options: &'a Options) -> Self {
        Self { options }
    }

    /// Optimize a raw model and center it on the print bed.
    pub fn optimize(&self, mesh: &TriangleMesh) -> Result<OptimizedModel> {
        let mut model = OptimizedModel::from_mesh(mesh, self.options.meld_distance);
        model.center_on(self.options.printer.center);
        debug!(
            "optimized model: {} vertices, {} faces, {} open edges",
            model.points().len(),
            model.faces().len(),
            model.open_edge_count()
        );
        if model.open_edge_count() > 0 {
            warn!("model has {} open edges", model.open_edge_count());
        }
        Ok(model)
    }
}
