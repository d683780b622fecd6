//! # microslice
//!
//! A slicer for fused-filament 3D printing: it converts a closed triangle
//! mesh into a layered g-code program for a cartesian extrusion printer.
//!
//! The pipeline is a strictly ordered sequence of passes:
//! - STL mesh loading into a raw triangle soup
//! - Mesh optimization (vertex welding, face-neighbor topology)
//! - Slicing into horizontal polygonal layers
//! - Layer modification (perimeters, bottom/top solid fill, sparse infill)
//! - G-code generation and writing
//!
//! ## Example
//!
//! ```rust,ignore
//! use microslice::{config::Options, pipeline::Pipeline};
//!
//! let pipeline = Pipeline::new(Options::default());
//! pipeline.process("model.stl".as_ref(), "model.gcode".as_ref())?;
//! ```

pub mod clip;
pub mod config;
pub mod gcode;
pub mod geometry;
pub mod mesh;
pub mod modify;
pub mod optimize;
pub mod pipeline;
pub mod slice;

pub use config::Options;
pub use geometry::{BoundingBox, BoundingBox3, LayerPart, Point, Point3, Polygon, Polyline};
pub use mesh::{Triangle, TriangleMesh};
pub use optimize::{OptimizedModel, Optimizer};
pub use pipeline::Pipeline;
pub use slice::{LayerAttribute, PartitionedLayer, Slicer};

/// Coordinate type used throughout the slicer.
/// All lengths are signed integer micrometers so that comparisons are exact
/// and repeated clipping operations on the same inputs are bit-identical.
pub type Micrometer = i64;

/// Floating-point length in millimeters, used at the crate boundary
/// (file formats, CLI flags, g-code text) but never in inner loops.
pub type Millimeter = f64;

/// Micrometers per millimeter.
pub const MICROMETERS_PER_MILLIMETER: f64 = 1000.0;

/// Convert a length in millimeters to integer micrometers.
#[inline]
pub fn from_mm(v: Millimeter) -> Micrometer {
    (v * MICROMETERS_PER_MILLIMETER).round() as Micrometer
}

/// Convert an integer micrometer length to millimeters.
#[inline]
pub fn to_mm(v: Micrometer) -> Millimeter {
    v as Millimeter / MICROMETERS_PER_MILLIMETER
}

/// Result type used throughout the slicer.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for slicer operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed model file: {0}")]
    MalformedFile(String),

    #[error("geometry engine failure: {0}")]
    GeometryEngine(String),

    #[error("modifier {stage} failed at layer {layer}: {message}")]
    PipelineStage {
        stage: &'static str,
        layer: usize,
        message: String,
    },
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
