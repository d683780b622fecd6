//! STL file loading.
//!
//! Supports both ASCII and binary STL. Detection: a file starting with
//! `solid` whose first 80 bytes contain no NUL byte is treated as ASCII,
//! otherwise as binary (some binary exporters put "solid" in the header).
//!
//! Binary layout: 80-byte header, u32 triangle count, then 50-byte records
//! (12 bytes normal, three 12-byte vertices, 2 attribute bytes). The
//! normal is ignored. ASCII follows the `facet` / `outer loop` / `vertex`
//! grammar; unknown lines are skipped, and each `solid` block yields one
//! mesh.
//!
//! STL coordinates are millimeters; vertices are converted to integer
//! micrometers on read.

use super::{Triangle, TriangleMesh};
use crate::geometry::Point3;
use crate::{from_mm, Error, Result};
use std::path::Path;

const HEADER_SIZE: usize = 80;
const RECORD_SIZE: usize = 50;

/// Load all models from an STL file.
///
/// Binary files contain a single model; ASCII files may contain several
/// `solid` blocks, one model each.
pub fn load_stl(path: &Path) -> Result<Vec<TriangleMesh>> {
    let bytes = std::fs::read(path)?;
    if is_ascii_stl(&bytes) {
        let text = String::from_utf8_lossy(&bytes);
        parse_ascii(&text)
    } else {
        parse_binary(&bytes).map(|mesh| vec![mesh])
    }
}

fn is_ascii_stl(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(HEADER_SIZE)];
    let text = String::from_utf8_lossy(head);
    text.trim_start().starts_with("solid") && !head.contains(&0)
}

fn parse_binary(bytes: &[u8]) -> Result<TriangleMesh> {
    if bytes.len() < HEADER_SIZE + 4 {
        return Err(Error::MalformedFile(
            "file too small to be a binary STL".to_string(),
        ));
    }
    let count = u32::from_le_bytes([
        bytes[HEADER_SIZE],
        bytes[HEADER_SIZE + 1],
        bytes[HEADER_SIZE + 2],
        bytes[HEADER_SIZE + 3],
    ]) as usize;

    let body = &bytes[HEADER_SIZE + 4..];
    if body.len() < count * RECORD_SIZE {
        return Err(Error::MalformedFile(format!(
            "binary STL truncated: {} triangles declared, {} bytes available",
            count,
            body.len()
        )));
    }

    let mut mesh = TriangleMesh::new();
    for i in 0..count {
        let record = &body[i * RECORD_SIZE..(i + 1) * RECORD_SIZE];
        // skip the 12-byte normal
        let a = read_vertex(&record[12..24]);
        let b = read_vertex(&record[24..36]);
        let c = read_vertex(&record[36..48]);
        mesh.push(Triangle::new(a, b, c));
    }
    Ok(mesh)
}

fn read_vertex(buf: &[u8]) -> Point3 {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    Point3::new(
        from_mm(f64::from(x)),
        from_mm(f64::from(y)),
        from_mm(f64::from(z)),
    )
}

fn parse_ascii(text: &str) -> Result<Vec<TriangleMesh>> {
    let mut models = Vec::new();
    let mut mesh = TriangleMesh::new();
    let mut in_solid = false;
    let mut vertices: Vec<Point3> = Vec::with_capacity(3);

    for (line_nr, line) in text.lines().enumerate() {
        let mut words = line.split_whitespace();
        let Some(keyword) = words.next() else {
            continue;
        };
        match keyword {
            "solid" => {
                in_solid = true;
            }
            "vertex" => {
                let mut coord = |axis: &str| -> Result<f64> {
                    words
                        .next()
                        .and_then(|w| w.parse::<f64>().ok())
                        .ok_or_else(|| {
                            Error::MalformedFile(format!(
                                "line {}: bad {} coordinate in vertex",
                                line_nr + 1,
                                axis
                            ))
                        })
                };
                let x = coord("x")?;
                let y = coord("y")?;
                let z = coord("z")?;
                vertices.push(Point3::new(from_mm(x), from_mm(y), from_mm(z)));
            }
            "endfacet" => {
                if vertices.len() != 3 {
                    return Err(Error::MalformedFile(format!(
                        "line {}: facet with {} vertices",
                        line_nr + 1,
                        vertices.len()
                    )));
                }
                mesh.push(Triangle::new(vertices[0], vertices[1], vertices[2]));
                vertices.clear();
            }
            "endsolid" => {
                if in_solid {
                    models.push(std::mem::take(&mut mesh));
                }
                in_solid = false;
            }
            // facet, outer, endloop and anything unknown carry no data
            _ => {}
        }
    }

    // Tolerate a missing endsolid
    if in_solid && !mesh.is_empty() {
        models.push(mesh);
    }

    if models.is_empty() {
        return Err(Error::MalformedFile(
            "ASCII STL contains no triangles".to_string(),
        ));
    }
    Ok(models)
}
