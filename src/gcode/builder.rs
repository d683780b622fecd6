//! G-code text builder with position and extrusion tracking.

use super::GCodeCommand;
use crate::geometry::{Point, Polygon, Polyline};
use crate::{to_mm, Micrometer};

/// Accumulates g-code text while tracking the toolhead position and the
/// absolute extrusion axis.
///
/// Extrusion is volumetric: one millimeter of travel deposits a bead of
/// `layer_thickness x line_width` cross-section, fed by the corresponding
/// length of filament.
pub struct GCodeBuilder {
    buffer: String,
    position: Option<Point>,
    e: f64,
    extrusion_per_mm: f64,
}

impl Default for GCodeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GCodeBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            position: None,
            e: 0.0,
            extrusion_per_mm: 0.0,
        }
    }

    /// Append a command as one line.
    pub fn command(&mut self, cmd: &GCodeCommand) {
        self.buffer.push_str(&cmd.to_gcode());
        self.buffer.push('\n');
    }

    /// Append a comment line.
    pub fn comment(&mut self, text: &str) {
        self.command(&GCodeCommand::Comment(text.to_string()));
    }

    /// Configure the filament feed per millimeter of travel for the
    /// current layer geometry.
    pub fn set_extrusion(
        &mut self,
        layer_thickness: Micrometer,
        line_width: Micrometer,
        filament_diameter: Micrometer,
    ) {
        let bead_area = to_mm(layer_thickness) * to_mm(line_width);
        let radius = to_mm(filament_diameter) / 2.0;
        let filament_area = std::f64::consts::PI * radius * radius;
        self.extrusion_per_mm = bead_area / filament_area;
    }

    /// Travel (no extrusion) to a layer height.
    pub fn move_z(&mut self, z: Micrometer, speed: f64) {
        self.command(&GCodeCommand::RapidMove {
            x: None,
            y: None,
            z: Some(to_mm(z)),
            f: Some(speed * 60.0),
        });
    }

    /// Travel (no extrusion) to a point.
    pub fn travel(&mut self, p: Point, speed: f64) {
        if self.position == Some(p) {
            return;
        }
        self.command(&GCodeCommand::RapidMove {
            x: Some(to_mm(p.x)),
            y: Some(to_mm(p.y)),
            z: None,
            f: Some(speed * 60.0),
        });
        self.position = Some(p);
    }

    /// Extrude along a straight line to a point.
    pub fn extrude_to(&mut self, p: Point, speed: f64) {
        let Some(from) = self.position else {
            // No known position: an extrusion move makes no sense, treat
            // as travel to establish one.
            self.travel(p, speed);
            return;
        };
        if from == p {
            return;
        }
        self.e += from.distance(&p) / 1000.0 * self.extrusion_per_mm;
        self.command(&GCodeCommand::LinearMove {
            x: Some(to_mm(p.x)),
            y: Some(to_mm(p.y)),
            e: Some(self.e),
            f: Some(speed * 60.0),
        });
        self.position = Some(p);
    }

    /// Print a closed polygon: travel to its first vertex, extrude around
    /// the loop and back to the start.
    pub fn add_polygon(&mut self, polygon: &Polygon, travel_speed: f64, print_speed: f64) {
        let points = polygon.points();
        if points.len() < 3 {
            return;
        }
        self.travel(points[0], travel_speed);
        for p in &points[1..] {
            self.extrude_to(*p, print_speed);
        }
        self.extrude_to(points[0], print_speed);
    }

    /// Print an open polyline: travel to its first point, extrude through
    /// the rest.
    pub fn add_polyline(&mut self, polyline: &Polyline, travel_speed: f64, print_speed: f64) {
        let points = polyline.points();
        if points.len() < 2 {
            return;
        }
        self.travel(points[0], travel_speed);
        for p in &points[1..] {
            self.extrude_to(*p, print_speed);
        }
    }

    /// Finish and return the accumulated program text.
    pub fn finish(self) -> String {
        self.buffer
    }
}
