//! Configuration types.
//!
//! [`Options`] is an immutable record passed by reference through every
//! component constructor; no component mutates it and none reads ambient
//! state. All dimensions are integer micrometers, speeds are mm/s.

use crate::geometry::Point3;
use crate::Micrometer;
use serde::{Deserialize, Serialize};

/// Settings describing the print process itself.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintOptions {
    /// Print speed on the first layer (mm/s).
    pub initial_layer_speed: f64,
    /// Print speed on all other layers (mm/s).
    pub layer_speed: f64,
    /// Print speed for the outermost perimeter loop (mm/s).
    pub outer_perimeter_speed: f64,

    /// Thickness of the first layer (µm).
    pub initial_layer_thickness: Micrometer,
    /// Thickness of every layer above the first (µm).
    pub layer_thickness: Micrometer,

    /// Number of concentric walls per part.
    pub inset_count: usize,

    /// Bead-to-bead overlap between infill and the innermost perimeter,
    /// as a percentage of extrusion width (0-100).
    pub infill_overlap_percent: u32,
    /// Sparse infill density (0-100); 0 disables sparse infill.
    pub infill_percent: u32,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            initial_layer_speed: 30.0,
            layer_speed: 60.0,
            outer_perimeter_speed: 40.0,
            initial_layer_thickness: 200,
            layer_thickness: 200,
            inset_count: 2,
            infill_overlap_percent: 50,
            infill_percent: 20,
        }
    }
}

/// Settings describing the filament.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FilamentOptions {
    /// Filament diameter (µm).
    pub filament_diameter: Micrometer,
}

impl Default for FilamentOptions {
    fn default() -> Self {
        Self {
            filament_diameter: 1_750,
        }
    }
}

/// Settings describing the printer.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterOptions {
    /// Width of one extruded bead, which is also the inset step (µm).
    pub extrusion_width: Micrometer,
    /// Center of the print bed; models are translated onto it (µm).
    pub center: Point3,
}

impl Default for PrinterOptions {
    fn default() -> Self {
        Self {
            extrusion_width: 400,
            center: Point3::new(100_000, 100_000, 0),
        }
    }
}

/// The complete slicer configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub print: PrintOptions,
    pub filament: FilamentOptions,
    pub printer: PrinterOptions,

    /// Vertex welding quantum in the mesh optimizer (µm).
    pub meld_distance: Micrometer,
    /// Maximum endpoint gap bridged when joining open polygon chains (µm).
    pub join_polygon_snap_distance: Micrometer,
    /// Maximum closing gap accepted for a nearly-closed polygon (µm).
    pub finish_polygon_snap_distance: Micrometer,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            print: PrintOptions::default(),
            filament: FilamentOptions::default(),
            printer: PrinterOptions::default(),
            meld_distance: 30,
            join_polygon_snap_distance: 100,
            finish_polygon_snap_distance: 1_000,
        }
    }
}

impl Options {
    /// Check the option values for internal consistency.
    pub fn validate(&self) -> Result<(), String> {
        if self.print.initial_layer_thickness <= 0 {
            return Err("initial layer thickness must be positive".to_string());
        }
        if self.print.layer_thickness <= 0 {
            return Err("layer thickness must be positive".to_string());
        }
        if self.printer.extrusion_width <= 0 {
            return Err("extrusion width must be positive".to_string());
        }
        if self.filament.filament_diameter <= 0 {
            return Err("filament diameter must be positive".to_string());
        }
        if self.print.infill_overlap_percent > 100 {
            return Err("infill overlap percent must be in 0..=100".to_string());
        }
        if self.print.infill_percent > 100 {
            return Err("infill percent must be in 0..=100".to_string());
        }
        if self.meld_distance < 0
            || self.join_polygon_snap_distance < 0
            || self.finish_polygon_snap_distance < 0
        {
            return Err("distances must not be negative".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = Options::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.print.layer_thickness, 200);
        assert_eq!(options.print.inset_count, 2);
        assert_eq!(options.printer.extrusion_width, 400);
        assert_eq!(options.filament.filament_diameter, 1_750);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut options = Options::default();
        options.print.layer_thickness = 0;
        assert!(options.validate().is_err());

        let mut options = Options::default();
        options.print.infill_percent = 101;
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let options = Options::default();
        let json = serde_json::to_string(&options).unwrap();
        let back: Options = serde_json::from_str(&json).unwrap();
        assert_eq!(back.print.layer_thickness, options.print.layer_thickness);
        assert_eq!(back.printer.center, options.printer.center);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let back: Options = serde_json::from_str(r#"{"print":{"infill_percent":0}}"#).unwrap();
        assert_eq!(back.print.infill_percent, 0);
        assert_eq!(back.print.layer_thickness, 200);
        assert_eq!(back.meld_distance, 30);
    }
}
