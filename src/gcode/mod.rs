//! G-code generation.
//!
//! The generator runs an ordered list of [`Renderer`]s over the modified
//! layer stack; each renderer reads typed layer attributes and emits
//! motion commands through the [`GCodeBuilder`]. Renderer order: pre-layer
//! setup, perimeters, bottom fill, top fill, sparse fill.
//!
//! The generator is a pure function of the layers and options: identical
//! inputs produce byte-identical output.

mod builder;
mod renderer;

pub use builder::GCodeBuilder;
pub use renderer::{FillAttribute, FillRenderer, PerimeterRenderer, PreLayerRenderer, Renderer};

use crate::config::Options;
use crate::slice::PartitionedLayer;
use crate::Result;
use std::path::Path;

/// G-code command types.
#[derive(Clone, Debug, PartialEq)]
pub enum GCodeCommand {
    /// G0 - Rapid move (travel)
    RapidMove {
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
        f: Option<f64>,
    },
    /// G1 - Linear move (extrusion)
    LinearMove {
        x: Option<f64>,
        y: Option<f64>,
        e: Option<f64>,
        f: Option<f64>,
    },
    /// G28 - Home all axes
    Home,
    /// G90 - Absolute positioning
    AbsolutePositioning,
    /// G92 - Set position
    SetPosition { e: Option<f64> },
    /// M82 - Absolute extrusion
    AbsoluteExtrusion,
    /// Comment
    Comment(String),
}

impl GCodeCommand {
    /// Convert the command to a g-code line (without newline).
    pub fn to_gcode(&self) -> String {
        match self {
            GCodeCommand::RapidMove { x, y, z, f } => {
                let mut cmd = String::from("G0");
                if let Some(v) = x {
                    cmd.push_str(&format!(" X{:.3}", v));
                }
                if let Some(v) = y {
                    cmd.push_str(&format!(" Y{:.3}", v));
                }
                if let Some(v) = z {
                    cmd.push_str(&format!(" Z{:.3}", v));
                }
                if let Some(v) = f {
                    cmd.push_str(&format!(" F{:.0}", v));
                }
                cmd
            }
            GCodeCommand::LinearMove { x, y, e, f } => {
                let mut cmd = String::from("G1");
                if let Some(v) = x {
                    cmd.push_str(&format!(" X{:.3}", v));
                }
                if let Some(v) = y {
                    cmd.push_str(&format!(" Y{:.3}", v));
                }
                if let Some(v) = e {
                    cmd.push_str(&format!(" E{:.5}", v));
                }
                if let Some(v) = f {
                    cmd.push_str(&format!(" F{:.0}", v));
                }
                cmd
            }
            GCodeCommand::Home => "G28".to_string(),
            GCodeCommand::AbsolutePositioning => "G90".to_string(),
            GCodeCommand::SetPosition { e } => {
                let mut cmd = String::from("G92");
                if let Some(v) = e {
                    cmd.push_str(&format!(" E{:.5}", v));
                }
                cmd
            }
            GCodeCommand::AbsoluteExtrusion => "M82".to_string(),
            GCodeCommand::Comment(text) => format!(";{}", text),
        }
    }
}

/// G-code generator driving an ordered renderer list.
pub struct GCodeGenerator<'a> {
    options: &'a Options,
    renderers: Vec<Box<dyn Renderer + 'a>>,
}

impl<'a> GCodeGenerator<'a> {
    /// Create a generator with the default renderer list.
    pub fn new(options: &'a Options) -> Self {
        Self {
            options,
            renderers: vec![
                Box::new(PreLayerRenderer),
                Box::new(PerimeterRenderer),
                Box::new(FillRenderer::new(
                    FillAttribute::Bottom,
                    &["TYPE:FILL", "BOTTOM-FILL"],
                )),
                Box::new(FillRenderer::new(
                    FillAttribute::Top,
                    &["TYPE:FILL", "TOP-FILL"],
                )),
                Box::new(FillRenderer::new(
                    FillAttribute::Sparse,
                    &["TYPE:FILL", "INTERNAL-FILL"],
                )),
            ],
        }
    }

    /// Create a generator with a custom renderer list.
    pub fn with_renderers(options: &'a Options, renderers: Vec<Box<dyn Renderer + 'a>>) -> Self {
        Self { options, renderers }
    }

    /// Generate the complete g-code program for the layer stack.
    pub fn generate(&self, layers: &[PartitionedLayer]) -> String {
        let mut builder = GCodeBuilder::new();
        builder.comment(&format!("generated by microslice {}", crate::VERSION));
        builder.command(&GCodeCommand::AbsolutePositioning);
        builder.command(&GCodeCommand::AbsoluteExtrusion);
        builder.command(&GCodeCommand::Home);
        builder.command(&GCodeCommand::SetPosition { e: Some(0.0) });

        for layer_index in 0..layers.len() {
            for renderer in &self.renderers {
                renderer.render(&mut builder, layer_index, layers, self.options);
            }
        }
        builder.finish()
    }
}

/// Writes a generated g-code program to its destination path.
pub struct GCodeFileWriter;

impl GCodeFileWriter {
    /// Write the program; failures surface as IO errors.
    pub fn write(&self, gcode: &str, path: &Path) -> Result<()> {
        std::fs::write(path, gcode)?;
        Ok(())
    }
}
