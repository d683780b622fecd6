//! Pipeline orchestration: mesh file to g-code file.
//!
//! Sequences the passes: read mesh → optimize → slice → run the modifier
//! chain → generate g-code → write. Every stage yields a value or an
//! error; the first error aborts the pipeline and surfaces to the caller.

use crate::config::Options;
use crate::gcode::{GCodeFileWriter, GCodeGenerator};
use crate::mesh::{load_stl, TriangleMesh};
use crate::modify::{default_modifiers, run_modifiers};
use crate::optimize::Optimizer;
use crate::slice::{PartitionedLayer, Slicer};
use crate::{Error, Result};
use log::{debug, info};
use std::path::Path;
use std::time::Instant;

/// The complete slicing pipeline for one configuration.
pub struct Pipeline {
    options: Options,
}

impl Pipeline {
    /// Create a pipeline over an immutable configuration.
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    /// The configuration in use.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Slice a mesh file into a g-code file.
    pub fn process(&self, input: &Path, output: &Path) -> Result<()> {
        let started = Instant::now();

        let mut models = load_stl(input)?;
        if models.is_empty() {
            return Err(Error::MalformedFile(
                "model file contains no mesh".to_string(),
            ));
        }
        if models.len() > 1 {
            debug!("file contains {} models, slicing the first", models.len());
        }
        let mesh = models.swap_remove(0);

        let gcode = self.process_mesh(&mesh)?;
        GCodeFileWriter.write(&gcode, output)?;

        info!("full processing time: {:?}", started.elapsed());
        Ok(())
    }

    /// Slice an in-memory mesh into g-code text.
    pub fn process_mesh(&self, mesh: &TriangleMesh) -> Result<String> {
        let layers = self.prepare_layers(mesh)?;
        Ok(GCodeGenerator::new(&self.options).generate(&layers))
    }

    /// Run the geometric passes: optimize, slice, and modify. Exposed so
    /// callers can inspect the annotated layer stack before emission.
    pub fn prepare_layers(&self, mesh: &TriangleMesh) -> Result<Vec<PartitionedLayer>> {
        let model = Optimizer::new(&self.options).optimize(mesh)?;
        let layers = Slicer::new(&self.options).slice(&model)?;
        debug!("sliced {} layers", layers.len());

        let mut modifiers = default_modifiers(&self.options);
        run_modifiers(&mut modifiers, &model, layers)
    }
}
