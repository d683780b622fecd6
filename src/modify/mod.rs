//! Layer modifier chain.
//!
//! A [`LayerModifier`] annotates the layer stack with typed attributes
//! (perimeters, bottom/top fill, sparse infill). The chain is an ordered
//! list of trait objects sharing one contract: `init` once per model,
//! then `modify` for every layer index in ascending order. One modifier
//! finishes all layers before the next starts, so a modifier may consult
//! both earlier and later layers of its predecessor's output.
//!
//! Modifiers never mutate earlier attributes in place; they produce a new
//! layer value carrying the prior attributes plus their own addition.

mod infill;
mod perimeter;

pub use infill::{BottomFillModifier, SparseFillModifier, TopFillModifier};
pub use perimeter::PerimeterModifier;

use crate::config::Options;
use crate::optimize::OptimizedModel;
use crate::slice::PartitionedLayer;
use crate::{Error, Result};
use log::debug;

/// One transform over the layer stack.
pub trait LayerModifier {
    /// Stage name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Called once before the modifier's pass over the layers.
    fn init(&mut self, _model: &OptimizedModel) {}

    /// Transform the stack for one layer index. The returned stack
    /// replaces the input; errors abort the pipeline.
    fn modify(
        &self,
        layer_index: usize,
        layers: Vec<PartitionedLayer>,
    ) -> Result<Vec<PartitionedLayer>>;
}

/// The default modifier chain, in execution order.
pub fn default_modifiers(options: &Options) -> Vec<Box<dyn LayerModifier + '_>> {
    vec![
        Box::new(PerimeterModifier::new(options)),
        Box::new(BottomFillModifier::new(options)),
        Box::new(TopFillModifier::new(options)),
        Box::new(SparseFillModifier::new(options)),
    ]
}

/// Run a modifier chain over the layer stack.
///
/// Each modifier completes its full pass before the next one begins. A
/// modifier error is attributed with the stage name and layer index.
pub fn run_modifiers(
    modifiers: &mut [Box<dyn LayerModifier + '_>],
    model: &OptimizedModel,
    mut layers: Vec<PartitionedLayer>,
) -> Result<Vec<PartitionedLayer>> {
    for modifier in modifiers {
        debug!("running layer modifier: {}", modifier.name());
        modifier.init(model);
        for layer_index in 0..layers.len() {
            layers = modifier.modify(layer_index, layers).map_err(|e| {
                Error::PipelineStage {
                    stage: modifier.name(),
                    layer: layer_index,
                    message: e.to_string(),
                }
            })?;
        }
    }
    Ok(layers)
}
