//! Perimeter modifier: concentric wall loops per layer part.

use super::LayerModifier;
use crate::clip;
use crate::config::Options;
use crate::slice::{LayerAttribute, PartitionedLayer, Perimeters};
use crate::Result;

/// Computes the concentric wall loops of every part and attaches them as
/// the perimeter attribute, shaped `[part][inset_index][inset_island]`
/// with inset index 0 outermost.
///
/// A part that admits fewer rings than requested contributes only the
/// non-empty ones; with an inset count of zero every part contributes an
/// empty ring list and the fill modifiers treat the part itself as the
/// innermost region.
pub struct PerimeterModifier<'a> {
    options: &'a Options,
}

impl<'a> PerimeterModifier<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self { options }
    }
}

impl LayerModifier for PerimeterModifier<'_> {
    fn name(&self) -> &'static str {
        "perimeters"
    }

    fn modify(
        &self,
        layer_index: usize,
        mut layers: Vec<PartitionedLayer>,
    ) -> Result<Vec<PartitionedLayer>> {
        let layer = &layers[layer_index];
        let mut perimeters: Perimeters = Vec::with_capacity(layer.parts().len());
        for part in layer.parts() {
            perimeters.push(clip::inset(
                part,
                self.options.printer.extrusion_width,
                self.options.print.inset_count,
            ));
        }

        layers[layer_index] = std::mem::take(&mut layers[layer_index])
            .with_attribute(LayerAttribute::Perimeters(perimeters));
        Ok(layers)
    }
}
