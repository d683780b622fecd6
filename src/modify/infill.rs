//! Infill modifiers: bottom and top solid fill, sparse interior fill.
//!
//! All three work from the innermost perimeter islands of each part (the
//! last inset ring, or the part itself when no inset exists). Bottom fill
//! covers what the previous layer does not support, top fill covers what
//! the next layer does not cover, and sparse fill takes the remainder at
//! a density derived from the configured infill percentage.

use super::LayerModifier;
use crate::clip::{self, solid_pattern, sparse_line_spacing, sparse_pattern, LinearPattern};
use crate::config::Options;
use crate::geometry::{LayerPart, Polylines};
use crate::slice::{LayerAttribute, PartitionedLayer};
use crate::Result;

/// Extra widening of interior fill regions, as a percentage of line
/// width. Compensates the extra inset applied to parts with oblique
/// walls so fill lines still reach the perimeter bead.
const INTERNAL_FILL_WIDENING_PERCENT: u32 = 200;

/// Which vertical neighbor a solid-fill modifier compares against.
#[derive(Clone, Copy, PartialEq, Eq)]
enum SolidSide {
    Below,
    Above,
}

/// Fill lines for the exposed regions of one layer against one vertical
/// neighbor. Returns one line group per exposed region.
fn solid_fill_groups(
    options: &Options,
    side: SolidSide,
    layer_index: usize,
    layers: &[PartitionedLayer],
) -> Result<Vec<Polylines>> {
    let layer = &layers[layer_index];
    if layer.perimeters().is_none() || layer.bounds().is_empty() {
        return Ok(Vec::new());
    }

    let width = options.printer.extrusion_width;
    let overlap = options.print.infill_overlap_percent;
    let pattern = solid_pattern(layer.bounds(), width);

    let neighbor = match side {
        SolidSide::Below => layer_index.checked_sub(1),
        SolidSide::Above => (layer_index + 1 < layers.len()).then_some(layer_index + 1),
    };

    let mut groups = Vec::new();
    for part_index in 0..layer.parts().len() {
        for island in layer.innermost_islands(part_index) {
            match neighbor {
                // No neighbor on this side: the whole region is exposed.
                None => groups.push(clip::fill(
                    island,
                    None,
                    width,
                    &pattern,
                    overlap,
                    INTERNAL_FILL_WIDENING_PERCENT,
                )),
                Some(n) => {
                    let exposed = clip::difference(island, layers[n].parts())?;
                    for region in &exposed {
                        groups.push(clip::fill(
                            region,
                            Some(island),
                            width,
                            &pattern,
                            overlap,
                            INTERNAL_FILL_WIDENING_PERCENT,
                        ));
                    }
                }
            }
        }
    }
    Ok(groups)
}

/// Computes solid fill for regions facing the previous layer (downward
/// surfaces; everything on the first layer).
pub struct BottomFillModifier<'a> {
    options: &'a Options,
}

impl<'a> BottomFillModifier<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self { options }
    }
}

impl LayerModifier for BottomFillModifier<'_> {
    fn name(&self) -> &'static str {
        "bottom fill"
    }

    fn modify(
        &self,
        layer_index: usize,
        mut layers: Vec<PartitionedLayer>,
    ) -> Result<Vec<PartitionedLayer>> {
        let groups = solid_fill_groups(self.options, SolidSide::Below, layer_index, &layers)?;
        if !groups.is_empty() {
            layers[layer_index] = std::mem::take(&mut layers[layer_index])
                .with_attribute(LayerAttribute::BottomFill(groups));
        }
        Ok(layers)
    }
}

/// Computes solid fill for regions facing the next layer (upward
/// surfaces; everything on the last layer). Only the layer strictly
/// above is consulted, mirroring the bottom modifier.
pub struct TopFillModifier<'a> {
    options: &'a Options,
}

impl<'a> TopFillModifier<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self { options }
    }
}

impl LayerModifier for TopFillModifier<'_> {
    fn name(&self) -> &'static str {
        "top fill"
    }

    fn modify(
        &self,
        layer_index: usize,
        mut layers: Vec<PartitionedLayer>,
    ) -> Result<Vec<PartitionedLayer>> {
        let groups = solid_fill_groups(self.options, SolidSide::Above, layer_index, &layers)?;
        if !groups.is_empty() {
            layers[layer_index] = std::mem::take(&mut layers[layer_index])
                .with_attribute(LayerAttribute::TopFill(groups));
        }
        Ok(layers)
    }
}

/// Computes sparse interior fill over the remainder of the innermost
/// region: the portion supported below and covered above, which the
/// solid-fill modifiers leave alone. The line direction alternates
/// 45°/135° with the layer index.
pub struct SparseFillModifier<'a> {
    options: &'a Options,
}

impl<'a> SparseFillModifier<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self { options }
    }

    fn fill_island(
        &self,
        island: &LayerPart,
        layer_index: usize,
        layers: &[PartitionedLayer],
        pattern: &LinearPattern,
        groups: &mut Vec<Polylines>,
    ) -> Result<()> {
        let width = self.options.printer.extrusion_width;
        let below = layers[layer_index - 1].parts();
        let above = layers[layer_index + 1].parts();

        for supported in &clip::intersection(island, below)? {
            for interior in &clip::intersection(supported, above)? {
                groups.push(clip::fill(
                    interior,
                    Some(island),
                    width,
                    pattern,
                    self.options.print.infill_overlap_percent,
                    INTERNAL_FILL_WIDENING_PERCENT,
                ));
            }
        }
        Ok(())
    }
}

impl LayerModifier for SparseFillModifier<'_> {
    fn name(&self) -> &'static str {
        "sparse infill"
    }

    fn modify(
        &self,
        layer_index: usize,
        mut layers: Vec<PartitionedLayer>,
    ) -> Result<Vec<PartitionedLayer>> {
        let Some(spacing) = sparse_line_spacing(
            self.options.printer.extrusion_width,
            self.options.print.infill_percent,
        ) else {
            return Ok(layers);
        };
        // First and last layers are entirely solid fill.
        if layer_index == 0 || layer_index + 1 >= layers.len() {
            return Ok(layers);
        }
        let layer = &layers[layer_index];
        if layer.perimeters().is_none() || layer.bounds().is_empty() {
            return Ok(layers);
        }

        let pattern = sparse_pattern(layer.bounds(), spacing, layer_index);
        let mut groups = Vec::new();
        for part_index in 0..layer.parts().len() {
            for island in layer.innermost_islands(part_index) {
                self.fill_island(island, layer_index, &layers, &pattern, &mut groups)?;
            }
        }

        if !groups.is_empty() {
            layers[layer_index] = std::mem::take(&mut layers[layer_index])
                .with_attribute(LayerAttribute::SparseFill(groups));
        }
        Ok(layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{square, Point};
    use crate::modify::PerimeterModifier;

    fn full_square_layer(z: i64) -> PartitionedLayer {
        PartitionedLayer::new(z, vec![LayerPart::new(square(Point::new(0, 0), 5_000))])
    }

    /// A 10mm square with a centered 4mm hole, like a pocket cross-section.
    fn pocket_layer(z: i64) -> PartitionedLayer {
        let outline = square(Point::new(0, 0), 5_000);
        let hole = square(Point::new(0, 0), 2_000);
        PartitionedLayer::new(z, vec![LayerPart::normalized(outline, vec![hole])])
    }

    fn run_perimeters(options: &Options, layers: Vec<PartitionedLayer>) -> Vec<PartitionedLayer> {
        let modifier = PerimeterModifier::new(options);
        let mut layers = layers;
        for i in 0..layers.len() {
            layers = modifier.modify(i, layers).unwrap();
        }
        layers
    }

    #[test]
    fn test_bottom_fill_first_layer_line_count() {
        let options = Options::default();
        let layers = run_perimeters(&options, vec![full_square_layer(100)]);
        let layers = BottomFillModifier::new(&options).modify(0, layers).unwrap();

        let bottom = layers[0].bottom_fill().unwrap();
        assert_eq!(bottom.len(), 1);
        // floor(10000 / 400) + 1 pattern lines over the layer bounds
        assert_eq!(bottom[0].len(), 26);
    }

    #[test]
    fn test_bottom_fill_skips_supported_layers() {
        let options = Options::default();
        let layers = run_perimeters(
            &options,
            vec![full_square_layer(100), full_square_layer(200)],
        );
        let modifier = BottomFillModifier::new(&options);
        let mut layers = layers;
        for i in 0..2 {
            layers = modifier.modify(i, layers).unwrap();
        }
        assert!(layers[0].bottom_fill().is_some());
        // Layer 1 sits fully on layer 0: nothing downward-facing
        assert!(layers[1].bottom_fill().is_none());
    }

    #[test]
    fn test_bottom_fill_without_perimeters_is_noop() {
        let options = Options::default();
        let layers = vec![full_square_layer(100)];
        let layers = BottomFillModifier::new(&options).modify(0, layers).unwrap();
        assert!(layers[0].bottom_fill().is_none());
    }

    #[test]
    fn test_top_fill_last_layer() {
        let options = Options::default();
        let layers = run_perimeters(
            &options,
            vec![full_square_layer(100), full_square_layer(200)],
        );
        let modifier = TopFillModifier::new(&options);
        let mut layers = layers;
        for i in 0..2 {
            layers = modifier.modify(i, layers).unwrap();
        }
        // Layer 0 is covered by layer 1; layer 1 is the top surface
        assert!(layers[0].top_fill().is_none());
        let top = layers[1].top_fill().unwrap();
        assert_eq!(top.len(), 1);
        assert!(!top[0].is_empty());
    }

    #[test]
    fn test_top_fill_under_pocket() {
        // Pocket floor: a full layer below a layer with a hole. The floor
        // layer's upward-facing region is the pocket footprint.
        let options = Options::default();
        let layers = run_perimeters(
            &options,
            vec![full_square_layer(100), pocket_layer(200), pocket_layer(400)],
        );
        let modifier = TopFillModifier::new(&options);
        let mut layers = layers;
        for i in 0..3 {
            layers = modifier.modify(i, layers).unwrap();
        }

        let top = layers[0].top_fill().unwrap();
        assert_eq!(top.len(), 1);
        // Lines stay within the pocket footprint expanded by the overlap
        // (800µm) but clipped to the innermost island
        for line in &top[0] {
            for p in line.points() {
                assert!(p.x.abs() <= 2_800 && p.y.abs() <= 2_800);
            }
        }
        // The middle pocket layer is covered above by the identical ring
        assert!(layers[1].top_fill().is_none());
    }

    #[test]
    fn test_sparse_fill_interior_layers_only() {
        let options = Options::default();
        let layers = run_perimeters(
            &options,
            vec![
                full_square_layer(100),
                full_square_layer(200),
                full_square_layer(400),
            ],
        );
        let modifier = SparseFillModifier::new(&options);
        let mut layers = layers;
        for i in 0..3 {
            layers = modifier.modify(i, layers).unwrap();
        }
        assert!(layers[0].sparse_fill().is_none());
        assert!(layers[2].sparse_fill().is_none());
        let sparse = layers[1].sparse_fill().unwrap();
        assert_eq!(sparse.len(), 1);
        assert!(!sparse[0].is_empty());
    }

    #[test]
    fn test_sparse_fill_alternates_direction() {
        let options = Options::default();
        let stack: Vec<PartitionedLayer> =
            (0..4).map(|i| full_square_layer(100 + 200 * i)).collect();
        let layers = run_perimeters(&options, stack);
        let modifier = SparseFillModifier::new(&options);
        let mut layers = layers;
        for i in 0..4 {
            layers = modifier.modify(i, layers).unwrap();
        }
        let d1 = layers[1].sparse_fill().unwrap()[0][0].edge(0).direction();
        let d2 = layers[2].sparse_fill().unwrap()[0][0].edge(0).direction();
        assert_eq!(d1.x, -d1.y); // odd layer: 135°
        assert_eq!(d2.x, d2.y); // even layer: 45°
    }

    #[test]
    fn test_zero_infill_percent_emits_no_sparse_key() {
        let mut options = Options::default();
        options.print.infill_percent = 0;
        let layers = run_perimeters(
            &options,
            vec![
                full_square_layer(100),
                full_square_layer(200),
                full_square_layer(400),
            ],
        );
        let modifier = SparseFillModifier::new(&options);
        let mut layers = layers;
        for i in 0..3 {
            layers = modifier.modify(i, layers).unwrap();
        }
        assert!(layers.iter().all(|l| l.sparse_fill().is_none()));
    }

    #[test]
    fn test_inset_count_zero_fills_whole_part() {
        let mut options = Options::default();
        options.print.inset_count = 0;
        let layers = run_perimeters(&options, vec![full_square_layer(100)]);
        let layers = BottomFillModifier::new(&options).modify(0, layers).unwrap();
        let bottom = layers[0].bottom_fill().unwrap();
        // Pattern over the part itself still yields the full line set
        assert_eq!(bottom[0].len(), 26);
    }
}
