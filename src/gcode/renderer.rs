//! Renderers: per-layer g-code emission from typed layer attributes.

use super::GCodeBuilder;
use crate::config::Options;
use crate::geometry::Polylines;
use crate::slice::PartitionedLayer;

/// One step of the per-layer emission order. A renderer reads the layer
/// attributes it knows and emits motion commands; unknown or absent
/// attributes mean it emits nothing.
pub trait Renderer {
    fn render(
        &self,
        builder: &mut GCodeBuilder,
        layer_index: usize,
        layers: &[PartitionedLayer],
        options: &Options,
    );
}

/// Print speed for ordinary moves on a layer.
fn layer_speed(options: &Options, layer_index: usize) -> f64 {
    if layer_index == 0 {
        options.print.initial_layer_speed
    } else {
        options.print.layer_speed
    }
}

/// Per-layer setup: layer marker comment, extrusion rate for the layer's
/// slab thickness, and the z lift to the slab top.
pub struct PreLayerRenderer;

impl Renderer for PreLayerRenderer {
    fn render(
        &self,
        builder: &mut GCodeBuilder,
        layer_index: usize,
        layers: &[PartitionedLayer],
        options: &Options,
    ) {
        let layer = &layers[layer_index];
        builder.comment(&format!("LAYER:{}", layer_index));

        let thickness = if layer_index == 0 {
            options.print.initial_layer_thickness
        } else {
            options.print.layer_thickness
        };
        builder.set_extrusion(
            thickness,
            options.printer.extrusion_width,
            options.filament.filament_diameter,
        );

        // The slicing plane runs through the slab; printing happens at
        // the slab top. The first layer is sliced mid-slab, the others at
        // their slab bottom.
        let print_z = if layer_index == 0 {
            layer.z() + thickness / 2
        } else {
            layer.z() + thickness
        };
        builder.move_z(print_z, layer_speed(options, layer_index));
    }
}

/// Emits the perimeter loops, innermost ring first so the outermost wall
/// is printed onto already-anchored material. The outermost ring runs at
/// the dedicated outer perimeter speed.
pub struct PerimeterRenderer;

impl Renderer for PerimeterRenderer {
    fn render(
        &self,
        builder: &mut GCodeBuilder,
        layer_index: usize,
        layers: &[PartitionedLayer],
        options: &Options,
    ) {
        let Some(perimeters) = layers[layer_index].perimeters() else {
            return;
        };
        let travel = layer_speed(options, layer_index);

        for part_insets in perimeters {
            for (inset_index, ring) in part_insets.iter().enumerate().rev() {
                if ring.iter().all(|island| island.is_empty()) {
                    continue;
                }
                let (label, speed) = if inset_index == 0 {
                    ("TYPE:WALL-OUTER", options.print.outer_perimeter_speed)
                } else {
                    ("TYPE:WALL-INNER", layer_speed(options, layer_index))
                };
                builder.comment(label);
                for island in ring {
                    builder.add_polygon(island.outline(), travel, speed);
                    for hole in island.holes() {
                        builder.add_polygon(hole, travel, speed);
                    }
                }
            }
        }
    }
}

/// Which fill attribute a [`FillRenderer`] reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillAttribute {
    Bottom,
    Top,
    Sparse,
}

/// Emits the line segments of one fill attribute, preceded by its
/// configured comment block.
pub struct FillRenderer {
    attribute: FillAttribute,
    comments: &'static [&'static str],
}

impl FillRenderer {
    pub fn new(attribute: FillAttribute, comments: &'static [&'static str]) -> Self {
        Self {
            attribute,
            comments,
        }
    }

    fn groups<'l>(&self, layer: &'l PartitionedLayer) -> Option<&'l Vec<Polylines>> {
        match self.attribute {
            FillAttribute::Bottom => layer.bottom_fill(),
            FillAttribute::Top => layer.top_fill(),
            FillAttribute::Sparse => layer.sparse_fill(),
        }
    }
}

impl Renderer for FillRenderer {
    fn render(
        &self,
        builder: &mut GCodeBuilder,
        layer_index: usize,
        layers: &[PartitionedLayer],
        options: &Options,
    ) {
        let Some(groups) = self.groups(&layers[layer_index]) else {
            return;
        };
        if groups.iter().all(|g| g.is_empty()) {
            return;
        }

        for comment in self.comments {
            builder.comment(comment);
        }
        let speed = layer_speed(options, layer_index);
        for group in groups {
            for line in group {
                builder.add_polyline(line, speed, speed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{square, LayerPart, Point, Polyline};
    use crate::slice::LayerAttribute;

    fn render_with<R: Renderer>(renderer: &R, layer: PartitionedLayer, options: &Options) -> String {
        let mut builder = GCodeBuilder::new();
        builder.set_extrusion(200, 400, 1_750);
        renderer.render(&mut builder, 0, &[layer], options);
        builder.finish()
    }

    #[test]
    fn test_pre_layer_marks_and_lifts() {
        let options = Options::default();
        let layer = PartitionedLayer::new(100, vec![]);
        let text = render_with(&PreLayerRenderer, layer, &options);
        assert!(text.contains(";LAYER:0"));
        // First layer prints at the top of the initial slab (0.2mm)
        assert!(text.contains("G0 Z0.200"));
    }

    #[test]
    fn test_pre_layer_z_above_first_layer() {
        let options = Options::default();
        let mut builder = GCodeBuilder::new();
        let layers = [
            PartitionedLayer::new(100, vec![]),
            PartitionedLayer::new(200, vec![]),
        ];
        PreLayerRenderer.render(&mut builder, 1, &layers, &options);
        let text = builder.finish();
        assert!(text.contains(";LAYER:1"));
        // Layer 1 spans 200..400µm
        assert!(text.contains("G0 Z0.400"));
    }

    #[test]
    fn test_perimeter_renderer_orders_walls() {
        let options = Options::default();
        let inner = LayerPart::new(square(Point::new(0, 0), 4_400));
        let outer = LayerPart::new(square(Point::new(0, 0), 4_800));
        let layer = PartitionedLayer::new(100, vec![LayerPart::new(square(Point::new(0, 0), 5_000))])
            .with_attribute(LayerAttribute::Perimeters(vec![vec![
                vec![outer],
                vec![inner],
            ]]));
        let text = render_with(&PerimeterRenderer, layer, &options);
        let inner_pos = text.find(";TYPE:WALL-INNER").unwrap();
        let outer_pos = text.find(";TYPE:WALL-OUTER").unwrap();
        assert!(inner_pos < outer_pos);
        // Outer wall speed (40mm/s) on the outer ring
        assert!(text.contains("F2400"));
    }

    #[test]
    fn test_perimeter_renderer_prints_hole_loops() {
        let options = Options::default();
        let island = LayerPart::normalized(
            square(Point::new(0, 0), 4_800),
            vec![square(Point::new(0, 0), 2_000)],
        );
        let layer = PartitionedLayer::new(100, vec![LayerPart::new(square(Point::new(0, 0), 5_000))])
            .with_attribute(LayerAttribute::Perimeters(vec![vec![vec![island]]]));
        let text = render_with(&PerimeterRenderer, layer, &options);
        // 4 edges outline + 4 edges hole
        assert_eq!(text.lines().filter(|l| l.starts_with("G1")).count(), 8);
    }

    #[test]
    fn test_fill_renderer_reads_its_attribute_only() {
        let options = Options::default();
        let fill = vec![vec![Polyline::segment(Point::new(0, 0), Point::new(5_000, 0))]];
        let layer = PartitionedLayer::new(100, vec![])
            .with_attribute(LayerAttribute::TopFill(fill));
        let bottom = FillRenderer::new(FillAttribute::Bottom, &["TYPE:FILL", "BOTTOM-FILL"]);
        assert_eq!(render_with(&bottom, layer.clone(), &options), "");
        let top = FillRenderer::new(FillAttribute::Top, &["TYPE:FILL", "TOP-FILL"]);
        let text = render_with(&top, layer, &options);
        assert!(text.contains(";TOP-FILL"));
        assert!(text.contains("G1 X5.000 Y0.000"));
    }
}
