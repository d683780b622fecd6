//! Partitioned layer type and typed layer attributes.
//!
//! The modifier chain communicates by attaching typed payloads to each
//! layer. Instead of a string-to-dynamic-value map, the payloads are a
//! tagged variant with typed lookups on the layer, so a modifier cannot
//! silently read a payload under the wrong shape. New modifiers extend
//! [`LayerAttribute`] and add a lookup.

use crate::geometry::{BoundingBox, LayerPart, LayerParts, Polylines};
use crate::Micrometer;

/// Islands of one inset ring of one part.
pub type InsetIslands = LayerParts;

/// Inset rings of one part, outermost first.
pub type PartInsets = Vec<InsetIslands>;

/// Perimeter payload shape: `[part][inset_index][inset_island]`.
pub type Perimeters = Vec<PartInsets>;

/// A typed payload attached to a layer by one modifier.
#[derive(Clone, Debug, PartialEq)]
pub enum LayerAttribute {
    /// Concentric wall loops per original part.
    Perimeters(Perimeters),
    /// Infill line segments for regions facing the previous layer,
    /// grouped per source region.
    BottomFill(Vec<Polylines>),
    /// Infill line segments for regions facing the next layer.
    TopFill(Vec<Polylines>),
    /// Sparse interior infill line segments.
    SparseFill(Vec<Polylines>),
}

/// Discriminant of a [`LayerAttribute`], used when replacing a payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeKind {
    Perimeters,
    BottomFill,
    TopFill,
    SparseFill,
}

impl LayerAttribute {
    /// The attribute's discriminant.
    pub fn kind(&self) -> AttributeKind {
        match self {
            LayerAttribute::Perimeters(_) => AttributeKind::Perimeters,
            LayerAttribute::BottomFill(_) => AttributeKind::BottomFill,
            LayerAttribute::TopFill(_) => AttributeKind::TopFill,
            LayerAttribute::SparseFill(_) => AttributeKind::SparseFill,
        }
    }
}

/// One horizontal layer of the sliced model: its z-height, disjoint
/// parts, bounding box, and the attributes accumulated by the modifier
/// chain.
#[derive(Clone, Debug, Default)]
pub struct PartitionedLayer {
    z: Micrometer,
    parts: LayerParts,
    bounds: BoundingBox,
    attributes: Vec<LayerAttribute>,
}

impl PartitionedLayer {
    /// Create a layer from its parts; the bounding box is derived.
    pub fn new(z: Micrometer, parts: LayerParts) -> Self {
        let mut bounds = BoundingBox::new();
        for part in &parts {
            bounds.merge(&part.bounding_box());
        }
        Self {
            z,
            parts,
            bounds,
            attributes: Vec::new(),
        }
    }

    /// The slicing plane height of this layer.
    #[inline]
    pub fn z(&self) -> Micrometer {
        self.z
    }

    /// The disjoint regions of this layer.
    #[inline]
    pub fn parts(&self) -> &[LayerPart] {
        &self.parts
    }

    /// Bounding box over all parts (empty for a layer with no parts).
    #[inline]
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// All attached attributes.
    #[inline]
    pub fn attributes(&self) -> &[LayerAttribute] {
        &self.attributes
    }

    /// Return the layer with `attribute` attached, replacing a previous
    /// payload of the same kind. Modifiers use this to produce a new
    /// logical layer carrying prior attributes plus their own addition.
    pub fn with_attribute(mut self, attribute: LayerAttribute) -> Self {
        self.attributes.retain(|a| a.kind() != attribute.kind());
        self.attributes.push(attribute);
        self
    }

    /// Typed lookup of the perimeter payload.
    pub fn perimeters(&self) -> Option<&Perimeters> {
        self.attributes.iter().find_map(|a| match a {
            LayerAttribute::Perimeters(p) => Some(p),
            _ => None,
        })
    }

    /// Typed lookup of the bottom fill payload.
    pub fn bottom_fill(&self) -> Option<&Vec<Polylines>> {
        self.attributes.iter().find_map(|a| match a {
            LayerAttribute::BottomFill(p) => Some(p),
            _ => None,
        })
    }

    /// Typed lookup of the top fill payload.
    pub fn top_fill(&self) -> Option<&Vec<Polylines>> {
        self.attributes.iter().find_map(|a| match a {
            LayerAttribute::TopFill(p) => Some(p),
            _ => None,
        })
    }

    /// Typed lookup of the sparse fill payload.
    pub fn sparse_fill(&self) -> Option<&Vec<Polylines>> {
        self.attributes.iter().find_map(|a| match a {
            LayerAttribute::SparseFill(p) => Some(p),
            _ => None,
        })
    }

    /// The innermost perimeter islands of part `part_index`: the islands
    /// of the last inset ring, or the original part when no inset exists
    /// (either none was requested or the part was too small).
    pub fn innermost_islands(&self, part_index: usize) -> &[LayerPart] {
        if let Some(perimeters) = self.perimeters() {
            if let Some(insets) = perimeters.get(part_index) {
                if let Some(last) = insets.last() {
                    return last;
                }
            }
        }
        std::slice::from_ref(&self.parts[part_index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{square, Point, Polygon};

    fn layer_with_one_part() -> PartitionedLayer {
        PartitionedLayer::new(100, vec![LayerPart::new(square(Point::new(0, 0), 5_000))])
    }

    #[test]
    fn test_bounds_derived_from_parts() {
        let layer = layer_with_one_part();
        assert_eq!(layer.bounds().min(), Point::new(-5_000, -5_000));
        assert_eq!(layer.bounds().max(), Point::new(5_000, 5_000));

        let empty = PartitionedLayer::new(100, vec![]);
        assert!(empty.bounds().is_empty());
    }

    #[test]
    fn test_with_attribute_accumulates() {
        let layer = layer_with_one_part()
            .with_attribute(LayerAttribute::Perimeters(vec![]))
            .with_attribute(LayerAttribute::BottomFill(vec![]));
        assert_eq!(layer.attributes().len(), 2);
        assert!(layer.perimeters().is_some());
        assert!(layer.bottom_fill().is_some());
        assert!(layer.top_fill().is_none());
    }

    #[test]
    fn test_with_attribute_replaces_same_kind() {
        let layer = layer_with_one_part()
            .with_attribute(LayerAttribute::BottomFill(vec![]))
            .with_attribute(LayerAttribute::BottomFill(vec![Vec::new()]));
        assert_eq!(layer.attributes().len(), 1);
        assert_eq!(layer.bottom_fill().unwrap().len(), 1);
    }

    #[test]
    fn test_innermost_islands_without_insets() {
        // No perimeter attribute: the part itself is the innermost region
        let layer = layer_with_one_part();
        assert_eq!(layer.innermost_islands(0), layer.parts());

        // Perimeter attribute with an empty inset list behaves the same
        let layer = layer_with_one_part()
            .with_attribute(LayerAttribute::Perimeters(vec![vec![]]));
        assert_eq!(layer.innermost_islands(0), layer.parts());
    }

    #[test]
    fn test_innermost_islands_with_insets() {
        let inner = LayerPart::new(Polygon::rectangle(
            Point::new(-4_400, -4_400),
            Point::new(4_400, 4_400),
        ));
        let outer = LayerPart::new(Polygon::rectangle(
            Point::new(-4_800, -4_800),
            Point::new(4_800, 4_800),
        ));
        let layer = layer_with_one_part().with_attribute(LayerAttribute::Perimeters(vec![vec![
            vec![outer],
            vec![inner.clone()],
        ]]));
        assert_eq!(layer.innermost_islands(0), &[inner]);
    }
}
