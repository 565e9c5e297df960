use std::sync::Arc;

use log::{debug, info};
use parking_lot::Mutex;

use crate::error::LayerError;
use crate::feature::FeatureCollection;
use crate::geometry::BoundingBox;
use crate::layer::Layer;
use crate::style::Style;

/// The ordered set of displayed layers.
///
/// Indices are always `0..layer_count()`, removing a layer shifts every later layer down by one, so
/// callers must re-query after any mutation. All mutations are serialized.
#[derive(Debug, Default)]
pub struct LayerRegistry {
    layers: Mutex<Vec<Arc<Layer>>>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.lock().is_empty()
    }

    /// Appends a layer named after its index, returns the index.
    pub fn add_layer(&self, features: FeatureCollection, style: Style) -> Result<usize, LayerError> {
        let mut layers = self.layers.lock();
        let name = format!("Layer {}", layers.len());
        Self::push_layer(&mut layers, name, features, style)
    }

    /// Appends a layer, returns the index.
    pub fn add_named_layer(
        &self,
        name: impl Into<String>,
        features: FeatureCollection,
        style: Style,
    ) -> Result<usize, LayerError> {
        let mut layers = self.layers.lock();
        Self::push_layer(&mut layers, name.into(), features, style)
    }

    fn push_layer(
        layers: &mut Vec<Arc<Layer>>,
        name: String,
        features: FeatureCollection,
        style: Style,
    ) -> Result<usize, LayerError> {
        // validation happens before the sequence is touched
        let layer = Layer::new(name, features, style)?;
        let index = layers.len();

        info!(
            "Added layer. index: {}, name: '{}', geometries: {}",
            index,
            layer.name(),
            layer.features().len()
        );
        layers.push(Arc::new(layer));

        Ok(index)
    }

    pub fn remove_layer(&self, index: usize) -> Result<Arc<Layer>, LayerError> {
        let mut layers = self.layers.lock();
        if index >= layers.len() {
            debug!("Invalid layer index. index: {}, count: {}", index, layers.len());
            return Err(LayerError::IndexOutOfRange {
                index,
                count: layers.len(),
            });
        }

        let layer = layers.remove(index);
        info!("Removed layer. index: {}, name: '{}'", index, layer.name());

        Ok(layer)
    }

    pub fn layer(&self, index: usize) -> Option<Arc<Layer>> {
        self.layers.lock().get(index).cloned()
    }

    /// The layers in display order, unaffected by later mutations.
    pub fn snapshot(&self) -> Vec<Arc<Layer>> {
        self.layers.lock().clone()
    }

    /// Union of the bounding boxes of all non-empty layers.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::default();
        for layer in self.layers.lock().iter() {
            if let Some(layer_bbox) = layer.try_bounding_box() {
                bbox.expand(layer_bbox);
            }
        }
        bbox
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use geo_types::point;
    use rstest::rstest;

    use super::*;
    use crate::color::Color;
    use crate::feature::{FeatureSchema, GeometryRecord, ReferenceSystem};
    use crate::style::StyleBuilder;

    fn features(x: f64) -> FeatureCollection {
        let schema = Arc::new(FeatureSchema::wkt_geometry());
        let record = GeometryRecord::new(point!(x: x, y: 0.0).into(), schema.clone());
        FeatureCollection::new(schema, vec![record])
    }

    fn style() -> Style {
        StyleBuilder::build_style(Color::BLACK, Color::GRAY)
    }

    fn registry_with(count: usize) -> LayerRegistry {
        let registry = LayerRegistry::new();
        for index in 0..count {
            registry
                .add_named_layer(format!("layer-{}", index), features(index as f64), style())
                .expect("add");
        }
        registry
    }

    fn names(registry: &LayerRegistry) -> Vec<String> {
        registry
            .snapshot()
            .iter()
            .map(|layer| layer.name().to_string())
            .collect()
    }

    #[test]
    fn test_add_appends() {
        let registry = LayerRegistry::new();
        assert_eq!(registry.layer_count(), 0);

        assert_eq!(registry.add_layer(features(0.0), style()), Ok(0));
        assert_eq!(registry.add_layer(features(1.0), style()), Ok(1));

        assert_eq!(registry.layer_count(), 2);
        assert_eq!(names(&registry), vec!["Layer 0", "Layer 1"]);
    }

    #[rstest]
    #[case(4, 0)]
    #[case(4, 2)]
    #[case(4, 3)]
    #[case(1, 0)]
    fn test_remove_shifts_later_layers(#[case] count: usize, #[case] index: usize) {
        let registry = registry_with(count);
        let before = names(&registry);

        let removed = registry.remove_layer(index).expect("remove");

        assert_eq!(removed.name(), before[index]);
        assert_eq!(registry.layer_count(), count - 1);
        let after = names(&registry);
        assert_eq!(&after[..index], &before[..index]);
        assert_eq!(&after[index..], &before[index + 1..]);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(3, 3)]
    #[case(3, usize::MAX)]
    fn test_remove_out_of_range(#[case] count: usize, #[case] index: usize) {
        let registry = registry_with(count);
        let before = names(&registry);

        let result = registry.remove_layer(index);

        assert_eq!(result.err(), Some(LayerError::IndexOutOfRange {
            index,
            count
        }));
        assert_eq!(registry.layer_count(), count);
        assert_eq!(names(&registry), before);
    }

    #[test]
    fn test_invalid_layer_not_added() {
        let registry = registry_with(2);
        let schema = Arc::new(FeatureSchema::new("", "", ReferenceSystem::Wgs84));

        let invalid_features = registry.add_layer(FeatureCollection::empty(schema), style());
        let invalid_style = registry.add_layer(features(9.0), Style::from_rules(vec![]));

        assert!(matches!(invalid_features, Err(LayerError::InvalidLayer(_))));
        assert!(matches!(invalid_style, Err(LayerError::InvalidLayer(_))));
        assert_eq!(names(&registry), vec!["layer-0", "layer-1"]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let registry = registry_with(2);
        let snapshot = registry.snapshot();

        registry.remove_layer(0).expect("remove");

        assert_eq!(snapshot.len(), 2);
        assert_eq!(registry.layer_count(), 1);
    }

    #[test]
    fn test_bounding_box_spans_layers() {
        let registry = registry_with(3);
        registry
            .add_layer(FeatureCollection::empty(Arc::new(FeatureSchema::wkt_geometry())), style())
            .expect("add empty");

        let bbox = registry.bounding_box();

        assert_eq!(bbox.min.x, 0.0);
        assert_eq!(bbox.max.x, 2.0);
    }

    #[test]
    fn test_concurrent_adds_are_serialized() {
        let registry = Arc::new(LayerRegistry::new());

        let handles = (0..8)
            .map(|index| {
                let registry = registry.clone();
                std::thread::spawn(move || registry.add_layer(features(index as f64), style()))
            })
            .collect::<Vec<_>>();

        let mut indices = handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .expect("join")
                    .expect("add")
            })
            .collect::<Vec<_>>();
        indices.sort();

        assert_eq!(indices, (0..8).collect::<Vec<_>>());
        assert_eq!(registry.layer_count(), 8);
    }
}
