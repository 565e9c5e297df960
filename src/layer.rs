use log::trace;

use crate::error::LayerError;
use crate::feature::FeatureCollection;
use crate::geometry::BoundingBox;
use crate::style::Style;

/// A displayable feature collection and the style it is drawn with.
#[derive(Clone, Debug)]
pub struct Layer {
    name: String,
    features: FeatureCollection,
    style: Style,
    bounding_box: BoundingBox,
}

impl Layer {
    /// Fails if the collection's schema is malformed or the style does not carry one rule per geometry kind.
    pub fn new(name: impl Into<String>, features: FeatureCollection, style: Style) -> Result<Self, LayerError> {
        Self::validate(&features, &style)?;

        let bounding_box = features.bounding_box();
        trace!("layer bbox: {:?}", bounding_box);

        Ok(Self {
            name: name.into(),
            features,
            style,
            bounding_box,
        })
    }

    pub fn validate(features: &FeatureCollection, style: &Style) -> Result<(), LayerError> {
        if !features.schema().is_valid() {
            return Err(LayerError::InvalidLayer(format!(
                "feature schema invalid: {:?}",
                features.schema()
            )));
        }
        if !features.is_consistent() {
            return Err(LayerError::InvalidLayer(
                "records do not match the collection schema".to_string(),
            ));
        }
        if !style.is_complete() {
            return Err(LayerError::InvalidLayer(format!(
                "style invalid, {} rule(s)",
                style.rules().len()
            )));
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn features(&self) -> &FeatureCollection {
        &self.features
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// It's possible to have a file with no valid geometries
    pub fn is_empty(&self) -> bool {
        self.bounding_box.is_empty()
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    /// Return the bounding box if the layer has geometries which need drawing.
    pub fn try_bounding_box(&self) -> Option<&BoundingBox> {
        match self.is_empty() {
            true => None,
            false => Some(&self.bounding_box),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use geo_types::point;
    use nalgebra::Point2;

    use super::*;
    use crate::color::Color;
    use crate::feature::{FeatureSchema, GeometryRecord, ReferenceSystem};
    use crate::style::StyleBuilder;

    #[test]
    fn test_layer_bounds() {
        let schema = Arc::new(FeatureSchema::wkt_geometry());
        let records = vec![
            GeometryRecord::new(point!(x: -1.0, y: 5.0).into(), schema.clone()),
            GeometryRecord::new(point!(x: 3.0, y: 2.0).into(), schema.clone()),
        ];
        let style = StyleBuilder::build_style(Color::BLACK, Color::GRAY);

        let layer = Layer::new("points", FeatureCollection::new(schema, records), style).expect("layer");

        assert_eq!(layer.name(), "points");
        assert_eq!(layer.features().len(), 2);
        let bbox = layer.try_bounding_box().expect("bbox");
        assert_eq!(bbox.min, Point2::new(-1.0, 2.0));
        assert_eq!(bbox.max, Point2::new(3.0, 5.0));
    }

    #[test]
    fn test_empty_layer_is_allowed() {
        let features = FeatureCollection::empty(Arc::new(FeatureSchema::wkt_geometry()));
        let style = StyleBuilder::build_style(Color::BLACK, Color::GRAY);

        let layer = Layer::new("empty", features, style).expect("layer");

        assert!(layer.is_empty());
        assert!(layer.try_bounding_box().is_none());
    }

    #[test]
    fn test_invalid_schema_rejected() {
        let schema = Arc::new(FeatureSchema::new("", "", ReferenceSystem::Wgs84));
        let style = StyleBuilder::build_style(Color::BLACK, Color::GRAY);

        let result = Layer::new("broken", FeatureCollection::empty(schema), style);

        assert!(matches!(result, Err(LayerError::InvalidLayer(_))));
    }

    #[test]
    fn test_invalid_style_rejected() {
        let features = FeatureCollection::empty(Arc::new(FeatureSchema::wkt_geometry()));

        let result = Layer::new("unstyled", features, Style::from_rules(vec![]));

        assert!(matches!(result, Err(LayerError::InvalidLayer(_))));
    }
}
