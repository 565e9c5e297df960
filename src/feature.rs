use std::sync::Arc;

use geo_types::Geometry;

use crate::geometry::BoundingBox;
use crate::types::GeometryKind;

pub const SCHEMA_NAME: &str = "WKT_to_geom";
pub const GEOMETRY_ATTRIBUTE: &str = "the_geom";

/// Geographic reference systems a schema can be tagged with, no reprojection is ever performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReferenceSystem {
    Wgs84,
}

impl ReferenceSystem {
    pub fn code(&self) -> &'static str {
        match self {
            ReferenceSystem::Wgs84 => "EPSG:4326",
        }
    }
}

/// Describes a record: a named schema with a single geometry-typed attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    name: String,
    geometry_attribute: String,
    reference_system: ReferenceSystem,
}

impl FeatureSchema {
    pub fn new(
        name: impl Into<String>,
        geometry_attribute: impl Into<String>,
        reference_system: ReferenceSystem,
    ) -> Self {
        Self {
            name: name.into(),
            geometry_attribute: geometry_attribute.into(),
            reference_system,
        }
    }

    /// The schema every parsed line conforms to.
    pub fn wkt_geometry() -> Self {
        Self::new(SCHEMA_NAME, GEOMETRY_ATTRIBUTE, ReferenceSystem::Wgs84)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometry_attribute(&self) -> &str {
        &self.geometry_attribute
    }

    pub fn reference_system(&self) -> ReferenceSystem {
        self.reference_system
    }

    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && !self.geometry_attribute.trim().is_empty()
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::wkt_geometry()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeometryRecord {
    geometry: Geometry<f64>,
    schema: Arc<FeatureSchema>,
}

impl GeometryRecord {
    pub fn new(geometry: Geometry<f64>, schema: Arc<FeatureSchema>) -> Self {
        Self {
            geometry,
            schema,
        }
    }

    pub fn geometry(&self) -> &Geometry<f64> {
        &self.geometry
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn kind(&self) -> Option<GeometryKind> {
        GeometryKind::classify(&self.geometry)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_geometry(&self.geometry)
    }
}

/// An ordered, immutable set of records sharing one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    schema: Arc<FeatureSchema>,
    records: Vec<GeometryRecord>,
}

impl FeatureCollection {
    pub fn new(schema: Arc<FeatureSchema>, records: Vec<GeometryRecord>) -> Self {
        Self {
            schema,
            records,
        }
    }

    pub fn empty(schema: Arc<FeatureSchema>) -> Self {
        Self::new(schema, Vec::new())
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn records(&self) -> &[GeometryRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeometryRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Each record must reference the collection's schema.
    pub fn is_consistent(&self) -> bool {
        self.records
            .iter()
            .all(|record| record.schema() == self.schema())
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::default();
        for record in &self.records {
            bbox.expand(&record.bounding_box());
        }
        bbox
    }
}
