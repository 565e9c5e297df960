use geo_types::Geometry;

/// Size of the mark drawn for point geometries.
pub const MARKER_SIZE: f64 = 1.0;
/// Rotation of the mark drawn for point geometries, in degrees.
pub const MARKER_ROTATION: f64 = 1.0;

/// The kinds of geometry a style carries a rule for.
///
/// The variant order is the order of the rules in a [`crate::Style`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeometryKind {
    Point,
    Line,
    Polygon,
}

impl GeometryKind {
    pub const ALL: [GeometryKind; 3] = [GeometryKind::Point, GeometryKind::Line, GeometryKind::Polygon];

    pub const fn fill_opacity(&self) -> f64 {
        match self {
            GeometryKind::Point => 1.0,
            GeometryKind::Line => 1.0,
            GeometryKind::Polygon => 0.5,
        }
    }

    pub const fn stroke_width(&self) -> f64 {
        match self {
            GeometryKind::Point | GeometryKind::Line | GeometryKind::Polygon => 1.0,
        }
    }

    /// Collections have no single kind, their members are classified individually.
    pub fn classify(geometry: &Geometry<f64>) -> Option<Self> {
        match geometry {
            Geometry::Point(_) | Geometry::MultiPoint(_) => Some(GeometryKind::Point),
            Geometry::Line(_) | Geometry::LineString(_) | Geometry::MultiLineString(_) => Some(GeometryKind::Line),
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => {
                Some(GeometryKind::Polygon)
            }
            Geometry::GeometryCollection(_) => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::Line => "Line",
            GeometryKind::Polygon => "Polygon",
        }
    }
}

#[cfg(test)]
mod tests {
    use geo_types::{line_string, point, polygon, Geometry, GeometryCollection, MultiPoint};
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(GeometryKind::Point, 1.0, 1.0)]
    #[case(GeometryKind::Line, 1.0, 1.0)]
    #[case(GeometryKind::Polygon, 0.5, 1.0)]
    fn test_kind_constants(#[case] kind: GeometryKind, #[case] opacity: f64, #[case] width: f64) {
        assert_eq!(kind.fill_opacity(), opacity);
        assert_eq!(kind.stroke_width(), width);
    }

    #[test]
    fn test_classify() {
        let point: Geometry<f64> = point!(x: 1.0, y: 2.0).into();
        let multi_point: Geometry<f64> = MultiPoint::from(vec![(0.0, 0.0), (1.0, 1.0)]).into();
        let line: Geometry<f64> = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)].into();
        let polygon: Geometry<f64> = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)].into();
        let collection = Geometry::GeometryCollection(GeometryCollection::new_from(vec![point.clone()]));

        assert_eq!(GeometryKind::classify(&point), Some(GeometryKind::Point));
        assert_eq!(GeometryKind::classify(&multi_point), Some(GeometryKind::Point));
        assert_eq!(GeometryKind::classify(&line), Some(GeometryKind::Line));
        assert_eq!(GeometryKind::classify(&polygon), Some(GeometryKind::Polygon));
        assert_eq!(GeometryKind::classify(&collection), None);
    }
}
