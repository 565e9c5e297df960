use geo_types::{Coord, Geometry, LineString, Polygon};
use log::trace;
use nalgebra::Point2;

use crate::spacial::ToPosition;

#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub struct BoundingBox {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl BoundingBox {
    pub fn expand(&mut self, other: &BoundingBox) {
        self.min.x = self.min.x.min(other.min.x);
        self.min.y = self.min.y.min(other.min.y);
        self.max.x = self.max.x.max(other.max.x);
        self.max.y = self.max.y.max(other.max.y);
    }

    pub fn expand_to(&mut self, point: Point2<f64>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            min: Point2::new(f64::MAX, f64::MAX),
            max: Point2::new(f64::MIN, f64::MIN),
        }
    }
}

impl BoundingBox {
    /// Note that a bounding box of 0,0 -> 0,0 is NOT empty
    /// e.g., a single `POINT (0 0)` has a bounding box with zero width and height.
    ///
    /// Only a bounding box which is the same as the one returned by `default` counts as empty.
    pub fn is_empty(&self) -> bool {
        self.eq(&BoundingBox::default())
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Returns the geometric center of the bounding box as a Point2
    pub fn center(&self) -> Point2<f64> {
        Point2::new(self.min.x + self.max.x, self.min.y + self.max.y) / 2.0
    }

    /// Returns 4 corner points of the bounding box such that the result is useable as a closed path.
    /// ```plaintext
    /// (min_x, min_y) 1 ┌────────────┐ 2 (max_x, min_y)
    ///                  │            │
    /// (min_x, max_y) 4 └────────────┘ 3 (max_x, max_y)
    /// ```
    pub fn vertices(&self) -> Vec<Point2<f64>> {
        vec![
            Point2::new(self.min.x, self.min.y),
            Point2::new(self.max.x, self.min.y),
            Point2::new(self.max.x, self.max.y),
            Point2::new(self.min.x, self.max.y),
        ]
    }

    /// Constructs a bounding box from a list of points
    pub fn from_points(points: &[Point2<f64>]) -> Self {
        let mut bbox = Self::default();
        for position in points {
            bbox.expand_to(*position);
        }
        bbox
    }

    /// Constructs a bounding box covering every coordinate of the geometry, including collection members.
    pub fn from_geometry(geometry: &Geometry<f64>) -> Self {
        let mut bbox = Self::default();
        visit_coords(geometry, &mut |coord| bbox.expand_to(coord.to_position()));
        trace!("geometry bbox: {:?}", bbox);
        bbox
    }
}

fn visit_coords(geometry: &Geometry<f64>, visitor: &mut impl FnMut(Coord<f64>)) {
    fn visit_line_string(line_string: &LineString<f64>, visitor: &mut impl FnMut(Coord<f64>)) {
        for coord in line_string.coords() {
            visitor(*coord);
        }
    }

    fn visit_polygon(polygon: &Polygon<f64>, visitor: &mut impl FnMut(Coord<f64>)) {
        // interior rings lie within the exterior ring
        visit_line_string(polygon.exterior(), visitor);
    }

    match geometry {
        Geometry::Point(point) => visitor(point.0),
        Geometry::Line(line) => {
            visitor(line.start);
            visitor(line.end);
        }
        Geometry::LineString(line_string) => visit_line_string(line_string, visitor),
        Geometry::Polygon(polygon) => visit_polygon(polygon, visitor),
        Geometry::MultiPoint(multi_point) => {
            for point in multi_point.iter() {
                visitor(point.0);
            }
        }
        Geometry::MultiLineString(multi_line_string) => {
            for line_string in multi_line_string.iter() {
                visit_line_string(line_string, visitor);
            }
        }
        Geometry::MultiPolygon(multi_polygon) => {
            for polygon in multi_polygon.iter() {
                visit_polygon(polygon, visitor);
            }
        }
        Geometry::GeometryCollection(collection) => {
            for member in collection.iter() {
                visit_coords(member, visitor);
            }
        }
        Geometry::Rect(rect) => {
            visitor(rect.min());
            visitor(rect.max());
        }
        Geometry::Triangle(triangle) => {
            for coord in triangle.to_array() {
                visitor(coord);
            }
        }
    }
}
