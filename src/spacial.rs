#[cfg(feature = "egui")]
use egui::Pos2;
use geo_types::{Coord, LineString};

/// A position in world coordinates, x = longitude, y = latitude for WGS84 data.
pub type Position = nalgebra::Point2<f64>;

#[cfg(feature = "egui")]
pub trait ToPos2 {
    fn to_pos2(self) -> Pos2;
}

#[cfg(feature = "egui")]
impl ToPos2 for Position {
    fn to_pos2(self) -> Pos2 {
        Pos2::new(self.x as f32, self.y as f32)
    }
}

pub trait ToPosition {
    fn to_position(self) -> Position;
}

impl ToPosition for Coord<f64> {
    fn to_position(self) -> Position {
        Position::new(self.x, self.y)
    }
}

impl ToPosition for geo_types::Point<f64> {
    fn to_position(self) -> Position {
        self.0.to_position()
    }
}

/// World Y points up, screen Y points down.
pub trait Invert {
    fn invert_y(self) -> Self;
}

impl Invert for Position {
    fn invert_y(self) -> Self {
        Self::new(self.x, -self.y)
    }
}

pub mod ring {
    use super::*;

    /// Vertices of a ring without the repeated closing vertex and without adjacent duplicates.
    ///
    /// Rings which would be left with fewer than 3 vertices are returned as-is (minus the closing vertex).
    pub fn open_ring(ring: &LineString<f64>, epsilon: f64) -> Vec<Position> {
        let mut vertices: Vec<Position> = ring
            .coords()
            .map(|coord| (*coord).to_position())
            .collect();

        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }

        let mut deduplicated: Vec<Position> = Vec::with_capacity(vertices.len());
        for vertex in &vertices {
            let is_duplicate = deduplicated
                .last()
                .is_some_and(|last| (last.x - vertex.x).abs() < epsilon && (last.y - vertex.y).abs() < epsilon);
            if !is_duplicate {
                deduplicated.push(*vertex);
            }
        }

        if deduplicated.len() < 3 {
            return vertices;
        }

        deduplicated
    }

    #[cfg(test)]
    mod tests {
        use geo_types::line_string;

        use super::*;

        #[test]
        fn test_closing_vertex_removed() {
            let ring = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 0.0)];

            let vertices = open_ring(&ring, 1e-9);

            assert_eq!(vertices, vec![
                Position::new(0.0, 0.0),
                Position::new(1.0, 0.0),
                Position::new(1.0, 1.0)
            ]);
        }

        #[test]
        fn test_adjacent_duplicates_removed() {
            let ring = line_string![
                (x: 0.0, y: 0.0),
                (x: 0.0, y: 0.0000001),
                (x: 2.0, y: 0.0),
                (x: 2.0, y: 2.0),
                (x: 0.0, y: 0.0)
            ];

            let vertices = open_ring(&ring, 1e-6);

            assert_eq!(vertices.len(), 3);
            assert_eq!(vertices[0], Position::new(0.0, 0.0));
        }

        #[test]
        fn test_degenerate_ring_left_alone() {
            let ring = line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 0.0), (x: 1.0, y: 1.0)];

            let vertices = open_ring(&ring, 1e-6);

            assert_eq!(vertices.len(), 3);
        }
    }
}

#[cfg(test)]
mod tests {
    use geo_types::{coord, point};

    use super::*;

    #[test]
    fn test_to_position() {
        assert_eq!(coord! { x: 1.5, y: -2.0 }.to_position(), Position::new(1.5, -2.0));
        assert_eq!(point!(x: 3.0, y: 4.0).to_position(), Position::new(3.0, 4.0));
    }

    #[test]
    fn test_invert_y() {
        assert_eq!(Position::new(1.0, 2.0).invert_y(), Position::new(1.0, -2.0));
    }
}
