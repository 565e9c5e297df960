use geo_types::Polygon;
use log::warn;
use nalgebra::Point2;

use crate::spacial::ring::open_ring;

/// Vertices closer than this are treated as duplicates.
pub const RING_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone)]
pub struct PolygonMesh {
    pub vertices: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

/// Tessellates the polygon, interior rings become holes.
///
/// Returns `None` if the polygon has no area or cannot be tessellated.
pub fn tessellate_polygon(polygon: &Polygon<f64>) -> Option<PolygonMesh> {
    use lyon::path::Path;
    use lyon::tessellation::{BuffersBuilder, FillOptions, FillRule, FillTessellator, VertexBuffers};

    let rings = std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(|ring| open_ring(ring, RING_EPSILON))
        .filter(|vertices| vertices.len() >= 3)
        .collect::<Vec<_>>();

    if rings.is_empty() {
        return None;
    }

    let mut path_builder = Path::builder();
    for vertices in &rings {
        let to_point = |position: &Point2<f64>| lyon::math::Point::new(position.x as f32, position.y as f32);

        path_builder.begin(to_point(&vertices[0]));
        for position in &vertices[1..] {
            path_builder.line_to(to_point(position));
        }
        path_builder.close();
    }
    let path = path_builder.build();

    let mut geometry: VertexBuffers<[f32; 2], u32> = VertexBuffers::new();
    let mut tessellator = FillTessellator::new();

    let result = tessellator.tessellate_path(
        &path,
        &FillOptions::default().with_fill_rule(FillRule::EvenOdd),
        &mut BuffersBuilder::new(&mut geometry, |vertex: lyon::tessellation::FillVertex| {
            [vertex.position().x, vertex.position().y]
        }),
    );

    if let Err(error) = result {
        warn!("Unable to tessellate polygon. error: {:?}", error);
        return None;
    }

    Some(PolygonMesh {
        vertices: geometry.vertices,
        indices: geometry.indices,
    })
}
