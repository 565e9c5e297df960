use std::sync::Arc;

use egui::epaint::emath::Align2;
use egui::epaint::{Color32, FontId, Mesh, Pos2, Shape, Stroke, Vec2, Vertex};
use egui::Painter;
use geo_types::{Geometry, LineString, Point, Polygon};

use crate::color::{generate_pastel_color, Color};
use crate::drawing::{draw_bounding_box, draw_world_crosshair};
use crate::geometry::{is_convex, tessellate_polygon, RING_EPSILON};
use crate::layer::Layer;
use crate::spacial::ring::open_ring;
use crate::spacial::{Position, ToPosition};
use crate::style::{Style, Symbolizer};
use crate::types::GeometryKind;
use crate::ViewState;

#[derive(Debug, Clone)]
pub struct RenderConfiguration {
    /// Gives each shape a unique color.
    pub use_unique_shape_colors: bool,
    /// Draws the shape number in the center of the shape.
    pub use_shape_numbering: bool,
    /// Outlines the extent of each layer.
    pub draw_bounding_boxes: bool,
    /// Draws a crosshair through the world origin.
    pub draw_origin: bool,
    /// Screen pixels per unit of point mark size.
    pub point_radius_scale: f32,
}

impl Default for RenderConfiguration {
    fn default() -> Self {
        Self {
            use_unique_shape_colors: false,
            use_shape_numbering: false,
            draw_bounding_boxes: false,
            draw_origin: false,
            point_radius_scale: 4.0,
        }
    }
}

#[derive(Default)]
pub struct LayerRenderer {}

impl LayerRenderer {
    /// Paints the layers in order, later layers on top.
    #[profiling::function]
    pub fn paint_layers(
        &self,
        painter: &Painter,
        view: ViewState,
        layers: &[Arc<Layer>],
        configuration: &RenderConfiguration,
    ) {
        for layer in layers {
            self.paint_layer(painter, view, layer, configuration);
        }

        if configuration.draw_origin {
            draw_world_crosshair(painter, &view, Position::origin(), Color32::DARK_GRAY);
        }
    }

    #[profiling::function]
    pub fn paint_layer(&self, painter: &Painter, view: ViewState, layer: &Layer, configuration: &RenderConfiguration) {
        let style = layer.style();

        for (index, record) in layer.features().iter().enumerate() {
            let shape_color = match configuration.use_unique_shape_colors {
                true => Some(generate_pastel_color(index as u64)),
                false => None,
            };

            paint_geometry(painter, &view, style, record.geometry(), shape_color, configuration);

            if configuration.use_shape_numbering {
                let bbox = record.bounding_box();
                if !bbox.is_empty() {
                    draw_shape_number(painter, view.world_to_screen_coords(bbox.center()), index);
                }
            }
        }

        if configuration.draw_bounding_boxes {
            draw_bounding_box(painter, &view, layer.bounding_box(), Color32::RED);
        }
    }
}

/// Collections are painted member by member, each member with the rule for its own kind.
fn paint_geometry(
    painter: &Painter,
    view: &ViewState,
    style: &Style,
    geometry: &Geometry<f64>,
    shape_color: Option<Color>,
    configuration: &RenderConfiguration,
) {
    let Some(kind) = GeometryKind::classify(geometry) else {
        if let Geometry::GeometryCollection(collection) = geometry {
            for member in collection.iter() {
                paint_geometry(painter, view, style, member, shape_color, configuration);
            }
        }
        return;
    };

    let Some(rule) = style.rule_for(kind) else {
        return;
    };
    let symbolizer = rule.symbolizer();

    let render = |renderable: &dyn Renderable| {
        renderable.render(painter, view, symbolizer, shape_color, configuration);
    };

    match geometry {
        Geometry::Point(point) => render(point),
        Geometry::MultiPoint(points) => points
            .iter()
            .for_each(|point| render(point)),
        Geometry::Line(line) => render(&LineString::from(vec![line.start, line.end])),
        Geometry::LineString(line_string) => render(line_string),
        Geometry::MultiLineString(line_strings) => line_strings
            .iter()
            .for_each(|line_string| render(line_string)),
        Geometry::Polygon(polygon) => render(polygon),
        Geometry::MultiPolygon(polygons) => polygons
            .iter()
            .for_each(|polygon| render(polygon)),
        Geometry::Rect(rect) => render(&rect.to_polygon()),
        Geometry::Triangle(triangle) => render(&triangle.to_polygon()),
        Geometry::GeometryCollection(_) => {}
    }
}

trait Renderable {
    fn render(
        &self,
        painter: &Painter,
        view: &ViewState,
        symbolizer: &Symbolizer,
        shape_color: Option<Color>,
        configuration: &RenderConfiguration,
    );
}

impl Renderable for Point<f64> {
    #[cfg_attr(feature = "profile-renderables", profiling::function)]
    fn render(
        &self,
        painter: &Painter,
        view: &ViewState,
        symbolizer: &Symbolizer,
        shape_color: Option<Color>,
        configuration: &RenderConfiguration,
    ) {
        let Some(mark) = symbolizer.mark() else {
            return;
        };

        let fill_color = shape_color
            .unwrap_or(mark.fill.color)
            .to_color32(mark.fill.opacity * mark.opacity);
        let stroke = Stroke::new(
            mark.stroke.width as f32,
            mark.stroke
                .color
                .to_color32(mark.opacity),
        );

        let center = view.world_to_screen_coords((*self).to_position());
        let half_size = mark.size as f32 * configuration.point_radius_scale / 2.0;

        // screen Y points down, negate to keep the rotation counter-clockwise
        let (sin, cos) = (-(mark.rotation as f32).to_radians()).sin_cos();
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
            .into_iter()
            .map(|(x, y): (f32, f32)| {
                let offset = Vec2::new(x * cos - y * sin, x * sin + y * cos) * half_size;
                center + offset
            })
            .collect::<Vec<_>>();

        painter.add(Shape::convex_polygon(corners, fill_color, stroke));
    }
}

impl Renderable for LineString<f64> {
    #[cfg_attr(feature = "profile-renderables", profiling::function)]
    fn render(
        &self,
        painter: &Painter,
        view: &ViewState,
        symbolizer: &Symbolizer,
        shape_color: Option<Color>,
        _configuration: &RenderConfiguration,
    ) {
        let stroke = symbolizer.stroke();
        let color = shape_color.unwrap_or(stroke.color);

        let points = self
            .coords()
            .map(|coord| view.world_to_screen_coords((*coord).to_position()))
            .collect::<Vec<_>>();

        if points.len() < 2 {
            return;
        }

        painter.add(Shape::line(points, Stroke::new(stroke.width as f32, color.to_color32(1.0))));
    }
}

impl Renderable for Polygon<f64> {
    #[cfg_attr(feature = "profile-renderables", profiling::function)]
    fn render(
        &self,
        painter: &Painter,
        view: &ViewState,
        symbolizer: &Symbolizer,
        shape_color: Option<Color>,
        _configuration: &RenderConfiguration,
    ) {
        let Some(fill) = symbolizer.fill() else {
            return;
        };
        let stroke = symbolizer.stroke();

        let fill_color = shape_color
            .unwrap_or(fill.color)
            .to_color32(fill.opacity);
        let stroke = Stroke::new(stroke.width as f32, stroke.color.to_color32(1.0));

        let to_screen = |vertices: Vec<Position>| {
            vertices
                .into_iter()
                .map(|vertex| view.world_to_screen_coords(vertex))
                .collect::<Vec<Pos2>>()
        };

        let exterior = open_ring(self.exterior(), RING_EPSILON);
        if exterior.len() < 3 {
            return;
        }

        if self.interiors().is_empty() && is_convex(&exterior) {
            painter.add(Shape::convex_polygon(to_screen(exterior), fill_color, stroke));
            return;
        }

        if let Some(mesh) = tessellate_polygon(self) {
            let vertices: Vec<Vertex> = mesh
                .vertices
                .iter()
                .map(|[x, y]| Vertex {
                    pos: view.world_to_screen_coords(Position::new(*x as f64, *y as f64)),
                    uv: egui::epaint::WHITE_UV,
                    color: fill_color,
                })
                .collect();

            painter.add(Shape::Mesh(Arc::new(Mesh {
                vertices,
                indices: mesh.indices,
                texture_id: egui::TextureId::default(),
            })));
        }

        painter.add(Shape::closed_line(to_screen(exterior), stroke));
        for interior in self.interiors() {
            let ring = open_ring(interior, RING_EPSILON);
            if ring.len() >= 2 {
                painter.add(Shape::closed_line(to_screen(ring), stroke));
            }
        }
    }
}

fn draw_shape_number(painter: &Painter, position: Pos2, shape_number: usize) {
    painter.text(
        position,
        Align2::CENTER_CENTER,
        format!("{}", shape_number),
        FontId::monospace(16.0),
        Color32::GREEN,
    );
}
