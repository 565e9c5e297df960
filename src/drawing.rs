use egui::{Color32, Painter, Pos2, Shape, Stroke};

use crate::geometry::BoundingBox;
use crate::spacial::Position;
use crate::ViewState;

/// Horizontal and vertical lines through a screen position, spanning the painter's clip rect.
pub fn draw_crosshair(painter: &Painter, position: Pos2, color: Color32) {
    let viewport = painter.clip_rect();
    let stroke = Stroke::new(1.0, color);

    painter.hline(viewport.x_range(), position.y, stroke);
    painter.vline(position.x, viewport.y_range(), stroke);
}

pub fn draw_world_crosshair(painter: &Painter, view: &ViewState, position: Position, color: Color32) {
    draw_crosshair(painter, view.world_to_screen_coords(position), color);
}

/// Nothing is drawn for an empty box.
pub fn draw_bounding_box(painter: &Painter, view: &ViewState, bbox: &BoundingBox, color: Color32) {
    if bbox.is_empty() {
        return;
    }

    let vertices = bbox
        .vertices()
        .into_iter()
        .map(|vertex| view.world_to_screen_coords(vertex))
        .collect();
    painter.add(Shape::closed_line(vertices, Stroke::new(1.0, color)));
}

#[cfg(test)]
mod tests {
    use egui::{Context, LayerId, Vec2};

    use super::*;

    fn count_shapes(paint: impl Fn(&Painter)) -> usize {
        let ctx = Context::default();
        let output = ctx.run(Default::default(), |ctx| {
            let painter = ctx.layer_painter(LayerId::background());
            paint(&painter);
        });
        output.shapes.len()
    }

    #[test]
    fn test_bounding_box_outline() {
        let view = ViewState {
            translation: Vec2::new(100.0, 100.0),
            scale: 10.0,
            base_scale: 1.0,
        };
        let bbox = BoundingBox::from_points(&[Position::new(-1.0, -1.0), Position::new(2.0, 3.0)]);

        let baseline = count_shapes(|_| {});
        let empty = count_shapes(|painter| draw_bounding_box(painter, &view, &BoundingBox::default(), Color32::RED));
        let outlined = count_shapes(|painter| draw_bounding_box(painter, &view, &bbox, Color32::RED));

        assert_eq!(empty, baseline);
        assert_eq!(outlined, baseline + 1);
    }

    #[test]
    fn test_world_crosshair() {
        let view = ViewState::default();

        let baseline = count_shapes(|_| {});
        let crosshair = count_shapes(|painter| draw_world_crosshair(painter, &view, Position::origin(), Color32::GRAY));

        assert_eq!(crosshair, baseline + 2);
    }
}
