use egui::{Pos2, Rect, Response, Ui, Vec2};
use log::{debug, trace};

use crate::spacial::{Invert, Position, ToPos2};
use crate::BoundingBox;

#[derive(Debug, Default)]
pub struct UiState {
    // these values are invalid until 'update' has been called
    pub center_screen_pos: Pos2,
    pub origin_screen_pos: Pos2,

    // only valid if the mouse is over the viewport
    pub cursor_world_coords: Option<Position>,
}

impl UiState {
    pub fn update(&mut self, ui: &Ui, viewport: &Rect, response: &Response, view_state: &mut ViewState) {
        self.update_cursor_position(view_state, response, ui);
        self.handle_panning(view_state, response, ui);
        self.handle_zooming(view_state, response, ui);

        self.center_screen_pos = viewport.center();
        self.origin_screen_pos = view_state.world_to_screen_coords(Position::new(0.0, 0.0));

        trace!(
            "update. view_state: {:?}, viewport: {:?}, cursor_world_coords: {:?}",
            view_state,
            viewport,
            self.cursor_world_coords
        )
    }

    pub fn update_cursor_position(&mut self, view_state: &ViewState, response: &Response, ui: &Ui) {
        if !response.hovered() {
            return;
        }

        self.cursor_world_coords = ui
            .input(|i| i.pointer.hover_pos())
            .map(|pointer_pos| view_state.screen_to_world_coords(pointer_pos));
    }

    pub fn handle_panning(&mut self, view_state: &mut ViewState, response: &Response, ui: &Ui) {
        if response.dragged_by(egui::PointerButton::Primary) {
            view_state.translation += response.drag_delta();
            ui.ctx().clear_animations();
        }
    }

    pub fn handle_zooming(&mut self, view_state: &mut ViewState, response: &Response, ui: &Ui) {
        if !response.hovered() {
            return;
        }

        let scroll_delta = ui.input(|i| i.raw_scroll_delta.y);
        if scroll_delta == 0.0 {
            return;
        }

        let zoom_factor = match scroll_delta > 0.0 {
            true => ZOOM_STEP,
            false => 1.0 / ZOOM_STEP,
        };

        match response.hover_pos() {
            Some(hover_pos) => view_state.zoom_about(hover_pos, zoom_factor),
            None => view_state.scale *= zoom_factor,
        }
    }
}

const ZOOM_STEP: f32 = 1.1;

/// Margin left around the content by [`ViewState::fit_view`].
const FIT_MARGIN: f32 = 0.95;

/// Maps world coordinates to screen coordinates, world Y points up, screen Y points down.
#[derive(Debug, Copy, Clone)]
pub struct ViewState {
    pub translation: Vec2,
    pub scale: f32,
    /// Scale that represents 100% zoom
    pub base_scale: f32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            scale: 1.0,
            base_scale: 1.0,
        }
    }
}

impl ViewState {
    pub fn screen_to_world_coords(&self, screen_pos: Pos2) -> Position {
        let world_pos = (screen_pos - self.translation) / self.scale;
        Position::new(world_pos.x as f64, world_pos.y as f64).invert_y()
    }

    pub fn world_to_screen_coords(&self, world_pos: Position) -> Pos2 {
        let world_pos = world_pos.invert_y();
        (world_pos * self.scale as f64).to_pos2() + self.translation
    }

    /// Keeps the world position under `screen_pos` fixed while scaling.
    pub fn zoom_about(&mut self, screen_pos: Pos2, zoom_factor: f32) {
        let old_scale = self.scale;
        let new_scale = old_scale * zoom_factor;

        let world_offset = (screen_pos.to_vec2() - self.translation) / old_scale;
        self.translation = screen_pos.to_vec2() - world_offset * new_scale;
        self.scale = new_scale;
    }

    /// Fit and center the content of `bbox` into `viewport`.
    ///
    /// `initial_zoom_factor`, e.g. 0.5 for 50%. Degenerate extents, e.g. a single point, keep the current scale.
    pub fn fit_view(&mut self, viewport: Rect, bbox: &BoundingBox, initial_zoom_factor: f32) {
        if bbox.is_empty() {
            debug!("Fit view skipped, nothing to fit");
            return;
        }

        let content_width = bbox.width() as f32;
        let content_height = bbox.height() as f32;

        let scale_x = (content_width > 0.0).then(|| viewport.width() / content_width);
        let scale_y = (content_height > 0.0).then(|| viewport.height() / content_height);

        if let Some(base_scale) = match (scale_x, scale_y) {
            (Some(x), Some(y)) => Some(f32::min(x, y)),
            (Some(x), None) => Some(x),
            (None, Some(y)) => Some(y),
            (None, None) => None,
        } {
            self.base_scale = base_scale * FIT_MARGIN;
        }

        self.scale = self.base_scale * initial_zoom_factor;

        debug!(
            "Fit view. base_scale: {:.2}, scale: {:.2}, content_width: {:.2}, content_height: {:.2}",
            self.base_scale, self.scale, content_width, content_height
        );

        self.center_view(viewport, bbox);
    }

    pub fn center_view(&mut self, viewport: Rect, bbox: &BoundingBox) {
        let center = bbox.center();

        self.translation = Vec2::new(
            viewport.center().x - (center.x as f32 * self.scale),
            viewport.center().y + (center.y as f32 * self.scale),
        );
    }
}
