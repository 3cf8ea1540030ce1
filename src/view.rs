use eframe::egui;

use crate::geometry::Point;

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 10.0;

/// Pan & zoom of the drawing surface inside the on-screen rectangle that
/// hosts it. The surface is centred in that rectangle at zoom 1.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    pub canvas_size: egui::Vec2,
    pub pan: egui::Vec2,
    pub zoom: f32,
}

impl Viewport {
    pub fn new(canvas_size: egui::Vec2) -> Self {
        Self {
            canvas_size,
            pan: egui::Vec2::ZERO,
            zoom: 1.0,
        }
    }

    /// Convert surface coords to screen-space
    pub fn surface_to_screen(&self, screen_rect: egui::Rect, p: Point) -> egui::Pos2 {
        screen_rect.center()
            + self.pan
            + (egui::vec2(p.x, p.y) - self.canvas_size * 0.5) * self.zoom
    }

    /// Convert screen-space coords to surface coords
    pub fn screen_to_surface(&self, screen_rect: egui::Rect, screen_pos: egui::Pos2) -> Point {
        let rel = screen_pos - screen_rect.center() - self.pan;
        Point::new(
            rel.x / self.zoom + self.canvas_size.x * 0.5,
            rel.y / self.zoom + self.canvas_size.y * 0.5,
        )
    }

    pub fn surface_rect_on_screen(&self, screen_rect: egui::Rect) -> egui::Rect {
        egui::Rect::from_min_max(
            self.surface_to_screen(screen_rect, Point::new(0.0, 0.0)),
            self.surface_to_screen(
                screen_rect,
                Point::new(self.canvas_size.x, self.canvas_size.y),
            ),
        )
    }

    /// Zoom by a scroll delta, keeping the surface point under `cursor` fixed.
    pub fn zoom_at(&mut self, screen_rect: egui::Rect, cursor: Option<egui::Pos2>, scroll: f32) {
        let factor = 1.0 + scroll * 0.002;
        let new_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if let Some(cursor) = cursor {
            let cursor_rel = cursor - screen_rect.center() - self.pan;
            self.pan -= cursor_rel * (new_zoom / self.zoom - 1.0);
        }
        self.zoom = new_zoom;
    }
}

/// Scale that fits an image inside the canvas while keeping its aspect ratio.
pub fn fit_scale(image_size: egui::Vec2, canvas_size: egui::Vec2) -> f32 {
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        return 1.0;
    }
    (canvas_size.x / image_size.x).min(canvas_size.y / image_size.y)
}
