use std::collections::HashSet;

use eframe::egui;

use crate::geometry::Point;
use crate::surface::{CursorStyle, PointerEventKind, Shape, ShapeId, Surface};
use crate::view::Viewport;

pub const DEFAULT_CANVAS_WIDTH: f32 = 800.0;
pub const DEFAULT_CANVAS_HEIGHT: f32 = 600.0;

/// In-memory drawing surface: an ordered shape list plus the bits of
/// interaction state (cursor, pointer subscriptions) a host needs to read
/// back when painting and dispatching input.
pub struct Canvas {
    shapes: Vec<(ShapeId, Shape)>,
    next_id: u64,
    cursor: CursorStyle,
    subscriptions: HashSet<PointerEventKind>,
    render_pending: bool,
    screen_rect: Option<egui::Rect>,
    pub viewport: Viewport,
}

impl Canvas {
    pub fn new(size: egui::Vec2) -> Self {
        Self {
            shapes: Vec::new(),
            next_id: 0,
            cursor: CursorStyle::Default,
            subscriptions: HashSet::new(),
            render_pending: false,
            screen_rect: None,
            viewport: Viewport::new(size),
        }
    }

    /// A canvas laid out at the origin with a 1:1 screen mapping.
    pub fn headless(size: egui::Vec2) -> Self {
        let mut canvas = Self::new(size);
        canvas.set_screen_rect(egui::Rect::from_min_size(egui::Pos2::ZERO, size));
        canvas
    }

    pub fn size(&self) -> egui::Vec2 {
        self.viewport.canvas_size
    }

    pub fn set_screen_rect(&mut self, rect: egui::Rect) {
        self.screen_rect = Some(rect);
    }

    pub fn screen_rect(&self) -> Option<egui::Rect> {
        self.screen_rect
    }

    /// Translate a screen position into surface coordinates.
    pub fn pointer_position(&self, screen_pos: egui::Pos2) -> Option<Point> {
        self.screen_rect
            .map(|rect| self.viewport.screen_to_surface(rect, screen_pos))
    }

    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().map(|(_, shape)| shape)
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes
            .iter()
            .find(|(sid, _)| *sid == id)
            .map(|(_, shape)| shape)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
        self.render_pending = true;
    }

    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }

    pub fn is_subscribed(&self, kind: PointerEventKind) -> bool {
        self.subscriptions.contains(&kind)
    }

    /// Returns whether a render was requested since the last call.
    pub fn take_render_request(&mut self) -> bool {
        std::mem::take(&mut self.render_pending)
    }
}

impl Surface for Canvas {
    fn is_ready(&self) -> bool {
        self.screen_rect.is_some()
    }

    fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        self.shapes.push((id, shape));
        id
    }

    fn remove_shape(&mut self, id: ShapeId) {
        self.shapes.retain(|(sid, _)| *sid != id);
    }

    fn request_render(&mut self) {
        self.render_pending = true;
    }

    fn set_cursor(&mut self, cursor: CursorStyle) {
        self.cursor = cursor;
    }

    fn subscribe(&mut self, kind: PointerEventKind) {
        self.subscriptions.insert(kind);
    }

    fn unsubscribe(&mut self, kind: PointerEventKind) {
        self.subscriptions.remove(&kind);
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(egui::vec2(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT))
    }
}
