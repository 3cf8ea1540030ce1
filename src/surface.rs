//! The drawing-surface capability the polygon drawer renders into.
//!
//! A surface is a sink: it keeps whatever shapes it is given and reports
//! nothing back except the ids it hands out. Authoritative drawing state
//! lives with the caller.

use eframe::egui;

use crate::geometry::Point;

// ── Colors & Styles ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const RED: Self = Self::opaque(255, 0, 0);
    pub const YELLOW: Self = Self::opaque(255, 255, 0);
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_egui(self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Rgba8,
    /// Dash and gap lengths; `None` draws a solid line.
    pub dash: Option<(f32, f32)>,
}

impl Stroke {
    pub const fn solid(width: f32, color: Rgba8) -> Self {
        Self {
            width,
            color,
            dash: None,
        }
    }

    pub const fn dashed(width: f32, color: Rgba8, dash: f32, gap: f32) -> Self {
        Self {
            width,
            color,
            dash: Some((dash, gap)),
        }
    }
}

pub const MARKER_RADIUS: f32 = 4.0;
pub const IN_PROGRESS_COLOR: Rgba8 = Rgba8::RED;
pub const SEGMENT_STROKE: Stroke = Stroke::solid(2.0, IN_PROGRESS_COLOR);
pub const PREVIEW_STROKE: Stroke = Stroke::dashed(1.0, IN_PROGRESS_COLOR, 5.0, 5.0);
pub const POLYGON_STROKE: Stroke = Stroke::solid(2.0, Rgba8::YELLOW);
/// rgba(255, 255, 0, 0.3)
pub const POLYGON_FILL: Rgba8 = Rgba8 {
    r: 255,
    g: 255,
    b: 0,
    a: 77,
};
pub const LABEL_COLOR: Rgba8 = Rgba8::WHITE;
pub const LABEL_FONT_SIZE: f32 = 16.0;

// ── Shapes ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u64);

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Small filled dot marking a recorded vertex.
    Marker {
        center: Point,
        radius: f32,
        color: Rgba8,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Polygon {
        points: Vec<Point>,
        fill: Rgba8,
        stroke: Stroke,
    },
    /// Text whose top-left corner sits at `anchor`.
    Label {
        anchor: Point,
        text: String,
        size: f32,
        color: Rgba8,
    },
}

impl Shape {
    pub fn marker(center: Point) -> Self {
        Shape::Marker {
            center,
            radius: MARKER_RADIUS,
            color: IN_PROGRESS_COLOR,
        }
    }

    pub fn segment(from: Point, to: Point) -> Self {
        Shape::Line {
            from,
            to,
            stroke: SEGMENT_STROKE,
        }
    }

    pub fn preview(from: Point, to: Point) -> Self {
        Shape::Line {
            from,
            to,
            stroke: PREVIEW_STROKE,
        }
    }
}

// ── Surface capability ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CursorStyle {
    #[default]
    Default,
    Crosshair,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Down,
    Move,
}

pub trait Surface {
    /// Whether the surface has been laid out and can accept shapes.
    fn is_ready(&self) -> bool;
    fn add_shape(&mut self, shape: Shape) -> ShapeId;
    /// Removing an unknown id is a no-op.
    fn remove_shape(&mut self, id: ShapeId);
    fn request_render(&mut self);
    fn set_cursor(&mut self, cursor: CursorStyle);
    fn subscribe(&mut self, kind: PointerEventKind);
    fn unsubscribe(&mut self, kind: PointerEventKind);
}
