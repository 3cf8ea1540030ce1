//! Point-by-point polygon construction.
//!
//! [`PolygonDrawer`] turns pointer clicks into a labeled closed polygon. It
//! keeps the authoritative point list and pushes markers, connecting
//! segments and a rubber-band preview line onto a [`Surface`]. Clicking
//! within [`CLOSE_THRESHOLD`] of the first point (once at least three points
//! exist) closes the polygon, swaps the transient shapes for the finished
//! polygon and hands back an [`Annotation`].
//!
//! Pointer input only reaches the drawer while it is subscribed on the
//! surface, which it is exactly while a session is active.

use log::debug;
use thiserror::Error;

use crate::annotation::{Annotation, AnnotationError, MIN_POLYGON_POINTS};
use crate::geometry::Point;
use crate::render::render_annotation;
use crate::surface::{CursorStyle, PointerEventKind, Shape, ShapeId, Surface};

/// Distance from the first point under which a click closes the polygon.
pub const CLOSE_THRESHOLD: f32 = 10.0;

#[derive(Debug, Error, PartialEq)]
pub enum DrawError {
    #[error("the drawing surface is not ready")]
    SurfaceUnavailable,
    #[error("a label is required to start drawing")]
    EmptyLabel,
    #[error("no polygon is being drawn")]
    NotDrawing,
    #[error("you need at least 3 points to close a polygon (have {count})")]
    TooFewPoints { count: usize },
    #[error(transparent)]
    Annotation(#[from] AnnotationError),
}

/// What a pointer event did to the drawer.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerOutcome {
    /// No session, or nothing to preview from yet.
    Ignored,
    PointAdded { count: usize },
    PreviewMoved,
    /// The click closed the polygon; the session is over.
    Closed(Annotation),
}

#[derive(Debug, Default)]
struct Session {
    label: String,
    points: Vec<Point>,
    markers: Vec<ShapeId>,
    segments: Vec<ShapeId>,
    preview: Option<ShapeId>,
}

impl Session {
    fn is_near_first(&self, p: Point) -> bool {
        self.points
            .first()
            .is_some_and(|first| p.distance_to(*first) < CLOSE_THRESHOLD)
    }

    fn clear_preview<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        if let Some(id) = self.preview.take() {
            surface.remove_shape(id);
        }
    }

    fn clear_shapes<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        for id in self.markers.drain(..).chain(self.segments.drain(..)) {
            surface.remove_shape(id);
        }
        self.clear_preview(surface);
    }
}

#[derive(Debug, Default)]
enum DrawState {
    #[default]
    Idle,
    Drawing(Session),
}

#[derive(Debug, Default)]
pub struct PolygonDrawer {
    state: DrawState,
}

impl PolygonDrawer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawState::Drawing(_))
    }

    /// Points recorded so far; empty when idle.
    pub fn points(&self) -> &[Point] {
        match &self.state {
            DrawState::Drawing(session) => &session.points,
            DrawState::Idle => &[],
        }
    }

    pub fn label(&self) -> Option<&str> {
        match &self.state {
            DrawState::Drawing(session) => Some(&session.label),
            DrawState::Idle => None,
        }
    }

    /// Id of the rubber-band line, if one is on the surface.
    pub fn preview(&self) -> Option<ShapeId> {
        match &self.state {
            DrawState::Drawing(session) => session.preview,
            DrawState::Idle => None,
        }
    }

    /// Begin a new polygon. Any unfinished one is thrown away first.
    pub fn start<S: Surface + ?Sized>(&mut self, label: &str, surface: &mut S) -> Result<(), DrawError> {
        if !surface.is_ready() {
            return Err(DrawError::SurfaceUnavailable);
        }
        let label = label.trim();
        if label.is_empty() {
            return Err(DrawError::EmptyLabel);
        }

        if let DrawState::Drawing(mut old) = std::mem::take(&mut self.state) {
            debug!("discarding unfinished polygon '{}'", old.label);
            old.clear_shapes(surface);
        }

        surface.set_cursor(CursorStyle::Crosshair);
        surface.subscribe(PointerEventKind::Down);
        surface.subscribe(PointerEventKind::Move);
        self.state = DrawState::Drawing(Session {
            label: label.to_owned(),
            ..Default::default()
        });
        surface.request_render();
        debug!("started polygon '{label}'");
        Ok(())
    }

    pub fn on_pointer_down<S: Surface + ?Sized>(
        &mut self,
        position: Point,
        surface: &mut S,
    ) -> Result<PointerOutcome, DrawError> {
        let DrawState::Drawing(session) = &mut self.state else {
            return Ok(PointerOutcome::Ignored);
        };

        // the next move re-creates the preview from the new last point
        session.clear_preview(surface);

        if session.points.len() >= MIN_POLYGON_POINTS && session.is_near_first(position) {
            return self.finish(surface).map(PointerOutcome::Closed);
        }

        if let Some(&prev) = session.points.last() {
            session.segments.push(surface.add_shape(Shape::segment(prev, position)));
        }
        session.markers.push(surface.add_shape(Shape::marker(position)));
        session.points.push(position);
        surface.request_render();

        Ok(PointerOutcome::PointAdded {
            count: session.points.len(),
        })
    }

    pub fn on_pointer_move<S: Surface + ?Sized>(&mut self, position: Point, surface: &mut S) -> PointerOutcome {
        let DrawState::Drawing(session) = &mut self.state else {
            return PointerOutcome::Ignored;
        };
        let Some(&last) = session.points.last() else {
            return PointerOutcome::Ignored;
        };

        session.clear_preview(surface);
        session.preview = Some(surface.add_shape(Shape::preview(last, position)));
        surface.request_render();
        PointerOutcome::PreviewMoved
    }

    /// Close the polygon without clicking near its first point.
    pub fn close<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<Annotation, DrawError> {
        let DrawState::Drawing(session) = &self.state else {
            return Err(DrawError::NotDrawing);
        };
        if session.points.len() < MIN_POLYGON_POINTS {
            return Err(DrawError::TooFewPoints {
                count: session.points.len(),
            });
        }
        self.finish(surface)
    }

    /// Drop the current session without producing an annotation. Returns
    /// whether there was one.
    pub fn cancel<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        let DrawState::Drawing(mut session) = std::mem::take(&mut self.state) else {
            return false;
        };
        session.clear_shapes(surface);
        Self::release(surface);
        debug!(
            "cancelled polygon '{}' with {} points",
            session.label,
            session.points.len()
        );
        true
    }

    fn finish<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<Annotation, DrawError> {
        let DrawState::Drawing(session) = &self.state else {
            return Err(DrawError::NotDrawing);
        };
        // build before tearing anything down so a rejected polygon leaves the
        // session untouched
        let annotation = Annotation::new(session.label.clone(), session.points.clone())?;

        if let DrawState::Drawing(mut session) = std::mem::take(&mut self.state) {
            session.clear_shapes(surface);
        }
        render_annotation(surface, &annotation);
        Self::release(surface);
        debug!(
            "closed polygon '{}' with {} points",
            annotation.label(),
            annotation.points().len()
        );
        Ok(annotation)
    }

    fn release<S: Surface + ?Sized>(surface: &mut S) {
        surface.unsubscribe(PointerEventKind::Down);
        surface.unsubscribe(PointerEventKind::Move);
        surface.set_cursor(CursorStyle::Default);
        surface.request_render();
    }
}
