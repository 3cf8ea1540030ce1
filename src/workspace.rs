//! Host side of a drawing session: routes pointer input to the drawer while
//! it is subscribed, collects emitted annotations and hands them to the
//! store.

use anyhow::Result;
use eframe::egui;
use log::{debug, info};

use crate::annotation::{Annotation, AnnotationBatch};
use crate::canvas::Canvas;
use crate::drawer::{DrawError, PointerOutcome, PolygonDrawer};
use crate::render::render_annotation;
use crate::store::AnnotationStore;
use crate::surface::PointerEventKind;

pub struct Workspace {
    canvas: Canvas,
    drawer: PolygonDrawer,
    /// Annotations already persisted; redrawn after every reset.
    saved: Vec<Annotation>,
    /// Finished this session, not yet handed to the store.
    pending: Vec<Annotation>,
}

impl Workspace {
    pub fn new(mut canvas: Canvas, saved: Vec<Annotation>) -> Self {
        for ann in &saved {
            render_annotation(&mut canvas, ann);
        }
        Self {
            canvas,
            drawer: PolygonDrawer::new(),
            saved,
            pending: Vec::new(),
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn drawer(&self) -> &PolygonDrawer {
        &self.drawer
    }

    pub fn saved(&self) -> &[Annotation] {
        &self.saved
    }

    pub fn pending(&self) -> &[Annotation] {
        &self.pending
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn start(&mut self, label: &str) -> Result<(), DrawError> {
        self.drawer.start(label, &mut self.canvas)
    }

    pub fn close(&mut self) -> Result<&Annotation, DrawError> {
        let ann = self.drawer.close(&mut self.canvas)?;
        Ok(self.accept(ann))
    }

    pub fn cancel(&mut self) -> bool {
        self.drawer.cancel(&mut self.canvas)
    }

    /// Deliver a pointer press at a screen position. Returns the annotation
    /// if the press closed a polygon.
    pub fn pointer_down(&mut self, screen_pos: egui::Pos2) -> Result<Option<&Annotation>, DrawError> {
        if !self.canvas.is_subscribed(PointerEventKind::Down) {
            return Ok(None);
        }
        let Some(pos) = self.canvas.pointer_position(screen_pos) else {
            return Ok(None);
        };
        match self.drawer.on_pointer_down(pos, &mut self.canvas)? {
            PointerOutcome::Closed(ann) => Ok(Some(self.accept(ann))),
            _ => Ok(None),
        }
    }

    pub fn pointer_move(&mut self, screen_pos: egui::Pos2) {
        if !self.canvas.is_subscribed(PointerEventKind::Move) {
            return;
        }
        if let Some(pos) = self.canvas.pointer_position(screen_pos) {
            self.drawer.on_pointer_move(pos, &mut self.canvas);
        }
    }

    fn accept(&mut self, ann: Annotation) -> &Annotation {
        info!(
            "new annotation '{}' ({} points)",
            ann.label(),
            ann.points().len()
        );
        self.pending.push(ann);
        &self.pending[self.pending.len() - 1]
    }

    /// Everything the store should hold after a save.
    pub fn batch(&self) -> AnnotationBatch {
        AnnotationBatch::new(self.saved.iter().chain(&self.pending).cloned().collect())
    }

    /// Returns `false` without touching the store when nothing is pending.
    pub fn save(&mut self, store: &AnnotationStore) -> Result<bool> {
        if !self.has_pending() {
            debug!("nothing to save");
            return Ok(false);
        }
        store.save(&self.batch())?;
        self.saved.append(&mut self.pending);
        Ok(true)
    }

    /// Throw away unsaved work and redraw the stored annotations.
    pub fn reset(&mut self) {
        self.drawer.cancel(&mut self.canvas);
        self.canvas.clear();
        self.pending.clear();
        for ann in &self.saved {
            render_annotation(&mut self.canvas, ann);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::surface::{CursorStyle, Shape};

    fn square(label: &str, origin: f32) -> Annotation {
        Annotation::new(
            label,
            vec![
                Point::new(origin, origin),
                Point::new(origin + 20.0, origin),
                Point::new(origin + 20.0, origin + 20.0),
                Point::new(origin, origin + 20.0),
            ],
        )
        .unwrap()
    }

    fn workspace(saved: Vec<Annotation>) -> Workspace {
        Workspace::new(Canvas::headless(egui::vec2(800.0, 600.0)), saved)
    }

    fn draw_triangle(ws: &mut Workspace, label: &str) {
        ws.start(label).unwrap();
        for (x, y) in [(100.0, 100.0), (200.0, 100.0), (150.0, 180.0)] {
            ws.pointer_down(egui::pos2(x, y)).unwrap();
        }
        let closed = ws.pointer_down(egui::pos2(103.0, 98.0)).unwrap();
        assert_eq!(closed.map(Annotation::label), Some(label));
    }

    #[test]
    fn renders_saved_annotations() {
        let ws = workspace(vec![square("a", 0.0), square("b", 100.0)]);
        let polygons = ws
            .canvas()
            .shapes()
            .filter(|s| matches!(s, Shape::Polygon { .. }))
            .count();
        assert_eq!(polygons, 2);
        assert_eq!(ws.canvas().len(), 4);
    }

    #[test]
    fn pointer_is_ignored_until_started() {
        let mut ws = workspace(Vec::new());
        assert_eq!(ws.pointer_down(egui::pos2(10.0, 10.0)), Ok(None));
        ws.pointer_move(egui::pos2(20.0, 20.0));
        assert!(ws.canvas().is_empty());
        assert!(ws.drawer().points().is_empty());
    }

    #[test]
    fn screen_positions_go_through_the_viewport() {
        let mut ws = workspace(Vec::new());
        ws.canvas_mut().viewport.zoom = 2.0;
        ws.start("tree").unwrap();
        // centre of the screen rect is the centre of the canvas
        ws.pointer_down(egui::pos2(400.0, 300.0)).unwrap();
        ws.pointer_down(egui::pos2(420.0, 300.0)).unwrap();
        assert_eq!(
            ws.drawer().points(),
            &[Point::new(400.0, 300.0), Point::new(410.0, 300.0)]
        );
    }

    #[test]
    fn closed_polygons_become_pending() {
        let mut ws = workspace(vec![square("old", 0.0)]);
        draw_triangle(&mut ws, "roof");
        assert!(ws.has_pending());
        assert_eq!(ws.pending().len(), 1);
        assert_eq!(ws.pending()[0].points().len(), 3);
        assert_eq!(ws.canvas().cursor(), CursorStyle::Default);

        // after closing, clicks no longer reach the drawer
        assert_eq!(ws.pointer_down(egui::pos2(300.0, 300.0)), Ok(None));
        assert!(ws.drawer().points().is_empty());
        assert_eq!(ws.batch().annotations.len(), 2);
    }

    #[test]
    fn explicit_close_reports_too_few_points() {
        let mut ws = workspace(Vec::new());
        ws.start("tree").unwrap();
        ws.pointer_down(egui::pos2(1.0, 1.0)).unwrap();
        assert_eq!(
            ws.close().err(),
            Some(DrawError::TooFewPoints { count: 1 })
        );
        assert!(!ws.has_pending());
        assert!(ws.drawer().is_drawing());
    }

    #[test]
    fn save_moves_pending_to_saved() {
        let dir = tempfile::tempdir().unwrap();
        let store = AnnotationStore::new(dir.path().join("img.png.annotations.json"));
        let mut ws = workspace(vec![square("old", 0.0)]);
        draw_triangle(&mut ws, "roof");

        assert!(ws.save(&store).unwrap());
        assert!(!ws.has_pending());
        assert_eq!(ws.saved().len(), 2);
        let on_disk = store.load().unwrap();
        assert_eq!(on_disk.annotations, ws.saved());
    }

    #[test]
    fn save_without_pending_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = AnnotationStore::new(dir.path().join("img.png.annotations.json"));
        let mut ws = workspace(vec![square("old", 0.0)]);
        assert!(!ws.save(&store).unwrap());
        assert!(!store.path().exists());
    }

    #[test]
    fn reset_discards_unsaved_work() {
        let mut ws = workspace(vec![square("old", 0.0)]);
        draw_triangle(&mut ws, "roof");
        ws.start("half").unwrap();
        ws.pointer_down(egui::pos2(500.0, 500.0)).unwrap();

        ws.reset();
        assert!(!ws.has_pending());
        assert!(!ws.drawer().is_drawing());
        assert_eq!(ws.canvas().len(), 2);
        assert!(!ws.canvas().is_subscribed(PointerEventKind::Down));
    }
}
