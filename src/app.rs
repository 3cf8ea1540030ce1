use std::path::PathBuf;

use eframe::egui;
use image::DynamicImage;
use log::{error, warn};

use crate::canvas::Canvas;
use crate::geometry::{triangulate, Point};
use crate::store::AnnotationStore;
use crate::surface::{CursorStyle, Shape};
use crate::view::{fit_scale, Viewport};
use crate::workspace::Workspace;

// ── App ─────────────────────────────────────────────────────────────────────

pub struct AnnotateApp {
    image_path: PathBuf,
    raw_image: Option<DynamicImage>,
    texture: Option<egui::TextureHandle>,

    workspace: Workspace,
    store: AnnotationStore,

    label_input: String,
    status: Option<String>,

    last_pointer: Option<egui::Pos2>,
    panning: bool,
}

impl AnnotateApp {
    pub fn new(image_path: PathBuf, store: AnnotationStore, canvas_size: egui::Vec2) -> Self {
        let raw_image = match image::open(&image_path) {
            Ok(img) => Some(img),
            Err(e) => {
                error!("failed to load image {}: {e}", image_path.display());
                None
            }
        };
        let (saved, status) = match store.load() {
            Ok(batch) => (batch.annotations, None),
            Err(e) => {
                warn!("starting without stored annotations: {e:#}");
                (Vec::new(), Some(format!("Could not load annotations: {e}")))
            }
        };

        Self {
            image_path,
            raw_image,
            texture: None,
            workspace: Workspace::new(Canvas::new(canvas_size), saved),
            store,
            label_input: String::new(),
            status,
            last_pointer: None,
            panning: false,
        }
    }

    fn ensure_texture(&mut self, ctx: &egui::Context) {
        if self.texture.is_some() {
            return;
        }
        if let Some(ref img) = self.raw_image {
            let rgba = img.to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let pixels = rgba.as_flat_samples();
            let color_image =
                egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
            self.texture = Some(ctx.load_texture(
                "background",
                color_image,
                egui::TextureOptions::LINEAR,
            ));
        }
    }

    fn start_polygon(&mut self) {
        self.status = match self.workspace.start(&self.label_input) {
            Ok(()) => Some(format!(
                "Drawing '{}': click near the first point to close",
                self.label_input.trim()
            )),
            Err(e) => Some(e.to_string()),
        };
    }

    fn close_polygon(&mut self) {
        self.status = Some(match self.workspace.close() {
            Ok(ann) => format!("Added '{}'", ann.label()),
            Err(e) => e.to_string(),
        });
    }

    fn cancel_polygon(&mut self) {
        if self.workspace.cancel() {
            self.status = Some("Polygon cancelled".to_owned());
        }
    }

    fn save(&mut self) {
        self.status = Some(match self.workspace.save(&self.store) {
            Ok(true) => "Annotations saved successfully!".to_owned(),
            Ok(false) => "Nothing to save".to_owned(),
            Err(e) => {
                error!("save failed: {e:#}");
                format!("Failed to save annotations: {e}")
            }
        });
    }

    fn reset(&mut self) {
        self.workspace.reset();
        self.status = Some("Unsaved annotations discarded".to_owned());
    }

    fn draw_background(&self, painter: &egui::Painter, rect: egui::Rect) {
        let canvas = self.workspace.canvas();
        let viewport = &canvas.viewport;
        painter.rect_filled(
            viewport.surface_rect_on_screen(rect),
            0.0,
            egui::Color32::from_gray(60),
        );
        let (Some(tex), Some(img)) = (&self.texture, &self.raw_image) else {
            return;
        };
        let img_size = egui::vec2(img.width() as f32, img.height() as f32);
        let scaled = img_size * fit_scale(img_size, canvas.size());
        let img_rect = egui::Rect::from_min_max(
            viewport.surface_to_screen(rect, Point::new(0.0, 0.0)),
            viewport.surface_to_screen(rect, Point::new(scaled.x, scaled.y)),
        );
        painter.image(
            tex.id(),
            img_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
    }

    fn draw_shapes(&self, painter: &egui::Painter, rect: egui::Rect) {
        let viewport = &self.workspace.canvas().viewport;
        for shape in self.workspace.canvas().shapes() {
            paint_shape(painter, viewport, rect, shape);
        }
    }

    fn handle_canvas_input(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let rect = response.rect;

        // Pan (middle mouse button)
        if ctx.input(|i| i.pointer.middle_down()) {
            let delta = ctx.input(|i| i.pointer.delta());
            self.workspace.canvas_mut().viewport.pan += delta;
            self.panning = true;
        } else {
            self.panning = false;
        }

        // Zoom (scroll wheel)
        let scroll_delta = ctx.input(|i| i.smooth_scroll_delta.y);
        if scroll_delta != 0.0 && response.hovered() {
            self.workspace
                .canvas_mut()
                .viewport
                .zoom_at(rect, response.hover_pos(), scroll_delta);
        }

        if self.panning || !response.hovered() {
            return;
        }

        if let Some(pos) = response.hover_pos() {
            if self.last_pointer != Some(pos) {
                self.last_pointer = Some(pos);
                self.workspace.pointer_move(pos);
            }
        }

        if ctx.input(|i| i.pointer.primary_pressed()) {
            if let Some(pos) = ctx.input(|i| i.pointer.interact_pos()) {
                match self.workspace.pointer_down(pos) {
                    Ok(Some(ann)) => {
                        self.status = Some(format!("Added '{}'", ann.label()));
                    }
                    Ok(None) => {}
                    Err(e) => self.status = Some(e.to_string()),
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DrawerShortcut {
    Cancel,
    Close,
}

/// Escape and Enter drive the drawer only while no text field has focus;
/// otherwise they belong to the label input.
fn drawer_shortcut(escape: bool, enter: bool, typing: bool, drawing: bool) -> Option<DrawerShortcut> {
    if typing {
        None
    } else if escape {
        Some(DrawerShortcut::Cancel)
    } else if enter && drawing {
        Some(DrawerShortcut::Close)
    } else {
        None
    }
}

fn paint_shape(painter: &egui::Painter, viewport: &Viewport, rect: egui::Rect, shape: &Shape) {
    let zoom = viewport.zoom;
    match shape {
        Shape::Marker {
            center,
            radius,
            color,
        } => {
            painter.circle_filled(
                viewport.surface_to_screen(rect, *center),
                radius * zoom,
                color.to_egui(),
            );
        }
        Shape::Line { from, to, stroke } => {
            let a = viewport.surface_to_screen(rect, *from);
            let b = viewport.surface_to_screen(rect, *to);
            let s = egui::Stroke::new(stroke.width * zoom, stroke.color.to_egui());
            match stroke.dash {
                Some((dash, gap)) => {
                    painter.extend(egui::Shape::dashed_line(&[a, b], s, dash * zoom, gap * zoom));
                }
                None => {
                    painter.line_segment([a, b], s);
                }
            }
        }
        Shape::Polygon {
            points,
            fill,
            stroke,
        } => {
            let pts: Vec<egui::Pos2> = points
                .iter()
                .map(|p| viewport.surface_to_screen(rect, *p))
                .collect();
            let mut mesh = egui::Mesh::default();
            for p in &pts {
                mesh.colored_vertex(*p, fill.to_egui());
            }
            for [a, b, c] in triangulate(points) {
                mesh.add_triangle(a as u32, b as u32, c as u32);
            }
            painter.add(egui::Shape::mesh(mesh));
            painter.add(egui::Shape::closed_line(
                pts,
                egui::Stroke::new(stroke.width * zoom, stroke.color.to_egui()),
            ));
        }
        Shape::Label {
            anchor,
            text,
            size,
            color,
        } => {
            painter.text(
                viewport.surface_to_screen(rect, *anchor),
                egui::Align2::LEFT_TOP,
                text,
                egui::FontId::proportional(size * zoom),
                color.to_egui(),
            );
        }
    }
}

// ── eframe App impl ────────────────────────────────────────────────────────

impl eframe::App for AnnotateApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_texture(ctx);

        // Keyboard shortcuts
        let (escape, enter, save) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::Enter),
                i.modifiers.ctrl && i.key_pressed(egui::Key::S),
            )
        });
        let typing = ctx.memory(|m| m.focused().is_some());
        match drawer_shortcut(escape, enter, typing, self.workspace.drawer().is_drawing()) {
            Some(DrawerShortcut::Cancel) => self.cancel_polygon(),
            Some(DrawerShortcut::Close) => self.close_polygon(),
            None => {}
        }
        if save {
            self.save();
        }

        // Top toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Label:");
                let field = ui.text_edit_singleline(&mut self.label_input);
                let submitted =
                    field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Start Polygon").clicked() || submitted {
                    self.start_polygon();
                }
                let drawing = self.workspace.drawer().is_drawing();
                if ui.add_enabled(drawing, egui::Button::new("Close")).clicked() {
                    self.close_polygon();
                }
                if ui.add_enabled(drawing, egui::Button::new("Cancel")).clicked() {
                    self.cancel_polygon();
                }
                ui.separator();
                if ui
                    .add_enabled(
                        self.workspace.has_pending(),
                        egui::Button::new("Save Annotations"),
                    )
                    .clicked()
                {
                    self.save();
                }
                if ui.button("Reset").clicked() {
                    self.reset();
                }
                ui.separator();
                ui.label(format!(
                    "Zoom: {:.0}%",
                    self.workspace.canvas().viewport.zoom * 100.0
                ));
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.image_path.display().to_string());
                ui.separator();
                ui.label(format!(
                    "{} saved, {} unsaved",
                    self.workspace.saved().len(),
                    self.workspace.pending().len()
                ));
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(status);
                }
            });
        });

        // Canvas
        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            self.workspace.canvas_mut().set_screen_rect(rect);

            painter.rect_filled(rect, 0.0, egui::Color32::from_gray(40));
            self.draw_background(&painter, rect);

            self.handle_canvas_input(ctx, &response);
            self.draw_shapes(&painter, rect);

            if response.hovered() && self.workspace.canvas().cursor() == CursorStyle::Crosshair {
                ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
            }
        });

        if self.workspace.canvas_mut().take_render_request() {
            ctx.request_repaint();
        }
    }
}
