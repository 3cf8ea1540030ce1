use std::path::PathBuf;

use clap::Parser;
use eframe::egui;

use crate::canvas::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use crate::store::AnnotationStore;

/// Draw labeled polygons over an image.
#[derive(Debug, Parser)]
#[command(name = "polygon-annotate", version)]
pub struct Args {
    /// Image to annotate. A file picker opens when omitted.
    pub image: Option<PathBuf>,

    /// Where annotations are read from and saved to
    /// [default: <IMAGE>.annotations.json next to the image]
    #[arg(long)]
    pub annotations: Option<PathBuf>,

    /// Drawing surface width in pixels
    #[arg(long, default_value_t = DEFAULT_CANVAS_WIDTH)]
    pub width: f32,

    /// Drawing surface height in pixels
    #[arg(long, default_value_t = DEFAULT_CANVAS_HEIGHT)]
    pub height: f32,
}

impl Args {
    pub fn canvas_size(&self) -> egui::Vec2 {
        egui::vec2(self.width.max(1.0), self.height.max(1.0))
    }

    pub fn store_for(&self, image_path: &std::path::Path) -> AnnotationStore {
        match &self.annotations {
            Some(path) => AnnotationStore::new(path.clone()),
            None => AnnotationStore::for_image(image_path),
        }
    }
}
