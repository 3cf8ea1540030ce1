use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::Parser;
use eframe::egui;
use log::info;

use polygon_annotate::app::AnnotateApp;
use polygon_annotate::config::Args;

fn pick_image() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Choose an image to annotate")
        .add_filter("Images", &["png", "jpg", "jpeg", "webp", "gif", "bmp"])
        .pick_file()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let Some(image_path) = args.image.clone().or_else(pick_image) else {
        bail!("no image selected");
    };
    if !image_path.exists() {
        bail!("file not found: {}", image_path.display());
    }

    let store = args.store_for(&image_path);
    info!(
        "annotating {} (annotations in {})",
        image_path.display(),
        store.path().display()
    );

    let title = format!(
        "polygon-annotate — {}",
        image_path
            .file_name()
            .unwrap_or_default()
            .to_str()
            .unwrap_or("")
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title(&title),
        ..Default::default()
    };

    let canvas_size = args.canvas_size();
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(AnnotateApp::new(image_path, store, canvas_size)))),
    )
    .map_err(|e| anyhow!("failed to run eframe: {e}"))
}
