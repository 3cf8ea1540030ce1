use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use crate::annotation::AnnotationBatch;

/// Annotations live in a JSON file next to the image they describe.
pub fn sidecar_path(image_path: &Path) -> PathBuf {
    match image_path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if !ext.is_empty() => {
            image_path.with_extension(format!("{ext}.annotations.json"))
        }
        _ => image_path.with_extension("annotations.json"),
    }
}

/// The save operation finished annotations are handed to.
#[derive(Clone, Debug)]
pub struct AnnotationStore {
    path: PathBuf,
}

impl AnnotationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn for_image(image_path: &Path) -> Self {
        Self::new(sidecar_path(image_path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty batch; a broken one is an error.
    pub fn load(&self) -> Result<AnnotationBatch> {
        if !self.path.exists() {
            return Ok(AnnotationBatch::default());
        }
        let data = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let batch: AnnotationBatch = serde_json::from_str(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        batch
            .validate()
            .with_context(|| format!("invalid annotation in {}", self.path.display()))?;
        info!(
            "loaded {} annotations from {}",
            batch.annotations.len(),
            self.path.display()
        );
        Ok(batch)
    }

    pub fn save(&self, batch: &AnnotationBatch) -> Result<()> {
        let data = serde_json::to_string_pretty(batch)?;
        std::fs::write(&self.path, data)
            .with_context(|| format!("writing {}", self.path.display()))?;
        info!(
            "saved {} annotations to {}",
            batch.annotations.len(),
            self.path.display()
        );
        Ok(())
    }
}
