//! Draw labeled polygon regions over an image.

pub mod annotation;
pub mod app;
pub mod canvas;
pub mod config;
pub mod drawer;
pub mod geometry;
pub mod render;
pub mod store;
pub mod surface;
pub mod view;
pub mod workspace;

pub use annotation::{Annotation, AnnotationBatch, AnnotationError};
pub use canvas::Canvas;
pub use drawer::{DrawError, PointerOutcome, PolygonDrawer, CLOSE_THRESHOLD};
pub use geometry::Point;
pub use surface::Surface;
