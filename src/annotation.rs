use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{centroid, Point};

/// Minimum number of vertices of a closed polygon.
pub const MIN_POLYGON_POINTS: usize = 3;

#[derive(Debug, Error, PartialEq)]
pub enum AnnotationError {
    #[error("annotation label is empty")]
    EmptyLabel,
    #[error("a polygon needs at least 3 points, got {0}")]
    TooFewPoints(usize),
}

/// A labeled closed polygon. The last point connects back to the first.
///
/// Fields are private so a value can only be built through [`Annotation::new`]
/// (or deserialized and then checked with [`Annotation::validate`]); nothing
/// mutates an annotation after it is emitted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Assigned by whatever external store the annotation came from; carried
    /// through load and save untouched, never set here.
    id: Option<String>,
    label: String,
    points: Vec<Point>,
}

impl Annotation {
    pub fn new(label: impl Into<String>, points: Vec<Point>) -> Result<Self, AnnotationError> {
        let ann = Self {
            id: None,
            label: label.into(),
            points,
        };
        ann.validate()?;
        Ok(ann)
    }

    pub fn validate(&self) -> Result<(), AnnotationError> {
        if self.label.trim().is_empty() {
            return Err(AnnotationError::EmptyLabel);
        }
        if self.points.len() < MIN_POLYGON_POINTS {
            return Err(AnnotationError::TooFewPoints(self.points.len()));
        }
        Ok(())
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn centroid(&self) -> Point {
        // validate() guarantees at least three points
        centroid(&self.points).unwrap_or_default()
    }
}

/// Payload handed to an external save operation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationBatch {
    pub annotations: Vec<Annotation>,
}

impl AnnotationBatch {
    pub fn new(annotations: Vec<Annotation>) -> Self {
        Self { annotations }
    }

    pub fn validate(&self) -> Result<(), AnnotationError> {
        self.annotations.iter().try_for_each(Annotation::validate)
    }
}
