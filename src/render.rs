use crate::annotation::Annotation;
use crate::surface::{
    Shape, ShapeId, Surface, LABEL_COLOR, LABEL_FONT_SIZE, POLYGON_FILL, POLYGON_STROKE,
};

/// Shapes a finished annotation occupies on a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderedAnnotation {
    pub polygon: ShapeId,
    pub label: ShapeId,
}

/// Draw a finished annotation: the closed polygon plus its label anchored at
/// the centroid.
pub fn render_annotation<S: Surface + ?Sized>(
    surface: &mut S,
    annotation: &Annotation,
) -> RenderedAnnotation {
    let polygon = surface.add_shape(Shape::Polygon {
        points: annotation.points().to_vec(),
        fill: POLYGON_FILL,
        stroke: POLYGON_STROKE,
    });
    let label = surface.add_shape(Shape::Label {
        anchor: annotation.centroid(),
        text: annotation.label().to_owned(),
        size: LABEL_FONT_SIZE,
        color: LABEL_COLOR,
    });
    RenderedAnnotation { polygon, label }
}
