use log::warn;
use serde::{Deserialize, Serialize};

/// A position in surface-pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Arithmetic mean of the vertices, or `None` for an empty slice.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f32;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}

/// Split a simple polygon (concave or not) into triangles, as index triples
/// into `points`.
pub fn triangulate(points: &[Point]) -> Vec<[usize; 3]> {
    if points.len() < 3 {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity(points.len() * 2);
    for p in points {
        vertices.push(p.x as f64);
        vertices.push(p.y as f64);
    }
    match earcutr::earcut(&vertices, &[], 2) {
        Ok(indices) => indices
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
            .collect(),
        Err(e) => {
            warn!("couldn't triangulate a {}-point polygon: {e:?}", points.len());
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(poly: &[Point], p: Point) -> bool {
        let mut inside = false;
        let mut j = poly.len() - 1;
        for i in 0..poly.len() {
            let (a, b) = (poly[i], poly[j]);
            if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    fn triangle_area(a: Point, b: Point, c: Point) -> f32 {
        ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs() / 2.0
    }

    #[test]
    fn triangulates_concave_l_shape() {
        // starts on the inner corner's arm, so a naive fan from the first
        // vertex would spill outside
        let l_shape: Vec<Point> = [
            (100.0, 20.0),
            (20.0, 20.0),
            (20.0, 100.0),
            (0.0, 100.0),
            (0.0, 0.0),
            (100.0, 0.0),
        ]
        .into_iter()
        .map(Point::from)
        .collect();

        let tris = triangulate(&l_shape);
        assert_eq!(tris.len(), l_shape.len() - 2);
        let mut area = 0.0;
        for [a, b, c] in tris {
            let (a, b, c) = (l_shape[a], l_shape[b], l_shape[c]);
            let mid = centroid(&[a, b, c]).unwrap();
            assert!(contains(&l_shape, mid), "triangle centroid {mid:?} outside");
            area += triangle_area(a, b, c);
        }
        assert!((area - 3600.0).abs() < 1e-2);
    }

    #[test]
    fn too_few_points_give_no_triangles() {
        assert!(triangulate(&[Point::new(0.0, 0.0), Point::new(1.0, 0.0)]).is_empty());
    }

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(Point::new(0.0, 0.0).distance_to(Point::new(3.0, 4.0)), 5.0);
        assert_eq!(Point::new(2.0, 2.0).distance_to(Point::new(2.0, 2.0)), 0.0);
    }

    #[test]
    fn centroid_of_square() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert_eq!(centroid(&square), Some(Point::new(5.0, 5.0)));
    }

    #[test]
    fn centroid_matches_coordinate_means() {
        let pts = [
            Point::new(1.0, 7.0),
            Point::new(4.0, -2.0),
            Point::new(10.0, 3.0),
        ];
        let c = centroid(&pts).unwrap();
        assert_eq!(c.x, (1.0 + 4.0 + 10.0) / 3.0);
        assert_eq!(c.y, (7.0 - 2.0 + 3.0) / 3.0);
    }

    #[test]
    fn centroid_of_nothing() {
        assert_eq!(centroid(&[]), None);
    }
}
