//! Core geometry types for the leopard engine.
//!
//! ## Rust Lesson #3: Structs & Derives
//!
//! `#[derive(...)]` generates the boring parts for us:
//! - `Debug` = printable with `{:?}`
//! - `Clone`/`Copy` = cheap duplication for small stack values
//! - `PartialEq` = comparable with `==`
//! - `Serialize`/`Deserialize` = serde can turn it into JSON and back

use serde::{Deserialize, Serialize};

/// Width and height of the drawing canvas, in scene units.
///
/// Every consumer (preview, thumbnails, PNG export, tiling) assumes this
/// exact size, so it is a constant rather than a render option.
pub const CANVAS_SIZE: f64 = 520.0;

/// A 2D point with x,y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A closed polygon. The last vertex connects back to the first implicitly.
///
/// Cells are always convex (they come out of half-plane clipping), but
/// nothing here depends on that.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub vertices: Vec<Point>,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Midpoint between two points.
    #[inline]
    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    /// Axis-aligned rectangle, wound (x0,y0) -> (x1,y0) -> (x1,y1) -> (x0,y1).
    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ])
    }

    /// The full canvas rectangle every cell starts from.
    pub fn canvas() -> Self {
        Self::rect(0.0, 0.0, CANVAS_SIZE, CANVAS_SIZE)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Get the bounding box as (min_x, min_y, max_x, max_y).
    pub fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        bounding_box_of_points(&self.vertices)
    }

    /// Arithmetic mean of the vertices. See [`centroid`].
    #[inline]
    pub fn centroid(&self) -> Option<Point> {
        centroid(&self.vertices)
    }

    /// Pull every vertex toward the centroid. See [`inset`].
    pub fn inset(&self, ratio: f64) -> Polygon {
        Polygon::new(inset(&self.vertices, ratio))
    }

    /// Signed area via the shoelace formula (positive = counter-clockwise
    /// in a y-up frame).
    #[inline]
    pub fn signed_area(&self) -> f64 {
        signed_area_of_points(&self.vertices)
    }

    /// Check if the polygon has clockwise winding.
    #[inline]
    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }
}

/// Mean of the vertices, or `None` for an empty slice.
///
/// This is deliberately the vertex average, not the area-weighted centroid:
/// it is only used as the anchor of the radial inset.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    let n = points.len() as f64;
    Some(Point::new(sx / n, sy / n))
}

/// Move every vertex toward the vertex centroid by `ratio` of its offset.
///
/// `ratio` is not clamped: values above 1 flip the polygon through its
/// centroid and negative values expand it. An empty input stays empty.
pub fn inset(points: &[Point], ratio: f64) -> Vec<Point> {
    let Some(c) = centroid(points) else {
        return Vec::new();
    };
    points
        .iter()
        .map(|p| Point::new(p.x - (p.x - c.x) * ratio, p.y - (p.y - c.y) * ratio))
        .collect()
}

/// Bounding box of a point sequence as (min_x, min_y, max_x, max_y).
pub fn bounding_box_of_points(points: &[Point]) -> Option<(f64, f64, f64, f64)> {
    if points.is_empty() {
        return None;
    }
    let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    Some((min_x, min_y, max_x, max_y))
}

/// Calculate signed area of a point sequence using the shoelace formula.
pub fn signed_area_of_points(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }
    area / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::rect(0.0, 0.0, 10.0, 10.0)
    }

    #[test]
    fn point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert_eq!(p1.distance(p2), 5.0);
    }

    #[test]
    fn canvas_is_full_rect() {
        let canvas = Polygon::canvas();
        assert_eq!(canvas.len(), 4);
        assert_eq!(canvas.bounding_box(), Some((0.0, 0.0, CANVAS_SIZE, CANVAS_SIZE)));
    }

    #[test]
    fn centroid_is_vertex_mean() {
        // Three vertices bunched at the left; the area centroid would sit
        // further right than the vertex mean.
        let poly = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(9.0, 0.5),
        ]);
        let c = poly.centroid().unwrap();
        assert!((c.x - 2.5).abs() < 1e-12);
        assert!((c.y - 0.375).abs() < 1e-12);
    }

    #[test]
    fn centroid_of_empty_is_none() {
        assert_eq!(centroid(&[]), None);
    }

    #[test]
    fn inset_zero_is_identity() {
        let poly = square();
        assert_eq!(poly.inset(0.0), poly);
    }

    #[test]
    fn inset_one_collapses_to_centroid() {
        let collapsed = square().inset(1.0);
        for p in &collapsed.vertices {
            assert_eq!(*p, Point::new(5.0, 5.0));
        }
    }

    #[test]
    fn inset_half_shrinks_square() {
        let shrunk = square().inset(0.5);
        assert_eq!(shrunk.bounding_box(), Some((2.5, 2.5, 7.5, 7.5)));
    }

    #[test]
    fn negative_inset_expands() {
        let grown = square().inset(-0.1);
        assert_eq!(grown.bounding_box(), Some((-0.5, -0.5, 10.5, 10.5)));
    }

    #[test]
    fn inset_of_empty_stays_empty() {
        assert!(inset(&[], 0.3).is_empty());
    }

    #[test]
    fn signed_area_and_winding() {
        let ccw = square();
        assert!((ccw.signed_area() - 100.0).abs() < 1e-10);
        assert!(!ccw.is_clockwise());

        let mut cw = square();
        cw.vertices.reverse();
        assert!(cw.is_clockwise());
    }
}
