//! Half-plane clipping - the inner loop of cell construction.
//!
//! Every cell is the canvas rectangle clipped against `count - 1`
//! bisectors, so this runs O(count²) times per render. Keep it allocation
//! light and branch simple.

use crate::geometry::{Point, Polygon};

/// Edges whose direction is this close to parallel with the clip line are
/// treated as non-intersecting. The crossing point is skipped, not
/// approximated.
pub const PARALLEL_EPSILON: f64 = 1e-6;

/// The closed half-plane `a*x + b*y + c >= 0`.
///
/// ## Rust Lesson #8: Small Copy types
///
/// Three `f64`s fit in a couple of registers. Deriving `Copy` lets us pass
/// a `HalfPlane` by value everywhere without thinking about borrows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfPlane {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl HalfPlane {
    #[inline]
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// Signed evaluation of the line equation at `p`.
    #[inline]
    pub fn eval(&self, p: Point) -> f64 {
        self.a * p.x + self.b * p.y + self.c
    }

    /// Inside means non-negative. Points exactly on the line are kept.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.eval(p) >= 0.0
    }

    /// Perpendicular bisector of `owner` and `other`, oriented so that
    /// `owner` lies on the non-negative (kept) side.
    ///
    /// The line normal points from `owner` toward `other` before the sign
    /// check, so for distinct sites the flip always fires; it is kept
    /// general so callers never depend on that detail. Coincident sites
    /// produce the all-zero plane, which keeps everything.
    #[inline]
    pub fn bisector(owner: Point, other: Point) -> Self {
        let a = other.x - owner.x;
        let b = other.y - owner.y;
        let mid = owner.midpoint(other);
        let c = -(a * mid.x + b * mid.y);

        let plane = Self::new(a, b, c);
        if plane.eval(owner) < 0.0 {
            Self::new(-a, -b, -c)
        } else {
            plane
        }
    }
}

/// Intersection of segment `p1 -> p2` with the line of `plane`.
///
/// Returns `None` when the segment is (nearly) parallel to the line, i.e.
/// `|a*dx + b*dy| < PARALLEL_EPSILON`.
#[inline]
pub fn edge_intersection(p1: Point, p2: Point, plane: HalfPlane) -> Option<Point> {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let den = plane.a * dx + plane.b * dy;
    if den.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = -(plane.a * p1.x + plane.b * p1.y + plane.c) / den;
    Some(Point::new(p1.x + t * dx, p1.y + t * dy))
}

/// Clip a polygon to a half-plane (one Sutherland-Hodgman pass).
///
/// Walks each edge `p1 -> p2`:
/// - both inside: keep `p2`
/// - leaving: keep the crossing
/// - entering: keep the crossing, then `p2`
/// - both outside: nothing
///
/// Output order follows input order, so winding is preserved. The result
/// may be empty when the whole polygon is outside.
pub fn clip_polygon(polygon: &[Point], plane: HalfPlane) -> Vec<Point> {
    let n = polygon.len();
    let mut out = Vec::with_capacity(n + 1);

    for i in 0..n {
        let p1 = polygon[i];
        let p2 = polygon[(i + 1) % n];

        let in1 = plane.contains(p1);
        let in2 = plane.contains(p2);

        match (in1, in2) {
            (true, true) => out.push(p2),
            (true, false) => {
                if let Some(hit) = edge_intersection(p1, p2, plane) {
                    out.push(hit);
                }
            }
            (false, true) => {
                if let Some(hit) = edge_intersection(p1, p2, plane) {
                    out.push(hit);
                }
                out.push(p2);
            }
            (false, false) => {}
        }
    }

    out
}

impl Polygon {
    /// Clip this polygon to a half-plane. See [`clip_polygon`].
    pub fn clip(&self, plane: HalfPlane) -> Polygon {
        Polygon::new(clip_polygon(&self.vertices, plane))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CANVAS_SIZE;

    #[test]
    fn bisector_keeps_owner_side() {
        let owner = Point::new(100.0, 300.0);
        let other = Point::new(400.0, 120.0);
        let plane = HalfPlane::bisector(owner, other);
        assert!(plane.eval(owner) > 0.0);
        assert!(plane.eval(other) < 0.0);
        // Midpoint sits on the line
        assert!(plane.eval(owner.midpoint(other)).abs() < 1e-9);
    }

    #[test]
    fn bisector_is_antisymmetric() {
        let p = Point::new(10.0, 20.0);
        let q = Point::new(50.0, 80.0);
        let pq = HalfPlane::bisector(p, q);
        let qp = HalfPlane::bisector(q, p);
        let probe = Point::new(33.0, 41.0);
        assert!((pq.eval(probe) + qp.eval(probe)).abs() < 1e-9);
    }

    #[test]
    fn coincident_sites_keep_everything() {
        let p = Point::new(5.0, 5.0);
        let plane = HalfPlane::bisector(p, p);
        let clipped = Polygon::canvas().clip(plane);
        assert_eq!(clipped, Polygon::canvas());
    }

    #[test]
    fn axis_aligned_bisector_splits_canvas_in_two_rectangles() {
        let half = CANVAS_SIZE / 2.0;
        let left_site = Point::new(130.0, 260.0);
        let right_site = Point::new(390.0, 260.0);

        let left = Polygon::canvas().clip(HalfPlane::bisector(left_site, right_site));
        let right = Polygon::canvas().clip(HalfPlane::bisector(right_site, left_site));

        assert_eq!(left.len(), 4);
        assert_eq!(right.len(), 4);
        assert_eq!(left.bounding_box(), Some((0.0, 0.0, half, CANVAS_SIZE)));
        assert_eq!(right.bounding_box(), Some((half, 0.0, CANVAS_SIZE, CANVAS_SIZE)));
    }

    #[test]
    fn clipping_preserves_winding() {
        let canvas = Polygon::canvas();
        let plane = HalfPlane::bisector(Point::new(50.0, 60.0), Point::new(300.0, 400.0));
        let clipped = canvas.clip(plane);
        assert!(clipped.len() >= 3);
        assert_eq!(clipped.is_clockwise(), canvas.is_clockwise());
    }

    #[test]
    fn fully_outside_yields_empty() {
        // Keep x <= -1: nothing of the canvas survives
        let plane = HalfPlane::new(-1.0, 0.0, -1.0);
        assert!(Polygon::canvas().clip(plane).is_empty());
    }

    #[test]
    fn fully_inside_is_unchanged() {
        let plane = HalfPlane::new(1.0, 0.0, 10.0);
        assert_eq!(Polygon::canvas().clip(plane), Polygon::canvas());
    }

    #[test]
    fn parallel_edge_has_no_intersection() {
        let plane = HalfPlane::new(0.0, 1.0, -5.0);
        let hit = edge_intersection(Point::new(0.0, 1.0), Point::new(10.0, 1.0), plane);
        assert_eq!(hit, None);
    }

    #[test]
    fn near_parallel_crossing_is_skipped() {
        // A sub-epsilon edge that straddles x = 5e-8: the crossing point is
        // dropped rather than computed.
        let plane = HalfPlane::new(1.0, 0.0, -5e-8);
        let tri = vec![
            Point::new(0.0, 0.0),
            Point::new(1e-7, 0.0),
            Point::new(1e-7, 10.0),
        ];
        let clipped = clip_polygon(&tri, plane);
        // Both crossing edges have |a*dx| = 1e-7, so neither gets a
        // crossing point: only the two inside vertices survive.
        assert_eq!(clipped, vec![Point::new(1e-7, 0.0), Point::new(1e-7, 10.0)]);
    }

    #[test]
    fn crossing_points_lie_on_line() {
        let plane = HalfPlane::new(1.0, 1.0, -400.0);
        let clipped = Polygon::canvas().clip(plane);
        let on_line = clipped
            .vertices
            .iter()
            .filter(|p| plane.eval(**p).abs() < 1e-9)
            .count();
        assert_eq!(on_line, 2);
    }
}
