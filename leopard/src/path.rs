//! Structured vector paths and rounded-corner construction.
//!
//! Geometry code builds [`Path`] values out of [`PathCommand`]s; turning
//! them into SVG `d=""` strings happens only at the boundary
//! ([`Path::to_svg_data`]). Archived scenes can be read back with
//! [`Path::parse`].

use std::fmt::Write as _;

use lyon_geom::{point, QuadraticBezierSegment};
use thiserror::Error;

use crate::geometry::{bounding_box_of_points, Point};

/// Tolerance for curve flattening when measuring bounds.
const CURVE_TOLERANCE: f64 = 0.1;

/// One drawing command with absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Quadratic Bézier from the current point through `ctrl` to `to`.
    QuadTo { ctrl: Point, to: Point },
    Close,
}

/// A sequence of commands, possibly holding several closed subpaths.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    commands: Vec<PathCommand>,
}

/// Error reading SVG path data back into a [`Path`].
#[derive(Debug, Error)]
pub enum PathError {
    #[error("invalid path data: {0}")]
    Syntax(String),

    #[error("unsupported path command: {0}")]
    Unsupported(&'static str),
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[inline]
    pub fn push(&mut self, command: PathCommand) {
        self.commands.push(command);
    }

    /// Append all subpaths of `other` after ours.
    pub fn append(&mut self, other: Path) {
        self.commands.extend(other.commands);
    }

    /// Number of subpaths (one per `MoveTo`).
    pub fn subpath_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::MoveTo(_)))
            .count()
    }

    /// True when the path is non-empty, every subpath starts with a
    /// `MoveTo` and ends with a `Close`.
    pub fn is_closed(&self) -> bool {
        if self.commands.is_empty() {
            return false;
        }
        let mut open = false;
        for command in &self.commands {
            match command {
                PathCommand::MoveTo(_) => {
                    if open {
                        return false;
                    }
                    open = true;
                }
                PathCommand::LineTo(_) | PathCommand::QuadTo { .. } => {
                    if !open {
                        return false;
                    }
                }
                PathCommand::Close => {
                    if !open {
                        return false;
                    }
                    open = false;
                }
            }
        }
        !open
    }

    /// Serialize as SVG path data, e.g. `M1.00,2.00 Q3.00,4.00 5.00,6.00 Z`.
    pub fn to_svg_data(&self) -> String {
        let mut d = String::with_capacity(self.commands.len() * 24);
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                d.push(' ');
            }
            // Writing to a String never fails
            let _ = match command {
                PathCommand::MoveTo(p) => write!(d, "M{:.2},{:.2}", p.x, p.y),
                PathCommand::LineTo(p) => write!(d, "L{:.2},{:.2}", p.x, p.y),
                PathCommand::QuadTo { ctrl, to } => write!(
                    d,
                    "Q{:.2},{:.2} {:.2},{:.2}",
                    ctrl.x, ctrl.y, to.x, to.y
                ),
                PathCommand::Close => write!(d, "Z"),
            };
        }
        d
    }

    /// Parse SVG path data. Relative and shorthand commands are resolved to
    /// absolute ones; cubic curves and arcs are rejected since scenes never
    /// contain them.
    pub fn parse(data: &str) -> Result<Path, PathError> {
        use svgtypes::SimplePathSegment as Seg;

        let mut path = Path::new();
        for segment in svgtypes::SimplifyingPathParser::from(data) {
            let segment = segment.map_err(|e| PathError::Syntax(e.to_string()))?;
            let command = match segment {
                Seg::MoveTo { x, y } => PathCommand::MoveTo(Point::new(x, y)),
                Seg::LineTo { x, y } => PathCommand::LineTo(Point::new(x, y)),
                Seg::Quadratic { x1, y1, x, y } => PathCommand::QuadTo {
                    ctrl: Point::new(x1, y1),
                    to: Point::new(x, y),
                },
                Seg::ClosePath => PathCommand::Close,
                Seg::CurveTo { .. } => return Err(PathError::Unsupported("cubic curve")),
            };
            path.push(command);
        }
        Ok(path)
    }

    /// Bounding box of the drawn outline (curves flattened), as
    /// (min_x, min_y, max_x, max_y).
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let mut points = Vec::with_capacity(self.commands.len() * 4);
        let mut current: Option<Point> = None;
        let mut start: Option<Point> = None;

        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) => {
                    points.push(p);
                    current = Some(p);
                    start = Some(p);
                }
                PathCommand::LineTo(p) => {
                    points.push(p);
                    current = Some(p);
                }
                PathCommand::QuadTo { ctrl, to } => {
                    if let Some(from) = current {
                        let curve = QuadraticBezierSegment {
                            from: point(from.x, from.y),
                            ctrl: point(ctrl.x, ctrl.y),
                            to: point(to.x, to.y),
                        };
                        curve.for_each_flattened(CURVE_TOLERANCE, &mut |segment| {
                            points.push(Point::new(segment.to.x, segment.to.y));
                        });
                    }
                    points.push(to);
                    current = Some(to);
                }
                PathCommand::Close => current = start,
            }
        }

        bounding_box_of_points(&points)
    }
}

/// Build a closed path through `points` with every corner replaced by a
/// quadratic fillet.
///
/// For each vertex the fillet starts `r1` before the vertex along the
/// incoming edge and ends `r2` after it along the outgoing edge, where each
/// of `r1`/`r2` is `radius` trimmed to half the adjacent edge. Neighbouring
/// fillets can therefore meet but never overlap. The vertex itself is the
/// control point.
///
/// An empty polygon produces an empty path.
pub fn rounded_path(points: &[Point], radius: f64) -> Path {
    let n = points.len();
    let mut path = Path::new();
    if n == 0 {
        return path;
    }

    for i in 0..n {
        let p0 = points[(i + n - 1) % n];
        let p1 = points[i];
        let p2 = points[(i + 1) % n];

        let (v1x, v1y) = (p1.x - p0.x, p1.y - p0.y);
        let (v2x, v2y) = (p2.x - p1.x, p2.y - p1.y);

        let l1 = nonzero_length(v1x, v1y);
        let l2 = nonzero_length(v2x, v2y);

        let r1 = radius.min(l1 / 2.0);
        let r2 = radius.min(l2 / 2.0);

        let entry = Point::new(p1.x - v1x / l1 * r1, p1.y - v1y / l1 * r1);
        let exit = Point::new(p1.x + v2x / l2 * r2, p1.y + v2y / l2 * r2);

        if i == 0 {
            path.push(PathCommand::MoveTo(entry));
        } else {
            path.push(PathCommand::LineTo(entry));
        }
        path.push(PathCommand::QuadTo { ctrl: p1, to: exit });
    }

    path.push(PathCommand::Close);
    path
}

/// Edge length, with zero-length edges counted as 1 so the unit vector
/// stays finite (it is the zero vector either way).
#[inline]
fn nonzero_length(dx: f64, dy: f64) -> f64 {
    let len = dx.hypot(dy);
    if len == 0.0 { 1.0 } else { len }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ]
    }

    #[test]
    fn empty_polygon_gives_empty_path() {
        let path = rounded_path(&[], 10.0);
        assert!(path.is_empty());
        assert_eq!(path.to_svg_data(), "");
    }

    #[test]
    fn square_path_structure() {
        let path = rounded_path(&square(100.0), 10.0);
        // Per vertex: MoveTo/LineTo + QuadTo, then one Close
        assert_eq!(path.commands().len(), 4 * 2 + 1);
        assert!(path.is_closed());
        assert_eq!(path.subpath_count(), 1);
        assert_eq!(path.commands()[0], PathCommand::MoveTo(Point::new(0.0, 10.0)));
        assert_eq!(
            path.commands()[1],
            PathCommand::QuadTo { ctrl: Point::new(0.0, 0.0), to: Point::new(10.0, 0.0) }
        );
    }

    #[test]
    fn radius_is_trimmed_to_half_edge() {
        // 10 wide square with radius 40: corners meet at edge midpoints
        let path = rounded_path(&square(10.0), 40.0);
        assert_eq!(path.commands()[0], PathCommand::MoveTo(Point::new(0.0, 5.0)));
        assert_eq!(
            path.commands()[1],
            PathCommand::QuadTo { ctrl: Point::new(0.0, 0.0), to: Point::new(5.0, 0.0) }
        );
    }

    #[test]
    fn zero_radius_degenerates_to_polygon() {
        let path = rounded_path(&square(10.0), 0.0);
        assert_eq!(path.commands()[0], PathCommand::MoveTo(Point::new(0.0, 0.0)));
        assert_eq!(path.bounds(), Some((0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn repeated_vertex_stays_finite() {
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 8.0),
        ];
        let path = rounded_path(&pts, 3.0);
        let d = path.to_svg_data();
        assert!(!d.contains("NaN"));
        assert!(!d.contains("inf"));
    }

    #[test]
    fn svg_data_format() {
        let mut path = Path::new();
        path.push(PathCommand::MoveTo(Point::new(1.0, 2.0)));
        path.push(PathCommand::LineTo(Point::new(3.5, 4.25)));
        path.push(PathCommand::QuadTo { ctrl: Point::new(5.0, 6.0), to: Point::new(7.0, 8.0) });
        path.push(PathCommand::Close);
        assert_eq!(
            path.to_svg_data(),
            "M1.00,2.00 L3.50,4.25 Q5.00,6.00 7.00,8.00 Z"
        );
    }

    #[test]
    fn parse_reads_back_serialized_path() {
        let mut outer = rounded_path(&square(100.0), 12.0);
        outer.append(rounded_path(&square(50.0), 5.0));

        let parsed = Path::parse(&outer.to_svg_data()).unwrap();
        assert_eq!(parsed.subpath_count(), 2);
        assert!(parsed.is_closed());
        assert_eq!(parsed.commands().len(), outer.commands().len());
    }

    #[test]
    fn parse_rejects_cubic() {
        let result = Path::parse("M0,0 C1,1 2,2 3,3 Z");
        assert!(matches!(result, Err(PathError::Unsupported(_))));
    }

    #[test]
    fn open_path_is_not_closed() {
        let mut path = Path::new();
        path.push(PathCommand::MoveTo(Point::new(0.0, 0.0)));
        path.push(PathCommand::LineTo(Point::new(1.0, 0.0)));
        assert!(!path.is_closed());
        assert!(!Path::new().is_closed());
    }

    #[test]
    fn bounds_stay_inside_polygon_hull() {
        let path = rounded_path(&square(100.0), 30.0);
        let (min_x, min_y, max_x, max_y) = path.bounds().unwrap();
        assert!(min_x >= -1e-9 && min_y >= -1e-9);
        assert!(max_x <= 100.0 + 1e-9 && max_y <= 100.0 + 1e-9);
    }
}
