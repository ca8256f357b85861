//! Leopard pattern renderer - Voronoi cells turned into rounded rings.
//!
//! Each render:
//! 1. maps sliders to [`EngineParams`]
//! 2. scatters `count` jittered sites over the canvas
//! 3. builds every site's cell by clipping the canvas against the
//!    bisectors with all other sites (O(count²), bounded by the caps)
//! 4. insets each cell into an outer/inner ring pair
//! 5. emits one rounded double-contour [`Shape`] per surviving cell
//!
//! Degenerate cells are dropped silently at every step. A scene with fewer
//! shapes than sites is normal.

use rand::Rng;
use tracing::{debug, trace};

use crate::clip::HalfPlane;
use crate::geometry::{Point, Polygon, CANVAS_SIZE};
use crate::params::{map_parameters, EngineParams, Quality, SliderState};
use crate::path::rounded_path;
use crate::scene::{Scene, Shape};

/// Inset ratio of the outer ring.
pub const OUTER_INSET: f64 = 0.22;

/// Upper bound of the inner ring inset ratio.
pub const MAX_INNER_INSET: f64 = 0.9;

/// `gap / GAP_INSET_DIVISOR` is the inset applied to each cell before the
/// rings, mapping gap [-10, 20] to [-0.05, 0.1].
pub const GAP_INSET_DIVISOR: f64 = 200.0;

/// Site jitter at quirk = 100, in pixels per axis.
pub const MAX_SITE_JITTER: f64 = 30.0;

/// Outer and inner contours use different fractions of the rounding radius.
const OUTER_ROUND_FACTOR: f64 = 0.5;
const INNER_ROUND_FACTOR: f64 = 0.35;

/// Outer and inner polygons of one spot.
#[derive(Debug, Clone, PartialEq)]
pub struct RingPair {
    pub outer: Polygon,
    pub inner: Polygon,
}

/// Inset ratio of the inner ring for a band width.
///
/// Always within [`OUTER_INSET`, `MAX_INNER_INSET`] for band >= 0, so the
/// ring is never inverted.
#[inline]
pub fn inner_inset_ratio(band: f64) -> f64 {
    (OUTER_INSET + band / 100.0).min(MAX_INNER_INSET)
}

/// Inset ratio applied to the whole cell before the rings.
#[inline]
pub fn gap_inset_ratio(gap: f64) -> f64 {
    gap / GAP_INSET_DIVISOR
}

/// Scatter `count` sites uniformly over the canvas, each nudged by up to
/// `quirk / 100 * 30` px per axis and clamped back inside.
///
/// Draw order per site: base x, base y, jitter x, jitter y.
pub fn generate_sites<R: Rng + ?Sized>(count: usize, quirk: f64, rng: &mut R) -> Vec<Point> {
    let jitter = quirk / 100.0 * MAX_SITE_JITTER;

    (0..count)
        .map(|_| {
            let base_x = rng.random::<f64>() * CANVAS_SIZE;
            let base_y = rng.random::<f64>() * CANVAS_SIZE;
            let jx = (rng.random::<f64>() - 0.5) * 2.0 * jitter;
            let jy = (rng.random::<f64>() - 0.5) * 2.0 * jitter;
            Point::new(
                (base_x + jx).clamp(0.0, CANVAS_SIZE),
                (base_y + jy).clamp(0.0, CANVAS_SIZE),
            )
        })
        .collect()
}

/// Cell of `sites[index]`: the canvas clipped by the bisector against every
/// other site. `None` once clipping empties it.
pub fn voronoi_cell(sites: &[Point], index: usize) -> Option<Polygon> {
    let owner = *sites.get(index)?;
    let mut cell = Polygon::canvas();

    for (j, &other) in sites.iter().enumerate() {
        if j == index {
            continue;
        }
        cell = cell.clip(HalfPlane::bisector(owner, other));
        if cell.is_empty() {
            return None;
        }
    }

    Some(cell)
}

/// Apply the gap inset, then derive the outer and inner rings.
///
/// `None` when either ring has fewer than three vertices.
pub fn ring_pair(cell: &Polygon, params: &EngineParams) -> Option<RingPair> {
    let cell = cell.inset(gap_inset_ratio(params.gap));

    let outer = cell.inset(OUTER_INSET);
    let inner = cell.inset(inner_inset_ratio(params.band));

    if outer.len() < 3 || inner.len() < 3 {
        return None;
    }
    Some(RingPair { outer, inner })
}

/// Gray level and opacity of one shape for a display value in [0, 100].
///
/// Darkness is `0.25 + display*0.6` with a ±0.075 random wobble, clamped to
/// [0.2, 1]. Consumes one random draw.
pub fn shape_fill<R: Rng + ?Sized>(display: f64, rng: &mut R) -> (u8, f64) {
    let display_norm = display / 100.0;
    let wobble = (rng.random::<f64>() - 0.5) * 0.15;
    let darkness = (0.25 + display_norm * 0.6 + wobble).clamp(0.2, 1.0);
    let gray = (255.0 * (1.0 - darkness)).round() as u8;
    let opacity = 0.25 + display_norm * 0.6;
    (gray, opacity)
}

/// Turn a ring pair into a drawable shape.
pub fn ring_shape<R: Rng + ?Sized>(rings: &RingPair, params: &EngineParams, display: f64, rng: &mut R) -> Shape {
    let mut path = rounded_path(&rings.outer.vertices, params.round * OUTER_ROUND_FACTOR);
    path.append(rounded_path(&rings.inner.vertices, params.round * INNER_ROUND_FACTOR));

    let (gray, opacity) = shape_fill(display, rng);
    Shape { path, gray, opacity }
}

/// Render with the thread-local system random source.
pub fn render(sliders: &SliderState, quality: Quality) -> Scene {
    render_with(sliders, quality, &mut rand::rng())
}

/// Render with an explicit random source.
///
/// Same inputs and the same seeded source give the same scene; with a
/// system source every call differs.
pub fn render_with<R: Rng + ?Sized>(sliders: &SliderState, quality: Quality, rng: &mut R) -> Scene {
    let params = map_parameters(sliders, quality);
    let sites = generate_sites(params.count, params.disp, rng);
    render_sites(&sites, sliders, &params, rng)
}

/// Build a scene from precomputed sites.
///
/// Split out of [`render_with`] so tests can place sites by hand.
pub fn render_sites<R: Rng + ?Sized>(
    sites: &[Point],
    sliders: &SliderState,
    params: &EngineParams,
    rng: &mut R,
) -> Scene {
    let mut scene = Scene::new(*params);
    let mut empty_cells = 0usize;
    let mut thin_rings = 0usize;

    for i in 0..sites.len() {
        let Some(cell) = voronoi_cell(sites, i) else {
            trace!(site = i, "cell clipped away");
            empty_cells += 1;
            continue;
        };
        let Some(rings) = ring_pair(&cell, params) else {
            trace!(site = i, vertices = cell.len(), "ring pair too small");
            thin_rings += 1;
            continue;
        };
        scene.shapes.push(ring_shape(&rings, params, sliders.display, rng));
    }

    debug!(
        sites = sites.len(),
        shapes = scene.shapes.len(),
        empty_cells,
        thin_rings,
        "rendered leopard scene"
    );
    scene
}
