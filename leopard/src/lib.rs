//! # leopard
//!
//! Momentary Leopard pattern engine: six sliders in, a leopard-print
//! [`Scene`] out.
//!
//! Pipeline: [`map_parameters`] -> jittered sites -> Voronoi cells by
//! half-plane clipping -> inset ring pairs -> rounded double-contour paths.
//! The [`svg`] module is the only place a scene becomes text.
//!
//! ## Rust Lesson #7: Modules
//!
//! Rust modules are like ES6 modules but more explicit:
//! - `mod foo;` = load from `foo.rs` or `foo/mod.rs`
//! - `pub mod foo;` = also export it publicly
//! - `pub use foo::Bar;` = re-export Bar at this level
//!
//! Unlike Node.js, you must explicitly declare every module.

pub mod classify;
pub mod clip;
pub mod geometry;
pub mod params;
pub mod path;
pub mod record;
pub mod render;
pub mod rng;
pub mod scene;
pub mod svg;
pub mod throttle;

// Re-export common types at crate root for convenience.
pub use classify::{classify, LeopardType};
pub use clip::{clip_polygon, HalfPlane};
pub use geometry::{centroid, inset, Point, Polygon, CANVAS_SIZE};
pub use params::{map_parameters, to_dots, EngineParams, Quality, Slider, SliderState};
pub use path::{rounded_path, Path, PathCommand, PathError};
pub use record::{sort_records, GeneratedLeopard, SortMode};
pub use render::{render, render_with};
pub use rng::Lcg;
pub use scene::{NoiseFilter, Scene, Shape};
pub use svg::{background_svg, scene_to_svg, SvgError};
pub use throttle::FrameCoalescer;
