//! The renderer's output: a description of what to draw.
//!
//! A [`Scene`] does not know about any drawing surface. It lists the shapes
//! and describes the one noise filter they all share; surfaces decide how
//! to materialize and cache that filter.

use serde::{Serialize, Serializer};

use crate::geometry::CANVAS_SIZE;
use crate::params::EngineParams;
use crate::path::Path;

/// Id of the shared filter inside a serialized scene.
pub const FILTER_ID: &str = "noiseFilter";

/// Octave count of the fractal noise.
pub const NOISE_OCTAVES: u32 = 2;

/// Turbulence + displacement-map filter applied to every shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoiseFilter {
    /// `feTurbulence` base frequency.
    pub base_frequency: f64,
    /// `feDisplacementMap` scale.
    pub scale: f64,
}

impl NoiseFilter {
    /// Filter strengths for a parameter set. Computed once per render.
    pub fn from_params(params: &EngineParams) -> Self {
        let chaos_power = params.turb / 100.0;
        let quirk_power = params.disp / 100.0;
        Self {
            base_frequency: 0.01 + chaos_power * 0.04 + quirk_power * 0.015,
            scale: 5.0 + chaos_power * 40.0 + quirk_power * 80.0,
        }
    }
}

/// One leopard spot: an outer contour with an inner contour punched out
/// by the even-odd rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    /// Outer rounded contour followed by the inner one.
    #[serde(rename = "d", serialize_with = "serialize_path")]
    pub path: Path,
    /// Gray channel of the fill, used for r, g and b.
    pub gray: u8,
    /// Fill opacity in [0, 1].
    pub opacity: f64,
}

impl Shape {
    /// CSS color of the fill.
    pub fn fill_color(&self) -> String {
        format!("rgb({},{},{})", self.gray, self.gray, self.gray)
    }
}

fn serialize_path<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_svg_data())
}

/// A complete rendered pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    /// Parameters the scene was rendered with.
    pub params: EngineParams,
    pub filter: NoiseFilter,
    pub shapes: Vec<Shape>,
}

impl Scene {
    /// An empty canvas-sized scene.
    pub fn new(params: EngineParams) -> Self {
        Self {
            width: CANVAS_SIZE,
            height: CANVAS_SIZE,
            params,
            filter: NoiseFilter::from_params(&params),
            shapes: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Serialize as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        crate::svg::scene_to_svg(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{map_parameters, Quality, SliderState};

    #[test]
    fn calm_filter() {
        let params = map_parameters(&SliderState::uniform(0.0), Quality::High);
        let f = NoiseFilter::from_params(&params);
        assert!((f.base_frequency - 0.01).abs() < 1e-12);
        assert!((f.scale - 5.0).abs() < 1e-12);
    }

    #[test]
    fn wild_filter() {
        let params = map_parameters(&SliderState::uniform(100.0), Quality::High);
        let f = NoiseFilter::from_params(&params);
        assert!((f.base_frequency - 0.065).abs() < 1e-12);
        assert!((f.scale - 125.0).abs() < 1e-12);
    }

    #[test]
    fn fill_color_is_gray() {
        let shape = Shape { path: Path::new(), gray: 77, opacity: 0.5 };
        assert_eq!(shape.fill_color(), "rgb(77,77,77)");
    }

    #[test]
    fn new_scene_is_canvas_sized_and_empty() {
        let params = map_parameters(&SliderState::uniform(50.0), Quality::Low);
        let scene = Scene::new(params);
        assert_eq!(scene.width, CANVAS_SIZE);
        assert_eq!(scene.height, CANVAS_SIZE);
        assert!(scene.is_empty());
    }

    #[test]
    fn scene_json_carries_path_data() {
        let params = map_parameters(&SliderState::uniform(0.0), Quality::Low);
        let mut scene = Scene::new(params);
        scene.shapes.push(Shape {
            path: crate::path::rounded_path(&crate::geometry::Polygon::rect(0.0, 0.0, 4.0, 4.0).vertices, 1.0),
            gray: 100,
            opacity: 0.25,
        });
        let json = serde_json::to_value(&scene).unwrap();
        assert!(json["shapes"][0]["d"].as_str().unwrap().starts_with('M'));
        assert_eq!(json["filter"]["scale"], 5.0);
    }
}
