//! SVG boundary - scenes in, documents out, and back again.
//!
//! The serialized form is the one every consumer sees (preview, archive,
//! export), so it is kept stable and self-contained: one `<defs>` holding
//! the shared filter, then one `<path>` per shape, no external references.
//!
//! Reading archived documents back uses quick-xml for attribute-level work
//! and usvg for a full validity check.

use std::fmt::Write as _;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use thiserror::Error;

use crate::geometry::CANVAS_SIZE;
use crate::path::{Path, PathError};
use crate::scene::{Scene, FILTER_ID, NOISE_OCTAVES};

/// Fill opacity of the background (tiling) variant.
pub const BACKGROUND_OPACITY: &str = "0.06";

/// Fill color of the background (tiling) variant.
pub const BACKGROUND_FILL: &str = "#000000";

/// Errors reading or rewriting a serialized scene.
#[derive(Debug, Error)]
pub enum SvgError {
    #[error("not an SVG scene document")]
    NotAScene,

    #[error("SVG parse error: {0}")]
    Parse(String),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("invalid path in scene: {0}")]
    Path(#[from] PathError),
}

/// Serialize a scene to a standalone SVG document.
pub fn scene_to_svg(scene: &Scene) -> String {
    let mut svg = String::with_capacity(512 + scene.shapes.len() * 700);

    // Writing to a String never fails
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = scene.width,
        h = scene.height,
    );
    let _ = write!(
        svg,
        concat!(
            r#"<defs><filter id="{id}" color-interpolation-filters="sRGB">"#,
            r#"<feTurbulence type="fractalNoise" numOctaves="{octaves}" result="noise" baseFrequency="{freq:.4}"/>"#,
            r#"<feDisplacementMap in="SourceGraphic" in2="noise" xChannelSelector="R" yChannelSelector="G" scale="{scale:.1}"/>"#,
            r#"</filter></defs>"#,
        ),
        id = FILTER_ID,
        octaves = NOISE_OCTAVES,
        freq = scene.filter.base_frequency,
        scale = scene.filter.scale,
    );

    for shape in &scene.shapes {
        let _ = write!(
            svg,
            r#"<path d="{}" fill-rule="evenodd" fill="{}" fill-opacity="{:.2}" filter="url(#{})"/>"#,
            shape.path.to_svg_data(),
            shape.fill_color(),
            shape.opacity,
            FILTER_ID,
        );
    }

    svg.push_str("</svg>");
    svg
}

/// True when the document looks like a serialized scene (starts with
/// `<svg` after trimming). Archive entries failing this are not shown.
pub fn looks_like_scene(svg: &str) -> bool {
    svg.trim_start().starts_with("<svg")
}

/// Full validity check: the document must look like a scene and parse
/// with usvg at the canvas size.
pub fn validate_scene_svg(svg: &str) -> Result<(), SvgError> {
    if !looks_like_scene(svg) {
        return Err(SvgError::NotAScene);
    }
    let tree = usvg::Tree::from_str(svg, &usvg::Options::default())
        .map_err(|e| SvgError::Parse(e.to_string()))?;

    let size = tree.size();
    if (size.width() as f64 - CANVAS_SIZE).abs() > 0.5 || (size.height() as f64 - CANVAS_SIZE).abs() > 0.5 {
        return Err(SvgError::Parse(format!(
            "unexpected canvas size {}x{}",
            size.width(),
            size.height()
        )));
    }
    Ok(())
}

/// Background variant of a serialized scene: every `fill-opacity` becomes
/// 0.06 and every `fill` becomes black. Other attributes and structure are
/// untouched.
pub fn background_svg(svg: &str) -> Result<String, SvgError> {
    let mut reader = Reader::from_str(svg);
    let mut writer = Writer::new(Vec::with_capacity(svg.len()));

    loop {
        let event = reader.read_event().map_err(|e| SvgError::Xml(e.to_string()))?;
        match event {
            Event::Eof => break,
            Event::Start(e) => {
                let e = recolor_element(&e)?;
                writer.write_event(Event::Start(e)).map_err(|e| SvgError::Xml(e.to_string()))?;
            }
            Event::Empty(e) => {
                let e = recolor_element(&e)?;
                writer.write_event(Event::Empty(e)).map_err(|e| SvgError::Xml(e.to_string()))?;
            }
            other => {
                writer.write_event(other).map_err(|e| SvgError::Xml(e.to_string()))?;
            }
        }
    }

    String::from_utf8(writer.into_inner()).map_err(|e| SvgError::Xml(e.to_string()))
}

/// Copy an element, replacing `fill` and `fill-opacity` values.
fn recolor_element(e: &BytesStart<'_>) -> Result<BytesStart<'static>, SvgError> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(|err| SvgError::Xml(err.to_string()))?
        .to_string();
    let mut out = BytesStart::new(name);

    for attr in e.attributes() {
        let attr = attr.map_err(|err| SvgError::Xml(err.to_string()))?;
        match attr.key.as_ref() {
            b"fill" => out.push_attribute(("fill", BACKGROUND_FILL)),
            b"fill-opacity" => out.push_attribute(("fill-opacity", BACKGROUND_OPACITY)),
            _ => out.push_attribute(attr),
        }
    }

    Ok(out)
}

/// Read the `d` attribute of every `<path>` back into structured paths.
pub fn scene_paths(svg: &str) -> Result<Vec<Path>, SvgError> {
    let mut reader = Reader::from_str(svg);
    let mut paths = Vec::new();

    loop {
        match reader.read_event().map_err(|e| SvgError::Xml(e.to_string()))? {
            Event::Eof => break,
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"path" => {
                for attr in e.attributes() {
                    let attr = attr.map_err(|err| SvgError::Xml(err.to_string()))?;
                    if attr.key.as_ref() == b"d" {
                        let value = attr
                            .unescape_value()
                            .map_err(|err| SvgError::Xml(err.to_string()))?;
                        paths.push(Path::parse(&value)?);
                    }
                }
            }
            _ => {}
        }
    }

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Quality, SliderState};
    use crate::render::render_with;
    use crate::rng::Lcg;

    fn sample_svg() -> String {
        let sliders = SliderState::uniform(55.0);
        render_with(&sliders, Quality::Low, &mut Lcg::new(8)).to_svg()
    }

    #[test]
    fn document_shape() {
        let svg = sample_svg();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.contains("viewBox=\"0 0 520 520\""));
        assert_eq!(svg.matches("<defs>").count(), 1);
        assert!(svg.contains("id=\"noiseFilter\""));
        assert!(svg.ends_with("</svg>"));
        // Self-contained: the only url() is the internal filter reference
        assert_eq!(svg.matches("url(").count(), svg.matches("url(#noiseFilter)").count());
    }

    #[test]
    fn filter_attributes_are_formatted() {
        let params = crate::params::map_parameters(&SliderState::uniform(0.0), Quality::Low);
        let svg = scene_to_svg(&Scene::new(params));
        assert!(svg.contains("baseFrequency=\"0.0100\""));
        assert!(svg.contains("scale=\"5.0\""));
        assert!(svg.contains("numOctaves=\"2\""));
    }

    #[test]
    fn one_path_per_shape() {
        let sliders = SliderState::uniform(55.0);
        let scene = render_with(&sliders, Quality::Low, &mut Lcg::new(8));
        let svg = scene.to_svg();
        assert_eq!(svg.matches("<path ").count(), scene.len());
        assert_eq!(scene_paths(&svg).unwrap().len(), scene.len());
    }

    #[test]
    fn usvg_accepts_scene() {
        validate_scene_svg(&sample_svg()).unwrap();
    }

    #[test]
    fn rejects_non_scene() {
        assert!(matches!(validate_scene_svg("data:image/png;base64,AAAA"), Err(SvgError::NotAScene)));
        assert!(looks_like_scene("  \n<svg></svg>"));
    }

    #[test]
    fn background_rewrites_fills() {
        let svg = sample_svg();
        let bg = background_svg(&svg).unwrap();
        assert!(!bg.contains("rgb("));
        assert_eq!(
            bg.matches("fill=\"#000000\"").count(),
            svg.matches(" fill=\"").count()
        );
        assert_eq!(
            bg.matches("fill-opacity=\"0.06\"").count(),
            svg.matches("fill-opacity=\"").count()
        );
        // fill-rule is left alone
        assert_eq!(bg.matches("fill-rule=\"evenodd\"").count(), svg.matches("fill-rule=\"evenodd\"").count());
        validate_scene_svg(&bg).unwrap();
    }

    #[test]
    fn scene_paths_are_closed_double_contours() {
        for path in scene_paths(&sample_svg()).unwrap() {
            assert!(path.is_closed());
            assert_eq!(path.subpath_count(), 2);
        }
    }
}
