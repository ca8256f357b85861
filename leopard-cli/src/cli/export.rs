//! Rasterizing scenes: PNG files and preview images.

use std::path::Path;

use chrono::NaiveDate;
use image::{DynamicImage, RgbaImage};
use thiserror::Error;
use tiny_skia::Pixmap;

/// File prefix of a single exported leopard.
pub const LEOPARD_PNG_PREFIX: &str = "momentary_leopard";

/// File prefix of an exported pattern tile.
pub const PATTERN_PNG_PREFIX: &str = "momentary_pattern";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to parse SVG: {0}")]
    Svg(#[from] usvg::Error),

    #[error("could not create a {0}x{1} pixmap")]
    Pixmap(u32, u32),

    #[error("failed to write PNG {path}: {message}")]
    Png { path: String, message: String },

    #[error("could not convert pixmap to an image")]
    Image,
}

/// `<prefix>_<YYYY-MM-DD>.png`
pub fn default_png_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}_{}.png", prefix, date.format("%Y-%m-%d"))
}

/// Default file name for today's (UTC) export.
pub fn today_png_name(prefix: &str) -> String {
    default_png_name(prefix, chrono::Utc::now().date_naive())
}

/// Render an SVG document into a `width` x `height` pixmap, scaling the
/// document to fit. The background stays transparent unless `background`
/// is given.
pub fn rasterize(
    svg: &str,
    width: u32,
    height: u32,
    background: Option<tiny_skia::Color>,
) -> Result<Pixmap, ExportError> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &options)?;

    let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::Pixmap(width, height))?;
    if let Some(color) = background {
        pixmap.fill(color);
    }

    let size = tree.size();
    let sx = width as f32 / size.width();
    let sy = height as f32 / size.height();
    let transform = tiny_skia::Transform::from_scale(sx, sy);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    Ok(pixmap)
}

/// Write a square PNG of the document.
pub fn save_png<P: AsRef<Path>>(svg: &str, path: P, size: u32) -> Result<(), ExportError> {
    let path = path.as_ref();
    let pixmap = rasterize(svg, size, size, None)?;
    pixmap.save_png(path).map_err(|e| ExportError::Png {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Rasterize onto white for terminal display.
pub fn render_preview_image(svg: &str, size: u32) -> Result<DynamicImage, ExportError> {
    let pixmap = rasterize(svg, size, size, Some(tiny_skia::Color::WHITE))?;
    let (w, h) = (pixmap.width(), pixmap.height());
    let rgba = RgbaImage::from_raw(w, h, pixmap.take()).ok_or(ExportError::Image)?;
    Ok(DynamicImage::ImageRgba8(rgba))
}

#[cfg(test)]
mod tests {
    use super::*;
    use leopard::{render_with, Lcg, Quality, SliderState};

    fn scene_svg() -> String {
        render_with(&SliderState::uniform(50.0), Quality::Low, &mut Lcg::new(1)).to_svg()
    }

    #[test]
    fn png_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            default_png_name(LEOPARD_PNG_PREFIX, date),
            "momentary_leopard_2024-03-09.png"
        );
        assert_eq!(
            default_png_name(PATTERN_PNG_PREFIX, date),
            "momentary_pattern_2024-03-09.png"
        );
    }

    #[test]
    fn rasterize_scene_at_canvas_size() {
        let pixmap = rasterize(&scene_svg(), 520, 520, None).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (520, 520));
        // Something was drawn
        assert!(pixmap.data().chunks(4).any(|px| px[3] > 0));
    }

    #[test]
    fn rasterize_rejects_garbage() {
        assert!(matches!(rasterize("not svg", 10, 10, None), Err(ExportError::Svg(_))));
    }

    #[test]
    fn save_png_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.png");
        save_png(&scene_svg(), &path, 64).unwrap();
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (64, 64));
    }

    #[test]
    fn preview_image_is_opaque() {
        let img = render_preview_image(&scene_svg(), 128).unwrap();
        let rgba = img.to_rgba8();
        assert!(rgba.pixels().all(|p| p.0[3] == 255));
    }
}
