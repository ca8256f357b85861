//! Tile command: repeat a saved leopard as a seamless pattern sheet.

use std::fs;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use leopard::svg::looks_like_scene;
use leopard::{background_svg, sort_records, SortMode};

use super::archive::{Archive, ArchiveView};
use super::common::{next_value, write_output};
use super::config::{Config, TileConfig};
use super::export::{save_png, today_png_name, PATTERN_PNG_PREFIX};
use super::generate::optional_png_path;

/// Edge length of one tile for a slider position. The slider runs
/// backwards: its minimum gives the largest tile.
pub fn tile_edge(slider: f64, tile: &TileConfig) -> f64 {
    let slider = slider.clamp(tile.min, tile.max);
    tile.min + tile.max - slider
}

/// Parse a `--size` value. `f64` parsing accepts `NaN` and `inf`, which
/// would end up in the sheet attributes.
pub fn parse_tile_size(value: &str) -> Result<f64, String> {
    match value.parse::<f64>() {
        Ok(size) if size.is_finite() => Ok(size),
        _ => Err(format!("--size expects a finite number, got '{}'", value)),
    }
}

/// SVG sheet of `width` x `height` filled with the scene repeated every
/// `edge` pixels. `invert` puts the pattern on black instead of white.
pub fn tile_sheet_svg(scene_svg: &str, edge: f64, width: f64, height: f64, invert: bool) -> String {
    let href = format!("data:image/svg+xml;base64,{}", STANDARD.encode(scene_svg.as_bytes()));
    let backdrop = if invert { "#000000" } else { "#ffffff" };

    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" "#,
            r#"width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r#"<defs><pattern id="leopardTile" patternUnits="userSpaceOnUse" width="{t}" height="{t}">"#,
            r#"<image width="{t}" height="{t}" xlink:href="{href}"/>"#,
            r#"</pattern></defs>"#,
            r#"<rect width="{w}" height="{h}" fill="{bg}"/>"#,
            r#"<rect width="{w}" height="{h}" fill="url(#leopardTile)"/>"#,
            r#"</svg>"#,
        ),
        w = width,
        h = height,
        t = edge,
        href = href,
        bg = backdrop,
    )
}

/// Execute the tile command.
pub fn cmd_tile(args: &[String], config: &Config) -> Result<(), String> {
    let mut index = 0usize;
    let mut svg_path: Option<String> = None;
    let mut output: Option<String> = None;
    let mut png: Option<String> = None;
    let mut size = config.tile.size;
    let mut invert = false;
    let mut faint = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--index" => {
                let value = next_value(args, &mut i, "--index")?;
                index = value.parse().map_err(|_| format!("--index expects a number, got '{}'", value))?;
            }
            "--svg" => svg_path = Some(next_value(args, &mut i, "--svg")?.to_string()),
            "-s" | "--size" => {
                let value = next_value(args, &mut i, "--size")?;
                size = parse_tile_size(value)?;
            }
            "-o" | "--output" => output = Some(next_value(args, &mut i, "--output")?.to_string()),
            "--png" => png = Some(optional_png_path(args, &mut i)),
            "--invert" => invert = true,
            "--background" => faint = true,
            "-h" | "--help" => {
                print_usage(config);
                return Ok(());
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    let scene = match svg_path {
        Some(path) => fs::read_to_string(&path).map_err(|e| format!("Failed to read {}: {}", path, e))?,
        None => {
            let mut records = Archive::from_config(&config.archive)
                .load(ArchiveView::Local)
                .map_err(|e| e.to_string())?;
            sort_records(&mut records, SortMode::TimeDesc);
            records
                .into_iter()
                .nth(index)
                .map(|r| r.svg)
                .ok_or_else(|| {
                    format!(
                        "No pattern at index {} in {} (generate one with `leopard generate --save`)",
                        index,
                        config.archive.local_path.display()
                    )
                })?
        }
    };

    if !looks_like_scene(&scene) {
        return Err("No pattern data: input is not an SVG scene".to_string());
    }
    let scene = if faint {
        background_svg(&scene).map_err(|e| format!("Failed to build background: {}", e))?
    } else {
        scene
    };

    let edge = tile_edge(size, &config.tile);
    eprintln!("Tile: {:.0}px on a {:.0}x{:.0} sheet", edge, config.tile.width, config.tile.height);

    if let Some(png) = png {
        let path = if png.is_empty() { today_png_name(PATTERN_PNG_PREFIX) } else { png };
        save_png(&scene, &path, config.export.png_size).map_err(|e| e.to_string())?;
        eprintln!("Wrote: {}", path);
    }

    let sheet = tile_sheet_svg(&scene, edge, config.tile.width, config.tile.height, invert);
    write_output(output.as_deref(), &sheet)
}

fn print_usage(config: &Config) {
    eprintln!("Usage: leopard tile [options]");
    eprintln!();
    eprintln!("Repeats a saved leopard as a pattern sheet (SVG on stdout by default).");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --index <n>          Archive entry, newest first (default: 0)");
    eprintln!("  --svg <file>         Use a scene SVG file instead of the archive");
    eprintln!(
        "  -s, --size <n>       Tile slider {}-{}; larger means smaller tiles (default: {})",
        config.tile.min, config.tile.max, config.tile.size
    );
    eprintln!("  --invert             Black sheet instead of white");
    eprintln!("  --background         Use the faint background variant of the scene");
    eprintln!("  -o, --output <file>  Write the sheet to a file");
    eprintln!("  --png [file.png]     Export the pattern as PNG (default: momentary_pattern_<date>.png)");
}
