//! YAML configuration for archive locations, export size and the tile sheet.
//!
//! Lookup order: `--config <file>`, then `LEOPARD_CONFIG`, then defaults.
//! Every field is optional.
//!
//! | Field                  | Default                 |
//! |------------------------|-------------------------|
//! | `archive.local_path`   | `leopard_archive.json`  |
//! | `archive.local_limit`  | `100`                   |
//! | `archive.shared_dir`   | none (shared disabled)  |
//! | `archive.shared_limit` | `80`                    |
//! | `export.png_size`      | `520`                   |
//! | `tile.size`            | `270` (a 180px tile)    |
//! | `tile.min` / `tile.max`| `50` / `400`            |
//! | `tile.width/height`    | `1040` x `1040`         |
//! | `preview.frame_ms`     | `16`                    |

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "LEOPARD_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub archive: ArchiveConfig,
    pub export: ExportConfig,
    pub tile: TileConfig,
    pub preview: PreviewConfig,
}

/// Where generated leopards are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// JSON array file of recent records.
    #[serde(default = "default_local_path")]
    pub local_path: PathBuf,

    /// Newest records kept in the local file.
    #[serde(default = "default_local_limit")]
    pub local_limit: usize,

    /// Directory of the shared (gallery) archive. Disabled when absent.
    #[serde(default)]
    pub shared_dir: Option<PathBuf>,

    /// Newest shared records loaded for browsing.
    #[serde(default = "default_shared_limit")]
    pub shared_limit: usize,
}

fn default_local_path() -> PathBuf {
    PathBuf::from("leopard_archive.json")
}

fn default_local_limit() -> usize {
    100
}

fn default_shared_limit() -> usize {
    80
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            local_path: default_local_path(),
            local_limit: default_local_limit(),
            shared_dir: None,
            shared_limit: default_shared_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Edge length of exported PNGs in pixels.
    #[serde(default = "default_png_size")]
    pub png_size: u32,
}

fn default_png_size() -> u32 {
    520
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { png_size: default_png_size() }
    }
}

/// Tiled pattern sheet. The tile slider is inverted: the rendered tile edge
/// is `min + max - size`, so small slider values give large tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileConfig {
    #[serde(default = "default_tile_size")]
    pub size: f64,
    #[serde(default = "default_tile_min")]
    pub min: f64,
    #[serde(default = "default_tile_max")]
    pub max: f64,
    /// Sheet width in pixels.
    #[serde(default = "default_sheet_edge")]
    pub width: f64,
    /// Sheet height in pixels.
    #[serde(default = "default_sheet_edge")]
    pub height: f64,
}

fn default_tile_size() -> f64 {
    270.0
}

fn default_tile_min() -> f64 {
    50.0
}

fn default_tile_max() -> f64 {
    400.0
}

fn default_sheet_edge() -> f64 {
    1040.0
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            size: default_tile_size(),
            min: default_tile_min(),
            max: default_tile_max(),
            width: default_sheet_edge(),
            height: default_sheet_edge(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Refresh tick of the terminal UI; at most one preview per tick.
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
}

fn default_frame_ms() -> u64 {
    16
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self { frame_ms: default_frame_ms() }
    }
}

impl Config {
    /// Load and validate a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config: explicit path, then `LEOPARD_CONFIG`, then
    /// defaults.
    pub fn resolve(explicit: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match env::var(CONFIG_ENV) {
            Ok(path) if !path.is_empty() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.archive.local_limit == 0 {
            return Err(ConfigError::Invalid("archive.local_limit must be at least 1".into()));
        }
        if self.export.png_size == 0 {
            return Err(ConfigError::Invalid("export.png_size must be at least 1".into()));
        }
        if !(self.tile.min > 0.0 && self.tile.min < self.tile.max) {
            return Err(ConfigError::Invalid(format!(
                "tile.min ({}) must be positive and below tile.max ({})",
                self.tile.min, self.tile.max
            )));
        }
        let tile_values = [self.tile.size, self.tile.max, self.tile.width, self.tile.height];
        if tile_values.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::Invalid("tile values must be finite numbers".into()));
        }
        if self.tile.width <= 0.0 || self.tile.height <= 0.0 {
            return Err(ConfigError::Invalid("tile.width and tile.height must be positive".into()));
        }
        if self.preview.frame_ms == 0 {
            return Err(ConfigError::Invalid("preview.frame_ms must be at least 1".into()));
        }
        Ok(())
    }
}

/// Execute the config command.
pub fn cmd_config(args: &[String], config: &Config) -> Result<(), String> {
    for arg in args {
        match arg.as_str() {
            "--example" => {
                print_example();
                return Ok(());
            }
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
    }

    let yaml = serde_yaml::to_string(config).map_err(|e| format!("Failed to serialize config: {}", e))?;
    print!("{}", yaml);
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: leopard config [--example]");
    eprintln!();
    eprintln!("Prints the effective configuration as YAML.");
    eprintln!("  --example    Print a commented example config file");
    eprintln!();
    eprintln!("The config is read from --config <file> or ${}.", CONFIG_ENV);
}

fn print_example() {
    println!(
        r#"# Momentary Leopard configuration
# Every field is optional; defaults are shown.

archive:
  # Recent generations, newest last
  local_path: leopard_archive.json
  local_limit: 100
  # Shared gallery directory (one JSON file per record); omit to disable
  # shared_dir: /srv/leopard/shared
  shared_limit: 80

export:
  png_size: 520

tile:
  # Slider value; the tile edge is min + max - size
  size: 270
  min: 50
  max: 400
  width: 1040
  height: 1040

preview:
  frame_ms: 16
"#
    );
}
