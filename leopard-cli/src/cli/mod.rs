//! CLI command implementations.
//!
//! This module contains the implementations for the various CLI subcommands:
//! - `generate` - Render a final leopard and write SVG / PNG / JSON
//! - `tile` - Repeat a saved leopard as a pattern sheet
//! - `archive` - List and inspect saved leopards
//! - `params` / `type` - Show the slider mapping and classification
//! - `benchmark` - Time renders against the frame budget
//! - `config` - Print the effective or an example configuration

pub mod archive;
pub mod benchmark;
pub mod browse;
pub mod common;
pub mod config;
pub mod export;
pub mod generate;
pub mod inspect;
pub mod tile;

pub use archive::{Archive, ArchiveError, ArchiveView};
pub use benchmark::cmd_benchmark;
pub use browse::cmd_archive;
pub use config::{cmd_config, Config, ConfigError};
pub use export::ExportError;
pub use generate::cmd_generate;
pub use inspect::{cmd_params, cmd_type};
pub use tile::cmd_tile;
