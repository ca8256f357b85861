//! Generate command: render a final leopard, show its result view and
//! write it out.

use std::fs;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;

use leopard::{background_svg, GeneratedLeopard, SliderState};

use super::archive::Archive;
use super::common::{apply_slider_arg, default_sliders, next_value, result_view, write_output};
use super::config::Config;
use super::export::{save_png, today_png_name, LEOPARD_PNG_PREFIX};

/// Parsed generate options.
#[derive(Debug, Default)]
struct GenerateOptions {
    sliders: SliderState,
    seed: Option<u64>,
    output: Option<String>,
    png: Option<String>,
    background: Option<String>,
    json: bool,
    save: bool,
    quiet: bool,
}

/// Execute the generate command.
pub fn cmd_generate(args: &[String], config: &Config) -> Result<(), String> {
    let Some(opts) = parse_args(args)? else {
        print_usage();
        return Ok(());
    };

    let timestamp = chrono::Utc::now().timestamp_millis();
    let record = match opts.seed {
        Some(seed) => GeneratedLeopard::generate(&opts.sliders, timestamp, &mut StdRng::seed_from_u64(seed)),
        None => GeneratedLeopard::generate(&opts.sliders, timestamp, &mut rand::rng()),
    };

    if !opts.quiet {
        eprintln!("{}", result_view(&record.leopard_type(), &record.sliders));
        eprintln!();
    }

    if opts.save {
        // Archive trouble is reported, never fatal
        match Archive::from_config(&config.archive).save(&record) {
            Ok(outcome) => {
                eprintln!("Saved to archive: {}", config.archive.local_path.display());
                if let Some(path) = outcome.shared_path {
                    eprintln!("Shared: {}", path.display());
                }
                if let Some(e) = outcome.shared_error {
                    eprintln!("Warning: shared archive save failed: {}", e);
                }
            }
            Err(e) => {
                warn!(error = %e, "archive save failed");
                eprintln!("Warning: archive save failed: {}", e);
            }
        }
    }

    write_record_outputs(
        &record,
        opts.png.as_deref(),
        opts.background.as_deref(),
        config.export.png_size,
    )?;

    if opts.json {
        let json = serde_json::to_string_pretty(&record).map_err(|e| format!("Failed to serialize record: {}", e))?;
        write_output(opts.output.as_deref(), &json)
    } else {
        write_output(opts.output.as_deref(), &record.svg)
    }
}

/// Write the optional PNG and background variant of a record. Shared with
/// `archive show`.
pub fn write_record_outputs(
    record: &GeneratedLeopard,
    png: Option<&str>,
    background: Option<&str>,
    png_size: u32,
) -> Result<(), String> {
    if let Some(png) = png {
        let path = if png.is_empty() { today_png_name(LEOPARD_PNG_PREFIX) } else { png.to_string() };
        eprint!("Generating PNG {}x{}...", png_size, png_size);
        save_png(&record.svg, &path, png_size).map_err(|e| format!(" failed: {}", e))?;
        eprintln!(" done!\nWrote: {}", path);
    }

    if let Some(path) = background {
        let bg = background_svg(&record.svg).map_err(|e| format!("Failed to build background: {}", e))?;
        fs::write(path, bg).map_err(|e| format!("Failed to write {}: {}", path, e))?;
        eprintln!("Wrote: {}", path);
    }
    Ok(())
}

/// `--png` takes an optional `.png` path; without one the dated default
/// name is used (signalled by an empty string).
pub fn optional_png_path(args: &[String], i: &mut usize) -> String {
    match args.get(*i + 1) {
        Some(next) if next.ends_with(".png") && !next.starts_with('-') => {
            *i += 1;
            next.clone()
        }
        _ => String::new(),
    }
}

fn parse_args(args: &[String]) -> Result<Option<GenerateOptions>, String> {
    let mut opts = GenerateOptions { sliders: default_sliders(), ..Default::default() };

    let mut i = 0;
    while i < args.len() {
        if apply_slider_arg(args, &mut i, &mut opts.sliders)? {
            i += 1;
            continue;
        }
        match args[i].as_str() {
            "--seed" => {
                let value = next_value(args, &mut i, "--seed")?;
                opts.seed = Some(value.parse().map_err(|_| format!("--seed expects an integer, got '{}'", value))?);
            }
            "-o" | "--output" => {
                opts.output = Some(next_value(args, &mut i, "--output")?.to_string());
            }
            "--png" => {
                opts.png = Some(optional_png_path(args, &mut i));
            }
            "--background" => {
                opts.background = Some(next_value(args, &mut i, "--background")?.to_string());
            }
            "--json" => opts.json = true,
            "--save" => opts.save = true,
            "-q" | "--quiet" => opts.quiet = true,
            "-h" | "--help" => return Ok(None),
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    Ok(Some(opts))
}

fn print_usage() {
    eprintln!("Usage: leopard generate [options]");
    eprintln!();
    eprintln!("Sliders (0-100, default 50):");
    eprintln!("  --complexity <n>  --softness <n>  --display <n>");
    eprintln!("  --chaos <n>       --quirk <n>     --rest <n>");
    eprintln!("  --sliders <c,s,d,ch,q,r>   All six at once");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --seed <n>            Reproducible render");
    eprintln!("  -o, --output <file>   Write SVG (or JSON with --json) to file (default: stdout)");
    eprintln!("  --png [file.png]      Also export a PNG (default: momentary_leopard_<date>.png)");
    eprintln!("  --background <file>   Also write the faint background variant");
    eprintln!("  --json                Output the full record as JSON");
    eprintln!("  --save                Save to the archive");
    eprintln!("  -q, --quiet           Do not print the result view");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_all_flags() {
        let opts = parse_args(&args(&[
            "--chaos", "90", "--seed", "7", "-o", "out.svg", "--png", "--background", "bg.svg", "--json", "--save",
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(opts.sliders.chaos, 90.0);
        assert_eq!(opts.sliders.rest, 50.0);
        assert_eq!(opts.seed, Some(7));
        assert_eq!(opts.output.as_deref(), Some("out.svg"));
        assert_eq!(opts.png.as_deref(), Some(""));
        assert_eq!(opts.background.as_deref(), Some("bg.svg"));
        assert!(opts.json && opts.save);
    }

    #[test]
    fn png_takes_explicit_path() {
        let opts = parse_args(&args(&["--png", "leo.png", "--quiet"])).unwrap().unwrap();
        assert_eq!(opts.png.as_deref(), Some("leo.png"));
        assert!(opts.quiet);
    }

    #[test]
    fn help_and_unknown_flags() {
        assert!(parse_args(&args(&["--help"])).unwrap().is_none());
        assert!(parse_args(&args(&["--volume", "3"])).is_err());
        assert!(parse_args(&args(&["--seed", "abc"])).is_err());
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let sliders = default_sliders();
        let a = GeneratedLeopard::generate(&sliders, 1, &mut StdRng::seed_from_u64(3));
        let b = GeneratedLeopard::generate(&sliders, 1, &mut StdRng::seed_from_u64(3));
        assert_eq!(a.svg, b.svg);
    }

    #[test]
    fn record_outputs_are_written() {
        let dir = tempfile::TempDir::new().unwrap();
        let record = GeneratedLeopard::generate(&default_sliders(), 1, &mut StdRng::seed_from_u64(1));
        let png = dir.path().join("a.png");
        let bg = dir.path().join("bg.svg");
        write_record_outputs(&record, png.to_str(), bg.to_str(), 32).unwrap();
        assert!(png.exists());
        assert!(fs::read_to_string(&bg).unwrap().contains("fill-opacity=\"0.06\""));
    }
}
