//! Archive command: list and inspect saved leopards.

use leopard::{sort_records, GeneratedLeopard, SortMode};

use super::archive::{Archive, ArchiveView};
use super::common::{format_timestamp, next_value, result_view, write_output};
use super::config::Config;
use super::generate::{optional_png_path, write_record_outputs};

/// Execute the archive command.
pub fn cmd_archive(args: &[String], config: &Config) -> Result<(), String> {
    match args.first().map(|s| s.as_str()) {
        Some("list") => cmd_list(&args[1..], config),
        Some("show") => cmd_show(&args[1..], config),
        Some("-h") | Some("--help") | None => {
            print_usage();
            Ok(())
        }
        Some(other) => Err(format!("Unknown archive subcommand: {}", other)),
    }
}

/// Records of a view in the requested order. Indices printed by `list`
/// refer to this order.
pub fn load_sorted(archive: &Archive, view: ArchiveView, sort: SortMode) -> Result<Vec<GeneratedLeopard>, String> {
    let mut records = archive.load(view).map_err(|e| e.to_string())?;
    sort_records(&mut records, sort);
    Ok(records)
}

/// One `list` row: index, time, type.
pub fn list_row(index: usize, record: &GeneratedLeopard) -> String {
    format!("{:>3}  {}  {}", index, format_timestamp(record.timestamp), record.type_name)
}

/// The entry at `index`, provided it carries a scene that can be restored.
pub fn restorable(records: &[GeneratedLeopard], index: usize, view: ArchiveView) -> Result<&GeneratedLeopard, String> {
    let record = records
        .get(index)
        .ok_or_else(|| format!("No entry {} in the {} archive ({} entries)", index, view, records.len()))?;
    if !record.is_showable() {
        return Err(format!("Entry {} has only a thumbnail; its scene cannot be restored", index));
    }
    Ok(record)
}

fn parse_view_and_sort(flag: &str, args: &[String], i: &mut usize, view: &mut ArchiveView, sort: &mut SortMode) -> Result<bool, String> {
    match flag {
        "--view" => {
            *view = next_value(args, i, "--view")?.parse()?;
            Ok(true)
        }
        "--sort" => {
            *sort = next_value(args, i, "--sort")?.parse()?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn cmd_list(args: &[String], config: &Config) -> Result<(), String> {
    let mut view = ArchiveView::Local;
    let mut sort = SortMode::default();
    let mut json = false;

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        if !parse_view_and_sort(flag, args, &mut i, &mut view, &mut sort)? {
            match flag {
                "--json" => json = true,
                other => return Err(format!("Unknown option: {}", other)),
            }
        }
        i += 1;
    }

    let archive = Archive::from_config(&config.archive);
    if view == ArchiveView::Shared && !archive.has_shared() {
        eprintln!("Shared archive is not configured (set archive.shared_dir).");
    }
    let records = load_sorted(&archive, view, sort)?;

    if json {
        let out = serde_json::to_string_pretty(&records).map_err(|e| format!("Failed to serialize: {}", e))?;
        println!("{}", out);
        return Ok(());
    }

    if records.is_empty() {
        eprintln!("No saved leopards in the {} archive.", view);
        return Ok(());
    }

    eprintln!("{} archive, {} ({} entries)", view, sort, records.len());
    for (index, record) in records.iter().enumerate() {
        println!("{}", list_row(index, record));
    }
    Ok(())
}

fn cmd_show(args: &[String], config: &Config) -> Result<(), String> {
    let mut view = ArchiveView::Local;
    let mut sort = SortMode::default();
    let mut index: Option<usize> = None;
    let mut output: Option<String> = None;
    let mut png: Option<String> = None;
    let mut background: Option<String> = None;

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        if !parse_view_and_sort(flag, args, &mut i, &mut view, &mut sort)? {
            match flag {
                "-o" | "--output" => output = Some(next_value(args, &mut i, "--output")?.to_string()),
                "--png" => png = Some(optional_png_path(args, &mut i)),
                "--background" => background = Some(next_value(args, &mut i, "--background")?.to_string()),
                value if !value.starts_with('-') && index.is_none() => {
                    index = Some(value.parse().map_err(|_| format!("Invalid index: {}", value))?);
                }
                other => return Err(format!("Unknown option: {}", other)),
            }
        }
        i += 1;
    }

    let index = index.ok_or("archive show requires an index (see `leopard archive list`)")?;
    let archive = Archive::from_config(&config.archive);
    let records = load_sorted(&archive, view, sort)?;
    let record = restorable(&records, index, view)?;

    println!("{}", format_timestamp(record.timestamp));
    println!("{}", result_view(&record.leopard_type(), &record.sliders));

    write_record_outputs(record, png.as_deref(), background.as_deref(), config.export.png_size)?;
    if let Some(path) = output.as_deref() {
        write_output(Some(path), &record.svg)?;
    }
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: leopard archive <list|show> [options]");
    eprintln!();
    eprintln!("  list [--view local|shared] [--sort <mode>] [--json]");
    eprintln!("  show <index> [--view ..] [--sort ..] [-o file.svg] [--png [file.png]] [--background file.svg]");
    eprintln!();
    let modes: Vec<_> = SortMode::all().iter().map(|m| m.name()).collect();
    eprintln!("Sort modes: {}", modes.join(", "));
}
