//! Common utilities shared across CLI commands.

use std::fs;

use chrono::{Local, TimeZone};

use leopard::{to_dots, LeopardType, Slider, SliderState};

/// Slider value used when a flag is not given.
pub const DEFAULT_SLIDER_VALUE: f64 = 50.0;

/// Sliders all at [`DEFAULT_SLIDER_VALUE`].
pub fn default_sliders() -> SliderState {
    SliderState::uniform(DEFAULT_SLIDER_VALUE)
}

/// `--complexity` style flag -> slider.
pub fn slider_flag(arg: &str) -> Option<Slider> {
    arg.strip_prefix("--").and_then(Slider::from_name)
}

/// Value following the flag at `args[*i]`, advancing `i`.
pub fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(|s| s.as_str())
        .ok_or_else(|| format!("{} requires a value", flag))
}

/// Parse one slider value in [0, 100].
pub fn parse_slider_value(flag: &str, value: &str) -> Result<f64, String> {
    let v: f64 = value
        .parse()
        .map_err(|_| format!("{} expects a number, got '{}'", flag, value))?;
    if !(0.0..=100.0).contains(&v) {
        return Err(format!("{} must be between 0 and 100, got {}", flag, v));
    }
    Ok(v)
}

/// Parse `--sliders c,s,d,ch,q,r` (six comma-separated values in display
/// order).
pub fn parse_slider_list(value: &str) -> Result<SliderState, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != Slider::all().len() {
        return Err(format!(
            "--sliders expects {} comma-separated values (complexity,softness,display,chaos,quirk,rest), got {}",
            Slider::all().len(),
            parts.len()
        ));
    }

    let mut sliders = SliderState::default();
    for (slider, part) in Slider::all().iter().zip(parts) {
        sliders.set(*slider, parse_slider_value(slider.name(), part)?);
    }
    Ok(sliders)
}

/// Handle a slider flag at `args[*i]` if it is one. Returns `Ok(false)` for
/// anything else so the caller can keep matching.
pub fn apply_slider_arg(args: &[String], i: &mut usize, sliders: &mut SliderState) -> Result<bool, String> {
    let flag = args[*i].as_str();
    if flag == "--sliders" {
        let value = next_value(args, i, flag)?;
        *sliders = parse_slider_list(value)?;
        return Ok(true);
    }
    if let Some(slider) = slider_flag(flag) {
        let value = next_value(args, i, flag)?;
        sliders.set(slider, parse_slider_value(flag, value)?);
        return Ok(true);
    }
    Ok(false)
}

/// Type headline, dot stats and the two description lines.
pub fn result_view_lines(kind: &LeopardType, sliders: &SliderState) -> Vec<String> {
    let mut lines = vec![kind.name.clone(), String::new()];
    for slider in Slider::all() {
        lines.push(format!("{:<9} {}", slider.label(), to_dots(sliders.get(*slider))));
    }
    lines.push(String::new());
    lines.push(kind.line1.clone());
    lines.push(kind.line2.clone());
    lines
}

pub fn result_view(kind: &LeopardType, sliders: &SliderState) -> String {
    result_view_lines(kind, sliders).join("\n")
}

/// Archive list time stamp, `yy.mm.dd HH:MM` in local time.
pub fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(t) => t.format("%y.%m.%d %H:%M").to_string(),
        None => "--.--.-- --:--".to_string(),
    }
}

/// Write command output to a file, or stdout for `None` / `-`.
pub fn write_output(path: Option<&str>, content: &str) -> Result<(), String> {
    match path {
        Some("-") | None => {
            println!("{}", content);
            Ok(())
        }
        Some(path) => {
            fs::write(path, content).map_err(|e| format!("Failed to write {}: {}", path, e))?;
            eprintln!("Wrote: {}", path);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn slider_flags_are_recognized() {
        assert_eq!(slider_flag("--chaos"), Some(Slider::Chaos));
        assert_eq!(slider_flag("--Rest"), Some(Slider::Rest));
        assert_eq!(slider_flag("chaos"), None);
        assert_eq!(slider_flag("--seed"), None);
    }

    #[test]
    fn apply_single_slider() {
        let a = args(&["--quirk", "75"]);
        let mut sliders = default_sliders();
        let mut i = 0;
        assert!(apply_slider_arg(&a, &mut i, &mut sliders).unwrap());
        assert_eq!(i, 1);
        assert_eq!(sliders.quirk, 75.0);
        assert_eq!(sliders.chaos, DEFAULT_SLIDER_VALUE);
    }

    #[test]
    fn apply_slider_list() {
        let a = args(&["--sliders", "1, 2,3,4,5,6"]);
        let mut sliders = default_sliders();
        let mut i = 0;
        assert!(apply_slider_arg(&a, &mut i, &mut sliders).unwrap());
        assert_eq!(sliders.complexity, 1.0);
        assert_eq!(sliders.rest, 6.0);
    }

    #[test]
    fn rejects_out_of_range_and_missing_values() {
        let mut sliders = default_sliders();
        let mut i = 0;
        assert!(apply_slider_arg(&args(&["--chaos", "101"]), &mut i, &mut sliders).is_err());
        i = 0;
        assert!(apply_slider_arg(&args(&["--chaos"]), &mut i, &mut sliders).is_err());
        assert!(parse_slider_list("1,2,3").is_err());
    }

    #[test]
    fn other_flags_pass_through() {
        let mut sliders = default_sliders();
        let mut i = 0;
        assert!(!apply_slider_arg(&args(&["--seed", "4"]), &mut i, &mut sliders).unwrap());
        assert_eq!(i, 0);
    }

    #[test]
    fn result_view_layout() {
        let sliders = SliderState::uniform(50.0);
        let kind = leopard::classify(&sliders);
        let lines = result_view_lines(&kind, &sliders);
        assert_eq!(lines[0], "Steady Gaze Leopard");
        assert_eq!(lines[2], "Vitality  ●●●○○");
        assert_eq!(lines.len(), 2 + 6 + 3);
        assert_eq!(lines.last(), Some(&kind.line2));
    }
}
