//! `params` and `type` commands: look at the mapping without rendering.

use serde_json::json;

use leopard::{classify, map_parameters, Quality};

use super::common::{apply_slider_arg, default_sliders, result_view};

/// Execute the params command: engine parameters for both tiers as JSON.
pub fn cmd_params(args: &[String]) -> Result<(), String> {
    let mut sliders = default_sliders();

    let mut i = 0;
    while i < args.len() {
        if !apply_slider_arg(args, &mut i, &mut sliders)? {
            match args[i].as_str() {
                "-h" | "--help" => {
                    eprintln!("Usage: leopard params [--complexity n ... | --sliders c,s,d,ch,q,r]");
                    return Ok(());
                }
                other => return Err(format!("Unknown option: {}", other)),
            }
        }
        i += 1;
    }

    let out = json!({
        "sliders": sliders,
        "low": map_parameters(&sliders, Quality::Low),
        "high": map_parameters(&sliders, Quality::High),
    });
    let text = serde_json::to_string_pretty(&out).map_err(|e| format!("Failed to serialize: {}", e))?;
    println!("{}", text);
    Ok(())
}

/// Execute the type command: classification and stats for a slider set.
pub fn cmd_type(args: &[String]) -> Result<(), String> {
    let mut sliders = default_sliders();
    let mut as_json = false;

    let mut i = 0;
    while i < args.len() {
        if !apply_slider_arg(args, &mut i, &mut sliders)? {
            match args[i].as_str() {
                "--json" => as_json = true,
                "-h" | "--help" => {
                    eprintln!("Usage: leopard type [--complexity n ... | --sliders c,s,d,ch,q,r] [--json]");
                    return Ok(());
                }
                other => return Err(format!("Unknown option: {}", other)),
            }
        }
        i += 1;
    }

    let kind = classify(&sliders);
    if as_json {
        let text = serde_json::to_string_pretty(&kind).map_err(|e| format!("Failed to serialize: {}", e))?;
        println!("{}", text);
    } else {
        println!("{}", result_view(&kind, &sliders));
    }
    Ok(())
}
