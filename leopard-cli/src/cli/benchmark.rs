//! Benchmark command implementation.

use std::time::Instant;

use leopard::{render_with, Lcg, Quality, SliderState};

use super::common::{apply_slider_arg, next_value};

/// One interactive frame at 60 Hz.
pub const FRAME_BUDGET_MS: f64 = 16.7;

/// Timing of repeated renders for one quality tier.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkResult {
    pub quality: Quality,
    pub iterations: usize,
    pub avg_ms: f64,
    pub worst_ms: f64,
    pub avg_shapes: f64,
}

impl BenchmarkResult {
    pub fn within_budget(&self) -> bool {
        self.worst_ms <= FRAME_BUDGET_MS
    }
}

/// Render `iterations` scenes (and their SVG) with a seeded source.
pub fn run_benchmark(sliders: &SliderState, quality: Quality, iterations: usize, seed: u64) -> BenchmarkResult {
    let mut rng = Lcg::new(seed);
    let mut total_ms = 0.0;
    let mut worst_ms: f64 = 0.0;
    let mut total_shapes = 0usize;

    for _ in 0..iterations {
        let start = Instant::now();
        let scene = render_with(sliders, quality, &mut rng);
        let svg = scene.to_svg();
        let ms = start.elapsed().as_secs_f64() * 1000.0;

        std::hint::black_box(svg);
        total_ms += ms;
        worst_ms = worst_ms.max(ms);
        total_shapes += scene.len();
    }

    let n = iterations.max(1) as f64;
    BenchmarkResult {
        quality,
        iterations,
        avg_ms: total_ms / n,
        worst_ms,
        avg_shapes: total_shapes as f64 / n,
    }
}

/// Execute the benchmark command.
pub fn cmd_benchmark(args: &[String]) -> Result<(), String> {
    // Densest setting by default
    let mut sliders = SliderState { complexity: 100.0, ..SliderState::uniform(50.0) };
    let mut iterations = 100usize;
    let mut seed = 42u64;

    let mut i = 0;
    while i < args.len() {
        if !apply_slider_arg(args, &mut i, &mut sliders)? {
            match args[i].as_str() {
                "-n" | "--iterations" => {
                    let value = next_value(args, &mut i, "--iterations")?;
                    iterations = value.parse().map_err(|_| format!("--iterations expects a number, got '{}'", value))?;
                }
                "--seed" => {
                    let value = next_value(args, &mut i, "--seed")?;
                    seed = value.parse().map_err(|_| format!("--seed expects an integer, got '{}'", value))?;
                }
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("Unknown option: {}", other)),
            }
        }
        i += 1;
    }

    if iterations == 0 {
        return Err("--iterations must be at least 1".to_string());
    }

    println!();
    println!("═══════════════════════════════════════════════");
    println!("  LEOPARD BENCHMARK ({} renders per tier)", iterations);
    println!("═══════════════════════════════════════════════");

    for quality in [Quality::Low, Quality::High] {
        let result = run_benchmark(&sliders, quality, iterations, seed);
        let verdict = if result.within_budget() { "within" } else { "OVER" };
        println!("  {:<4}  sites cap {:>2}", quality.name().to_uppercase(), quality.max_sites());
        println!("        avg {:>7.3}ms  worst {:>7.3}ms  shapes {:>5.1}", result.avg_ms, result.worst_ms, result.avg_shapes);
        println!("        {} the {:.1}ms frame budget", verdict, FRAME_BUDGET_MS);
    }
    println!("═══════════════════════════════════════════════");
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: leopard benchmark [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -n, --iterations <n>   Renders per quality tier (default: 100)");
    eprintln!("  --seed <n>             Seed of the render source (default: 42)");
    eprintln!("  --complexity <n> ...   Slider overrides (default: complexity 100, others 50)");
    eprintln!();
    eprintln!("Times render + SVG serialization against the {:.1}ms frame budget.", FRAME_BUDGET_MS);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn benchmark_reports_sane_numbers() {
        let result = run_benchmark(&SliderState::uniform(50.0), Quality::Low, 3, 1);
        assert_eq!(result.iterations, 3);
        assert!(result.worst_ms >= result.avg_ms);
        assert!(result.avg_shapes <= Quality::Low.max_sites() as f64);
    }
}
