//! Slider state, quality tiers and the slider -> engine parameter mapping.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Site cap for interactive (low quality) renders.
pub const LOW_QUALITY_MAX_SITES: usize = 40;

/// Site cap for final (high quality) renders.
pub const HIGH_QUALITY_MAX_SITES: usize = 80;

/// The six user-facing sliders, each nominally in [0, 100].
///
/// Missing fields deserialize as 0 so partially filled archive records
/// still load.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderState {
    pub complexity: f64,
    pub softness: f64,
    pub display: f64,
    pub chaos: f64,
    pub quirk: f64,
    pub rest: f64,
}

/// Identifies one slider, for UIs that edit them generically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slider {
    Complexity,
    Softness,
    Display,
    Chaos,
    Quirk,
    Rest,
}

impl Slider {
    /// All sliders in display order.
    pub fn all() -> &'static [Slider] {
        &[
            Slider::Complexity,
            Slider::Softness,
            Slider::Display,
            Slider::Chaos,
            Slider::Quirk,
            Slider::Rest,
        ]
    }

    /// Field name as used in JSON and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Slider::Complexity => "complexity",
            Slider::Softness => "softness",
            Slider::Display => "display",
            Slider::Chaos => "chaos",
            Slider::Quirk => "quirk",
            Slider::Rest => "rest",
        }
    }

    /// Human label shown next to the stat dots.
    pub fn label(&self) -> &'static str {
        match self {
            Slider::Complexity => "Vitality",
            Slider::Softness => "Softness",
            Slider::Display => "Display",
            Slider::Chaos => "Chaos",
            Slider::Quirk => "Quirk",
            Slider::Rest => "Rest",
        }
    }

    pub fn from_name(name: &str) -> Option<Slider> {
        Slider::all()
            .iter()
            .copied()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }
}

impl SliderState {
    /// Every slider at the same value.
    pub fn uniform(value: f64) -> Self {
        Self {
            complexity: value,
            softness: value,
            display: value,
            chaos: value,
            quirk: value,
            rest: value,
        }
    }

    pub fn get(&self, slider: Slider) -> f64 {
        match slider {
            Slider::Complexity => self.complexity,
            Slider::Softness => self.softness,
            Slider::Display => self.display,
            Slider::Chaos => self.chaos,
            Slider::Quirk => self.quirk,
            Slider::Rest => self.rest,
        }
    }

    pub fn set(&mut self, slider: Slider, value: f64) {
        let field = match slider {
            Slider::Complexity => &mut self.complexity,
            Slider::Softness => &mut self.softness,
            Slider::Display => &mut self.display,
            Slider::Chaos => &mut self.chaos,
            Slider::Quirk => &mut self.quirk,
            Slider::Rest => &mut self.rest,
        };
        *field = value;
    }

    /// Copy with every value clamped into [0, 100]. NaN becomes 0.
    pub fn clamped(&self) -> Self {
        let clamp = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) };
        Self {
            complexity: clamp(self.complexity),
            softness: clamp(self.softness),
            display: clamp(self.display),
            chaos: clamp(self.chaos),
            quirk: clamp(self.quirk),
            rest: clamp(self.rest),
        }
    }
}

/// Render fidelity. Only affects site density and the site cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// Interactive preview: half density, capped at 40 sites.
    Low,
    /// Final generation: full density, capped at 80 sites.
    #[default]
    High,
}

impl Quality {
    pub fn name(&self) -> &'static str {
        match self {
            Quality::Low => "low",
            Quality::High => "high",
        }
    }

    pub fn density_factor(&self) -> f64 {
        match self {
            Quality::Low => 0.5,
            Quality::High => 1.0,
        }
    }

    pub fn max_sites(&self) -> usize {
        match self {
            Quality::Low => LOW_QUALITY_MAX_SITES,
            Quality::High => HIGH_QUALITY_MAX_SITES,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Quality::Low),
            "high" => Ok(Quality::High),
            other => Err(format!("unknown quality '{}': use 'low' or 'high'", other)),
        }
    }
}

/// Engine parameters derived from a slider snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineParams {
    /// Number of sites, already capped for the quality tier.
    pub count: usize,
    /// Corner rounding radius in pixels.
    pub round: f64,
    /// Ring band width (percent of the cell radius).
    pub band: f64,
    /// Cell inset distance; negative values make neighbours overlap.
    pub gap: f64,
    /// Turbulence strength, 0-100.
    pub turb: f64,
    /// Displacement strength, 0-100.
    pub disp: f64,
}

/// Map a slider snapshot to engine parameters.
///
/// Pure and total. Sliders are expected in [0, 100]; callers holding
/// untrusted values should pass `sliders.clamped()`.
pub fn map_parameters(sliders: &SliderState, quality: Quality) -> EngineParams {
    let raw = ((10.0 + sliders.complexity * 1.1) * quality.density_factor()).round();
    // `as usize` saturates: negative and NaN become 0
    let count = (raw as usize).min(quality.max_sites());

    EngineParams {
        count,
        round: sliders.softness / 100.0 * 40.0,
        band: 5.0 + sliders.display / 100.0 * 30.0,
        gap: -10.0 + sliders.rest / 100.0 * 30.0,
        turb: sliders.chaos,
        disp: sliders.quirk,
    }
}

/// Render a slider value as five dots, e.g. `●●●○○`.
///
/// Always shows at least one and at most five filled dots.
pub fn to_dots(value: f64) -> String {
    let n = ((value / 20.0).round() as i64).clamp(1, 5) as usize;
    format!("{}{}", "●".repeat(n), "○".repeat(5 - n))
}
