//! The persisted form of a generated leopard, plus archive ordering.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::classify::{classify, LeopardType};
use crate::params::{EngineParams, Quality, SliderState};
use crate::render::render_with;
use crate::svg::looks_like_scene;

/// One generated pattern as stored in the archive.
///
/// JSON keys are camelCase. Every field has a default so older or partial
/// records still load; whether they can be shown is decided by
/// [`GeneratedLeopard::is_showable`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedLeopard {
    /// Creation time, milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub sliders: SliderState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_params: Option<EngineParams>,
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default)]
    pub line1: String,
    #[serde(default)]
    pub line2: String,
    /// Full serialized scene.
    #[serde(default)]
    pub svg: String,
    /// `data:` URL of the scene, only present in shared archive entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl GeneratedLeopard {
    /// Render a final (high quality) scene for `sliders` and classify it.
    pub fn generate<R: Rng + ?Sized>(sliders: &SliderState, timestamp: i64, rng: &mut R) -> Self {
        let sliders = sliders.clamped();
        let scene = render_with(&sliders, Quality::High, rng);
        let kind = classify(&sliders);

        Self {
            timestamp,
            sliders,
            engine_params: Some(scene.params),
            type_name: kind.name,
            line1: kind.line1,
            line2: kind.line2,
            svg: scene.to_svg(),
            thumbnail_url: None,
        }
    }

    /// Only records carrying an actual scene document can be restored.
    pub fn is_showable(&self) -> bool {
        looks_like_scene(&self.svg)
    }

    /// Records appear in listings when they have a scene or at least a
    /// `data:` thumbnail.
    pub fn is_listable(&self) -> bool {
        self.is_showable()
            || self
                .thumbnail_url
                .as_deref()
                .is_some_and(|url| url.trim_start().starts_with("data:"))
    }

    pub fn leopard_type(&self) -> LeopardType {
        LeopardType {
            name: self.type_name.clone(),
            line1: self.line1.clone(),
            line2: self.line2.clone(),
        }
    }
}

/// Archive list ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    TimeDesc,
    TimeAsc,
    SoftDesc,
    SoftAsc,
    ChaosDesc,
    ChaosAsc,
    RestDesc,
    RestAsc,
}

impl SortMode {
    pub fn all() -> &'static [SortMode] {
        &[
            SortMode::TimeDesc,
            SortMode::TimeAsc,
            SortMode::SoftDesc,
            SortMode::SoftAsc,
            SortMode::ChaosDesc,
            SortMode::ChaosAsc,
            SortMode::RestDesc,
            SortMode::RestAsc,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            SortMode::TimeDesc => "time-desc",
            SortMode::TimeAsc => "time-asc",
            SortMode::SoftDesc => "soft-desc",
            SortMode::SoftAsc => "soft-asc",
            SortMode::ChaosDesc => "chaos-desc",
            SortMode::ChaosAsc => "chaos-asc",
            SortMode::RestDesc => "rest-desc",
            SortMode::RestAsc => "rest-asc",
        }
    }

    fn compare(&self, a: &GeneratedLeopard, b: &GeneratedLeopard) -> Ordering {
        match self {
            SortMode::TimeDesc => b.timestamp.cmp(&a.timestamp),
            SortMode::TimeAsc => a.timestamp.cmp(&b.timestamp),
            SortMode::SoftDesc => b.sliders.softness.total_cmp(&a.sliders.softness),
            SortMode::SoftAsc => a.sliders.softness.total_cmp(&b.sliders.softness),
            SortMode::ChaosDesc => b.sliders.chaos.total_cmp(&a.sliders.chaos),
            SortMode::ChaosAsc => a.sliders.chaos.total_cmp(&b.sliders.chaos),
            SortMode::RestDesc => b.sliders.rest.total_cmp(&a.sliders.rest),
            SortMode::RestAsc => a.sliders.rest.total_cmp(&b.sliders.rest),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortMode::all()
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<_> = SortMode::all().iter().map(|m| m.name()).collect();
                format!("unknown sort mode '{}': use one of {}", s, names.join(", "))
            })
    }
}

/// Stable sort in place; equal keys keep their archive order.
pub fn sort_records(records: &mut [GeneratedLeopard], mode: SortMode) {
    records.sort_by(|a, b| mode.compare(a, b));
}
