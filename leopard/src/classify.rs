//! Leopard "type" classification: a fixed-priority rule table over the six
//! sliders.

use serde::{Deserialize, Serialize};

use crate::params::SliderState;

/// Display name plus two descriptive lines for a slider combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeopardType {
    pub name: String,
    pub line1: String,
    pub line2: String,
}

impl LeopardType {
    fn new(name: &str, line1: &str, line2: &str) -> Self {
        Self {
            name: name.to_string(),
            line1: line1.to_string(),
            line2: line2.to_string(),
        }
    }
}

#[inline]
fn hi(v: f64) -> bool {
    v >= 60.0
}

#[inline]
fn lo(v: f64) -> bool {
    v <= 40.0
}

/// Classify a slider snapshot. The first matching rule wins; the last
/// entry is the fallback.
///
/// Names and description lines are English translations of the Korean
/// wording found in older archived records. Rules and their order are
/// unchanged, so such a record maps to the rule at the same position here.
pub fn classify(v: &SliderState) -> LeopardType {
    if hi(v.softness) && hi(v.display) && !hi(v.chaos) {
        return LeopardType::new(
            "Softly Present Leopard",
            "You feel gentle right now, yet you want to show a little of yourself.",
            "A leopard that quietly makes itself felt through soft blotches.",
        );
    }

    if hi(v.softness) && lo(v.display) && hi(v.rest) {
        return LeopardType::new(
            "Quietly Resting Leopard",
            "You seem warm, but you would like to hide away for a while.",
            "The pattern spreads softly while its voice stays low.",
        );
    }

    if lo(v.softness) && hi(v.display) && hi(v.chaos) {
        return LeopardType::new(
            "Firmly Expressive Leopard",
            "You want to speak clearly, and your energy is running high.",
            "Angular spots and strong contrast carve out a vivid presence.",
        );
    }

    if lo(v.softness) && lo(v.display) && hi(v.rest) {
        return LeopardType::new(
            "Calm Strength Leopard",
            "Quiet on the outside, firmly in order on the inside.",
            "A leopard with an inner weight that does not waver easily.",
        );
    }

    if hi(v.chaos) && hi(v.complexity) {
        return LeopardType::new(
            "Dense Current Leopard",
            "Thoughts, work and stimuli all seem to arrive at once.",
            "Layer upon layer of pattern, busy wherever you look.",
        );
    }

    if lo(v.chaos) && lo(v.complexity) && lo(v.display) {
        return LeopardType::new(
            "Serene Minimal Leopard",
            "You want to let go and keep only what truly matters.",
            "Sparse spots, but a calm leopard with the strength of empty space.",
        );
    }

    if !hi(v.complexity) && !lo(v.complexity) && hi(v.chaos) && hi(v.quirk) {
        return LeopardType::new(
            "Hazy Dream Leopard",
            "You are floating somewhere between reality and imagination.",
            "Spots scatter as they please, yet keep a dreamy balance.",
        );
    }

    if lo(v.display) && lo(v.chaos) && !hi(v.complexity) {
        return LeopardType::new(
            "Cool Balance Leopard",
            "Right now you lean more toward structure and balance than emotion.",
            "A restrained leopard that shows only what it needs to.",
        );
    }

    if hi(v.quirk) && hi(v.display) {
        return LeopardType::new(
            "Curious Incident Leopard",
            "Even in a quiet flow, small unexpected gaps pop up.",
            "Irregular changes sparkle between the spots.",
        );
    }

    LeopardType::new(
        "Steady Gaze Leopard",
        "A moment of observing your surroundings slowly, without strong feelings.",
        "Strong yet evenly spread, settling in plainly.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sliders(complexity: f64, softness: f64, display: f64, chaos: f64, quirk: f64, rest: f64) -> SliderState {
        SliderState { complexity, softness, display, chaos, quirk, rest }
    }

    #[test]
    fn softly_present() {
        let t = classify(&sliders(50.0, 80.0, 70.0, 10.0, 50.0, 50.0));
        assert_eq!(t.name, "Softly Present Leopard");
    }

    #[test]
    fn soft_present_blocked_by_high_chaos() {
        // hi softness + hi display but hi chaos falls through to "Dense Current"
        let t = classify(&sliders(90.0, 80.0, 70.0, 90.0, 50.0, 50.0));
        assert_eq!(t.name, "Dense Current Leopard");
    }

    #[test]
    fn quietly_resting() {
        let t = classify(&sliders(50.0, 70.0, 20.0, 50.0, 50.0, 80.0));
        assert_eq!(t.name, "Quietly Resting Leopard");
    }

    #[test]
    fn firmly_expressive() {
        let t = classify(&sliders(50.0, 10.0, 90.0, 90.0, 50.0, 50.0));
        assert_eq!(t.name, "Firmly Expressive Leopard");
    }

    #[test]
    fn calm_strength() {
        let t = classify(&sliders(50.0, 10.0, 10.0, 50.0, 50.0, 90.0));
        assert_eq!(t.name, "Calm Strength Leopard");
    }

    #[test]
    fn all_zero_is_serene_minimal() {
        let t = classify(&SliderState::uniform(0.0));
        assert_eq!(t.name, "Serene Minimal Leopard");
    }

    #[test]
    fn hazy_dream_needs_mid_complexity() {
        let t = classify(&sliders(50.0, 50.0, 50.0, 80.0, 80.0, 50.0));
        assert_eq!(t.name, "Hazy Dream Leopard");
    }

    #[test]
    fn cool_balance() {
        // lo display, lo chaos, mid complexity (not lo, so rule 6 is skipped)
        let t = classify(&sliders(50.0, 50.0, 20.0, 20.0, 50.0, 50.0));
        assert_eq!(t.name, "Cool Balance Leopard");
    }

    #[test]
    fn curious_incident() {
        let t = classify(&sliders(50.0, 50.0, 80.0, 50.0, 80.0, 50.0));
        assert_eq!(t.name, "Curious Incident Leopard");
    }

    #[test]
    fn middle_values_fall_back() {
        let t = classify(&SliderState::uniform(50.0));
        assert_eq!(t.name, "Steady Gaze Leopard");
        assert!(!t.line1.is_empty() && !t.line2.is_empty());
    }

    #[test]
    fn thresholds_are_inclusive() {
        // 60 counts as hi, 40 counts as lo
        let t = classify(&sliders(50.0, 60.0, 60.0, 40.0, 50.0, 50.0));
        assert_eq!(t.name, "Softly Present Leopard");
    }
}
