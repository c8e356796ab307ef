//! Scoring types shared by the miss detector and the simulator

use serde::{Deserialize, Serialize};

/// Judgement assigned to a single hit object or tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitResult {
    /// Object not hit at all
    Miss,
    Meh,
    Ok,
    Good,
    Great,
    Perfect,
    /// Slider head/repeat/tail tick missed
    LargeTickMiss,
    LargeTickHit,
    /// Slider body tick missed (costs accuracy, not combo)
    SmallTickMiss,
    SmallTickHit,
    /// Miss that carries no scoring weight (e.g. a spinner bonus)
    IgnoreMiss,
    IgnoreHit,
}

impl HitResult {
    /// Whether this result resets the player's combo
    pub fn breaks_combo(self) -> bool {
        matches!(self, HitResult::Miss | HitResult::LargeTickMiss)
    }

    /// Whether this result counts as a successful hit
    pub fn is_hit(self) -> bool {
        !matches!(
            self,
            HitResult::Miss
                | HitResult::LargeTickMiss
                | HitResult::SmallTickMiss
                | HitResult::IgnoreMiss
        )
    }

    /// Whether this result contributes to the combo counter
    pub fn affects_combo(self) -> bool {
        !matches!(
            self,
            HitResult::SmallTickMiss
                | HitResult::SmallTickHit
                | HitResult::IgnoreMiss
                | HitResult::IgnoreHit
        )
    }
}

/// One entry of the ordered scoring history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitEvent {
    /// Judgement
    pub result: HitResult,

    /// Gameplay time of the judged object (milliseconds)
    pub time_ms: f64,
}

impl HitEvent {
    pub fn new(result: HitResult, time_ms: f64) -> Self {
        Self { result, time_ms }
    }
}
