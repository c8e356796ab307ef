//! Miss detection from the scoring stream
//!
//! Detectors are pure: they report "combo broke" for every notification that
//! looks like one, including notifications caused by the controller's own
//! seek re-scoring the history. Filtering those is the controller's job.

use rewind_common::events::{HitEvent, HitResult};

/// Combo-break predicate supplied by the scoring rules
pub type ComboBreakPredicate = fn(HitResult) -> bool;

/// Inspects the last entry of the scoring history
#[derive(Debug, Clone, Copy)]
pub struct MissDetector {
    predicate: ComboBreakPredicate,
}

impl MissDetector {
    /// Detector using `HitResult::breaks_combo`
    pub fn new() -> Self {
        Self::with_predicate(HitResult::breaks_combo)
    }

    pub fn with_predicate(predicate: ComboBreakPredicate) -> Self {
        Self { predicate }
    }

    /// Whether the most recent hit in `history` broke combo
    pub fn evaluate(&self, history: &[HitEvent]) -> bool {
        self.evaluate_latest(history.last())
    }

    /// Same as `evaluate`, for hosts that only forward the newest entry
    pub fn evaluate_latest(&self, latest: Option<&HitEvent>) -> bool {
        latest.is_some_and(|hit| (self.predicate)(hit.result))
    }
}

impl Default for MissDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Reports a miss when the combo counter drops to zero
///
/// Fires on the transition only, like a value-changed notification: a
/// repeated zero (or a session that starts at zero) does not fire again.
#[derive(Debug, Clone, Default)]
pub struct ComboResetDetector {
    last_combo: Option<u32>,
}

impl ComboResetDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_combo(&mut self, combo: u32) -> bool {
        let previous = self.last_combo.replace(combo);
        combo == 0 && previous.is_some_and(|p| p > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(results: &[HitResult]) -> Vec<HitEvent> {
        results
            .iter()
            .enumerate()
            .map(|(i, r)| HitEvent::new(*r, i as f64 * 100.0))
            .collect()
    }

    #[test]
    fn test_empty_history_is_not_a_miss() {
        assert!(!MissDetector::new().evaluate(&[]));
        assert!(!MissDetector::new().evaluate_latest(None));
    }

    #[test]
    fn test_only_last_entry_matters() {
        let detector = MissDetector::new();
        assert!(detector.evaluate(&history(&[HitResult::Great, HitResult::Miss])));
        assert!(!detector.evaluate(&history(&[HitResult::Miss, HitResult::Great])));
    }

    #[test]
    fn test_non_combo_misses_ignored() {
        let detector = MissDetector::new();
        assert!(!detector.evaluate(&history(&[HitResult::SmallTickMiss])));
        assert!(detector.evaluate(&history(&[HitResult::LargeTickMiss])));
    }

    #[test]
    fn test_repeated_evaluation_repeats_signal() {
        // Re-scoring notifications with an unchanged tail still report
        let detector = MissDetector::new();
        let h = history(&[HitResult::Miss]);
        assert!(detector.evaluate(&h));
        assert!(detector.evaluate(&h));
    }

    #[test]
    fn test_custom_predicate() {
        let detector = MissDetector::with_predicate(|r| !r.is_hit());
        assert!(detector.evaluate(&history(&[HitResult::SmallTickMiss])));
    }

    #[test]
    fn test_combo_reset_transition() {
        let mut detector = ComboResetDetector::new();
        assert!(!detector.on_combo(0));
        assert!(!detector.on_combo(1));
        assert!(!detector.on_combo(5));
        assert!(detector.on_combo(0));
        assert!(!detector.on_combo(0));
        assert!(!detector.on_combo(1));
        assert!(detector.on_combo(0));
    }
}
