//! Scripted player and scoring history
//!
//! Judges each object once playback passes it. A backward seek undoes every
//! judgement at or after the seek target, so those objects are judged again.

use std::collections::HashMap;

use rewind_common::events::{HitEvent, HitResult};

use super::chart::Chart;

/// One judgement together with the combo after applying it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Judgement {
    pub hit: HitEvent,
    pub combo: u32,
}

#[derive(Debug, Clone)]
pub struct Playfield {
    objects: Vec<f64>,
    /// Index of the next unjudged object
    next_object: usize,
    /// Remaining scripted misses per object index
    misses_left: HashMap<usize, u32>,
    history: Vec<HitEvent>,
    combo: u32,
    max_combo: u32,
}

impl Playfield {
    pub fn new(chart: &Chart) -> Self {
        let mut misses_left = HashMap::new();
        for miss in &chart.misses {
            *misses_left.entry(miss.index).or_insert(0) += miss.times;
        }

        Self {
            objects: chart.objects.clone(),
            next_object: 0,
            misses_left,
            history: Vec::with_capacity(chart.objects.len()),
            combo: 0,
            max_combo: 0,
        }
    }

    /// Judge every object at or before `time_ms`
    pub fn judge_until(&mut self, time_ms: f64) -> Vec<Judgement> {
        let mut judged = Vec::new();

        while let Some(&object_time) = self.objects.get(self.next_object) {
            if object_time > time_ms {
                break;
            }

            let result = match self.misses_left.get_mut(&self.next_object) {
                Some(left) if *left > 0 => {
                    *left -= 1;
                    HitResult::Miss
                }
                _ => HitResult::Great,
            };

            let hit = HitEvent::new(result, object_time);
            self.apply(hit);
            self.next_object += 1;

            judged.push(Judgement {
                hit,
                combo: self.combo,
            });
        }

        judged
    }

    fn apply(&mut self, hit: HitEvent) {
        self.history.push(hit);
        if hit.result.breaks_combo() {
            self.combo = 0;
        } else if hit.result.affects_combo() && hit.result.is_hit() {
            self.combo += 1;
            self.max_combo = self.max_combo.max(self.combo);
        }
    }

    /// Undo judgements at or after `target_ms`
    pub fn rewind_to(&mut self, target_ms: f64) {
        self.history.retain(|h| h.time_ms < target_ms);
        self.next_object = self.objects.partition_point(|t| *t < target_ms);
        self.combo = Self::trailing_combo(&self.history);
    }

    fn trailing_combo(history: &[HitEvent]) -> u32 {
        history
            .iter()
            .rev()
            .take_while(|h| !h.result.breaks_combo())
            .filter(|h| h.result.affects_combo() && h.result.is_hit())
            .count() as u32
    }

    pub fn history(&self) -> &[HitEvent] {
        &self.history
    }

    pub fn latest(&self) -> Option<HitEvent> {
        self.history.last().copied()
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn is_complete(&self) -> bool {
        self.next_object >= self.objects.len()
    }

    /// Misses still recorded in the history
    pub fn miss_count(&self) -> usize {
        self.history.iter().filter(|h| h.result.breaks_combo()).count()
    }
}
