//! Controller state snapshots and miss outcomes

use rewind_common::events::SuppressReason;
use serde::{Deserialize, Serialize};

use super::clock::SeekCommand;

/// Debounce phase of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Misses are considered (subject to invulnerability)
    Idle,
    /// A seek was issued less than one debounce delay ago; misses are ignored
    Rewinding,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Rewinding => write!(f, "rewinding"),
        }
    }
}

/// Point-in-time copy of the controller's mutable state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerState {
    /// Latest clock sample (milliseconds)
    pub current_time_ms: f64,

    /// Misses before this position are ignored (milliseconds)
    pub invulnerable_until_ms: f64,

    /// True while the debounce window is open
    pub debounce_active: bool,
}

impl ControllerState {
    pub fn phase(&self) -> Phase {
        if self.debounce_active {
            Phase::Rewinding
        } else {
            Phase::Idle
        }
    }

    pub fn is_invulnerable(&self) -> bool {
        self.current_time_ms < self.invulnerable_until_ms
    }
}

/// Result of delivering one miss signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MissOutcome {
    /// Miss accepted; this seek was sent to the clock
    Rewound(SeekCommand),
    /// Miss ignored; no state changed
    Suppressed(SuppressReason),
}

impl MissOutcome {
    pub fn seek(&self) -> Option<SeekCommand> {
        match self {
            MissOutcome::Rewound(cmd) => Some(*cmd),
            MissOutcome::Suppressed(_) => None,
        }
    }
}

/// Running counters for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerStats {
    pub misses_seen: u64,
    pub rewinds_issued: u64,
    pub suppressed_debounce: u64,
    pub suppressed_invulnerable: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_follows_debounce_flag() {
        let mut state = ControllerState {
            current_time_ms: 0.0,
            invulnerable_until_ms: 0.0,
            debounce_active: false,
        };
        assert_eq!(state.phase(), Phase::Idle);

        state.debounce_active = true;
        assert_eq!(state.phase(), Phase::Rewinding);
    }

    #[test]
    fn test_invulnerable_is_strict() {
        let state = ControllerState {
            current_time_ms: 8500.0,
            invulnerable_until_ms: 8500.0,
            debounce_active: false,
        };
        assert!(!state.is_invulnerable());

        let state = ControllerState {
            current_time_ms: 8499.0,
            ..state
        };
        assert!(state.is_invulnerable());
    }

    #[test]
    fn test_outcome_seek() {
        let cmd = SeekCommand { target_time_ms: 7000.0 };
        assert_eq!(MissOutcome::Rewound(cmd).seek(), Some(cmd));
        assert_eq!(MissOutcome::Suppressed(SuppressReason::Debounce).seek(), None);
    }
}
