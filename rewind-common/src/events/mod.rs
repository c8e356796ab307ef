//! Event types for the rewind event system
//!
//! Provides the `RewindEvent` notifications and the `EventBus` the rewind
//! session publishes them on.

mod gameplay_types;

pub use gameplay_types::{HitEvent, HitResult};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Why a miss signal did not produce a rewind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressReason {
    /// A rewind was issued less than one debounce delay ago
    Debounce,
    /// Playback is still inside the grace period of the previous rewind
    Invulnerable,
}

impl std::fmt::Display for SuppressReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuppressReason::Debounce => write!(f, "debounce"),
            SuppressReason::Invulnerable => write!(f, "invulnerable"),
        }
    }
}

/// Rewind event types
///
/// Broadcast via `EventBus`; serializable so a host can forward them to a
/// UI or a log sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RewindEvent {
    /// Gameplay session began
    SessionStarted {
        session_id: Uuid,
        rewind_seconds: f64,
        grace_seconds: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A miss was accepted and a seek was sent to the playback clock
    ///
    /// Triggers:
    /// - UI: Flash the rewind indicator
    /// - Stats: Count retries of the section
    SeekIssued {
        session_id: Uuid,
        /// Clock position when the miss was accepted (milliseconds)
        from_time_ms: f64,
        /// Seek target (milliseconds, never negative)
        target_time_ms: f64,
        /// Misses before this position are ignored until here (milliseconds)
        invulnerable_until_ms: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A miss signal arrived but was ignored
    MissSuppressed {
        session_id: Uuid,
        reason: SuppressReason,
        current_time_ms: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Debounce window elapsed; the controller accepts misses again
    ///
    /// Emitted from the timer context, so it may interleave with tick-driven
    /// events.
    DebounceReleased {
        session_id: Uuid,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Gameplay session finished
    SessionEnded {
        session_id: Uuid,
        misses_seen: u64,
        rewinds_issued: u64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl RewindEvent {
    /// Session this event belongs to
    pub fn session_id(&self) -> Uuid {
        match self {
            RewindEvent::SessionStarted { session_id, .. }
            | RewindEvent::SeekIssued { session_id, .. }
            | RewindEvent::MissSuppressed { session_id, .. }
            | RewindEvent::DebounceReleased { session_id, .. }
            | RewindEvent::SessionEnded { session_id, .. } => *session_id,
        }
    }
}

// ========================================
// EventBus Implementation
// ========================================

/// Event distribution bus for rewind notifications
///
/// Uses tokio::broadcast internally:
/// - Non-blocking publish (slow subscribers don't block the gameplay loop)
/// - Multiple concurrent subscribers
/// - Lagged message detection for slow subscribers
///
/// # Examples
///
/// ```
/// use rewind_common::events::{EventBus, RewindEvent};
/// use uuid::Uuid;
///
/// let event_bus = EventBus::new(100);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit_lossy(RewindEvent::DebounceReleased {
///     session_id: Uuid::new_v4(),
///     timestamp: rewind_common::time::now(),
/// });
///
/// assert!(matches!(rx.try_recv(), Ok(RewindEvent::DebounceReleased { .. })));
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<RewindEvent>,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<RewindEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: RewindEvent,
    ) -> Result<usize, broadcast::error::SendError<RewindEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: RewindEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seek_event(session_id: Uuid) -> RewindEvent {
        RewindEvent::SeekIssued {
            session_id,
            from_time_ms: 10_000.0,
            target_time_ms: 7_000.0,
            invulnerable_until_ms: 8_500.0,
            timestamp: crate::time::now(),
        }
    }

    #[test]
    fn test_emit_without_subscribers_fails() {
        let bus = EventBus::new(10);
        assert!(bus.emit(seek_event(Uuid::new_v4())).is_err());
        // Lossy variant never reports
        bus.emit_lossy(seek_event(Uuid::new_v4()));
    }

    #[tokio::test]
    async fn test_subscriber_receives_event() {
        let bus = EventBus::new(10);
        let mut rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        let session_id = Uuid::new_v4();
        assert_eq!(bus.emit(seek_event(session_id)).unwrap(), 1);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.session_id(), session_id);
        match received {
            RewindEvent::SeekIssued { target_time_ms, .. } => assert_eq!(target_time_ms, 7_000.0),
            other => panic!("Expected SeekIssued, got {:?}", other),
        }
    }

    #[test]
    fn test_serialized_tag() {
        let event = RewindEvent::MissSuppressed {
            session_id: Uuid::nil(),
            reason: SuppressReason::Invulnerable,
            current_time_ms: 1234.0,
            timestamp: crate::time::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "MissSuppressed");
        assert_eq!(json["reason"], "invulnerable");
    }
}
