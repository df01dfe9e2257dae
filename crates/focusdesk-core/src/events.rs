use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Mode, TimerSettings};

/// Every timer transition produces an Event.
/// Display surfaces poll for events; audio/notification collaborators
/// subscribe to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Mode changed by a manual switch. Manual switches never auto-start
    /// unless the caller asked for it.
    ModeChanged {
        mode: Mode,
        auto_start: bool,
        at: DateTime<Utc>,
    },
    TimerStarted {
        mode: Mode,
        time_left_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: Mode,
        time_left_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: Mode,
        at: DateTime<Utc>,
    },
    /// A segment ran down to zero. The next mode is already entered and
    /// running by the time this event is observed.
    SegmentCompleted {
        completed: Mode,
        next: Mode,
        session_count: u32,
        at: DateTime<Utc>,
    },
    SettingsUpdated {
        settings: TimerSettings,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: Mode,
        time_left_secs: u32,
        total_secs: u32,
        is_running: bool,
        session_count: u32,
        at: DateTime<Utc>,
    },
}
