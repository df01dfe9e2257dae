//! Timer engine implementation.
//!
//! The engine is a caller-driven countdown state machine. It owns no thread
//! and no interval: the host calls `tick()` whenever it wants progress, and
//! remaining time is recomputed from the elapsed time since the last anchor
//! rather than decremented per callback, so irregular tick cadence and host
//! suspension cannot drift the countdown.
//!
//! ## State machine
//!
//! States are {Focus, ShortBreak, LongBreak} x {running, stopped}, starting
//! at (Focus, stopped). There is no terminal state. Transitions:
//!
//! - `switch_mode` -- any mode to any mode, running per the caller's flag
//! - `toggle` -- running <-> stopped within the current mode
//! - segment completion (inside `tick`) -- the only automatic progression,
//!   always entering the next mode running

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::settings::TimerSettings;
use super::Mode;
use crate::error::Result;
use crate::events::Event;

/// Core timer engine.
///
/// Serializable so a CLI invocation can park it in the kv store and the next
/// invocation can pick the countdown back up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    settings: TimerSettings,
    mode: Mode,
    /// Remaining time in milliseconds for the current segment.
    remaining_ms: u64,
    is_running: bool,
    /// Completed Focus segments since engine creation.
    session_count: u32,
    /// Epoch ms at the last flush while running. None while stopped, so
    /// time spent paused never counts against the segment.
    #[serde(default)]
    last_tick_epoch_ms: Option<u64>,
}

impl TimerEngine {
    /// Create an engine in (Focus, stopped) with the full focus duration.
    pub fn new(settings: TimerSettings) -> Self {
        let remaining_ms = duration_ms(&settings, Mode::Focus);
        Self {
            settings,
            mode: Mode::Focus,
            remaining_ms,
            is_running: false,
            session_count: 0,
            last_tick_epoch_ms: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn session_count(&self) -> u32 {
        self.session_count
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    /// Whole seconds left, rounded up so a fresh segment shows its full
    /// duration until an entire second has elapsed.
    pub fn time_left_secs(&self) -> u32 {
        self.remaining_ms.div_ceil(1000) as u32
    }

    pub fn total_secs(&self) -> u32 {
        self.settings.duration_for(self.mode)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.mode,
            time_left_secs: self.time_left_secs(),
            total_secs: self.total_secs(),
            is_running: self.is_running,
            session_count: self.session_count,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Switch to `target`, resetting the countdown to its full duration.
    /// Always legal. Manual switches never auto-start unless asked.
    pub fn switch_mode(&mut self, target: Mode, auto_start: bool) -> Event {
        self.mode = target;
        self.remaining_ms = duration_ms(&self.settings, target);
        self.is_running = auto_start;
        self.last_tick_epoch_ms = auto_start.then(now_ms);
        Event::ModeChanged {
            mode: target,
            auto_start,
            at: Utc::now(),
        }
    }

    /// Flip running/stopped. Starting anchors elapsed-time measurement at
    /// now; stopping flushes and freezes the remaining time.
    pub fn toggle(&mut self) -> Event {
        if self.is_running {
            self.flush_elapsed();
            self.is_running = false;
            self.last_tick_epoch_ms = None;
            Event::TimerPaused {
                mode: self.mode,
                time_left_secs: self.time_left_secs(),
                at: Utc::now(),
            }
        } else {
            self.is_running = true;
            self.last_tick_epoch_ms = Some(now_ms());
            Event::TimerStarted {
                mode: self.mode,
                time_left_secs: self.time_left_secs(),
                at: Utc::now(),
            }
        }
    }

    /// Reset the countdown to the full duration of `mode` (or the current
    /// mode). Changing to a different mode stops the clock; resetting in
    /// place keeps the running flag and re-anchors.
    pub fn reset(&mut self, mode: Option<Mode>) -> Event {
        if let Some(m) = mode {
            if m != self.mode {
                self.mode = m;
                self.is_running = false;
                self.last_tick_epoch_ms = None;
            }
        }
        self.remaining_ms = duration_ms(&self.settings, self.mode);
        if self.is_running {
            self.last_tick_epoch_ms = Some(now_ms());
        }
        Event::TimerReset {
            mode: self.mode,
            at: Utc::now(),
        }
    }

    /// Replace the settings wholesale. Rejects invalid settings without
    /// touching any state; on success the timer stops and the current
    /// mode's countdown resets to the new duration.
    pub fn update_settings(&mut self, new_settings: TimerSettings) -> Result<Event> {
        new_settings.validate()?;
        self.settings = new_settings;
        self.is_running = false;
        self.last_tick_epoch_ms = None;
        self.remaining_ms = duration_ms(&self.settings, self.mode);
        Ok(Event::SettingsUpdated {
            settings: new_settings,
            at: Utc::now(),
        })
    }

    /// Recompute remaining time; returns the completion event when the
    /// segment ran down. A host suspension longer than the segment yields
    /// exactly one completion -- the countdown never "catches up".
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_running {
            return None;
        }
        self.flush_elapsed();
        if self.remaining_ms == 0 {
            return Some(self.complete_segment());
        }
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// The sole source of automatic mode progression. A completed Focus
    /// segment bumps the session count and every `long_break_interval`-th
    /// one earns the long break; breaks always hand back to Focus. The
    /// next segment starts running.
    fn complete_segment(&mut self) -> Event {
        let completed = self.mode;
        let next = match self.mode {
            Mode::Focus => {
                self.session_count += 1;
                if self.session_count % self.settings.long_break_interval == 0 {
                    Mode::LongBreak
                } else {
                    Mode::ShortBreak
                }
            }
            Mode::ShortBreak | Mode::LongBreak => Mode::Focus,
        };
        self.mode = next;
        self.remaining_ms = duration_ms(&self.settings, next);
        self.is_running = true;
        self.last_tick_epoch_ms = Some(now_ms());
        Event::SegmentCompleted {
            completed,
            next,
            session_count: self.session_count,
            at: Utc::now(),
        }
    }

    fn flush_elapsed(&mut self) {
        if let Some(last) = self.last_tick_epoch_ms {
            let now = now_ms();
            let elapsed = now.saturating_sub(last);
            self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);
            self.last_tick_epoch_ms = Some(now);
        }
    }
}

fn duration_ms(settings: &TimerSettings, mode: Mode) -> u64 {
    u64::from(settings.duration_for(mode)).saturating_mul(1000)
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
