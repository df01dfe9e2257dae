//! User-configurable segment durations.
//!
//! Durations are whole seconds everywhere inside the engine. The remote
//! `timer_settings` table stores minutes (the hosted schema predates this
//! crate), so the conversion happens only at that boundary and sub-minute
//! precision is not round-tripped across devices.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::Mode;
use crate::error::{CoreError, Result};
use crate::remote::{RemoteError, RemoteStore};

pub const DEFAULT_FOCUS_SECS: u32 = 25 * 60;
pub const DEFAULT_SHORT_BREAK_SECS: u32 = 5 * 60;
pub const DEFAULT_LONG_BREAK_SECS: u32 = 15 * 60;
pub const DEFAULT_LONG_BREAK_INTERVAL: u32 = 4;

const TIMER_SETTINGS_TABLE: &str = "timer_settings";

/// Segment durations in seconds plus the long-break cadence.
///
/// Replaced wholesale on update; a rejected update leaves the previous
/// value untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    pub focus: u32,
    pub short_break: u32,
    pub long_break: u32,
    pub long_break_interval: u32,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            focus: DEFAULT_FOCUS_SECS,
            short_break: DEFAULT_SHORT_BREAK_SECS,
            long_break: DEFAULT_LONG_BREAK_SECS,
            long_break_interval: DEFAULT_LONG_BREAK_INTERVAL,
        }
    }
}

impl TimerSettings {
    /// Duration in seconds for a mode. The mapping is a closed enumeration,
    /// not a string lookup.
    pub fn duration_for(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Focus => self.focus,
            Mode::ShortBreak => self.short_break,
            Mode::LongBreak => self.long_break,
        }
    }

    /// All durations must be positive and the interval at least 1.
    pub fn validate(&self) -> Result<()> {
        let reject = |reason: &str| {
            Err(CoreError::InvalidSettings {
                reason: reason.to_string(),
            })
        };
        if self.focus == 0 {
            return reject("focus duration must be positive");
        }
        if self.short_break == 0 {
            return reject("short break duration must be positive");
        }
        if self.long_break == 0 {
            return reject("long break duration must be positive");
        }
        if self.long_break_interval == 0 {
            return reject("long break interval must be at least 1");
        }
        Ok(())
    }

    /// Fetch this user's durations from the remote `timer_settings` table.
    ///
    /// Returns `None` when no row exists yet. The interval is carried over
    /// from `current` since the table has no interval column.
    pub fn fetch_remote(
        remote: &dyn RemoteStore,
        user_id: &str,
        current: &TimerSettings,
    ) -> Result<Option<TimerSettings>, RemoteError> {
        let rows = remote.select(TIMER_SETTINGS_TABLE, &[("user_id", user_id)], &[])?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };
        let minutes = |key: &str, fallback: u32| -> u32 {
            row.get(key)
                .and_then(|v| v.as_u64())
                .map(|m| (m as u32).saturating_mul(60))
                .filter(|secs| *secs > 0)
                .unwrap_or(fallback)
        };
        Ok(Some(TimerSettings {
            focus: minutes("focus_time", current.focus),
            short_break: minutes("short_break", current.short_break),
            long_break: minutes("long_break", current.long_break),
            long_break_interval: current.long_break_interval,
        }))
    }

    /// Upsert this user's durations into the remote `timer_settings` table,
    /// in minutes, keyed by `user_id`.
    pub fn store_remote(
        &self,
        remote: &dyn RemoteStore,
        user_id: &str,
    ) -> Result<(), RemoteError> {
        let row = json!({
            "user_id": user_id,
            "focus_time": self.focus / 60,
            "short_break": self.short_break / 60,
            "long_break": self.long_break / 60,
        });
        remote.upsert(TIMER_SETTINGS_TABLE, &[row], "user_id")
    }
}
