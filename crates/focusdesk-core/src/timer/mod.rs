//! Timer engine and settings.

pub mod engine;
pub mod settings;

pub use engine::TimerEngine;
pub use settings::TimerSettings;

use serde::{Deserialize, Serialize};

/// The three segment modes. Wire names match the hosted app's casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "focus")]
    Focus,
    #[serde(rename = "shortBreak")]
    ShortBreak,
    #[serde(rename = "longBreak")]
    LongBreak,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Focus => "Focus",
            Mode::ShortBreak => "Short Break",
            Mode::LongBreak => "Long Break",
        }
    }

    /// Stable snake_case key used in the sessions table.
    pub fn key(&self) -> &'static str {
        match self {
            Mode::Focus => "focus",
            Mode::ShortBreak => "short_break",
            Mode::LongBreak => "long_break",
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "focus" => Ok(Mode::Focus),
            "short-break" | "short_break" | "shortBreak" => Ok(Mode::ShortBreak),
            "long-break" | "long_break" | "longBreak" => Ok(Mode::LongBreak),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

/// Render whole seconds as zero-padded `MM:SS`.
///
/// Minutes are not clamped, so 3600 renders as "60:00".
pub fn format_time(secs: u32) -> String {
    let mins = secs / 60;
    let rem = secs % 60;
    format!("{mins:02}:{rem:02}")
}
