//! Timer control commands.
//!
//! The engine is parked in the kv store between invocations, so the
//! countdown keeps running across CLI calls; `status` ticks it and records
//! any segment that completed while nobody was looking.

use chrono::{Duration, Utc};
use clap::Subcommand;
use focusdesk_core::storage::{Config, Database};
use focusdesk_core::{format_time, Event, Mode, Session, TimerEngine, TimerSettings};

use super::build_remote;

const ENGINE_KEY: &str = "timer_engine";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the countdown (no-op when already running)
    Start,
    /// Pause the countdown (no-op when already stopped)
    Pause,
    /// Flip between running and stopped
    Toggle,
    /// Switch mode; the countdown resets and stays stopped
    Switch {
        /// focus, short-break or long-break
        mode: Mode,
    },
    /// Reset the countdown to the full duration
    Reset {
        /// Reset into this mode instead of the current one
        #[arg(long)]
        mode: Option<Mode>,
    },
    /// Tick, then print the current timer state as JSON
    Status {
        /// Print a human-readable line instead of JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Update segment durations (minutes) and the long-break interval
    Set {
        #[arg(long)]
        focus: Option<u32>,
        #[arg(long)]
        short_break: Option<u32>,
        #[arg(long)]
        long_break: Option<u32>,
        #[arg(long)]
        interval: Option<u32>,
    },
    /// Pull durations from the remote settings table
    Sync,
}

fn load_engine(db: &Database, config: &Config) -> TimerEngine {
    if let Ok(Some(json)) = db.kv_get(ENGINE_KEY) {
        if let Ok(engine) = serde_json::from_str::<TimerEngine>(&json) {
            return engine;
        }
    }
    TimerEngine::new(config.timer_settings())
}

fn save_engine(db: &Database, engine: &TimerEngine) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(engine)?;
    db.kv_set(ENGINE_KEY, &json)?;
    Ok(())
}

fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

/// Record a completed segment into the sessions table.
fn record_completion(db: &Database, engine: &TimerEngine, event: &Event) {
    if let Event::SegmentCompleted { completed, .. } = event {
        let duration_secs = engine.settings().duration_for(*completed);
        let completed_at = Utc::now();
        let started_at = completed_at - Duration::seconds(i64::from(duration_secs));
        if let Err(e) = db.record_session(
            *completed,
            u64::from(duration_secs) / 60,
            started_at,
            completed_at,
        ) {
            tracing::warn!(error = %e, "failed to record completed segment");
        }
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let mut engine = load_engine(&db, &config);

    match action {
        TimerAction::Start => {
            if !engine.is_running() {
                let event = engine.toggle();
                print_event(&event)?;
            } else {
                print_event(&engine.snapshot())?;
            }
        }
        TimerAction::Pause => {
            if engine.is_running() {
                let event = engine.toggle();
                print_event(&event)?;
            } else {
                print_event(&engine.snapshot())?;
            }
        }
        TimerAction::Toggle => {
            let event = engine.toggle();
            print_event(&event)?;
        }
        TimerAction::Switch { mode } => {
            let event = engine.switch_mode(mode, false);
            print_event(&event)?;
        }
        TimerAction::Reset { mode } => {
            let event = engine.reset(mode);
            print_event(&event)?;
        }
        TimerAction::Status { pretty } => {
            if let Some(event) = engine.tick() {
                record_completion(&db, &engine, &event);
                print_event(&event)?;
            }
            if pretty {
                println!(
                    "{} {} ({})",
                    engine.mode().label(),
                    format_time(engine.time_left_secs()),
                    if engine.is_running() { "running" } else { "stopped" }
                );
            } else {
                print_event(&engine.snapshot())?;
            }
        }
        TimerAction::Set {
            focus,
            short_break,
            long_break,
            interval,
        } => {
            let mut config = Config::load_or_default();
            if let Some(m) = focus {
                config.timer.focus_min = m;
            }
            if let Some(m) = short_break {
                config.timer.short_break_min = m;
            }
            if let Some(m) = long_break {
                config.timer.long_break_min = m;
            }
            if let Some(n) = interval {
                config.timer.long_break_interval = n;
            }

            let settings = config.timer_settings();
            let event = engine.update_settings(settings)?;
            config.save()?;
            print_event(&event)?;

            push_settings_best_effort(&config, &settings);
        }
        TimerAction::Sync => {
            let session = Session::load();
            let auth = session.auth_state();
            let Some(user) = auth.current_user else {
                return Err("sign in before syncing timer settings".into());
            };
            let Some(remote) = build_remote(&config, &session)? else {
                return Err("sync is not configured (set sync.base_url and sync.api_key)".into());
            };

            match TimerSettings::fetch_remote(remote.as_ref(), &user.id, engine.settings())? {
                Some(settings) => {
                    let mut config = Config::load_or_default();
                    config.timer.focus_min = settings.focus / 60;
                    config.timer.short_break_min = settings.short_break / 60;
                    config.timer.long_break_min = settings.long_break / 60;
                    config.save()?;

                    let event = engine.update_settings(settings)?;
                    print_event(&event)?;
                }
                None => println!("no remote timer settings stored yet"),
            }
        }
    }

    save_engine(&db, &engine)?;
    Ok(())
}

/// Mirror new durations to the remote settings table when signed in.
/// Failures are logged, never fatal: the local update already applied.
fn push_settings_best_effort(config: &Config, settings: &TimerSettings) {
    let session = Session::load();
    let auth = session.auth_state();
    let Some(user) = auth.current_user else {
        return;
    };
    match build_remote(config, &session) {
        Ok(Some(remote)) => {
            if let Err(e) = settings.store_remote(remote.as_ref(), &user.id) {
                tracing::warn!(error = %e, "timer settings did not reach the remote store");
            }
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "could not build remote client"),
    }
}
