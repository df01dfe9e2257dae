//! SQLite-based session storage and statistics.
//!
//! Provides persistent storage for:
//! - Completed timer segments
//! - Segment statistics (daily and all-time)
//! - Key-value store for application state (engine snapshot, local task
//!   mirror, current workspace)

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::Result;
use crate::timer::Mode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub mode: String,
    pub duration_min: u64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Stats {
    pub sessions: u64,
    pub focus_min: u64,
    pub break_min: u64,
    pub completed_pomodoros: u64,
}

/// SQLite database for segment history and app state.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/focusdesk/focusdesk.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("focusdesk.db");
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                mode         TEXT NOT NULL,
                duration_min INTEGER NOT NULL,
                started_at   TEXT NOT NULL,
                completed_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_completed_at ON sessions(completed_at);
            CREATE INDEX IF NOT EXISTS idx_sessions_mode ON sessions(mode);",
        )?;
        Ok(())
    }

    /// Record a completed segment.
    pub fn record_session(
        &self,
        mode: Mode,
        duration_min: u64,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO sessions (mode, duration_min, started_at, completed_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                mode.key(),
                duration_min,
                started_at.to_rfc3339(),
                completed_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn recent_sessions(&self, limit: usize) -> Result<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, mode, duration_min, started_at, completed_at
             FROM sessions ORDER BY completed_at DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, mode, duration_min, started_at, completed_at) = row?;
            records.push(SessionRecord {
                id,
                mode,
                duration_min,
                started_at: parse_rfc3339(&started_at),
                completed_at: parse_rfc3339(&completed_at),
            });
        }
        Ok(records)
    }

    pub fn stats_today(&self) -> Result<Stats> {
        let today = Utc::now().format("%Y-%m-%d").to_string();
        self.stats_where(
            "WHERE completed_at >= ?1",
            params![format!("{today}T00:00:00+00:00")],
        )
    }

    pub fn stats_all(&self) -> Result<Stats> {
        self.stats_where("", params![])
    }

    fn stats_where(&self, clause: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Stats> {
        let sql = format!(
            "SELECT mode, COUNT(*), COALESCE(SUM(duration_min), 0)
             FROM sessions {clause}
             GROUP BY mode"
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let mut stats = Stats::default();
        let rows = stmt.query_map(args, |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, u64>(2)?,
            ))
        })?;

        for row in rows {
            let (mode, count, minutes) = row?;
            stats.sessions += count;
            match mode.as_str() {
                "focus" => {
                    stats.completed_pomodoros += count;
                    stats.focus_min += minutes;
                }
                "short_break" | "long_break" => {
                    stats.break_min += minutes;
                }
                _ => {}
            }
        }
        Ok(stats)
    }

    // ── Key-value store ──────────────────────────────────────────────

    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

fn parse_rfc3339(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn record_and_count_sessions() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();

        db.record_session(Mode::Focus, 25, now - Duration::minutes(25), now)
            .unwrap();
        db.record_session(Mode::ShortBreak, 5, now - Duration::minutes(5), now)
            .unwrap();
        db.record_session(Mode::Focus, 25, now - Duration::minutes(25), now)
            .unwrap();

        let stats = db.stats_all().unwrap();
        assert_eq!(stats.sessions, 3);
        assert_eq!(stats.completed_pomodoros, 2);
        assert_eq!(stats.focus_min, 50);
        assert_eq!(stats.break_min, 5);
    }

    #[test]
    fn today_excludes_old_sessions() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        let last_week = now - Duration::days(7);

        db.record_session(Mode::Focus, 25, last_week, last_week)
            .unwrap();
        db.record_session(Mode::Focus, 25, now - Duration::minutes(25), now)
            .unwrap();

        let today = db.stats_today().unwrap();
        assert_eq!(today.completed_pomodoros, 1);
        let all = db.stats_all().unwrap();
        assert_eq!(all.completed_pomodoros, 2);
    }

    #[test]
    fn recent_sessions_newest_first() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();

        db.record_session(Mode::Focus, 25, now - Duration::hours(2), now - Duration::hours(1))
            .unwrap();
        db.record_session(Mode::LongBreak, 15, now - Duration::minutes(15), now)
            .unwrap();

        let records = db.recent_sessions(10).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].mode, "long_break");
        assert_eq!(records[1].mode, "focus");
    }

    #[test]
    fn kv_set_get_overwrite_delete() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.kv_get("missing").unwrap(), None);

        db.kv_set("engine", "{}").unwrap();
        assert_eq!(db.kv_get("engine").unwrap().as_deref(), Some("{}"));

        db.kv_set("engine", "{\"mode\":\"focus\"}").unwrap();
        assert_eq!(
            db.kv_get("engine").unwrap().as_deref(),
            Some("{\"mode\":\"focus\"}")
        );

        db.kv_delete("engine").unwrap();
        assert_eq!(db.kv_get("engine").unwrap(), None);
    }
}
