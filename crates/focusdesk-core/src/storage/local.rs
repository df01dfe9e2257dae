//! Device-local mirror for anonymous-mode tasks.
//!
//! When no identity is present the whole task collection lives under a
//! single kv key, serialized as JSON. Signing in leaves the mirror alone;
//! migrating anonymous tasks into a workspace is not this crate's concern.

use super::database::Database;
use crate::error::Result;
use crate::task::Task;

const LOCAL_TASKS_KEY: &str = "local_tasks";

/// Kv-backed store for the anonymous task collection.
pub struct LocalStore {
    db: Database,
}

impl LocalStore {
    pub fn open() -> Result<Self> {
        Ok(Self {
            db: Database::open()?,
        })
    }

    pub fn with_database(db: Database) -> Self {
        Self { db }
    }

    pub fn load_tasks(&self) -> Result<Vec<Task>> {
        match self.db.kv_get(LOCAL_TASKS_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string(tasks)?;
        self.db.kv_set(LOCAL_TASKS_KEY, &json)
    }

    pub fn clear(&self) -> Result<()> {
        self.db.kv_delete(LOCAL_TASKS_KEY)
    }
}
