//! Workspaces and the task ordering & sync model.
//!
//! `WorkspaceContext` is the single owner of the in-memory task collection.
//! Mutations are optimistic: the local collection changes first, the remote
//! store is told afterwards, and a remote failure is surfaced without
//! rolling the local change back (the divergence closes on the next
//! `refresh`). The one exception is authenticated task creation, where the
//! remote row is inserted first and only the stored row is admitted.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::auth::AuthState;
use crate::error::{CoreError, Result};
use crate::remote::{OrderSpec, RemoteError, RemoteStore};
use crate::storage::LocalStore;
use crate::task::{self, sort_tasks, Task, TaskPatch, TaskPriority, TaskStatus};

const WORKSPACES_TABLE: &str = "workspaces";
const TASKS_TABLE: &str = "tasks";

/// A named container owning a subset of tasks, scoped to one identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "user_id")]
    pub owner_id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Caller input for task creation.
#[derive(Debug, Clone, Default)]
pub struct CreateTaskInput {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDate>,
}

/// One entry of a reorder batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub id: String,
    pub order: i64,
}

/// Owned state container for workspaces and tasks.
///
/// Constructed with its collaborators injected; nothing here is a global.
pub struct WorkspaceContext {
    auth: AuthState,
    local: LocalStore,
    remote: Option<Box<dyn RemoteStore>>,
    workspaces: Vec<Workspace>,
    current: Option<String>,
    tasks: Vec<Task>,
}

impl WorkspaceContext {
    pub fn new(auth: AuthState, local: LocalStore, remote: Option<Box<dyn RemoteStore>>) -> Self {
        Self {
            auth,
            local,
            remote,
            workspaces: Vec::new(),
            current: None,
            tasks: Vec::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    pub fn current_workspace(&self) -> Option<&Workspace> {
        let id = self.current.as_deref()?;
        self.workspaces.iter().find(|w| w.id == id)
    }

    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    fn remote_store(&self) -> Result<&dyn RemoteStore> {
        self.remote
            .as_deref()
            .ok_or(CoreError::Sync(RemoteError::NotConfigured))
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Reload from the backing store: the local mirror when anonymous, the
    /// remote workspaces/tasks tables when signed in. This is also the only
    /// point where an optimistic divergence gets reconciled.
    pub fn refresh(&mut self) -> Result<()> {
        if !self.auth.is_authenticated() {
            self.workspaces.clear();
            self.current = None;
            self.tasks = self.local.load_tasks()?;
            sort_tasks(&mut self.tasks);
            return Ok(());
        }

        let user_id = match &self.auth.current_user {
            Some(user) => user.id.clone(),
            None => unreachable!("checked is_authenticated above"),
        };

        let rows = self.remote_store()?.select(
            WORKSPACES_TABLE,
            &[("user_id", &user_id)],
            &[OrderSpec::desc("created_at")],
        )?;
        self.workspaces = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value(row) {
                Ok(workspace) => Some(workspace),
                Err(err) => {
                    debug!(error = %err, "skipping malformed workspace row");
                    None
                }
            })
            .collect();

        let current_still_exists = self
            .current
            .as_deref()
            .is_some_and(|id| self.workspaces.iter().any(|w| w.id == id));
        if !current_still_exists {
            self.current = self.workspaces.first().map(|w| w.id.clone());
        }

        match self.current.clone() {
            Some(workspace_id) => {
                let rows = self.remote_store()?.select(
                    TASKS_TABLE,
                    &[("workspace_id", &workspace_id)],
                    &[OrderSpec::asc("order"), OrderSpec::desc("created_at")],
                )?;
                self.tasks = rows
                    .into_iter()
                    .filter_map(|row| match serde_json::from_value(row) {
                        Ok(task) => Some(task),
                        Err(err) => {
                            debug!(error = %err, "skipping malformed task row");
                            None
                        }
                    })
                    .collect();
                sort_tasks(&mut self.tasks);
            }
            None => self.tasks.clear(),
        }
        Ok(())
    }

    /// Make `id` the current workspace.
    pub fn set_current(&mut self, id: &str) -> Result<()> {
        if !self.workspaces.iter().any(|w| w.id == id) {
            return Err(CoreError::WorkspaceNotFound(id.to_string()));
        }
        self.current = Some(id.to_string());
        Ok(())
    }

    // ── Tasks ────────────────────────────────────────────────────────

    /// Create a task ranked after every existing one.
    ///
    /// Anonymous: stored in the collection and the local mirror, with the
    /// unassigned workspace id. Signed in: requires a current workspace and
    /// a successful remote insert before the task is admitted.
    pub fn create_task(&mut self, input: CreateTaskInput) -> Result<Task> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(CoreError::InvalidInput {
                reason: "task title must not be empty".to_string(),
            });
        }

        let mut new_task = Task::new(title);
        new_task.description = input.description;
        if let Some(status) = input.status {
            new_task.status = status;
        }
        if let Some(priority) = input.priority {
            new_task.priority = priority;
        }
        new_task.due_date = input.due_date;
        new_task.order = Some(task::next_order(&self.tasks));

        if self.auth.is_authenticated() {
            let workspace_id = self.current.clone().ok_or(CoreError::NoWorkspaceSelected)?;
            new_task.workspace_id = workspace_id;

            let row = self
                .remote_store()?
                .insert(TASKS_TABLE, &new_task.to_row())?;
            // Server-assigned columns win; a sparse echo falls back to what
            // we sent.
            let stored = serde_json::from_value::<Task>(row).unwrap_or_else(|_| new_task.clone());
            self.tasks.push(stored.clone());
            sort_tasks(&mut self.tasks);
            Ok(stored)
        } else {
            self.tasks.push(new_task.clone());
            sort_tasks(&mut self.tasks);
            self.local.save_tasks(&self.tasks)?;
            Ok(new_task)
        }
    }

    /// Merge `patch` into the task, optimistically. A remote failure is
    /// returned but the local change stands.
    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> Result<()> {
        let updated_at = {
            let task = self
                .tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| CoreError::TaskNotFound(id.to_string()))?;
            patch.apply(task);
            task.updated_at
        };
        sort_tasks(&mut self.tasks);

        if self.auth.is_authenticated() {
            if let Err(err) = self
                .remote_store()?
                .update(TASKS_TABLE, id, &patch.to_fields(updated_at))
            {
                warn!(task = id, error = %err, "task update did not reach the remote store");
                return Err(err.into());
            }
        } else {
            self.local.save_tasks(&self.tasks)?;
        }
        Ok(())
    }

    /// Remove the task, optimistically.
    pub fn delete_task(&mut self, id: &str) -> Result<()> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CoreError::TaskNotFound(id.to_string()))?;
        self.tasks.remove(idx);

        if self.auth.is_authenticated() {
            if let Err(err) = self.remote_store()?.delete(TASKS_TABLE, id) {
                warn!(task = id, error = %err, "task delete did not reach the remote store");
                return Err(err.into());
            }
        } else {
            self.local.save_tasks(&self.tasks)?;
        }
        Ok(())
    }

    /// Apply new order keys and re-sort. With `optimistic` the work stops
    /// at the local collection (instant drag feedback); without it the full
    /// merged rows are batch-upserted keyed by id. Drag-end callers invoke
    /// this twice: once optimistically, once to persist.
    pub fn reorder_tasks(&mut self, updates: &[OrderUpdate], optimistic: bool) -> Result<()> {
        for update in updates {
            if let Some(task) = self.tasks.iter_mut().find(|t| t.id == update.id) {
                task.order = Some(update.order);
            }
        }
        sort_tasks(&mut self.tasks);

        if !self.auth.is_authenticated() {
            self.local.save_tasks(&self.tasks)?;
            return Ok(());
        }
        if optimistic {
            return Ok(());
        }
        let Some(workspace_id) = self.current.clone() else {
            return Ok(());
        };

        let now = Utc::now();
        let rows: Vec<Value> = updates
            .iter()
            .filter_map(|update| {
                self.tasks.iter().find(|t| t.id == update.id).map(|task| {
                    let mut row = task.to_row();
                    row["order"] = json!(update.order);
                    row["workspace_id"] = json!(workspace_id);
                    row["updated_at"] = json!(now);
                    row
                })
            })
            .collect();
        if rows.is_empty() {
            return Ok(());
        }

        if let Err(err) = self.remote_store()?.upsert(TASKS_TABLE, &rows, "id") {
            warn!(count = rows.len(), error = %err, "task reorder did not reach the remote store");
            return Err(err.into());
        }
        Ok(())
    }

    /// Reassign contiguous multiples of the order gap to the active tasks,
    /// in their current display order, and persist. The escape hatch for an
    /// exhausted midpoint gap; never invoked automatically.
    pub fn renumber_orders(&mut self) -> Result<Vec<OrderUpdate>> {
        let updates: Vec<OrderUpdate> = self
            .tasks
            .iter()
            .filter(|t| !t.is_completed())
            .enumerate()
            .map(|(i, t)| OrderUpdate {
                id: t.id.clone(),
                order: (i as i64 + 1) * task::ORDER_GAP,
            })
            .collect();
        self.reorder_tasks(&updates, false)?;
        Ok(updates)
    }

    // ── Workspaces ───────────────────────────────────────────────────

    /// Create a workspace and make it current. Requires identity.
    pub fn create_workspace(&mut self, name: &str, description: Option<&str>) -> Result<Workspace> {
        let user = self
            .auth
            .current_user
            .clone()
            .ok_or(CoreError::Unauthenticated)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::InvalidInput {
                reason: "workspace name must not be empty".to_string(),
            });
        }

        let row = self.remote_store()?.insert(
            WORKSPACES_TABLE,
            &json!({
                "name": name,
                "description": description,
                "user_id": user.id,
            }),
        )?;
        let workspace: Workspace = serde_json::from_value(row)?;
        self.current = Some(workspace.id.clone());
        self.workspaces.insert(0, workspace.clone());
        Ok(workspace)
    }

    /// Delete an owned workspace. If it was current, an arbitrary remaining
    /// workspace (or none) becomes current and the task list empties until
    /// the next refresh.
    pub fn delete_workspace(&mut self, id: &str) -> Result<()> {
        let user = self
            .auth
            .current_user
            .clone()
            .ok_or(CoreError::Unauthenticated)?;
        let workspace = self
            .workspaces
            .iter()
            .find(|w| w.id == id)
            .ok_or_else(|| CoreError::WorkspaceNotFound(id.to_string()))?;
        if workspace.owner_id != user.id {
            return Err(CoreError::Unauthenticated);
        }

        self.remote_store()?.delete(WORKSPACES_TABLE, id)?;
        self.workspaces.retain(|w| w.id != id);
        if self.current.as_deref() == Some(id) {
            self.current = self.workspaces.first().map(|w| w.id.clone());
            self.tasks.clear();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Identity;
    use crate::storage::Database;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    /// In-memory RemoteStore double. Clones share state so tests can
    /// inspect calls after handing one copy to the context.
    #[derive(Clone, Default)]
    struct FakeRemote {
        calls: Rc<RefCell<Vec<String>>>,
        tables: Rc<RefCell<HashMap<String, Vec<Value>>>>,
        last_upsert: Rc<RefCell<Vec<Value>>>,
        fail: Rc<Cell<bool>>,
        seq: Rc<Cell<u32>>,
    }

    impl FakeRemote {
        fn record(&self, call: impl Into<String>) {
            self.calls.borrow_mut().push(call.into());
        }

        fn maybe_fail(&self) -> Result<(), RemoteError> {
            if self.fail.get() {
                Err(RemoteError::Status {
                    status: 500,
                    body: "induced".to_string(),
                })
            } else {
                Ok(())
            }
        }

        fn calls_matching(&self, prefix: &str) -> usize {
            self.calls
                .borrow()
                .iter()
                .filter(|c| c.starts_with(prefix))
                .count()
        }

        fn seed(&self, table: &str, row: Value) {
            self.tables
                .borrow_mut()
                .entry(table.to_string())
                .or_default()
                .push(row);
        }
    }

    fn value_text(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    impl RemoteStore for FakeRemote {
        fn select(
            &self,
            table: &str,
            filters: &[(&str, &str)],
            _order: &[OrderSpec],
        ) -> Result<Vec<Value>, RemoteError> {
            self.record(format!("select:{table}"));
            self.maybe_fail()?;
            let rows = self
                .tables
                .borrow()
                .get(table)
                .cloned()
                .unwrap_or_default();
            Ok(rows
                .into_iter()
                .filter(|row| {
                    filters.iter().all(|(col, val)| {
                        row.get(*col).map(value_text).as_deref() == Some(*val)
                    })
                })
                .collect())
        }

        fn insert(&self, table: &str, record: &Value) -> Result<Value, RemoteError> {
            self.record(format!("insert:{table}"));
            self.maybe_fail()?;
            let mut row = record.clone();
            let obj = row.as_object_mut().expect("records are objects");
            let n = self.seq.get() + 1;
            self.seq.set(n);
            obj.entry("id").or_insert(json!(format!("{table}-{n}")));
            obj.entry("created_at").or_insert(json!(Utc::now()));
            obj.entry("updated_at").or_insert(json!(Utc::now()));
            self.seed(table, row.clone());
            Ok(row)
        }

        fn update(&self, table: &str, id: &str, _fields: &Value) -> Result<(), RemoteError> {
            self.record(format!("update:{table}:{id}"));
            self.maybe_fail()
        }

        fn delete(&self, table: &str, id: &str) -> Result<(), RemoteError> {
            self.record(format!("delete:{table}:{id}"));
            self.maybe_fail()
        }

        fn upsert(
            &self,
            table: &str,
            records: &[Value],
            _conflict_key: &str,
        ) -> Result<(), RemoteError> {
            self.record(format!("upsert:{table}"));
            self.maybe_fail()?;
            *self.last_upsert.borrow_mut() = records.to_vec();
            Ok(())
        }
    }

    fn anonymous_context() -> WorkspaceContext {
        WorkspaceContext::new(
            AuthState::anonymous(),
            LocalStore::with_database(Database::open_memory().unwrap()),
            None,
        )
    }

    fn signed_in_context(remote: &FakeRemote) -> WorkspaceContext {
        WorkspaceContext::new(
            AuthState::signed_in(Identity {
                id: "u1".into(),
                email: None,
            }),
            LocalStore::with_database(Database::open_memory().unwrap()),
            Some(Box::new(remote.clone())),
        )
    }

    fn titled(title: &str) -> CreateTaskInput {
        CreateTaskInput {
            title: title.to_string(),
            ..CreateTaskInput::default()
        }
    }

    #[test]
    fn anonymous_create_is_local_and_unassigned() {
        let mut ctx = anonymous_context();
        let task = ctx.create_task(titled("offline")).unwrap();

        assert_eq!(task.workspace_id, "");
        assert_eq!(task.order, Some(1000));
        assert_eq!(ctx.tasks().len(), 1);
    }

    #[test]
    fn anonymous_tasks_survive_in_the_mirror() {
        let mut ctx = anonymous_context();
        ctx.create_task(titled("persisted")).unwrap();

        // drop the in-memory view and reload from the mirror
        ctx.tasks.clear();
        ctx.refresh().unwrap();
        assert_eq!(ctx.tasks().len(), 1);
        assert_eq!(ctx.tasks()[0].title, "persisted");
    }

    #[test]
    fn empty_title_is_rejected_before_any_mutation() {
        let mut ctx = anonymous_context();
        assert!(matches!(
            ctx.create_task(titled("   ")),
            Err(CoreError::InvalidInput { .. })
        ));
        assert!(ctx.tasks().is_empty());
    }

    #[test]
    fn signed_in_create_without_workspace_is_rejected() {
        let remote = FakeRemote::default();
        let mut ctx = signed_in_context(&remote);

        assert!(matches!(
            ctx.create_task(titled("homeless")),
            Err(CoreError::NoWorkspaceSelected)
        ));
        assert!(ctx.tasks().is_empty());
        assert_eq!(remote.calls_matching("insert:"), 0);
    }

    #[test]
    fn signed_in_create_inserts_remotely_first() {
        let remote = FakeRemote::default();
        let mut ctx = signed_in_context(&remote);
        ctx.create_workspace("Deep Work", None).unwrap();

        let task = ctx.create_task(titled("remote-backed")).unwrap();
        assert_eq!(task.workspace_id, "workspaces-1");
        assert_eq!(remote.calls_matching("insert:tasks"), 1);

        // remote failure means the task is never admitted
        remote.fail.set(true);
        assert!(ctx.create_task(titled("rejected")).is_err());
        assert_eq!(ctx.tasks().len(), 1);
    }

    #[test]
    fn failed_update_keeps_the_optimistic_change() {
        let remote = FakeRemote::default();
        let mut ctx = signed_in_context(&remote);
        ctx.create_workspace("Deep Work", None).unwrap();
        let task = ctx.create_task(titled("old title")).unwrap();

        remote.fail.set(true);
        let patch = TaskPatch {
            title: Some("new title".into()),
            ..TaskPatch::default()
        };
        let err = ctx.update_task(&task.id, patch).unwrap_err();
        assert!(matches!(err, CoreError::Sync(_)));
        assert_eq!(ctx.tasks()[0].title, "new title");
    }

    #[test]
    fn failed_delete_keeps_the_local_removal() {
        let remote = FakeRemote::default();
        let mut ctx = signed_in_context(&remote);
        ctx.create_workspace("Deep Work", None).unwrap();
        let task = ctx.create_task(titled("doomed")).unwrap();

        remote.fail.set(true);
        assert!(ctx.delete_task(&task.id).is_err());
        assert!(ctx.tasks().is_empty());
    }

    #[test]
    fn unknown_task_update_is_a_synchronous_rejection() {
        let mut ctx = anonymous_context();
        assert!(matches!(
            ctx.update_task("nope", TaskPatch::default()),
            Err(CoreError::TaskNotFound(_))
        ));
    }

    #[test]
    fn optimistic_then_persisting_reorder_match_and_only_one_writes() {
        let remote = FakeRemote::default();
        let mut ctx = signed_in_context(&remote);
        ctx.create_workspace("Deep Work", None).unwrap();
        let a = ctx.create_task(titled("a")).unwrap();
        let b = ctx.create_task(titled("b")).unwrap();

        // move b ahead of a
        let updates = vec![
            OrderUpdate {
                id: b.id.clone(),
                order: 500,
            },
            OrderUpdate {
                id: a.id.clone(),
                order: 1500,
            },
        ];

        ctx.reorder_tasks(&updates, true).unwrap();
        let after_optimistic: Vec<String> =
            ctx.tasks().iter().map(|t| t.id.clone()).collect();
        assert_eq!(remote.calls_matching("upsert:"), 0);

        ctx.reorder_tasks(&updates, false).unwrap();
        let after_persist: Vec<String> = ctx.tasks().iter().map(|t| t.id.clone()).collect();
        assert_eq!(after_optimistic, after_persist);
        assert_eq!(after_persist[0], b.id);
        assert_eq!(remote.calls_matching("upsert:"), 1);

        // the upsert carries full merged rows, not bare order tuples
        let rows = remote.last_upsert.borrow();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["title"], "b");
        assert_eq!(rows[0]["order"], 500);
        assert_eq!(rows[0]["workspace_id"], "workspaces-1");
    }

    #[test]
    fn failed_reorder_keeps_the_local_ordering() {
        let remote = FakeRemote::default();
        let mut ctx = signed_in_context(&remote);
        ctx.create_workspace("Deep Work", None).unwrap();
        let a = ctx.create_task(titled("a")).unwrap();
        let b = ctx.create_task(titled("b")).unwrap();

        remote.fail.set(true);
        let updates = vec![OrderUpdate {
            id: b.id.clone(),
            order: 1,
        }];
        assert!(ctx.reorder_tasks(&updates, false).is_err());
        assert_eq!(ctx.tasks()[0].id, b.id);
        assert_eq!(ctx.tasks()[1].id, a.id);
    }

    #[test]
    fn renumber_restores_the_gap() {
        let mut ctx = anonymous_context();
        let a = ctx.create_task(titled("a")).unwrap();
        let b = ctx.create_task(titled("b")).unwrap();
        ctx.reorder_tasks(
            &[
                OrderUpdate {
                    id: a.id.clone(),
                    order: 7,
                },
                OrderUpdate {
                    id: b.id.clone(),
                    order: 8,
                },
            ],
            true,
        )
        .unwrap();

        let updates = ctx.renumber_orders().unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(ctx.tasks()[0].order, Some(1000));
        assert_eq!(ctx.tasks()[1].order, Some(2000));
    }

    #[test]
    fn workspace_creation_requires_identity() {
        let mut ctx = anonymous_context();
        assert!(matches!(
            ctx.create_workspace("Nope", None),
            Err(CoreError::Unauthenticated)
        ));
    }

    #[test]
    fn new_workspace_becomes_current() {
        let remote = FakeRemote::default();
        let mut ctx = signed_in_context(&remote);
        let first = ctx.create_workspace("First", Some("one")).unwrap();
        let second = ctx.create_workspace("Second", None).unwrap();

        assert_eq!(ctx.workspaces().len(), 2);
        assert_eq!(ctx.current_workspace().unwrap().id, second.id);

        ctx.set_current(&first.id).unwrap();
        assert_eq!(ctx.current_workspace().unwrap().id, first.id);
    }

    #[test]
    fn deleting_the_current_workspace_falls_back() {
        let remote = FakeRemote::default();
        let mut ctx = signed_in_context(&remote);
        let first = ctx.create_workspace("First", None).unwrap();
        let second = ctx.create_workspace("Second", None).unwrap();
        assert_eq!(ctx.current_workspace().unwrap().id, second.id);

        ctx.delete_workspace(&second.id).unwrap();
        assert_eq!(ctx.current_workspace().unwrap().id, first.id);

        ctx.delete_workspace(&first.id).unwrap();
        assert!(ctx.current_workspace().is_none());
    }

    #[test]
    fn foreign_workspace_cannot_be_deleted() {
        let remote = FakeRemote::default();
        let mut ctx = signed_in_context(&remote);
        ctx.create_workspace("Mine", None).unwrap();
        ctx.workspaces.push(Workspace {
            id: "foreign".into(),
            name: "Theirs".into(),
            description: None,
            owner_id: "u2".into(),
            created_at: Utc::now(),
        });

        assert!(matches!(
            ctx.delete_workspace("foreign"),
            Err(CoreError::Unauthenticated)
        ));
        assert_eq!(remote.calls_matching("delete:"), 0);
    }

    #[test]
    fn refresh_pulls_workspaces_and_their_tasks() {
        let remote = FakeRemote::default();
        remote.seed(
            "workspaces",
            json!({
                "id": "ws-9",
                "name": "Synced",
                "description": null,
                "user_id": "u1",
                "created_at": Utc::now(),
            }),
        );
        let mut done = Task::new("finished earlier");
        done.status = TaskStatus::Completed;
        done.workspace_id = "ws-9".into();
        let mut open = Task::new("still open");
        open.workspace_id = "ws-9".into();
        open.order = Some(1000);
        remote.seed("tasks", serde_json::to_value(&done).unwrap());
        remote.seed("tasks", serde_json::to_value(&open).unwrap());
        // a task in someone else's workspace must not leak in
        let mut foreign = Task::new("foreign");
        foreign.workspace_id = "ws-other".into();
        remote.seed("tasks", serde_json::to_value(&foreign).unwrap());

        let mut ctx = signed_in_context(&remote);
        ctx.refresh().unwrap();

        assert_eq!(ctx.workspaces().len(), 1);
        assert_eq!(ctx.current_workspace().unwrap().id, "ws-9");
        assert_eq!(ctx.tasks().len(), 2);
        // active before completed
        assert_eq!(ctx.tasks()[0].title, "still open");
        assert_eq!(ctx.tasks()[1].title, "finished earlier");
    }
}
