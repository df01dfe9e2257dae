//! # Focusdesk Core Library
//!
//! Core business logic for the Focusdesk Pomodoro workspace app. The CLI
//! binary is a thin control surface over this library; any other host
//! (a desktop shell, a web layer) drives the same types.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a caller-driven, drift-corrected countdown state
//!   machine; the host invokes `tick()` for progress
//! - **Workspace Context**: the owned container for workspaces and the
//!   ordered task collection, optimistic-local / best-effort-remote
//! - **Storage**: SQLite segment history and kv state, TOML configuration,
//!   device-local mirror for anonymous tasks
//! - **Remote**: the five row operations the hosted backend provides,
//!   behind the `RemoteStore` trait
//! - **Auth**: identity presence/absence, the device session file, and the
//!   public-path gating contract

pub mod auth;
pub mod error;
pub mod events;
pub mod remote;
pub mod storage;
pub mod task;
pub mod timer;
pub mod workspace;

pub use auth::{AuthState, GateDecision, GatePolicy, Identity, Session};
pub use error::{CoreError, Result};
pub use events::Event;
pub use remote::{OrderSpec, RemoteError, RemoteStore, RestClient};
pub use storage::{Config, Database, LocalStore, Stats};
pub use task::{Task, TaskPatch, TaskPriority, TaskStatus};
pub use timer::{format_time, Mode, TimerEngine, TimerSettings};
pub use workspace::{CreateTaskInput, OrderUpdate, Workspace, WorkspaceContext};
