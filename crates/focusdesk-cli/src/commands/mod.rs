pub mod auth;
pub mod config;
pub mod stats;
pub mod task;
pub mod timer;
pub mod workspace;

use focusdesk_core::storage::{Config, Database, LocalStore};
use focusdesk_core::{RemoteStore, RestClient, Session, WorkspaceContext};

/// Kv key remembering the workspace picked with `workspace select`.
pub const CURRENT_WORKSPACE_KEY: &str = "current_workspace";

/// Build the remote client when sync is configured, attaching the session
/// token for signed-in calls.
pub fn build_remote(
    config: &Config,
    session: &Session,
) -> Result<Option<Box<dyn RemoteStore>>, Box<dyn std::error::Error>> {
    let (Some(base_url), Some(api_key)) =
        (config.sync.base_url.as_deref(), config.sync.api_key.as_deref())
    else {
        return Ok(None);
    };

    let client = RestClient::new(base_url, api_key)?;
    let client = match session.access_token.as_deref() {
        Some(token) if session.is_valid() => client.with_bearer(token),
        _ => client,
    };
    Ok(Some(Box::new(client)))
}

/// Assemble the workspace context the way every task/workspace command
/// consumes it: session-derived identity, local mirror, optional remote,
/// refreshed, with the remembered workspace selection restored.
pub fn build_context() -> Result<WorkspaceContext, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let session = Session::load();
    let remote = build_remote(&config, &session)?;

    let mut ctx = WorkspaceContext::new(session.auth_state(), LocalStore::open()?, remote);
    ctx.refresh()?;

    let db = Database::open()?;
    if let Some(saved) = db.kv_get(CURRENT_WORKSPACE_KEY)? {
        // a stale selection just falls back to refresh's pick
        let _ = ctx.set_current(&saved);
    }
    Ok(ctx)
}
