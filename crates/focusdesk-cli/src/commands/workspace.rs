//! Workspace management commands.

use clap::Subcommand;
use focusdesk_core::storage::Database;

use super::CURRENT_WORKSPACE_KEY;

#[derive(Subcommand)]
pub enum WorkspaceAction {
    /// Create a workspace and make it current (requires sign-in)
    Create {
        /// Workspace name
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List workspaces
    List,
    /// Make a workspace current
    Select {
        /// Workspace ID
        id: String,
    },
    /// Delete an owned workspace
    Delete {
        /// Workspace ID
        id: String,
    },
}

pub fn run(action: WorkspaceAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = super::build_context()?;
    let db = Database::open()?;

    match action {
        WorkspaceAction::Create { name, description } => {
            let workspace = ctx.create_workspace(&name, description.as_deref())?;
            db.kv_set(CURRENT_WORKSPACE_KEY, &workspace.id)?;
            println!("Workspace created: {}", workspace.id);
            println!("{}", serde_json::to_string_pretty(&workspace)?);
        }
        WorkspaceAction::List => {
            println!("{}", serde_json::to_string_pretty(ctx.workspaces())?);
            if let Some(current) = ctx.current_workspace() {
                println!("Current: {}", current.id);
            }
        }
        WorkspaceAction::Select { id } => {
            ctx.set_current(&id)?;
            db.kv_set(CURRENT_WORKSPACE_KEY, &id)?;
            println!("Current workspace: {id}");
        }
        WorkspaceAction::Delete { id } => {
            ctx.delete_workspace(&id)?;
            match ctx.current_workspace() {
                Some(current) => db.kv_set(CURRENT_WORKSPACE_KEY, &current.id)?,
                None => db.kv_delete(CURRENT_WORKSPACE_KEY)?,
            }
            println!("Workspace deleted: {id}");
        }
    }
    Ok(())
}
