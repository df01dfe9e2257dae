//! Session management commands.
//!
//! Sign-in itself happens against the hosted auth provider; these commands
//! store and inspect the resulting device session.

use clap::Subcommand;
use focusdesk_core::{GateDecision, GatePolicy, Identity, Session};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Print session status as JSON
    Status,
    /// Store a session obtained from the auth provider
    Login {
        /// Access token
        #[arg(long)]
        token: String,
        /// User id the token belongs to
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Clear the stored session
    Logout,
    /// Evaluate the route gate for a request path
    Gate {
        /// Request path, e.g. /tasks or /dashboard
        path: String,
    },
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::Status => {
            let session = Session::load();
            let auth = session.auth_state();
            let status = serde_json::json!({
                "signed_in": auth.is_authenticated(),
                "valid": session.is_valid(),
                "user": session.user,
                "last_activity": session.last_activity,
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        AuthAction::Login {
            token,
            user_id,
            email,
        } => {
            let mut session = Session {
                access_token: Some(token),
                user: Some(Identity { id: user_id, email }),
                last_activity: None,
            };
            session.touch();
            session.save()?;
            println!("Signed in as {}", session.user.as_ref().map(|u| u.id.as_str()).unwrap_or("?"));
        }
        AuthAction::Logout => {
            Session::clear()?;
            println!("Signed out");
        }
        AuthAction::Gate { path } => {
            let session = Session::load();
            let decision = GatePolicy::default().evaluate(&path, &session);
            match decision {
                GateDecision::Allow => println!("allow {path}"),
                GateDecision::RedirectHome => println!("redirect {path} -> /"),
            }
        }
    }
    Ok(())
}
