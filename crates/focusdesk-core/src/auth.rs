//! Identity collaborator and session gating.
//!
//! Sign-in/sign-up/refresh live in the hosted auth provider; this module
//! only models presence/absence of an identity, the device session file,
//! and the request-gating contract: an allowlist of public paths plus a
//! token-and-recent-activity validity check.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::data_dir;

// Session policy constants.
pub const SESSION_DURATION_HOURS: i64 = 24;
pub const INACTIVITY_TIMEOUT_MIN: i64 = 60;
pub const INACTIVITY_CHECK_INTERVAL_MIN: i64 = 5;
pub const TOKEN_REFRESH_INTERVAL_HOURS: i64 = 23;
pub const PASSWORD_MIN_LENGTH: usize = 8;

const SESSION_FILE: &str = "session.json";

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Presence/absence of an identity, as the rest of the core consumes it.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub current_user: Option<Identity>,
    pub loading: bool,
}

impl AuthState {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user: Identity) -> Self {
        Self {
            current_user: Some(user),
            loading: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }
}

/// Device session: token plus the activity timestamp the inactivity check
/// runs against. Persisted as JSON in the data directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user: Option<Identity>,
    #[serde(default)]
    pub last_activity: Option<DateTime<Utc>>,
}

impl Session {
    fn path() -> Result<std::path::PathBuf> {
        Ok(data_dir()?.join(SESSION_FILE))
    }

    /// Load the stored session, or an empty one when none exists.
    pub fn load() -> Self {
        Self::path()
            .ok()
            .and_then(|path| std::fs::read_to_string(path).ok())
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    pub fn clear() -> Result<()> {
        let path = Self::path()?;
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Valid = token present AND last activity within the inactivity
    /// threshold. A session with a token but no recorded activity is stale.
    pub fn is_valid_at(&self, now: DateTime<Utc>, inactivity_timeout: Duration) -> bool {
        if self.access_token.is_none() {
            return false;
        }
        match self.last_activity {
            Some(at) => now.signed_duration_since(at) < inactivity_timeout,
            None => false,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now(), Duration::minutes(INACTIVITY_TIMEOUT_MIN))
    }

    /// Record activity now.
    pub fn touch(&mut self) {
        self.last_activity = Some(Utc::now());
    }

    /// The identity the rest of the core branches on. An expired session
    /// is anonymous.
    pub fn auth_state(&self) -> AuthState {
        if self.is_valid() {
            match &self.user {
                Some(user) => AuthState::signed_in(user.clone()),
                None => AuthState::anonymous(),
            }
        } else {
            AuthState::anonymous()
        }
    }
}

/// Outcome of gating one request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectHome,
}

/// Public-path allowlist plus the inactivity threshold.
#[derive(Debug, Clone)]
pub struct GatePolicy {
    public_paths: Vec<String>,
    inactivity_timeout: Duration,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            public_paths: [
                "/",
                "/sounds",
                "/tasks",
                "/privacy",
                "/terms",
                "/auth/callback",
                "/profile",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            inactivity_timeout: Duration::minutes(INACTIVITY_TIMEOUT_MIN),
        }
    }
}

impl GatePolicy {
    pub fn new(public_paths: Vec<String>, inactivity_timeout: Duration) -> Self {
        Self {
            public_paths,
            inactivity_timeout,
        }
    }

    fn is_public(&self, path: &str) -> bool {
        self.public_paths
            .iter()
            .any(|p| path == p || path.starts_with(&format!("{p}/")))
    }

    /// Allow public paths; everything else needs a valid session.
    /// `/profile` is listed public for its subtree but the page itself
    /// still requires a session.
    pub fn evaluate_at(
        &self,
        path: &str,
        session: &Session,
        now: DateTime<Utc>,
    ) -> GateDecision {
        let is_public = self.is_public(path);
        let is_profile = path == "/profile";
        let valid = session.is_valid_at(now, self.inactivity_timeout);

        if !valid && (!is_public || is_profile) {
            GateDecision::RedirectHome
        } else {
            GateDecision::Allow
        }
    }

    pub fn evaluate(&self, path: &str, session: &Session) -> GateDecision {
        self.evaluate_at(path, session, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_session() -> Session {
        Session {
            access_token: Some("token".into()),
            user: Some(Identity {
                id: "u1".into(),
                email: Some("u1@example.com".into()),
            }),
            last_activity: Some(Utc::now()),
        }
    }

    #[test]
    fn token_without_activity_is_invalid() {
        let session = Session {
            access_token: Some("token".into()),
            user: None,
            last_activity: None,
        };
        assert!(!session.is_valid());
    }

    #[test]
    fn stale_activity_invalidates() {
        let mut session = fresh_session();
        session.last_activity = Some(Utc::now() - Duration::minutes(INACTIVITY_TIMEOUT_MIN + 1));
        assert!(!session.is_valid());

        session.touch();
        assert!(session.is_valid());
    }

    #[test]
    fn expired_session_is_anonymous() {
        let mut session = fresh_session();
        assert!(session.auth_state().is_authenticated());

        session.last_activity = Some(Utc::now() - Duration::hours(2));
        assert!(!session.auth_state().is_authenticated());
    }

    #[test]
    fn public_paths_allow_without_session() {
        let policy = GatePolicy::default();
        let anonymous = Session::default();

        for path in ["/", "/tasks", "/tasks/today", "/privacy", "/auth/callback"] {
            assert_eq!(
                policy.evaluate(path, &anonymous),
                GateDecision::Allow,
                "path {path} should be public"
            );
        }
    }

    #[test]
    fn root_prefix_does_not_leak_everything() {
        let policy = GatePolicy::default();
        let anonymous = Session::default();
        assert_eq!(
            policy.evaluate("/dashboard", &anonymous),
            GateDecision::RedirectHome
        );
    }

    #[test]
    fn profile_requires_a_valid_session_despite_being_listed() {
        let policy = GatePolicy::default();
        assert_eq!(
            policy.evaluate("/profile", &Session::default()),
            GateDecision::RedirectHome
        );
        assert_eq!(
            policy.evaluate("/profile", &fresh_session()),
            GateDecision::Allow
        );
    }

    #[test]
    fn protected_path_allows_with_valid_session() {
        let policy = GatePolicy::default();
        assert_eq!(
            policy.evaluate("/dashboard", &fresh_session()),
            GateDecision::Allow
        );
    }
}
