//! # Account Identity
//!
//! Best-effort lookup of the currently signed-in account name from the
//! session state the accompanying tooling keeps on disk. An absent or
//! unreadable session is not an error: the reconciler treats an
//! unauthenticated operator as valid input and falls back to anonymous
//! URL derivation.

use serde::Deserialize;
use std::path::PathBuf;

/// Shared session state file (`state.json` in the session directory).
#[derive(Debug, Default, Deserialize)]
struct SessionState {
    #[serde(default)]
    auth: Option<SessionAuth>,
}

#[derive(Debug, Deserialize)]
struct SessionAuth {
    #[serde(default)]
    username: Option<String>,
}

/// The directory holding shared session state.
///
/// Honors the `EXPO_HOME` environment variable; falls back to `~/.expo`.
pub fn session_dir() -> PathBuf {
    if let Some(home) = std::env::var_os("EXPO_HOME") {
        return PathBuf::from(home);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".expo")
}

/// The name of the currently signed-in account, if any.
///
/// Returns `None` when no session file exists, when it cannot be parsed,
/// or when it records no authenticated user.
pub fn current_account_name() -> Option<String> {
    let path = session_dir().join("state.json");
    let content = std::fs::read_to_string(&path).ok()?;
    let state: SessionState = match serde_json::from_str(&content) {
        Ok(state) => state,
        Err(e) => {
            log::debug!(
                "Ignoring unparseable session state at {}: {}",
                path.display(),
                e
            );
            return None;
        }
    };
    state.auth.and_then(|auth| auth.username)
}
