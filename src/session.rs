//! Mock login gate.
//!
//! Accepts any non-blank username with a password of at least
//! [`MIN_PASSWORD_LEN`] characters and remembers the username in the local
//! store. Nothing is verified against anything; this is a policy stub, not
//! authentication.

use crate::error::{HubError, HubResult};
use crate::storage::{KvStore, USERNAME_KEY};
use serde_json::Value;
use tracing::{debug, info};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Name used when the login gate is disabled and nobody is remembered
pub const GUEST_NAME: &str = "guest";

/// Previously remembered username, if any
pub fn restore(store: &dyn KvStore) -> Option<String> {
    match store.get(USERNAME_KEY) {
        Some(Value::String(name)) if !name.is_empty() => Some(name),
        Some(other) => {
            debug!("Ignoring non-string username value: {}", other);
            None
        }
        None => None,
    }
}

/// Check the credentials' shape and remember `username` as entered
pub fn login(store: &mut dyn KvStore, username: &str, password: &str) -> HubResult<String> {
    if username.trim().is_empty() || password.trim().is_empty() {
        return Err(HubError::MissingCredentials);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(HubError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }

    store.set(USERNAME_KEY, Value::String(username.to_string()))?;
    info!("Logged in as {}", username);
    Ok(username.to_string())
}

/// Forget the remembered username. Returns whether someone was logged in.
pub fn logout(store: &mut dyn KvStore) -> HubResult<bool> {
    let was_logged_in = store.remove(USERNAME_KEY)?;
    if was_logged_in {
        info!("Logged out");
    }
    Ok(was_logged_in)
}

/// Resolve who is acting. With the gate enabled a remembered login is
/// required; with it disabled the remembered name or [`GUEST_NAME`] is used.
pub fn current_user(store: &dyn KvStore, require_login: bool) -> HubResult<String> {
    match restore(store) {
        Some(name) => Ok(name),
        None if require_login => Err(HubError::LoginRequired),
        None => Ok(GUEST_NAME.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_login_remembers_username() {
        let mut store = MemoryStore::default();
        let name = login(&mut store, "alice", "secret1").unwrap();
        assert_eq!(name, "alice");
        assert_eq!(restore(&store), Some("alice".to_string()));
    }

    #[test]
    fn test_login_keeps_username_as_entered() {
        let mut store = MemoryStore::default();
        login(&mut store, " bob ", "123456").unwrap();
        assert_eq!(restore(&store), Some(" bob ".to_string()));
    }

    #[test]
    fn test_blank_credentials_rejected() {
        let mut store = MemoryStore::default();
        assert!(matches!(
            login(&mut store, "", "secret1"),
            Err(HubError::MissingCredentials)
        ));
        assert!(matches!(
            login(&mut store, "alice", "   "),
            Err(HubError::MissingCredentials)
        ));
        assert!(restore(&store).is_none());
    }

    #[test]
    fn test_short_password_rejected() {
        let mut store = MemoryStore::default();
        let err = login(&mut store, "alice", "12345").unwrap_err();
        assert!(matches!(err, HubError::PasswordTooShort { min: 6 }));
        assert_eq!(err.to_string(), "密码长度至少为 6 位");
        assert!(restore(&store).is_none());
    }

    #[test]
    fn test_password_length_counts_characters() {
        let mut store = MemoryStore::default();
        assert!(login(&mut store, "小明", "密码密码密码").is_ok());
    }

    #[test]
    fn test_logout_forgets_username() {
        let mut store = MemoryStore::default();
        login(&mut store, "alice", "secret1").unwrap();
        assert!(logout(&mut store).unwrap());
        assert!(restore(&store).is_none());
        assert!(!logout(&mut store).unwrap());
    }

    #[test]
    fn test_restore_ignores_bad_values() {
        let mut store = MemoryStore::default();
        store.set(USERNAME_KEY, json!(42)).unwrap();
        assert!(restore(&store).is_none());
        store.set(USERNAME_KEY, json!("")).unwrap();
        assert!(restore(&store).is_none());
    }

    #[test]
    fn test_current_user_gate() {
        let mut store = MemoryStore::default();
        assert!(matches!(
            current_user(&store, true),
            Err(HubError::LoginRequired)
        ));
        assert_eq!(current_user(&store, false).unwrap(), GUEST_NAME);

        login(&mut store, "alice", "secret1").unwrap();
        assert_eq!(current_user(&store, true).unwrap(), "alice");
        assert_eq!(current_user(&store, false).unwrap(), "alice");
    }
}
