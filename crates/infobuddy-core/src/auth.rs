//! Credential gate for the login screen.

use log::{info, warn};
use std::collections::HashMap;
use subtle::ConstantTimeEq;

/// Failure message for any bad submission, identical for unknown usernames
/// and wrong passwords.
pub const LOGIN_FAILED_MESSAGE: &str = "User not known or password incorrect";

/// Validates username/password pairs against a static table and remembers
/// whether the session has authenticated. Submitted credentials are never
/// stored.
pub struct CredentialGate {
    users: HashMap<String, String>,
    authenticated: bool,
}

impl CredentialGate {
    /// Create a gate over a static credential table.
    pub fn new(users: HashMap<String, String>) -> Self {
        Self {
            users,
            authenticated: false,
        }
    }

    /// Whether a successful submission has been seen.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Check a submission and record the outcome. Password comparison is
    /// constant-time, and an unknown username still performs one comparison.
    pub fn check_password(&mut self, username: &str, password: &str) -> bool {
        let matched = match self.users.get(username) {
            Some(expected) => expected.as_bytes().ct_eq(password.as_bytes()).into(),
            None => {
                let _: bool = password.as_bytes().ct_eq(password.as_bytes()).into();
                false
            }
        };
        if matched {
            info!("login accepted (username={username})");
            self.authenticated = true;
        } else {
            warn!("login rejected");
        }
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> CredentialGate {
        let mut users = HashMap::new();
        users.insert("demo".to_string(), "hunter2".to_string());
        CredentialGate::new(users)
    }

    #[test]
    fn accepts_correct_credentials() {
        let mut gate = gate();
        assert!(!gate.is_authenticated());
        assert!(gate.check_password("demo", "hunter2"));
        assert!(gate.is_authenticated());
    }

    #[test]
    fn rejects_wrong_password_and_unknown_user_alike() {
        let mut gate = gate();
        assert!(!gate.check_password("demo", "wrong"));
        assert!(!gate.check_password("nobody", "hunter2"));
        assert!(!gate.is_authenticated());
    }

    #[test]
    fn stays_authenticated_after_success() {
        let mut gate = gate();
        assert!(gate.check_password("demo", "hunter2"));
        // A later bad submission does not revoke the session.
        assert!(!gate.check_password("demo", "wrong"));
        assert!(gate.is_authenticated());
    }
}
