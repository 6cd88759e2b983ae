// ==============================================================================
// store.rs - Credential Stores
// ==============================================================================
// Description: Username-to-secret lookup backends for the auth gate
// Author: Matt Barham
// Created: 2026-02-09
// Modified: 2026-02-21
// Version: 1.0.0
// ==============================================================================

use std::collections::HashMap;
use std::env;

use anyhow::{Context, Result};

/// Username-to-secret lookup collaborator
///
/// `Ok(None)` means the user is unknown. Errors are treated by callers as a
/// failed lookup: the request is rejected, never passed through. Lookups must
/// be safe to invoke concurrently from multiple requests.
pub trait CredentialStore: Send + Sync {
    /// Look up the expected secret for a username
    fn lookup(&self, username: &str) -> Result<Option<String>>;
}

// ==============================================================================
// IN-MEMORY STORE
// ==============================================================================

/// In-memory credential map
///
/// # Example
/// ```rust
/// use auth_gate::store::StaticCredentials;
///
/// let users: StaticCredentials = [("alice", "secret")].into_iter().collect();
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    users: HashMap<String, String>,
}

impl StaticCredentials {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a user's secret
    pub fn insert(&mut self, username: impl Into<String>, secret: impl Into<String>) {
        self.users.insert(username.into(), secret.into());
    }
}

impl<U, S> FromIterator<(U, S)> for StaticCredentials
where
    U: Into<String>,
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (U, S)>>(iter: I) -> Self {
        Self {
            users: iter
                .into_iter()
                .map(|(username, secret)| (username.into(), secret.into()))
                .collect(),
        }
    }
}

impl CredentialStore for StaticCredentials {
    fn lookup(&self, username: &str) -> Result<Option<String>> {
        Ok(self.users.get(username).cloned())
    }
}

// ==============================================================================
// PROCESS ENVIRONMENT STORE
// ==============================================================================

/// Process-environment credential store
///
/// Each user is an environment variable named `<prefix><username>` whose
/// value is the expected secret. An empty prefix exposes the raw process
/// environment as the user database; a prefix such as `AUTH_USER_` limits
/// which variables can act as credentials.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentials {
    prefix: String,
}

impl EnvCredentials {
    /// Create a store over the raw process environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that only consults variables starting with `prefix`
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl CredentialStore for EnvCredentials {
    fn lookup(&self, username: &str) -> Result<Option<String>> {
        match env::var(format!("{}{}", self.prefix, username)) {
            Ok(secret) => Ok(Some(secret)),
            // Unset and non-unicode variables both mean "no such user"
            Err(env::VarError::NotPresent) | Err(env::VarError::NotUnicode(_)) => Ok(None),
        }
    }
}

// ==============================================================================
// JSON STORE
// ==============================================================================

/// JSON-object credential store
///
/// Parses a blob of the form `{"username": "password", ...}` once at
/// construction; lookups are map probes. The blob can come from any string
/// source, typically a single environment variable.
#[derive(Debug, Clone)]
pub struct JsonCredentials {
    users: HashMap<String, String>,
}

impl JsonCredentials {
    /// Parse credentials from a JSON object string
    ///
    /// # Errors
    ///
    /// Returns an error if the blob is not a JSON object mapping strings
    /// to strings.
    pub fn from_json(blob: &str) -> Result<Self> {
        let users: HashMap<String, String> =
            serde_json::from_str(blob).context("Failed to parse credential JSON")?;

        Ok(Self { users })
    }

    /// Parse credentials from a JSON object held in an environment variable
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is unset or its value is not a JSON
    /// object mapping strings to strings.
    pub fn from_env(var: &str) -> Result<Self> {
        let blob = env::var(var).with_context(|| format!("{var} must be set"))?;

        Self::from_json(&blob)
    }
}

impl CredentialStore for JsonCredentials {
    fn lookup(&self, username: &str) -> Result<Option<String>> {
        Ok(self.users.get(username).cloned())
    }
}

// ==============================================================================
// TESTS
// ==============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_lookup() {
        let mut store = StaticCredentials::new();
        store.insert("alice", "secret");

        assert_eq!(store.lookup("alice").unwrap(), Some("secret".to_string()));
        assert_eq!(store.lookup("bob").unwrap(), None);
    }

    #[test]
    fn test_static_from_iterator() {
        let store: StaticCredentials =
            [("alice", "secret"), ("bob", "hunter2")].into_iter().collect();

        assert_eq!(store.lookup("bob").unwrap(), Some("hunter2".to_string()));
    }

    #[test]
    fn test_env_lookup_with_prefix() {
        env::set_var("AUTH_GATE_TEST_USER_carol", "pa55");

        let store = EnvCredentials::with_prefix("AUTH_GATE_TEST_USER_");

        assert_eq!(store.lookup("carol").unwrap(), Some("pa55".to_string()));
        assert_eq!(store.lookup("nobody-set-this").unwrap(), None);
    }

    #[test]
    fn test_env_prefix_scopes_the_namespace() {
        env::set_var("AUTH_GATE_TEST_PLAIN", "visible");

        let store = EnvCredentials::with_prefix("AUTH_GATE_SCOPED_");

        // The unprefixed variable is not reachable through a prefixed store
        assert_eq!(store.lookup("AUTH_GATE_TEST_PLAIN").unwrap(), None);
    }

    #[test]
    fn test_json_lookup() {
        let store = JsonCredentials::from_json(r#"{"alice": "secret", "bob": "hunter2"}"#).unwrap();

        assert_eq!(store.lookup("alice").unwrap(), Some("secret".to_string()));
        assert_eq!(store.lookup("mallory").unwrap(), None);
    }

    #[test]
    fn test_json_rejects_invalid_blob() {
        assert!(JsonCredentials::from_json("not json").is_err());
        assert!(JsonCredentials::from_json(r#"["alice", "secret"]"#).is_err());
        assert!(JsonCredentials::from_json(r#"{"alice": 42}"#).is_err());
    }

    #[test]
    fn test_json_from_env() {
        env::set_var("AUTH_GATE_TEST_CREDENTIALS", r#"{"dave": "letmein"}"#);

        let store = JsonCredentials::from_env("AUTH_GATE_TEST_CREDENTIALS").unwrap();

        assert_eq!(store.lookup("dave").unwrap(), Some("letmein".to_string()));
    }

    #[test]
    fn test_json_from_env_requires_the_variable() {
        assert!(JsonCredentials::from_env("AUTH_GATE_TEST_UNSET_VARIABLE").is_err());
    }
}
