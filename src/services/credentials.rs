//! Credential lookup for agent initialization.

use std::collections::HashMap;

/// Resolves per-specialty API handles. A missing key is `None`, never an error.
pub trait CredentialStore: Send + Sync {
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Reads credentials from process environment (after `.env` is loaded)
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialStore;

impl CredentialStore for EnvCredentialStore {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    }
}

/// In-memory credentials, handy for tests and demos
#[derive(Debug, Default, Clone)]
pub struct StaticCredentialStore {
    values: HashMap<String, String>,
}

impl StaticCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl CredentialStore for StaticCredentialStore {
    fn lookup(&self, key: &str) -> Option<String> {
        self.values.get(key).filter(|v| !v.trim().is_empty()).cloned()
    }
}
