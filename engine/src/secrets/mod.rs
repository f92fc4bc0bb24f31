pub mod string;

pub use string::SecretString;

use keyring::Entry;
use regex::Regex;
use sdk::errors::EngineError;
use std::sync::OnceLock;

/// Keychain service under which Folio stores its secrets.
pub const SERVICE_NAME: &str = "folio";

/// Keychain entry holding the Gemini API key.
pub const GEMINI_API_KEY: &str = "gemini_api_key";

/// SecretManager handles storage and retrieval of secrets using the OS keychain.
///
/// Secrets are stored in:
/// - macOS: Keychain
/// - Windows: Credential Manager
/// - Linux: Secret Service (libsecret)
///
/// Unlike an interactive prompt, a missing secret is reported as `None`: the
/// console falls back to the offline gateway instead of blocking on stdin.
pub struct SecretManager {
    service_name: String,
}

/// Where an API key was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// Named environment variable
    Environment(String),
    Keychain,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Environment(var) => write!(f, "environment variable {}", var),
            KeySource::Keychain => write!(f, "OS keychain"),
        }
    }
}

static SECRET_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

/// Patterns match Google API keys, `key=` query parameters and bearer tokens.
fn get_secret_patterns() -> &'static Vec<Regex> {
    SECRET_PATTERNS.get_or_init(|| {
        vec![
            Regex::new(r"AIza[0-9A-Za-z\-_]{35}").expect("Invalid Google pattern"),
            Regex::new(r"key=[^&\s]+").expect("Invalid query key pattern"),
            Regex::new(r"Bearer\s+[^\s]{20,}").expect("Invalid Bearer pattern"),
        ]
    })
}

/// Replace anything that looks like a credential with `[REDACTED]`.
pub fn scrub_secrets(text: &str) -> String {
    let mut scrubbed = text.to_string();
    for pattern in get_secret_patterns() {
        scrubbed = pattern.replace_all(&scrubbed, "[REDACTED]").into_owned();
    }
    scrubbed
}

impl SecretManager {
    /// Creates a new SecretManager namespaced by `service_name`.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry, EngineError> {
        Entry::new(&self.service_name, key).map_err(|e| {
            EngineError::KeyringError(format!("Failed to create keyring entry: {}", e))
        })
    }

    /// Retrieves a secret from the OS keychain; `Ok(None)` when absent.
    pub fn get_secret(&self, key: &str) -> Result<Option<SecretString>, EngineError> {
        match self.entry(key)?.get_password() {
            Ok(secret) => {
                tracing::debug!("Retrieved secret '{}' from keychain", key);
                Ok(Some(SecretString::new(secret)))
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(EngineError::KeyringError(format!(
                "Failed to retrieve secret '{}': {}",
                key, e
            ))),
        }
    }

    /// Stores a secret in the OS keychain.
    pub fn set_secret(&self, key: &str, value: &str) -> Result<(), EngineError> {
        if value.trim().is_empty() {
            return Err(EngineError::KeyringError(format!(
                "Refusing to store an empty value for '{}'",
                key
            )));
        }

        self.entry(key)?.set_password(value).map_err(|e| {
            EngineError::KeyringError(format!("Failed to store secret '{}': {}", key, e))
        })?;

        tracing::info!("Stored secret '{}' in keychain", key);
        Ok(())
    }

    /// Deletes a secret from the OS keychain.
    pub fn delete_secret(&self, key: &str) -> Result<(), EngineError> {
        self.entry(key)?.delete_password().map_err(|e| {
            EngineError::KeyringError(format!("Failed to delete secret '{}': {}", key, e))
        })?;

        tracing::info!("Deleted secret '{}' from keychain", key);
        Ok(())
    }

    /// Checks if a secret exists without reading it into memory.
    pub fn has_secret(&self, key: &str) -> bool {
        match self.entry(key) {
            Ok(entry) => entry.get_password().is_ok(),
            Err(_) => false,
        }
    }

    /// Look up the Gemini key: environment variable `env_var` first, then the
    /// keychain. Keychain failures are logged and treated as "no key".
    pub fn resolve_api_key(&self, env_var: &str) -> Option<(SecretString, KeySource)> {
        if let Ok(value) = std::env::var(env_var) {
            if !value.trim().is_empty() {
                return Some((
                    SecretString::new(value),
                    KeySource::Environment(env_var.to_string()),
                ));
            }
        }

        match self.get_secret(GEMINI_API_KEY) {
            Ok(Some(secret)) => Some((secret, KeySource::Keychain)),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "keychain unavailable, continuing without API key");
                None
            }
        }
    }
}

impl Default for SecretManager {
    fn default() -> Self {
        Self::new(SERVICE_NAME)
    }
}
