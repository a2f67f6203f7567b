//! Runtime configuration for the autofill engine

use crate::errors::{AutofillError, StorageError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_PASSWORD: &str = "123123";
pub const DEFAULT_EMAIL_DOMAIN: &str = "yopmail.com";
pub const DEFAULT_KEY_DELAY_MS: u64 = 50;

/// How the daily counter reset is keyed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EpochScope {
    /// One `date` key for every role. The first sign-up of a new day resets
    /// the counter of the role being signed up and moves the shared stamp, so
    /// the other role skips its reset that day and keeps counting from its
    /// previous value.
    #[default]
    Global,
    /// A `{role}-date` key per role.
    PerRole,
}

impl FromStr for EpochScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "global" => Ok(EpochScope::Global),
            "per-role" | "per_role" | "role" => Ok(EpochScope::PerRole),
            other => Err(format!("unknown epoch scope '{other}'")),
        }
    }
}

impl fmt::Display for EpochScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpochScope::Global => f.write_str("global"),
            EpochScope::PerRole => f.write_str("per-role"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON file backing the store. `None` means the user config directory.
    pub store_path: Option<PathBuf>,
    pub password: String,
    pub email_domain: String,
    pub epoch_scope: EpochScope,
    /// Pause after every pasted field or key press.
    pub key_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: None,
            password: DEFAULT_PASSWORD.to_string(),
            email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
            epoch_scope: EpochScope::default(),
            key_delay_ms: DEFAULT_KEY_DELAY_MS,
        }
    }
}

/// Check a domain before it is baked into generated emails. Account lists are
/// comma-joined, so commas and whitespace are refused.
pub fn validate_email_domain(domain: &str) -> Result<String, String> {
    let domain = domain.trim();
    if domain.is_empty() {
        return Err("email domain must not be empty".to_string());
    }
    if let Some(bad) = domain.chars().find(|c| *c == ',' || *c == '@' || c.is_whitespace()) {
        return Err(format!("email domain '{domain}' contains {bad:?}"));
    }
    Ok(domain.to_string())
}

impl Config {
    /// Reject settings that would produce emails the store cannot hold.
    pub fn validate(&self) -> Result<(), AutofillError> {
        validate_email_domain(&self.email_domain).map_err(|message| AutofillError::Validation {
            title: "Invalid email domain".to_string(),
            message: Some(message),
        })?;
        Ok(())
    }

    /// Resolve the store file, falling back to `<config dir>/tutero/storage.json`.
    pub fn resolved_store_path(&self) -> Result<PathBuf, StorageError> {
        match &self.store_path {
            Some(path) => Ok(path.clone()),
            None => dirs::config_dir()
                .map(|d| d.join("tutero").join("storage.json"))
                .ok_or(StorageError::NoConfigDir),
        }
    }
}
