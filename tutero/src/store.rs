//! Key-value persistence for the operator name, daily counters and generated accounts

use crate::config::EpochScope;
use crate::errors::{AutofillError, StorageError};
use crate::types::Role;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z]+$").expect("name pattern is a valid regex"));

const NAME_KEY: &str = "name";
const DATE_KEY: &str = "date";

pub fn date_key(scope: EpochScope, role: Role) -> String {
    match scope {
        EpochScope::Global => DATE_KEY.to_string(),
        EpochScope::PerRole => format!("{}-{DATE_KEY}", role.token()),
    }
}

pub fn account_number_key(name: &str, role: Role) -> String {
    format!("{name}-{}-account-number", role.token())
}

pub fn accounts_key(role: Role) -> String {
    format!("{}-accounts", role.token())
}

/// A single stored value. Mirrors what the store accepts: strings, numbers and booleans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Bool(bool),
    Number(i64),
    String(String),
}

impl StoredValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StoredValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            StoredValue::Number(n) => u32::try_from(*n).ok(),
            StoredValue::String(s) => s.parse().ok(),
            StoredValue::Bool(_) => None,
        }
    }
}

impl fmt::Display for StoredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoredValue::Bool(b) => write!(f, "{b}"),
            StoredValue::Number(n) => write!(f, "{n}"),
            StoredValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for StoredValue {
    fn from(s: &str) -> Self {
        StoredValue::String(s.to_string())
    }
}

impl From<String> for StoredValue {
    fn from(s: String) -> Self {
        StoredValue::String(s)
    }
}

impl From<u32> for StoredValue {
    fn from(n: u32) -> Self {
        StoredValue::Number(i64::from(n))
    }
}

/// The persistence collaborator. Keys are case-sensitive.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<StoredValue>, StorageError>;

    fn set(&mut self, key: &str, value: StoredValue) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    /// Every stored item, ordered by key.
    fn all(&self) -> Result<BTreeMap<String, StoredValue>, StorageError>;

    fn clear(&mut self) -> Result<(), StorageError>;
}

/// In-memory store. Nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: BTreeMap<String, StoredValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<StoredValue>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: StoredValue) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }

    fn all(&self) -> Result<BTreeMap<String, StoredValue>, StorageError> {
        Ok(self.items.clone())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.items.clear();
        Ok(())
    }
}

/// A JSON object on disk, rewritten in full after every mutation.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    items: BTreeMap<String, StoredValue>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    #[instrument(skip(path))]
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let items = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(items = items.len(), "opened store at {}", path.display());
        Ok(Self { path, items })
    }

    /// Replace whatever is at `path` with an empty store, without reading it.
    /// Recovers from a file that no longer parses.
    #[instrument(skip(path))]
    pub fn reset(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let store = Self {
            path: path.into(),
            items: BTreeMap::new(),
        };
        store.flush()?;
        debug!("reset store at {}", store.path.display());
        Ok(store)
    }

    /// Write to a temp file next to the target, then rename it over the target.
    fn flush(&self) -> Result<(), StorageError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;
        let json = serde_json::to_string_pretty(&self.items)?;
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<StoredValue>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: StoredValue) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.items.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn all(&self) -> Result<BTreeMap<String, StoredValue>, StorageError> {
        Ok(self.items.clone())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.items.clear();
        self.flush()
    }
}

/// Typed view over a [`KeyValueStore`] holding the account state.
pub struct AccountStore {
    backend: Box<dyn KeyValueStore>,
}

impl AccountStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    pub fn name(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .backend
            .get(NAME_KEY)?
            .and_then(|v| v.as_str().map(str::to_string))
            .filter(|s| !s.is_empty()))
    }

    /// Validate and persist the operator name, lower-cased.
    pub fn set_name(&mut self, value: &str) -> Result<String, AutofillError> {
        if value.is_empty() {
            return Err(AutofillError::Validation {
                title: "Name is required".to_string(),
                message: None,
            });
        }
        if !NAME_PATTERN.is_match(value) {
            return Err(AutofillError::Validation {
                title: "Invalid name".to_string(),
                message: Some("Name should contain only letters".to_string()),
            });
        }
        let name = value.to_lowercase();
        self.backend.set(NAME_KEY, name.as_str().into())?;
        Ok(name)
    }

    /// Erase every key. There is no undo.
    pub fn clear_all(&mut self) -> Result<(), StorageError> {
        self.backend.clear()
    }

    pub fn accounts(&self, role: Role) -> Result<Vec<String>, StorageError> {
        Ok(match self.backend.get(&accounts_key(role))? {
            Some(StoredValue::String(joined)) if !joined.is_empty() => {
                joined.split(',').map(str::to_string).collect()
            }
            _ => Vec::new(),
        })
    }

    pub fn last_account(&self, role: Role) -> Result<Option<String>, StorageError> {
        Ok(self.accounts(role)?.pop())
    }

    /// Emails are stored comma-joined, so an email containing a comma is refused.
    pub fn append_account(&mut self, role: Role, email: &str) -> Result<(), StorageError> {
        if email.is_empty() || email.contains(',') {
            return Err(StorageError::InvalidValue(format!(
                "cannot store account email '{email}'"
            )));
        }
        let mut accounts = self.accounts(role)?;
        accounts.push(email.to_string());
        self.backend
            .set(&accounts_key(role), accounts.join(",").into())
    }

    pub fn counter(&self, name: &str, role: Role) -> Result<u32, StorageError> {
        Ok(self
            .backend
            .get(&account_number_key(name, role))?
            .and_then(|v| v.as_u32())
            .unwrap_or(0))
    }

    pub fn set_counter(&mut self, name: &str, role: Role, value: u32) -> Result<(), StorageError> {
        self.backend
            .set(&account_number_key(name, role), value.into())
    }

    pub fn date_stamp(&self, scope: EpochScope, role: Role) -> Result<Option<String>, StorageError> {
        Ok(self
            .backend
            .get(&date_key(scope, role))?
            .and_then(|v| v.as_str().map(str::to_string)))
    }

    pub fn set_date_stamp(
        &mut self,
        scope: EpochScope,
        role: Role,
        value: &str,
    ) -> Result<(), StorageError> {
        self.backend.set(&date_key(scope, role), value.into())
    }

    pub fn entries(&self) -> Result<Vec<(String, StoredValue)>, StorageError> {
        Ok(self.backend.all()?.into_iter().collect())
    }

    /// Stored items without the account lists, as shown by `manage show`.
    pub fn preferences(&self) -> Result<Vec<(String, StoredValue)>, StorageError> {
        Ok(self
            .entries()?
            .into_iter()
            .filter(|(key, _)| !key.contains("accounts"))
            .collect())
    }
}
