//! Test-account autofill for Tutero sign-up and log-in popups
//!
//! Generates deterministic per-day accounts, keeps them in a local key-value
//! store and types them into the frontmost application through the platform
//! input engine.

pub mod autofill;
pub mod clock;
pub mod config;
pub mod errors;
pub mod notify;
pub mod platforms;
pub mod store;
#[cfg(test)]
mod tests;
pub mod types;

pub use autofill::{Autofill, Command};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, EpochScope};
pub use errors::{AutofillError, AutomationError, StorageError};
pub use notify::{Notification, NotificationKind, Notifier};
pub use platforms::{create_engine, InputEngine};
pub use store::{AccountStore, JsonFileStore, KeyValueStore, MemoryStore, StoredValue};
pub use types::{AccountCredentials, ApplicationHandle, Key, PopupKind, Role};
