use crate::errors::AutomationError;
use crate::types::{ApplicationHandle, Key};
use std::sync::Arc;

/// The common trait that all platform-specific input engines must implement
#[async_trait::async_trait]
pub trait InputEngine: Send + Sync {
    /// Resolve the application that currently has focus. Called before every
    /// key event, so focus changes between steps are picked up.
    async fn frontmost_application(&self) -> Result<ApplicationHandle, AutomationError>;

    /// Insert text at the current input focus of the frontmost application
    async fn paste(&self, text: &str) -> Result<(), AutomationError>;

    /// Send a single key event to the frontmost application
    async fn press_key(&self, key: Key) -> Result<(), AutomationError>;

    /// Put text on the clipboard without pasting it
    async fn copy(&self, text: &str) -> Result<(), AutomationError>;
}

#[cfg(target_os = "macos")]
pub mod macos;
#[cfg(not(target_os = "macos"))]
pub mod unsupported;

/// Create the appropriate engine for the current platform
pub fn create_engine() -> Result<Arc<dyn InputEngine>, AutomationError> {
    #[cfg(target_os = "macos")]
    {
        Ok(Arc::new(macos::MacOSEngine::new()))
    }
    #[cfg(not(target_os = "macos"))]
    {
        Ok(Arc::new(unsupported::UnsupportedEngine::new(
            std::env::consts::OS,
        )))
    }
}
