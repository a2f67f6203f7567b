//! Fallback for platforms without an input engine. Store-only commands keep
//! working; anything that types or touches the clipboard fails.

use crate::errors::AutomationError;
use crate::platforms::InputEngine;
use crate::types::{ApplicationHandle, Key};

pub struct UnsupportedEngine {
    platform: String,
}

impl UnsupportedEngine {
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
        }
    }

    fn error(&self) -> AutomationError {
        AutomationError::UnsupportedPlatform(format!(
            "keyboard automation is not available on {}",
            self.platform
        ))
    }
}

#[async_trait::async_trait]
impl InputEngine for UnsupportedEngine {
    async fn frontmost_application(&self) -> Result<ApplicationHandle, AutomationError> {
        Err(self.error())
    }

    async fn paste(&self, _text: &str) -> Result<(), AutomationError> {
        Err(self.error())
    }

    async fn press_key(&self, _key: Key) -> Result<(), AutomationError> {
        Err(self.error())
    }

    async fn copy(&self, _text: &str) -> Result<(), AutomationError> {
        Err(self.error())
    }
}
