use crate::clock::Clock;
use crate::errors::AutomationError;
use crate::notify::{Notification, Notifier};
use crate::platforms::InputEngine;
use crate::types::{ApplicationHandle, Key};
use chrono::{Days, NaiveDate};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Paste { app: String, text: String },
    Press { app: String, key: Key },
    Copy(String),
}

/// Records every input call instead of touching the desktop.
pub struct RecordingEngine {
    app: String,
    events: Mutex<Vec<InputEvent>>,
    fail_after: Option<usize>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self {
            app: "com.apple.Safari".to_string(),
            events: Mutex::new(Vec::new()),
            fail_after: None,
        }
    }

    /// Accept `n` events, then fail every call after that.
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::new()
        }
    }

    pub fn events(&self) -> Vec<InputEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn pasted(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                InputEvent::Paste { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: InputEvent) -> Result<(), AutomationError> {
        let mut events = self.events.lock().unwrap();
        if self.fail_after.is_some_and(|n| events.len() >= n) {
            return Err(AutomationError::ScriptFailed {
                status: Some(1),
                stderr: "System Events got an error".to_string(),
            });
        }
        events.push(event);
        Ok(())
    }
}

#[async_trait::async_trait]
impl InputEngine for RecordingEngine {
    async fn frontmost_application(&self) -> Result<ApplicationHandle, AutomationError> {
        Ok(ApplicationHandle {
            bundle_id: self.app.clone(),
        })
    }

    async fn paste(&self, text: &str) -> Result<(), AutomationError> {
        let app = self.frontmost_application().await?.bundle_id;
        self.record(InputEvent::Paste {
            app,
            text: text.to_string(),
        })
    }

    async fn press_key(&self, key: Key) -> Result<(), AutomationError> {
        let app = self.frontmost_application().await?.bundle_id;
        self.record(InputEvent::Press { app, key })
    }

    async fn copy(&self, text: &str) -> Result<(), AutomationError> {
        self.record(InputEvent::Copy(text.to_string()))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.seen.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

/// A clock the test can move forward.
pub struct SteppingClock {
    today: Mutex<NaiveDate>,
}

impl SteppingClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    pub fn advance_days(&self, days: u64) {
        let mut today = self.today.lock().unwrap();
        *today = *today + Days::new(days);
    }
}

impl Clock for SteppingClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap()
    }
}
