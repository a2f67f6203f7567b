use thiserror::Error;

/// Failures raised by the platform input engines.
#[derive(Error, Debug)]
pub enum AutomationError {
    #[error("Platform-specific error: {0}")]
    PlatformError(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Clipboard error: {0}")]
    ClipboardError(String),

    #[error("AppleScript failed with status {status:?}: {stderr}")]
    ScriptFailed { status: Option<i32>, stderr: String },
}

/// Failures raised while reading or writing the key-value store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not locate a configuration directory for the store")]
    NoConfigDir,

    #[error("Invalid stored value: {0}")]
    InvalidValue(String),
}

/// Everything a command can fail with. Caught at the command boundary and
/// turned into a failure notification.
#[derive(Error, Debug)]
pub enum AutofillError {
    #[error("{title}")]
    Validation {
        title: String,
        message: Option<String>,
    },

    #[error("{0}")]
    Precondition(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Automation(#[from] AutomationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AutofillError {
    /// Short headline for the failure notification.
    pub fn title(&self) -> String {
        match self {
            AutofillError::Validation { title, .. } => title.clone(),
            AutofillError::Precondition(msg) | AutofillError::NotFound(msg) => msg.clone(),
            AutofillError::Automation(_) => "Autofill failed".to_string(),
            AutofillError::Storage(_) => "Storage failed".to_string(),
        }
    }

    /// Optional detail line shown under the title.
    pub fn detail(&self) -> Option<String> {
        match self {
            AutofillError::Validation { message, .. } => message.clone(),
            AutofillError::Precondition(_) | AutofillError::NotFound(_) => None,
            AutofillError::Automation(e) => Some(e.to_string()),
            AutofillError::Storage(e) => Some(e.to_string()),
        }
    }
}
