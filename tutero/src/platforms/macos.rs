//! macOS input through AppleScript (System Events) and the system clipboard

use crate::errors::AutomationError;
use crate::platforms::InputEngine;
use crate::types::{ApplicationHandle, Key};
use tracing::{debug, instrument};

const FRONTMOST_SCRIPT: &str = r#"tell application "System Events" to get bundle identifier of first application process whose frontmost is true"#;

pub struct MacOSEngine;

impl MacOSEngine {
    pub fn new() -> Self {
        Self
    }

    /// Send a `keystroke` clause to the frontmost app via System Events.
    async fn keystroke(&self, clause: &str) -> Result<(), AutomationError> {
        let app = self.frontmost_application().await?;
        let script = keystroke_script(&app, clause);
        run_applescript(&script).await.map(|_| ())
    }
}

impl Default for MacOSEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl InputEngine for MacOSEngine {
    #[instrument(skip(self))]
    async fn frontmost_application(&self) -> Result<ApplicationHandle, AutomationError> {
        let bundle_id = run_applescript(FRONTMOST_SCRIPT).await?;
        if bundle_id.is_empty() || bundle_id == "missing value" {
            return Err(AutomationError::PlatformError(
                "No frontmost application found".to_string(),
            ));
        }
        Ok(ApplicationHandle { bundle_id })
    }

    #[instrument(skip(self, text))]
    async fn paste(&self, text: &str) -> Result<(), AutomationError> {
        self.copy(text).await?;
        self.keystroke(r#""v" using command down"#).await
    }

    #[instrument(skip(self))]
    async fn press_key(&self, key: Key) -> Result<(), AutomationError> {
        self.keystroke(&format!("(ASCII character {})", key.ascii_code()))
            .await
    }

    #[instrument(skip(self, text))]
    async fn copy(&self, text: &str) -> Result<(), AutomationError> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| AutomationError::ClipboardError(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| AutomationError::ClipboardError(e.to_string()))
    }
}

fn keystroke_script(app: &ApplicationHandle, clause: &str) -> String {
    format!(
        "tell application id \"{}\"\n    tell application \"System Events\"\n        keystroke {}\n    end tell\nend tell",
        app.bundle_id.replace('\\', "\\\\").replace('"', "\\\""),
        clause
    )
}

async fn run_applescript(script: &str) -> Result<String, AutomationError> {
    debug!("running osascript:\n{}", script);
    let output = tokio::process::Command::new("osascript")
        .arg("-e")
        .arg(script)
        .output()
        .await
        .map_err(|e| AutomationError::PlatformError(format!("Failed to run osascript: {e}")))?;

    if !output.status.success() {
        return Err(AutomationError::ScriptFailed {
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
