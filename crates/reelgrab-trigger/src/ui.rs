//! UI ports the trigger drives
//!
//! The handler never looks elements up on its own; the caller passes the
//! field, control and status area it should read from and write to.

use serde::{Deserialize, Serialize};

/// Text input holding the pasted video URL
pub trait UrlField: Send + Sync {
    fn value(&self) -> String;
}

/// Button that starts a download
pub trait TriggerControl: Send + Sync {
    fn set_enabled(&self, enabled: bool);
    fn set_label(&self, label: &str);
}

/// Element showing feedback to the user
pub trait StatusArea: Send + Sync {
    fn set_text(&self, text: &str);
}

impl UrlField for String {
    fn value(&self) -> String {
        self.clone()
    }
}

impl UrlField for &str {
    fn value(&self) -> String {
        (*self).to_string()
    }
}

/// Status texts shown at each step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusMessages {
    pub empty_input: String,
    pub fetching: String,
    pub rejected: String,
    pub network_error: String,
    pub save_error: String,
    pub started: String,
}

impl Default for StatusMessages {
    fn default() -> Self {
        Self {
            empty_input: "⚠️ Paste an Instagram link".to_string(),
            fetching: "⏳ Fetching video...".to_string(),
            rejected: "❌ Failed to download".to_string(),
            network_error: "❌ Network error, try again".to_string(),
            save_error: "❌ Could not save the video".to_string(),
            started: "✅ Download started".to_string(),
        }
    }
}

/// Control labels for the idle and busy states
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerLabels {
    pub idle: String,
    pub busy: String,
}

impl Default for TriggerLabels {
    fn default() -> Self {
        Self {
            idle: "Download".to_string(),
            busy: "Downloading...".to_string(),
        }
    }
}
