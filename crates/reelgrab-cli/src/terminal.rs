//! Terminal stand-ins for the control and status area

use parking_lot::Mutex;

use reelgrab_core::{StatusArea, TriggerControl};

pub struct TerminalControl {
    state: Mutex<(bool, String)>,
}

impl TerminalControl {
    pub fn new(label: &str) -> Self {
        Self {
            state: Mutex::new((true, label.to_string())),
        }
    }
}

impl TriggerControl for TerminalControl {
    fn set_enabled(&self, enabled: bool) {
        let mut state = self.state.lock();
        state.0 = enabled;
        tracing::debug!(enabled, label = %state.1, "Control updated");
    }

    fn set_label(&self, label: &str) {
        let mut state = self.state.lock();
        state.1 = label.to_string();
        tracing::debug!(enabled = state.0, label, "Control updated");
    }
}

pub struct TerminalStatus;

impl StatusArea for TerminalStatus {
    fn set_text(&self, text: &str) {
        println!("{}", text);
    }
}
