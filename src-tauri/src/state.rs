//! Application state management
use reelgrab_core::{build_trigger, Config, DownloadTrigger, Result};
use std::sync::Arc;

/// Shared handle to the single download trigger behind the window's button
pub struct AppState {
    trigger: Arc<DownloadTrigger>,
}

impl AppState {
    pub fn new() -> Result<Self> {
        let config = Config::default().with_env_overrides();
        let trigger = build_trigger(&config)?;

        Ok(Self {
            trigger: Arc::new(trigger),
        })
    }

    pub fn trigger(&self) -> Arc<DownloadTrigger> {
        Arc::clone(&self.trigger)
    }
}
