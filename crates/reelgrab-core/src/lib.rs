//! ReelGrab Core
//!
//! Configuration and wiring shared by the terminal and desktop front ends.

mod config;
mod error;

use std::sync::Arc;
use std::time::Duration;

pub use config::Config;
pub use error::CoreError;

pub use reelgrab_trigger::{
    Blob, DiskSaver, DownloadEndpoint, DownloadRequest, DownloadTrigger, EndpointResponse,
    FileSaver, HttpEndpoint, ObjectUrlRegistry, SaveAnchor, SavedFile, StatusArea,
    StatusMessages, TriggerControl, TriggerError, TriggerLabels, TriggerOutcome, TriggerPhase,
    UrlField,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}

/// Build a trigger that posts to the configured endpoint and saves to disk
pub fn build_trigger(config: &Config) -> Result<DownloadTrigger> {
    config.validate()?;

    let endpoint = HttpEndpoint::new(
        &config.endpoint_base,
        &config.endpoint_path,
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let saver = DiskSaver::new(config.download_dir.clone());

    tracing::info!(
        endpoint = %endpoint.url(),
        download_dir = %config.download_dir.display(),
        "Download trigger ready"
    );

    Ok(DownloadTrigger::new(Arc::new(endpoint), Arc::new(saver))
        .with_file_name(config.file_name.clone())
        .with_messages(config.messages.clone())
        .with_labels(config.labels.clone()))
}
