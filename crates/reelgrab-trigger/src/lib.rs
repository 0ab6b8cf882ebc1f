//! ReelGrab Download Trigger
//!
//! One user action, one request, one saved file:
//! - Empty input is rejected before any network call
//! - A single POST carries `{"url": ...}` to the download endpoint
//! - A 2xx body is registered as an object URL and handed to a saver
//! - The control is always restored once the attempt settles

mod blob;
mod endpoint;
mod error;
mod handler;
mod phase;
mod saver;
mod ui;

pub use blob::{Blob, ObjectUrlRegistry};
pub use endpoint::{DownloadEndpoint, DownloadRequest, EndpointResponse, HttpEndpoint};
pub use error::TriggerError;
pub use handler::{DownloadTrigger, TriggerOutcome};
pub use phase::TriggerPhase;
pub use saver::{DiskSaver, FileSaver, SaveAnchor, SavedFile};
pub use ui::{StatusArea, StatusMessages, TriggerControl, TriggerLabels, UrlField};

pub type Result<T> = std::result::Result<T, TriggerError>;
