//! In-memory blobs and the object URLs that point at them

use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::TriggerError;
use crate::Result;

const OBJECT_URL_PREFIX: &str = "blob:reelgrab/";

/// Response body held only until it has been saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Bytes,
    pub mime_type: Option<String>,
}

impl Blob {
    pub fn new(bytes: impl Into<Bytes>, mime_type: Option<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Registry of live object URLs
///
/// Every URL handed out by [`ObjectUrlRegistry::create_object_url`] keeps its
/// blob alive until [`ObjectUrlRegistry::revoke`] is called.
#[derive(Clone, Default)]
pub struct ObjectUrlRegistry {
    blobs: Arc<RwLock<HashMap<String, Blob>>>,
}

impl ObjectUrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_object_url(&self, blob: Blob) -> String {
        let url = format!("{}{}", OBJECT_URL_PREFIX, Uuid::new_v4());
        tracing::debug!(object_url = %url, size = blob.len(), "Created object URL");
        self.blobs.write().insert(url.clone(), blob);
        url
    }

    pub fn resolve(&self, url: &str) -> Result<Blob> {
        self.blobs
            .read()
            .get(url)
            .cloned()
            .ok_or_else(|| TriggerError::ObjectUrlNotFound(url.to_string()))
    }

    /// Release a blob; revoking an unknown URL is a no-op
    pub fn revoke(&self, url: &str) -> bool {
        let removed = self.blobs.write().remove(url).is_some();
        if removed {
            tracing::debug!(object_url = %url, "Revoked object URL");
        }
        removed
    }

    pub fn live_count(&self) -> usize {
        self.blobs.read().len()
    }
}

/// Revokes its object URL when dropped
pub(crate) struct ObjectUrlGuard<'a> {
    pub(crate) registry: &'a ObjectUrlRegistry,
    pub(crate) url: String,
}

impl Drop for ObjectUrlGuard<'_> {
    fn drop(&mut self) {
        self.registry.revoke(&self.url);
    }
}
