//! Save step: turn an object URL plus file name into a file on disk

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use crate::blob::Blob;
use crate::Result;

const FALLBACK_FILE_NAME: &str = "download";

/// Transient save instruction, the moral equivalent of `<a href download>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveAnchor {
    pub href: String,
    pub download: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
    pub sha256: String,
    pub saved_at: DateTime<Utc>,
}

/// Performs the save action for an anchor
#[async_trait]
pub trait FileSaver: Send + Sync {
    async fn save(&self, anchor: &SaveAnchor, blob: &Blob) -> Result<SavedFile>;
}

/// Writes saved files into a download directory
#[derive(Debug, Clone)]
pub struct DiskSaver {
    download_dir: PathBuf,
}

impl DiskSaver {
    pub fn new(download_dir: PathBuf) -> Self {
        Self { download_dir }
    }
}

#[async_trait]
impl FileSaver for DiskSaver {
    async fn save(&self, anchor: &SaveAnchor, blob: &Blob) -> Result<SavedFile> {
        let file_name = sanitize_file_name(&anchor.download);
        let path = self.download_dir.join(&file_name);

        tokio::fs::create_dir_all(&self.download_dir).await?;
        tokio::fs::write(&path, &blob.bytes).await?;

        let sha256 = compute_sha256_hex(&blob.bytes);

        tracing::info!(
            path = %path.display(),
            size = blob.len(),
            sha256 = %sha256,
            "Saved file"
        );

        Ok(SavedFile {
            path,
            file_name,
            size: blob.len() as u64,
            sha256,
            saved_at: Utc::now(),
        })
    }
}

/// Reduce an anchor's `download` attribute to a bare file name inside the
/// download dir: last path component, control characters dropped.
fn sanitize_file_name(file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let cleaned: String = base.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        FALLBACK_FILE_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

fn compute_sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
