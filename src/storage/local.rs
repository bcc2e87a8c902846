use std::path::{Path, PathBuf};

use base64::Engine;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::{PhotoStore, StorageError, StoredPhoto};

/// Filesystem photo store: `<root>/<student_id>/<content hash>.<ext>`.
///
/// Files are content-addressed: storing the same bytes twice writes once
/// and yields the same URL.
#[derive(Debug, Clone)]
pub struct LocalPhotoStore {
    root: PathBuf,
}

impl LocalPhotoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn target_path(&self, student_id: &Uuid, content_hash: &str, bytes: &[u8]) -> PathBuf {
        self.root
            .join(student_id.to_string())
            .join(format!("{}.{}", content_hash, photo_extension(bytes)))
    }
}

impl PhotoStore for LocalPhotoStore {
    fn store(&self, student_id: &Uuid, bytes: &[u8]) -> Result<StoredPhoto, StorageError> {
        let content_hash = content_hash(bytes);
        let target = self.target_path(student_id, &content_hash, bytes);

        let dir = target
            .parent()
            .ok_or_else(|| StorageError::InvalidPath(target.display().to_string()))?;
        std::fs::create_dir_all(dir)?;

        if target.exists() {
            tracing::debug!(student_id = %student_id, path = %target.display(), "Photo already stored");
        } else {
            std::fs::write(&target, bytes)?;
            tracing::debug!(
                student_id = %student_id,
                size = bytes.len(),
                path = %target.display(),
                "Photo stored"
            );
        }

        let absolute = std::path::absolute(&target)?;
        Ok(StoredPhoto {
            url: format!("file://{}", absolute.display()),
            content_hash,
        })
    }
}

/// SHA-256 of the bytes, base64url (no padding) so it is safe as a file name.
pub fn content_hash(bytes: &[u8]) -> String {
    let hash = Sha256::digest(bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(hash)
}

/// File extension for the sniffed image format, `bin` when unknown.
pub fn photo_extension(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .ok()
        .and_then(|format| format.extensions_str().first().copied())
        .unwrap_or("bin")
}
