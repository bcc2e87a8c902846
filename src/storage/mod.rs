//! Photo blob storage.

pub mod local;

pub use local::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage path: {0}")]
    InvalidPath(String),
}

/// Where a stored photo ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPhoto {
    pub url: String,
    /// SHA-256 of the photo bytes, base64url without padding.
    pub content_hash: String,
}

/// Backend that keeps uploaded uniform photos and hands back a URL.
pub trait PhotoStore: Send + Sync {
    fn store(&self, student_id: &Uuid, bytes: &[u8]) -> Result<StoredPhoto, StorageError>;
}
