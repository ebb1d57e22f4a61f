use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::error::StorageError;
use super::key::ImageKey;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Where an image landed after [`ImageStore::put`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredImage {
    pub key: ImageKey,
    /// Absolute path, readable by the classification service.
    pub path: PathBuf,
    pub size: u64,
}

/// Durable, content-addressed image storage.
///
/// Storing identical bytes twice yields the same key and path.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store an image and return its stable location.
    async fn put(&self, data: &[u8]) -> Result<StoredImage, StorageError>;

    /// Open a stored image for streaming.
    async fn open(&self, key: &ImageKey) -> Result<BoxReader, StorageError>;
}
