use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::BufReader;
use tracing::debug;

use super::error::StorageError;
use super::key::ImageKey;
use super::store::{BoxReader, ImageStore, StoredImage};

/// Images stored under `{root}/{2 hex chars}/{62 hex chars}`.
///
/// Writes go to `{root}/.tmp` first and are renamed into place, so a reader
/// never observes a partially written image.
pub struct FilesystemImageStore {
    root: PathBuf,
    max_size: u64,
}

impl FilesystemImageStore {
    /// Create the store, creating `root` if needed.
    ///
    /// `root` is canonicalized so that paths handed to the classifier are absolute.
    pub async fn new(root: impl AsRef<Path>, max_size: u64) -> Result<Self, StorageError> {
        let root = root.as_ref();
        fs::create_dir_all(root.join(".tmp")).await?;
        let root = fs::canonicalize(root).await?;
        Ok(Self { root, max_size })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn image_path(&self, key: &ImageKey) -> PathBuf {
        self.root.join(key.relative_path())
    }

    fn temp_path(&self) -> PathBuf {
        self.root
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl ImageStore for FilesystemImageStore {
    async fn put(&self, data: &[u8]) -> Result<StoredImage, StorageError> {
        let size = data.len() as u64;
        if size > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: size,
                limit: self.max_size,
            });
        }

        let key = ImageKey::of(data);
        let path = self.image_path(&key);

        if fs::try_exists(&path).await? {
            debug!(key = %key, "Image already stored");
            return Ok(StoredImage { key, path, size });
        }

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = fs::rename(&temp_path, &path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(StoredImage { key, path, size })
    }

    async fn open(&self, key: &ImageKey) -> Result<BoxReader, StorageError> {
        match fs::File::open(self.image_path(key)).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_hex()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
