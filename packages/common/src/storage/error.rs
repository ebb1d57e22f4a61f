/// Errors that can occur while storing or reading images.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No image is stored under the given key.
    #[error("image not found: {0}")]
    NotFound(String),
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The key is not a 64 character hex SHA-256 digest.
    #[error("invalid image key: {0}")]
    InvalidKey(String),
    #[error("image exceeds size limit ({actual} > {limit} bytes)")]
    SizeLimitExceeded { actual: u64, limit: u64 },
}
