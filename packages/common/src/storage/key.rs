use std::fmt;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

use super::error::StorageError;

/// SHA-256 digest of an image's bytes; identifies the stored file.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageKey([u8; 32]);

impl ImageKey {
    pub fn of(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Parse the 64 character hex form produced by [`ImageKey::to_hex`].
    pub fn parse(s: &str) -> Result<Self, StorageError> {
        if s.len() != 64 {
            return Err(StorageError::InvalidKey(format!(
                "expected 64 hex characters, got {}",
                s.len()
            )));
        }
        let bytes = hex::decode(s).map_err(|e| StorageError::InvalidKey(e.to_string()))?;
        let digest: [u8; 32] = bytes
            .try_into()
            .map_err(|_| StorageError::InvalidKey("decoded to wrong length".into()))?;
        Ok(Self(digest))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Location relative to the store root: `{first byte}/{remaining bytes}` in hex.
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(hex::encode(&self.0[..1])).join(hex::encode(&self.0[1..]))
    }
}

impl fmt::Debug for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageKey({})", self.to_hex())
    }
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
