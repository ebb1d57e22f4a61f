//! Content-addressed image storage shared with the classification service.

mod error;
mod key;
mod store;

pub mod filesystem;

pub use error::StorageError;
pub use filesystem::FilesystemImageStore;
pub use key::ImageKey;
pub use store::{BoxReader, ImageStore, StoredImage};
