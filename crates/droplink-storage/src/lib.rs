//! Blob store abstraction and the local filesystem backend.
//!
//! Blobs are addressed by storage name only. Original client filenames never
//! touch the filesystem; `keys::storage_name_for` derives a collision-free
//! name and `LocalStorage` refuses any name that could escape its base
//! directory.

pub mod keys;
mod local;
mod traits;

pub use keys::storage_name_for;
pub use local::LocalStorage;
pub use traits::{ByteStream, Storage, StorageError, StorageResult, StoredBlob};
