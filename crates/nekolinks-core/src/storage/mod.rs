//! Storage layer
//!
//! Persists each collection as one JSON document in a key-value namespace.
//!
//! ## Architecture
//!
//! - **Backend**: raw string key-value store (files on disk, or memory)
//! - **LocalStorage**: typed JSON read/write with corruption recovery
//!
//! There is no schema version and no migration; a document that no longer
//! decodes is discarded and replaced by the caller's default.

pub mod backend;
pub mod error;
pub mod local;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use error::{StorageError, StorageResult};
pub use local::{LocalStorage, UNDEFINED_SENTINEL};
