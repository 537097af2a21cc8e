//! Storage backend implementations.
//!
//! Available backends:
//! - `MemoryStore` - In-memory local backend (tests, ephemeral sessions)
//! - `FileStore` - One JSON file per event in a directory
//! - `JsonBlobClient` - Remote backend over the jsonblob REST protocol

pub mod file;
pub mod memory;
pub mod remote;

pub use file::FileStore;
pub use memory::MemoryStore;
