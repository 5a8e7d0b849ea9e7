//! timestable-storage: key-value store backends.
//!
//! Implements the `KeyValueStore` trait over a directory of files, one per
//! key, and over an in-memory map for tests and dry runs.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
