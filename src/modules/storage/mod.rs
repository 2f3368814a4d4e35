pub mod file;
pub mod memory;

// Re-export the storage backends
pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::io;

/// A synchronous key/value store of opaque strings, the durable primitive
/// everything else sits on. Backends only move bytes; callers own
/// serialization and decide what a missing key means.
pub trait Storage {
    /// Read the value stored under `key`, or `None` when nothing is stored.
    fn get(&self, key: &str) -> io::Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value whole.
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;

    /// Delete whatever is stored under `key`. Absent keys are not an error.
    fn remove(&mut self, key: &str) -> io::Result<()>;
}
