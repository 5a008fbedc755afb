//! Durable key/value storage backends.

mod file_storage;
mod key_value_storage;
mod memory_storage;

pub use file_storage::FileStorage;
pub use key_value_storage::KeyValueStorage;
pub use memory_storage::MemoryStorage;

#[cfg(test)]
pub use key_value_storage::MockKeyValueStorage;
