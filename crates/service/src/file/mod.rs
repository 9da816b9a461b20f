//! File-backed implementations of the storage seams.

pub mod file_storage;

pub use file_storage::FileStorage;
