//! Query/mutation facade over a string key-value store.
//! - `LocalQuery` reads one key, falling back to an initial value.
//! - `LocalMutation` creates, edits and deletes the record under one key.
//! - Every operation waits a fixed emulated latency first.
//! - Storage is injected through `storage::KeyValueStorage`.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod file;
pub mod record;
pub mod types;
pub mod query;
pub mod mutation;
pub mod store;

pub use errors::{MutationError, StorageError};
pub use mutation::{LocalMutation, MutationOptions};
pub use query::LocalQuery;
pub use store::LocalStore;
pub use types::{MutationOutcome, OperationResult, OperationStatus};
