use thiserror::Error;

/// Failure reported by a key-value backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(String),
    #[error("storage encoding error: {0}")]
    Encoding(String),
}

/// Rejection returned by the create, edit and delete mutations.
///
/// The first three variants carry the exact messages callers match on.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error("Stored value already exists")]
    AlreadyExists,
    #[error("Stored collection is not an array")]
    NotAnArray,
    #[error("Item not found")]
    ItemNotFound,
    #[error("stored record is not valid JSON: {0}")]
    MalformedRecord(#[from] serde_json::Error),
    /// The collection has no numeric maximum identifier (empty, or an
    /// identifier that does not coerce to an integer).
    #[error("collection has no numeric identifier under `{0}`")]
    InvalidIdentifier(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl MutationError {
    pub fn invalid_identifier(id_key: &str) -> Self { Self::InvalidIdentifier(id_key.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_caller_contract() {
        assert_eq!(MutationError::AlreadyExists.to_string(), "Stored value already exists");
        assert_eq!(MutationError::NotAnArray.to_string(), "Stored collection is not an array");
        assert_eq!(MutationError::ItemNotFound.to_string(), "Item not found");
    }

    #[test]
    fn storage_errors_pass_through() {
        let err = MutationError::from(StorageError::Io("disk full".into()));
        assert_eq!(err.to_string(), "storage io error: disk full");
    }
}
