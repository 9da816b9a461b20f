use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::MutationError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    Success,
    Error,
}

/// Value a successful mutation resolves with.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MutationOutcome {
    pub data: Option<Value>,
    /// Identifier assigned by a collection create
    pub id: Option<i64>,
}

impl MutationOutcome {
    pub fn with_data(data: Value) -> Self { Self { data: Some(data), id: None } }
}

/// Wire shape handed to the data-fetching layer:
/// `{status, data?, id?, message?}` with absent fields omitted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OperationResult {
    pub status: OperationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OperationResult {
    pub fn is_success(&self) -> bool { self.status == OperationStatus::Success }
}

impl From<MutationOutcome> for OperationResult {
    fn from(outcome: MutationOutcome) -> Self {
        Self { status: OperationStatus::Success, data: outcome.data, id: outcome.id, message: None }
    }
}

impl From<MutationError> for OperationResult {
    fn from(err: MutationError) -> Self {
        Self { status: OperationStatus::Error, data: None, id: None, message: Some(err.to_string()) }
    }
}

impl From<Result<MutationOutcome, MutationError>> for OperationResult {
    fn from(res: Result<MutationOutcome, MutationError>) -> Self {
        match res {
            Ok(outcome) => outcome.into(),
            Err(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_omits_absent_fields() {
        let res = OperationResult::from(MutationOutcome { data: Some(json!({"id": 2})), id: Some(2) });
        assert_eq!(
            serde_json::to_value(&res).unwrap(),
            json!({"status": "success", "data": {"id": 2}, "id": 2})
        );

        let bare = OperationResult::from(MutationOutcome::default());
        assert_eq!(serde_json::to_value(&bare).unwrap(), json!({"status": "success"}));
    }

    #[test]
    fn error_carries_message() {
        let res = OperationResult::from(Err::<MutationOutcome, _>(MutationError::ItemNotFound));
        assert!(!res.is_success());
        assert_eq!(
            serde_json::to_value(&res).unwrap(),
            json!({"status": "error", "message": "Item not found"})
        );
    }
}
