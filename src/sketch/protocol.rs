//! Request and response shapes exchanged with the recognition service.

use crate::sketch::error::SubmitError;
use crate::sketch::snapshot::Snapshot;
use crate::sketch::variables::VariableStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RecognitionRequest {
    /// PNG data URL of the snapshot.
    pub image: String,
    pub dict_of_vars: HashMap<String, String>,
}

impl RecognitionRequest {
    pub fn from_snapshot(
        snapshot: &Snapshot,
        variables: &VariableStore,
    ) -> Result<Self, SubmitError> {
        let image = snapshot
            .to_data_url()
            .map_err(|err| SubmitError::Encode(format!("{err:#}")))?;
        Ok(Self {
            image,
            dict_of_vars: variables.bindings().clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionResult {
    pub expression: String,
    pub value: String,
    pub is_assignment: bool,
}

impl RecognitionResult {
    pub fn new(expression: impl Into<String>, value: impl Into<String>, is_assignment: bool) -> Self {
        Self {
            expression: expression.into(),
            value: value.into(),
            is_assignment,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CalculateResponse {
    data: Vec<WireResult>,
}

#[derive(Debug, Deserialize)]
struct WireResult {
    expr: String,
    result: WireValue,
    assign: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireValue {
    Text(String),
    Number(serde_json::Number),
}

impl WireValue {
    fn into_text(self) -> String {
        match self {
            WireValue::Text(text) => text,
            WireValue::Number(number) => number.to_string(),
        }
    }
}

/// Validates a response body. Any schema violation rejects the whole body so
/// no partial result set is ever applied.
pub fn parse_response(body: &str) -> Result<Vec<RecognitionResult>, SubmitError> {
    let decoded: CalculateResponse = serde_json::from_str(body)
        .map_err(|err| SubmitError::MalformedResponse(err.to_string()))?;
    Ok(decoded
        .data
        .into_iter()
        .map(|item| RecognitionResult {
            expression: item.expr,
            value: item.result.into_text(),
            is_assignment: item.assign,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_results_in_service_order() {
        let body = r#"{
            "message": "Image processed",
            "status": "success",
            "data": [
                {"expr": "x", "result": "5", "assign": true},
                {"expr": "2 + x", "result": 7, "assign": false}
            ]
        }"#;

        let results = parse_response(body).expect("valid body");
        assert_eq!(
            results,
            vec![
                RecognitionResult::new("x", "5", true),
                RecognitionResult::new("2 + x", "7", false),
            ]
        );
    }

    #[test]
    fn empty_data_is_a_valid_empty_response() {
        assert_eq!(parse_response(r#"{"data": []}"#), Ok(Vec::new()));
    }

    #[test]
    fn missing_data_field_is_malformed() {
        let err = parse_response(r#"{"message": "ok"}"#).unwrap_err();
        assert!(matches!(err, SubmitError::MalformedResponse(_)));
    }

    #[test]
    fn one_bad_item_rejects_the_whole_body() {
        let body = r#"{"data": [
            {"expr": "x", "result": "5", "assign": true},
            {"expr": "y", "result": "6"}
        ]}"#;
        assert!(matches!(
            parse_response(body),
            Err(SubmitError::MalformedResponse(_))
        ));
    }

    #[test]
    fn non_boolean_assign_is_malformed() {
        let body = r#"{"data": [{"expr": "x", "result": "5", "assign": "yes"}]}"#;
        assert!(matches!(
            parse_response(body),
            Err(SubmitError::MalformedResponse(_))
        ));
    }

    #[test]
    fn request_carries_snapshot_and_all_bindings() {
        let snapshot = Snapshot::from_pixels(1, 1, vec![0, 0, 0, 0]).expect("snapshot");
        let mut variables = VariableStore::default();
        variables.set("x", "5");
        variables.set("y", "2");

        let request = RecognitionRequest::from_snapshot(&snapshot, &variables).expect("request");
        let json = serde_json::to_value(&request).expect("serialize");

        assert!(json["image"]
            .as_str()
            .is_some_and(|s| s.starts_with("data:image/png;base64,")));
        assert_eq!(json["dict_of_vars"], serde_json::json!({"x": "5", "y": "2"}));
    }
}
