//! Share attribute helpers
//!
//! Share attributes travel as a JSON-encoded array of `{scope, key, value}`
//! tuples.

use serde_json::Value;

/// Parse a share attribute string into its loosely shaped tuples
///
/// Anything other than a JSON array is an error. Elements are not checked,
/// so one odd tuple does not hide the others.
pub fn parse_share_attributes(attributes: &str) -> Result<Vec<Value>, serde_json::Error> {
    serde_json::from_str(attributes)
}

fn is_file_request_tuple(attribute: &Value) -> bool {
    attribute.get("scope").and_then(Value::as_str) == Some("fileRequest")
        && attribute.get("key").and_then(Value::as_str) == Some("enabled")
        && attribute.get("value") == Some(&Value::Bool(true))
}

/// Whether the attributes enable a file request
///
/// Only a strict boolean `true` counts. Unparsable input is logged and
/// treated as not a file request.
pub fn is_file_request(attributes: &str) -> bool {
    match parse_share_attributes(attributes) {
        Ok(parsed) => parsed.iter().any(is_file_request_tuple),
        Err(error) => {
            tracing::error!(%error, "Error while parsing share attributes");
            false
        }
    }
}
