//! Error classification for failed listings and actions

use anyhow::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    ConnectionRefused,
    Timeout,
    Unauthorized, // HTTP 401/403
    NotFound,     // HTTP 404
    ServerError,  // HTTP 500+
    NetworkError, // DNS, routing, etc.
    Other,
}

impl ErrorType {
    /// Short hint shown under the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ErrorType::ConnectionRefused => Some("is the server running and base_url correct?"),
            ErrorType::Timeout => Some("the server did not answer in time, try again"),
            ErrorType::Unauthorized => Some("check username and app_password in the config"),
            ErrorType::NotFound => Some("is the sharing app enabled on the server?"),
            ErrorType::ServerError => Some("the server reported an internal error"),
            ErrorType::NetworkError => Some("check the network and base_url host name"),
            ErrorType::Other => None,
        }
    }
}

/// Find the first reqwest error anywhere in the chain
fn find_reqwest_error(error: &Error) -> Option<&reqwest::Error> {
    error
        .chain()
        .find_map(|err| err.downcast_ref::<reqwest::Error>())
}

/// Classify an error based on its HTTP status and error chain
pub fn classify_error(error: &Error) -> ErrorType {
    if let Some(status) = find_reqwest_error(error).and_then(|e| e.status()) {
        return match status.as_u16() {
            401 | 403 => ErrorType::Unauthorized,
            404 => ErrorType::NotFound,
            500..=599 => ErrorType::ServerError,
            _ => ErrorType::Other,
        };
    }

    let error_msg = error
        .chain()
        .map(|e| e.to_string().to_lowercase())
        .collect::<Vec<_>>()
        .join(": ");

    if error_msg.contains("connection refused") {
        return ErrorType::ConnectionRefused;
    }
    if error_msg.contains("timeout") || error_msg.contains("timed out") {
        return ErrorType::Timeout;
    }
    if error_msg.contains("dns") || error_msg.contains("network") {
        return ErrorType::NetworkError;
    }

    ErrorType::Other
}

/// Format an error as "context: root cause"
///
/// Keeps the outermost context (which endpoint or action failed) and the
/// deepest cause, dropping the layers in between.
pub fn format_error_message(error: &Error) -> String {
    let outer = error.to_string();
    let root = error.root_cause().to_string();

    if outer == root {
        outer
    } else {
        format!("{}: {}", outer, root)
    }
}
