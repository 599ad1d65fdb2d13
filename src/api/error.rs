//! Failure taxonomy for API calls

use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong between sending a request and reading its envelope
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS or timeout failure
    #[error("failed to reach the fleet API: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The body was not a `{code, data, msg}` envelope of the expected shape
    #[error("failed to parse API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The server answered with a non-zero code
    #[error("request rejected with code {code}: {}", .msg.as_deref().unwrap_or("no message"))]
    Rejected { code: i64, msg: Option<String> },
}

impl ApiError {
    /// Text to show the operator. Only the server's own message is surfaced
    /// verbatim; every other failure maps to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected { msg: Some(msg), .. } if !msg.trim().is_empty() => msg.clone(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_message_is_shown_verbatim() {
        let err = ApiError::Rejected {
            code: 500,
            msg: Some("账号已存在".to_string()),
        };
        assert_eq!(err.user_message("Failed to add user"), "账号已存在");
    }

    #[test]
    fn test_missing_or_blank_message_falls_back() {
        let err = ApiError::Rejected { code: 1, msg: None };
        assert_eq!(err.user_message("Failed to add user"), "Failed to add user");

        let err = ApiError::Rejected {
            code: 1,
            msg: Some("  ".to_string()),
        };
        assert_eq!(err.user_message("Failed to add user"), "Failed to add user");
    }

    #[test]
    fn test_status_and_decode_errors_hide_details() {
        let err = ApiError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: "<html>upstream</html>".to_string(),
        };
        assert_eq!(err.user_message("Failed to load user list"), "Failed to load user list");

        let err = ApiError::from(serde_json::from_str::<u32>("nope").unwrap_err());
        assert_eq!(err.user_message("Failed to load user list"), "Failed to load user list");
    }
}
