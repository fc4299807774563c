//! Client error types

use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create error from HTTP status code
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// HTTP status of the failed response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest(_) => Some(400),
            Self::AuthenticationFailed(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::ServerError { status, .. } => Some(*status),
            Self::Request(err) => err.status().map(|s| s.as_u16()),
            Self::Serialization(_) | Self::Configuration(_) => None,
        }
    }

    /// Whether the backend rejected the bearer token
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_))
    }

    /// The `message` field of a JSON error body, when the server sent one
    pub fn server_message(&self) -> Option<String> {
        let body = match self {
            Self::ServerError { message, .. }
            | Self::AuthenticationFailed(message)
            | Self::NotFound(message)
            | Self::BadRequest(message)
            | Self::Forbidden(message) => message,
            _ => return None,
        };

        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        value
            .get("message")
            .and_then(serde_json::Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_maps_variants() {
        let err = ClientError::from_status(reqwest::StatusCode::UNAUTHORIZED, "nope".into());
        assert!(err.is_auth_expired());
        assert_eq!(err.status(), Some(401));

        let err = ClientError::from_status(reqwest::StatusCode::BAD_GATEWAY, "down".into());
        assert!(matches!(err, ClientError::ServerError { status: 502, .. }));
    }

    #[test]
    fn test_server_message_from_json_body() {
        let err = ClientError::from_status(
            reqwest::StatusCode::CONFLICT,
            r#"{"message":"already subscribed"}"#.into(),
        );
        assert_eq!(err.server_message().as_deref(), Some("already subscribed"));

        let err = ClientError::from_status(reqwest::StatusCode::CONFLICT, "plain text".into());
        assert_eq!(err.server_message(), None);

        let err = ClientError::from_status(
            reqwest::StatusCode::CONFLICT,
            r#"{"message":""}"#.into(),
        );
        assert_eq!(err.server_message(), None);
    }
}
