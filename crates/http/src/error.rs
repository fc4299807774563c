//! Endpoint-level error type

use crate::ClientError;
use thiserror::Error;

/// Error returned by the typed endpoint methods
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required argument was empty; no request was sent
    #[error("{0} required")]
    MissingArgument(&'static str),

    /// The request failed or the backend answered with an error status
    #[error("{message}")]
    Failed {
        endpoint: String,
        message: String,
        #[source]
        source: ClientError,
    },
}

impl ApiError {
    /// Wrap a client error, preferring the server's own `message`
    pub(crate) fn failed(
        endpoint: impl Into<String>,
        fallback: impl Into<String>,
        source: ClientError,
    ) -> Self {
        let message = source.server_message().unwrap_or_else(|| fallback.into());
        Self::Failed {
            endpoint: endpoint.into(),
            message,
            source,
        }
    }

    /// Wrap a client error with the `<endpoint> fetch failed` fallback message
    pub(crate) fn fetch_failed(endpoint: impl Into<String>, source: ClientError) -> Self {
        let endpoint = endpoint.into();
        let fallback = format!("{endpoint} fetch failed");
        Self::failed(endpoint, fallback, source)
    }

    /// Endpoint the failure belongs to
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::MissingArgument(_) => None,
            Self::Failed { endpoint, .. } => Some(endpoint),
        }
    }

    /// Underlying client error, if a request was attempted
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            Self::MissingArgument(_) => None,
            Self::Failed { source, .. } => Some(source),
        }
    }
}

/// Result type for endpoint methods
pub type Result<T> = std::result::Result<T, ApiError>;

/// Fail fast on an empty required argument
pub(crate) fn require(name: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        Err(ApiError::MissingArgument(name))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_argument_message() {
        assert_eq!(
            require("videoId", "").unwrap_err().to_string(),
            "videoId required"
        );
        assert!(require("videoId", "v1").is_ok());
    }

    #[test]
    fn test_fetch_failed_falls_back_to_endpoint() {
        let source = ClientError::from_status(reqwest::StatusCode::BAD_GATEWAY, String::new());
        let err = ApiError::fetch_failed("/api/streamers", source);

        assert_eq!(err.to_string(), "/api/streamers fetch failed");
        assert_eq!(err.endpoint(), Some("/api/streamers"));
    }

    #[test]
    fn test_failed_prefers_server_message() {
        let source = ClientError::from_status(
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"message":"unknown platform"}"#.into(),
        );
        let err = ApiError::failed("/api/streamers/subscribe", "subscribe streamer failed", source);

        assert_eq!(err.to_string(), "unknown platform");
    }
}
