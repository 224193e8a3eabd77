//! Error types for remote lookups

use thiserror::Error;

/// Errors that can occur while talking to a remote service
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, timeout or non-success status
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body is not the expected JSON
    #[error("unexpected response from {service}: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The request could not be formed (for example an unusable base URL)
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
}

impl FetchError {
    pub fn decode(service: &'static str, source: serde_json::Error) -> Self {
        Self::Decode { service, source }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_display_names_service() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = FetchError::decode("search", source);
        assert!(err.to_string().starts_with("unexpected response from search"));
    }
}
