//! CDP error types.

use personafill_protocols::PageError;
use thiserror::Error;

/// CDP client errors.
#[derive(Debug, Error)]
pub enum CdpError {
    /// Failed to connect to Chrome.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Chrome not found or not running with remote debugging.
    #[error("Chrome not available at {0}. Start Chrome with: chrome --remote-debugging-port=9222")]
    ChromeNotAvailable(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// CDP protocol error.
    #[error("CDP error: {message} (code: {code})")]
    Protocol { code: i64, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error (for endpoint discovery).
    #[error("HTTP error: {0}")]
    Http(String),

    /// No page matched the requested target.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// A page script threw.
    #[error("JavaScript error: {0}")]
    JavaScript(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Session closed")]
    SessionClosed,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::WebSocket(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        CdpError::Http(e.to_string())
    }
}

impl From<url::ParseError> for CdpError {
    fn from(e: url::ParseError) -> Self {
        CdpError::ConnectionFailed(format!("Invalid URL: {}", e))
    }
}

impl From<CdpError> for PageError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::JavaScript(message) => PageError::Snapshot(message),
            CdpError::Serialization(e) => PageError::Snapshot(format!("malformed page data: {}", e)),
            other => PageError::Transport(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_display() {
        let err = CdpError::Protocol {
            code: -32000,
            message: "No node with given id".to_string(),
        };
        assert_eq!(err.to_string(), "CDP error: No node with given id (code: -32000)");
    }

    #[test]
    fn test_into_page_error() {
        let err: PageError = CdpError::SessionClosed.into();
        assert!(matches!(err, PageError::Transport(ref m) if m == "Session closed"));

        let err: PageError = CdpError::JavaScript("document is not defined".to_string()).into();
        assert!(matches!(err, PageError::Snapshot(_)));
    }

    #[test]
    fn test_url_error_is_connection_failure() {
        let err: CdpError = url::Url::parse("not a url").unwrap_err().into();
        assert!(err.to_string().starts_with("Connection failed: Invalid URL"));
    }
}
