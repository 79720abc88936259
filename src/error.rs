use thiserror::Error;

/// Errors produced while resolving the block-list or driving the page
#[derive(Debug, Error)]
pub enum FilterError {
    /// The platform API answered with a non-success HTTP status
    #[error("Request to {url} failed with status {status}")]
    RemoteRequestFailed { url: String, status: u16 },

    /// Network-level fault, unparsable body, or unexpected response schema
    #[error("Transport fault: {0}")]
    TransportFault(String),

    /// No mylist carries the configured block-list title
    #[error("No mylist named '{0}' was found")]
    BlockListNotFound(String),

    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Script evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Session storage failed: {0}")]
    StorageFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl FilterError {
    /// Whether this error came from talking to the platform API
    pub fn is_remote(&self) -> bool {
        matches!(self, FilterError::RemoteRequestFailed { .. } | FilterError::TransportFault(_))
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_classification() {
        let status = FilterError::RemoteRequestFailed { url: "https://example.com".to_string(), status: 403 };
        assert!(status.is_remote());
        assert!(FilterError::TransportFault("reset".to_string()).is_remote());
        assert!(!FilterError::BlockListNotFound("BlockUsers".to_string()).is_remote());
        assert!(!FilterError::EvaluationFailed("boom".to_string()).is_remote());
    }

    #[test]
    fn test_display() {
        let err = FilterError::RemoteRequestFailed { url: "https://nvapi.nicovideo.jp/v1/users/me/mylists".to_string(), status: 401 };
        assert_eq!(err.to_string(), "Request to https://nvapi.nicovideo.jp/v1/users/me/mylists failed with status 401");

        let err = FilterError::BlockListNotFound("BlockUsers".to_string());
        assert_eq!(err.to_string(), "No mylist named 'BlockUsers' was found");
    }
}
