//! Error types for `pixelforge-core`.
//!
//! All fallible operations in the core library return [`CoreResult<T>`],
//! which is an alias for `Result<T, CoreError>`.

use std::path::PathBuf;

/// Unified error type for all core operations.
///
/// Fetch and bulk-action errors are caught by the controller and executor
/// and turned into state; they only escape as values, never as panics.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The API answered with a 4xx/5xx status.
    #[error("request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never produced a response (DNS, connect, reset...).
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),

    /// A page outside `1..=total_pages` was requested.
    #[error("page {requested} is out of range (1..={total_pages})")]
    PageOutOfRange { requested: u32, total_pages: u32 },

    /// A filter value was not recognised.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// A bulk operation was requested with nothing selected.
    #[error("no items selected")]
    EmptySelection,

    /// No bulk operation is registered under this id.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// A bulk action failed as a whole.
    #[error("bulk action failed: {0}")]
    BulkAction(String),

    /// The operation did not finish within its time limit.
    #[error("timeout")]
    Timeout,

    /// The operation was superseded or cancelled.
    #[error("operation cancelled")]
    Cancelled,

    /// The target path does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The process lacks permission to access the path.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Failed to parse a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Returns `true` for errors raised while retrieving a page.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::Network(_) | Self::Decode(_) | Self::Timeout
        )
    }
}

/// Convenience alias used throughout `pixelforge-core`.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_displays_status_and_message() {
        let err = CoreError::Http {
            status: 503,
            message: "upstream down".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "request failed with status 503: upstream down"
        );
    }

    #[test]
    fn network_displays_message() {
        let err = CoreError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "network error: connection refused");
    }

    #[test]
    fn page_out_of_range_displays_bounds() {
        let err = CoreError::PageOutOfRange {
            requested: 9,
            total_pages: 4,
        };
        assert_eq!(err.to_string(), "page 9 is out of range (1..=4)");
    }

    #[test]
    fn timeout_displays_reason() {
        assert_eq!(CoreError::Timeout.to_string(), "timeout");
    }

    #[test]
    fn cancelled_displays_message() {
        assert_eq!(CoreError::Cancelled.to_string(), "operation cancelled");
    }

    #[test]
    fn config_parse_displays_message() {
        let err = CoreError::ConfigParse("unexpected token".to_string());
        assert_eq!(err.to_string(), "config parse error: unexpected token");
    }

    #[test]
    fn not_found_displays_path() {
        let err = CoreError::NotFound(PathBuf::from("/etc/pixelforge.toml"));
        assert_eq!(err.to_string(), "path not found: /etc/pixelforge.toml");
    }

    #[test]
    fn io_error_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let core_err: CoreError = io_err.into();
        assert!(matches!(core_err, CoreError::Io(_)));
        assert!(core_err.to_string().contains("gone"));
    }

    #[test]
    fn fetch_errors_are_classified() {
        assert!(CoreError::Network("x".into()).is_fetch_error());
        assert!(CoreError::Decode("x".into()).is_fetch_error());
        assert!(CoreError::Timeout.is_fetch_error());
        assert!(!CoreError::Cancelled.is_fetch_error());
        assert!(!CoreError::EmptySelection.is_fetch_error());
    }
}
