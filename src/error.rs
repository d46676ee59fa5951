use thiserror::Error;

/// Errors that can occur during browser control and scraping
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Failed to launch a browser instance
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Failed to connect to an existing browser instance
    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    /// Navigation to a URL failed or timed out
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// Tab-level operation failed (create, close, lookup)
    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    /// An element reference was invalidated by a re-render.
    /// Expected under lazy rendering; callers skip the element for the
    /// current scan instead of aborting.
    #[error("Stale element reference: {0}")]
    StaleElement(String),

    /// JavaScript evaluation failed for a reason other than a stale node
    #[error("Script evaluation failed: {0}")]
    EvalFailed(String),
}

impl ScrapeError {
    /// Whether this error is recoverable within one loop iteration.
    /// Transient errors are treated as "zero elements this scan" by the
    /// pagination loop; anything else aborts the loop with a fault cause.
    pub fn is_transient(&self) -> bool {
        matches!(self, ScrapeError::StaleElement(_))
    }
}

/// Result type alias for scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_is_transient() {
        assert!(ScrapeError::StaleElement("node detached".to_string()).is_transient());
        assert!(!ScrapeError::EvalFailed("syntax error".to_string()).is_transient());
        assert!(!ScrapeError::NavigationFailed("timeout".to_string()).is_transient());
    }

    #[test]
    fn test_error_display() {
        let err = ScrapeError::LaunchFailed("no chrome binary".to_string());
        assert_eq!(err.to_string(), "Failed to launch browser: no chrome binary");
    }
}
