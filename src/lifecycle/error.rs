//! Lifecycle-specific error types

use thiserror::Error;

/// Errors that can occur while driving the extension lifecycle
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The extension could not be set up before talking to the control plane
    #[error("setup failed: {0}")]
    Setup(String),

    /// The control plane rejected the registration or could not be reached
    #[error("registration failed: {0}")]
    Registration(String),

    /// The control plane rejected an event poll or returned a malformed event
    #[error("polling next event failed: {0}")]
    Poll(String),

    /// Configuration resolution or template rendering failed
    #[error("initialization failed: {0}")]
    Initialization(String),

    /// The outstanding call was aborted because the process is shutting down
    #[error("cancelled")]
    Cancelled,
}

impl LifecycleError {
    /// Create a setup failure error
    pub fn setup(msg: impl Into<String>) -> Self {
        Self::Setup(msg.into())
    }

    /// Create a registration failure error
    pub fn registration(msg: impl Into<String>) -> Self {
        Self::Registration(msg.into())
    }

    /// Create a poll failure error
    pub fn poll(msg: impl Into<String>) -> Self {
        Self::Poll(msg.into())
    }

    /// Create an initialization failure error
    pub fn init_failed(msg: impl Into<String>) -> Self {
        Self::Initialization(msg.into())
    }

    /// Whether this is the clean-path cancellation rather than a failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Name of the lifecycle phase the error belongs to
    pub fn phase(&self) -> &'static str {
        match self {
            Self::Setup(_) => "setup",
            Self::Registration(_) => "register",
            Self::Poll(_) => "poll",
            Self::Initialization(_) => "initialize",
            Self::Cancelled => "cancel",
        }
    }
}

/// A specialized Result type for lifecycle operations
pub type Result<T> = std::result::Result<T, LifecycleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_names_distinguish_failures() {
        assert_eq!(LifecycleError::setup("x").phase(), "setup");
        assert_eq!(LifecycleError::registration("x").phase(), "register");
        assert_eq!(LifecycleError::poll("x").phase(), "poll");
        assert_eq!(LifecycleError::init_failed("x").phase(), "initialize");
        assert!(LifecycleError::Cancelled.is_cancelled());
        assert!(!LifecycleError::poll("x").is_cancelled());
    }

    #[test]
    fn test_display_carries_cause() {
        let err = LifecycleError::registration("status 500");
        assert_eq!(err.to_string(), "registration failed: status 500");

        let err = LifecycleError::setup("building http client: no tls backend");
        assert_eq!(
            err.to_string(),
            "setup failed: building http client: no tls backend"
        );
    }
}
