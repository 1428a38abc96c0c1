//! Error types for message validation and application status.

use thiserror::Error;

/// Errors raised while validating request addressing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressingError {
    /// None of names, selector, or the all flag was supplied.
    #[error("no target given: supply one or more names, a --selector, or --all")]
    NoTarget,

    /// The namespace is empty.
    #[error("namespace cannot be empty")]
    EmptyNamespace,

    /// An explicit name is empty or whitespace.
    #[error("resource names cannot be empty")]
    EmptyName,
}

/// The server decoded the request and answered with an `error` status.
///
/// This is a normal business outcome (for example "cluster not found"),
/// distinct from authentication or transport failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ApplicationError {
    /// Message supplied by the server.
    pub message: String,
}

impl ApplicationError {
    /// Create an application error from a server message.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            "the server rejected the request without a message".to_string()
        } else {
            message
        };
        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_error_keeps_server_message() {
        let err = ApplicationError::new("cluster hippo not found");
        assert_eq!(err.to_string(), "cluster hippo not found");
    }

    #[test]
    fn application_error_fills_blank_message() {
        let err = ApplicationError::new("  ");
        assert!(err.to_string().contains("without a message"));
    }
}
