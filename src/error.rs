//! Error types for the Orca client.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// Maximum number of diagnostic entries retained from the backend stack.
pub const MESSAGE_STACK_DEPTH: usize = 8;

/// Closed set of failure kinds reported by the synthesis backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Backend allocation failure.
    OutOfMemory,
    /// Model file or output file inaccessible.
    IoError,
    /// Malformed input: empty access key, text over the character limit,
    /// malformed pronunciation annotation, out-of-range speech rate.
    InvalidArgument,
    /// Backend-internal sentinel; reserved.
    StopIteration,
    /// Invalid or malformed access key format.
    KeyError,
    /// Operation on a released engine or closed stream.
    InvalidState,
    /// Unclassified internal backend failure.
    RuntimeError,
    /// Licensing check failed.
    ActivationError,
    /// Activation device limit reached; not retryable.
    ActivationLimitReached,
    /// Activation throttled; retryable after backoff.
    ActivationThrottled,
    /// Activation refused; not retryable.
    ActivationRefused,
}

/// Primary error type for all Orca client operations.
///
/// Carries the translated [`ErrorKind`], a short human-readable message, and
/// the diagnostic message stack drained from the backend at translation time
/// (empty when the failure never reached the backend).
#[derive(Error, Debug, Clone)]
#[error("{kind}: {message}")]
pub struct OrcaError {
    kind: ErrorKind,
    message: String,
    message_stack: Vec<String>,
}

impl OrcaError {
    /// Create an error with no diagnostic stack.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            message_stack: Vec::new(),
        }
    }

    /// Create an error carrying a backend diagnostic stack.
    ///
    /// The stack is truncated to [`MESSAGE_STACK_DEPTH`] entries.
    pub fn with_stack(
        kind: ErrorKind,
        message: impl Into<String>,
        mut message_stack: Vec<String>,
    ) -> Self {
        message_stack.truncate(MESSAGE_STACK_DEPTH);
        Self {
            kind,
            message: message.into(),
            message_stack,
        }
    }

    /// The failure kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Short human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Diagnostic messages drained from the backend, most recent first.
    ///
    /// The backend consumes its stack on read, so two failures of the same
    /// kind are not guaranteed to carry identical stacks.
    pub fn message_stack(&self) -> &[String] {
        &self.message_stack
    }

    /// Whether this error is potentially retryable.
    ///
    /// Only throttled activation is worth retrying (after backoff); the
    /// client itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, ErrorKind::ActivationThrottled)
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, OrcaError>;
