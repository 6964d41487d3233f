//! Command error taxonomy shared across transports and the client runtime.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured command error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandErrorKind {
    /// The IPC channel was unreachable.
    Transport,
    /// The backend or the client-side schema check rejected the arguments.
    Validation,
    /// The backend command ran and failed.
    Execution,
    /// A subscription handle was used after it was detached.
    StaleSubscriber,
}

/// Error reported for a failed command round trip or cache operation.
///
/// Messages are backend-supplied text passed through unaltered; no layer
/// rewrites or swallows them on the way to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandError {
    /// Error category.
    pub kind: CommandErrorKind,
    /// Human-readable message.
    pub message: String,
}

impl CommandError {
    /// Creates a new command error.
    pub fn new(kind: CommandErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates a transport-failure error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(CommandErrorKind::Transport, message)
    }

    /// Creates an argument-rejection error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(CommandErrorKind::Validation, message)
    }

    /// Creates a command-execution error.
    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(CommandErrorKind::Execution, message)
    }

    /// Creates a detached-subscription error.
    pub fn stale_subscriber(message: impl Into<String>) -> Self {
        Self::new(CommandErrorKind::StaleSubscriber, message)
    }

    /// Decodes an error payload received across the IPC boundary.
    ///
    /// Structured `{kind, message}` objects map directly. The template
    /// backend serializes its error type as a display string, so bare strings
    /// are classified by their stable message prefix instead.
    pub fn from_wire(value: &Value) -> Self {
        if let Ok(error) = serde_json::from_value::<CommandError>(value.clone()) {
            return error;
        }
        let message = match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        if message.starts_with("Validation error") {
            Self::validation(message)
        } else {
            Self::execution(message)
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            CommandErrorKind::Transport => write!(f, "transport error: {}", self.message),
            CommandErrorKind::Validation => write!(f, "validation error: {}", self.message),
            CommandErrorKind::Execution => write!(f, "execution error: {}", self.message),
            CommandErrorKind::StaleSubscriber => {
                write!(f, "stale subscriber: {}", self.message)
            }
        }
    }
}

impl std::error::Error for CommandError {}
