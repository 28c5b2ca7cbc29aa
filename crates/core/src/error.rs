//! Error types for the engine and its collaborators.

use thiserror::Error;

use crate::types::SignalIndex;

/// Errors returned by engine operations.
///
/// None of these are fatal: the engine state is unchanged when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A pick or start color outside the configured signal set.
    #[error("invalid signal index {index} (signal set has {count} signals)")]
    InvalidSignal { index: SignalIndex, count: usize },
}

/// Rejected game configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("signal set is empty")]
    NoSignals,

    #[error("minimum tone duration {min_ms}ms exceeds maximum {max_ms}ms")]
    ToneRange { min_ms: u32, max_ms: u32 },

    #[error("minimum tone duration must be non-zero")]
    ZeroTone,
}

/// Failure reported by an external collaborator (sound player, score or state sink).
///
/// The engine logs these and carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{collaborator} failed: {message}")]
pub struct CollaboratorError {
    pub collaborator: &'static str,
    pub message: String,
}

impl CollaboratorError {
    pub fn new(collaborator: &'static str, message: impl Into<String>) -> Self {
        Self {
            collaborator,
            message: message.into(),
        }
    }
}
