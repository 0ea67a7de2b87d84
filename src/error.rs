//! Error types for groove generation.

use thiserror::Error;

use crate::voice::Role;

/// Everything that can stop a generation session.
///
/// `UnresolvedPitchRole` is recovered internally (fill and blueprint tags fall
/// back to a substitute role); every other variant aborts the session with
/// zero events emitted.
#[derive(Debug, Error)]
pub enum GrooveError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("no pitch mapping for role {0}")]
    UnresolvedPitchRole(Role),
    #[error("cannot keep {role} at tick {tick} without breaking its minimum spacing")]
    ConstraintViolationAfterGeneration { role: Role, tick: u64 },
    #[error("settings error: {0}")]
    Settings(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl GrooveError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }
}

pub type Result<T> = std::result::Result<T, GrooveError>;
