use std::io;
use thiserror::Error;

/// A collaborator (display, keypad, tone device...) failed. The game logic
/// never produces one of these itself.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BridgeError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("tone device failed: {0}")]
    Tone(String),
}

/// Errors emitted by a `PersistentCounter`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Errors emitted while building operand ranges.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("operand range must start at 1 or more, got {0}")]
    ZeroOperand(u32),
    #[error("operand range {0}..{1} is empty")]
    EmptyRange(u32, u32),
}
