use std::io;
use thiserror::Error;

/// Everything that can go wrong while building or editing a rope
#[derive(Debug, Error)]
pub enum RopeError {
    /// More nodes were requested than the arena reserved up front
    #[error("arena exhausted: all {capacity} node slots are in use")]
    ArenaExhausted { capacity: usize },

    #[error("index {index} out of range for rope of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// The arena's backing block could not be reserved
    #[error("out of memory reserving an arena for {capacity} nodes")]
    OutOfMemory { capacity: usize },

    #[error("byte index {index} is not on a UTF-8 character boundary")]
    NotCharBoundary { index: usize },

    #[error("input is not valid UTF-8")]
    InvalidUtf8,

    #[error("invalid search pattern: {0}")]
    InvalidPattern(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, RopeError>;
