use thiserror::Error;

/// Rejection of an ill-formed pancake stack.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("a stack needs at least 2 pancakes to flip, got {size}")]
    TooSmall { size: usize },

    #[error("value {value} is outside 1..={size}")]
    OutOfRange { value: u32, size: usize },

    #[error("value {value} appears more than once")]
    Duplicate { value: u32 },
}

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid initial sequence: {0}")]
    Puzzle(#[from] PuzzleError),
}
