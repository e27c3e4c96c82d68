//! # Playback Error Types
//!
//! Error types for the view-manager glue and engine access. None of
//! these reach JavaScript: the host-facing surface logs them and carries on.

use thiserror::Error;

/// Errors that can occur while decoding host input or driving the engine.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Host Input Errors
    // ========================================================================
    /// A prop value is missing or has the wrong type.
    #[error("Invalid prop '{prop}': {reason}")]
    InvalidProp { prop: String, reason: String },

    /// A command argument is missing or has the wrong type.
    #[error("Invalid argument for command '{command}': {reason}")]
    InvalidCommandArgument { command: String, reason: String },

    /// The command id or name is not known.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    // ========================================================================
    // Engine Errors
    // ========================================================================
    /// The native player was already released.
    #[error("Media engine already released")]
    EngineReleased,
}

impl PlaybackError {
    /// Returns `true` if the error comes from malformed host input.
    pub fn is_host_input_error(&self) -> bool {
        matches!(
            self,
            PlaybackError::InvalidProp { .. }
                | PlaybackError::InvalidCommandArgument { .. }
                | PlaybackError::UnknownCommand(_)
        )
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
