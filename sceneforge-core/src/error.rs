//! Error types for the sceneforge-core library.
//!
//! Per-scene asset failures (unreadable audio, empty narration) are recovered
//! locally with fallbacks and never abort a build. Timeline and encode
//! failures are structural and always abort with no partial artifact.

use std::process::ExitStatus;
use thiserror::Error;

/// Error type for all sceneforge-core operations.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A scene's audio bytes were present but unparsable. The assembly
    /// pipeline recovers from this with the fallback duration; it only
    /// surfaces when a caller probes an asset directly.
    #[error("Asset decode error for scene {scene_index}: {message}")]
    AssetDecode { scene_index: usize, message: String },

    /// The computed timeline violated an invariant (negative duration or a
    /// non-contiguous interval). Indicates a resolver bug; always fatal.
    #[error("Timeline inconsistency: {0}")]
    TimelineInconsistency(String),

    /// The ffmpeg mux/encode step failed. Always fatal; no partial video
    /// is returned.
    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Required external dependency not found: {0}")]
    DependencyNotFound(String),

    #[error("Failed to start command '{command}': {source}")]
    CommandStart {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command}' failed with status {status:?}: {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Failed to parse ffprobe output: {0}")]
    FfprobeParse(String),
}

/// Result type for sceneforge-core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Creates a `CommandStart` error with consistent formatting.
pub fn command_start_error(command: impl Into<String>, source: std::io::Error) -> CoreError {
    CoreError::CommandStart {
        command: command.into(),
        source,
    }
}

/// Creates a `CommandFailed` error with consistent formatting.
pub fn command_failed_error(
    command: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        command: command.into(),
        status,
        stderr: stderr.into(),
    }
}
