//! Interactions with external command-line tools.
//!
//! This module encapsulates the ffmpeg and ffprobe integrations: probing
//! staged audio for its decoded duration, and spawning the single ffmpeg
//! mux/encode invocation that produces the final container. Everything
//! above this layer is pure planning over typed intermediate values.

use crate::error::{command_start_error, CoreError, CoreResult};

use std::io;
use std::process::{Command, Stdio};

pub mod ffmpeg;
pub mod ffprobe;

pub use ffmpeg::{run_assembly_encode, MuxPlan};
pub use ffprobe::probe_audio_duration;

/// Checks that a required external command is available and executable.
///
/// Runs the command with `-version` and discards the output; used to fail
/// fast on missing ffmpeg/ffprobe before any assets are staged.
pub(crate) fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {cmd_name}");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{cmd_name}' not found.");
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{cmd_name}': {e}");
            Err(command_start_error(cmd_name, e))
        }
    }
}

/// Verifies that both ffmpeg and ffprobe are available.
pub fn check_external_dependencies() -> CoreResult<()> {
    check_dependency("ffmpeg")?;
    check_dependency("ffprobe")?;
    Ok(())
}
