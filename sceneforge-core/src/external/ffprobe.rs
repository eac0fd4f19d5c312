//! FFprobe integration for audio duration probing.
//!
//! The duration resolver needs the decoded length of each scene's
//! narration audio. Audio bytes are staged to a temp file by the caller;
//! this module runs ffprobe (via the ffprobe crate) against the staged
//! path and extracts the container-level duration.

use crate::error::{command_failed_error, command_start_error, CoreError, CoreResult};
use ffprobe::{ffprobe, FfProbeError};
use std::path::Path;

/// Returns the decoded duration of the audio file at `path`, in seconds.
///
/// Fails when the file is unreadable or carries no parsable duration; the
/// duration resolver wraps such failures as a per-scene decode error and
/// recovers with the configured fallback duration rather than aborting.
pub fn probe_audio_duration(path: &Path) -> CoreResult<f64> {
    log::debug!("Running ffprobe for audio duration on: {}", path.display());
    match ffprobe(path) {
        Ok(metadata) => {
            let duration = metadata
                .format
                .duration
                .as_deref()
                .and_then(|d| d.parse::<f64>().ok())
                .ok_or_else(|| {
                    CoreError::FfprobeParse(format!(
                        "No parsable duration in ffprobe output for {}",
                        path.display()
                    ))
                })?;

            if duration <= 0.0 || !duration.is_finite() {
                return Err(CoreError::FfprobeParse(format!(
                    "Non-positive duration ({duration}) reported for {}",
                    path.display()
                )));
            }

            let has_audio_stream = metadata
                .streams
                .iter()
                .any(|s| s.codec_type.as_deref() == Some("audio"));
            if !has_audio_stream {
                log::warn!("No audio stream found by ffprobe for {}", path.display());
            }

            Ok(duration)
        }
        Err(err) => {
            log::warn!(
                "ffprobe failed for audio duration on {}: {err:?}",
                path.display()
            );
            Err(map_ffprobe_error(err, "audio duration"))
        }
    }
}

fn map_ffprobe_error(err: FfProbeError, context: &str) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error(format!("ffprobe ({context})"), io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            command_failed_error(format!("ffprobe ({context})"), output.status, stderr)
        }
        FfProbeError::Deserialize(err) => CoreError::FfprobeParse(format!(
            "ffprobe {context} output deserialization: {err}"
        )),
        _ => CoreError::FfprobeParse(format!("Unknown ffprobe error during {context}: {err:?}")),
    }
}
