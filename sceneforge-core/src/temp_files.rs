//! Temporary file management for staged scene assets.
//!
//! The assembly pipeline receives scene assets as in-memory bytes, but
//! ffmpeg and ffprobe operate on paths, so each build stages its assets
//! into a private temporary directory. The tempfile crate's Drop impl
//! guarantees cleanup on every exit path, including errors.

use crate::error::CoreResult;
use std::path::{Path, PathBuf};
use tempfile::{Builder as TempFileBuilder, TempDir};

/// Creates the staging directory for one build. Auto-cleaned when dropped.
pub fn create_staging_dir(prefix: &str) -> CoreResult<TempDir> {
    Ok(TempFileBuilder::new()
        .prefix(&format!("{prefix}_"))
        .tempdir()?)
}

/// Writes asset bytes into the staging directory under the given file name
/// and returns the staged path.
pub fn stage_bytes(dir: &Path, file_name: &str, bytes: &[u8]) -> CoreResult<PathBuf> {
    let path = dir.join(file_name);
    std::fs::write(&path, bytes)?;
    Ok(path)
}

/// Returns a path in `dir` with a random suffix. Does not create the file;
/// used for the ffmpeg output target, which ffmpeg creates itself.
pub fn staged_output_path(dir: &Path, prefix: &str, extension: &str) -> PathBuf {
    use rand::distributions::Alphanumeric;
    use rand::{thread_rng, Rng};

    let random_suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();

    dir.join(format!("{prefix}_{random_suffix}.{extension}"))
}
