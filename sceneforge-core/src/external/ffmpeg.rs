//! FFmpeg command building and execution for the assembly encode.
//!
//! The whole build compiles to one ffmpeg invocation: every scene still
//! and narration file is an input, the planned filtergraph (per-scene
//! zoompan, xfade stitch chain, audio segment concat) runs as a single
//! `-filter_complex`, and the stitched streams encode to H.264/AAC MP4.
//! Any ffmpeg failure is fatal; no partial output survives.

use crate::error::{command_failed_error, command_start_error, CoreError, CoreResult};
use crate::processing::audio::{self, AudioSegment};
use crate::processing::motion::VisualClip;
use crate::processing::transitions;

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use log::{debug, error, info};

use std::path::{Path, PathBuf};
use std::time::Instant;

/// Everything needed to run the single mux/encode invocation.
#[derive(Debug, Clone)]
pub struct MuxPlan {
    /// One still image per scene, in scene order; inputs `0..n`.
    pub image_inputs: Vec<PathBuf>,
    /// Staged narration files, in segment order; inputs `n..`.
    pub audio_inputs: Vec<PathBuf>,
    pub filter_complex: String,
    pub fps: u32,
    pub output_path: PathBuf,
}

impl MuxPlan {
    /// Assembles the complete filtergraph from the planned clips and
    /// audio segments.
    pub fn new(
        clips: &[VisualClip],
        image_inputs: Vec<PathBuf>,
        segments: &[AudioSegment],
        crossfade_secs: f64,
        fps: u32,
        output_path: &Path,
    ) -> CoreResult<Self> {
        if clips.len() != image_inputs.len() {
            return Err(CoreError::Encode(format!(
                "clip/input count mismatch: {} clips, {} images",
                clips.len(),
                image_inputs.len()
            )));
        }

        let mut graph = String::new();
        for (i, clip) in clips.iter().enumerate() {
            graph.push_str(&format!("[{i}:v]{}[v{i}];", clip.filter));
        }

        let (stitch, video_label) = transitions::build_stitch_graph(clips, crossfade_secs);
        graph.push_str(&stitch);
        graph.push_str(&audio::build_audio_graph(segments, image_inputs.len()));

        // A bare clip keeps its per-input label; map wants it under [vout].
        if video_label != "vout" {
            graph.push_str(&format!("[{video_label}]null[vout];"));
        }

        Ok(Self {
            image_inputs,
            audio_inputs: audio::file_inputs(segments),
            filter_complex: graph.trim_end_matches(';').to_string(),
            fps,
            output_path: output_path.to_path_buf(),
        })
    }
}

/// Builds the ffmpeg command for a mux plan.
fn build_mux_command(plan: &MuxPlan) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    cmd.hide_banner();

    for image in &plan.image_inputs {
        cmd.input(image.to_string_lossy().as_ref());
    }
    for audio in &plan.audio_inputs {
        cmd.input(audio.to_string_lossy().as_ref());
    }

    cmd.args(["-filter_complex", &plan.filter_complex]);
    cmd.args(["-map", "[vout]"]);
    cmd.args(["-map", "[aout]"]);

    cmd.args(["-c:v", "libx264"]);
    cmd.args(["-preset", "medium"]);
    cmd.args(["-pix_fmt", "yuv420p"]);
    cmd.args(["-r", &plan.fps.to_string()]);

    cmd.args(["-c:a", "aac"]);
    cmd.args(["-b:a", "192k"]);

    cmd.args(["-movflags", "+faststart"]);
    cmd.overwrite();
    cmd.output(plan.output_path.to_string_lossy().as_ref());
    cmd
}

/// Runs the assembly encode to completion.
///
/// Collects error-level ffmpeg log output while draining events and maps
/// a non-zero exit to `CommandFailed` with that stderr context.
pub fn run_assembly_encode(plan: &MuxPlan) -> CoreResult<()> {
    info!(
        "Starting assembly encode: {} scene(s) -> {}",
        plan.image_inputs.len(),
        plan.output_path.display()
    );
    debug!("Filtergraph: {}", plan.filter_complex);

    let mut cmd = build_mux_command(plan);
    debug!("FFmpeg command: {cmd:?}");

    let start_time = Instant::now();
    let mut child = cmd
        .spawn()
        .map_err(|e| command_start_error("ffmpeg (assembly)", e))?;

    let mut stderr_buffer = String::new();
    let events = child
        .iter()
        .map_err(|e| CoreError::Encode(format!("Failed to read ffmpeg events: {e}")))?;
    for event in events {
        match event {
            FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, message)
            | FfmpegEvent::Error(message) => {
                stderr_buffer.push_str(&message);
                stderr_buffer.push('\n');
            }
            _ => {}
        }
    }

    let status = child.wait()?;
    if !status.success() {
        let context = if stderr_buffer.is_empty() {
            "Assembly encode process failed".to_string()
        } else {
            format!("Assembly encode failed. Stderr:\n{}", stderr_buffer.trim())
        };
        error!("{context}");
        return Err(command_failed_error("ffmpeg (assembly)", status, context));
    }

    info!(
        "Assembly encode finished in {:.1}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssemblyConfig;
    use crate::processing::audio::plan_audio_track;
    use crate::processing::duration::{PaddingPolicy, ResolvedScene, StagedAudio};
    use crate::processing::motion::animate;

    fn fixtures(durations: &[(f64, bool)]) -> (Vec<VisualClip>, Vec<PathBuf>, Vec<AudioSegment>) {
        let config = AssemblyConfig::default();
        let mut clips = Vec::new();
        let mut images = Vec::new();
        let mut resolved = Vec::new();
        for (i, &(d, has_audio)) in durations.iter().enumerate() {
            let index = i + 1;
            clips.push(animate(index, d, &config));
            images.push(PathBuf::from(format!("scene_{index}.jpg")));
            resolved.push(ResolvedScene {
                scene_index: index,
                image_path: PathBuf::from(format!("scene_{index}.jpg")),
                narration: None,
                duration_secs: d,
                audio: has_audio.then(|| StagedAudio {
                    path: PathBuf::from(format!("scene_{index}.mp3")),
                    duration_secs: d - 0.3,
                }),
            });
        }
        let policy = PaddingPolicy {
            head_secs: 0.15,
            tail_secs: 0.15,
        };
        let segments = plan_audio_track(&resolved, &policy);
        (clips, images, segments)
    }

    #[test]
    fn test_plan_wires_labels_and_inputs() {
        let (clips, images, segments) = fixtures(&[(4.0, true), (6.0, false), (5.0, true)]);
        let plan = MuxPlan::new(&clips, images, &segments, 0.5, 30, Path::new("out.mp4")).unwrap();

        assert_eq!(plan.image_inputs.len(), 3);
        assert_eq!(plan.audio_inputs.len(), 2);
        // Per-scene zoompan chains feed the stitch inputs.
        assert!(plan.filter_complex.contains("[0:v]"));
        assert!(plan.filter_complex.contains("[2:v]"));
        assert!(plan.filter_complex.contains("xfade"));
        // Audio file inputs start after the three images.
        assert!(plan.filter_complex.contains("[3:a]"));
        assert!(plan.filter_complex.contains("[4:a]"));
        assert!(plan.filter_complex.contains("[aout]"));
        assert!(!plan.filter_complex.ends_with(';'));
    }

    #[test]
    fn test_plan_single_scene_maps_vout() {
        let (clips, images, segments) = fixtures(&[(5.0, true)]);
        let plan = MuxPlan::new(&clips, images, &segments, 0.5, 30, Path::new("out.mp4")).unwrap();
        assert!(plan.filter_complex.contains("[v0]null[vout]"));
    }

    #[test]
    fn test_plan_rejects_count_mismatch() {
        let (clips, mut images, segments) = fixtures(&[(4.0, true), (6.0, true)]);
        images.pop();
        let err = MuxPlan::new(&clips, images, &segments, 0.5, 30, Path::new("out.mp4"));
        assert!(matches!(err, Err(CoreError::Encode(_))));
    }
}
