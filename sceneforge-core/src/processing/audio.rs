//! Audio track assembly planning.
//!
//! The audio track is one segment per scene, each exactly the scene's
//! resolved duration, concatenated in scene order. Scenes with narration
//! get their audio delayed by the head padding and padded out to the full
//! window; silent scenes contribute generated silence. The track length
//! therefore equals the timeline total, which is longer than the stitched
//! video by the summed crossfade overlaps; the extra tail plays under the
//! final frame.

use crate::processing::duration::{PaddingPolicy, ResolvedScene};
use std::path::PathBuf;

/// Sample rate every segment is normalized to before concatenation.
const AUDIO_SAMPLE_RATE: u32 = 44_100;

/// Edge fade applied to narration segments. Guards against clicks at
/// segment joins.
const EDGE_FADE_SECS: f64 = 0.02;

/// What fills one scene's audio window.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioSource {
    /// Staged narration file, delayed by the head padding.
    File { path: PathBuf, head_pad_secs: f64 },
    /// Generated silence for scenes without usable narration.
    Silence,
}

/// One scene-length slice of the output audio track.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSegment {
    pub scene_index: usize,
    pub duration_secs: f64,
    pub source: AudioSource,
}

impl AudioSegment {
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self.source, AudioSource::File { .. })
    }
}

/// Plans the audio segment for every resolved scene, in scene order.
#[must_use]
pub fn plan_audio_track(resolved: &[ResolvedScene], policy: &PaddingPolicy) -> Vec<AudioSegment> {
    resolved
        .iter()
        .map(|scene| {
            let source = match &scene.audio {
                Some(audio) => AudioSource::File {
                    path: audio.path.clone(),
                    head_pad_secs: policy.head_secs,
                },
                None => AudioSource::Silence,
            };
            AudioSegment {
                scene_index: scene.scene_index,
                duration_secs: scene.duration_secs,
                source,
            }
        })
        .collect()
}

/// Total audio track length: the sum of all segment durations. Crossfade
/// overlap does not shorten audio.
#[must_use]
pub fn total_track_secs(segments: &[AudioSegment]) -> f64 {
    segments.iter().map(|s| s.duration_secs).sum()
}

/// Staged narration paths in segment order, matching the order the mux
/// command registers them as inputs.
#[must_use]
pub fn file_inputs(segments: &[AudioSegment]) -> Vec<PathBuf> {
    segments
        .iter()
        .filter_map(|s| match &s.source {
            AudioSource::File { path, .. } => Some(path.clone()),
            AudioSource::Silence => None,
        })
        .collect()
}

/// Builds the filtergraph fragment producing the full audio track as
/// `[aout]`.
///
/// Narration segments reference ffmpeg inputs `first_file_input..`, in
/// the same order as [`file_inputs`]. Silent segments are synthesized
/// with `anullsrc` and consume no input slot.
#[must_use]
pub fn build_audio_graph(segments: &[AudioSegment], first_file_input: usize) -> String {
    let mut graph = String::new();
    let mut next_input = first_file_input;

    for (i, segment) in segments.iter().enumerate() {
        let label = if segments.len() == 1 { "aout".to_string() } else { format!("a{i}") };
        let dur = segment.duration_secs;
        match &segment.source {
            AudioSource::File { head_pad_secs, .. } => {
                let delay_ms = (head_pad_secs * 1000.0).round() as u64;
                let fade_out_start = (dur - EDGE_FADE_SECS).max(0.0);
                graph.push_str(&format!(
                    "[{next_input}:a]aformat=sample_rates={AUDIO_SAMPLE_RATE}:channel_layouts=stereo,\
                     adelay={delay_ms}:all=1,apad=whole_dur={dur:.3},atrim=0:{dur:.3},\
                     afade=t=in:st=0:d={EDGE_FADE_SECS},afade=t=out:st={fade_out_start:.3}:d={EDGE_FADE_SECS},\
                     asetpts=PTS-STARTPTS[{label}];"
                ));
                next_input += 1;
            }
            AudioSource::Silence => {
                graph.push_str(&format!(
                    "anullsrc=r={AUDIO_SAMPLE_RATE}:cl=stereo,atrim=0:{dur:.3},asetpts=PTS-STARTPTS[{label}];"
                ));
            }
        }
    }

    if segments.len() > 1 {
        let inputs: String = (0..segments.len()).map(|i| format!("[a{i}]")).collect();
        graph.push_str(&format!("{inputs}concat=n={}:v=0:a=1[aout];", segments.len()));
    }

    graph
}
