//! Assembly pipeline stages and orchestration.
//!
//! The stages are pure planners over typed values (durations, windows,
//! clips, segments, cues); all IO happens at the edges, in asset staging
//! and in the single ffmpeg invocation at the end.

pub mod audio;
pub mod duration;
pub mod motion;
pub mod subtitles;
pub mod timeline;
pub mod transitions;

use crate::config::AssemblyConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{self, ffmpeg::MuxPlan};
use crate::scene::{validate_scene_list, Scene};
use crate::temp_files::{create_staging_dir, stage_bytes, staged_output_path};

use log::{debug, info};
use std::path::{Path, PathBuf};

use duration::{apply_duration_cap, resolve_durations};
use subtitles::{generate_cues, render_srt};
use timeline::{SceneTiming, Timeline};

/// A scene whose assets have been written into the build's staging
/// directory.
#[derive(Debug, Clone)]
pub struct StagedScene {
    pub scene_index: usize,
    pub image_path: PathBuf,
    pub audio_path: Option<PathBuf>,
    pub narration: Option<String>,
}

/// The finished build: encoded container bytes plus sidecar data.
#[derive(Debug, Clone)]
pub struct CompiledVideo {
    /// Complete MP4 bytes.
    pub video: Vec<u8>,
    /// Rendered SRT document, when subtitles were requested and at least
    /// one cue was generated.
    pub subtitles: Option<String>,
    /// Per-scene playback windows on the pre-crossfade timeline.
    pub timings: Vec<SceneTiming>,
}

fn image_extension(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "png"
    } else {
        "jpg"
    }
}

fn audio_extension(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"RIFF") {
        "wav"
    } else {
        "mp3"
    }
}

/// Writes every scene's assets into the staging directory. File extensions
/// come from content sniffing so ffmpeg/ffprobe demux correctly regardless
/// of how the bytes were produced.
fn stage_scenes(dir: &Path, scenes: &[Scene]) -> CoreResult<Vec<StagedScene>> {
    let mut staged = Vec::with_capacity(scenes.len());
    for scene in scenes {
        let image_name = format!("scene_{}.{}", scene.index, image_extension(&scene.image));
        let image_path = stage_bytes(dir, &image_name, &scene.image)?;

        let audio_path = match &scene.audio {
            Some(bytes) => {
                let audio_name = format!("scene_{}.{}", scene.index, audio_extension(bytes));
                Some(stage_bytes(dir, &audio_name, bytes)?)
            }
            None => None,
        };

        staged.push(StagedScene {
            scene_index: scene.index,
            image_path,
            audio_path,
            narration: scene.narration.clone(),
        });
    }
    debug!("Staged {} scene(s) into {}", staged.len(), dir.display());
    Ok(staged)
}

/// Assembles the scenes into a finished video.
///
/// Validates inputs, stages assets to a per-build temp dir, resolves
/// durations, builds the timeline, plans motion/transitions/audio/cues,
/// runs the encode, and returns the container bytes with sidecar data.
/// The staging dir is dropped (and deleted) on every exit path.
pub fn assemble(scenes: &[Scene], config: &AssemblyConfig) -> CoreResult<CompiledVideo> {
    config.validate().map_err(CoreError::Validation)?;
    validate_scene_list(scenes).map_err(CoreError::Validation)?;
    external::check_external_dependencies()?;

    info!("Assembling {} scene(s)", scenes.len());
    let staging = create_staging_dir("sceneforge")?;
    let staged = stage_scenes(staging.path(), scenes)?;

    let mut resolved = resolve_durations(&staged, config);
    let padding = apply_duration_cap(&mut resolved, config);

    let durations: Vec<(usize, f64)> = resolved
        .iter()
        .map(|s| (s.scene_index, s.duration_secs))
        .collect();
    let timeline = Timeline::build(&durations)?;
    info!(
        "Timeline: {} window(s), {:.1}s total before crossfade",
        timeline.len(),
        timeline.total_duration_secs()
    );

    let subtitles = if config.generate_subtitles {
        let cues = generate_cues(&timeline, &resolved, config);
        if cues.is_empty() {
            None
        } else {
            info!("Generated {} subtitle cue(s)", cues.len());
            Some(render_srt(&cues))
        }
    } else {
        None
    };

    let clips: Vec<_> = resolved
        .iter()
        .map(|s| motion::animate(s.scene_index, s.duration_secs, config))
        .collect();
    let image_inputs: Vec<PathBuf> = resolved.iter().map(|s| s.image_path.clone()).collect();
    let segments = audio::plan_audio_track(&resolved, &padding);

    let output_path = staged_output_path(staging.path(), "assembly", "mp4");
    let plan = MuxPlan::new(
        &clips,
        image_inputs,
        &segments,
        config.crossfade_secs,
        config.fps,
        &output_path,
    )?;
    external::run_assembly_encode(&plan)?;

    let video = std::fs::read(&output_path)?;
    info!("Assembly complete: {} bytes", video.len());

    Ok(CompiledVideo {
        video,
        subtitles,
        timings: timeline.scene_timings(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scene_list_is_validation_error() {
        let err = assemble(&[], &AssemblyConfig::default()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_invalid_config_is_validation_error() {
        let config = AssemblyConfig {
            fps: 0,
            ..Default::default()
        };
        let scenes = vec![Scene::new(1, vec![0xFF, 0xD8, 0xFF])];
        let err = assemble(&scenes, &config).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_image_extension_sniffing() {
        assert_eq!(image_extension(&[0x89, b'P', b'N', b'G', 0x0D]), "png");
        assert_eq!(image_extension(&[0xFF, 0xD8, 0xFF, 0xE0]), "jpg");
    }

    #[test]
    fn test_audio_extension_sniffing() {
        assert_eq!(audio_extension(b"RIFF....WAVE"), "wav");
        assert_eq!(audio_extension(&[0x49, 0x44, 0x33]), "mp3");
    }

    #[test]
    fn test_stage_scenes_writes_all_assets() {
        let dir = create_staging_dir("sceneforge_test").unwrap();
        let scenes = vec![
            Scene::new(1, vec![0xFF, 0xD8, 0xFF]).with_audio(b"RIFF0000WAVE".to_vec()),
            Scene::new(2, vec![0x89, b'P', b'N', b'G']),
        ];
        let staged = stage_scenes(dir.path(), &scenes).unwrap();

        assert_eq!(staged.len(), 2);
        assert!(staged[0].image_path.ends_with("scene_1.jpg"));
        assert!(staged[0].audio_path.as_ref().unwrap().ends_with("scene_1.wav"));
        assert!(staged[1].image_path.ends_with("scene_2.png"));
        assert!(staged[1].audio_path.is_none());
        for scene in &staged {
            assert!(scene.image_path.is_file());
        }
    }
}
