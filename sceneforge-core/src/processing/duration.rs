//! Scene duration resolution.
//!
//! A scene's playback duration comes from its narration audio when it has
//! any: the decoded audio length plus head/tail padding, floored at the
//! configured minimum. Scenes without audio use the fallback constant.
//! Unparsable audio bytes are a recovered failure: the scene falls back to
//! the constant and the build continues.

use crate::config::AssemblyConfig;
use crate::error::CoreError;
use crate::external::probe_audio_duration;
use crate::processing::transitions;
use crate::processing::StagedScene;

use log::{debug, info, warn};
use rayon::prelude::*;
use std::path::PathBuf;

/// A staged audio file together with its probed decoded duration.
#[derive(Debug, Clone)]
pub struct StagedAudio {
    pub path: PathBuf,
    pub duration_secs: f64,
}

/// A scene with its playback duration resolved.
#[derive(Debug, Clone)]
pub struct ResolvedScene {
    pub scene_index: usize,
    pub image_path: PathBuf,
    pub narration: Option<String>,
    pub duration_secs: f64,
    pub audio: Option<StagedAudio>,
}

/// Head/tail padding actually in effect for a build, after any reduction
/// applied to honor a total-duration cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddingPolicy {
    pub head_secs: f64,
    pub tail_secs: f64,
}

/// Resolves playback durations for all staged scenes.
///
/// Probing is per-scene and side-effect free against shared state, so it
/// runs in parallel; the ordered result vector is what the sequential
/// timeline fold consumes.
pub fn resolve_durations(staged: &[StagedScene], config: &AssemblyConfig) -> Vec<ResolvedScene> {
    let mut resolved: Vec<ResolvedScene> = staged
        .par_iter()
        .map(|scene| resolve_one(scene, config))
        .collect();
    resolved.sort_by_key(|s| s.scene_index);
    resolved
}

/// Wraps a probe failure as the recovered per-scene decode error, carrying
/// the scene index for the log line.
fn asset_decode_error(scene_index: usize, source: &CoreError) -> CoreError {
    CoreError::AssetDecode {
        scene_index,
        message: source.to_string(),
    }
}

fn resolve_one(scene: &StagedScene, config: &AssemblyConfig) -> ResolvedScene {
    let audio = match &scene.audio_path {
        Some(path) => match probe_audio_duration(path) {
            Ok(duration_secs) => Some(StagedAudio {
                path: path.clone(),
                duration_secs,
            }),
            Err(e) => {
                let err = asset_decode_error(scene.scene_index, &e);
                warn!(
                    "{err}; using fallback duration {:.1}s",
                    config.fallback_scene_seconds
                );
                None
            }
        },
        None => None,
    };

    let duration_secs = match &audio {
        Some(a) => scene_duration_for_audio(
            a.duration_secs,
            config.min_scene_seconds,
            config.head_pad_secs,
            config.tail_pad_secs,
        ),
        None => config.fallback_scene_seconds,
    };

    debug!(
        "Scene {} resolved to {:.2}s (audio: {})",
        scene.scene_index,
        duration_secs,
        audio
            .as_ref()
            .map_or("none".to_string(), |a| format!("{:.2}s", a.duration_secs))
    );

    ResolvedScene {
        scene_index: scene.scene_index,
        image_path: scene.image_path.clone(),
        narration: scene.narration.clone(),
        duration_secs,
        audio,
    }
}

/// Scene duration for a scene with audio: the audio must fit entirely,
/// padded front and back, but never below the minimum scene length.
fn scene_duration_for_audio(audio_secs: f64, min_secs: f64, head_pad: f64, tail_pad: f64) -> f64 {
    (audio_secs + head_pad + tail_pad).max(min_secs)
}

fn projected_video_duration(resolved: &[ResolvedScene], crossfade_secs: f64) -> f64 {
    let sum: f64 = resolved.iter().map(|s| s.duration_secs).sum();
    let overlap: f64 = resolved
        .windows(2)
        .map(|pair| {
            transitions::overlap_between(
                pair[0].duration_secs,
                pair[1].duration_secs,
                crossfade_secs,
            )
        })
        .sum();
    sum - overlap
}

/// Maximum share of the head/tail padding that may be removed to honor a
/// duration cap before falling back to scaling scene durations.
const MAX_PADDING_REDUCTION: f64 = 0.8;

/// Enforces `config.max_video_duration` if set.
///
/// Padding is reduced proportionally first (up to 80%), which preserves
/// all narration audio. Only if that is not enough are scene durations
/// scaled down, which may trim audio; that path logs a warning.
pub fn apply_duration_cap(
    resolved: &mut [ResolvedScene],
    config: &AssemblyConfig,
) -> PaddingPolicy {
    let mut policy = PaddingPolicy {
        head_secs: config.head_pad_secs,
        tail_secs: config.tail_pad_secs,
    };

    let Some(cap) = config.max_video_duration else {
        return policy;
    };

    let total = projected_video_duration(resolved, config.crossfade_secs);
    if total <= cap {
        return policy;
    }

    let audio_scenes = resolved.iter().filter(|s| s.audio.is_some()).count();
    let total_padding = (config.head_pad_secs + config.tail_pad_secs) * audio_scenes as f64;

    if total_padding > 0.0 {
        let excess = total - cap;
        let reduction = (excess / total_padding).min(MAX_PADDING_REDUCTION);
        policy.head_secs = config.head_pad_secs * (1.0 - reduction);
        policy.tail_secs = config.tail_pad_secs * (1.0 - reduction);

        for scene in resolved.iter_mut() {
            if let Some(audio) = &scene.audio {
                scene.duration_secs = scene_duration_for_audio(
                    audio.duration_secs,
                    config.min_scene_seconds,
                    policy.head_secs,
                    policy.tail_secs,
                );
            }
        }

        let adjusted = projected_video_duration(resolved, config.crossfade_secs);
        info!(
            "Projected duration {total:.1}s exceeds cap {cap:.1}s; reduced per-scene padding to {:.2}s+{:.2}s (new total {adjusted:.1}s)",
            policy.head_secs, policy.tail_secs
        );
        if adjusted <= cap {
            return policy;
        }
    }

    // Padding reduction was not enough; scale durations as a last resort.
    let remaining = projected_video_duration(resolved, config.crossfade_secs);
    let scale = cap / remaining;
    warn!(
        "Duration cap {cap:.1}s still exceeded ({remaining:.1}s); scaling scene durations by {scale:.2}x, some audio may be trimmed"
    );
    for scene in resolved.iter_mut() {
        scene.duration_secs = (scene.duration_secs * scale).max(config.min_scene_seconds);
    }

    policy
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn resolved(index: usize, duration: f64, audio_secs: Option<f64>) -> ResolvedScene {
        ResolvedScene {
            scene_index: index,
            image_path: Path::new("scene.jpg").to_path_buf(),
            narration: None,
            duration_secs: duration,
            audio: audio_secs.map(|d| StagedAudio {
                path: Path::new("scene.mp3").to_path_buf(),
                duration_secs: d,
            }),
        }
    }

    fn config() -> AssemblyConfig {
        AssemblyConfig::default()
    }

    #[test]
    fn test_no_audio_resolves_to_fallback() {
        let staged: Vec<StagedScene> = (1..=3)
            .map(|i| StagedScene {
                scene_index: i,
                image_path: Path::new("scene.jpg").to_path_buf(),
                audio_path: None,
                narration: None,
            })
            .collect();
        let cfg = config();
        let resolved = resolve_durations(&staged, &cfg);

        assert_eq!(resolved.len(), 3);
        let indexes: Vec<usize> = resolved.iter().map(|s| s.scene_index).collect();
        assert_eq!(indexes, vec![1, 2, 3]);
        for scene in &resolved {
            assert_eq!(scene.duration_secs, cfg.fallback_scene_seconds);
            assert!(scene.audio.is_none());
        }
    }

    #[test]
    fn test_unprobeable_audio_recovers_to_fallback() {
        // The staged path does not exist, so the probe fails regardless of
        // what demuxers the environment has.
        let staged = vec![StagedScene {
            scene_index: 1,
            image_path: Path::new("scene.jpg").to_path_buf(),
            audio_path: Some(Path::new("/nonexistent/scene_1.mp3").to_path_buf()),
            narration: None,
        }];
        let cfg = config();
        let resolved = resolve_durations(&staged, &cfg);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].duration_secs, cfg.fallback_scene_seconds);
        assert!(resolved[0].audio.is_none());
    }

    #[test]
    fn test_decode_failure_carries_scene_index() {
        let source = CoreError::FfprobeParse("no parsable duration".to_string());
        let err = asset_decode_error(7, &source);
        assert!(matches!(
            err,
            CoreError::AssetDecode { scene_index: 7, .. }
        ));
        assert!(err.to_string().contains("scene 7"));
    }

    #[test]
    fn test_scene_duration_includes_padding() {
        assert_eq!(scene_duration_for_audio(4.0, 2.0, 0.15, 0.15), 4.3);
    }

    #[test]
    fn test_scene_duration_floors_at_minimum() {
        assert_eq!(scene_duration_for_audio(0.5, 2.0, 0.15, 0.15), 2.0);
    }

    #[test]
    fn test_projected_duration_subtracts_overlaps() {
        let scenes = vec![
            resolved(1, 4.0, Some(3.7)),
            resolved(2, 6.0, Some(5.7)),
            resolved(3, 5.0, Some(4.7)),
        ];
        let total = projected_video_duration(&scenes, 0.5);
        assert!((total - 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_cap_leaves_durations_untouched() {
        let mut scenes = vec![resolved(1, 4.0, Some(3.7)), resolved(2, 6.0, Some(5.7))];
        let cfg = config();
        let policy = apply_duration_cap(&mut scenes, &cfg);
        assert_eq!(policy.head_secs, cfg.head_pad_secs);
        assert_eq!(scenes[0].duration_secs, 4.0);
    }

    #[test]
    fn test_cap_reduces_padding_before_scaling() {
        // Two scenes, 5.3s each (5.0s audio + 0.3s padding), no crossfade.
        // Cap of 10.2s is reachable by dropping 0.4s of the 0.6s padding.
        let mut scenes = vec![resolved(1, 5.3, Some(5.0)), resolved(2, 5.3, Some(5.0))];
        let cfg = AssemblyConfig {
            crossfade_secs: 0.0,
            max_video_duration: Some(10.2),
            ..Default::default()
        };
        let policy = apply_duration_cap(&mut scenes, &cfg);

        assert!(policy.head_secs < cfg.head_pad_secs);
        let total: f64 = scenes.iter().map(|s| s.duration_secs).sum();
        assert!(total <= 10.2 + 1e-9);
        // Audio itself is preserved in full.
        for scene in &scenes {
            assert!(scene.duration_secs >= scene.audio.as_ref().unwrap().duration_secs);
        }
    }

    #[test]
    fn test_cap_scales_as_last_resort() {
        // Padding removal tops out at 80%, so a cap far below the audio
        // length forces scaling.
        let mut scenes = vec![resolved(1, 10.3, Some(10.0)), resolved(2, 10.3, Some(10.0))];
        let cfg = AssemblyConfig {
            crossfade_secs: 0.0,
            max_video_duration: Some(8.0),
            ..Default::default()
        };
        apply_duration_cap(&mut scenes, &cfg);

        let total: f64 = scenes.iter().map(|s| s.duration_secs).sum();
        assert!(total <= 8.0 + 1e-6);
        for scene in &scenes {
            assert!(scene.duration_secs >= cfg.min_scene_seconds);
        }
    }
}
