//! Scene timeline construction.
//!
//! The timeline is the single source of truth for when each scene plays.
//! Every downstream stage (pan/zoom pacing, audio placement, subtitle cue
//! allocation) derives its timing from these windows rather than
//! recomputing durations, so audio, video, and subtitles cannot drift
//! apart.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// Tolerance for contiguity checks on accumulated floating-point cursors.
const CONTIGUITY_EPSILON: f64 = 1e-6;

/// The half-open interval `[start, end)` during which one scene plays.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneWindow {
    /// 1-based scene index this window belongs to.
    pub scene_index: usize,
    pub start_secs: f64,
    pub end_secs: f64,
}

impl SceneWindow {
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }
}

/// Per-scene timing metadata returned to the caller with the compiled
/// video, e.g. for UI scrubber markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneTiming {
    pub scene: usize,
    pub start: f64,
    pub end: f64,
    pub duration: f64,
}

/// Ordered, contiguous scene windows for one build.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    windows: Vec<SceneWindow>,
}

impl Timeline {
    /// Builds a timeline from `(scene_index, duration_secs)` pairs,
    /// processed strictly in order with an explicit running cursor.
    ///
    /// An empty input yields an empty timeline with total duration 0.
    /// A negative or non-finite duration is a structural bug in the
    /// resolver and fails with `TimelineInconsistency`.
    pub fn build(durations: &[(usize, f64)]) -> CoreResult<Self> {
        let mut windows = Vec::with_capacity(durations.len());
        let mut cursor = 0.0_f64;

        for &(scene_index, duration_secs) in durations {
            if !duration_secs.is_finite() || duration_secs < 0.0 {
                return Err(CoreError::TimelineInconsistency(format!(
                    "scene {scene_index} resolved to invalid duration {duration_secs}"
                )));
            }
            let start_secs = cursor;
            let end_secs = start_secs + duration_secs;
            windows.push(SceneWindow {
                scene_index,
                start_secs,
                end_secs,
            });
            cursor = end_secs;
        }

        let timeline = Self { windows };
        timeline.validate()?;
        Ok(timeline)
    }

    #[must_use]
    pub fn windows(&self) -> &[SceneWindow] {
        &self.windows
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Total duration before crossfade overlap is subtracted; equals the
    /// sum of all scene durations and the length of the audio track.
    #[must_use]
    pub fn total_duration_secs(&self) -> f64 {
        self.windows.last().map_or(0.0, |w| w.end_secs)
    }

    /// Checks that windows are monotonic, non-negative, and contiguous.
    pub fn validate(&self) -> CoreResult<()> {
        for window in &self.windows {
            if window.end_secs < window.start_secs {
                return Err(CoreError::TimelineInconsistency(format!(
                    "scene {} has negative-duration window [{}, {})",
                    window.scene_index, window.start_secs, window.end_secs
                )));
            }
        }
        for pair in self.windows.windows(2) {
            let gap = (pair[1].start_secs - pair[0].end_secs).abs();
            if gap > CONTIGUITY_EPSILON {
                return Err(CoreError::TimelineInconsistency(format!(
                    "windows for scenes {} and {} are not contiguous (gap {gap})",
                    pair[0].scene_index, pair[1].scene_index
                )));
            }
        }
        Ok(())
    }

    /// Extracts the serializable per-scene timing metadata.
    #[must_use]
    pub fn scene_timings(&self) -> Vec<SceneTiming> {
        self.windows
            .iter()
            .map(|w| SceneTiming {
                scene: w.scene_index,
                start: w.start_secs,
                end: w.end_secs,
                duration: w.duration_secs(),
            })
            .collect()
    }
}
