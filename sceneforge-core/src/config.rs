//! Configuration structures and constants for the sceneforge-core library.
//!
//! This module provides the configuration system for video assembly behavior,
//! including pacing, transition, subtitle, and output settings.

/// Default output frame rate.
pub const DEFAULT_FPS: u32 = 30;

/// Default output resolution (width, height).
pub const DEFAULT_RESOLUTION: (u32, u32) = (1920, 1080);

/// Default crossfade duration between adjacent scenes, in seconds.
pub const DEFAULT_CROSSFADE_SECS: f64 = 0.3;

/// Duration assigned to a scene that has no audio and no explicit duration.
pub const DEFAULT_FALLBACK_SCENE_SECONDS: f64 = 5.0;

/// Minimum duration for any scene, even when its audio is shorter.
pub const DEFAULT_MIN_SCENE_SECONDS: f64 = 2.0;

/// Silence padding inserted before a scene's narration audio, in seconds.
pub const DEFAULT_HEAD_PAD_SECS: f64 = 0.15;

/// Silence padding inserted after a scene's narration audio, in seconds.
pub const DEFAULT_TAIL_PAD_SECS: f64 = 0.15;

/// Maximum characters per rendered subtitle line.
pub const DEFAULT_MAX_LINE_CHARS: usize = 40;

/// Maximum lines per subtitle cue.
pub const DEFAULT_MAX_LINES_PER_CUE: usize = 3;

/// Ken Burns zoom factor at the start of each scene.
pub const DEFAULT_ZOOM_START: f64 = 1.05;

/// Ken Burns zoom factor at the end of each scene.
pub const DEFAULT_ZOOM_END: f64 = 1.15;

/// Pan direction for the Ken Burns effect applied to each scene's still.
///
/// `Auto` cycles left/right/up/down by scene index so consecutive scenes
/// do not drift the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanDirection {
    #[default]
    Auto,
    Left,
    Right,
    Up,
    Down,
}

impl PanDirection {
    /// Parses a pan direction from its lowercase name. Unknown names fall
    /// back to `Auto`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "left" => Self::Left,
            "right" => Self::Right,
            "up" => Self::Up,
            "down" => Self::Down,
            _ => Self::Auto,
        }
    }
}

/// Main configuration structure for a video assembly request.
///
/// Created by the consumer of the library (e.g. sceneforge-cli) and passed
/// to [`crate::assemble`]. All fields have working defaults, so callers only
/// override what they need.
#[derive(Debug, Clone)]
pub struct AssemblyConfig {
    /// Output frame rate.
    pub fps: u32,

    /// Output resolution as (width, height).
    pub resolution: (u32, u32),

    /// Crossfade duration between adjacent scenes, in seconds. Zero
    /// disables transitions entirely (hard cuts).
    pub crossfade_secs: f64,

    /// Duration for scenes with no audio.
    pub fallback_scene_seconds: f64,

    /// Minimum duration for any scene.
    pub min_scene_seconds: f64,

    /// Silence padding before each scene's narration.
    pub head_pad_secs: f64,

    /// Silence padding after each scene's narration.
    pub tail_pad_secs: f64,

    /// Optional cap on total video duration. When the projected total
    /// exceeds this, per-scene padding is reduced before any audio is
    /// trimmed.
    pub max_video_duration: Option<f64>,

    /// Maximum characters per subtitle line.
    pub max_line_chars: usize,

    /// Maximum lines per subtitle cue.
    pub max_lines_per_cue: usize,

    /// Whether to generate an SRT subtitle track from narration text.
    pub generate_subtitles: bool,

    /// Ken Burns zoom at scene start.
    pub zoom_start: f64,

    /// Ken Burns zoom at scene end.
    pub zoom_end: f64,

    /// Ken Burns pan direction.
    pub pan: PanDirection,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            resolution: DEFAULT_RESOLUTION,
            crossfade_secs: DEFAULT_CROSSFADE_SECS,
            fallback_scene_seconds: DEFAULT_FALLBACK_SCENE_SECONDS,
            min_scene_seconds: DEFAULT_MIN_SCENE_SECONDS,
            head_pad_secs: DEFAULT_HEAD_PAD_SECS,
            tail_pad_secs: DEFAULT_TAIL_PAD_SECS,
            max_video_duration: None,
            max_line_chars: DEFAULT_MAX_LINE_CHARS,
            max_lines_per_cue: DEFAULT_MAX_LINES_PER_CUE,
            generate_subtitles: true,
            zoom_start: DEFAULT_ZOOM_START,
            zoom_end: DEFAULT_ZOOM_END,
            pan: PanDirection::Auto,
        }
    }
}

impl AssemblyConfig {
    /// Validates the configuration, returning a description of the first
    /// problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.fps == 0 {
            return Err("fps must be greater than 0".to_string());
        }
        if self.resolution.0 == 0 || self.resolution.1 == 0 {
            return Err("resolution dimensions must be greater than 0".to_string());
        }
        if self.crossfade_secs < 0.0 || !self.crossfade_secs.is_finite() {
            return Err(format!(
                "crossfade duration must be non-negative, got {}",
                self.crossfade_secs
            ));
        }
        if self.fallback_scene_seconds <= 0.0 {
            return Err("fallback scene duration must be positive".to_string());
        }
        if self.min_scene_seconds <= 0.0 {
            return Err("minimum scene duration must be positive".to_string());
        }
        if self.head_pad_secs < 0.0 || self.tail_pad_secs < 0.0 {
            return Err("audio padding must be non-negative".to_string());
        }
        if let Some(cap) = self.max_video_duration {
            if cap <= 0.0 {
                return Err("max video duration must be positive".to_string());
            }
        }
        if self.max_line_chars == 0 {
            return Err("max characters per subtitle line must be greater than 0".to_string());
        }
        if self.max_lines_per_cue == 0 {
            return Err("max lines per subtitle cue must be greater than 0".to_string());
        }
        if self.zoom_start <= 0.0 || self.zoom_end <= 0.0 {
            return Err("zoom factors must be positive".to_string());
        }
        Ok(())
    }
}
