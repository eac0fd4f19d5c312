//! Pan-and-zoom (Ken Burns) planning for scene stills.
//!
//! Each scene's still image becomes a motion clip of exactly the scene's
//! resolved duration. The interpolation is linear from the start zoom to
//! the end zoom, with a slow directional drift. Planning is pure: the
//! output is a typed clip carrying the ffmpeg zoompan filter expression
//! and the exact frame count, so pacing can be unit tested without
//! invoking an encoder.

use crate::config::{AssemblyConfig, PanDirection};

/// Fraction of the frame width/height the pan drifts across a scene.
const PAN_STRENGTH: f64 = 0.06;

/// A planned, time-boxed animated rendering of one scene's still image.
#[derive(Debug, Clone)]
pub struct VisualClip {
    pub scene_index: usize,
    pub duration_secs: f64,
    /// Exact output frame count: floor(duration x fps), minimum 1. Floor
    /// is the fixed rounding policy; a sub-frame duration still renders
    /// one frame.
    pub frame_count: u64,
    /// Complete per-input filter expression (scale + zoompan + setsar).
    pub filter: String,
}

/// Pan directions after `Auto` resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedPan {
    Left,
    Right,
    Up,
    Down,
}

/// Resolves the configured pan for a scene. `Auto` cycles by scene index
/// so adjacent scenes drift differently.
#[must_use]
pub fn resolve_pan(pan: PanDirection, scene_index: usize) -> ResolvedPan {
    match pan {
        PanDirection::Left => ResolvedPan::Left,
        PanDirection::Right => ResolvedPan::Right,
        PanDirection::Up => ResolvedPan::Up,
        PanDirection::Down => ResolvedPan::Down,
        PanDirection::Auto => match scene_index % 4 {
            1 => ResolvedPan::Left,
            2 => ResolvedPan::Right,
            3 => ResolvedPan::Up,
            _ => ResolvedPan::Down,
        },
    }
}

/// Number of output frames for a clip of `duration_secs` at `fps`.
#[must_use]
pub fn frame_count(duration_secs: f64, fps: u32) -> u64 {
    let frames = (duration_secs * f64::from(fps)).floor() as u64;
    frames.max(1)
}

/// Plans the motion clip for one scene's still image.
pub fn animate(scene_index: usize, duration_secs: f64, config: &AssemblyConfig) -> VisualClip {
    let (width, height) = config.resolution;
    let frames = frame_count(duration_secs, config.fps);
    let pan = resolve_pan(config.pan, scene_index);

    // Signed delta formatting keeps the expression valid for zoom-out.
    let zoom_delta = config.zoom_end - config.zoom_start;
    let zoom_expr = format!(
        "{:.4}{:+.4}*on/{frames}",
        config.zoom_start, zoom_delta
    );

    // Centered crop plus a linear drift of PAN_STRENGTH over the clip.
    let center_x = "(iw-iw/zoom)/2";
    let center_y = "(ih-ih/zoom)/2";
    let (x_expr, y_expr) = match pan {
        ResolvedPan::Left => (
            format!("{center_x}-{PAN_STRENGTH:.2}*iw*on/{frames}"),
            center_y.to_string(),
        ),
        ResolvedPan::Right => (
            format!("{center_x}+{PAN_STRENGTH:.2}*iw*on/{frames}"),
            center_y.to_string(),
        ),
        ResolvedPan::Up => (
            center_x.to_string(),
            format!("{center_y}-{PAN_STRENGTH:.2}*ih*on/{frames}"),
        ),
        ResolvedPan::Down => (
            center_x.to_string(),
            format!("{center_y}+{PAN_STRENGTH:.2}*ih*on/{frames}"),
        ),
    };

    // Upscale before zoompan to avoid sub-pixel jitter on the crop window.
    let supersample_width = width * 2;
    let filter = format!(
        "scale={supersample_width}:-2,zoompan=z='{zoom_expr}':x='{x_expr}':y='{y_expr}':d={frames}:s={width}x{height}:fps={fps},setsar=1",
        fps = config.fps
    );

    VisualClip {
        scene_index,
        duration_secs,
        frame_count: frames,
        filter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AssemblyConfig {
        AssemblyConfig::default()
    }

    #[test]
    fn test_frame_count_floors() {
        assert_eq!(frame_count(4.0, 30), 120);
        assert_eq!(frame_count(2.5, 30), 75);
        // 0.999s at 30fps is 29.97 frames; floor gives 29.
        assert_eq!(frame_count(0.999, 30), 29);
    }

    #[test]
    fn test_sub_frame_duration_yields_one_frame() {
        assert_eq!(frame_count(0.01, 30), 1);
        assert_eq!(frame_count(0.0, 30), 1);
    }

    #[test]
    fn test_auto_pan_cycles_by_scene_index() {
        assert_eq!(resolve_pan(PanDirection::Auto, 1), ResolvedPan::Left);
        assert_eq!(resolve_pan(PanDirection::Auto, 2), ResolvedPan::Right);
        assert_eq!(resolve_pan(PanDirection::Auto, 3), ResolvedPan::Up);
        assert_eq!(resolve_pan(PanDirection::Auto, 4), ResolvedPan::Down);
        assert_eq!(resolve_pan(PanDirection::Auto, 5), ResolvedPan::Left);
    }

    #[test]
    fn test_explicit_pan_ignores_index() {
        assert_eq!(resolve_pan(PanDirection::Up, 1), ResolvedPan::Up);
        assert_eq!(resolve_pan(PanDirection::Up, 2), ResolvedPan::Up);
    }

    #[test]
    fn test_animate_clip_length_matches_duration() {
        let clip = animate(1, 4.0, &config());
        assert_eq!(clip.frame_count, 120);
        assert_eq!(clip.duration_secs, 4.0);
        assert!(clip.filter.contains("d=120"));
        assert!(clip.filter.contains("s=1920x1080"));
        assert!(clip.filter.contains("fps=30"));
    }

    #[test]
    fn test_animate_interpolates_configured_zoom() {
        let clip = animate(1, 2.0, &config());
        assert!(clip.filter.contains("1.0500+0.1000*on/60"));
    }

    #[test]
    fn test_animate_zoom_out_keeps_expression_well_formed() {
        let cfg = AssemblyConfig {
            zoom_start: 1.15,
            zoom_end: 1.05,
            ..Default::default()
        };
        let clip = animate(1, 2.0, &cfg);
        assert!(clip.filter.contains("1.1500-0.1000*on/60"));
        assert!(!clip.filter.contains("+-"));
    }

    #[test]
    fn test_animate_pan_direction_in_expression() {
        let cfg = config();
        let left = animate(1, 2.0, &cfg);
        assert!(left.filter.contains("(iw-iw/zoom)/2-0.06*iw"));

        let down = animate(4, 2.0, &cfg);
        assert!(down.filter.contains("(ih-ih/zoom)/2+0.06*ih"));
    }
}
