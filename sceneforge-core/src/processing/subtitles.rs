//! Subtitle cue generation and SRT rendering.
//!
//! Each scene with narration yields cues covering that scene's timeline
//! window. Markdown is stripped to display text, word-wrapped into lines
//! of at most `max_line_chars`, and grouped into cues of at most
//! `max_lines_per_cue` lines. The window is split across the cues
//! proportionally to character count; residual milliseconds from integer
//! division go to the last cue so the window is covered exactly.
//! Sequence numbers are global and gap-free across scenes.

use crate::config::AssemblyConfig;
use crate::processing::duration::ResolvedScene;
use crate::processing::timeline::{SceneWindow, Timeline};

use log::{debug, warn};
use pulldown_cmark::{Event, Parser};

/// Gap inserted between consecutive cues so they never share an instant.
pub const CUE_GAP_MS: u64 = 1;

/// One rendered SRT cue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleCue {
    /// Global 1-based sequence number.
    pub sequence: usize,
    pub start_ms: u64,
    pub end_ms: u64,
    pub lines: Vec<String>,
}

/// Reduces markdown-tagged narration to plain display text with
/// whitespace collapsed.
#[must_use]
pub fn strip_markup(narration: &str) -> String {
    let mut text = String::with_capacity(narration.len());
    for event in Parser::new(narration) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::End(_) => text.push(' '),
            _ => {}
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Greedy word wrap at word boundaries. A single word longer than
/// `max_chars` gets a line of its own rather than being split.
#[must_use]
pub fn wrap_lines(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn chunk_lines(lines: Vec<String>, max_lines: usize) -> Vec<Vec<String>> {
    lines
        .chunks(max_lines.max(1))
        .map(<[String]>::to_vec)
        .collect()
}

/// Unnumbered cues for one scene window. Returns an empty vec when the
/// narration strips down to nothing.
fn cues_for_window(
    window: &SceneWindow,
    narration: &str,
    config: &AssemblyConfig,
) -> Vec<(u64, u64, Vec<String>)> {
    let text = strip_markup(narration);
    if text.is_empty() {
        return Vec::new();
    }

    let chunks = chunk_lines(
        wrap_lines(&text, config.max_line_chars),
        config.max_lines_per_cue,
    );
    let char_counts: Vec<u64> = chunks
        .iter()
        .map(|chunk| chunk.iter().map(|l| l.chars().count() as u64).sum())
        .collect();
    let total_chars: u64 = char_counts.iter().sum();

    let window_start_ms = (window.start_secs * 1000.0).round() as u64;
    let window_end_ms = (window.end_secs * 1000.0).round() as u64;
    let window_ms = window_end_ms.saturating_sub(window_start_ms);

    let mut cues = Vec::with_capacity(chunks.len());
    let mut cursor = window_start_ms;
    let mut allocated = 0u64;
    let last = chunks.len() - 1;
    for (i, (chunk, &chars)) in chunks.into_iter().zip(char_counts.iter()).enumerate() {
        // Residual from integer division lands on the last chunk.
        let slice_ms = if i == last {
            window_ms - allocated
        } else {
            window_ms * chars / total_chars
        };
        allocated += slice_ms;

        let slice_end = cursor + slice_ms;
        let display_end = if i == last {
            slice_end
        } else {
            slice_end.saturating_sub(CUE_GAP_MS).max(cursor)
        };
        cues.push((cursor, display_end, chunk));
        cursor = slice_end;
    }
    cues
}

/// Generates the full cue list for a build, numbered globally from 1.
///
/// `resolved` and the timeline windows are in the same scene order; the
/// pairing is positional.
#[must_use]
pub fn generate_cues(
    timeline: &Timeline,
    resolved: &[ResolvedScene],
    config: &AssemblyConfig,
) -> Vec<SubtitleCue> {
    let mut cues = Vec::new();
    let mut sequence = 1usize;

    for (window, scene) in timeline.windows().iter().zip(resolved.iter()) {
        let Some(narration) = &scene.narration else {
            continue;
        };
        let scene_cues = cues_for_window(window, narration, config);
        if scene_cues.is_empty() {
            warn!(
                "Scene {}: narration is empty after markup stripping, no cues generated",
                scene.scene_index
            );
            continue;
        }
        debug!("Scene {}: {} subtitle cue(s)", scene.scene_index, scene_cues.len());
        for (start_ms, end_ms, lines) in scene_cues {
            cues.push(SubtitleCue {
                sequence,
                start_ms,
                end_ms,
                lines,
            });
            sequence += 1;
        }
    }
    cues
}

fn format_timestamp(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms / 60_000) % 60;
    let seconds = (ms / 1000) % 60;
    let millis = ms % 1000;
    format!("{hours:02}:{minutes:02}:{seconds:02},{millis:03}")
}

/// Renders cues as an SRT document.
#[must_use]
pub fn render_srt(cues: &[SubtitleCue]) -> String {
    let mut out = String::new();
    for cue in cues {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            cue.sequence,
            format_timestamp(cue.start_ms),
            format_timestamp(cue.end_ms),
            cue.lines.join("\n")
        ));
    }
    out
}
