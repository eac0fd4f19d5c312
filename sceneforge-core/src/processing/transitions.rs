//! Crossfade planning and video stitch graph construction.
//!
//! Adjacent motion clips are merged end-to-start with a bounded crossfade:
//! the overlap for each pair is capped at half the shorter clip, so no
//! clip can be entirely consumed by its own transitions. During the
//! overlap the outgoing clip's opacity ramps 1 to 0 while the incoming
//! ramps 0 to 1 linearly (ffmpeg's `xfade=fade`), summing to full opacity
//! at every instant. The first clip has no leading and the last no
//! trailing transition.

use crate::processing::motion::VisualClip;

/// Overlaps shorter than this clamp to zero and render as hard cuts;
/// xfade rejects zero-length transitions.
const MIN_OVERLAP_SECS: f64 = 0.001;

/// The crossfade overlap used between two adjacent clips:
/// `min(crossfade, min(d1, d2) / 2)`, never negative. A result below
/// `MIN_OVERLAP_SECS` clamps to zero so the planned total and the
/// rendered graph agree on where hard cuts fall.
#[must_use]
pub fn overlap_between(first_secs: f64, second_secs: f64, crossfade_secs: f64) -> f64 {
    let overlap = crossfade_secs.min(first_secs.min(second_secs) / 2.0).max(0.0);
    if overlap < MIN_OVERLAP_SECS {
        0.0
    } else {
        overlap
    }
}

/// Planned transitions for an ordered clip sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    /// Overlap used between each adjacent pair; `len = clips - 1`.
    pub overlaps: Vec<f64>,
    /// Stitched output duration: sum of clip durations minus overlaps.
    pub total_secs: f64,
}

/// Plans the overlaps for an ordered sequence of clip durations.
///
/// Zero or one clip passes through unchanged: no overlaps, total equal to
/// the input duration sum.
#[must_use]
pub fn plan_transitions(durations: &[f64], crossfade_secs: f64) -> TransitionPlan {
    let overlaps: Vec<f64> = durations
        .windows(2)
        .map(|pair| overlap_between(pair[0], pair[1], crossfade_secs))
        .collect();
    let sum: f64 = durations.iter().sum();
    let overlap_sum: f64 = overlaps.iter().sum();
    TransitionPlan {
        overlaps,
        total_secs: sum - overlap_sum,
    }
}

/// Start offset of each `xfade` in the stitched output: the accumulated
/// output duration so far minus the pair's overlap.
#[must_use]
pub fn xfade_offsets(durations: &[f64], overlaps: &[f64]) -> Vec<f64> {
    let mut offsets = Vec::with_capacity(overlaps.len());
    let mut accumulated = durations.first().copied().unwrap_or(0.0);
    for (i, &overlap) in overlaps.iter().enumerate() {
        let offset = accumulated - overlap;
        offsets.push(offset);
        accumulated = offset + durations[i + 1];
    }
    offsets
}

/// Builds the filtergraph fragment that stitches clips labeled
/// `[v0]..[vN-1]` into one stream, returning the fragment and the output
/// label. With a single clip the fragment is empty and its own label is
/// returned. Each boundary renders independently: a zero overlap becomes
/// a pairwise hard cut (concat) while its neighbors keep their crossfades.
#[must_use]
pub fn build_stitch_graph(clips: &[VisualClip], crossfade_secs: f64) -> (String, String) {
    if clips.len() <= 1 {
        return (String::new(), "v0".to_string());
    }

    let durations: Vec<f64> = clips.iter().map(|c| c.duration_secs).collect();
    let plan = plan_transitions(&durations, crossfade_secs);
    let offsets = xfade_offsets(&durations, &plan.overlaps);

    let mut graph = String::new();
    let mut prev_label = "v0".to_string();
    for (i, (&overlap, &offset)) in plan.overlaps.iter().zip(offsets.iter()).enumerate() {
        let next_input = i + 1;
        let out_label = if next_input == clips.len() - 1 {
            "vout".to_string()
        } else {
            format!("x{next_input}")
        };
        if overlap > 0.0 {
            graph.push_str(&format!(
                "[{prev_label}][v{next_input}]xfade=transition=fade:duration={overlap:.3}:offset={offset:.3}[{out_label}];"
            ));
        } else {
            graph.push_str(&format!(
                "[{prev_label}][v{next_input}]concat=n=2:v=1:a=0[{out_label}];"
            ));
        }
        prev_label = out_label;
    }

    (graph, "vout".to_string())
}
