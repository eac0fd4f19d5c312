//! Utility functions for formatting and filename handling.

/// Formats seconds as HH:MM:SS (e.g., 3725.0 -> "01:02:05"). Returns
/// "??:??:??" for invalid inputs.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Sanitizes a title for use as a filename: replaces characters that are
/// invalid on common filesystems with underscores and caps the length.
#[must_use]
pub fn sanitize_filename(title: &str) -> String {
    const MAX_LEN: usize = 200;
    let sanitized: String = title
        .chars()
        .map(|c| match c {
            '\\' | '/' | '*' | '?' | ':' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect();
    sanitized.chars().take(MAX_LEN).collect()
}
