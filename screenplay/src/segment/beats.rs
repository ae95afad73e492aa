//! Line-level beat extraction.

use super::Beat;

/// Non-blank, trimmed lines of a scene body, in order.
///
/// Both beat extraction and character cue detection work on this view.
pub fn body_lines(body: &str) -> Vec<&str> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Split a scene body into beats, one per non-blank line, numbered from 1.
pub fn extract_beats(scene_number: usize, body: &str) -> Vec<Beat> {
    body_lines(body)
        .into_iter()
        .enumerate()
        .map(|(i, line)| Beat::new(scene_number, i + 1, line.to_string()))
        .collect()
}
