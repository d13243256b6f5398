//! Seconds/frame conversions and timecode formatting.
//!
//! All boundary math in the editor happens in whole frames and is converted
//! back to seconds on commit, so repeated edits never accumulate float drift.
//! The frame rate is runtime-changeable and never stored per cue:
//! quantization is always recomputed against the current rate.

/// Convert seconds to a whole frame count at the given rate, clamped >= 0.
pub fn seconds_to_frames(seconds: f64, fps: u32) -> i64 {
    ((seconds * fps.max(1) as f64).round() as i64).max(0)
}

/// Convert a frame count back to seconds, clamped >= 0.
pub fn frames_to_seconds(frames: i64, fps: u32) -> f64 {
    frames.max(0) as f64 / fps.max(1) as f64
}

/// Format seconds as `HH:MM:SS:FF` at the given rate.
pub fn format_timecode(seconds: f64, fps: u32) -> String {
    let fps = fps.max(1);
    let total_frames = seconds_to_frames(seconds, fps);
    let frames = total_frames % fps as i64;
    let total_seconds = total_frames / fps as i64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{:02}:{:02}:{:02}:{:02}", hours, minutes, secs, frames)
}

/// Format a duration as `SS:FF`. The seconds field is not wrapped at 60;
/// this is the compact length readout next to a cue's in/out points.
pub fn format_duration(seconds: f64, fps: u32) -> String {
    let fps = fps.max(1);
    let total_frames = seconds_to_frames(seconds.max(0.0), fps);
    let frames = total_frames % fps as i64;
    let secs = total_frames / fps as i64;
    format!("{:02}:{:02}", secs, frames)
}

/// Parse a colon-separated timecode into seconds.
///
/// Accepts `SS:FF`, `MM:SS:FF`, and `HH:MM:SS:FF`. Any empty or non-numeric
/// field invalidates the whole input. The result is clamped >= 0.
///
/// Formatting a value and parsing it back reproduces the identical frame
/// count at the same rate.
pub fn parse_timecode(text: &str, fps: u32) -> Option<f64> {
    let fps = fps.max(1);
    let parts: Vec<f64> = text
        .trim()
        .split(':')
        .map(|part| part.trim().parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()?;

    let (hh, mm, ss, ff) = match parts.as_slice() {
        [ss, ff] => (0.0, 0.0, *ss, *ff),
        [mm, ss, ff] => (0.0, *mm, *ss, *ff),
        [hh, mm, ss, ff] => (*hh, *mm, *ss, *ff),
        _ => return None,
    };

    Some((hh * 3600.0 + mm * 60.0 + ss + ff / fps as f64).max(0.0))
}
