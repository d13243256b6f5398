//! Shared tuning constants for editing behavior and playback highlighting.

use std::time::Duration;

/// Default frame rate for new sessions.
pub const DEFAULT_FPS: u32 = 25;

/// Nominal duration for cues created without a neighbor constraint.
pub const DEFAULT_CUE_SECONDS: f64 = 1.0;

/// Highlight hold after a structural edit (split, add) so the playback tick
/// does not immediately steal the selection.
pub const SHORT_HOLD: Duration = Duration::from_millis(2000);

/// Highlight hold while a text or timecode field has focus; cleared on blur.
pub const FOCUS_HOLD: Duration = Duration::from_millis(60_000);

/// Auto-scroll suppression right after inserting a cue.
pub const INSERT_SCROLL_SUPPRESS: Duration = Duration::from_millis(800);

/// Auto-scroll suppression right after a drag reorder.
pub const REORDER_SCROLL_SUPPRESS: Duration = Duration::from_millis(400);

/// Polling cadence for the external job service.
pub const JOB_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Maximum number of job polls before giving up.
pub const JOB_POLL_ATTEMPTS: u32 = 240;
