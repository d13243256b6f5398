use thiserror::Error;

/// Errors surfaced by timeline edits, codecs, persistence, and the job client.
///
/// Invariant repairs (a boundary that would collapse below one frame) are
/// never reported here: they are silently auto-corrected so the model stays
/// in a valid state at all times.
#[derive(Debug, Error)]
pub enum EditError {
    /// Mutation attempted on a locked track. Callers treat this as a quiet
    /// no-op rather than a user-facing failure.
    #[error("track is locked")]
    LockedTrack,

    /// Cue index outside the timeline.
    #[error("cue index {0} out of range")]
    IndexOutOfRange(usize),

    /// Export or find/replace on a timeline with no cues.
    #[error("timeline has no cues")]
    EmptyTimeline,

    /// Timecode text that does not parse. The editing surface reverts the
    /// field to its last committed value.
    #[error("invalid timecode: {0:?}")]
    InvalidTimecode(String),

    /// Frame rate must be a positive integer.
    #[error("invalid frame rate: {0}")]
    InvalidFrameRate(u32),

    /// Search pattern that does not compile after escaping.
    #[error("invalid search pattern: {0}")]
    InvalidPattern(String),

    /// Remote transcription/alignment job failed or returned nothing usable.
    /// The timeline is left unmodified.
    #[error("job service: {0}")]
    ExternalJob(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
