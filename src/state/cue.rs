use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Plain timed-text record: the shape cues are imported, exported, and
/// snapshotted in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CueSnapshot {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Caption text.
    pub text: String,
}

impl CueSnapshot {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// A single cue on a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    /// Unique identifier
    pub id: Uuid,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds (always > start by at least one frame)
    pub end: f64,
    /// Caption text
    pub text: String,
    /// Snapshot of this cue as it was created, used for reset
    #[serde(default)]
    pub origin: Option<CueSnapshot>,
    /// Stable pointer into the track's pristine list. `None` for cues
    /// created during editing (split, add).
    #[serde(default)]
    pub source_index: Option<usize>,
}

impl Cue {
    /// Create a cue with an origin snapshot of its initial state.
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            text: text.clone(),
            origin: Some(CueSnapshot::new(start, end, text)),
            source_index: None,
        }
    }

    /// Build a cue from a pristine record, keeping the pointer back to it.
    pub fn from_pristine(record: &CueSnapshot, index: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            start: record.start,
            end: record.end,
            text: record.text.clone(),
            origin: Some(record.clone()),
            source_index: Some(index),
        }
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Whether the playback position falls inside this cue (inclusive
    /// on both ends).
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t <= self.end
    }

    /// Current state as a plain record.
    pub fn snapshot(&self) -> CueSnapshot {
        CueSnapshot::new(self.start, self.end, self.text.clone())
    }
}
