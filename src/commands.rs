//! Edit commands and their outcomes.
//!
//! Interactions (drags, keystrokes, context-menu actions) are expressed as
//! semantic command messages, decoupling "what input arrived" from "what the
//! timeline does". Commands are dispatched through
//! [`EditorSession::apply`](crate::state::EditorSession::apply).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::state::{Boundary, InsertPosition};

/// A single edit addressed at one cue (or the whole track).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditCommand {
    /// Split a cue's text at a caret offset, inserting the right half as a
    /// new cue at the frame midpoint.
    Split { index: usize, caret: usize },
    /// Move one boundary to an absolute frame (drag or typed timecode).
    Resize {
        index: usize,
        boundary: Boundary,
        frame: i64,
    },
    /// Move one boundary by a frame delta (arrow keys).
    Nudge {
        index: usize,
        boundary: Boundary,
        delta_frames: i64,
    },
    /// Drop a cue before/after another row.
    Reorder {
        src: usize,
        dst: usize,
        position: InsertPosition,
    },
    /// Cascade text toward earlier cues from `index` on.
    PushUp { index: usize },
    /// Cascade text toward later cues from `index` on.
    PushDown { index: usize },
    /// Insert an empty cue after `index`.
    AddAfter { index: usize },
    /// Remove the cue at `index`.
    Delete { index: usize },
    /// Restore the cue at `index` from its pristine or origin snapshot.
    Reset { index: usize },
    /// Commit edited text into the cue at `index`.
    SetText { index: usize, text: String },
    /// Replace every match of a literal pattern across the track.
    FindReplace {
        pattern: String,
        replacement: String,
        case_sensitive: bool,
        whole_word: bool,
    },
}

/// Nudge magnitude selected by keyboard modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeStep {
    Single,
    Medium,
    Large,
}

impl NudgeStep {
    /// Ctrl jumps ten frames, Shift five, otherwise one.
    pub fn from_modifiers(shift: bool, ctrl: bool) -> Self {
        if ctrl {
            NudgeStep::Large
        } else if shift {
            NudgeStep::Medium
        } else {
            NudgeStep::Single
        }
    }

    pub fn frames(self) -> i64 {
        match self {
            NudgeStep::Single => 1,
            NudgeStep::Medium => 5,
            NudgeStep::Large => 10,
        }
    }
}

/// What a dispatched command asks the caller to project afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditOutcome {
    /// Whether the timeline changed at all.
    pub changed: bool,
    /// Boundary the player was seeked to, in seconds.
    pub seek_to: Option<f64>,
    /// Row the view should select.
    pub select: Option<usize>,
    /// Highlight hold to install on the edited track.
    pub hold: Option<(usize, Duration)>,
    /// Auto-scroll suppression window to start.
    pub suppress_scroll: Option<Duration>,
    /// Replacement count from find/replace.
    pub replaced: usize,
}
