//! State management module
//!
//! This module contains the core data structures for the editor:
//! - EditorSession: the dual-track container and command dispatcher
//! - Timeline: ordered cue list for one track, with all edit operations
//! - Cue: a single timed caption record
//! - EditSession: transient drag and pending-text state

mod cue;
mod edit_session;
mod persistence;
mod session;
mod timeline;

pub use cue::{Cue, CueSnapshot};
pub use edit_session::{DragState, EditSession};
pub use session::{DisplayMode, EditorSession, SourceTimecode, Track};
pub use timeline::{Boundary, InsertPosition, Timeline};
