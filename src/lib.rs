//! Cuedeck
//!
//! Frame-accurate caption/subtitle timeline editor core, driven by a media
//! player clock. Two independently editable tracks (original/translation)
//! share one clock and one frame rate but never each other's edits; every
//! boundary is quantized to whole frames, so rapid interleaved edits cannot
//! drift or collapse a cue below one frame of duration.
//!
//! The crate is the model layer only. Media decode, text rendering, and UI
//! chrome are external collaborators: a [`player::Player`] supplies
//! position/duration and accepts seeks, the [`codec`] speaks the subtitle
//! wire formats, and [`jobs`] talks to a remote transcription service.

pub mod codec;
pub mod commands;
pub mod constants;
pub mod core;
pub mod error;
pub mod jobs;
pub mod player;
pub mod state;

pub use codec::CodecFormat;
pub use commands::{EditCommand, EditOutcome, NudgeStep};
pub use crate::core::playback::{PlaybackReducer, PlaybackView, TrackView};
pub use error::EditError;
pub use player::Player;
pub use state::{
    Boundary, Cue, CueSnapshot, DisplayMode, EditSession, EditorSession, InsertPosition,
    Timeline, Track,
};
