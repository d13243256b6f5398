//! Transient editing state: in-flight boundary drags and uncommitted text.
//!
//! Nothing here is serialized; an abandoned drag or a stale pending edit
//! simply evaporates with the session view.

use std::collections::BTreeMap;

use crate::codec::CodecFormat;
use crate::commands::{EditCommand, EditOutcome};
use crate::core::frame_clock::seconds_to_frames;
use crate::error::EditError;
use crate::player::Player;
use crate::state::{Boundary, EditorSession, Track};

/// An in-flight boundary drag. Created on pointer-down, updated with frame
/// deltas while the pointer moves, dropped on release or cancel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub track: Track,
    pub index: usize,
    pub boundary: Boundary,
    /// Boundary frame at pointer-down; deltas apply against this, so a drag
    /// is stateless with respect to intermediate commits.
    pub origin_frame: i64,
}

/// Per-view editing state for one editor session.
#[derive(Debug, Default)]
pub struct EditSession {
    drag: Option<DragState>,
    /// Latest uncommitted text per row, captured from the edit surface.
    pending_text: BTreeMap<(usize, usize), String>,
}

fn key(track: Track, index: usize) -> (usize, usize) {
    (track as usize, index)
}

impl EditSession {
    /// Begin dragging a cue boundary. Fails when the index is bad; a locked
    /// track is caught later at commit time.
    pub fn begin_drag(
        &mut self,
        session: &EditorSession,
        track: Track,
        index: usize,
        boundary: Boundary,
    ) -> Result<(), EditError> {
        let timeline = session.timeline(track);
        let cue = timeline
            .cues
            .get(index)
            .ok_or(EditError::IndexOutOfRange(index))?;
        let seconds = match boundary {
            Boundary::Start => cue.start,
            Boundary::End => cue.end,
        };
        self.drag = Some(DragState {
            track,
            index,
            boundary,
            origin_frame: seconds_to_frames(seconds, session.fps()),
        });
        Ok(())
    }

    pub fn drag(&self) -> Option<DragState> {
        self.drag
    }

    /// Apply the current pointer delta to the dragged boundary.
    pub fn update_drag(
        &mut self,
        session: &mut EditorSession,
        player: &mut dyn Player,
        delta_frames: i64,
    ) -> Result<Option<EditOutcome>, EditError> {
        let Some(drag) = self.drag else {
            return Ok(None);
        };
        let outcome = session.apply(
            drag.track,
            EditCommand::Resize {
                index: drag.index,
                boundary: drag.boundary,
                frame: drag.origin_frame + delta_frames,
            },
            player,
        )?;
        Ok(Some(outcome))
    }

    /// Finish the drag. The last update already committed; nothing more to
    /// write.
    pub fn end_drag(&mut self) -> Option<DragState> {
        self.drag.take()
    }

    /// Abandon the drag without committing anything further.
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Capture the latest text typed into a row, without committing it.
    pub fn stage_text(&mut self, track: Track, index: usize, text: impl Into<String>) {
        self.pending_text.insert(key(track, index), text.into());
    }

    pub fn has_pending_text(&self) -> bool {
        !self.pending_text.is_empty()
    }

    /// Write all staged text into the model. Must run before structural
    /// edits that renumber rows (reorder, delete) and before export, so the
    /// model matches what is on screen. Locked tracks and rows that no
    /// longer exist are skipped quietly.
    pub fn flush_into(&mut self, session: &mut EditorSession) {
        for ((track_index, index), text) in std::mem::take(&mut self.pending_text) {
            let track = if track_index == Track::A as usize {
                Track::A
            } else {
                Track::B
            };
            let _ = session.timeline_mut(track).set_text(index, text);
        }
    }

    /// Flush staged text, then dispatch. Structural commands see a model
    /// that already contains every in-flight edit.
    pub fn dispatch(
        &mut self,
        session: &mut EditorSession,
        track: Track,
        command: EditCommand,
        player: &mut dyn Player,
    ) -> Result<EditOutcome, EditError> {
        if matches!(
            command,
            EditCommand::Reorder { .. }
                | EditCommand::Delete { .. }
                | EditCommand::Reset { .. }
                | EditCommand::FindReplace { .. }
        ) {
            self.flush_into(session);
        }
        session.apply(track, command, player)
    }

    /// Flush staged text, then export the track. Exporting straight off the
    /// model would miss whatever is still on the edit surface.
    pub fn export(
        &mut self,
        session: &mut EditorSession,
        track: Track,
        format: CodecFormat,
    ) -> Result<String, EditError> {
        self.flush_into(session);
        session.export(track, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::StubPlayer;
    use crate::state::{CueSnapshot, InsertPosition};

    fn session() -> EditorSession {
        let mut session = EditorSession::new();
        session
            .import(
                Track::A,
                vec![
                    CueSnapshot::new(0.0, 2.0, "a"),
                    CueSnapshot::new(2.0, 4.0, "b"),
                ],
            )
            .unwrap();
        session
    }

    #[test]
    fn test_drag_commits_relative_to_origin() {
        let mut session = session();
        let mut edit = EditSession::default();
        let mut player = StubPlayer::with_duration(10.0);

        edit.begin_drag(&session, Track::A, 0, Boundary::End).unwrap();
        edit.update_drag(&mut session, &mut player, 10).unwrap();
        // Deltas always apply to the pointer-down origin, not the last commit.
        edit.update_drag(&mut session, &mut player, 5).unwrap();
        assert_eq!(
            seconds_to_frames(session.track_a.cues[0].end, session.fps()),
            55
        );
        assert!(edit.end_drag().is_some());
        assert!(edit.drag().is_none());
    }

    #[test]
    fn test_cancelled_drag_commits_nothing_more() {
        let mut session = session();
        let mut edit = EditSession::default();
        let mut player = StubPlayer::with_duration(10.0);

        edit.begin_drag(&session, Track::A, 0, Boundary::End).unwrap();
        edit.cancel_drag();
        let outcome = edit.update_drag(&mut session, &mut player, 25).unwrap();
        assert_eq!(outcome, None);
        assert_eq!(session.track_a.cues[0].end, 2.0);
    }

    #[test]
    fn test_reorder_flushes_pending_text_first() {
        let mut session = session();
        let mut edit = EditSession::default();
        let mut player = StubPlayer::default();

        edit.stage_text(Track::A, 0, "typed but uncommitted");
        edit.dispatch(
            &mut session,
            Track::A,
            EditCommand::Reorder {
                src: 0,
                dst: 1,
                position: InsertPosition::After,
            },
            &mut player,
        )
        .unwrap();

        assert_eq!(session.track_a.cues[1].text, "typed but uncommitted");
        assert!(!edit.has_pending_text());
    }

    #[test]
    fn test_export_flushes_pending_text_first() {
        let mut session = session();
        let mut edit = EditSession::default();

        edit.stage_text(Track::A, 0, "still in the field");
        let output = edit
            .export(&mut session, Track::A, CodecFormat::Srt)
            .unwrap();

        assert!(output.contains("still in the field"));
        assert!(!edit.has_pending_text());
    }

    #[test]
    fn test_flush_skips_locked_track() {
        let mut session = session();
        let mut edit = EditSession::default();
        session.set_locked(Track::A, true);
        edit.stage_text(Track::A, 0, "blocked");
        edit.flush_into(&mut session);
        assert_eq!(session.track_a.cues[0].text, "a");
    }

    #[test]
    fn test_flush_skips_vanished_rows() {
        let mut session = session();
        let mut edit = EditSession::default();
        edit.stage_text(Track::A, 7, "gone");
        edit.flush_into(&mut session);
        assert!(!edit.has_pending_text());
    }
}
