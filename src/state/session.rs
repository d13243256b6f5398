use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::codec::{self, CodecFormat};
use crate::commands::{EditCommand, EditOutcome};
use crate::constants::{
    DEFAULT_CUE_SECONDS, DEFAULT_FPS, INSERT_SCROLL_SUPPRESS, REORDER_SCROLL_SUPPRESS, SHORT_HOLD,
};
use crate::core::frame_clock::{format_timecode, parse_timecode};
use crate::error::EditError;
use crate::player::Player;

use super::{Cue, CueSnapshot, Timeline};

/// One of the two independent caption channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Track {
    /// Original language.
    A = 0,
    /// Translation.
    B = 1,
}

/// Which track(s) the transcript view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    ShowA,
    ShowB,
    ShowBoth,
}

/// Fixed source-timecode origin applied to display and export only.
/// Cue timestamps are always stored media-relative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceTimecode {
    /// Offset in seconds, parsed from an `HH:MM:SS:FF` origin.
    pub offset_seconds: f64,
    /// Whether the offset is applied.
    pub enabled: bool,
}

/// The editor session: both timelines, the shared frame rate, and the
/// display state that selects between them.
///
/// The two tracks stay synchronized to the same playback clock but never to
/// each other's edits: importing or editing one track cannot mutate the
/// other. The session is created at startup and reset when new media loads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorSession {
    /// Schema version for future compatibility
    pub version: String,
    /// Unique identifier
    pub id: Uuid,
    /// Original-language track.
    pub track_a: Timeline,
    /// Translation track.
    pub track_b: Timeline,
    /// Shared frame rate; quantization is always recomputed against it.
    fps: u32,
    /// Which track(s) the transcript view shows.
    pub display_mode: DisplayMode,
    /// Track that last received an edit; the overlay follows it in
    /// dual-display mode.
    last_interacted: Track,
    /// Source-timecode origin for display/export.
    pub source_tc: SourceTimecode,

    /// Folder this session was loaded from (not serialized - set on load)
    #[serde(skip)]
    pub session_path: Option<PathBuf>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            id: Uuid::new_v4(),
            track_a: Timeline::default(),
            track_b: Timeline::default(),
            fps: DEFAULT_FPS,
            display_mode: DisplayMode::ShowA,
            last_interacted: Track::A,
            source_tc: SourceTimecode::default(),
            session_path: None,
        }
    }
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeline(&self, track: Track) -> &Timeline {
        match track {
            Track::A => &self.track_a,
            Track::B => &self.track_b,
        }
    }

    pub fn timeline_mut(&mut self, track: Track) -> &mut Timeline {
        match track {
            Track::A => &mut self.track_a,
            Track::B => &mut self.track_b,
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Change the shared frame rate. Nothing stored per cue changes; all
    /// frame quantization recomputes against the new rate.
    pub fn set_fps(&mut self, fps: u32) -> Result<(), EditError> {
        if fps == 0 {
            return Err(EditError::InvalidFrameRate(fps));
        }
        self.fps = fps;
        Ok(())
    }

    pub fn set_locked(&mut self, track: Track, locked: bool) {
        self.timeline_mut(track).locked = locked;
    }

    /// Track whose text feeds the floating overlay: forced in single-track
    /// modes, the last-interacted track in dual mode.
    pub fn overlay_track(&self) -> Track {
        match self.display_mode {
            DisplayMode::ShowA => Track::A,
            DisplayMode::ShowB => Track::B,
            DisplayMode::ShowBoth => self.last_interacted,
        }
    }

    /// Record an interaction with a track (edit, focus) for overlay routing.
    pub fn touch(&mut self, track: Track) {
        self.last_interacted = track;
    }

    /// Replace one track's content wholesale.
    ///
    /// Importing into either track never mutates the other, with one seeding
    /// exception: the first import into A, while B is still empty, gives B
    /// matching boundaries with empty text so a translation can be typed in
    /// against A's timing.
    pub fn import(&mut self, track: Track, records: Vec<CueSnapshot>) -> Result<usize, EditError> {
        let count = records.len();
        self.timeline_mut(track).populate(records)?;
        if track == Track::A && self.track_b.is_empty() {
            let seeded: Vec<CueSnapshot> = self
                .track_a
                .cues
                .iter()
                .map(|cue| CueSnapshot::new(cue.start, cue.end, ""))
                .collect();
            // A locked B refuses the seed; that is its owner's call.
            let _ = self.track_b.populate(seeded);
        }
        debug!(?track, count, "imported cues");
        Ok(count)
    }

    /// Zip a flat list of translation lines against A's cue boundaries and
    /// replace B wholesale. Lines beyond A's cue count chain synthesized
    /// timing after the last boundary; A is never touched.
    pub fn map_lines_into_b(&mut self, lines: &[String]) -> Result<usize, EditError> {
        let mut records: Vec<CueSnapshot> = Vec::with_capacity(lines.len());
        for (index, line) in lines.iter().enumerate() {
            let record = match self.track_a.cues.get(index) {
                Some(cue) => CueSnapshot::new(cue.start, cue.end, line.clone()),
                None => {
                    let start = records.last().map(|record| record.end).unwrap_or(0.0);
                    CueSnapshot::new(start, start + DEFAULT_CUE_SECONDS, line.clone())
                }
            };
            records.push(record);
        }
        self.track_b.populate(records)?;
        Ok(lines.len())
    }

    /// Encode a track's current cues in a wire format, shifting all
    /// timestamps by the source-timecode origin when enabled.
    pub fn export(&self, track: Track, format: CodecFormat) -> Result<String, EditError> {
        let timeline = self.timeline(track);
        if timeline.is_empty() {
            return Err(EditError::EmptyTimeline);
        }
        let mut records: Vec<CueSnapshot> = timeline.cues.iter().map(Cue::snapshot).collect();
        if self.source_tc.enabled {
            for record in &mut records {
                record.start += self.source_tc.offset_seconds;
                record.end += self.source_tc.offset_seconds;
            }
        }
        Ok(codec::encode(&records, format))
    }

    /// Format a media-relative time for display, applying the source
    /// timecode origin when enabled.
    pub fn display_timecode(&self, seconds: f64) -> String {
        let offset = if self.source_tc.enabled {
            self.source_tc.offset_seconds
        } else {
            0.0
        };
        format_timecode((seconds + offset).max(0.0), self.fps)
    }

    /// Parse a displayed timecode back to media-relative seconds.
    pub fn parse_display_timecode(&self, text: &str) -> Result<f64, EditError> {
        let base = parse_timecode(text, self.fps)
            .ok_or_else(|| EditError::InvalidTimecode(text.to_string()))?;
        let offset = if self.source_tc.enabled {
            self.source_tc.offset_seconds
        } else {
            0.0
        };
        Ok((base - offset).max(0.0))
    }

    /// Set the source-timecode origin from an `HH:MM:SS:FF` string.
    pub fn set_source_tc(&mut self, text: &str, enabled: bool) -> Result<(), EditError> {
        let seconds = parse_timecode(text, self.fps)
            .ok_or_else(|| EditError::InvalidTimecode(text.to_string()))?;
        self.source_tc = SourceTimecode {
            offset_seconds: seconds,
            enabled,
        };
        Ok(())
    }

    /// Reset for newly loaded media: both tracks emptied and unlocked,
    /// display state kept.
    pub fn reset_for_new_media(&mut self) {
        self.track_a = Timeline::default();
        self.track_b = Timeline::default();
    }

    /// Dispatch an edit command against one track.
    ///
    /// Applies the timeline operation, performs the follow-up effects
    /// (pausing and seeking the player on boundary commits), and returns an
    /// outcome describing what the caller should project: a selection to
    /// move, a highlight hold to install, an auto-scroll window to suppress.
    pub fn apply(
        &mut self,
        track: Track,
        command: EditCommand,
        player: &mut dyn Player,
    ) -> Result<EditOutcome, EditError> {
        let fps = self.fps;
        let duration_frames = self
            .timeline(track)
            .duration_frames(player.duration(), fps);
        let timeline = self.timeline_mut(track);

        let outcome = match command {
            EditCommand::Split { index, caret } => {
                let new_index = timeline.split(index, caret, fps)?;
                EditOutcome {
                    changed: true,
                    select: Some(new_index),
                    hold: Some((new_index, SHORT_HOLD)),
                    suppress_scroll: Some(INSERT_SCROLL_SUPPRESS),
                    ..EditOutcome::default()
                }
            }
            EditCommand::Resize {
                index,
                boundary,
                frame,
            } => {
                let committed = timeline.resize(index, boundary, frame, fps, duration_frames)?;
                if !player.is_paused() {
                    player.pause();
                }
                player.seek(committed);
                EditOutcome {
                    changed: true,
                    seek_to: Some(committed),
                    select: Some(index),
                    ..EditOutcome::default()
                }
            }
            EditCommand::Nudge {
                index,
                boundary,
                delta_frames,
            } => {
                let committed =
                    timeline.nudge(index, boundary, delta_frames, fps, duration_frames)?;
                if !player.is_paused() {
                    player.pause();
                }
                player.seek(committed);
                EditOutcome {
                    changed: true,
                    seek_to: Some(committed),
                    select: Some(index),
                    ..EditOutcome::default()
                }
            }
            EditCommand::Reorder { src, dst, position } => {
                match timeline.reorder(src, dst, position)? {
                    Some(new_index) => EditOutcome {
                        changed: true,
                        select: Some(new_index),
                        suppress_scroll: Some(REORDER_SCROLL_SUPPRESS),
                        ..EditOutcome::default()
                    },
                    None => EditOutcome::default(),
                }
            }
            EditCommand::PushUp { index } => {
                timeline.push_up(index)?;
                EditOutcome {
                    changed: true,
                    ..EditOutcome::default()
                }
            }
            EditCommand::PushDown { index } => {
                timeline.push_down(index)?;
                EditOutcome {
                    changed: true,
                    ..EditOutcome::default()
                }
            }
            EditCommand::AddAfter { index } => {
                let new_index = timeline.add_after(index, fps)?;
                EditOutcome {
                    changed: true,
                    select: Some(new_index),
                    hold: Some((new_index, SHORT_HOLD)),
                    suppress_scroll: Some(INSERT_SCROLL_SUPPRESS),
                    ..EditOutcome::default()
                }
            }
            EditCommand::Delete { index } => {
                timeline.delete(index)?;
                let select = if timeline.is_empty() {
                    None
                } else {
                    Some(index.min(timeline.len() - 1))
                };
                EditOutcome {
                    changed: true,
                    select,
                    ..EditOutcome::default()
                }
            }
            EditCommand::Reset { index } => {
                timeline.reset(index)?;
                EditOutcome {
                    changed: true,
                    select: Some(index),
                    ..EditOutcome::default()
                }
            }
            EditCommand::SetText { index, text } => {
                timeline.set_text(index, text)?;
                EditOutcome {
                    changed: true,
                    ..EditOutcome::default()
                }
            }
            EditCommand::FindReplace {
                pattern,
                replacement,
                case_sensitive,
                whole_word,
            } => {
                let replaced =
                    timeline.find_replace(&pattern, &replacement, case_sensitive, whole_word)?;
                EditOutcome {
                    changed: replaced > 0,
                    replaced,
                    ..EditOutcome::default()
                }
            }
        };

        self.touch(track);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::StubPlayer;
    use crate::state::Boundary;

    fn records(entries: &[(f64, f64, &str)]) -> Vec<CueSnapshot> {
        entries.iter()
            .map(|&(start, end, text)| CueSnapshot::new(start, end, text))
            .collect()
    }

    #[test]
    fn test_first_import_into_a_seeds_empty_b() {
        let mut session = EditorSession::new();
        session
            .import(Track::A, records(&[(0.0, 2.0, "a"), (2.0, 4.0, "b")]))
            .unwrap();
        assert_eq!(session.track_b.len(), 2);
        assert_eq!(session.track_b.cues[0].start, 0.0);
        assert_eq!(session.track_b.cues[0].end, 2.0);
        assert_eq!(session.track_b.cues[0].text, "");
    }

    #[test]
    fn test_reimport_into_a_leaves_b_alone() {
        let mut session = EditorSession::new();
        session.import(Track::A, records(&[(0.0, 2.0, "a")])).unwrap();
        session.track_b.set_text(0, "translated").unwrap();
        session
            .import(Track::A, records(&[(0.0, 1.0, "x"), (1.0, 2.0, "y")]))
            .unwrap();
        assert_eq!(session.track_b.len(), 1);
        assert_eq!(session.track_b.cues[0].text, "translated");
    }

    #[test]
    fn test_import_into_b_never_touches_a() {
        let mut session = EditorSession::new();
        session.import(Track::A, records(&[(0.0, 2.0, "a")])).unwrap();
        let before = session.track_a.clone();
        session
            .import(Track::B, records(&[(5.0, 6.0, "late"), (6.0, 7.0, "later")]))
            .unwrap();
        assert_eq!(session.track_a, before);
    }

    #[test]
    fn test_edits_on_b_never_touch_a() {
        let mut session = EditorSession::new();
        session
            .import(Track::A, records(&[(0.0, 2.0, "a"), (2.0, 4.0, "b")]))
            .unwrap();
        let before = session.track_a.clone();
        let mut player = StubPlayer::default();

        session
            .apply(Track::B, EditCommand::Split { index: 0, caret: 0 }, &mut player)
            .unwrap();
        session
            .apply(
                Track::B,
                EditCommand::Nudge {
                    index: 0,
                    boundary: Boundary::End,
                    delta_frames: -5,
                },
                &mut player,
            )
            .unwrap();
        session
            .apply(Track::B, EditCommand::Delete { index: 1 }, &mut player)
            .unwrap();

        assert_eq!(session.track_a, before);
    }

    #[test]
    fn test_map_lines_zips_against_a_boundaries() {
        let mut session = EditorSession::new();
        session
            .import(Track::A, records(&[(0.0, 2.0, "a"), (2.0, 4.0, "b")]))
            .unwrap();
        session
            .map_lines_into_b(&["uno".into(), "dos".into(), "tres".into(), "cuatro".into()])
            .unwrap();

        assert_eq!(session.track_b.len(), 4);
        assert_eq!(session.track_b.cues[0].snapshot(), CueSnapshot::new(0.0, 2.0, "uno"));
        assert_eq!(session.track_b.cues[1].snapshot(), CueSnapshot::new(2.0, 4.0, "dos"));
        // Past A's cues, timing chains one second at a time.
        assert_eq!(session.track_b.cues[2].snapshot(), CueSnapshot::new(4.0, 5.0, "tres"));
        assert_eq!(session.track_b.cues[3].snapshot(), CueSnapshot::new(5.0, 6.0, "cuatro"));
        assert_eq!(session.track_a.cues[0].text, "a");
    }

    #[test]
    fn test_map_fewer_lines_shrinks_b() {
        let mut session = EditorSession::new();
        session
            .import(Track::A, records(&[(0.0, 2.0, "a"), (2.0, 4.0, "b")]))
            .unwrap();
        session.map_lines_into_b(&["solo".into()]).unwrap();
        assert_eq!(session.track_b.len(), 1);
    }

    #[test]
    fn test_resize_command_pauses_and_seeks_player() {
        let mut session = EditorSession::new();
        session.import(Track::A, records(&[(2.0, 4.0, "a")])).unwrap();
        let mut player = StubPlayer::with_duration(10.0);
        player.play();

        let outcome = session
            .apply(
                Track::A,
                EditCommand::Resize {
                    index: 0,
                    boundary: Boundary::End,
                    frame: 120,
                },
                &mut player,
            )
            .unwrap();

        assert!(player.is_paused());
        assert_eq!(outcome.seek_to, Some(4.8));
        assert_eq!(player.position(), 4.8);
    }

    #[test]
    fn test_overlay_track_follows_display_mode() {
        let mut session = EditorSession::new();
        session.display_mode = DisplayMode::ShowB;
        assert_eq!(session.overlay_track(), Track::B);

        session.display_mode = DisplayMode::ShowBoth;
        session.touch(Track::A);
        assert_eq!(session.overlay_track(), Track::A);
        session.touch(Track::B);
        assert_eq!(session.overlay_track(), Track::B);
    }

    #[test]
    fn test_set_fps_rejects_zero() {
        let mut session = EditorSession::new();
        assert!(matches!(session.set_fps(0), Err(EditError::InvalidFrameRate(0))));
        session.set_fps(30).unwrap();
        assert_eq!(session.fps(), 30);
    }

    #[test]
    fn test_export_applies_source_tc_offset() {
        let mut session = EditorSession::new();
        session.import(Track::A, records(&[(0.0, 1.0, "hello")])).unwrap();
        session.set_source_tc("01:00:00:00", true).unwrap();
        let srt = session.export(Track::A, CodecFormat::Srt).unwrap();
        assert!(srt.contains("01:00:00,000 --> 01:00:01,000"), "{srt}");
    }

    #[test]
    fn test_export_empty_track_rejected() {
        let session = EditorSession::new();
        assert!(matches!(
            session.export(Track::A, CodecFormat::Srt),
            Err(EditError::EmptyTimeline)
        ));
    }

    #[test]
    fn test_display_timecode_round_trip_with_origin() {
        let mut session = EditorSession::new();
        session.set_source_tc("10:51:54:18", true).unwrap();
        let shown = session.display_timecode(12.0);
        let back = session.parse_display_timecode(&shown).unwrap();
        assert_eq!(
            crate::core::frame_clock::seconds_to_frames(back, session.fps()),
            crate::core::frame_clock::seconds_to_frames(12.0, session.fps())
        );
    }

    #[test]
    fn test_locked_track_rejects_import() {
        let mut session = EditorSession::new();
        session.set_locked(Track::A, true);
        assert!(matches!(
            session.import(Track::A, records(&[(0.0, 1.0, "a")])),
            Err(EditError::LockedTrack)
        ));
    }
}
