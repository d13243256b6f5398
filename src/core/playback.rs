//! Active-cue resolution against the playback clock.
//!
//! Each tick resolves, per track, which cue contains the current position,
//! then applies one priority rule: an unexpired manual-selection hold wins
//! over the computed active cue. Holds expire purely by comparing `now` to
//! their stored deadline; there are no timers to cancel.

use std::time::{Duration, Instant};

use crate::state::{EditorSession, Track};

/// Transient override keeping one cue highlighted despite playback-driven
/// highlighting, e.g. right after a split or while a field has focus.
#[derive(Debug, Clone, Copy)]
pub struct ManualHold {
    /// Cue index to keep highlighted.
    pub index: usize,
    /// Deadline after which the hold stops applying.
    pub until: Instant,
}

/// What one track should show for the current tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackView {
    /// Cue containing the playback position, if any.
    pub active: Option<usize>,
    /// Cue to highlight: the held cue while a hold is live, else the
    /// active cue.
    pub highlighted: Option<usize>,
    /// Do not scroll the highlighted cue into view this tick.
    pub suppress_auto_scroll: bool,
}

/// Per-tick projection for both tracks plus the floating overlay text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackView {
    pub track_a: TrackView,
    pub track_b: TrackView,
    /// Trimmed text of the overlay track's active cue.
    pub overlay: Option<String>,
}

impl PlaybackView {
    pub fn track(&self, track: Track) -> &TrackView {
        match track {
            Track::A => &self.track_a,
            Track::B => &self.track_b,
        }
    }
}

/// Resolves highlighting from the position tick, manual holds, and
/// auto-scroll suppression windows.
#[derive(Debug, Default)]
pub struct PlaybackReducer {
    holds: [Option<ManualHold>; 2],
    suppress_until: [Option<Instant>; 2],
}

impl PlaybackReducer {
    /// Force `index` to stay highlighted on `track` until `duration` passes.
    pub fn hold(&mut self, track: Track, index: usize, duration: Duration, now: Instant) {
        self.holds[track as usize] = Some(ManualHold {
            index,
            until: now + duration,
        });
    }

    /// Drop the hold on a track, e.g. when a field loses focus.
    pub fn clear_hold(&mut self, track: Track) {
        self.holds[track as usize] = None;
    }

    /// Keep the view still for a short window after a structural edit.
    pub fn suppress_auto_scroll(&mut self, track: Track, duration: Duration, now: Instant) {
        self.suppress_until[track as usize] = Some(now + duration);
    }

    /// Forget all holds and suppression windows (new import, new media).
    pub fn clear(&mut self) {
        self.holds = [None, None];
        self.suppress_until = [None, None];
    }

    fn track_view(&self, session: &EditorSession, track: Track, t: f64, now: Instant) -> TrackView {
        let active = session.timeline(track).active_index(t);
        let hold = self.holds[track as usize].filter(|hold| now < hold.until);
        match hold {
            Some(hold) => TrackView {
                active,
                highlighted: Some(hold.index),
                suppress_auto_scroll: true,
            },
            None => TrackView {
                active,
                highlighted: active,
                suppress_auto_scroll: self.suppress_until[track as usize]
                    .is_some_and(|until| now < until),
            },
        }
    }

    /// Resolve both tracks and the overlay for the current position.
    pub fn tick(&self, session: &EditorSession, position: f64, now: Instant) -> PlaybackView {
        let track_a = self.track_view(session, Track::A, position, now);
        let track_b = self.track_view(session, Track::B, position, now);

        let overlay_track = session.overlay_track();
        let overlay_view = match overlay_track {
            Track::A => &track_a,
            Track::B => &track_b,
        };
        let overlay = overlay_view.active.map(|index| {
            session.timeline(overlay_track).cues[index]
                .text
                .trim()
                .to_string()
        });

        PlaybackView {
            track_a,
            track_b,
            overlay,
        }
    }
}
