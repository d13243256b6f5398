use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::DEFAULT_CUE_SECONDS;
use crate::core::frame_clock::{frames_to_seconds, seconds_to_frames};
use crate::error::EditError;

use super::{Cue, CueSnapshot};

/// Which edge of a cue a resize or nudge addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Boundary {
    /// The in point.
    Start,
    /// The out point.
    End,
}

/// Where a reordered cue lands relative to the drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertPosition {
    Before,
    After,
}

/// Ordered cue list for one track.
///
/// The timeline exclusively owns its cues and enforces the editing
/// invariants: every cue keeps at least one frame of duration at the active
/// rate, and every mutating operation is refused while the track is locked.
/// Boundary math runs in frame space and converts back to seconds on commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// Live cues, in display order.
    pub cues: Vec<Cue>,
    /// Cue list as imported or generated, kept verbatim for reset.
    /// Write-once per populate; indexed by `Cue::source_index`.
    pristine: Vec<CueSnapshot>,
    /// When set, every mutating operation returns `EditError::LockedTrack`.
    pub locked: bool,
}

impl Timeline {
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// The pristine records captured at the last populate.
    pub fn pristine(&self) -> &[CueSnapshot] {
        &self.pristine
    }

    fn check_unlocked(&self) -> Result<(), EditError> {
        if self.locked {
            Err(EditError::LockedTrack)
        } else {
            Ok(())
        }
    }

    fn check_index(&self, index: usize) -> Result<(), EditError> {
        if index < self.cues.len() {
            Ok(())
        } else {
            Err(EditError::IndexOutOfRange(index))
        }
    }

    /// Replace the whole timeline with freshly imported records.
    ///
    /// This is the only way content enters a track (imports, job results)
    /// and it is atomic: the cue list and the pristine snapshot swap
    /// together, never observed half-updated. Each live cue points back to
    /// its pristine position for reset.
    pub fn populate(&mut self, records: Vec<CueSnapshot>) -> Result<(), EditError> {
        self.check_unlocked()?;
        debug!(count = records.len(), "populating timeline");
        self.cues = records
            .iter()
            .enumerate()
            .map(|(index, record)| Cue::from_pristine(record, index))
            .collect();
        self.pristine = records;
        Ok(())
    }

    /// First cue whose interval contains `t` (inclusive on both ends).
    pub fn active_index(&self, t: f64) -> Option<usize> {
        self.cues.iter().position(|cue| cue.contains(t))
    }

    /// Timeline extent in frames: the media duration when known, otherwise
    /// the end of the last cue.
    pub fn duration_frames(&self, media_duration: Option<f64>, fps: u32) -> i64 {
        let seconds = media_duration
            .filter(|d| d.is_finite())
            .unwrap_or_else(|| self.cues.last().map(|cue| cue.end).unwrap_or(0.0));
        seconds_to_frames(seconds, fps)
    }

    /// Commit edited text into a cue.
    pub fn set_text(&mut self, index: usize, text: impl Into<String>) -> Result<(), EditError> {
        self.check_unlocked()?;
        self.check_index(index)?;
        self.cues[index].text = text.into();
        Ok(())
    }

    /// Split the cue at a caret offset (in characters) into two cues.
    ///
    /// The left cue keeps its start and gets the right-trimmed text before
    /// the caret; its end moves to the frame midpoint (at least one frame
    /// past the start). The new right cue runs from the midpoint to the next
    /// cue's start, or to the original end when there is no next cue, bumped
    /// one frame if it would collapse. The new cue has no pristine linkage.
    ///
    /// Returns the index of the new cue.
    pub fn split(&mut self, index: usize, caret: usize, fps: u32) -> Result<usize, EditError> {
        self.check_unlocked()?;
        self.check_index(index)?;
        let fps = fps.max(1);

        let (orig_start, orig_end, full) = {
            let cue = &self.cues[index];
            (cue.start, cue.end, cue.text.clone())
        };
        let caret_byte = full
            .char_indices()
            .nth(caret)
            .map(|(byte, _)| byte)
            .unwrap_or(full.len());
        let left = full[..caret_byte].trim_end().to_string();
        let right = full[caret_byte..].trim_start().to_string();

        let start_frame = seconds_to_frames(orig_start, fps);
        let end_frame = seconds_to_frames(orig_end, fps);
        let mut mid_frame = (start_frame + end_frame) / 2;
        if mid_frame <= start_frame {
            mid_frame = start_frame + 1;
        }
        let mid = frames_to_seconds(mid_frame, fps);

        let next_start = self.cues.get(index + 1).map(|next| next.start);

        let cue = &mut self.cues[index];
        cue.text = left;
        cue.end = mid;

        let new_start = mid;
        let mut new_end = next_start.unwrap_or(orig_end);
        if new_end <= new_start {
            new_end = new_start + 1.0 / fps as f64;
        }

        self.cues.insert(index + 1, Cue::new(new_start, new_end, right));
        Ok(index + 1)
    }

    /// Allowed frame range for a boundary, before cross-boundary separation.
    pub fn allowed_range_frames(
        &self,
        index: usize,
        boundary: Boundary,
        duration_frames: i64,
        fps: u32,
    ) -> (i64, i64) {
        let cue = &self.cues[index];
        let start_frame = seconds_to_frames(cue.start, fps);
        let end_frame = seconds_to_frames(cue.end, fps);
        match boundary {
            Boundary::Start => (0, (end_frame - 1).max(0)),
            Boundary::End => (start_frame + 1, duration_frames.max(start_frame + 1)),
        }
    }

    /// Move one boundary of a cue to a requested frame.
    ///
    /// The request is clamped into the allowed range and then pushed one
    /// frame away from the opposite boundary, so a cue can never collapse
    /// below one frame of duration. Returns the committed boundary in
    /// seconds so the caller can seek the player there.
    pub fn resize(
        &mut self,
        index: usize,
        boundary: Boundary,
        requested_frame: i64,
        fps: u32,
        duration_frames: i64,
    ) -> Result<f64, EditError> {
        self.check_unlocked()?;
        self.check_index(index)?;
        let fps = fps.max(1);

        let (min_frame, max_frame) =
            self.allowed_range_frames(index, boundary, duration_frames, fps);
        let mut frame = requested_frame.clamp(min_frame, max_frame.max(min_frame));

        let cue = &mut self.cues[index];
        let committed = match boundary {
            Boundary::Start => {
                let end_frame = seconds_to_frames(cue.end, fps);
                if frame >= end_frame {
                    frame = end_frame - 1;
                }
                cue.start = frames_to_seconds(frame, fps);
                cue.start
            }
            Boundary::End => {
                let start_frame = seconds_to_frames(cue.start, fps);
                if frame <= start_frame {
                    frame = start_frame + 1;
                }
                cue.end = frames_to_seconds(frame, fps);
                cue.end
            }
        };
        Ok(committed)
    }

    /// Resize relative to the current boundary position.
    pub fn nudge(
        &mut self,
        index: usize,
        boundary: Boundary,
        delta_frames: i64,
        fps: u32,
        duration_frames: i64,
    ) -> Result<f64, EditError> {
        self.check_unlocked()?;
        self.check_index(index)?;
        let cue = &self.cues[index];
        let current = match boundary {
            Boundary::Start => seconds_to_frames(cue.start, fps),
            Boundary::End => seconds_to_frames(cue.end, fps),
        };
        self.resize(index, boundary, current + delta_frames, fps, duration_frames)
    }

    /// Move a cue to a new position relative to a drop target.
    ///
    /// Pure permutation: the cue set is unchanged, only the order moves.
    /// Returns the cue's new index, or `None` for a no-op (src == dst or
    /// out-of-range indices). Pending text edits must be flushed into the
    /// model before calling this.
    pub fn reorder(
        &mut self,
        src: usize,
        dst: usize,
        position: InsertPosition,
    ) -> Result<Option<usize>, EditError> {
        self.check_unlocked()?;
        if src == dst || src >= self.cues.len() || dst >= self.cues.len() {
            return Ok(None);
        }
        let cue = self.cues.remove(src);
        let mut new_index = dst + usize::from(position == InsertPosition::After);
        if src < new_index {
            new_index -= 1;
        }
        self.cues.insert(new_index, cue);
        Ok(Some(new_index))
    }

    /// Cascade text upward: from `index` on, each cue takes the text of the
    /// cue after it, and the last cue is cleared. Timing never moves.
    pub fn push_up(&mut self, index: usize) -> Result<(), EditError> {
        self.check_unlocked()?;
        self.check_index(index)?;
        let last = self.cues.len() - 1;
        for i in index..last {
            self.cues[i].text = self.cues[i + 1].text.clone();
        }
        self.cues[last].text.clear();
        Ok(())
    }

    /// Cascade text downward: from the end back to `index + 1`, each cue
    /// takes the text of the cue before it, and the cue at `index` is
    /// cleared. Timing never moves.
    pub fn push_down(&mut self, index: usize) -> Result<(), EditError> {
        self.check_unlocked()?;
        self.check_index(index)?;
        for i in ((index + 1)..self.cues.len()).rev() {
            self.cues[i].text = self.cues[i - 1].text.clone();
        }
        self.cues[index].text.clear();
        Ok(())
    }

    /// Insert an empty cue after an existing one.
    ///
    /// The new cue starts where its predecessor ends and nominally runs one
    /// second; if that would overlap the next cue it is pulled back to one
    /// frame before the next start, floored at one frame of duration.
    /// Returns the new cue's index.
    pub fn add_after(&mut self, index: usize, fps: u32) -> Result<usize, EditError> {
        self.check_unlocked()?;
        self.check_index(index)?;
        let fps = fps.max(1);
        let frame = 1.0 / fps as f64;

        let start = self.cues[index].end;
        let mut end = start + DEFAULT_CUE_SECONDS;
        if let Some(next) = self.cues.get(index + 1) {
            if end >= next.start {
                end = (next.start - frame).max(start + frame);
            }
        }
        if end < start {
            end = start + frame;
        }

        self.cues.insert(index + 1, Cue::new(start, end, ""));
        Ok(index + 1)
    }

    /// Remove a cue. Other cues' pristine pointers are untouched: they
    /// reference positions in the pristine list, not live positions.
    pub fn delete(&mut self, index: usize) -> Result<(), EditError> {
        self.check_unlocked()?;
        self.check_index(index)?;
        self.cues.remove(index);
        Ok(())
    }

    /// Restore a cue to its original state.
    ///
    /// Prefers the pristine entry at the cue's `source_index`, then the
    /// cue's own creation snapshot. A cue with neither only has its text
    /// cleared; its timing stays as edited.
    pub fn reset(&mut self, index: usize) -> Result<(), EditError> {
        self.check_unlocked()?;
        self.check_index(index)?;
        let cue = &mut self.cues[index];
        let record = cue
            .source_index
            .and_then(|source| self.pristine.get(source))
            .cloned()
            .or_else(|| cue.origin.clone());
        match record {
            Some(record) => {
                cue.start = record.start;
                cue.end = record.end;
                cue.text = record.text;
            }
            None => cue.text.clear(),
        }
        Ok(())
    }

    /// Replace every match of `pattern` across all cue texts in one pass.
    ///
    /// The pattern is taken literally (regex-escaped), optionally wrapped in
    /// word boundaries, and matched case-insensitively unless asked
    /// otherwise. Returns the number of replacements made.
    pub fn find_replace(
        &mut self,
        pattern: &str,
        replacement: &str,
        case_sensitive: bool,
        whole_word: bool,
    ) -> Result<usize, EditError> {
        self.check_unlocked()?;
        if self.cues.is_empty() {
            return Err(EditError::EmptyTimeline);
        }
        if pattern.is_empty() {
            return Ok(0);
        }

        let escaped = regex::escape(pattern);
        let body = if whole_word {
            format!(r"\b{}\b", escaped)
        } else {
            escaped
        };
        let full = if case_sensitive {
            body
        } else {
            format!("(?i){}", body)
        };
        let re = Regex::new(&full).map_err(|err| EditError::InvalidPattern(err.to_string()))?;

        let mut count = 0;
        for cue in &mut self.cues {
            let matches = re.find_iter(&cue.text).count();
            if matches > 0 {
                cue.text = re.replace_all(&cue.text, replacement).into_owned();
                count += matches;
            }
        }
        debug!(count, pattern, "find/replace");
        Ok(count)
    }
}
