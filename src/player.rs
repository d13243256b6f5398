//! The media player collaborator.
//!
//! The editor core never decodes media: it reads the clock and duration
//! from, and issues seeks to, whatever playback engine hosts it. The player
//! is the sole seek authority and the exclusive owner of position/duration.

/// Playback surface the editor core drives.
pub trait Player {
    /// Current playback position in seconds.
    fn position(&self) -> f64;
    /// Media duration in seconds, if known yet.
    fn duration(&self) -> Option<f64>;
    /// Request a seek to an absolute position.
    fn seek(&mut self, seconds: f64);
    fn play(&mut self);
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
}

/// In-memory player used by tests and headless tooling.
#[derive(Debug, Clone, Default)]
pub struct StubPlayer {
    position: f64,
    duration: Option<f64>,
    paused: bool,
    /// Every seek requested, oldest first.
    pub seeks: Vec<f64>,
}

impl StubPlayer {
    pub fn with_duration(duration: f64) -> Self {
        Self {
            duration: Some(duration),
            paused: true,
            ..Self::default()
        }
    }

    /// Advance the clock as a playing media element would.
    pub fn tick(&mut self, delta_seconds: f64) {
        if !self.paused {
            self.position += delta_seconds;
        }
    }
}

impl Player for StubPlayer {
    fn position(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn seek(&mut self, seconds: f64) {
        self.position = seconds.max(0.0);
        self.seeks.push(self.position);
    }

    fn play(&mut self) {
        self.paused = false;
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}
