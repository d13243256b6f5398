use std::fs;
use std::io;
use std::path::Path;

use crate::error::EditError;

use super::EditorSession;

impl EditorSession {
    // =========================================================================
    // Save/Load
    // =========================================================================

    /// Save the session to its folder.
    pub fn save(&self) -> Result<(), EditError> {
        let path = self.session_path.as_ref().ok_or_else(|| {
            EditError::Io(io::Error::new(io::ErrorKind::NotFound, "Session path not set"))
        })?;
        self.save_to(path)
    }

    /// Save the session to a specific folder as `session.json`.
    pub fn save_to(&self, folder: &Path) -> Result<(), EditError> {
        fs::create_dir_all(folder)?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(folder.join("session.json"), json)?;
        Ok(())
    }

    /// Load a session from a folder. Transient editing state (drags, holds,
    /// pending text) is not persisted and starts empty.
    pub fn load(folder: &Path) -> Result<Self, EditError> {
        let json = fs::read_to_string(folder.join("session.json"))?;
        let mut session: EditorSession = serde_json::from_str(&json)?;
        session.session_path = Some(folder.to_path_buf());
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecFormat;
    use crate::state::{CueSnapshot, DisplayMode, Track};

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = EditorSession::new();
        session
            .import(
                Track::A,
                vec![
                    CueSnapshot::new(0.0, 2.0, "one"),
                    CueSnapshot::new(2.0, 4.0, "two"),
                ],
            )
            .unwrap();
        session.track_a.set_text(0, "edited").unwrap();
        session.set_fps(30).unwrap();
        session.set_locked(Track::B, true);
        session.display_mode = DisplayMode::ShowBoth;

        session.save_to(dir.path()).unwrap();
        let loaded = EditorSession::load(dir.path()).unwrap();

        assert_eq!(loaded.track_a, session.track_a);
        assert_eq!(loaded.track_b, session.track_b);
        assert_eq!(loaded.fps(), 30);
        assert!(loaded.track_b.locked);
        assert_eq!(loaded.display_mode, DisplayMode::ShowBoth);
        assert_eq!(loaded.session_path.as_deref(), Some(dir.path()));
        // Pristine snapshot survives, so reset still works after a reload.
        let mut loaded = loaded;
        loaded.track_a.reset(0).unwrap();
        assert_eq!(loaded.track_a.cues[0].text, "one");
        // And the reloaded session still exports.
        assert!(loaded.export(Track::A, CodecFormat::Srt).is_ok());
    }

    #[test]
    fn test_save_without_path_fails() {
        let session = EditorSession::new();
        assert!(matches!(session.save(), Err(EditError::Io(_))));
    }
}
