//! State file: a JSON snapshot of every session and the player registry.

use std::fs;
use std::path::{Path, PathBuf};

use kn_simulation::SessionState;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppResult;
use crate::player::Player;
use crate::token::Token;

/// A live player together with its token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// The player's token.
    pub token: Token,
    /// The player.
    pub player: Player,
}

/// Everything needed to resume a game after a restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// One entry per map.
    pub sessions: Vec<SessionState>,
    /// Live players and their tokens.
    pub players: Vec<PlayerRecord>,
    /// Last player id issued.
    pub last_player_id: u64,
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `state` to `path`.
///
/// The snapshot goes to a temporary file next to `path` first and is then
/// renamed over it, so a crash never leaves a half-written state file.
pub fn save_state(path: &Path, state: &AppState) -> AppResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let tmp = temp_path(path);
    let json = serde_json::to_vec(state)?;
    let written = fs::write(&tmp, json).and_then(|()| fs::rename(&tmp, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    info!(path = %path.display(), players = state.players.len(), "state saved");
    Ok(())
}

/// Read a snapshot. A missing file is not an error and yields `None`.
pub fn load_state(path: &Path) -> AppResult<Option<AppState>> {
    if !path.exists() {
        info!(path = %path.display(), "state file doesn't exist, skipping load");
        return Ok(None);
    }
    let bytes = fs::read(path)?;
    Ok(Some(serde_json::from_slice(&bytes)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn empty_state() -> AppState {
        AppState {
            sessions: Vec::new(),
            players: Vec::new(),
            last_player_id: 4,
        }
    }

    #[test]
    fn missing_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_state(&dir.path().join("state.json")).unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");
        save_state(&path, &empty_state()).unwrap();

        assert_eq!(load_state(&path).unwrap(), Some(empty_state()));
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn save_replaces_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "old contents").unwrap();

        save_state(&path, &empty_state()).unwrap();
        assert_eq!(load_state(&path).unwrap().unwrap().last_player_id, 4);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_state(&path), Err(AppError::Json(_))));
    }

    #[test]
    fn temp_file_sits_next_to_target() {
        let path = Path::new("/var/lib/kennel/state.json");
        assert_eq!(temp_path(path), Path::new("/var/lib/kennel/state.json.tmp"));
    }
}
