pub mod check;
pub mod simulate;

use std::path::Path;

use kn_app::GameConfig;

/// Read a config file, prefixing errors with its path.
fn read_config(path: &Path) -> Result<GameConfig, String> {
    GameConfig::from_file(path).map_err(|e| format!("{}: {e}", path.display()))
}
