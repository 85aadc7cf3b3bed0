//! Periodic state saving driven by game time.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::application::Application;
use crate::error::AppResult;
use crate::snapshot::save_state;

/// Saves the application state every `period` of game time.
///
/// Time is accumulated from the ticks it is fed; once it reaches the period
/// the state is written and the accumulator starts over from zero.
#[derive(Debug, Clone)]
pub struct AutoSaver {
    path: PathBuf,
    period: Duration,
    accumulated: Duration,
}

impl AutoSaver {
    /// Save to `path` every `period` of game time.
    pub fn new(path: impl Into<PathBuf>, period: Duration) -> Self {
        Self {
            path: path.into(),
            period,
            accumulated: Duration::ZERO,
        }
    }

    /// Target state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save interval.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Account for a tick of `delta`. Returns `true` if the state was saved.
    pub fn on_tick(&mut self, delta: Duration, app: &Application) -> AppResult<bool> {
        self.accumulated += delta;
        if self.accumulated < self.period {
            return Ok(false);
        }
        debug!(elapsed_ms = self.accumulated.as_millis() as u64, "save period reached");
        self.accumulated = Duration::ZERO;
        self.save_now(app)?;
        Ok(true)
    }

    /// Write the state immediately without touching the accumulator.
    pub fn save_now(&self, app: &Application) -> AppResult<()> {
        save_state(&self.path, &app.export_state())
    }
}
