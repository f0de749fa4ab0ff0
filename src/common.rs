//! Common utilities shared across modules.
//!
//! Path resolution for the settings and statistics files, plus the clock
//! helpers used to stamp sessions.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Name of the settings file, both globally and per project.
pub const SETTINGS_FILENAME: &str = "claude-tool-tracker.local.md";

/// Directory (under `.claude/`) that holds the statistics file.
pub const STATS_DIR_NAME: &str = "claude-tool-tracker";

/// Statistics file name.
pub const STATS_FILENAME: &str = "stats.json";

/// Filesystem locations used by a single invocation.
///
/// Built once in `main` and passed to everything that touches disk, so tests
/// can point the whole tracker at a temporary directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerPaths {
    /// User-level `.claude` directory (`~/.claude`)
    pub global_dir: PathBuf,
    /// Project-level `.claude` directory (`<cwd>/.claude`)
    pub project_dir: PathBuf,
}

impl TrackerPaths {
    /// Create paths rooted at an explicit home and project directory.
    pub fn new(home: impl AsRef<Path>, project: impl AsRef<Path>) -> Self {
        Self {
            global_dir: home.as_ref().join(".claude"),
            project_dir: project.as_ref().join(".claude"),
        }
    }

    /// Resolve paths from the current user's home and the working directory.
    pub fn from_env() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home)
        });
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(home, cwd)
    }

    pub fn global_settings(&self) -> PathBuf {
        self.global_dir.join(SETTINGS_FILENAME)
    }

    pub fn local_settings(&self) -> PathBuf {
        self.project_dir.join(SETTINGS_FILENAME)
    }

    /// Project settings file, only if it exists.
    pub fn existing_local_settings(&self) -> Option<PathBuf> {
        let path = self.local_settings();
        path.exists().then_some(path)
    }

    pub fn global_stats(&self) -> PathBuf {
        self.global_dir.join(STATS_DIR_NAME).join(STATS_FILENAME)
    }

    pub fn local_stats(&self) -> PathBuf {
        self.project_dir.join(STATS_DIR_NAME).join(STATS_FILENAME)
    }
}

/// RFC 3339 timestamp used for session `start` and `end`.
pub fn timestamp_for(now: &DateTime<Local>) -> String {
    now.to_rfc3339()
}

/// Gets the current date in YYYY-MM-DD format.
///
/// ```rust
/// use tool_tracker::common::current_date;
///
/// assert_eq!(current_date().len(), 10);
/// ```
pub fn current_date() -> String {
    session_id_for(&Local::now())
}

/// Session identifier (local calendar date) for a point in time.
pub fn session_id_for(now: &DateTime<Local>) -> String {
    now.format("%Y-%m-%d").to_string()
}
