//! Persistent tool usage statistics.
//!
//! The whole document is a single JSON file that is read, updated and fully
//! rewritten on every recorded event:
//!
//! ```json
//! {
//!   "sessions": {
//!     "2025-06-01": {
//!       "start": "2025-06-01T09:12:44+02:00",
//!       "end": "2025-06-01T17:40:02+02:00",
//!       "tools": { "native:Read": 12, "mcp:context7:get-library-docs": 2 },
//!       "categories": { "native": 12, "mcp": 2, "agent": 0, "skill": 0, "command": 0 }
//!     }
//!   },
//!   "totals": { "tools": { ... }, "categories": { ... } }
//! }
//! ```
//!
//! Sessions are calendar days in local time. There is no file locking; two
//! overlapping hook processes can lose an update (last writer wins).

use crate::classify::{category_of_key, subcategory_of_key, Category};
use crate::common::{current_date, session_id_for, timestamp_for};
use crate::error::Result;
use chrono::{DateTime, Local};
use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Per-category counters. All five buckets are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryCounts {
    pub native: u64,
    pub mcp: u64,
    pub agent: u64,
    pub skill: u64,
    pub command: u64,
}

impl CategoryCounts {
    pub fn get(&self, category: Category) -> u64 {
        match category {
            Category::Native => self.native,
            Category::Mcp => self.mcp,
            Category::Agent => self.agent,
            Category::Skill => self.skill,
            Category::Command => self.command,
        }
    }

    fn slot(&mut self, category: Category) -> &mut u64 {
        match category {
            Category::Native => &mut self.native,
            Category::Mcp => &mut self.mcp,
            Category::Agent => &mut self.agent,
            Category::Skill => &mut self.skill,
            Category::Command => &mut self.command,
        }
    }

    pub fn increment(&mut self, category: Category) {
        *self.slot(category) += 1;
    }

    pub fn total(&self) -> u64 {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }

    /// Largest single bucket.
    pub fn max(&self) -> u64 {
        Category::ALL.iter().map(|c| self.get(*c)).max().unwrap_or(0)
    }
}

/// One day of usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub tools: IndexMap<String, u64>,
    #[serde(default)]
    pub categories: CategoryCounts,
}

impl SessionStats {
    fn started_at(now: &DateTime<Local>) -> Self {
        SessionStats {
            start: timestamp_for(now),
            end: None,
            tools: IndexMap::new(),
            categories: CategoryCounts::default(),
        }
    }
}

/// All-time usage across every session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Totals {
    pub tools: IndexMap<String, u64>,
    pub categories: CategoryCounts,
}

/// Read access shared by sessions and totals.
pub trait UsageCounts {
    fn tools(&self) -> &IndexMap<String, u64>;
    fn categories(&self) -> &CategoryCounts;

    fn total_calls(&self) -> u64 {
        self.categories().total()
    }
}

impl UsageCounts for SessionStats {
    fn tools(&self) -> &IndexMap<String, u64> {
        &self.tools
    }

    fn categories(&self) -> &CategoryCounts {
        &self.categories
    }
}

impl UsageCounts for Totals {
    fn tools(&self) -> &IndexMap<String, u64> {
        &self.tools
    }

    fn categories(&self) -> &CategoryCounts {
        &self.categories
    }
}

/// Which counters a query reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsScope {
    /// A single day, by session id (`YYYY-MM-DD`)
    Session(String),
    AllTime,
}

impl StatsScope {
    /// The session for the current local date.
    pub fn today() -> Self {
        StatsScope::Session(current_date())
    }
}

/// The complete statistics document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsDocument {
    pub sessions: IndexMap<String, SessionStats>,
    pub totals: Totals,
}

impl StatsDocument {
    /// Count one use of `detailed_key` at `now`.
    pub fn record(&mut self, detailed_key: &str, now: &DateTime<Local>) {
        let category = category_of_key(detailed_key);
        let session_id = session_id_for(now);

        let session = self
            .sessions
            .entry(session_id)
            .or_insert_with(|| SessionStats::started_at(now));
        *session.tools.entry(detailed_key.to_string()).or_insert(0) += 1;
        session.categories.increment(category);
        session.end = Some(timestamp_for(now));

        *self.totals.tools.entry(detailed_key.to_string()).or_insert(0) += 1;
        self.totals.categories.increment(category);
    }

    pub fn session(&self, session_id: &str) -> Option<&SessionStats> {
        self.sessions.get(session_id)
    }

    /// Counters for a scope; `None` for a session that has no bucket.
    pub fn counts(&self, scope: &StatsScope) -> Option<&dyn UsageCounts> {
        match scope {
            StatsScope::Session(id) => self.session(id).map(|s| s as &dyn UsageCounts),
            StatsScope::AllTime => Some(&self.totals as &dyn UsageCounts),
        }
    }

    /// The `n` most used tools in a scope.
    pub fn top_n(&self, n: usize, scope: &StatsScope) -> Vec<(String, u64)> {
        self.counts(scope)
            .map(|counts| top_tools(counts.tools(), n))
            .unwrap_or_default()
    }

    /// Remove a session bucket. Totals are left alone.
    pub fn clear_session(&mut self, session_id: &str) -> bool {
        self.sessions.shift_remove(session_id).is_some()
    }
}

/// Highest counts first; equal counts keep their first-seen order.
pub fn top_tools(tools: &IndexMap<String, u64>, n: usize) -> Vec<(String, u64)> {
    let mut entries: Vec<(String, u64)> = tools.iter().map(|(k, v)| (k.clone(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(n);
    entries
}

/// Group a tools map by category, then by subcategory (server, agent, tool).
pub fn breakdown(tools: &IndexMap<String, u64>) -> IndexMap<Category, IndexMap<String, u64>> {
    let mut grouped: IndexMap<Category, IndexMap<String, u64>> =
        Category::ALL.iter().map(|c| (*c, IndexMap::new())).collect();

    for (key, count) in tools {
        let by_sub = grouped.entry(category_of_key(key)).or_default();
        *by_sub.entry(subcategory_of_key(key)).or_insert(0) += count;
    }

    grouped
}

/// File-backed access to the statistics document.
#[derive(Debug, Clone)]
pub struct StatsStore {
    path: PathBuf,
}

impl StatsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document. A missing file is an empty document; a corrupt one
    /// is backed up next to the original and replaced by an empty document.
    pub fn load(&self) -> StatsDocument {
        if !self.path.exists() {
            return StatsDocument::default();
        }

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read stats file {}: {}", self.path.display(), e);
                return StatsDocument::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Failed to parse stats file: {}. Starting fresh.", e);
                let backup_path = self.path.with_extension("backup");
                match fs::copy(&self.path, &backup_path) {
                    Ok(_) => warn!("Backed up corrupted stats to: {}", backup_path.display()),
                    Err(e) => warn!("Failed to backup corrupted stats file: {}", e),
                }
                StatsDocument::default()
            }
        }
    }

    /// Overwrite the file with `doc`.
    pub fn save(&self, doc: &StatsDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write to temp file first (atomic operation)
        let temp_path = self.path.with_extension("tmp");
        let file = File::create(&temp_path)?;
        serde_json::to_writer_pretty(file, doc)?;

        fs::rename(temp_path, &self.path)?;
        Ok(())
    }

    fn save_logged(&self, doc: &StatsDocument) -> bool {
        match self.save(doc) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to write stats file {}: {}", self.path.display(), e);
                false
            }
        }
    }

    /// Record one use now. Returns `false` if the document could not be saved.
    pub fn record(&self, detailed_key: &str) -> bool {
        self.record_at(detailed_key, &Local::now())
    }

    pub fn record_at(&self, detailed_key: &str, now: &DateTime<Local>) -> bool {
        let mut doc = self.load();
        doc.record(detailed_key, now);
        self.save_logged(&doc)
    }

    pub fn top_n(&self, n: usize, scope: &StatsScope) -> Vec<(String, u64)> {
        self.load().top_n(n, scope)
    }

    /// Remove a session (today's by default) and persist.
    ///
    /// Returns `true` only if the session existed and the file was rewritten.
    pub fn clear(&self, session_id: Option<&str>) -> bool {
        let session_id = session_id.map_or_else(current_date, String::from);
        let mut doc = self.load();
        if !doc.clear_session(&session_id) {
            return false;
        }
        self.save_logged(&doc)
    }
}
