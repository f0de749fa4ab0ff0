//! Settings loading and saving.
//!
//! Settings live in the YAML-style frontmatter of a markdown file, once per
//! user (`~/.claude/claude-tool-tracker.local.md`) and optionally once per
//! project (`<cwd>/.claude/claude-tool-tracker.local.md`):
//!
//! ```text
//! ---
//! theme: minimal
//! stats_location: global
//! enabled_categories:
//!   - mcp
//!   - agent
//! show_stats_on_exit: true
//! ---
//! ```
//!
//! Layers merge as defaults, then global, then local. A missing or malformed
//! file contributes nothing.

use crate::classify::Category;
use crate::common::TrackerPaths;
use crate::error::{Result, TrackerError};
use crate::theme::Theme;
use log::{debug, warn};
use regex::Regex;
use std::collections::BTreeSet;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

/// Environment variable that overrides the configured theme.
pub const THEME_ENV: &str = "TOOL_TRACKER_THEME";

/// Where the statistics file is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsLocation {
    #[default]
    Global,
    Local,
}

impl StatsLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatsLocation::Global => "global",
            StatsLocation::Local => "local",
        }
    }
}

impl fmt::Display for StatsLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatsLocation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(StatsLocation::Global),
            "local" => Ok(StatsLocation::Local),
            other => Err(format!("unknown stats location '{}'", other)),
        }
    }
}

/// Effective tracker settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Notification theme
    pub theme: Theme,

    /// Global (`~/.claude`) or project-local statistics file
    pub stats_location: StatsLocation,

    /// Categories that are recorded and displayed
    pub enabled_categories: BTreeSet<Category>,

    /// Print the session summary from the Stop hook
    pub show_stats_on_exit: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            theme: Theme::default(),
            stats_location: StatsLocation::default(),
            enabled_categories: Category::ALL.into_iter().collect(),
            show_stats_on_exit: false,
        }
    }
}

/// Values found in one settings file. `None` means "not set here".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsLayer {
    pub theme: Option<Theme>,
    pub stats_location: Option<StatsLocation>,
    pub enabled_categories: Option<BTreeSet<Category>>,
    pub show_stats_on_exit: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
enum RawValue {
    Bool(bool),
    Text(String),
    List(Vec<String>),
}

fn frontmatter_regex() -> &'static Regex {
    static FRONTMATTER: OnceLock<Regex> = OnceLock::new();
    FRONTMATTER.get_or_init(|| {
        Regex::new(r"(?s)\A---[ \t]*\r?\n(?:(.*?)\r?\n)?---").expect("frontmatter regex is valid")
    })
}

impl SettingsLayer {
    /// Read a settings file. Unreadable or missing files yield an empty layer.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                debug!("Ignoring unreadable settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse the frontmatter block of a settings file.
    pub fn parse(content: &str) -> Self {
        let mut layer = Self::default();
        let Some(block) = frontmatter_regex()
            .captures(content)
            .map(|caps| caps.get(1).map_or("", |m| m.as_str()))
        else {
            return layer;
        };

        let mut list_key: Option<String> = None;
        let mut list_items: Vec<String> = Vec::new();

        for line in block.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(item) = line.strip_prefix("- ") {
                if list_key.is_some() {
                    list_items.push(item.trim().to_string());
                }
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };

            if let Some(key) = list_key.take() {
                if !list_items.is_empty() {
                    layer.apply(&key, RawValue::List(std::mem::take(&mut list_items)));
                }
            }
            list_items.clear();

            let key = key.trim();
            let value = value.trim();
            if value.is_empty() {
                list_key = Some(key.to_string());
            } else if let Some(inline) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
                let items = inline
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
                layer.apply(key, RawValue::List(items));
            } else if value.eq_ignore_ascii_case("true") {
                layer.apply(key, RawValue::Bool(true));
            } else if value.eq_ignore_ascii_case("false") {
                layer.apply(key, RawValue::Bool(false));
            } else {
                layer.apply(key, RawValue::Text(value.to_string()));
            }
        }

        if let Some(key) = list_key {
            if !list_items.is_empty() {
                layer.apply(&key, RawValue::List(list_items));
            }
        }

        layer
    }

    fn apply(&mut self, key: &str, value: RawValue) {
        match (key, value) {
            ("theme", RawValue::Text(v)) => self.theme = v.parse().ok(),
            ("stats_location", RawValue::Text(v)) => self.stats_location = v.parse().ok(),
            ("enabled_categories", RawValue::List(items)) => {
                let categories = items
                    .iter()
                    .filter_map(|item| match item.parse::<Category>() {
                        Ok(category) => Some(category),
                        Err(e) => {
                            debug!("Skipping enabled_categories entry: {}", e);
                            None
                        }
                    })
                    .collect();
                self.enabled_categories = Some(categories);
            }
            ("show_stats_on_exit", RawValue::Bool(v)) => self.show_stats_on_exit = Some(v),
            (key, value) => debug!("Ignoring settings key {}: {:?}", key, value),
        }
    }
}

impl Settings {
    /// Load settings for this invocation: defaults, global file, project file,
    /// then the `TOOL_TRACKER_THEME` override.
    pub fn load(paths: &TrackerPaths) -> Self {
        let global = paths.global_settings();
        let local = paths.existing_local_settings();
        let mut settings = Self::load_layers(Some(&global), local.as_deref());

        if let Ok(theme) = env::var(THEME_ENV) {
            match theme.parse() {
                Ok(theme) => settings.theme = theme,
                Err(e) => warn!("Ignoring {}: {}", THEME_ENV, e),
            }
        }

        settings
    }

    /// Merge defaults with the given files, later files winning.
    pub fn load_layers(global: Option<&Path>, local: Option<&Path>) -> Self {
        let mut settings = Settings::default();
        for path in [global, local].into_iter().flatten() {
            settings.merge(SettingsLayer::load(path));
        }
        settings
    }

    /// Override every field the layer sets.
    pub fn merge(&mut self, layer: SettingsLayer) {
        if let Some(theme) = layer.theme {
            self.theme = theme;
        }
        if let Some(location) = layer.stats_location {
            self.stats_location = location;
        }
        if let Some(categories) = layer.enabled_categories {
            self.enabled_categories = categories;
        }
        if let Some(show) = layer.show_stats_on_exit {
            self.show_stats_on_exit = show;
        }
    }

    pub fn is_category_enabled(&self, category: Category) -> bool {
        self.enabled_categories.contains(&category)
    }

    /// Statistics file selected by `stats_location`.
    pub fn stats_path(&self, paths: &TrackerPaths) -> PathBuf {
        match self.stats_location {
            StatsLocation::Global => paths.global_stats(),
            StatsLocation::Local => paths.local_stats(),
        }
    }

    /// Render the settings as a complete settings file.
    pub fn to_frontmatter(&self) -> String {
        SettingsLayer::from(self).to_frontmatter()
    }

    /// Save settings to file
    pub fn save(&self, path: &Path) -> Result<()> {
        write_settings_file(path, &self.to_frontmatter())
    }
}

impl From<&Settings> for SettingsLayer {
    fn from(settings: &Settings) -> Self {
        SettingsLayer {
            theme: Some(settings.theme),
            stats_location: Some(settings.stats_location),
            enabled_categories: Some(settings.enabled_categories.clone()),
            show_stats_on_exit: Some(settings.show_stats_on_exit),
        }
    }
}

impl SettingsLayer {
    /// Render a settings file holding only the keys this layer sets.
    pub fn to_frontmatter(&self) -> String {
        let mut lines = vec!["---".to_string()];

        if let Some(theme) = self.theme {
            lines.push(format!("theme: {}", theme));
        }
        if let Some(location) = self.stats_location {
            lines.push(format!("stats_location: {}", location));
        }
        match &self.enabled_categories {
            Some(categories) if categories.is_empty() => {
                lines.push("enabled_categories: []".to_string());
            }
            Some(categories) => {
                lines.push("enabled_categories:".to_string());
                for category in categories {
                    lines.push(format!("  - {}", category));
                }
            }
            None => {}
        }
        if let Some(show) = self.show_stats_on_exit {
            lines.push(format!("show_stats_on_exit: {}", show));
        }

        lines.push("---".to_string());
        lines.push(String::new());
        lines.push("# Claude Tool Tracker Configuration".to_string());
        lines.push(String::new());
        lines.push("This file contains settings for the claude-tool-tracker plugin.".to_string());
        lines.push("Edit the YAML frontmatter above to customize behavior.".to_string());
        lines.push(String::new());

        lines.join("\n")
    }

    /// Save only the keys this layer sets; unset keys fall through to lower layers.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_settings_file(path, &self.to_frontmatter())
    }
}

fn write_settings_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            TrackerError::config(format!("Failed to create config directory: {}", e))
        })?;
    }

    fs::write(path, content)
        .map_err(|e| TrackerError::config(format!("Failed to write config file: {}", e)))?;

    Ok(())
}
