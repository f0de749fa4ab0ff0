// Hook handler for Claude Code PreToolUse and Stop events
//
// Every path through this module ends in a response that lets the tool call
// proceed. Tracking failures are reported through `systemMessage`, never by
// blocking the caller.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::classify::classify;
use crate::common::{current_date, TrackerPaths};
use crate::config::Settings;
use crate::display::{render_classification, render_stats_report};
use crate::error::Result;
use crate::stats::{StatsScope, StatsStore};

/// PreToolUse event as delivered on stdin.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HookInput {
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub tool_input: Value,
}

impl HookInput {
    pub fn tool_name(&self) -> &str {
        self.tool_name.as_deref().unwrap_or("unknown")
    }
}

/// Response printed on stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookResponse {
    #[serde(rename = "continue")]
    pub continue_: bool,
    #[serde(rename = "suppressOutput")]
    pub suppress_output: bool,
    #[serde(rename = "systemMessage", skip_serializing_if = "Option::is_none")]
    pub system_message: Option<String>,
}

impl HookResponse {
    /// Let the tool run, no message.
    pub fn proceed() -> Self {
        HookResponse {
            continue_: true,
            suppress_output: false,
            system_message: None,
        }
    }

    /// Let the tool run, but surface a tracker error.
    pub fn with_error(error: impl fmt::Display) -> Self {
        HookResponse {
            system_message: Some(format!("Tool tracker error: {}", error)),
            ..Self::proceed()
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"continue":true,"suppressOutput":false}"#.to_string()
        })
    }
}

/// What the binary prints: the JSON response plus optional stderr text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookOutcome {
    pub response: HookResponse,
    pub notification: Option<String>,
}

impl HookOutcome {
    fn proceed(notification: Option<String>) -> Self {
        HookOutcome {
            response: HookResponse::proceed(),
            notification,
        }
    }
}

/// Classify one event and, if its category is enabled, record and render it.
pub fn handle_event(input: &HookInput, settings: &Settings, store: &StatsStore) -> HookOutcome {
    let classification = classify(input.tool_name(), &input.tool_input);

    if !settings.is_category_enabled(classification.category) {
        debug!(
            "Skipping {}: category {} disabled",
            classification.detailed_key, classification.category
        );
        return HookOutcome::proceed(None);
    }

    if !store.record(&classification.detailed_key) {
        warn!(
            "Usage of {} was not saved to {}",
            classification.detailed_key,
            store.path().display()
        );
    }

    HookOutcome::proceed(Some(render_classification(settings.theme, &classification)))
}

/// Handle a raw PreToolUse payload.
///
/// # Errors
///
/// Returns an error when the payload is not a JSON object with the expected
/// field types.
pub fn handle_tool_use(raw: &str, paths: &TrackerPaths) -> Result<HookOutcome> {
    let input: HookInput = serde_json::from_str(raw)?;
    let settings = Settings::load(paths);
    let store = StatsStore::new(settings.stats_path(paths));
    Ok(handle_event(&input, &settings, &store))
}

/// Like [`handle_tool_use`], but errors become a non-blocking response.
pub fn run_tool_use_hook(raw: &str, paths: &TrackerPaths) -> HookOutcome {
    handle_tool_use(raw, paths).unwrap_or_else(|e| {
        warn!("PreToolUse hook failed: {}", e);
        HookOutcome {
            response: HookResponse::with_error(e),
            notification: None,
        }
    })
}

/// Handle the Stop hook: show today's summary when `show_stats_on_exit` is set.
pub fn handle_stop(paths: &TrackerPaths) -> HookOutcome {
    let settings = Settings::load(paths);
    if !settings.show_stats_on_exit {
        return HookOutcome::proceed(None);
    }

    let store = StatsStore::new(settings.stats_path(paths));
    let doc = store.load();
    let today = current_date();
    let report = render_stats_report(
        "SESSION STATISTICS",
        doc.counts(&StatsScope::Session(today)),
        "this session",
    );
    HookOutcome::proceed(Some(report))
}
