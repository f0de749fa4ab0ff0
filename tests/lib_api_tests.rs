//! Tests for the public library API
//!
//! Exercises the classification, settings and statistics APIs the way an
//! embedding program would use them.


use chrono::{Local, TimeZone};
use serde_json::json;
use serial_test::serial;
use std::fs;
use tempfile::TempDir;
use tool_tracker::config::THEME_ENV;
use tool_tracker::stats::{breakdown, UsageCounts};
use tool_tracker::{
    classify, run_tool_use_hook, Category, Settings, StatsDocument, StatsScope, StatsStore, Theme,
    TrackerPaths,
};

#[test]
fn test_end_to_end_mcp_example() {
    let temp_dir = TempDir::new().unwrap();
    let paths = TrackerPaths::new(temp_dir.path().join("home"), temp_dir.path().join("project"));

    let c = classify("mcp__context7__get-library-docs", &json!({}));
    assert_eq!(c.category, Category::Mcp);
    assert_eq!(c.primary, "context7");
    assert_eq!(c.secondary.as_deref(), Some("get-library-docs"));
    assert_eq!(c.extra, None);
    assert_eq!(c.detailed_key, "mcp:context7:get-library-docs");

    let outcome = run_tool_use_hook(
        r#"{"tool_name":"mcp__context7__get-library-docs","tool_input":{}}"#,
        &paths,
    );
    assert!(outcome.response.continue_);
    assert!(outcome.response.system_message.is_none());

    let doc = StatsStore::new(paths.global_stats()).load();
    assert_eq!(doc.totals.categories.mcp, 1);
    assert_eq!(doc.totals.tools["mcp:context7:get-library-docs"], 1);
}

#[test]
fn test_top_n_from_documented_example() {
    let now = Local.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
    let mut doc = StatsDocument::default();
    for (key, count) in [("native:A", 5), ("native:B", 5), ("native:C", 2), ("native:D", 1)] {
        for _ in 0..count {
            doc.record(key, &now);
        }
    }

    let top = doc.top_n(3, &StatsScope::Session("2025-01-15".to_string()));
    let keys: Vec<&str> = top.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["native:A", "native:B", "native:C"]);
    assert!(!keys.contains(&"native:D"));
}

#[test]
fn test_breakdown_of_totals() {
    let now = Local.with_ymd_and_hms(2025, 1, 16, 9, 0, 0).unwrap();
    let mut doc = StatsDocument::default();
    doc.record("mcp:github:search_code", &now);
    doc.record("mcp:github:get_file", &now);
    doc.record("agent:code-reviewer", &now);

    let grouped = breakdown(doc.totals.tools());
    assert_eq!(grouped[&Category::Mcp]["github"], 2);
    assert_eq!(grouped[&Category::Agent]["code-reviewer"], 1);
    assert_eq!(doc.totals.total_calls(), 3);
}

#[test]
fn test_clear_keeps_other_sessions_and_totals() {
    let temp_dir = TempDir::new().unwrap();
    let store = StatsStore::new(temp_dir.path().join("stats.json"));
    let day1 = Local.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap();
    let day2 = Local.with_ymd_and_hms(2025, 2, 2, 10, 0, 0).unwrap();

    assert!(store.record_at("skill:pdf", &day1));
    assert!(store.record_at("skill:pdf", &day2));

    assert!(store.clear(Some("2025-02-01")));
    let doc = store.load();
    assert_eq!(doc.sessions.len(), 1);
    assert!(doc.session("2025-02-02").is_some());
    assert_eq!(doc.totals.tools["skill:pdf"], 2);

    assert!(!store.clear(Some("2025-02-01")));
}

#[test]
#[serial]
fn test_paths_from_env_use_home() {
    let _guard = test_support::init();
    let paths = TrackerPaths::from_env();
    assert_eq!(paths.global_dir, test_support::get_test_home().join(".claude"));
    assert_eq!(
        paths.global_settings().file_name().unwrap(),
        "claude-tool-tracker.local.md"
    );
}

#[test]
#[serial]
fn test_theme_env_override() {
    let _guard = test_support::init();
    let paths = TrackerPaths::new(test_support::get_test_home(), test_support::get_test_project());
    fs::create_dir_all(&paths.global_dir).unwrap();
    fs::write(paths.global_settings(), "---\ntheme: minimal\n---\n").unwrap();

    assert_eq!(Settings::load(&paths).theme, Theme::Minimal);

    std::env::set_var(THEME_ENV, "emoji");
    assert_eq!(Settings::load(&paths).theme, Theme::Emoji);

    std::env::set_var(THEME_ENV, "not-a-theme");
    assert_eq!(Settings::load(&paths).theme, Theme::Minimal);

    std::env::remove_var(THEME_ENV);
    fs::remove_file(paths.global_settings()).unwrap();
}
