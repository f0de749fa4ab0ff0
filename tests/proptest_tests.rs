//! Property-based tests using proptest
//!
//! Classification must never panic and must always produce a key in its
//! category's namespace; recording must keep the category and tool counters
//! in step.

use chrono::{Local, TimeZone};
use proptest::prelude::*;
use serde_json::json;
use tool_tracker::classify::{category_of_key, classify, Category};
use tool_tracker::stats::{StatsDocument, UsageCounts};

// Mix of sentinel names, MCP-shaped names and arbitrary text
fn arbitrary_tool_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Task".to_string()),
        Just("Skill".to_string()),
        Just("SlashCommand".to_string()),
        prop::string::string_regex("mcp__[a-z0-9_-]{0,12}(__[a-z0-9_-]{0,12})?").unwrap(),
        prop::string::string_regex("[A-Za-z:_ -]{0,24}").unwrap(),
    ]
}

fn arbitrary_tool_input() -> impl Strategy<Value = serde_json::Value> {
    (
        prop::option::of("[a-zA-Z0-9/-]{0,16}"),
        prop::option::of(any::<i64>()),
    )
        .prop_map(|(text, number)| {
            let mut obj = json!({});
            if let Some(text) = text {
                obj["subagent_type"] = json!(text.clone());
                obj["skill"] = json!(text.clone());
                obj["command"] = json!(text);
            }
            if let Some(number) = number {
                obj["description"] = json!(number);
            }
            obj
        })
}

proptest! {
    #[test]
    fn test_classify_key_matches_category(
        name in arbitrary_tool_name(),
        input in arbitrary_tool_input()
    ) {
        let c = classify(&name, &input);

        prop_assert!(Category::ALL.contains(&c.category));
        let prefix = format!("{}:", c.category.key_prefix());
        prop_assert!(c.detailed_key.starts_with(&prefix));
        prop_assert_eq!(category_of_key(&c.detailed_key), c.category);
        prop_assert!(!c.primary.is_empty() || c.category == Category::Native);
    }
}

proptest! {
    #[test]
    fn test_record_k_times_adds_k(
        name in arbitrary_tool_name(),
        k in 1usize..20
    ) {
        let now = Local.with_ymd_and_hms(2025, 5, 20, 14, 0, 0).unwrap();
        let key = classify(&name, &json!({})).detailed_key;
        let category = category_of_key(&key);

        let mut doc = StatsDocument::default();
        doc.record("native:Warmup", &now);
        let before_tool = doc.totals.tools.get(&key).copied().unwrap_or(0);
        let before_category = doc.totals.categories.get(category);

        for _ in 0..k {
            doc.record(&key, &now);
        }

        let session = doc.session("2025-05-20").unwrap();
        prop_assert_eq!(doc.totals.tools[&key], before_tool + k as u64);
        prop_assert_eq!(doc.totals.categories.get(category), before_category + k as u64);
        prop_assert_eq!(session.tools[&key], before_tool + k as u64);
    }
}

proptest! {
    #[test]
    fn test_counters_stay_consistent(
        events in prop::collection::vec((arbitrary_tool_name(), 1u32..28), 0..40)
    ) {
        let mut doc = StatsDocument::default();
        for (name, day) in &events {
            let now = Local.with_ymd_and_hms(2025, 2, *day, 12, 0, 0).unwrap();
            doc.record(&classify(name, &json!({})).detailed_key, &now);

            let tool_sum: u64 = doc.totals.tools.values().sum();
            prop_assert_eq!(doc.totals.categories().total(), tool_sum);
        }

        for session in doc.sessions.values() {
            let tool_sum: u64 = session.tools.values().sum();
            prop_assert_eq!(session.categories.total(), tool_sum);
        }

        let session_sum: u64 = doc.sessions.values().map(|s| s.total_calls()).sum();
        prop_assert_eq!(session_sum, events.len() as u64);
        prop_assert_eq!(doc.totals.total_calls(), events.len() as u64);
    }
}
