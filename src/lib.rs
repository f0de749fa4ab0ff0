//! # Claude Tool Tracker Library
//!
//! Classifies Claude Code tool calls, shows a themed notification for each one
//! and keeps per-day and all-time usage counters in a JSON file.
//!
//! ## Features
//!
//! - **Classification**: native tools, MCP servers, agents, skills and slash commands
//! - **Stats Tracking**: per-day sessions plus all-time totals, keyed by detailed tool name
//! - **Configuration**: markdown frontmatter settings, global with per-project overrides
//! - **Themes**: colorful, minimal and emoji notifications
//! - **Never blocks**: every failure still lets the tool call proceed
//!
//! ## Quick Start
//!
//! ```rust
//! use tool_tracker::classify::{classify, Category};
//!
//! let c = classify("mcp__context7__get-library-docs", &serde_json::json!({}));
//! assert_eq!(c.category, Category::Mcp);
//! assert_eq!(c.detailed_key, "mcp:context7:get-library-docs");
//! ```

pub mod classify;
pub mod common;
/// Settings loading and saving
pub mod config;
pub mod display;
pub mod error;
pub mod hook_handler;
pub mod stats;
pub mod theme;

pub use classify::{classify, Category, Classification};
pub use common::TrackerPaths;
pub use config::Settings;
pub use error::{Result, TrackerError};
pub use hook_handler::{run_tool_use_hook, HookInput, HookOutcome, HookResponse};
pub use stats::{StatsDocument, StatsScope, StatsStore};
pub use theme::Theme;
