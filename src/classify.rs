//! Tool invocation classification.
//!
//! Maps a raw hook `tool_name` (plus its input) to one of five categories and
//! a stable, colon-delimited detailed key used as the statistics key:
//!
//! ```text
//! mcp__context7__get-library-docs  ->  mcp:context7:get-library-docs
//! Task {subagent_type: Explore}    ->  agent:Explore
//! Skill {skill: pdf}               ->  skill:pdf
//! SlashCommand {command: /commit}  ->  cmd:/commit
//! Read                             ->  native:Read
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

const MCP_PREFIX: &str = "mcp__";
const MCP_SEPARATOR: &str = "__";
const AGENT_TOOL: &str = "Task";
const SKILL_TOOL: &str = "Skill";
const COMMAND_TOOL: &str = "SlashCommand";

/// Top-level classification bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Native,
    Mcp,
    Agent,
    Skill,
    Command,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 5] = [
        Category::Native,
        Category::Mcp,
        Category::Agent,
        Category::Skill,
        Category::Command,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Native => "native",
            Category::Mcp => "mcp",
            Category::Agent => "agent",
            Category::Skill => "skill",
            Category::Command => "command",
        }
    }

    /// First segment of every detailed key in this category.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            Category::Command => "cmd",
            other => other.as_str(),
        }
    }

    fn from_key_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "native" => Some(Category::Native),
            "mcp" => Some(Category::Mcp),
            "agent" => Some(Category::Agent),
            "skill" => Some(Category::Skill),
            "cmd" => Some(Category::Command),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" => Ok(Category::Native),
            "mcp" => Ok(Category::Mcp),
            "agent" => Ok(Category::Agent),
            "skill" => Ok(Category::Skill),
            "command" | "cmd" => Ok(Category::Command),
            other => Err(format!("unknown category '{}'", other)),
        }
    }
}

/// Result of classifying one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    pub primary: String,
    pub secondary: Option<String>,
    pub extra: Option<String>,
    pub detailed_key: String,
}

impl Classification {
    fn new(category: Category, primary: String, secondary: Option<String>, extra: Option<String>) -> Self {
        let detailed_key = match &secondary {
            Some(detail) => format!("{}:{}:{}", category.key_prefix(), primary, detail),
            None => format!("{}:{}", category.key_prefix(), primary),
        };
        Self {
            category,
            primary,
            secondary,
            extra,
            detailed_key,
        }
    }
}

/// Classify a tool invocation. Never fails; unknown names are `native`.
pub fn classify(tool_name: &str, tool_input: &Value) -> Classification {
    if let Some(rest) = tool_name.strip_prefix(MCP_PREFIX) {
        let (server, tool) = match rest.split_once(MCP_SEPARATOR) {
            Some((server, tool)) => (server, tool),
            None => (rest, ""),
        };
        return Classification::new(
            Category::Mcp,
            or_unknown(server),
            Some(or_unknown(tool)),
            None,
        );
    }

    match tool_name {
        AGENT_TOOL => {
            let subagent = input_str(tool_input, "subagent_type").unwrap_or("general");
            let extra = input_str(tool_input, "description").map(|d| format!("Task: {}", d));
            Classification::new(Category::Agent, subagent.to_string(), None, extra)
        }
        SKILL_TOOL => {
            let skill = input_str(tool_input, "skill").unwrap_or("unknown");
            Classification::new(Category::Skill, skill.to_string(), None, None)
        }
        COMMAND_TOOL => {
            let command = input_str(tool_input, "command").unwrap_or("unknown");
            Classification::new(Category::Command, command.to_string(), None, None)
        }
        _ => Classification::new(Category::Native, tool_name.to_string(), None, None),
    }
}

/// Derive the category of a stored statistics key.
///
/// Understands detailed keys (`mcp:server:tool`) as well as the raw tool names
/// written by older releases (`mcp__server__tool`, `Task`, `Read`).
pub fn category_of_key(key: &str) -> Category {
    if key.starts_with(MCP_PREFIX) {
        return Category::Mcp;
    }
    match key {
        AGENT_TOOL => return Category::Agent,
        SKILL_TOOL => return Category::Skill,
        COMMAND_TOOL => return Category::Command,
        _ => {}
    }
    key.split_once(':')
        .and_then(|(prefix, _)| Category::from_key_prefix(prefix))
        .unwrap_or(Category::Native)
}

/// Subcategory (second segment) of a stored statistics key.
pub fn subcategory_of_key(key: &str) -> String {
    if let Some(rest) = key.strip_prefix(MCP_PREFIX) {
        let server = rest.split(MCP_SEPARATOR).next().unwrap_or_default();
        return or_unknown(server);
    }
    let mut parts = key.splitn(3, ':');
    match (parts.next(), parts.next()) {
        (Some(prefix), Some(sub)) if Category::from_key_prefix(prefix).is_some() => sub.to_string(),
        _ => key.to_string(),
    }
}

fn input_str<'a>(tool_input: &'a Value, field: &str) -> Option<&'a str> {
    tool_input
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn or_unknown(segment: &str) -> String {
    if segment.is_empty() {
        "unknown".to_string()
    } else {
        segment.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mcp_tool() {
        let c = classify("mcp__context7__get-library-docs", &json!({}));
        assert_eq!(c.category, Category::Mcp);
        assert_eq!(c.primary, "context7");
        assert_eq!(c.secondary.as_deref(), Some("get-library-docs"));
        assert_eq!(c.extra, None);
        assert_eq!(c.detailed_key, "mcp:context7:get-library-docs");
    }

    #[test]
    fn test_mcp_tool_splits_on_first_separator() {
        let c = classify("mcp__plugin__browser__navigate", &json!({}));
        assert_eq!(c.primary, "plugin");
        assert_eq!(c.secondary.as_deref(), Some("browser__navigate"));
    }

    #[test]
    fn test_mcp_without_tool_segment() {
        let c = classify("mcp__playwright", &json!({}));
        assert_eq!(c.primary, "playwright");
        assert_eq!(c.secondary.as_deref(), Some("unknown"));
        assert_eq!(c.detailed_key, "mcp:playwright:unknown");

        let c = classify("mcp__", &json!({}));
        assert_eq!(c.detailed_key, "mcp:unknown:unknown");
    }

    #[test]
    fn test_agent_tool() {
        let c = classify(
            "Task",
            &json!({"subagent_type": "code-reviewer", "description": "Review diff"}),
        );
        assert_eq!(c.category, Category::Agent);
        assert_eq!(c.primary, "code-reviewer");
        assert_eq!(c.extra.as_deref(), Some("Task: Review diff"));
        assert_eq!(c.detailed_key, "agent:code-reviewer");

        let c = classify("Task", &json!({}));
        assert_eq!(c.primary, "general");
        assert_eq!(c.extra, None);
    }

    #[test]
    fn test_skill_and_command() {
        let c = classify("Skill", &json!({"skill": "pdf"}));
        assert_eq!(c.category, Category::Skill);
        assert_eq!(c.detailed_key, "skill:pdf");

        let c = classify("Skill", &json!({"skill": 42}));
        assert_eq!(c.detailed_key, "skill:unknown");

        let c = classify("SlashCommand", &json!({"command": "/commit"}));
        assert_eq!(c.category, Category::Command);
        assert_eq!(c.detailed_key, "cmd:/commit");

        let c = classify("SlashCommand", &Value::Null);
        assert_eq!(c.detailed_key, "cmd:unknown");
    }

    #[test]
    fn test_native_fallback() {
        let c = classify("Read", &json!({"file_path": "/tmp/x"}));
        assert_eq!(c.category, Category::Native);
        assert_eq!(c.primary, "Read");
        assert_eq!(c.detailed_key, "native:Read");

        // Case matters for the sentinels
        assert_eq!(classify("task", &json!({})).category, Category::Native);
    }

    #[test]
    fn test_category_of_key() {
        assert_eq!(category_of_key("mcp:context7:docs"), Category::Mcp);
        assert_eq!(category_of_key("agent:Explore"), Category::Agent);
        assert_eq!(category_of_key("skill:pdf"), Category::Skill);
        assert_eq!(category_of_key("cmd:/commit"), Category::Command);
        assert_eq!(category_of_key("native:Read"), Category::Native);
        assert_eq!(category_of_key("Read"), Category::Native);
        assert_eq!(category_of_key("bogus:thing"), Category::Native);
        // Legacy raw names
        assert_eq!(category_of_key("mcp__github__search"), Category::Mcp);
        assert_eq!(category_of_key("Task"), Category::Agent);
        assert_eq!(category_of_key("SlashCommand"), Category::Command);
    }

    #[test]
    fn test_subcategory_of_key() {
        assert_eq!(subcategory_of_key("mcp:context7:docs"), "context7");
        assert_eq!(subcategory_of_key("native:Read"), "Read");
        assert_eq!(subcategory_of_key("mcp__github__search"), "github");
        assert_eq!(subcategory_of_key("Write"), "Write");
    }

    #[test]
    fn test_category_parse_and_serde() {
        assert_eq!("cmd".parse::<Category>().unwrap(), Category::Command);
        assert_eq!(" MCP ".parse::<Category>().unwrap(), Category::Mcp);
        assert!("plugin".parse::<Category>().is_err());
        assert_eq!(serde_json::to_string(&Category::Agent).unwrap(), "\"agent\"");
    }
}
