//! Notification themes.
//!
//! Each theme has a fixed per-category lookup table. Lookups are keyed by the
//! category name so that anything unrecognised falls back to the table's
//! default entry instead of failing.
//!
//! ```text
//!   colorful  boxed banner, foreground + background colour per category
//!   minimal   one line, `[MCP] server → tool`
//!   emoji     one line, emoji prefix
//! ```

use std::fmt;
use std::str::FromStr;

/// ANSI escape sequences used by the themes.
pub struct Colors;

impl Colors {
    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const DIM: &'static str = "\x1b[2m";

    pub const GREEN: &'static str = "\x1b[32m";
    pub const YELLOW: &'static str = "\x1b[33m";
    pub const BLUE: &'static str = "\x1b[34m";
    pub const MAGENTA: &'static str = "\x1b[35m";
    pub const CYAN: &'static str = "\x1b[36m";
    pub const WHITE: &'static str = "\x1b[37m";
    pub const GRAY: &'static str = "\x1b[90m";

    pub const BG_GREEN: &'static str = "\x1b[42m";
    pub const BG_YELLOW: &'static str = "\x1b[43m";
    pub const BG_BLUE: &'static str = "\x1b[44m";
    pub const BG_MAGENTA: &'static str = "\x1b[45m";
    pub const BG_CYAN: &'static str = "\x1b[46m";
}

/// Named visual style for tool notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Colorful,
    Minimal,
    Emoji,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Colorful, Theme::Minimal, Theme::Emoji];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Colorful => "colorful",
            Theme::Minimal => "minimal",
            Theme::Emoji => "emoji",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "colorful" => Ok(Theme::Colorful),
            "minimal" => Ok(Theme::Minimal),
            "emoji" => Ok(Theme::Emoji),
            other => Err(format!(
                "unknown theme '{}' (expected colorful, minimal or emoji)",
                other
            )),
        }
    }
}

/// Foreground and badge background for the colorful theme.
pub fn colorful_palette(category: &str) -> (&'static str, &'static str) {
    match category {
        "mcp" => (Colors::CYAN, Colors::BG_CYAN),
        "agent" => (Colors::MAGENTA, Colors::BG_MAGENTA),
        "skill" => (Colors::YELLOW, Colors::BG_YELLOW),
        "command" => (Colors::GREEN, Colors::BG_GREEN),
        _ => (Colors::BLUE, Colors::BG_BLUE),
    }
}

/// Tag colour for the minimal theme.
pub fn minimal_color(category: &str) -> &'static str {
    match category {
        "mcp" => Colors::CYAN,
        "agent" => Colors::MAGENTA,
        "skill" => Colors::YELLOW,
        "command" => Colors::GREEN,
        _ => Colors::GRAY,
    }
}

pub fn emoji_for(category: &str) -> &'static str {
    match category {
        "mcp" => "\u{1F310}",     // globe
        "agent" => "\u{1F916}",   // robot
        "skill" => "\u{26A1}",    // lightning
        "command" => "\u{1F4DD}", // memo
        _ => "\u{1F527}",         // wrench
    }
}

/// Row label and colour for the statistics report.
pub fn report_style(category: &str) -> (&'static str, &'static str) {
    match category {
        "mcp" => ("MCP Servers", Colors::CYAN),
        "agent" => ("Agents", Colors::MAGENTA),
        "skill" => ("Skills", Colors::YELLOW),
        "command" => ("Commands", Colors::GREEN),
        _ => ("Native Tools", Colors::BLUE),
    }
}
