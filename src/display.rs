//! Display formatting module.
//!
//! Pure functions that turn a classified tool call, or a set of counters, into
//! terminal text. Nothing here touches disk or the environment.

use crate::classify::{Category, Classification};
use crate::stats::{breakdown, UsageCounts};
use crate::theme::{colorful_palette, emoji_for, minimal_color, report_style, Colors, Theme};

const BOX_WIDTH: usize = 47;
const REPORT_WIDTH: usize = 50;
const BAR_WIDTH: usize = 15;
const SUBCATEGORY_LIMIT: usize = 5;
const SUBCATEGORY_NAME_WIDTH: usize = 20;

/// Render a tool notification in the given theme.
///
/// `category` is looked up in the theme's table; unknown names use the
/// table's default entry. Empty `secondary`/`extra` are treated as absent.
pub fn render(
    theme: Theme,
    category: &str,
    primary: &str,
    secondary: Option<&str>,
    extra: Option<&str>,
) -> String {
    let secondary = secondary.filter(|s| !s.is_empty());
    let extra = extra.filter(|s| !s.is_empty());
    match theme {
        Theme::Colorful => render_colorful(category, primary, secondary, extra),
        Theme::Minimal => render_minimal(category, primary, secondary),
        Theme::Emoji => render_emoji(category, primary, secondary),
    }
}

/// Render a classification result.
pub fn render_classification(theme: Theme, classification: &Classification) -> String {
    render(
        theme,
        classification.category.as_str(),
        &classification.primary,
        classification.secondary.as_deref(),
        classification.extra.as_deref(),
    )
}

fn render_colorful(
    category: &str,
    primary: &str,
    secondary: Option<&str>,
    extra: Option<&str>,
) -> String {
    let (color, bg_color) = colorful_palette(category);
    let label = category.to_uppercase();
    let rule = "─".repeat(BOX_WIDTH);
    let (bold, dim, reset, white) = (Colors::BOLD, Colors::DIM, Colors::RESET, Colors::WHITE);

    let mut lines = vec![format!("{bold}{color}┌{rule}┐{reset}")];

    let badge = format!("{bold}{color}│{reset} {bg_color}{bold}{white} {label} {reset} {color}{primary}{reset}");
    match secondary {
        Some(secondary) => lines.push(format!("{badge} {dim}→{reset} {bold}{secondary}{reset}")),
        None => lines.push(badge),
    }

    if let Some(extra) = extra {
        lines.push(format!("{bold}{color}│{reset} {dim}{extra}{reset}"));
    }

    lines.push(format!("{bold}{color}└{rule}┘{reset}"));
    lines.join("\n")
}

fn render_minimal(category: &str, primary: &str, secondary: Option<&str>) -> String {
    let color = minimal_color(category);
    let label: String = category.chars().take(3).collect::<String>().to_uppercase();
    match secondary {
        Some(secondary) => format!("{color}[{label}]{} {primary} → {secondary}", Colors::RESET),
        None => format!("{color}[{label}]{} {primary}", Colors::RESET),
    }
}

fn render_emoji(category: &str, primary: &str, secondary: Option<&str>) -> String {
    let emoji = emoji_for(category);
    match secondary {
        Some(secondary) => format!("{emoji} {primary} → {secondary}"),
        None => format!("{emoji} {primary}"),
    }
}

/// Render a usage summary with a bar per category and its top subcategories.
///
/// `empty_scope` completes "No tool usage recorded yet for …" when there is
/// nothing to show.
pub fn render_stats_report(title: &str, counts: Option<&dyn UsageCounts>, empty_scope: &str) -> String {
    let total = counts.map_or(0, |c| c.total_calls());
    let Some(counts) = counts.filter(|_| total > 0) else {
        return format!("No tool usage recorded yet for {}.", empty_scope);
    };

    let categories = counts.categories();
    let grouped = breakdown(counts.tools());
    let max_count = categories.max().max(1);
    let header = format!("{}{}{}{}", Colors::BOLD, Colors::CYAN, "=".repeat(REPORT_WIDTH), Colors::RESET);

    let mut lines = vec![
        header.clone(),
        format!("{}{}  {}{}", Colors::BOLD, Colors::CYAN, title, Colors::RESET),
        header.clone(),
        String::new(),
    ];

    for category in Category::ALL {
        let count = categories.get(category);
        if count == 0 {
            continue;
        }

        let (label, color) = report_style(category.as_str());
        let bar_len = (count as f64 / max_count as f64 * BAR_WIDTH as f64) as usize;
        let bar = "█".repeat(bar_len);
        let percentage = count as f64 / total as f64 * 100.0;
        lines.push(format!(
            "  {color}{label:15}{reset} {count:4} {color}{bar}{reset} ({percentage:.1}%)",
            reset = Colors::RESET
        ));

        if let Some(subcategories) = grouped.get(&category) {
            let mut sorted: Vec<(&String, &u64)> = subcategories.iter().collect();
            sorted.sort_by(|a, b| b.1.cmp(a.1));
            for (name, sub_count) in sorted.into_iter().take(SUBCATEGORY_LIMIT) {
                let name: String = name.chars().take(SUBCATEGORY_NAME_WIDTH).collect();
                lines.push(format!(
                    "    {}└─ {:width$} ({}){}",
                    Colors::DIM,
                    name,
                    sub_count,
                    Colors::RESET,
                    width = SUBCATEGORY_NAME_WIDTH
                ));
            }
        }

        lines.push(String::new());
    }

    lines.push(format!("{}  Total: {} tool calls{}", Colors::BOLD, total, Colors::RESET));
    lines.push(header);

    lines.join("\n")
}

/// Numbered "top tools" list.
pub fn render_top_tools(top: &[(String, u64)]) -> String {
    top.iter()
        .enumerate()
        .map(|(i, (key, count))| format!("  {:>2}. {} ({})", i + 1, key, count))
        .collect::<Vec<_>>()
        .join("\n")
}
