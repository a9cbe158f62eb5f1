//! CLI display utilities for formatting output

use crate::plugin::api::{DocumentStats, PluginSummary};
use prettytable::{format, Cell, Row, Table};

const HEADER_STYLE: &str = "bFy";
const ACTIVE_STYLE: &str = "Fg";
const INACTIVE_STYLE: &str = "Fr";

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn cell(text: &str, style: &str, use_color: bool) -> Cell {
    let cell = Cell::new(text);
    if use_color {
        cell.style_spec(style)
    } else {
        cell
    }
}

/// Build the plugin listing table
pub fn plugin_table(summaries: &[PluginSummary], use_color: bool) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);
    table.set_titles(Row::new(
        ["Plugin", "Version", "Capabilities", "Enabled", "Active", "Description"]
            .iter()
            .map(|title| cell(title, HEADER_STYLE, use_color))
            .collect(),
    ));

    for summary in summaries {
        let state_style = if summary.active {
            ACTIVE_STYLE
        } else {
            INACTIVE_STYLE
        };
        table.add_row(Row::new(vec![
            Cell::new(&summary.info.name),
            Cell::new(&summary.info.version),
            Cell::new(&summary.capabilities.to_string()),
            Cell::new(yes_no(summary.enabled)),
            cell(yes_no(summary.active), state_style, use_color),
            Cell::new(&summary.info.description),
        ]));
    }
    table
}

/// Print the plugin listing to stdout
pub fn display_plugin_table(summaries: &[PluginSummary], use_color: bool) {
    if summaries.is_empty() {
        eprintln!("No plugins available.");
        return;
    }

    let table = plugin_table(summaries, use_color);
    if use_color {
        if let Err(e) = table.print_tty(true) {
            log::debug!("Colored table output failed: {}", e);
            print!("{}", table);
        }
    } else {
        print!("{}", table);
    }
}

/// Document counts as plain text or JSON
pub fn format_stats(stats: &DocumentStats, json: bool) -> Result<String, serde_json::Error> {
    if json {
        serde_json::to_string_pretty(stats)
    } else {
        Ok(format!(
            "words: {}\ncharacters: {}\nlines: {}",
            stats.words, stats.characters, stats.lines
        ))
    }
}
