//! Command-line arguments
//!
//! Global options come first, then one subcommand.

use crate::core::logging::{LogFormat, LogSettings};
use crate::plugin::api::DiagramKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "quickmd")]
#[command(about = "Markdown editor shell with a hook-driven plugin core")]
#[command(version, long_version = crate::core::version::long_version())]
pub struct Args {
    /// Plugin settings file (defaults to <config dir>/QuickMD/plugins.toml)
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(
        short = 'l',
        long = "log-level",
        value_name = "LEVEL",
        default_value = "warn",
        global = true,
        value_parser = ["trace", "debug", "info", "warn", "error", "off"]
    )]
    pub log_level: String,

    /// Log output format
    #[arg(
        short = 'o',
        long = "log-format",
        value_name = "FORMAT",
        value_enum,
        default_value_t = LogFormat::Text,
        global = true
    )]
    pub log_format: LogFormat,

    /// Write log output to this file instead of stderr
    #[arg(short = 'f', long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Inspect and toggle plugins
    Plugins {
        #[command(subcommand)]
        action: PluginsAction,
    },
    /// Print word, character and line counts for a document
    Stats {
        /// Markdown file
        file: PathBuf,

        /// Print the counts as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render a document to HTML through the preview pipeline
    Preview {
        /// Markdown file
        file: PathBuf,

        /// Write HTML here instead of stdout
        #[arg(short = 'O', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,

        /// How long to wait for plugins that load in the background
        #[arg(long = "wait-ms", value_name = "MS", default_value_t = 5000)]
        wait_ms: u64,
    },
    /// Insert a diagram template into a document
    InsertDiagram {
        /// Markdown file
        file: PathBuf,

        /// Template to insert
        #[arg(value_parser = parse_diagram_kind)]
        kind: DiagramKind,

        /// Character offset to insert at (defaults to the end)
        #[arg(long = "at", value_name = "OFFSET")]
        at: Option<usize>,

        /// Save the result back to FILE instead of printing it
        #[arg(short = 'w', long = "write")]
        write: bool,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum PluginsAction {
    /// List builtin plugins with their state
    List,
    /// Enable a plugin and save the setting
    Enable { name: String },
    /// Disable a plugin and save the setting
    Disable { name: String },
}

fn parse_diagram_kind(value: &str) -> Result<DiagramKind, String> {
    value.parse::<DiagramKind>().map_err(|_| {
        format!("unknown diagram kind '{value}' (expected flowchart, sequence or class)")
    })
}

impl Args {
    /// Logging options for `init_logging`
    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            level: self.log_level.clone(),
            format: self.log_format,
            file: self.log_file.clone(),
            color: self.use_color(),
        }
    }

    /// Colors unless disabled or stderr is not a terminal
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::IsTerminal::is_terminal(&std::io::stderr())
    }

    /// Settings file from the command line or the default location
    pub fn settings_path(&self) -> Option<PathBuf> {
        self.config
            .clone()
            .or_else(crate::plugin::api::PluginSettings::default_path)
    }
}
