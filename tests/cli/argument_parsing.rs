//! CLI argument parsing tests

use clap::Parser;
use quickmd::app::cli::args::*;
use quickmd::core::logging::LogFormat;
use std::path::PathBuf;

static COMMAND_NAME: &str = "quickmd";

fn parse(args: &[&str]) -> Result<Args, clap::Error> {
    Args::try_parse_from(std::iter::once(COMMAND_NAME).chain(args.iter().copied()))
}

#[test]
fn test_log_options_feed_log_settings() {
    let args = parse(&[
        "--log-level",
        "debug",
        "--log-format",
        "ext",
        "--log-file",
        "quickmd.log",
        "--no-color",
        "plugins",
        "list",
    ])
    .unwrap();

    let settings = args.log_settings();
    assert_eq!(settings.level, "debug");
    assert_eq!(settings.format, LogFormat::Ext);
    assert_eq!(settings.file, Some(PathBuf::from("quickmd.log")));
    assert!(!settings.color);
}

#[test]
fn test_subcommand_is_required() {
    assert!(parse(&[]).is_err());
    assert!(parse(&["plugins"]).is_err());
}

#[test]
fn test_stats_json_flag() {
    let args = parse(&["stats", "README.md", "--json"]).unwrap();
    match args.command {
        Command::Stats { file, json } => {
            assert_eq!(file, PathBuf::from("README.md"));
            assert!(json);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_preview_output_and_wait() {
    let args = parse(&["preview", "doc.md", "-O", "doc.html", "--wait-ms", "250"]).unwrap();
    match args.command {
        Command::Preview {
            file,
            output,
            wait_ms,
        } => {
            assert_eq!(file, PathBuf::from("doc.md"));
            assert_eq!(output, Some(PathBuf::from("doc.html")));
            assert_eq!(wait_ms, 250);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_plugins_disable_takes_name() {
    let args = parse(&["plugins", "disable", "diagram-plugin"]).unwrap();
    assert!(matches!(
        args.command,
        Command::Plugins {
            action: PluginsAction::Disable { ref name }
        } if name == "diagram-plugin"
    ));
    assert!(parse(&["plugins", "disable"]).is_err());
}

#[test]
fn test_version_flag_is_handled_by_clap() {
    let error = parse(&["--version"]).unwrap_err();
    assert_eq!(error.kind(), clap::error::ErrorKind::DisplayVersion);
}
