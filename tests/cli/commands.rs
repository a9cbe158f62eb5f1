//! Commands run against documents on disk

use clap::Parser;
use quickmd::app::cli::args::Args;
use quickmd::app::cli::commands;
use quickmd::app::cli::error::CommandError;
use quickmd::plugin::api::{DiagramKind, PluginSettings};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn settings_path(&self) -> PathBuf {
        self.dir.path().join("plugins.toml")
    }

    /// Settings with the mermaid CLI engine off so results do not depend on it
    fn without_diagram_engine(&self) -> PathBuf {
        let path = self.settings_path();
        let mut settings = PluginSettings::new();
        settings.set_enabled("diagram-plugin", false);
        settings.save(&path).unwrap();
        path
    }

    fn args(&self, args: &[&str]) -> Args {
        let config = self.settings_path();
        let config = config.to_str().unwrap();
        Args::try_parse_from(["quickmd", "--config", config].iter().chain(args.iter())).unwrap()
    }
}

#[tokio::test]
async fn test_plugins_disable_writes_settings() {
    let workspace = Workspace::new();
    let args = workspace.args(&["plugins", "disable", "word-count-plugin"]);

    commands::run(&args).await.unwrap();

    let saved = PluginSettings::load(&workspace.settings_path()).unwrap();
    assert!(!saved.is_enabled("word-count-plugin"));
    assert!(saved.is_enabled("diagram-plugin"));
}

#[tokio::test]
async fn test_plugins_enable_unknown_name_fails() {
    let workspace = Workspace::new();
    let args = workspace.args(&["plugins", "enable", "spellcheck"]);

    let error = commands::run(&args).await.unwrap_err();
    assert!(matches!(error, CommandError::Settings(_)));
    assert_eq!(error.exit_code(), 2);
}

#[tokio::test]
async fn test_insert_diagram_write_updates_file() {
    let workspace = Workspace::new();
    workspace.without_diagram_engine();
    let doc = workspace.file("doc.md", "# Design\n");
    let args = workspace.args(&["insert-diagram", doc.to_str().unwrap(), "flowchart", "--write"]);

    commands::run(&args).await.unwrap();

    assert_eq!(
        std::fs::read_to_string(&doc).unwrap(),
        format!("# Design\n{}", DiagramKind::Flowchart.template())
    );
}

#[tokio::test]
async fn test_preview_writes_html_output() {
    let workspace = Workspace::new();
    workspace.without_diagram_engine();
    let doc = workspace.file("doc.md", "| a | b |\n|---|---|\n| 1 | 2 |\n");
    let out = workspace.dir.path().join("doc.html");
    let args = workspace.args(&[
        "preview",
        doc.to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
    ]);

    commands::run(&args).await.unwrap();

    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.contains("<table>"));
    assert!(html.contains("<td>2</td>"));
}

#[tokio::test]
async fn test_preview_keeps_fence_when_diagram_plugin_disabled() {
    let workspace = Workspace::new();
    let settings = workspace.without_diagram_engine();
    let doc = workspace.file("doc.md", "```mermaid\ngraph TD\n```\n");

    let html = commands::preview(&doc, Some(settings), Duration::from_millis(50))
        .await
        .unwrap();
    assert!(html.contains("language-mermaid"));
}

#[tokio::test]
async fn test_stats_on_missing_file() {
    let workspace = Workspace::new();
    let missing = workspace.dir.path().join("missing.md");

    let error = commands::stats(&missing, None).await.unwrap_err();
    assert!(matches!(error, CommandError::Read { .. }));
    assert_eq!(error.exit_code(), 3);
}
