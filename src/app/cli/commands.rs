//! Command implementations
//!
//! Every command opens an [`EditorSession`] over the target document so the
//! work goes through the same plugins an interactive editor would load.

use crate::app::cli::args::{Args, Command, PluginsAction};
use crate::app::cli::display::{display_plugin_table, format_stats};
use crate::app::cli::error::{CommandError, CommandResult};
use crate::app::session::EditorSession;
use crate::editor::api::CmarkRenderer;
use crate::plugin::api::{
    DiagramKind, DiagramToolbarPlugin, DocumentStats, WordCountPlugin,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

const WORD_COUNT: &str = "word-count-plugin";
const DIAGRAM_TOOLBAR: &str = "diagram-toolbar-plugin";

/// Run the selected command
pub async fn run(args: &Args) -> CommandResult<()> {
    let settings_path = args.settings_path();
    log::debug!("Plugin settings: {:?}", settings_path);

    match &args.command {
        Command::Plugins { action } => plugins(action, settings_path, args.use_color()),
        Command::Stats { file, json } => {
            let stats = stats(file, settings_path).await?;
            println!("{}", format_stats(&stats, *json)?);
            Ok(())
        }
        Command::Preview {
            file,
            output,
            wait_ms,
        } => {
            let html = preview(file, settings_path, Duration::from_millis(*wait_ms)).await?;
            match output {
                Some(path) => write_file(path, &html).await,
                None => {
                    print!("{}", html);
                    Ok(())
                }
            }
        }
        Command::InsertDiagram {
            file,
            kind,
            at,
            write,
        } => {
            let content = insert_diagram(file, settings_path, *kind, *at).await?;
            if *write {
                write_file(file, &content).await
            } else {
                print!("{}", content);
                Ok(())
            }
        }
    }
}

fn plugins(
    action: &PluginsAction,
    settings_path: Option<PathBuf>,
    use_color: bool,
) -> CommandResult<()> {
    let mut session = EditorSession::open("", settings_path);
    match action {
        PluginsAction::List => display_plugin_table(&session.plugin_summaries(), use_color),
        PluginsAction::Enable { name } => {
            session.set_plugin_enabled(name, true)?;
            println!("Enabled {}", name);
        }
        PluginsAction::Disable { name } => {
            session.set_plugin_enabled(name, false)?;
            println!("Disabled {}", name);
        }
    }
    session.shutdown();
    Ok(())
}

/// Counts reported by the word-count plugin
pub async fn stats(file: &Path, settings_path: Option<PathBuf>) -> CommandResult<DocumentStats> {
    let text = read_file(file).await?;
    let mut session = EditorSession::open(text, settings_path);
    let stats = session
        .with_plugin(WORD_COUNT, WordCountPlugin::stats)
        .ok_or_else(|| CommandError::PluginDisabled {
            name: WORD_COUNT.to_string(),
        });
    session.shutdown();
    stats
}

/// HTML for `file` after every enabled preview plugin has run
pub async fn preview(
    file: &Path,
    settings_path: Option<PathBuf>,
    wait: Duration,
) -> CommandResult<String> {
    let text = read_file(file).await?;
    let mut session = EditorSession::open(text, settings_path);
    if !session.wait_until_ready(wait).await {
        log::warn!("Rendering before all plugins finished loading");
    }
    let html = session.render_preview(&CmarkRenderer::new());
    session.shutdown();
    Ok(html)
}

/// Document text with a diagram template inserted at `at` (or the end)
pub async fn insert_diagram(
    file: &Path,
    settings_path: Option<PathBuf>,
    kind: DiagramKind,
    at: Option<usize>,
) -> CommandResult<String> {
    let text = read_file(file).await?;
    let mut session = EditorSession::open(text, settings_path);
    if let Some(offset) = at {
        session.editor().set_cursor(offset);
    }
    let inserted = session
        .with_plugin(DIAGRAM_TOOLBAR, |plugin: &DiagramToolbarPlugin| {
            plugin.insert_template(kind)
        })
        .is_some();
    let content = session.content();
    session.shutdown();

    if inserted {
        Ok(content)
    } else {
        Err(CommandError::PluginDisabled {
            name: DIAGRAM_TOOLBAR.to_string(),
        })
    }
}

async fn read_file(path: &Path) -> CommandResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CommandError::read(path, e))
}

async fn write_file(path: &Path, content: &str) -> CommandResult<()> {
    tokio::fs::write(path, content)
        .await
        .map_err(|e| CommandError::write(path, e))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}
