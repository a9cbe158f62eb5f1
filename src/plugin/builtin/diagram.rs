//! Mermaid diagram support for the preview
//!
//! Fenced ```` ```mermaid ```` blocks become placeholder divs before the
//! markdown is rendered, and the placeholders are filled with SVG after.
//! The diagram engine loads in the background; until it is ready the plugin
//! leaves the preview untouched.

use crate::core::version::get_api_version;
use crate::editor::api::{EditorAdapter, PreviewElement};
use crate::plugin::error::{DiagramError, PluginError, PluginResult};
use crate::plugin::manager::PluginManager;
use crate::plugin::traits::{Plugin, PreviewEnhancementPlugin};
use crate::plugin::types::{Capability, CapabilitySet, PluginInfo};
use async_trait::async_trait;
use regex::{Captures, Regex};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

pub const PLUGIN_NAME: &str = "diagram-plugin";

static MERMAID_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```mermaid\r?\n(?:(.*?)\r?\n)??```").expect("mermaid fence pattern is valid")
});

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<div class="mermaid-diagram" id="(mermaid-\d+)">([^<]*)</div>"#)
        .expect("placeholder pattern is valid")
});

/// Backend that turns diagram source into SVG
#[async_trait]
pub trait DiagramEngine: Send + Sync {
    fn name(&self) -> &str;

    /// Prepare the engine; runs once per plugin initialization
    async fn load(&self) -> Result<(), DiagramError>;

    /// Render one diagram to an SVG fragment
    fn render(&self, id: &str, code: &str) -> Result<String, DiagramError>;
}

/// Engine backed by the mermaid command-line renderer
#[derive(Debug, Clone)]
pub struct MermaidCli {
    program: PathBuf,
}

impl MermaidCli {
    pub fn new() -> Self {
        Self::with_program("mmdc")
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for MermaidCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DiagramEngine for MermaidCli {
    fn name(&self) -> &str {
        "mermaid-cli"
    }

    async fn load(&self) -> Result<(), DiagramError> {
        let output = tokio::process::Command::new(&self.program)
            .arg("--version")
            .output()
            .await
            .map_err(|e| {
                DiagramError::EngineUnavailable(format!("{}: {}", self.program.display(), e))
            })?;
        if !output.status.success() {
            return Err(DiagramError::EngineUnavailable(format!(
                "{} exited with {}",
                self.program.display(),
                output.status
            )));
        }
        log::debug!(
            "Mermaid CLI version {}",
            String::from_utf8_lossy(&output.stdout).trim()
        );
        Ok(())
    }

    fn render(&self, id: &str, code: &str) -> Result<String, DiagramError> {
        let stem = format!("quickmd-{}-{}", std::process::id(), id);
        let input = std::env::temp_dir().join(format!("{stem}.mmd"));
        let output = std::env::temp_dir().join(format!("{stem}.svg"));

        std::fs::write(&input, code).map_err(|e| DiagramError::Render(e.to_string()))?;
        let run = std::process::Command::new(&self.program)
            .arg("--quiet")
            .arg("--input")
            .arg(&input)
            .arg("--output")
            .arg(&output)
            .output();
        let svg = match run {
            Ok(finished) if finished.status.success() => {
                std::fs::read_to_string(&output).map_err(|e| DiagramError::Render(e.to_string()))
            }
            Ok(finished) => Err(DiagramError::Render(
                String::from_utf8_lossy(&finished.stderr).trim().to_string(),
            )),
            Err(e) => Err(DiagramError::Render(e.to_string())),
        };

        let _ = std::fs::remove_file(&input);
        let _ = std::fs::remove_file(&output);
        svg
    }
}

/// Load progress of the diagram engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    NotLoaded,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug)]
struct EngineState {
    status: EngineStatus,
    /// Bumped by every initialize and teardown; stale loads are discarded
    generation: u64,
}

/// Preview enhancement rendering mermaid diagrams
pub struct DiagramPlugin {
    info: PluginInfo,
    engine: Arc<dyn DiagramEngine>,
    state: Arc<Mutex<EngineState>>,
    next_id: AtomicU64,
}

fn lock_state(state: &Mutex<EngineState>) -> MutexGuard<'_, EngineState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl DiagramPlugin {
    pub fn new() -> Self {
        Self::with_engine(Arc::new(MermaidCli::new()))
    }

    pub fn with_engine(engine: Arc<dyn DiagramEngine>) -> Self {
        Self {
            info: PluginInfo::new(
                PLUGIN_NAME,
                "1.0.0",
                "Renders Mermaid flowcharts, sequence diagrams and more in the preview",
                "QuickMD Team",
                get_api_version(),
            ),
            engine,
            state: Arc::new(Mutex::new(EngineState {
                status: EngineStatus::NotLoaded,
                generation: 0,
            })),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn status(&self) -> EngineStatus {
        lock_state(&self.state).status.clone()
    }

    pub fn is_engine_loaded(&self) -> bool {
        self.status() == EngineStatus::Ready
    }

    fn start_load(&self) -> PluginResult<()> {
        let generation = {
            let mut state = lock_state(&self.state);
            state.generation += 1;
            state.status = EngineStatus::Loading;
            state.generation
        };

        let engine = Arc::clone(&self.engine);
        let state = Arc::clone(&self.state);
        let task = async move {
            let result = engine.load().await;
            finish_load(&state, generation, engine.name(), result);
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(task);
            }
            Err(_) => {
                std::thread::Builder::new()
                    .name("diagram-engine-load".to_string())
                    .spawn(move || {
                        match tokio::runtime::Builder::new_current_thread()
                            .enable_all()
                            .build()
                        {
                            Ok(runtime) => runtime.block_on(task),
                            Err(e) => log::error!("Cannot start diagram engine loader: {}", e),
                        }
                    })
                    .map_err(|e| PluginError::load(PLUGIN_NAME, e))?;
            }
        }
        Ok(())
    }

    fn next_placeholder_id(&self) -> String {
        format!("mermaid-{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn render_placeholder(&self, id: &str, escaped_code: &str) -> String {
        let code = unescape_html(escaped_code);
        if code.trim().is_empty() {
            return String::new();
        }
        match self.engine.render(id, &code) {
            Ok(svg) => svg,
            Err(e) => {
                log::error!("Mermaid rendering error in {}: {}", id, e);
                format!(
                    "<div class=\"mermaid-error\"><strong>Diagram render error:</strong> {}<pre>{}</pre></div>",
                    escape_html(&e.to_string()),
                    escape_html(&code)
                )
            }
        }
    }
}

impl Default for DiagramPlugin {
    fn default() -> Self {
        Self::new()
    }
}

fn finish_load(
    state: &Mutex<EngineState>,
    generation: u64,
    engine_name: &str,
    result: Result<(), DiagramError>,
) {
    let mut state = lock_state(state);
    if state.generation != generation {
        log::debug!("Discarding stale {} load", engine_name);
        return;
    }
    state.status = match result {
        Ok(()) => {
            log::info!("Diagram engine {} loaded", engine_name);
            EngineStatus::Ready
        }
        Err(e) => {
            log::error!("Failed to load diagram engine {}: {}", engine_name, e);
            EngineStatus::Failed(e.to_string())
        }
    };
}

/// Escape text for HTML; newlines become `&#10;` so the result stays on one line
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => {}
            _ => escaped.push(c),
        }
    }
    escaped
}

fn unescape_html(text: &str) -> String {
    text.replace("&#10;", "\n")
        .replace("&quot;", "\"")
        .replace("&gt;", ">")
        .replace("&lt;", "<")
        .replace("&amp;", "&")
}

impl Plugin for DiagramPlugin {
    fn plugin_info(&self) -> PluginInfo {
        self.info.clone()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::new().with(Capability::PreviewEnhancement)
    }

    fn initialize(
        &self,
        _manager: &PluginManager,
        _editor: Option<Arc<dyn EditorAdapter>>,
    ) -> PluginResult<()> {
        log::debug!("Loading diagram engine {}", self.engine.name());
        self.start_load()
    }

    fn teardown(&self, _manager: &PluginManager) -> PluginResult<()> {
        let mut state = lock_state(&self.state);
        state.generation += 1;
        state.status = EngineStatus::NotLoaded;
        Ok(())
    }

    /// Ready once the engine load has finished, successfully or not
    fn is_ready(&self) -> bool {
        self.status() != EngineStatus::Loading
    }

    fn as_preview_enhancement(&self) -> Option<&dyn PreviewEnhancementPlugin> {
        Some(self)
    }
}

impl PreviewEnhancementPlugin for DiagramPlugin {
    fn before_render(&self, content: &str) -> PluginResult<Option<String>> {
        if !self.is_engine_loaded() || !MERMAID_FENCE.is_match(content) {
            return Ok(None);
        }
        let replaced = MERMAID_FENCE.replace_all(content, |caps: &Captures| {
            format!(
                "<div class=\"mermaid-diagram\" id=\"{}\">{}</div>\n",
                self.next_placeholder_id(),
                escape_html(caps.get(1).map_or("", |body| body.as_str()))
            )
        });
        Ok(Some(replaced.into_owned()))
    }

    fn after_render(&self, element: &mut PreviewElement) -> PluginResult<()> {
        if !self.is_engine_loaded() || !PLACEHOLDER.is_match(element.html()) {
            return Ok(());
        }
        let rendered = PLACEHOLDER.replace_all(element.html(), |caps: &Captures| {
            format!(
                "<div class=\"mermaid-diagram\" id=\"{}\">{}</div>",
                &caps[1],
                self.render_placeholder(&caps[1], &caps[2])
            )
        });
        let rendered = rendered.into_owned();
        element.set_html(rendered);
        Ok(())
    }
}
