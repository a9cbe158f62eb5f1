//! Preview rendering through before/after render hooks

use crate::common::{disabled, session, session_with, Journal, RecordingPlugin};
use quickmd::editor::api::CmarkRenderer;
use quickmd::plugin::api::{DiagramPlugin, EngineStatus};
use std::sync::Arc;
use std::time::Duration;

const DOCUMENT: &str = "# Plan\n\n```mermaid\ngraph TD\n    A-->B\n```\n\nDone.\n";

#[tokio::test]
async fn test_mermaid_block_rendered_once_engine_is_ready() {
    let session = session(DOCUMENT);
    assert!(session.wait_until_ready(Duration::from_secs(2)).await);

    let html = session.render_preview(&CmarkRenderer::new());
    assert!(html.starts_with("<h1>Plan</h1>"));
    assert!(html.contains(
        "<div class=\"mermaid-diagram\" id=\"mermaid-1\"><svg data-engine=\"fake\">graph TD\n    A-->B</svg></div>"
    ));
    assert!(html.contains("<p>Done.</p>"));
    assert!(!html.contains("```"));
}

#[tokio::test]
async fn test_render_errors_are_shown_inline() {
    let session = session("```mermaid\nboom\n```\n");
    assert!(session.wait_until_ready(Duration::from_secs(2)).await);

    let html = session.render_preview(&CmarkRenderer::new());
    assert!(html.contains("<div class=\"mermaid-error\">"));
    assert!(html.contains("syntax error"));
    assert!(html.contains("<pre>boom</pre>"));
}

#[tokio::test]
async fn test_before_engine_loads_fence_renders_as_code() {
    let session = session(DOCUMENT);
    let status = session
        .with_plugin("diagram-plugin", DiagramPlugin::status)
        .unwrap();
    assert_eq!(status, EngineStatus::Loading);

    let html = session.render_preview(&CmarkRenderer::new());
    assert!(html.contains("<code class=\"language-mermaid\">"));
}

#[tokio::test]
async fn test_swap_document_reloads_engine() {
    let mut session = session("");
    assert!(session.wait_until_ready(Duration::from_secs(2)).await);

    session.swap_document(DOCUMENT);
    assert!(!session.manager().all_ready());
    assert!(session.wait_until_ready(Duration::from_secs(2)).await);

    let html = session.render_preview(&CmarkRenderer::new());
    assert!(html.contains("data-engine=\"fake\""));
}

#[test]
fn test_pipeline_accumulates_across_plugins_in_order() {
    let journal = Journal::default();
    let mut session = session_with("hi", disabled(&["diagram-plugin"]));
    session.register(Arc::new(RecordingPlugin::new("one", &journal).appending(" there")));
    session.register(Arc::new(RecordingPlugin::new("two", &journal)));
    session.register(Arc::new(RecordingPlugin::new("three", &journal).appending("!")));

    let html = session.render_preview(&CmarkRenderer::new());

    assert_eq!(html, "<p>hi there!</p>\n<!-- one --><!-- two --><!-- three -->");
    let calls: Vec<String> = journal
        .entries()
        .into_iter()
        .filter(|entry| entry.ends_with(":before") || entry.ends_with(":after"))
        .collect();
    assert_eq!(
        calls,
        vec!["one:before", "two:before", "three:before", "one:after", "two:after", "three:after"]
    );
}

#[test]
fn test_preview_without_any_plugins_is_plain_markdown() {
    let session = session_with(
        "*emphasis*",
        disabled(&["word-count-plugin", "diagram-plugin", "diagram-toolbar-plugin"]),
    );
    assert_eq!(
        session.render_preview(&CmarkRenderer::new()),
        "<p><em>emphasis</em></p>\n"
    );
}
