//! Plugin lifecycle driven through an editor session

use crate::common::{disabled, session, session_with, Journal, RecordingPlugin};
use quickmd::plugin::api::WordCountPlugin;
use std::sync::Arc;

#[test]
fn test_word_count_tracks_edits_until_unregistered() {
    let mut session = session("");
    let plugin = session.manager().get_plugin("word-count-plugin").unwrap();
    let word_count = plugin.as_any().downcast_ref::<WordCountPlugin>().unwrap();

    session.set_content("a b c");
    assert_eq!(word_count.stats().words, 3);
    assert_eq!(word_count.update_count(), 1);

    assert!(session.unregister("word-count-plugin"));
    session.set_content("a b c d e");
    assert_eq!(word_count.update_count(), 1);
    assert_eq!(word_count.stats().words, 0);
}

#[test]
fn test_plugin_sees_initial_content_then_every_change() {
    let journal = Journal::default();
    let mut session = session_with("draft", disabled(&["word-count-plugin"]));
    assert!(session.register(Arc::new(RecordingPlugin::new("rec", &journal))));

    session.insert_text("!");
    session.set_content("final");

    assert_eq!(
        journal.entries(),
        vec!["rec:initialize:draft", "rec:changed:draft!", "rec:changed:final"]
    );
}

#[test]
fn test_duplicate_registration_keeps_first_plugin() {
    let first = Journal::default();
    let second = Journal::default();
    let mut session = session("");

    assert!(session.register(Arc::new(RecordingPlugin::new("rec", &first))));
    assert!(!session.register(Arc::new(RecordingPlugin::new("rec", &second))));

    session.set_content("x");
    assert_eq!(first.entries().len(), 2);
    assert!(second.entries().is_empty());
}

#[test]
fn test_unregister_is_complete_and_idempotent() {
    let journal = Journal::default();
    let mut session = session("");
    session.register(Arc::new(RecordingPlugin::new("rec", &journal)));

    assert!(session.unregister("rec"));
    assert!(!session.unregister("rec"));
    assert!(!session.unregister("never-registered"));
    session.set_content("after");

    assert_eq!(journal.entries(), vec!["rec:initialize:", "rec:teardown"]);
}

#[test]
fn test_swap_document_reinitializes_against_new_text() {
    let journal = Journal::default();
    let mut session = session("old");
    session.register(Arc::new(RecordingPlugin::new("rec", &journal)));

    session.swap_document("new");

    // Plugins registered outside the catalog do not come back
    assert_eq!(journal.entries(), vec!["rec:initialize:old", "rec:teardown"]);
    assert!(!session.manager().is_active("rec"));
    assert_eq!(
        session
            .with_plugin("word-count-plugin", WordCountPlugin::stats)
            .unwrap()
            .words,
        1
    );
}

#[test]
fn test_reload_plugins_restores_catalog() {
    let mut session = session("one two");
    session.unregister("word-count-plugin");
    session.unregister("diagram-toolbar-plugin");

    assert_eq!(session.reload_plugins(), 3);
    assert_eq!(
        session.manager().plugin_names(),
        vec!["word-count-plugin", "diagram-plugin", "diagram-toolbar-plugin"]
    );
}

#[test]
fn test_dropping_session_tears_plugins_down() {
    let journal = Journal::default();
    {
        let mut session = session("");
        session.register(Arc::new(RecordingPlugin::new("rec", &journal)));
    }
    assert_eq!(journal.entries(), vec!["rec:initialize:", "rec:teardown"]);
}
