//! Catalog of builtin plugins

use crate::plugin::builtin::diagram::{self, DiagramPlugin};
use crate::plugin::builtin::diagram_toolbar::{self, DiagramToolbarPlugin};
use crate::plugin::builtin::word_count::{self, WordCountPlugin};
use crate::plugin::traits::Plugin;
use crate::plugin::types::BuiltinPlugin;
use std::sync::Arc;

fn create_word_count() -> Arc<dyn Plugin> {
    Arc::new(WordCountPlugin::new())
}

fn create_diagram() -> Arc<dyn Plugin> {
    Arc::new(DiagramPlugin::new())
}

fn create_diagram_toolbar() -> Arc<dyn Plugin> {
    Arc::new(DiagramToolbarPlugin::new())
}

static BUILTIN_PLUGINS: [BuiltinPlugin; 3] = [
    BuiltinPlugin {
        name: word_count::PLUGIN_NAME,
        factory: create_word_count,
    },
    BuiltinPlugin {
        name: diagram::PLUGIN_NAME,
        factory: create_diagram,
    },
    BuiltinPlugin {
        name: diagram_toolbar::PLUGIN_NAME,
        factory: create_diagram_toolbar,
    },
];

/// Get all builtin plugins in registration order
pub fn get_all_builtin_plugins() -> &'static [BuiltinPlugin] {
    &BUILTIN_PLUGINS
}

pub fn find_builtin(name: &str) -> Option<&'static BuiltinPlugin> {
    BUILTIN_PLUGINS.iter().find(|builtin| builtin.name == name)
}

pub fn builtin_names() -> Vec<&'static str> {
    BUILTIN_PLUGINS.iter().map(|builtin| builtin.name).collect()
}
