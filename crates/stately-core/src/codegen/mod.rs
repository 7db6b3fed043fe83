pub mod core_plugin;
pub mod loader;
pub mod parser;
pub mod plugin;
pub mod relative_path;
pub mod split;

use indexmap::IndexSet;
use log::{debug, info};

pub use core_plugin::CorePlugin;
pub use loader::load_plugins_from_config;
pub use parser::Parser;
pub use plugin::{CodegenPlugin, PluginContext, PluginRegistry};
pub use relative_path::RelativePathPlugin;
pub use split::{DependencyGraph, ParseResult, partition, schema_dependencies};

use crate::openapi::spec::OpenApiSpec;

/// Union of the entry points every plugin declares, in declaration order.
pub fn collect_entry_points(
    spec: &OpenApiSpec,
    plugins: &[Box<dyn CodegenPlugin>],
) -> IndexSet<String> {
    let mut entry_points = IndexSet::new();
    for plugin in plugins {
        let declared = plugin.entry_points(spec);
        if !declared.is_empty() {
            debug!(
                "plugin '{}' declared {} entry point(s)",
                plugin.name(),
                declared.len()
            );
            entry_points.extend(declared);
        }
    }
    entry_points
}

/// Run the full pipeline: parse every component schema through the plugin
/// chain (user plugins first, built-in dispatch last), then split the node
/// map into main and runtime bundles by entry-point reachability.
///
/// Each invocation builds its own parser state; nothing is shared across
/// runs, so repeated or interleaved generations in one process don't
/// interfere.
pub fn generate(spec: &OpenApiSpec, user_plugins: Vec<Box<dyn CodegenPlugin>>) -> ParseResult {
    let mut plugins = user_plugins;
    plugins.push(Box::new(CorePlugin));

    let schemas = spec.component_schemas();
    info!("parsing {} component schemas", schemas.len());

    let entry_points = collect_entry_points(spec, &plugins);
    if entry_points.is_empty() {
        info!("no entry points declared, bundling all schemas together");
    } else {
        info!("{} entry point(s) declared", entry_points.len());
    }
    for entry in &entry_points {
        if !schemas.contains_key(entry) {
            log::warn!("entry point '{entry}' not found in component schemas");
        }
    }

    let parser = Parser::new(&schemas, &plugins);
    let nodes = parser.parse_components();

    let graph = schema_dependencies(&schemas);
    let result = partition(nodes, &entry_points, &graph);

    info!(
        "main bundle: {} schemas, runtime bundle: {} schemas",
        result.main.len(),
        result.runtime.len()
    );
    result
}
