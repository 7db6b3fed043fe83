use std::fs;
use std::path::Path;

use log::warn;
use serde::Deserialize;

use crate::error::PluginError;

use super::plugin::{CodegenPlugin, PluginRegistry};
use super::relative_path::RelativePathPlugin;

/// Declarative plugin config file: a list of built-in plugin names.
///
/// Accepts either a bare YAML sequence or a mapping with a `plugins` key, so
/// both of these parse:
///
/// ```yaml
/// - relative-path
/// ```
///
/// ```yaml
/// plugins:
///   - relative-path
/// ```
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PluginConfigFile {
    Bare(Vec<String>),
    Keyed { plugins: Vec<String> },
}

impl PluginConfigFile {
    fn names(self) -> Vec<String> {
        match self {
            PluginConfigFile::Bare(names) => names,
            PluginConfigFile::Keyed { plugins } => plugins,
        }
    }
}

/// Look up a built-in plugin by its config name.
fn plugin_by_name(name: &str) -> Result<Box<dyn CodegenPlugin>, PluginError> {
    match name {
        "relative-path" => Ok(Box::new(RelativePathPlugin)),
        _ => Err(PluginError::UnknownPlugin(
            name.to_string(),
            AVAILABLE_PLUGINS.to_string(),
        )),
    }
}

const AVAILABLE_PLUGINS: &str = "relative-path";

/// Load plugins from an optional config file path.
///
/// Fails soft at every step: no path, a missing file, an unparseable file, or
/// an unknown plugin name all degrade to fewer (or zero) plugins with a
/// warning. A broken plugin config costs fidelity, never the generation run.
pub fn load_plugins_from_config(config_path: Option<&Path>) -> Vec<Box<dyn CodegenPlugin>> {
    let Some(path) = config_path else {
        return Vec::new();
    };

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            warn!("plugin config not found at {}: {err}", path.display());
            return Vec::new();
        }
    };

    let names = match serde_yaml_ng::from_str::<PluginConfigFile>(&content) {
        Ok(parsed) => parsed.names(),
        Err(err) => {
            warn!("failed to parse plugin config {}: {err}", path.display());
            return Vec::new();
        }
    };

    let mut registry = PluginRegistry::new();
    for name in names {
        let result = plugin_by_name(&name).and_then(|plugin| registry.register(plugin));
        if let Err(err) = result {
            warn!("{err}, skipping");
        }
    }
    if registry.is_empty() {
        warn!("no plugins loaded from {}", path.display());
    }
    registry.into_plugins()
}
