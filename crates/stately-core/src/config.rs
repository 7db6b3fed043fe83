use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Project configuration loaded from `.stately.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatelyConfig {
    /// Path to the OpenAPI document (JSON or YAML).
    pub input: String,
    /// Directory generated files are written to.
    pub output: String,
    /// Path to a plugin config file, if any.
    pub plugin_config: Option<String>,
}

impl Default for StatelyConfig {
    fn default() -> Self {
        Self {
            input: "openapi.json".to_string(),
            output: "src/generated".to_string(),
            plugin_config: None,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".stately.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<StatelyConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: StatelyConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# stately codegen configuration
input: openapi.json
output: src/generated

# Optional plugin config: a YAML list of built-in plugin names.
# plugin_config: stately.plugins.yaml
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StatelyConfig::default();
        assert_eq!(config.input, "openapi.json");
        assert_eq!(config.output, "src/generated");
        assert!(config.plugin_config.is_none());
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
input: spec/openapi.json
output: app/generated
plugin_config: plugins.yaml
"#;
        let config: StatelyConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "spec/openapi.json");
        assert_eq!(config.output, "app/generated");
        assert_eq!(config.plugin_config.as_deref(), Some("plugins.yaml"));
    }

    #[test]
    fn test_parse_minimal_config() {
        let yaml = "input: api.json\n";
        let config: StatelyConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "api.json");
        // Defaults applied
        assert_eq!(config.output, "src/generated");
        assert!(config.plugin_config.is_none());
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let loaded = load_config(&path).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, default_config_content()).unwrap();
        let loaded = load_config(&path).unwrap().expect("config should load");
        assert_eq!(loaded.input, "openapi.json");
        assert_eq!(loaded.output, "src/generated");
    }
}
