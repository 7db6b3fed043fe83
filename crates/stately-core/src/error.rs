use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),
}

/// Raised when a plugin is rejected at registration time.
///
/// Shape problems in schema data never produce errors; the parser degrades to
/// `unknown` nodes instead. Only malformed plugin registrations are surfaced.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("plugin rejected: name must not be empty")]
    EmptyName,

    #[error("plugin rejected: a plugin named '{0}' is already registered")]
    DuplicateName(String),

    #[error("unknown plugin '{0}' (available: {1})")]
    UnknownPlugin(String, String),
}

#[derive(Debug, Error)]
pub enum EntityError {
    #[error("Entity schema not found in OpenAPI spec")]
    MissingEntitySchema,

    #[error("Entity schema has no oneOf variants")]
    MissingOneOf,
}
