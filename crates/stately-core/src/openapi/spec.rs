use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::schema::RawSchema;

/// Info object describing the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub version: String,
}

/// Reusable components. Only `schemas` matters to the node pipeline; the rest
/// of the section is carried opaquely so round-tripping a document is lossless.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, RawSchema>,

    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

/// Top-level OpenAPI 3.x document.
///
/// Paths and operations are outside the codegen pipeline's concern; they are
/// preserved as raw values so plugins inspecting the full spec still see them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiSpec {
    pub openapi: String,

    pub info: Info,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub paths: IndexMap<String, serde_json::Value>,
}

impl OpenApiSpec {
    /// The component schema map, or an empty map when the document has none.
    pub fn component_schemas(&self) -> IndexMap<String, RawSchema> {
        self.components
            .as_ref()
            .map(|c| c.schemas.clone())
            .unwrap_or_default()
    }
}
