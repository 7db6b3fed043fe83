use heck::{ToKebabCase, ToTitleCase};
use indexmap::IndexMap;

use crate::error::EntityError;
use crate::openapi::spec::OpenApiSpec;

/// One variant of the `Entity` envelope schema: which state entry it is and
/// which component schema holds its data.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMapping {
    pub state_entry: String,
    pub schema_name: String,
}

/// Extract entity mappings from the `Entity` schema's `oneOf` variants.
///
/// Each variant is expected to look like
/// `{properties: {type: {enum: [<state entry>]}, data: {$ref: ...}}}`;
/// variants missing either half contribute empty strings, matching the
/// permissive extraction the UI runtime performs.
pub fn entity_mappings(spec: &OpenApiSpec) -> Result<Vec<EntityMapping>, EntityError> {
    let entity = spec
        .components
        .as_ref()
        .and_then(|c| c.schemas.get("Entity"))
        .ok_or(EntityError::MissingEntitySchema)?;

    if entity.one_of.is_empty() {
        return Err(EntityError::MissingOneOf);
    }

    Ok(entity
        .one_of
        .iter()
        .map(|variant| {
            let state_entry = variant
                .properties
                .get("type")
                .and_then(|p| p.enum_values.first())
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            let schema_name = variant
                .properties
                .get("data")
                .and_then(|p| p.ref_path.as_deref())
                .and_then(|r| r.rsplit('/').next())
                .unwrap_or_default()
                .to_string();
            EntityMapping { state_entry, schema_name }
        })
        .collect())
}

/// State entry → component schema name.
pub fn state_entry_to_schema(mappings: &[EntityMapping]) -> IndexMap<String, String> {
    mappings
        .iter()
        .map(|m| (m.state_entry.clone(), m.schema_name.clone()))
        .collect()
}

/// kebab-case URL slug → state entry.
pub fn url_to_state_entry(mappings: &[EntityMapping]) -> IndexMap<String, String> {
    mappings
        .iter()
        .map(|m| (m.state_entry.to_kebab_case(), m.state_entry.clone()))
        .collect()
}

/// State entry → kebab-case URL slug.
pub fn state_entry_to_url(mappings: &[EntityMapping]) -> IndexMap<String, String> {
    mappings
        .iter()
        .map(|m| (m.state_entry.clone(), m.state_entry.to_kebab_case()))
        .collect()
}

/// State entry → Title Case display name.
pub fn entity_display_names(mappings: &[EntityMapping]) -> IndexMap<String, String> {
    mappings
        .iter()
        .map(|m| (m.state_entry.clone(), m.state_entry.to_title_case()))
        .collect()
}
