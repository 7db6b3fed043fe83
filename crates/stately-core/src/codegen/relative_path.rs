use crate::nodes::{PrimitiveType, SerializedNode};
use crate::openapi::schema::RawSchema;

use super::plugin::{CodegenPlugin, PluginContext};

const REQUIRED_DIRS: [&str; 4] = ["cache", "data", "upload", "config"];

/// Recognizes the structurally-generic dir/path `oneOf` shapes emitted by the
/// Stately files API as a single `path` primitive node, so the UI renders a
/// path picker instead of a four-way union editor.
pub struct RelativePathPlugin;

impl CodegenPlugin for RelativePathPlugin {
    fn name(&self) -> &str {
        "stately:relative-path"
    }

    fn description(&self) -> Option<&str> {
        Some("detects relative-path nodes emitted by the files API")
    }

    fn matches(&self, schema: &RawSchema, _ctx: &PluginContext<'_, '_>) -> bool {
        !schema.one_of.is_empty()
    }

    fn transform(
        &self,
        schema: &RawSchema,
        ctx: &PluginContext<'_, '_>,
    ) -> Option<SerializedNode> {
        if is_relative_path_object(schema, ctx) || is_user_defined_path_union(schema, ctx) {
            return Some(SerializedNode::Primitive {
                primitive_type: PrimitiveType::Path,
                format: None,
                minimum: None,
                maximum: None,
                description: schema.description.clone(),
            });
        }
        None
    }
}

/// One variant per well-known directory, each `{dir: <enum>, path}` with both
/// properties required.
fn is_relative_path_object(schema: &RawSchema, ctx: &PluginContext<'_, '_>) -> bool {
    let Some(resolved) = ctx.deref(schema) else {
        return false;
    };
    if resolved.one_of.len() != REQUIRED_DIRS.len() {
        return false;
    }
    let variants: Vec<&RawSchema> = resolved.one_of.iter().filter_map(|v| ctx.deref(v)).collect();
    if variants.len() != REQUIRED_DIRS.len() || !variants.iter().all(|v| has_dir_path_shape(v)) {
        return false;
    }
    let dir_values: Vec<String> = variants
        .iter()
        .filter_map(|v| {
            v.properties
                .get("dir")?
                .enum_values
                .first()?
                .as_str()
                .map(str::to_lowercase)
        })
        .collect();
    REQUIRED_DIRS.iter().all(|dir| dir_values.iter().any(|v| v == dir))
}

/// A two-variant union of a free-form string and the relative-path object.
fn is_user_defined_path_union(schema: &RawSchema, ctx: &PluginContext<'_, '_>) -> bool {
    let Some(resolved) = ctx.deref(schema) else {
        return false;
    };
    if resolved.one_of.len() != 2 {
        return false;
    }
    let variants: Vec<&RawSchema> = resolved.one_of.iter().filter_map(|v| ctx.deref(v)).collect();
    if variants.len() != 2 {
        return false;
    }
    let has_string = variants
        .iter()
        .any(|v| v.has_type(crate::openapi::schema::SchemaType::String));
    let has_relative = resolved
        .one_of
        .iter()
        .any(|v| is_relative_path_object(v, ctx));
    has_string && has_relative
}

fn has_dir_path_shape(schema: &RawSchema) -> bool {
    let Some(dir) = schema.properties.get("dir") else {
        return false;
    };
    !dir.enum_values.is_empty()
        && schema.properties.contains_key("path")
        && schema.required.iter().any(|r| r == "dir")
        && schema.required.iter().any(|r| r == "path")
}
