use indexmap::IndexMap;

use crate::nodes::{PrimitiveType, SerializedNode, UnionVariant};
use crate::openapi::schema::{AdditionalProperties, RawSchema, SchemaType, TypeSet};

use super::plugin::{CodegenPlugin, PluginContext};

/// The built-in shape dispatch, registered as the last plugin in every chain
/// so user plugins always see a schema first.
///
/// Classification priority, most to least specific:
/// nullable (type array) > nullable (null-variant oneOf) > allOf merge >
/// link > untagged enum > tagged union > tuple > array > map > object >
/// enum > primitive. Anything else defers, which the parser turns into an
/// `unknown` node.
pub struct CorePlugin;

impl CodegenPlugin for CorePlugin {
    fn name(&self) -> &str {
        "stately:codegen-core"
    }

    fn description(&self) -> Option<&str> {
        Some("built-in OpenAPI shape dispatch")
    }

    fn transform(&self, schema: &RawSchema, ctx: &PluginContext<'_, '_>) -> Option<SerializedNode> {
        transform_schema(schema, ctx)
    }
}

fn transform_schema(schema: &RawSchema, ctx: &PluginContext<'_, '_>) -> Option<SerializedNode> {
    if let Some(node) = nullable_from_type_array(schema, ctx) {
        return Some(node);
    }
    if let Some(node) = nullable_from_union(schema, ctx) {
        return Some(node);
    }
    if let Some(node) = merge_all_of(schema, ctx) {
        return Some(node);
    }

    if !schema.union_variants().is_empty() {
        if let Some(node) = detect_link(schema, ctx) {
            return Some(node);
        }
        if let Some(node) = build_union(schema, ctx) {
            return Some(node);
        }
    }

    if schema.has_type(SchemaType::Array) {
        return Some(parse_array(schema, ctx));
    }

    if schema.has_type(SchemaType::Object) {
        if schema.properties.is_empty() {
            if let Some(node) = parse_map(schema, ctx) {
                return Some(node);
            }
        }
        return Some(parse_object(schema, ctx));
    }

    parse_scalar(schema)
}

/// Nullable via `type: ["string", "null"]` (OpenAPI 3.1 style).
fn nullable_from_type_array(
    schema: &RawSchema,
    ctx: &PluginContext<'_, '_>,
) -> Option<SerializedNode> {
    if !matches!(schema.schema_type, Some(TypeSet::Multiple(_))) {
        return None;
    }
    let (non_null, has_null) = schema.schema_type.as_ref()?.split_null();
    if !has_null || non_null.len() != 1 {
        return None;
    }

    let inner = RawSchema {
        schema_type: Some(TypeSet::Single(non_null[0])),
        description: None,
        ..schema.clone()
    };
    let parsed = ctx.parse_schema(&inner, ctx.schema_name)?;
    Some(SerializedNode::Nullable {
        inner_schema: Box::new(parsed),
        description: schema.description.clone(),
    })
}

/// Nullable via the `oneOf: [T, {type: null}]` pattern.
fn nullable_from_union(schema: &RawSchema, ctx: &PluginContext<'_, '_>) -> Option<SerializedNode> {
    let variants = &schema.one_of;
    if variants.len() != 2 || !variants.iter().any(|v| v.has_type(SchemaType::Null)) {
        return None;
    }
    let inner = variants.iter().find(|v| !v.has_type(SchemaType::Null))?;
    let parsed = ctx.parse_schema(inner, ctx.schema_name)?;
    Some(SerializedNode::Nullable {
        inner_schema: Box::new(parsed),
        description: schema.description.clone(),
    })
}

/// Flatten an `allOf` composition into a single object node, merging
/// properties in declaration order and unioning required sets.
fn merge_all_of(schema: &RawSchema, ctx: &PluginContext<'_, '_>) -> Option<SerializedNode> {
    if schema.all_of.is_empty() {
        return None;
    }

    let mut properties = IndexMap::new();
    let mut required: Vec<String> = Vec::new();

    for sub in &schema.all_of {
        let Some(SerializedNode::Object {
            properties: sub_props,
            required: sub_required,
            ..
        }) = ctx.parse_schema(sub, ctx.schema_name)
        else {
            continue;
        };
        properties.extend(sub_props);
        for name in sub_required {
            if !required.contains(&name) {
                required.push(name);
            }
        }
    }

    if properties.is_empty() {
        return None;
    }

    Some(SerializedNode::Object {
        properties,
        required,
        additional_properties: None,
        description: schema.description.clone(),
    })
}

/// Detect the Link<T> shape: a two-variant oneOf where both variants carry an
/// `entity_type` enum, one holds a `ref` and the other holds `inline` data.
fn detect_link(schema: &RawSchema, ctx: &PluginContext<'_, '_>) -> Option<SerializedNode> {
    let variants = &schema.one_of;
    if variants.len() != 2 {
        return None;
    }

    let resolved: Vec<&RawSchema> = variants.iter().filter_map(|v| ctx.deref(v)).collect();
    if resolved.len() != 2 {
        return None;
    }

    let both_have_entity_type = resolved.iter().all(|v| {
        v.properties
            .get("entity_type")
            .is_some_and(|p| !p.enum_values.is_empty())
    });
    let has_ref = resolved.iter().any(|v| v.properties.contains_key("ref"));
    let inline_variant = resolved.iter().find(|v| v.properties.contains_key("inline"));

    if !both_have_entity_type || !has_ref {
        return None;
    }
    let inline_variant = inline_variant?;

    let target_type = inline_variant
        .properties
        .get("entity_type")?
        .enum_values
        .first()?
        .as_str()?
        .to_string();
    let inline_schema = inline_variant.properties.get("inline")?;

    match ctx.parse_schema(inline_schema, ctx.schema_name)? {
        node @ SerializedNode::Object { .. } => Some(SerializedNode::Link {
            target_type,
            inline_schema: Box::new(node),
            description: schema.description.clone(),
        }),
        _ => None,
    }
}

/// Classify a `oneOf`/`anyOf` as an untagged enum (every object variant wraps
/// exactly one property key) or a tagged union (a discriminator field that is
/// enum-valued in every object variant). An explicit
/// `discriminator.propertyName` always selects the tagged form, even when
/// every variant has a single wrapping key.
fn build_union(schema: &RawSchema, ctx: &PluginContext<'_, '_>) -> Option<SerializedNode> {
    let variants = schema.union_variants();

    let object_variants: Vec<&RawSchema> = variants
        .iter()
        .filter_map(|v| ctx.deref(v))
        .filter(|v| v.has_type(SchemaType::Object))
        .collect();

    let is_untagged = schema.discriminator.is_none()
        && !object_variants.is_empty()
        && object_variants.iter().all(|v| v.properties.len() == 1);

    let discriminator = if is_untagged {
        None
    } else {
        infer_discriminator(schema, &object_variants)
    };

    let mut out: Vec<UnionVariant> = Vec::new();

    for variant in variants {
        let Some(resolved) = ctx.deref(variant) else {
            continue;
        };
        if resolved.has_type(SchemaType::Null) {
            continue;
        }

        // Unit variant: a bare string enum inside a union.
        if resolved.has_type(SchemaType::String) {
            if let Some(tag) = resolved.string_enum_values().into_iter().next() {
                out.push(UnionVariant { tag, schema: SerializedNode::empty_object() });
            }
            continue;
        }

        if !resolved.has_type(SchemaType::Object) || resolved.properties.is_empty() {
            continue;
        }

        if is_untagged {
            // The single property key is the wrapping tag.
            let Some((tag, inner)) = resolved.properties.first() else {
                continue;
            };
            let parsed = ctx
                .parse_schema(inner, ctx.schema_name)
                .unwrap_or_else(SerializedNode::empty_object);
            out.push(UnionVariant { tag: tag.clone(), schema: parsed });
        } else if let Some(field) = discriminator.as_deref() {
            let Some(tag) = resolved
                .properties
                .get(field)
                .and_then(|p| p.string_enum_values().into_iter().next())
            else {
                continue;
            };

            let mut properties = IndexMap::new();
            for (prop_name, prop) in &resolved.properties {
                if prop_name == field {
                    continue;
                }
                if let Some(parsed) = ctx.parse_schema(prop, ctx.schema_name) {
                    properties.insert(prop_name.clone(), parsed);
                }
            }
            let required = resolved
                .required
                .iter()
                .filter(|r| r.as_str() != field)
                .cloned()
                .collect();

            out.push(UnionVariant {
                tag,
                schema: SerializedNode::Object {
                    properties,
                    required,
                    additional_properties: None,
                    description: None,
                },
            });
        }
    }

    if out.is_empty() {
        return None;
    }

    if is_untagged {
        Some(SerializedNode::UntaggedEnum {
            variants: out,
            description: schema.description.clone(),
        })
    } else {
        discriminator.map(|discriminator| SerializedNode::TaggedUnion {
            discriminator,
            variants: out,
            description: schema.description.clone(),
        })
    }
}

/// An explicit `discriminator.propertyName` wins; otherwise infer the first
/// property that is enum-valued in every object variant.
fn infer_discriminator(schema: &RawSchema, object_variants: &[&RawSchema]) -> Option<String> {
    if let Some(d) = &schema.discriminator {
        return Some(d.property_name.clone());
    }
    if object_variants.is_empty() {
        return None;
    }
    let first = object_variants.first()?;
    first
        .properties
        .keys()
        .find(|field| {
            object_variants.iter().all(|v| {
                v.properties
                    .get(*field)
                    .is_some_and(|p| !p.enum_values.is_empty())
            })
        })
        .cloned()
}

fn parse_array(schema: &RawSchema, ctx: &PluginContext<'_, '_>) -> SerializedNode {
    if !schema.prefix_items.is_empty() {
        let items: Vec<SerializedNode> = schema
            .prefix_items
            .iter()
            .filter_map(|item| ctx.parse_schema(item, ctx.schema_name))
            .collect();
        if items.len() == schema.prefix_items.len() {
            return SerializedNode::Tuple {
                items,
                description: schema.description.clone(),
            };
        }
    }

    let items = schema
        .items
        .as_deref()
        .and_then(|item| ctx.parse_schema(item, ctx.schema_name))
        .unwrap_or_else(|| SerializedNode::unknown(None));
    SerializedNode::Array {
        items: Box::new(items),
        description: schema.description.clone(),
    }
}

/// `type: object` with `additionalProperties` and no declared properties.
fn parse_map(schema: &RawSchema, ctx: &PluginContext<'_, '_>) -> Option<SerializedNode> {
    let Some(AdditionalProperties::Schema(value)) = &schema.additional_properties else {
        return None;
    };
    let value_schema = ctx.parse_schema(value, ctx.schema_name)?;
    Some(SerializedNode::Map {
        value_schema: Box::new(value_schema),
        description: schema.description.clone(),
    })
}

fn parse_object(schema: &RawSchema, ctx: &PluginContext<'_, '_>) -> SerializedNode {
    let mut properties = IndexMap::new();
    for (name, prop) in &schema.properties {
        // Siblings share the parent's schemaName scope so mutual references
        // within one declaration resolve against the same cycle guard.
        if let Some(parsed) = ctx.parse_schema(prop, ctx.schema_name) {
            properties.insert(name.clone(), parsed);
        }
    }

    let additional_properties = match &schema.additional_properties {
        Some(AdditionalProperties::Schema(value)) => ctx
            .parse_schema(value, ctx.schema_name)
            .map(Box::new),
        _ => None,
    };

    // Keep only required names that actually exist as properties.
    let required = schema
        .required
        .iter()
        .filter(|r| properties.contains_key(r.as_str()))
        .cloned()
        .collect();

    SerializedNode::Object {
        properties,
        required,
        additional_properties,
        description: schema.description.clone(),
    }
}

fn parse_scalar(schema: &RawSchema) -> Option<SerializedNode> {
    let primitive_type = match schema.schema_type.as_ref()? {
        TypeSet::Single(SchemaType::String) => PrimitiveType::String,
        TypeSet::Single(SchemaType::Number) => PrimitiveType::Number,
        TypeSet::Single(SchemaType::Integer) => PrimitiveType::Integer,
        TypeSet::Single(SchemaType::Boolean) => PrimitiveType::Boolean,
        _ => return None,
    };

    if !schema.enum_values.is_empty() {
        return Some(SerializedNode::Enum {
            values: schema.string_enum_values(),
            description: schema.description.clone(),
        });
    }

    Some(SerializedNode::Primitive {
        primitive_type,
        format: schema.format.clone(),
        minimum: schema.minimum,
        maximum: schema.maximum,
        description: schema.description.clone(),
    })
}
