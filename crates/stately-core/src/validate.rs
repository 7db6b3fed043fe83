use serde_json::Value;

use crate::nodes::{NodeMap, PrimitiveType, SerializedNode};

/// One validation failure, with a dotted/indexed path into the data.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self { valid: true, errors: Vec::new() }
    }

    fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self { valid: errors.is_empty(), errors }
    }

    fn fail(path: &str, message: impl Into<String>) -> Self {
        Self {
            valid: false,
            errors: vec![ValidationError { path: path.to_string(), message: message.into() }],
        }
    }
}

/// Recursion cutoff: deeper data is accepted rather than walked forever.
const MAX_DEPTH: usize = 20;

/// Validate a JSON value against a schema node.
///
/// `nodes` is the node map `recursiveRef` targets resolve against (merge main
/// and runtime bundles when both are loaded). `unknown` nodes always pass:
/// they mark shapes the generator could not classify and must never turn
/// into validation failures downstream.
pub fn validate_node(data: &Value, node: &SerializedNode, nodes: &NodeMap) -> ValidationResult {
    validate_at("$", data, node, nodes, 0)
}

fn validate_at(
    path: &str,
    data: &Value,
    node: &SerializedNode,
    nodes: &NodeMap,
    depth: usize,
) -> ValidationResult {
    if depth >= MAX_DEPTH {
        return ValidationResult::ok();
    }

    match node {
        SerializedNode::Unknown { .. } => ValidationResult::ok(),

        SerializedNode::Primitive { primitive_type, .. } => {
            validate_primitive(path, data, *primitive_type)
        }

        SerializedNode::Enum { values, .. } => match data.as_str() {
            Some(s) if values.iter().any(|v| v == s) => ValidationResult::ok(),
            Some(s) => ValidationResult::fail(path, format!("'{s}' is not a permitted value")),
            None => ValidationResult::fail(path, "expected an enum string"),
        },

        SerializedNode::Object { properties, required, .. } => {
            validate_object(path, data, properties, required, nodes, depth)
        }

        SerializedNode::Array { items, .. } => {
            let Some(elements) = data.as_array() else {
                return if data.is_null() {
                    ValidationResult::ok()
                } else {
                    ValidationResult::fail(path, "expected an array")
                };
            };
            let mut errors = Vec::new();
            for (i, element) in elements.iter().enumerate() {
                let item_path = format!("{path}[{i}]");
                errors.extend(validate_at(&item_path, element, items, nodes, depth + 1).errors);
            }
            ValidationResult::from_errors(errors)
        }

        SerializedNode::Map { value_schema, .. } => {
            let Some(entries) = data.as_object() else {
                return ValidationResult::ok();
            };
            let mut errors = Vec::new();
            for (key, value) in entries {
                let entry_path = format!("{path}.{key}");
                errors
                    .extend(validate_at(&entry_path, value, value_schema, nodes, depth + 1).errors);
            }
            ValidationResult::from_errors(errors)
        }

        SerializedNode::Tuple { items, .. } => {
            let Some(elements) = data.as_array() else {
                return ValidationResult::fail(path, "expected a tuple array");
            };
            if elements.len() != items.len() {
                return ValidationResult::fail(
                    path,
                    format!("expected {} elements, got {}", items.len(), elements.len()),
                );
            }
            let mut errors = Vec::new();
            for (i, (element, item)) in elements.iter().zip(items).enumerate() {
                let item_path = format!("{path}[{i}]");
                errors.extend(validate_at(&item_path, element, item, nodes, depth + 1).errors);
            }
            ValidationResult::from_errors(errors)
        }

        SerializedNode::TaggedUnion { discriminator, variants, .. } => {
            let Some(object) = data.as_object() else {
                return ValidationResult::ok();
            };
            let Some(tag) = object.get(discriminator).and_then(Value::as_str) else {
                return ValidationResult::fail(
                    &format!("{path}.{discriminator}"),
                    format!("missing discriminator field '{discriminator}'"),
                );
            };
            match variants.iter().find(|v| v.tag == tag) {
                Some(variant) => validate_at(path, data, &variant.schema, nodes, depth + 1),
                None => ValidationResult::fail(
                    &format!("{path}.{discriminator}"),
                    format!("unknown variant '{tag}' for discriminator '{discriminator}'"),
                ),
            }
        }

        SerializedNode::UntaggedEnum { variants, .. } => {
            let Some(object) = data.as_object() else {
                return ValidationResult::ok();
            };
            let Some((tag, inner)) = object.iter().next() else {
                return ValidationResult::ok();
            };
            match variants.iter().find(|v| &v.tag == tag) {
                Some(variant) => {
                    let variant_path = format!("{path}.{tag}");
                    validate_at(&variant_path, inner, &variant.schema, nodes, depth + 1)
                }
                None => ValidationResult::fail(
                    path,
                    format!("unknown variant '{tag}' in untagged enum"),
                ),
            }
        }

        SerializedNode::Nullable { inner_schema, .. } => {
            if data.is_null() {
                ValidationResult::ok()
            } else {
                validate_at(path, data, inner_schema, nodes, depth + 1)
            }
        }

        SerializedNode::Link { inline_schema, .. } => {
            // A link is either an entity id string or inline entity data.
            if data.is_string() {
                ValidationResult::ok()
            } else {
                validate_at(path, data, inline_schema, nodes, depth + 1)
            }
        }

        SerializedNode::RecursiveRef { ref_name, .. } => match nodes.get(ref_name) {
            Some(target) => validate_at(path, data, target, nodes, depth + 1),
            // Target lives in a bundle that isn't loaded: skip, don't fail.
            None => ValidationResult::ok(),
        },
    }
}

fn validate_object(
    path: &str,
    data: &Value,
    properties: &indexmap::IndexMap<String, SerializedNode>,
    required: &[String],
    nodes: &NodeMap,
    depth: usize,
) -> ValidationResult {
    let Some(object) = data.as_object() else {
        return ValidationResult::fail(path, "expected an object");
    };

    let mut errors = Vec::new();
    for name in required {
        if !object.contains_key(name) {
            errors.push(ValidationError {
                path: format!("{path}.{name}"),
                message: format!("missing required property '{name}'"),
            });
        }
    }
    for (name, prop_node) in properties {
        if let Some(value) = object.get(name) {
            let prop_path = format!("{path}.{name}");
            errors.extend(validate_at(&prop_path, value, prop_node, nodes, depth + 1).errors);
        }
    }
    ValidationResult::from_errors(errors)
}

fn validate_primitive(path: &str, data: &Value, primitive: PrimitiveType) -> ValidationResult {
    let ok = match primitive {
        PrimitiveType::String | PrimitiveType::Path => data.is_string(),
        PrimitiveType::Number => data.is_number(),
        PrimitiveType::Integer => data.is_i64() || data.is_u64(),
        PrimitiveType::Boolean => data.is_boolean(),
    };
    if ok {
        ValidationResult::ok()
    } else {
        ValidationResult::fail(path, format!("expected a {} value", primitive_name(primitive)))
    }
}

fn primitive_name(primitive: PrimitiveType) -> &'static str {
    match primitive {
        PrimitiveType::String => "string",
        PrimitiveType::Number => "number",
        PrimitiveType::Integer => "integer",
        PrimitiveType::Boolean => "boolean",
        PrimitiveType::Path => "path string",
    }
}
