use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Primitive data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Number,
    Integer,
    Boolean,
    /// Emitted by the relative-path plugin, never by built-in dispatch.
    Path,
}

/// One branch of a tagged union or untagged enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionVariant {
    pub tag: String,
    pub schema: SerializedNode,
}

/// The canonical typed representation of one OpenAPI schema fragment.
///
/// This is the wire format consumed by the Stately UI runtime: the
/// `nodeType` tag and per-variant field names are a downstream contract and
/// must not change. Nodes are constructed once per schema per generation run
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "nodeType", rename_all = "camelCase")]
pub enum SerializedNode {
    #[serde(rename_all = "camelCase")]
    Primitive {
        primitive_type: PrimitiveType,
        #[serde(skip_serializing_if = "Option::is_none")]
        format: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        minimum: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        maximum: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },

    Enum {
        values: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },

    #[serde(rename_all = "camelCase")]
    Object {
        /// Insertion order matches declaration order in the source document.
        properties: IndexMap<String, SerializedNode>,
        required: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        additional_properties: Option<Box<SerializedNode>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },

    Array {
        items: Box<SerializedNode>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },

    #[serde(rename_all = "camelCase")]
    Map {
        value_schema: Box<SerializedNode>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },

    Tuple {
        items: Vec<SerializedNode>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },

    TaggedUnion {
        discriminator: String,
        variants: Vec<UnionVariant>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },

    UntaggedEnum {
        variants: Vec<UnionVariant>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },

    #[serde(rename_all = "camelCase")]
    Nullable {
        inner_schema: Box<SerializedNode>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },

    #[serde(rename_all = "camelCase")]
    Link {
        target_type: String,
        inline_schema: Box<SerializedNode>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },

    #[serde(rename_all = "camelCase")]
    RecursiveRef {
        ref_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },

    /// Passthrough marker for shapes no plugin recognizes. Downstream
    /// validation skips these rather than failing.
    Unknown {
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl SerializedNode {
    pub fn unknown(description: Option<String>) -> Self {
        SerializedNode::Unknown { description }
    }

    pub fn primitive(primitive_type: PrimitiveType) -> Self {
        SerializedNode::Primitive {
            primitive_type,
            format: None,
            minimum: None,
            maximum: None,
            description: None,
        }
    }

    /// An object node with no properties, used for unit union variants.
    pub fn empty_object() -> Self {
        SerializedNode::Object {
            properties: IndexMap::new(),
            required: Vec::new(),
            additional_properties: None,
            description: None,
        }
    }

    pub fn node_type(&self) -> &'static str {
        match self {
            SerializedNode::Primitive { .. } => "primitive",
            SerializedNode::Enum { .. } => "enum",
            SerializedNode::Object { .. } => "object",
            SerializedNode::Array { .. } => "array",
            SerializedNode::Map { .. } => "map",
            SerializedNode::Tuple { .. } => "tuple",
            SerializedNode::TaggedUnion { .. } => "taggedUnion",
            SerializedNode::UntaggedEnum { .. } => "untaggedEnum",
            SerializedNode::Nullable { .. } => "nullable",
            SerializedNode::Link { .. } => "link",
            SerializedNode::RecursiveRef { .. } => "recursiveRef",
            SerializedNode::Unknown { .. } => "unknown",
        }
    }
}

/// An ordered schema-name → node map.
pub type NodeMap = IndexMap<String, SerializedNode>;
