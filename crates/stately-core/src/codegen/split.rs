use indexmap::{IndexMap, IndexSet};
use log::debug;

use crate::nodes::{NodeMap, SerializedNode};
use crate::openapi::schema::{AdditionalProperties, RawSchema};

/// The two bundles a generation run produces: eagerly-loaded `main` and
/// lazily-loaded `runtime`.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    pub main: NodeMap,
    pub runtime: NodeMap,
}

/// Name-level dependency edges between component schemas.
pub type DependencyGraph = IndexMap<String, IndexSet<String>>;

/// Collect the schema names each component schema references, walking
/// property/item/variant edges in the raw document. This is the edge set the
/// partitioner's reachability closure runs over.
pub fn schema_dependencies(schemas: &IndexMap<String, RawSchema>) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    for (name, schema) in schemas {
        let mut refs = IndexSet::new();
        collect_refs(schema, &mut refs);
        graph.insert(name.clone(), refs);
    }
    graph
}

fn collect_refs(schema: &RawSchema, out: &mut IndexSet<String>) {
    if let Some(ref_path) = &schema.ref_path {
        if let Some(name) = ref_path.rsplit('/').next() {
            out.insert(name.to_string());
        }
        return;
    }
    for prop in schema.properties.values() {
        collect_refs(prop, out);
    }
    if let Some(items) = &schema.items {
        collect_refs(items, out);
    }
    if let Some(AdditionalProperties::Schema(value)) = &schema.additional_properties {
        collect_refs(value, out);
    }
    for sub in schema
        .prefix_items
        .iter()
        .chain(&schema.one_of)
        .chain(&schema.any_of)
        .chain(&schema.all_of)
    {
        collect_refs(sub, out);
    }
}

/// Split a flat node map into main and runtime bundles.
///
/// With no entry points everything is main, the always-safe default. With
/// entry points, main is the reachability closure from the entry-point set
/// over `graph` (augmented with any `recursiveRef` edges found in the node
/// trees themselves), and runtime is the rest. The result is a pure
/// partition: every key of `nodes` lands in exactly one bundle.
pub fn partition(
    nodes: NodeMap,
    entry_points: &IndexSet<String>,
    graph: &DependencyGraph,
) -> ParseResult {
    if entry_points.is_empty() {
        return ParseResult { main: nodes, runtime: NodeMap::new() };
    }

    let mut edges: DependencyGraph = graph.clone();
    for (name, node) in &nodes {
        let targets = edges.entry(name.clone()).or_default();
        collect_node_refs(node, targets);
    }

    // Closure from the entry points; entry points missing from the map are
    // ignored (the parser already warned about them).
    let mut reachable: IndexSet<String> = IndexSet::new();
    let mut frontier: Vec<String> = entry_points
        .iter()
        .filter(|e| nodes.contains_key(e.as_str()))
        .cloned()
        .collect();
    while let Some(name) = frontier.pop() {
        if !reachable.insert(name.clone()) {
            continue;
        }
        if let Some(targets) = edges.get(&name) {
            for target in targets {
                if nodes.contains_key(target) && !reachable.contains(target) {
                    frontier.push(target.clone());
                }
            }
        }
    }

    let mut result = ParseResult::default();
    for (name, node) in nodes {
        if reachable.contains(&name) {
            result.main.insert(name, node);
        } else {
            debug!("runtime bundle: {name}");
            result.runtime.insert(name, node);
        }
    }
    result
}

/// Cross-schema edges visible inside a parsed node tree: `recursiveRef`
/// targets. Dependencies parsed inline carry no name, so the raw-schema graph
/// supplies the rest.
fn collect_node_refs(node: &SerializedNode, out: &mut IndexSet<String>) {
    match node {
        SerializedNode::RecursiveRef { ref_name, .. } => {
            out.insert(ref_name.clone());
        }
        SerializedNode::Object { properties, additional_properties, .. } => {
            for prop in properties.values() {
                collect_node_refs(prop, out);
            }
            if let Some(additional) = additional_properties {
                collect_node_refs(additional, out);
            }
        }
        SerializedNode::Array { items, .. } => collect_node_refs(items, out),
        SerializedNode::Map { value_schema, .. } => collect_node_refs(value_schema, out),
        SerializedNode::Tuple { items, .. } => {
            for item in items {
                collect_node_refs(item, out);
            }
        }
        SerializedNode::TaggedUnion { variants, .. }
        | SerializedNode::UntaggedEnum { variants, .. } => {
            for variant in variants {
                collect_node_refs(&variant.schema, out);
            }
        }
        SerializedNode::Nullable { inner_schema, .. } => collect_node_refs(inner_schema, out),
        SerializedNode::Link { inline_schema, .. } => collect_node_refs(inline_schema, out),
        SerializedNode::Primitive { .. }
        | SerializedNode::Enum { .. }
        | SerializedNode::Unknown { .. } => {}
    }
}
