use indexmap::{IndexMap, IndexSet};

use stately_core::codegen::{
    self, CodegenPlugin, DependencyGraph, PluginContext, partition, schema_dependencies,
};
use stately_core::nodes::{NodeMap, PrimitiveType, SerializedNode};
use stately_core::openapi::{self, schema::RawSchema, spec::OpenApiSpec};

const APP_STATE: &str = include_str!("fixtures/app-state.yaml");

struct EntryPoints(Vec<&'static str>);

impl CodegenPlugin for EntryPoints {
    fn name(&self) -> &str {
        "test:entry-points"
    }

    fn entry_points(&self, _spec: &OpenApiSpec) -> Vec<String> {
        self.0.iter().map(|s| s.to_string()).collect()
    }

    fn transform(&self, _schema: &RawSchema, _ctx: &PluginContext<'_, '_>) -> Option<SerializedNode> {
        None
    }
}

fn generate_with_entries(entries: Vec<&'static str>) -> codegen::ParseResult {
    let spec = openapi::from_yaml(APP_STATE).expect("fixture should parse");
    codegen::generate(&spec, vec![Box::new(EntryPoints(entries))])
}

#[test]
fn no_entry_points_bundles_everything_as_main() {
    let spec = openapi::from_yaml(APP_STATE).unwrap();
    let result = codegen::generate(&spec, Vec::new());
    assert_eq!(result.main.len(), 6);
    assert!(result.runtime.is_empty());
}

#[test]
fn entry_point_closure_forms_the_main_bundle() {
    let result = generate_with_entries(vec!["Scene"]);

    let main: Vec<&str> = result.main.keys().map(String::as_str).collect();
    let runtime: Vec<&str> = result.runtime.keys().map(String::as_str).collect();
    assert_eq!(main, vec!["Scene", "Layer"]);
    assert_eq!(runtime, vec!["Entity", "AudioTrack", "Group", "Item"]);
}

#[test]
fn entry_point_reaches_through_union_variants() {
    let result = generate_with_entries(vec!["Entity"]);

    let main: Vec<&str> = result.main.keys().map(String::as_str).collect();
    assert_eq!(main, vec!["Entity", "Scene", "Layer", "AudioTrack"]);
    assert_eq!(result.runtime.len(), 2);
}

#[test]
fn mutual_recursion_keeps_both_schemas_together() {
    let result = generate_with_entries(vec!["Item"]);

    assert!(result.main.contains_key("Item"));
    assert!(result.main.contains_key("Group"));
    assert_eq!(result.main.len(), 2);
}

#[test]
fn partition_is_complete_and_disjoint() {
    let result = generate_with_entries(vec!["Scene"]);

    assert_eq!(result.main.len() + result.runtime.len(), 6);
    for name in result.main.keys() {
        assert!(!result.runtime.contains_key(name), "{name} landed in both bundles");
    }
}

#[test]
fn unknown_entry_points_are_ignored() {
    let with_ghost = generate_with_entries(vec!["Scene", "Ghost"]);
    let without = generate_with_entries(vec!["Scene"]);

    let a: Vec<&String> = with_ghost.main.keys().collect();
    let b: Vec<&String> = without.main.keys().collect();
    assert_eq!(a, b);
}

#[test]
fn schema_dependencies_walks_nested_fragments() {
    let spec = openapi::from_yaml(APP_STATE).unwrap();
    let graph = schema_dependencies(&spec.component_schemas());

    assert!(graph["Entity"].contains("Scene"));
    assert!(graph["Entity"].contains("AudioTrack"));
    assert!(graph["Scene"].contains("Layer"));
    assert!(graph["Layer"].contains("Layer"));
    assert!(graph["AudioTrack"].is_empty());
}

#[test]
fn recursive_ref_edges_augment_the_graph() {
    // A node tree carrying a recursiveRef edge the raw graph doesn't know.
    let mut nodes = NodeMap::new();
    nodes.insert(
        "Root".to_string(),
        SerializedNode::Array {
            items: Box::new(SerializedNode::RecursiveRef {
                ref_name: "Leaf".to_string(),
                description: None,
            }),
            description: None,
        },
    );
    nodes.insert("Leaf".to_string(), SerializedNode::primitive(PrimitiveType::String));
    nodes.insert("Stray".to_string(), SerializedNode::primitive(PrimitiveType::Boolean));

    let graph: DependencyGraph = IndexMap::new();
    let entries: IndexSet<String> = ["Root".to_string()].into_iter().collect();
    let result = partition(nodes, &entries, &graph);

    assert!(result.main.contains_key("Root"));
    assert!(result.main.contains_key("Leaf"));
    assert!(result.runtime.contains_key("Stray"));
}
