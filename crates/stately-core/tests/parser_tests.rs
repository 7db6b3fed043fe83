use stately_core::codegen::{CodegenPlugin, CorePlugin, Parser, PluginContext, RelativePathPlugin};
use stately_core::nodes::{NodeMap, PrimitiveType, SerializedNode};
use stately_core::openapi::{self, schema::RawSchema};

const APP_STATE: &str = include_str!("fixtures/app-state.yaml");
const SHAPES: &str = include_str!("fixtures/shapes.yaml");

fn core_only() -> Vec<Box<dyn CodegenPlugin>> {
    vec![Box::new(CorePlugin)]
}

fn parse_fixture(yaml: &str, plugins: &[Box<dyn CodegenPlugin>]) -> NodeMap {
    let spec = openapi::from_yaml(yaml).expect("fixture should parse");
    let schemas = spec.component_schemas();
    let parser = Parser::new(&schemas, plugins);
    parser.parse_components()
}

#[test]
fn parses_every_component_schema() {
    let nodes = parse_fixture(APP_STATE, &core_only());
    assert_eq!(nodes.len(), 6);
    for name in ["Entity", "Scene", "Layer", "AudioTrack", "Group", "Item"] {
        assert!(nodes.contains_key(name), "missing node for {name}");
    }
}

#[test]
fn self_recursive_schema_terminates_with_recursive_ref() {
    let nodes = parse_fixture(APP_STATE, &core_only());

    let SerializedNode::Object { properties, .. } = &nodes["Layer"] else {
        panic!("Layer should be an object");
    };
    let SerializedNode::Array { items, .. } = &properties["children"] else {
        panic!("children should be an array");
    };
    assert_eq!(
        **items,
        SerializedNode::RecursiveRef { ref_name: "Layer".to_string(), description: None }
    );
}

#[test]
fn mutually_recursive_schemas_terminate() {
    let spec = openapi::from_yaml(APP_STATE).unwrap();
    let schemas = spec.component_schemas();
    let plugins = core_only();
    let parser = Parser::new(&schemas, &plugins);
    let nodes = parser.parse_components();

    // Group is parsed first, so Item's back-edge is the one that breaks.
    let SerializedNode::Object { properties, .. } = &nodes["Item"] else {
        panic!("Item should be an object");
    };
    assert_eq!(
        properties["parent"],
        SerializedNode::RecursiveRef { ref_name: "Group".to_string(), description: None }
    );

    let targets = parser.recursion_targets();
    assert!(targets.contains("Group"));
    assert!(targets.contains("Layer"));
}

#[test]
fn resolve_ref_is_idempotent() {
    let spec = openapi::from_yaml(APP_STATE).unwrap();
    let schemas = spec.component_schemas();
    let plugins = core_only();
    let parser = Parser::new(&schemas, &plugins);

    let first = parser.resolve_ref("#/components/schemas/Scene");
    let second = parser.resolve_ref("#/components/schemas/Scene");
    assert!(first.is_some());
    assert_eq!(first, second);

    assert!(parser.resolve_ref("#/components/schemas/Missing").is_none());
    assert!(parser.resolve_ref("#/components/schemas/Missing").is_none());
    assert!(parser.resolve_ref("not-a-pointer").is_none());
}

#[test]
fn unresolved_ref_degrades_to_unknown() {
    let yaml = r##"
openapi: "3.1.0"
info:
  title: Broken
  version: "1.0"
components:
  schemas:
    Holder:
      type: object
      properties:
        gone:
          $ref: "#/components/schemas/DoesNotExist"
"##;
    let nodes = parse_fixture(yaml, &core_only());
    let SerializedNode::Object { properties, .. } = &nodes["Holder"] else {
        panic!("Holder should be an object");
    };
    // The broken ref costs fidelity, not the run.
    assert_eq!(properties["gone"], SerializedNode::unknown(None));
}

#[test]
fn plain_object_with_required_properties() {
    let yaml = r#"
openapi: "3.1.0"
info:
  title: Example
  version: "1.0"
components:
  schemas:
    Example:
      type: object
      required: [name, count]
      properties:
        name:
          type: string
        count:
          type: integer
"#;
    let nodes = parse_fixture(yaml, &core_only());
    let SerializedNode::Object { properties, required, .. } = &nodes["Example"] else {
        panic!("Example should be an object");
    };
    assert_eq!(required, &["name".to_string(), "count".to_string()]);
    assert_eq!(properties["name"], SerializedNode::primitive(PrimitiveType::String));
    assert_eq!(properties["count"], SerializedNode::primitive(PrimitiveType::Integer));
}

struct StringifyEverything;

impl CodegenPlugin for StringifyEverything {
    fn name(&self) -> &str {
        "test:stringify"
    }

    fn transform(&self, _schema: &RawSchema, _ctx: &PluginContext<'_, '_>) -> Option<SerializedNode> {
        Some(SerializedNode::primitive(PrimitiveType::String))
    }
}

#[test]
fn user_plugin_wins_over_builtin_dispatch() {
    let plugins: Vec<Box<dyn CodegenPlugin>> =
        vec![Box::new(StringifyEverything), Box::new(CorePlugin)];
    let nodes = parse_fixture(APP_STATE, &plugins);
    assert_eq!(nodes["Scene"], SerializedNode::primitive(PrimitiveType::String));
}

struct DeferringPlugin;

impl CodegenPlugin for DeferringPlugin {
    fn name(&self) -> &str {
        "test:defer"
    }

    fn transform(&self, _schema: &RawSchema, _ctx: &PluginContext<'_, '_>) -> Option<SerializedNode> {
        None
    }
}

#[test]
fn deferring_plugin_falls_through_to_builtin_dispatch() {
    let plugins: Vec<Box<dyn CodegenPlugin>> =
        vec![Box::new(DeferringPlugin), Box::new(CorePlugin)];
    let nodes = parse_fixture(APP_STATE, &plugins);
    assert_eq!(nodes["Scene"].node_type(), "object");
}

#[test]
fn nullable_from_type_array() {
    let nodes = parse_fixture(APP_STATE, &core_only());
    let SerializedNode::Object { properties, .. } = &nodes["AudioTrack"] else {
        panic!("AudioTrack should be an object");
    };
    let SerializedNode::Nullable { inner_schema, .. } = &properties["label"] else {
        panic!("label should be nullable, got {:?}", properties["label"]);
    };
    assert_eq!(**inner_schema, SerializedNode::primitive(PrimitiveType::String));
}

#[test]
fn nullable_from_null_variant_union() {
    let nodes = parse_fixture(SHAPES, &core_only());
    let SerializedNode::Nullable { inner_schema, .. } = &nodes["NullableName"] else {
        panic!("NullableName should be nullable");
    };
    assert_eq!(**inner_schema, SerializedNode::primitive(PrimitiveType::String));
}

#[test]
fn string_enum_becomes_enum_node() {
    let nodes = parse_fixture(SHAPES, &core_only());
    assert_eq!(
        nodes["Mode"],
        SerializedNode::Enum {
            values: vec!["auto".to_string(), "manual".to_string()],
            description: None,
        }
    );
}

#[test]
fn single_property_variants_classify_as_untagged_enum() {
    let nodes = parse_fixture(SHAPES, &core_only());
    let SerializedNode::UntaggedEnum { variants, .. } = &nodes["Transform"] else {
        panic!("Transform should be an untagged enum, got {:?}", nodes["Transform"]);
    };
    let tags: Vec<&str> = variants.iter().map(|v| v.tag.as_str()).collect();
    assert_eq!(tags, vec!["translate", "rotate"]);
    assert_eq!(variants[0].schema.node_type(), "object");
    assert_eq!(variants[1].schema.node_type(), "primitive");
}

#[test]
fn explicit_discriminator_classifies_as_tagged_union() {
    let nodes = parse_fixture(SHAPES, &core_only());
    let SerializedNode::TaggedUnion { discriminator, variants, .. } = &nodes["Shape"] else {
        panic!("Shape should be a tagged union");
    };
    assert_eq!(discriminator, "kind");

    let circle = variants.iter().find(|v| v.tag == "circle").expect("circle variant");
    let SerializedNode::Object { properties, required, .. } = &circle.schema else {
        panic!("variant schema should be an object");
    };
    // The discriminator field is stripped from the variant payload.
    assert!(!properties.contains_key("kind"));
    assert!(properties.contains_key("radius"));
    assert_eq!(required, &["radius".to_string()]);
}

#[test]
fn explicit_discriminator_beats_wrapping_key_classification() {
    let yaml = r#"
openapi: "3.1.0"
info:
  title: Events
  version: "1.0"
components:
  schemas:
    Event:
      discriminator:
        propertyName: kind
      oneOf:
        - type: object
          properties:
            kind:
              type: string
              enum: [started]
        - type: object
          properties:
            kind:
              type: string
              enum: [stopped]
"#;
    let nodes = parse_fixture(yaml, &core_only());

    // Every variant has a single property, but the declared discriminator
    // still selects the tagged form.
    let SerializedNode::TaggedUnion { discriminator, variants, .. } = &nodes["Event"] else {
        panic!("Event should be a tagged union, got {:?}", nodes["Event"]);
    };
    assert_eq!(discriminator, "kind");
    let tags: Vec<&str> = variants.iter().map(|v| v.tag.as_str()).collect();
    assert_eq!(tags, vec!["started", "stopped"]);
}

#[test]
fn inferred_discriminator_without_explicit_keyword() {
    let nodes = parse_fixture(APP_STATE, &core_only());
    let SerializedNode::TaggedUnion { discriminator, variants, .. } = &nodes["Entity"] else {
        panic!("Entity should be a tagged union, got {:?}", nodes["Entity"]);
    };
    assert_eq!(discriminator, "type");
    let tags: Vec<&str> = variants.iter().map(|v| v.tag.as_str()).collect();
    assert_eq!(tags, vec!["scene", "audioTrack"]);
}

#[test]
fn prefix_items_classify_as_tuple() {
    let nodes = parse_fixture(SHAPES, &core_only());
    let SerializedNode::Tuple { items, .. } = &nodes["Point"] else {
        panic!("Point should be a tuple");
    };
    assert_eq!(items.len(), 2);
    assert_eq!(items[0], SerializedNode::primitive(PrimitiveType::Number));
}

#[test]
fn additional_properties_only_object_classifies_as_map() {
    let nodes = parse_fixture(SHAPES, &core_only());
    let SerializedNode::Map { value_schema, .. } = &nodes["Tags"] else {
        panic!("Tags should be a map");
    };
    assert_eq!(**value_schema, SerializedNode::primitive(PrimitiveType::String));
}

#[test]
fn plain_array_keeps_item_schema() {
    let nodes = parse_fixture(SHAPES, &core_only());
    let SerializedNode::Array { items, .. } = &nodes["Samples"] else {
        panic!("Samples should be an array");
    };
    assert_eq!(**items, SerializedNode::primitive(PrimitiveType::Number));
}

#[test]
fn all_of_merges_properties_and_required() {
    let nodes = parse_fixture(SHAPES, &core_only());
    let SerializedNode::Object { properties, required, .. } = &nodes["Merged"] else {
        panic!("Merged should be an object");
    };
    let keys: Vec<&str> = properties.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["a", "b"]);
    assert_eq!(required, &["a".to_string()]);
}

#[test]
fn ref_or_inline_pair_classifies_as_link() {
    let nodes = parse_fixture(SHAPES, &core_only());
    let SerializedNode::Link { target_type, inline_schema, .. } = &nodes["SceneLink"] else {
        panic!("SceneLink should be a link, got {:?}", nodes["SceneLink"]);
    };
    assert_eq!(target_type, "scene");
    assert_eq!(inline_schema.node_type(), "object");
}

#[test]
fn unclassifiable_schema_degrades_to_unknown() {
    let nodes = parse_fixture(SHAPES, &core_only());
    assert_eq!(nodes["Mystery"], SerializedNode::unknown(None));
}

#[test]
fn numeric_bounds_carry_through_to_primitive_nodes() {
    let nodes = parse_fixture(APP_STATE, &core_only());
    let SerializedNode::Object { properties, .. } = &nodes["Layer"] else {
        panic!("Layer should be an object");
    };
    let SerializedNode::Primitive { primitive_type, minimum, maximum, .. } = &properties["opacity"]
    else {
        panic!("opacity should be a primitive");
    };
    assert_eq!(*primitive_type, PrimitiveType::Number);
    assert_eq!(*minimum, Some(0.0));
    assert_eq!(*maximum, Some(1.0));
}

#[test]
fn relative_path_plugin_collapses_dir_unions() {
    let plugins: Vec<Box<dyn CodegenPlugin>> =
        vec![Box::new(RelativePathPlugin), Box::new(CorePlugin)];
    let nodes = parse_fixture(SHAPES, &plugins);

    for name in ["RelativePath", "UserPath"] {
        let SerializedNode::Primitive { primitive_type, .. } = &nodes[name] else {
            panic!("{name} should be a path primitive, got {:?}", nodes[name]);
        };
        assert_eq!(*primitive_type, PrimitiveType::Path);
    }
}

#[test]
fn dir_union_stays_tagged_without_the_plugin() {
    let nodes = parse_fixture(SHAPES, &core_only());
    let SerializedNode::TaggedUnion { discriminator, variants, .. } = &nodes["RelativePath"] else {
        panic!("RelativePath should fall back to a tagged union");
    };
    assert_eq!(discriminator, "dir");
    assert_eq!(variants.len(), 4);
}
