use crate::error::PluginError;
use crate::nodes::SerializedNode;
use crate::openapi::schema::RawSchema;
use crate::openapi::spec::OpenApiSpec;

use super::parser::Parser;

/// A codegen plugin that transforms OpenAPI schemas to `SerializedNode`s.
///
/// Plugins are consulted in registration order; the first non-`None`
/// `transform` result wins and no merging of plugin outputs occurs. A plugin
/// must be a pure function of `(schema, ctx)`: it may recurse through
/// `ctx.parse_schema` but must not retain state across calls.
pub trait CodegenPlugin {
    /// Unique identifier for the plugin.
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> Option<&str> {
        None
    }

    /// Entry point schemas for code splitting. Entry points and their
    /// dependencies form the main bundle; everything else is split into a
    /// lazily-loaded runtime bundle. An empty result declares nothing.
    fn entry_points(&self, _spec: &OpenApiSpec) -> Vec<String> {
        Vec::new()
    }

    /// Fast filter deciding whether `transform` should run for a schema.
    /// Defaults to accepting everything.
    fn matches(&self, _schema: &RawSchema, _ctx: &PluginContext<'_, '_>) -> bool {
        true
    }

    /// Transform a schema into a node. `None` defers to the next plugin in
    /// the chain (and ultimately to the built-in dispatch).
    fn transform(&self, schema: &RawSchema, ctx: &PluginContext<'_, '_>)
    -> Option<SerializedNode>;
}

/// The API surface plugins see into the engine: the current schema name plus
/// ref resolution and recursive parsing. Plugins cannot reach the schema
/// cache or the in-progress recursion state directly.
pub struct PluginContext<'p, 'a> {
    pub(super) parser: &'p Parser<'a>,
    pub schema_name: Option<&'p str>,
}

impl<'p, 'a> PluginContext<'p, 'a> {
    /// Resolve a `$ref` string to its raw schema. `None` when the pointer
    /// does not resolve; plugins may probe speculative refs freely.
    pub fn resolve_ref(&self, ref_path: &str) -> Option<&'a RawSchema> {
        self.parser.resolve_ref(ref_path)
    }

    /// Recursively parse a nested schema with the core engine.
    pub fn parse_schema(
        &self,
        schema: &RawSchema,
        schema_name: Option<&str>,
    ) -> Option<SerializedNode> {
        self.parser.parse_schema(schema, schema_name)
    }

    /// Resolve a fragment's `$ref` if it has one, otherwise return it as-is.
    /// `None` when the ref does not resolve.
    pub fn deref<'s>(&self, schema: &'s RawSchema) -> Option<&'s RawSchema>
    where
        'a: 's,
    {
        match &schema.ref_path {
            Some(ref_path) => self.resolve_ref(ref_path),
            None => Some(schema),
        }
    }
}

/// Validating collection of plugins for one generation run.
///
/// Registration is where plugin problems surface: rejections carry a
/// descriptive reason instead of being silently filtered out.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn CodegenPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: Box<dyn CodegenPlugin>) -> Result<(), PluginError> {
        if plugin.name().is_empty() {
            return Err(PluginError::EmptyName);
        }
        if self.plugins.iter().any(|p| p.name() == plugin.name()) {
            return Err(PluginError::DuplicateName(plugin.name().to_string()));
        }
        self.plugins.push(plugin);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn into_plugins(self) -> Vec<Box<dyn CodegenPlugin>> {
        self.plugins
    }
}
