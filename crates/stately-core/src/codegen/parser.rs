use std::cell::RefCell;
use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};

use crate::nodes::{NodeMap, SerializedNode};
use crate::openapi::schema::RawSchema;

use super::plugin::{CodegenPlugin, PluginContext};

pub(super) const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Parse state of one component schema, keyed by its `$ref` string.
#[derive(Debug, Clone, PartialEq)]
enum CacheState {
    Uninitialized,
    /// A parse for this schema is on the active call stack. Seeing this state
    /// on a `$ref` dereference means a cycle.
    Parsing,
    Complete(SerializedNode),
}

/// Per-run schema parser: ref resolution, cycle detection, plugin dispatch.
///
/// All mutable state (the schema cache, the recursion set, the ref memo) is
/// scoped to this struct and therefore to one generation run. Plugins re-enter
/// the parser through [`PluginContext`], hence the interior mutability; every
/// cache borrow is dropped before recursing.
pub struct Parser<'a> {
    schemas: &'a IndexMap<String, RawSchema>,
    plugins: &'a [Box<dyn CodegenPlugin>],
    cache: RefCell<HashMap<String, CacheState>>,
    /// Memoized ref-string → schema-name resolution.
    ref_memo: RefCell<HashMap<String, Option<String>>>,
    /// Schema names revisited while still being parsed (cycle targets).
    reached_via_recursion: RefCell<IndexSet<String>>,
}

impl<'a> Parser<'a> {
    pub fn new(
        schemas: &'a IndexMap<String, RawSchema>,
        plugins: &'a [Box<dyn CodegenPlugin>],
    ) -> Self {
        let mut cache = HashMap::new();
        for name in schemas.keys() {
            cache.insert(format!("{SCHEMA_REF_PREFIX}{name}"), CacheState::Uninitialized);
        }
        Self {
            schemas,
            plugins,
            cache: RefCell::new(cache),
            ref_memo: RefCell::new(HashMap::new()),
            reached_via_recursion: RefCell::new(IndexSet::new()),
        }
    }

    /// Resolve a JSON-pointer-style `$ref` to its component schema.
    ///
    /// Returns `None` (never an error) when the pointer does not resolve;
    /// plugins probe speculative refs and callers treat this as "skip".
    pub fn resolve_ref(&self, ref_path: &str) -> Option<&'a RawSchema> {
        if let Some(memoized) = self.ref_memo.borrow().get(ref_path) {
            return memoized.as_deref().and_then(|name| self.schemas.get(name));
        }
        let name = parse_ref_name(ref_path).map(str::to_string);
        let resolved = name.as_deref().and_then(|n| self.schemas.get(n));
        self.ref_memo
            .borrow_mut()
            .insert(ref_path.to_string(), name.filter(|_| resolved.is_some()));
        resolved
    }

    /// Parse one raw schema fragment into a node.
    ///
    /// Never fails on malformed input: unrecognized shapes and unresolvable
    /// `$ref`s degrade to `unknown` nodes.
    pub fn parse_schema(
        &self,
        schema: &RawSchema,
        schema_name: Option<&str>,
    ) -> Option<SerializedNode> {
        if let Some(ref_path) = schema.ref_path.as_deref() {
            return self.parse_ref(ref_path, schema.description.clone(), schema_name);
        }

        // Plugins take precedence over built-in shape inference; the built-in
        // dispatch sits at the end of the chain.
        for plugin in self.plugins {
            let ctx = PluginContext { parser: self, schema_name };
            if !plugin.matches(schema, &ctx) {
                continue;
            }
            if let Some(node) = plugin.transform(schema, &ctx) {
                return Some(node);
            }
        }

        // No plugin recognized the shape. Unknown nodes are skipped by the
        // downstream validation pipeline, never rejected.
        Some(SerializedNode::unknown(schema.description.clone()))
    }

    fn parse_ref(
        &self,
        ref_path: &str,
        description: Option<String>,
        schema_name: Option<&str>,
    ) -> Option<SerializedNode> {
        let state = self.cache.borrow().get(ref_path).cloned();
        match state {
            Some(CacheState::Parsing) => {
                let ref_name = ref_path.rsplit('/').next().unwrap_or_default().to_string();
                debug!("circular reference detected: {ref_path}");
                self.reached_via_recursion.borrow_mut().insert(ref_name.clone());
                Some(SerializedNode::RecursiveRef { ref_name, description })
            }
            Some(CacheState::Complete(node)) => Some(node),
            Some(CacheState::Uninitialized) => {
                let resolved = self.resolve_ref(ref_path)?;
                self.cache
                    .borrow_mut()
                    .insert(ref_path.to_string(), CacheState::Parsing);
                let parsed = self.parse_schema(resolved, schema_name);
                // Cache even a failed parse as unknown so repeated refs to a
                // broken schema resolve to a stable node.
                let node = parsed.unwrap_or_else(|| SerializedNode::unknown(None));
                self.cache
                    .borrow_mut()
                    .insert(ref_path.to_string(), CacheState::Complete(node.clone()));
                Some(node)
            }
            None => {
                // Ref outside the component schema section.
                match self.resolve_ref(ref_path) {
                    Some(resolved) => self.parse_schema(resolved, schema_name),
                    None => {
                        warn!("could not resolve reference, treating as unknown: {ref_path}");
                        Some(SerializedNode::unknown(description))
                    }
                }
            }
        }
    }

    /// Parse every component schema into a flat node map.
    pub fn parse_components(&self) -> NodeMap {
        let mut nodes = NodeMap::new();
        for (name, schema) in self.schemas {
            debug!("parsing {name}");

            let ref_path = format!("{SCHEMA_REF_PREFIX}{name}");
            let cached = self.cache.borrow().get(&ref_path).cloned();
            if let Some(CacheState::Complete(node)) = cached {
                nodes.insert(name.clone(), node);
                continue;
            }

            self.cache
                .borrow_mut()
                .insert(ref_path.clone(), CacheState::Parsing);
            match self.parse_schema(schema, Some(name)) {
                Some(node) => {
                    self.cache
                        .borrow_mut()
                        .insert(ref_path, CacheState::Complete(node.clone()));
                    nodes.insert(name.clone(), node);
                }
                None => {
                    self.cache.borrow_mut().insert(ref_path, CacheState::Uninitialized);
                    warn!("failed to parse {name}");
                }
            }
        }
        nodes
    }

    /// Schema names that were revisited within an active resolution chain,
    /// i.e. the targets of emitted `recursiveRef` nodes.
    pub fn recursion_targets(&self) -> IndexSet<String> {
        self.reached_via_recursion.borrow().clone()
    }
}

/// Extract the schema name from `#/components/schemas/Foo`.
fn parse_ref_name(ref_path: &str) -> Option<&str> {
    ref_path.strip_prefix(SCHEMA_REF_PREFIX).filter(|n| !n.is_empty())
}
