use minijinja::{Environment, context};
use stately_core::nodes::NodeMap;

use crate::generator::EmitError;

/// Emit `schemas.ts` containing the eagerly-loaded schema map.
pub fn emit_schemas(nodes: &NodeMap) -> Result<String, EmitError> {
    render("schemas.ts.j2", include_str!("../../templates/schemas.ts.j2"), nodes)
}

/// Emit `schemas.runtime.ts` containing the lazily-loaded schema map.
pub fn emit_runtime_schemas(nodes: &NodeMap) -> Result<String, EmitError> {
    render(
        "schemas.runtime.ts.j2",
        include_str!("../../templates/schemas.runtime.ts.j2"),
        nodes,
    )
}

fn render(name: &str, source: &str, nodes: &NodeMap) -> Result<String, EmitError> {
    let mut env = Environment::new();
    env.add_template(name, source)
        .expect("template should be valid");
    let tmpl = env.get_template(name).expect("template was just added");

    let schemas = serde_json::to_string_pretty(nodes)?;

    tmpl.render(context! { schemas => schemas })
        .map_err(|e| EmitError::Render(e.to_string()))
}
