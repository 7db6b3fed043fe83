use stately_core::codegen::ParseResult;
use stately_core::{CodeGenerator, GeneratedFile};
use thiserror::Error;

use crate::emitters;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("template render failed: {0}")]
    Render(String),
    #[error("schema serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Configuration for the TypeScript generator.
#[derive(Debug, Clone, Default)]
pub struct TypeScriptConfig {
    /// Subdirectory of the output root the modules are written under.
    pub source_dir: Option<String>,
}

impl TypeScriptConfig {
    fn source_path(&self, file: &str) -> String {
        match &self.source_dir {
            Some(dir) => format!("{}/{}", dir.trim_end_matches('/'), file),
            None => file.to_string(),
        }
    }
}

/// TypeScript schema-module generator.
pub struct TypeScriptGenerator;

impl CodeGenerator for TypeScriptGenerator {
    type Config = TypeScriptConfig;
    type Error = EmitError;

    fn generate(
        &self,
        result: &ParseResult,
        config: &Self::Config,
    ) -> Result<Vec<GeneratedFile>, Self::Error> {
        log::debug!(
            "emitting {} main and {} runtime schemas",
            result.main.len(),
            result.runtime.len()
        );

        let mut files = vec![GeneratedFile {
            path: config.source_path("schemas.ts"),
            content: emitters::schemas::emit_schemas(&result.main)?,
        }];

        if !result.runtime.is_empty() {
            files.push(GeneratedFile {
                path: config.source_path("schemas.runtime.ts"),
                content: emitters::schemas::emit_runtime_schemas(&result.runtime)?,
            });
        }

        Ok(files)
    }
}
