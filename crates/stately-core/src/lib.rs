pub mod codegen;
pub mod config;
pub mod entity;
pub mod error;
pub mod nodes;
pub mod openapi;
pub mod validate;

/// A generated file with path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Trait for code generators that serialize a parse result to output files.
pub trait CodeGenerator {
    type Config;
    type Error: std::error::Error;
    fn generate(
        &self,
        result: &codegen::ParseResult,
        config: &Self::Config,
    ) -> Result<Vec<GeneratedFile>, Self::Error>;
}
