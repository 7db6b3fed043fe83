//! TypeScript emitter for parsed schema nodes.
//!
//! Renders the main and runtime node maps into `schemas.ts` and
//! `schemas.runtime.ts` modules consumed by the UI runtime.

pub mod emitters;
mod generator;

pub use generator::{EmitError, TypeScriptConfig, TypeScriptGenerator};
