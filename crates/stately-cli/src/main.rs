use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use stately_core::codegen::{
    self, CodegenPlugin, CorePlugin, load_plugins_from_config, partition, schema_dependencies,
};
use stately_core::config::{self, CONFIG_FILE_NAME, StatelyConfig};
use stately_core::entity;
use stately_core::openapi::{self, spec::OpenApiSpec};
use stately_core::{CodeGenerator, GeneratedFile};
use stately_typescript::{TypeScriptConfig, TypeScriptGenerator};

#[derive(Parser)]
#[command(name = "stately", about = "OpenAPI schema-node code generator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate schema modules from an OpenAPI document
    Generate {
        /// Path to the OpenAPI document (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory for the generated modules
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to a plugin config file (YAML list of plugin names)
        #[arg(long)]
        plugin_config: Option<PathBuf>,
    },

    /// Validate an OpenAPI document
    Validate {
        /// Path to the OpenAPI document
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Inspect the parsed schema nodes of an OpenAPI document
    Inspect {
        /// Path to the OpenAPI document
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new stately configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output,
            plugin_config,
        } => cmd_generate(input, output, plugin_config),

        Commands::Validate { input } => cmd_validate(input),

        Commands::Inspect { input, format } => cmd_inspect(input, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "stately", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<StatelyConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

fn load_spec(path: &Path) -> Result<OpenApiSpec> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let spec = match ext {
        "yaml" | "yml" => openapi::from_yaml(&content)?,
        _ => openapi::from_json(&content)?,
    };
    Ok(spec)
}

/// Write generated files to disk under the given base directory.
fn write_files(base: &Path, files: &[GeneratedFile]) -> Result<()> {
    for file in files {
        let path = base.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  wrote {}", path.display());
    }
    Ok(())
}

/// Generate the "do not edit" README.
fn readme_content() -> &'static str {
    r#"# Generated Code — Do Not Edit

This directory is **auto-generated** by `stately`.
Any manual changes will be overwritten the next time `stately generate` is run.

To regenerate, run:
```
stately generate
```

To customize the generated output, edit your `.stately.yaml` configuration file.
"#
}

fn cmd_generate(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    plugin_config: Option<PathBuf>,
) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let output_dir = output.unwrap_or_else(|| PathBuf::from(&cfg.output));
    let plugin_config = plugin_config.or_else(|| cfg.plugin_config.as_ref().map(PathBuf::from));

    let spec = load_spec(&input)?;
    let plugins = load_plugins_from_config(plugin_config.as_deref());
    let result = codegen::generate(&spec, plugins);

    eprintln!("Generating schemas → {}", output_dir.display());
    let files = TypeScriptGenerator
        .generate(&result, &TypeScriptConfig::default())
        .map_err(|e| anyhow::anyhow!(e))?;

    fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    write_files(&output_dir, &files)?;

    let readme_path = output_dir.join("README.md");
    fs::write(&readme_path, readme_content())
        .with_context(|| format!("failed to write {}", readme_path.display()))?;
    eprintln!("  wrote {}", readme_path.display());

    log::info!("type declarations (types.ts) are produced by the external openapi-typescript step");

    eprintln!(
        "Generated {} files in {}",
        files.len() + 1, // +1 for README
        output_dir.display()
    );

    eprintln!("\nThe generated directory should not be edited manually — changes will be overwritten.");
    Ok(())
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let spec = load_spec(&input)?;

    eprintln!("Valid OpenAPI {} document: {}", spec.openapi, spec.info.title);
    eprintln!("  Version: {}", spec.info.version);
    eprintln!("  Paths: {}", spec.paths.len());

    if let Some(ref components) = spec.components {
        eprintln!("  Schemas: {}", components.schemas.len());
    }

    // Also confirm every component schema parses to a node.
    let result = codegen::generate(&spec, Vec::new());
    eprintln!(
        "  Parsed nodes: {} main, {} runtime",
        result.main.len(),
        result.runtime.len()
    );

    if let Ok(mappings) = entity::entity_mappings(&spec) {
        eprintln!("  Entity mappings: {}", mappings.len());
    }

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(input: PathBuf, format: InspectFormat) -> Result<()> {
    let spec = load_spec(&input)?;

    let plugins: Vec<Box<dyn CodegenPlugin>> = vec![Box::new(CorePlugin)];
    let schemas = spec.component_schemas();
    let entry_points = codegen::collect_entry_points(&spec, &plugins);

    let parser = codegen::Parser::new(&schemas, &plugins);
    let nodes = parser.parse_components();
    let recursion_targets = parser.recursion_targets();

    let graph = schema_dependencies(&schemas);
    let result = partition(nodes, &entry_points, &graph);

    let summary = serde_json::json!({
        "info": {
            "title": spec.info.title,
            "version": spec.info.version,
        },
        "schemas": result
            .main
            .iter()
            .chain(result.runtime.iter())
            .map(|(name, node)| {
                serde_json::json!({
                    "name": name,
                    "nodeType": node.node_type(),
                })
            })
            .collect::<Vec<_>>(),
        "entryPoints": entry_points.iter().collect::<Vec<_>>(),
        "recursionTargets": recursion_targets.iter().collect::<Vec<_>>(),
        "bundles": {
            "main": result.main.len(),
            "runtime": result.runtime.len(),
        },
    });

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
