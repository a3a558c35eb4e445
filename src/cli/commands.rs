use crate::api::{ApiResourceSchema, CanonicalTypeName};
use crate::config::{load_config, resolve_config_path, GeneratorConfig, GeneratorInputs};
use crate::convert::StructuralConverter;
use crate::openapi::index_models;
use crate::pipeline::{create_api_resource_schemas, describe_apis};
use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Command-line interface for the internal API schema generator
#[derive(Parser, Debug)]
#[command(name = "internalapis-gen")]
#[command(about = "Generate APIResourceSchemas for built-in resource types", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Configuration file (TOML, YAML or JSON)
    /// If not provided, `internalapis.toml` in the working directory is used when present
    #[arg(short, long, env = "INTERNALAPIS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Leave out the built-in catalog, scheme and definitions
    #[arg(long, default_value_t = false)]
    pub no_builtin: bool,
}

/// Serialization format for generated schemas
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
        }
    }

    fn render(&self, schema: &ApiResourceSchema) -> anyhow::Result<String> {
        let rendered = match self {
            OutputFormat::Yaml => serde_yaml::to_string(schema)
                .with_context(|| format!("Failed to render {} as YAML", schema.name()))?,
            OutputFormat::Json => {
                let mut json = serde_json::to_string_pretty(schema)
                    .with_context(|| format!("Failed to render {} as JSON", schema.name()))?;
                json.push('\n');
                json
            }
        };
        Ok(rendered)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate APIResourceSchemas
    Generate {
        #[command(flatten)]
        inputs: InputArgs,

        /// Write one `<name>.<ext>` file per schema into this directory instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
    },
    /// List the APIs that would be generated
    List {
        #[command(flatten)]
        inputs: InputArgs,
    },
    /// Show the description document components and indexed kinds
    Inspect {
        #[command(flatten)]
        inputs: InputArgs,
    },
}

/// Run a parsed command against the working directory, writing to stdout.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&cli.command, &cwd, &mut out)
}

/// Run `command`, resolving configuration relative to `cwd`.
pub fn execute(command: &Commands, cwd: &Path, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        Commands::Generate {
            inputs,
            output,
            format,
        } => {
            let inputs = load_inputs(inputs, cwd)?;
            let schemas = create_api_resource_schemas(
                &inputs.schemes,
                &inputs.provider_refs(),
                &inputs.apis,
                &StructuralConverter::new(),
            )?;

            match output {
                Some(dir) => write_schemas(&schemas, &cwd.join(dir), *format)?,
                None => {
                    for schema in &schemas {
                        if *format == OutputFormat::Yaml {
                            writeln!(out, "---")?;
                        }
                        out.write_all(format.render(schema)?.as_bytes())?;
                    }
                }
            }
            Ok(())
        }
        Commands::List { inputs } => {
            let inputs = load_inputs(inputs, cwd)?;
            for api in &inputs.apis {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}",
                    api.schema_name(),
                    api.group_version_kind(),
                    api.scope,
                    api.instance.canonical_type_name(),
                    if api.has_status { "status" } else { "-" }
                )?;
            }
            Ok(())
        }
        Commands::Inspect { inputs } => {
            let inputs = load_inputs(inputs, cwd)?;
            let document = describe_apis(&inputs.schemes, &inputs.provider_refs(), &inputs.apis)?;
            let index = index_models(&document)?;

            writeln!(out, "Description document (version {})", document.version())?;
            writeln!(out, "Components:")?;
            for name in document.component_names() {
                writeln!(out, "  {name}")?;
            }
            writeln!(out, "Kinds:")?;
            for (gvk, model) in index.iter() {
                writeln!(out, "  {gvk} -> {}", model.name)?;
            }
            Ok(())
        }
    }
}

fn load_inputs(args: &InputArgs, cwd: &Path) -> anyhow::Result<GeneratorInputs> {
    let (mut config, base_dir) = match resolve_config_path(args.config.as_deref(), cwd) {
        Some(path) => {
            let path = cwd.join(path);
            let config = load_config(&path)?;
            let base_dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| cwd.to_path_buf());
            info!(config = %path.display(), "loaded configuration");
            (config, base_dir)
        }
        None => (GeneratorConfig::default(), cwd.to_path_buf()),
    };
    if args.no_builtin {
        config.include_builtin = false;
    }
    config.inputs(&base_dir)
}

fn write_schemas(
    schemas: &[ApiResourceSchema],
    dir: &Path,
    format: OutputFormat,
) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    for schema in schemas {
        let path = dir.join(format!("{}.{}", schema.name(), format.extension()));
        std::fs::write(&path, format.render(schema)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote schema");
    }
    Ok(())
}
