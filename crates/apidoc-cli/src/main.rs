use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::debug;

use apidoc_core::SpecStore;
use apidoc_core::config::{self, ApidocConfig, CONFIG_FILE_NAME};
use apidoc_core::ir::{OperationGroup, merge_documents};
use apidoc_core::transform;
use apidoc_core::validate::{self, IncomingRequest, ValidateOptions};

#[derive(Parser)]
#[command(name = "apidoc", about = "OpenAPI 3.x portal transformer and request validator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform OpenAPI documents into portal groups
    Transform {
        /// OpenAPI documents (YAML or JSON), merged in order
        #[arg(short, long)]
        input: Vec<PathBuf>,

        /// Output format
        #[arg(long, default_value = "json")]
        format: OutputFormat,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a request body against an OpenAPI document
    Validate {
        /// Path to the OpenAPI document
        #[arg(short, long)]
        input: PathBuf,

        /// HTTP method of the request
        #[arg(long)]
        method: String,

        /// URL path of the request
        #[arg(long)]
        path: String,

        /// JSON body file, `-` for stdin
        #[arg(long)]
        body: Option<PathBuf>,

        /// Router group prefix (repeatable)
        #[arg(long = "router-group")]
        router_groups: Vec<String>,

        /// Reduce `prefix-name` operation ids to `name`
        #[arg(long)]
        strip_event_prefix: bool,
    },

    /// Initialize a new apidoc configuration
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
enum OutputFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Transform {
            input,
            format,
            output,
        } => cmd_transform(input, format, output),

        Commands::Validate {
            input,
            method,
            path,
            body,
            router_groups,
            strip_event_prefix,
        } => {
            let cfg = try_load_config()?.unwrap_or_default();
            let mut options = ValidateOptions::from(&cfg.validation);
            options.router_groups.extend(router_groups);
            options.strip_event_prefix |= strip_event_prefix;
            cmd_validate(input, &method, &path, body, &options)
        }

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "apidoc", &mut io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<ApidocConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

fn cmd_transform(input: Vec<PathBuf>, format: OutputFormat, output: Option<PathBuf>) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let inputs: Vec<PathBuf> = if input.is_empty() {
        cfg.inputs.iter().map(PathBuf::from).collect()
    } else {
        input
    };
    if inputs.is_empty() {
        anyhow::bail!("no input documents. Pass -i or list `inputs` in {CONFIG_FILE_NAME}.");
    }

    let store = SpecStore::new();
    let mut documents: Vec<Vec<OperationGroup>> = Vec::with_capacity(inputs.len());
    for path in &inputs {
        let groups = transform::transform(&store, path)
            .with_context(|| format!("failed to transform {}", path.display()))?;
        debug!("{} produced {} groups", path.display(), groups.len());
        documents.push(groups);
    }
    let merged = merge_documents(documents);

    let rendered = match format {
        OutputFormat::Yaml => serde_yaml_ng::to_string(&merged)?,
        OutputFormat::Json => serde_json::to_string_pretty(&merged)? + "\n",
    };

    match output.or_else(|| cfg.output.map(PathBuf::from)) {
        Some(path) => {
            fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Wrote {} groups to {}", merged.len(), path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn cmd_validate(
    input: PathBuf,
    method: &str,
    path: &str,
    body: Option<PathBuf>,
    options: &ValidateOptions,
) -> Result<()> {
    let body = match body {
        Some(source) => read_body(&source)?,
        None => None,
    };

    let store = SpecStore::new();
    let request = IncomingRequest {
        method,
        path,
        body: body.as_ref(),
    };
    let event = validate::validate_request(&store, &input, &request, options)
        .with_context(|| format!("{} {path} rejected", method.to_ascii_uppercase()))?;

    if event.is_empty() {
        eprintln!("No operation declared for {} {path}; nothing validated.", method.to_ascii_uppercase());
    } else {
        println!("{event}");
    }
    Ok(())
}

/// Read a JSON body from a file or stdin. Blank input means no body.
fn read_body(source: &Path) -> Result<Option<serde_json::Value>> {
    let content = if source.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read body from stdin")?;
        buf
    } else {
        fs::read_to_string(source).with_context(|| format!("failed to read {}", source.display()))?
    };

    if content.trim().is_empty() {
        return Ok(None);
    }
    let value = serde_json::from_str(&content).context("request body is not valid JSON")?;
    Ok(Some(value))
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
