use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "tunable", version)]
#[command(about = "Declare parameters from a schema file and resolve them from sources")]
pub struct Cli {
    /// Log filter directives
    #[arg(long, global = true, env = "TUNABLE_LOG", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load sources in order and print the resolved values
    Resolve(ResolveArgs),
    /// List declared parameter names in declaration order
    Names(NamesArgs),
}

#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Declaration file: a map of parameter name to options (JSON, YAML or TOML)
    #[arg(long, short = 's', env = "TUNABLE_SCHEMA")]
    pub schema: PathBuf,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Source file; repeat to layer, later files win
    #[arg(long = "source", short = 'f')]
    pub sources: Vec<PathBuf>,

    /// Override one value, applied after every source (`name=value`)
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub overrides: Vec<String>,

    /// Directory relative source paths are resolved against
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct NamesArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Print descriptions next to names
    #[arg(long)]
    pub describe: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Toml,
}
