use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the tyres binary.
#[derive(Parser, Debug)]
#[command(
    name = "tyres",
    version,
    about = "Resolve deferred type references in a program dump"
)]
pub struct CliArgs {
    /// Program dump (JSON) produced by the first inference pass.
    pub dump: PathBuf,

    /// Only print this free function. May be repeated.
    #[arg(long = "function", value_name = "NAME")]
    pub functions: Vec<String>,

    /// Only print the methods of this class. May be repeated.
    #[arg(long = "class", value_name = "NAME")]
    pub classes: Vec<String>,

    /// Abort a resolution nesting deeper than this many symbols.
    #[arg(long = "max-depth", value_name = "N")]
    pub max_depth: Option<u32>,

    /// Abort a resolution after this many symbol visits.
    #[arg(long = "max-iterations", value_name = "N")]
    pub max_iterations: Option<u32>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `path: type` line per symbol.
    Text,
    /// A JSON object mapping symbol paths to types.
    Json,
}

impl CliArgs {
    /// True when no `--function` / `--class` filter was given.
    pub fn selects_everything(&self) -> bool {
        self.functions.is_empty() && self.classes.is_empty()
    }
}
