//! Logging for the `tyres` binary.
//!
//! Off unless `TYRES_LOG` (or `RUST_LOG`) is set. All output goes to stderr;
//! stdout carries only resolved types.
//!
//! ```bash
//! # Every walk, memo write and cycle cut in the resolver
//! TYRES_LOG=trace tyres dump.json --class Foo
//!
//! # Nested view of one resolution
//! TYRES_LOG=trace TYRES_LOG_FORMAT=tree tyres dump.json --function foo
//!
//! # Full directive syntax, dependencies included
//! TYRES_LOG="tyres_solver::resolve=debug,clap=warn" tyres dump.json
//! ```
//!
//! A bare level in `TYRES_LOG` applies to the tyres crates only, so
//! resolver traces are not buried under dependency output. `RUST_LOG` is
//! taken verbatim.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const OWN_TARGETS: [&str; 2] = ["tyres_solver", "tyres_cli"];
const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Output format selected by `TYRES_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Flat lines (default).
    Text,
    /// Indented by resolution nesting, via `tracing-tree`.
    Tree,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Unrecognized values fall back to text.
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Logging settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directives.
    pub directives: String,
    pub format: LogFormat,
}

impl LogConfig {
    /// Settings for the given variable values; `None` when logging is off.
    ///
    /// `TYRES_LOG` wins over `RUST_LOG`.
    pub fn from_vars(
        tyres_log: Option<&str>,
        rust_log: Option<&str>,
        format: Option<&str>,
    ) -> Option<Self> {
        let directives = match (tyres_log, rust_log) {
            (Some(value), _) => scope_bare_level(value),
            (None, Some(value)) => value.to_string(),
            (None, None) => return None,
        };
        Some(Self {
            directives,
            format: LogFormat::parse(format.unwrap_or_default()),
        })
    }

    fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok();
        let (tyres_log, rust_log, format) =
            (var("TYRES_LOG"), var("RUST_LOG"), var("TYRES_LOG_FORMAT"));
        Self::from_vars(tyres_log.as_deref(), rust_log.as_deref(), format.as_deref())
    }

    fn install(self) {
        let filter = EnvFilter::builder().parse_lossy(&self.directives);
        match self.format {
            LogFormat::Tree => {
                let tree_layer = tracing_tree::HierarchicalLayer::new(2)
                    .with_writer(std::io::stderr)
                    .with_targets(true);
                Registry::default().with(filter).with(tree_layer).init();
            }
            LogFormat::Json => {
                let json_layer = fmt::layer().json().with_writer(std::io::stderr);
                Registry::default().with(filter).with(json_layer).init();
            }
            LogFormat::Text => {
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
        }
    }
}

/// `debug` -> `tyres_solver=debug,tyres_cli=debug`; anything else as is.
fn scope_bare_level(value: &str) -> String {
    let level = value.trim().to_lowercase();
    if !LEVELS.contains(&level.as_str()) {
        return value.to_string();
    }
    OWN_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber if logging was requested.
pub fn init_tracing() {
    if let Some(config) = LogConfig::from_env() {
        config.install();
    }
}
