//! Dump loading, symbol selection and output for the `tyres` binary.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info, warn};
use tyres_solver::{
    ProgramDump, ProgramTypes, RecursionProfile, ResolveError, ResolverOptions, SymbolPath, Type,
    render,
};

use crate::args::{CliArgs, OutputFormat};

/// Exit status when a budgeted resolution was aborted.
pub const EXIT_BUDGET_EXHAUSTED: i32 = 2;

/// One selected symbol with its canonical type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSymbol {
    pub path: SymbolPath,
    pub rendered: String,
}

/// Read and parse the program dump at `path`.
pub fn load_dump(path: &Path) -> Result<ProgramDump> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    ProgramDump::from_json(&text).with_context(|| format!("failed to parse {}", path.display()))
}

/// Budget requested on the command line; unbounded when neither limit is set.
pub fn resolver_options(args: &CliArgs) -> ResolverOptions {
    let profile = match (args.max_depth, args.max_iterations) {
        (None, None) => RecursionProfile::Unbounded,
        (max_depth, max_iterations) => RecursionProfile::Custom {
            max_depth: max_depth.unwrap_or(u32::MAX),
            max_iterations: max_iterations.unwrap_or(u32::MAX),
        },
    };
    ResolverOptions { profile }
}

fn selected_symbols(program: &ProgramTypes, args: &CliArgs) -> Vec<SymbolPath> {
    let graph = program.graph();
    if args.selects_everything() {
        return graph.symbols().map(|id| graph.path(id).clone()).collect();
    }

    let mut selected: Vec<SymbolPath> = args
        .functions
        .iter()
        .map(|name| SymbolPath::function(name.as_str()))
        .collect();
    for class in &args.classes {
        if !graph.has_class(class) {
            warn!(class = class.as_str(), "class not declared in dump");
        }
        selected.extend(graph.methods_of(class).map(|(_, id)| graph.path(id).clone()));
    }
    selected
}

/// Resolve and render every symbol the arguments select.
///
/// Undeclared functions are reported as `unknown`. A budget abort is
/// returned as a [`ResolveError`] inside the `anyhow` chain.
pub fn resolve_selected(program: &mut ProgramTypes, args: &CliArgs) -> Result<Vec<ResolvedSymbol>> {
    let selected = selected_symbols(program, args);
    let mut resolved = Vec::with_capacity(selected.len());
    for path in selected {
        let ty = match program.graph().lookup(&path) {
            Some(id) => program
                .try_resolve(id)
                .with_context(|| format!("failed to resolve {path}"))?,
            None => {
                debug!(symbol = %path, "undeclared symbol");
                Type::Unknown
            }
        };
        let rendered = render(&ty).with_context(|| format!("failed to render {path}"))?;
        resolved.push(ResolvedSymbol { path, rendered });
    }
    debug!(stats = ?program.stats(), "resolution finished");
    Ok(resolved)
}

pub fn format_output(symbols: &[ResolvedSymbol], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => {
            Ok(symbols
                .iter()
                .map(|symbol| format!("{}: {}\n", symbol.path, symbol.rendered))
                .collect())
        }
        OutputFormat::Json => {
            let map: serde_json::Map<String, serde_json::Value> = symbols
                .iter()
                .map(|symbol| {
                    (
                        symbol.path.to_string(),
                        serde_json::Value::String(symbol.rendered.clone()),
                    )
                })
                .collect();
            let mut out = serde_json::to_string_pretty(&serde_json::Value::Object(map))
                .context("failed to serialize output")?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// Full pipeline: load, resolve, format.
pub fn run(args: &CliArgs) -> Result<String> {
    let dump = load_dump(&args.dump)?;
    let options = resolver_options(args);
    info!(dump = %args.dump.display(), profile = ?options.profile, "resolving program dump");

    let mut program = ProgramTypes::with_options(dump.into_graph(), options);
    let resolved = resolve_selected(&mut program, args)?;
    format_output(&resolved, args.format)
}

/// True when `err` stems from an exhausted resolution budget.
pub fn is_budget_exhausted(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<ResolveError>(),
        Some(ResolveError::Aborted { .. })
    )
}

#[cfg(test)]
#[path = "../tests/driver_tests.rs"]
mod tests;
