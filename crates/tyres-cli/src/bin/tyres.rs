#![allow(clippy::print_stderr)]

use anyhow::Result;
use clap::Parser;
use std::io::Write;

use tyres_cli::args::CliArgs;
use tyres_cli::driver;

fn main() -> Result<()> {
    // Initialize tracing if TYRES_LOG or RUST_LOG is set (zero cost otherwise).
    tyres_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    match driver::run(&args) {
        Ok(output) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
        Err(err) if driver::is_budget_exhausted(&err) => {
            eprintln!("error: {err:#}");
            std::process::exit(driver::EXIT_BUDGET_EXHAUSTED);
        }
        Err(err) => Err(err),
    }
}
