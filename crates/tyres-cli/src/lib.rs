//! Command-line driver for `tyres`: reads a program dump, resolves every
//! reference in it and prints the canonical types.

pub mod args;
pub mod driver;
pub mod tracing_config;
