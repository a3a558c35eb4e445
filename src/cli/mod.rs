//! # CLI Module
//!
//! Command-line front end for the generator, shipped as the
//! `internalapis-gen` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Run the pipeline and emit one `APIResourceSchema` per API:
//!
//! ```bash
//! internalapis-gen generate                      # YAML stream on stdout
//! internalapis-gen generate --format json
//! internalapis-gen generate --output schemas/    # one file per schema
//! ```
//!
//! ### `list`
//!
//! Print the API catalog the configuration resolves to.
//!
//! ### `inspect`
//!
//! Print the description document's components and the kinds indexed from it.
//!
//! All commands accept `--config <FILE>` (default: `internalapis.toml` in the
//! working directory, if present) and `--no-builtin`.

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{execute, run_cli, Cli, Commands, OutputFormat};
