//! # CLI Module
//!
//! Command-line front end for the generator.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Generate every artifact for an entity inside a Laravel project:
//!
//! ```bash
//! crudforge generate Project \
//!     --fields "name:string, description:text, status:enum(open, closed)" \
//!     --relations "tasks:hasMany" \
//!     --root ./my-app
//! ```
//!
//! Options:
//! - `--fields <DSL>` - field description (required)
//! - `--relations <DSL>` - relation description
//! - `--root <DIR>` - project root (default: current directory)
//! - `--config <FILE>` - configuration file (default: `<root>/crudforge.toml`)
//! - `--dry-run` - report what would be written without writing
//!
//! One line is printed per artifact. The exit status is non-zero only when a
//! fatal error stopped the run.
//!
//! ### `list`
//!
//! Print the entities recorded in the registry:
//!
//! ```bash
//! crudforge list --root ./my-app
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run, run_cli, Cli, Commands};
