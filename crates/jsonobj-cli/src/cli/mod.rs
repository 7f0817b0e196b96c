//! # CLI Behavior
//!
//! The CLI is the only place that knows about the filesystem, terminal output
//! and exit codes. The library it drives never touches any of them.
//!
//! ## `jsonobj make <Name>`
//!
//! Generates a definition file for a new value-object type:
//!
//! - `Name` is normalized to PascalCase for the type name.
//! - The file is `<snake_case>.rs`, written to `--path` or the configured
//!   `path` (default `src/json`).
//! - The definition is a `pub static <SCREAMING_SNAKE>: ObjectSpec`.
//! - An existing file is never overwritten unless `--force` is given.
//!
//! ## `jsonobj config`
//!
//! - `jsonobj config`: show all resolved values.
//! - `jsonobj config get <key>`: get a specific value.
//! - `jsonobj config set <key> <value>`: persist a value to `./jsonobj.toml`.
//! - `jsonobj config gen`: generate a sample `jsonobj.toml`.
//!
//! ## Module Structure
//!
//! - `setup`: argument parsing via clap
//! - `commands`: dispatch, config loading and handlers
//! - `scaffold`: name conversion and template rendering
//! - `templates`: embedded templates
//! - `logging`: tracing subscriber setup

mod commands;
mod logging;
mod scaffold;
pub mod setup;
mod templates;

pub use commands::run;
