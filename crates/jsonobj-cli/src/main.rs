//! # jsonobj CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/jsonobj/`: the value-object library, with no I/O of its own
//! - `crates/jsonobj-cli/`: this tool, which scaffolds definitions and manages
//!   `jsonobj.toml`
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/jsonobj-cli/src/cli/)                    │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Dispatch + config loading (commands.rs)                  │
//! │  - Definition scaffolding via minijinja (scaffold.rs)       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Library (crates/jsonobj/)                                  │
//! │  - JsonObjectConfig, error types                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
