use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "jsonobj",
    bin_name = "jsonobj",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Scaffold and configure jsonobj value objects", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new value-object definition
    #[command(display_order = 1)]
    Make {
        /// Type name (e.g. ProductAttributes)
        name: String,

        /// Directory to write into (defaults to the configured path)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Module path recorded in the generated file (defaults to the configured module)
        #[arg(long)]
        module: Option<String>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Get or set configuration
    #[command(display_order = 2)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate a sample jsonobj.toml
    Gen {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print one configuration value
    Get {
        /// Configuration key (e.g. path, features.logging)
        key: String,
    },

    /// Persist one configuration value
    Set {
        /// Configuration key (e.g. path, features.logging)
        key: String,

        /// New value
        value: String,
    },
}
