//! # CLI Layer
//!
//! The only place in the workspace that:
//! - Knows about stdout, stderr and the working directory
//! - Loads `jsonobj.toml`
//! - Writes files
//!
//! ## Config Search Paths
//!
//! Loading merges the global config directory (via `directories`, or
//! `JSONOBJ_GLOBAL_CONFIG` when set) with the current directory, which takes
//! precedence. `config set` always writes `./jsonobj.toml`.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use clapfig::{Clapfig, ConfigAction, SearchMode, SearchPath};
use console::style;
use directories::ProjectDirs;
use jsonobj::error::Error;
use jsonobj::JsonObjectConfig;
use tracing::{debug, warn};

use super::logging;
use super::scaffold::{self, ObjectName};
use super::setup::{Cli, Commands, ConfigCommands};

const APP_NAME: &str = "jsonobj";
const CONFIG_FILE: &str = "jsonobj.toml";
const GLOBAL_CONFIG_ENV: &str = "JSONOBJ_GLOBAL_CONFIG";

/// Where configuration is read from and written to.
struct ConfigPaths {
    global_dir: Option<PathBuf>,
    project_dir: PathBuf,
}

impl ConfigPaths {
    fn discover() -> anyhow::Result<Self> {
        let global_dir = match std::env::var_os(GLOBAL_CONFIG_ENV) {
            Some(dir) => Some(PathBuf::from(dir)),
            None => ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf()),
        };
        let project_dir = std::env::current_dir().context("cannot read current directory")?;
        Ok(Self {
            global_dir,
            project_dir,
        })
    }

    /// Global first, project overrides.
    fn load_paths(&self) -> Vec<SearchPath> {
        let mut paths = Vec::new();
        if let Some(global) = &self.global_dir {
            paths.push(SearchPath::Path(global.clone()));
        }
        paths.push(SearchPath::Path(self.project_dir.clone()));
        paths
    }

    fn set_paths(&self) -> Vec<SearchPath> {
        vec![SearchPath::Path(self.project_dir.clone())]
    }
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let paths = ConfigPaths::discover()?;
    match cli.command {
        Commands::Make {
            name,
            path,
            module,
            force,
        } => handle_make(&paths, &name, path, module, force),
        Commands::Config { action } => handle_config_command(action.as_ref(), &paths),
    }
}

/// Falls back to defaults when the config cannot be read, with a warning so
/// the user knows `make` is not using their settings.
fn load_config(paths: &ConfigPaths) -> JsonObjectConfig {
    Clapfig::builder()
        .app_name(APP_NAME)
        .file_name(CONFIG_FILE)
        .search_paths(paths.load_paths())
        .search_mode(SearchMode::Merge)
        .strict(false)
        .load()
        .unwrap_or_else(|err| {
            warn!(error = %err, "invalid configuration, using defaults");
            JsonObjectConfig::default()
        })
}

fn handle_make(
    paths: &ConfigPaths,
    raw_name: &str,
    path: Option<PathBuf>,
    module: Option<String>,
    force: bool,
) -> anyhow::Result<()> {
    let Some(name) = ObjectName::parse(raw_name) else {
        bail!(
            "invalid object name '{}': use letters, digits, '_' or '-', starting with a letter",
            raw_name
        );
    };

    let config = load_config(paths);
    let dir = path.unwrap_or_else(|| paths.project_dir.join(&config.path));
    let module = module.unwrap_or(config.module);
    debug!(object = %name.pascal, dir = %dir.display(), module = %module, "generating definition");

    let created = scaffold::generate(&name, &dir, &module, force)?;
    println!(
        "{} {} {}",
        style("Created").green().bold(),
        name.pascal,
        style(created.display()).dim()
    );
    Ok(())
}

/// Handle `jsonobj config` using clapfig directly.
fn handle_config_command(action: Option<&ConfigCommands>, paths: &ConfigPaths) -> anyhow::Result<()> {
    let action = match action {
        None => {
            let config = load_config(paths);
            let table = toml::Value::try_from(&config).map_err(|e| Error::Config(e.to_string()))?;
            for line in flatten_toml("", &table) {
                println!("{}", line);
            }
            return Ok(());
        }
        Some(ConfigCommands::Gen { output }) => ConfigAction::Gen {
            output: output.clone(),
        },
        Some(ConfigCommands::Get { key }) => ConfigAction::Get { key: key.clone() },
        Some(ConfigCommands::Set { key, value }) => ConfigAction::Set {
            key: key.clone(),
            value: value.clone(),
        },
    };

    let search_paths = match action {
        ConfigAction::Set { .. } => paths.set_paths(),
        _ => paths.load_paths(),
    };
    let result = Clapfig::builder::<JsonObjectConfig>()
        .app_name(APP_NAME)
        .file_name(CONFIG_FILE)
        .search_paths(search_paths)
        .no_env()
        .strict(false)
        .handle(&action)
        .map_err(|e| Error::Config(e.to_string()))?;
    println!("{result}");
    Ok(())
}

/// `key = value` lines, with nested tables spelled as dotted keys.
fn flatten_toml(prefix: &str, value: &toml::Value) -> Vec<String> {
    match value {
        toml::Value::Table(table) => table
            .iter()
            .flat_map(|(key, value)| {
                let key = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_toml(&key, value)
            })
            .collect(),
        other => vec![format!("{} = {}", prefix, format_toml_value(other))],
    }
}

/// Format a TOML value for display.
fn format_toml_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => format!("\"{}\"", s),
        toml::Value::Array(a) => toml::to_string(a).unwrap_or_else(|_| format!("{a:?}")),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_nested_tables() {
        let table = toml::Value::try_from(JsonObjectConfig::default()).unwrap();
        let lines = flatten_toml("", &table);
        assert!(lines.contains(&"path = \"src/json\"".to_string()));
        assert!(lines.contains(&"module = \"crate::json\"".to_string()));
        assert!(lines.contains(&"features.logging = false".to_string()));
        assert!(lines.contains(&"features.dirty_tracking = true".to_string()));
    }

    #[test]
    fn test_load_paths_order() {
        let paths = ConfigPaths {
            global_dir: Some(PathBuf::from("/global")),
            project_dir: PathBuf::from("/project"),
        };
        assert_eq!(paths.load_paths().len(), 2);
        assert_eq!(paths.set_paths().len(), 1);

        let no_global = ConfigPaths {
            global_dir: None,
            project_dir: PathBuf::from("/project"),
        };
        assert_eq!(no_global.load_paths().len(), 1);
    }
}
