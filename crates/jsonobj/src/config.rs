//! # Configuration
//!
//! Settings live in `jsonobj.toml`. The CLI resolves them with `clapfig`, in
//! priority order:
//!
//! 1. **Environment variables**: `JSONOBJ__PATH`, `JSONOBJ__FEATURES__LOGGING`, etc.
//! 2. **Project config**: `./jsonobj.toml`.
//! 3. **Global config**: OS-appropriate config directory (via `directories`).
//! 4. **Compiled defaults**: `#[config(default = ...)]` below.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `path` | `src/json` | Directory `jsonobj make` writes into |
//! | `module` | `crate::json` | Module path written into generated files |
//! | `log_channel` | `jsonobj` | `channel` field of logging-capability events |
//! | `features.validation` | `true` | Honor the validation capability |
//! | `features.dirty_tracking` | `true` | Honor the dirty-tracking capability |
//! | `features.logging` | `false` | Honor the logging capability |
//!
//! The library never reads files itself; callers turn a loaded config into
//! [`Features`] and pass it to [`ObjectSpec::from_with`](crate::ObjectSpec::from_with).

use confique::Config;
use serde::{Deserialize, Serialize};

use crate::capabilities::Features;

/// Configuration for jsonobj, stored in `jsonobj.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct JsonObjectConfig {
    /// Directory generated definitions are written to.
    #[config(default = "src/json")]
    pub path: String,

    /// Module path generated definitions live under.
    #[config(default = "crate::json")]
    pub module: String,

    /// Channel recorded on events of the logging capability.
    #[config(default = "jsonobj")]
    pub log_channel: String,

    #[config(nested)]
    pub features: FeatureFlags,
}

/// Global capability switches.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FeatureFlags {
    #[config(default = true)]
    pub validation: bool,

    #[config(default = true)]
    pub dirty_tracking: bool,

    #[config(default = false)]
    pub logging: bool,
}

impl Default for JsonObjectConfig {
    fn default() -> Self {
        Self {
            path: "src/json".to_string(),
            module: "crate::json".to_string(),
            log_channel: "jsonobj".to_string(),
            features: FeatureFlags::default(),
        }
    }
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            validation: true,
            dirty_tracking: true,
            logging: false,
        }
    }
}

impl From<&JsonObjectConfig> for Features {
    fn from(config: &JsonObjectConfig) -> Self {
        Features {
            validation: config.features.validation,
            dirty_tracking: config.features.dirty_tracking,
            logging: config.features.logging,
            log_channel: config.log_channel.clone(),
        }
    }
}

impl JsonObjectConfig {
    pub fn features(&self) -> Features {
        Features::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = JsonObjectConfig::default();
        assert_eq!(config.path, "src/json");
        assert_eq!(config.module, "crate::json");
        assert_eq!(config.log_channel, "jsonobj");
        assert!(config.features.validation);
        assert!(config.features.dirty_tracking);
        assert!(!config.features.logging);
    }

    #[test]
    fn test_defaults_match_features_defaults() {
        assert_eq!(JsonObjectConfig::default().features(), Features::default());
    }

    #[test]
    fn test_features_carry_log_channel() {
        let config = JsonObjectConfig {
            log_channel: "audit".to_string(),
            features: FeatureFlags {
                logging: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let features = config.features();
        assert!(features.logging);
        assert_eq!(features.log_channel, "audit");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: JsonObjectConfig = toml::from_str(
            r#"
            path = "app/objects"

            [features]
            dirty_tracking = false
            "#,
        )
        .unwrap();
        assert_eq!(config.path, "app/objects");
        assert_eq!(config.module, "crate::json");
        assert!(!config.features.dirty_tracking);
        assert!(config.features.validation);
    }
}
