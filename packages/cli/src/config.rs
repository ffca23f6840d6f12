use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "zobject.config.json";

/// ZObject CLI configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Namespace `edit` writes out
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// First row id handed out when flattening
    #[serde(default)]
    pub start_row: u32,

    /// Pretty-print JSON output
    #[serde(default = "default_pretty")]
    pub pretty: bool,

    /// Reject Normal lists whose cells lack a tail instead of repairing them
    #[serde(default)]
    pub strict_lists: bool,
}

fn default_namespace() -> String {
    zobject_editor::MAIN_NAMESPACE.to_string()
}

fn default_pretty() -> bool {
    true
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Serialize a value the way the config asks for
    pub fn to_json(&self, value: &impl Serialize) -> anyhow::Result<String> {
        Ok(if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            start_row: 0,
            pretty: default_pretty(),
            strict_lists: false,
        }
    }
}
