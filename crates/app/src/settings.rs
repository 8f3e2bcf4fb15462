//! Handles settings for the application. Values come from an optional TOML
//! file (`config/reparto.toml` by default), then `REPARTO_*` environment
//! variables, then command-line flags.
use serde::Deserialize;

use crate::{cli::GlobalArgs, error::Result};

const DEFAULT_CONFIG_PATH: &str = "config/reparto.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// JSON document holding customers, prices and the cash ledger.
    pub data_file: String,
    /// Directory where delivery sheets are written.
    pub export_dir: String,
    /// Log level for the `reparto` and `engine` targets.
    pub level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: engine::DEFAULT_DATA_FILE.to_string(),
            export_dir: ".".to_string(),
            level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let mut settings: Settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(args.config.is_some()))
            .add_source(config::Environment::with_prefix("REPARTO"))
            .build()?
            .try_deserialize()?;

        if let Some(data_file) = &args.data_file {
            settings.data_file = data_file.clone();
        }
        if let Some(export_dir) = &args.export_dir {
            settings.export_dir = export_dir.clone();
        }
        if let Some(level) = &args.level {
            settings.level = level.clone();
        }

        Ok(settings)
    }
}
