use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Settings read from the optional `--config` TOML file. Every field is
/// optional and, when present, wins over the matching CLI flag.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Kept wide so out of range values get a proper error instead of a parse failure
    pub port: Option<i64>,
    pub bind_address: Option<String>,
    pub db_path: Option<String>,
    pub demo_albums: Option<bool>,
    pub logging_level: Option<String>,
    pub max_body_bytes: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
