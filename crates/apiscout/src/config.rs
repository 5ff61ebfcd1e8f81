//! Generator configuration

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Settings for one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Document title
    pub title: String,
    /// Document version
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Server URLs
    pub servers: Vec<String>,
    /// Folder holding the route modules
    pub source_dir: PathBuf,
    /// Module path the source folder is mounted at (e.g. "routes")
    pub module_prefix: String,
    /// Canonical names of types documented even when no route reaches them
    pub extra_types: Vec<String>,
    pub output_file: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            title: "API".to_string(),
            version: "1.0.0".to_string(),
            description: None,
            servers: Vec::new(),
            source_dir: PathBuf::from("src/routes"),
            module_prefix: String::new(),
            extra_types: Vec::new(),
            output_file: PathBuf::from("target/apiscout/openapi.json"),
        }
    }
}

impl GeneratorConfig {
    /// Load a JSON configuration file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}
