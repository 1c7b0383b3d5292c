use super::types::RouteConfig;
use anyhow::{bail, Context};
use std::path::Path;

/// Serialization format of a route configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension (`yaml`, `yml`, `toml`, `json`)
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "toml" => Ok(ConfigFormat::Toml),
            "json" => Ok(ConfigFormat::Json),
            _ => bail!(
                "unsupported route config extension for {} (expected .yaml, .yml, .toml or .json)",
                path.display()
            ),
        }
    }
}

/// Parse route configuration from a string in the given format
pub fn parse_route_config(content: &str, format: ConfigFormat) -> anyhow::Result<RouteConfig> {
    let config = match format {
        ConfigFormat::Yaml => {
            serde_yaml::from_str(content).context("failed to parse YAML route config")?
        }
        ConfigFormat::Toml => toml::from_str(content).context("failed to parse TOML route config")?,
        ConfigFormat::Json => {
            serde_json::from_str(content).context("failed to parse JSON route config")?
        }
    };
    Ok(config)
}

/// Load route configuration from a file, choosing the parser by extension.
///
/// Only syntax is checked here; call [`RouteConfig::validate`] for semantic checks.
pub fn load_route_config(path: impl AsRef<Path>) -> anyhow::Result<RouteConfig> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read route config: {}", path.display()))?;
    parse_route_config(&content, format)
        .with_context(|| format!("invalid route config: {}", path.display()))
}
