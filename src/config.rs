use std::fs;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::domain::Pipeline;
use crate::error::PrepError;

pub const DEFAULT_CONFIG_FILE: &str = "kira-prep.json";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub pipeline: Option<String>,
    #[serde(default)]
    pub output_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub pipeline: Pipeline,
    pub output_dir: Option<Utf8PathBuf>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `path`, or `kira-prep.json` from the working directory if it exists.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, PrepError> {
        let config_path = Utf8PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_FILE));

        if path.is_none() && !config_path.as_std_path().exists() {
            return Self::resolve_config(Config::default());
        }

        let content = fs::read_to_string(config_path.as_std_path())
            .map_err(|_| PrepError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| PrepError::ConfigParse(err.to_string()))?;

        Self::resolve_config(config)
    }

    pub fn resolve_config(config: Config) -> Result<ResolvedConfig, PrepError> {
        let pipeline = config
            .pipeline
            .as_deref()
            .map(str::parse::<Pipeline>)
            .transpose()?
            .unwrap_or_default();

        Ok(ResolvedConfig {
            schema_version: config.schema_version.unwrap_or(1),
            pipeline,
            output_dir: config.output_dir.map(Utf8PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let resolved = ConfigLoader::resolve_config(Config::default()).unwrap();
        assert_eq!(resolved.schema_version, 1);
        assert_eq!(resolved.pipeline, Pipeline::FastpAndMinimap2);
        assert_eq!(resolved.output_dir, None);
    }
}
