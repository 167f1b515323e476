// ABOUTME: Configuration file loading, validation, and hierarchical merging for the oEmbed CLI
// ABOUTME: Supports TOML config files with XDG Base Directory specification compliance

use anyhow::{anyhow, Context, Result};
use oembed_sdk::{FetchOptions, LoadPolicy};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::paths;

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    #[serde(default)]
    pub accept_language: Option<String>,
    #[serde(default)]
    pub max_width: Option<u32>,
    #[serde(default)]
    pub max_height: Option<u32>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default, deserialize_with = "validate_load_policy")]
    pub load_policy: Option<LoadPolicy>,
    /// Extra query parameters sent with every fetch
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

/// Per-invocation values given on the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOverrides {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub accept_language: Option<String>,
    pub params: Vec<(String, String)>,
}

impl Config {
    /// Load configuration from standard XDG-compliant locations
    pub fn load() -> Result<Self> {
        let paths = Self::get_config_paths();
        Self::load_from_paths(&paths.iter().map(|p| p.as_str()).collect::<Vec<_>>())
    }

    /// Load configuration from specific file paths, later paths overriding earlier ones
    pub fn load_from_paths(paths: &[&str]) -> Result<Self> {
        let mut config = Config::default();

        for path in paths {
            if !Path::new(path).is_file() {
                log::debug!("Config file not found, skipping: {}", path);
                continue;
            }

            log::debug!("Loading config file: {}", path);
            config = config.merge(Self::load_from_file(path)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse TOML config file: {}",
                path.as_ref().display()
            )
        })?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        Ok(config)
    }

    /// Standard config file paths in order of precedence (lowest first)
    pub fn get_config_paths() -> Vec<String> {
        let mut paths = Vec::new();

        // 1. User config directory fallback
        if let Some(home_dir) = dirs::home_dir() {
            let path = home_dir
                .join(".config")
                .join(paths::APP_DIR)
                .join(paths::CONFIG_FILE);
            paths.push(path.to_string_lossy().to_string());
        }

        // 2. XDG config home
        if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
            let path = PathBuf::from(config_home)
                .join(paths::APP_DIR)
                .join(paths::CONFIG_FILE);
            paths.push(path.to_string_lossy().to_string());
        }

        // 3. Project-specific config
        if let Ok(current_dir) = std::env::current_dir() {
            paths.push(
                current_dir
                    .join(paths::PROJECT_CONFIG_FILE)
                    .to_string_lossy()
                    .to_string(),
            );
        }

        paths
    }

    /// Merge this config with another, giving precedence to the other config
    pub fn merge(self, other: Config) -> Config {
        let mut params = self.params;
        params.extend(other.params);

        Config {
            catalog_path: other.catalog_path.or(self.catalog_path),
            accept_language: other.accept_language.or(self.accept_language),
            max_width: other.max_width.or(self.max_width),
            max_height: other.max_height.or(self.max_height),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            load_policy: other.load_policy.or(self.load_policy),
            params,
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_width == Some(0) {
            return Err(anyhow!("max_width must be greater than zero"));
        }
        if self.max_height == Some(0) {
            return Err(anyhow!("max_height must be greater than zero"));
        }
        if self.timeout_secs == Some(0) {
            return Err(anyhow!("timeout_secs must be greater than zero"));
        }
        if let Some(key) = self.params.keys().find(|k| k.trim().is_empty()) {
            return Err(anyhow!("Invalid empty parameter name '{}' in [params]", key));
        }

        Ok(())
    }

    /// Catalog to load: the command-line path wins over `catalog_path`
    pub fn catalog_path(&self, cli_path: Option<PathBuf>) -> Result<PathBuf> {
        cli_path.or_else(|| self.catalog_path.clone()).ok_or_else(|| {
            anyhow!(
                "No provider catalog configured. Pass --catalog PATH or set catalog_path in {}",
                paths::PROJECT_CONFIG_FILE
            )
        })
    }

    pub fn load_policy(&self) -> LoadPolicy {
        self.load_policy.unwrap_or_default()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(oembed_sdk::constants::http::REQUEST_TIMEOUT)
    }

    /// Request options for `url`, command-line values layered over the config
    pub fn fetch_options(&self, url: &str, overrides: FetchOverrides) -> FetchOptions {
        let mut options = FetchOptions::new(url);

        options.max_width = overrides.max_width.or(self.max_width);
        options.max_height = overrides.max_height.or(self.max_height);
        options.accept_language = overrides
            .accept_language
            .or_else(|| self.accept_language.clone());
        options.extra_params = self.params.clone();
        options.extra_params.extend(overrides.params);

        options
    }
}

// Custom deserializer for load policy validation
fn validate_load_policy<'de, D>(deserializer: D) -> Result<Option<LoadPolicy>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value: Option<String> = Option::deserialize(deserializer)?;

    match value {
        Some(policy) => policy.parse::<LoadPolicy>().map(Some).map_err(D::Error::custom),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.catalog_path.is_none());
        assert!(config.params.is_empty());
        assert_eq!(config.load_policy(), LoadPolicy::Strict);
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_merge_configs() {
        let mut base_params = BTreeMap::new();
        base_params.insert("theme".to_string(), "light".to_string());
        base_params.insert("dnt".to_string(), "1".to_string());
        let base = Config {
            catalog_path: Some(PathBuf::from("base.json")),
            accept_language: Some("en".to_string()),
            params: base_params,
            ..Default::default()
        };

        let mut override_params = BTreeMap::new();
        override_params.insert("theme".to_string(), "dark".to_string());
        let override_config = Config {
            catalog_path: Some(PathBuf::from("override.json")),
            max_width: Some(320),
            params: override_params,
            ..Default::default()
        };

        let merged = base.merge(override_config);
        assert_eq!(merged.catalog_path, Some(PathBuf::from("override.json")));
        assert_eq!(merged.accept_language, Some("en".to_string()));
        assert_eq!(merged.max_width, Some(320));
        assert_eq!(merged.params.get("theme").map(String::as_str), Some("dark"));
        assert_eq!(merged.params.get("dnt").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_load_policy_parsing() {
        let config: Config = toml::from_str(r#"load_policy = "Relaxed""#).unwrap();
        assert_eq!(config.load_policy(), LoadPolicy::Relaxed);

        let result: Result<Config, _> = toml::from_str(r#"load_policy = "lenient""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let config = Config {
            max_height: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_catalog_path_precedence() {
        let config = Config {
            catalog_path: Some(PathBuf::from("configured.json")),
            ..Default::default()
        };

        assert_eq!(
            config.catalog_path(Some(PathBuf::from("flag.json"))).unwrap(),
            PathBuf::from("flag.json")
        );
        assert_eq!(
            config.catalog_path(None).unwrap(),
            PathBuf::from("configured.json")
        );

        let error = Config::default().catalog_path(None).unwrap_err();
        assert!(error.to_string().contains("--catalog"));
    }

    #[test]
    fn test_fetch_options_layering() {
        let mut params = BTreeMap::new();
        params.insert("theme".to_string(), "light".to_string());
        let config = Config {
            accept_language: Some("en".to_string()),
            max_width: Some(800),
            max_height: Some(600),
            params,
            ..Default::default()
        };

        let options = config.fetch_options(
            "https://video.example/watch/1",
            FetchOverrides {
                max_width: Some(320),
                params: vec![("theme".to_string(), "dark".to_string())],
                ..Default::default()
            },
        );

        assert_eq!(options.url, "https://video.example/watch/1");
        assert_eq!(options.max_width, Some(320));
        assert_eq!(options.max_height, Some(600));
        assert_eq!(options.accept_language.as_deref(), Some("en"));
        assert_eq!(
            options.extra_params.get("theme").map(String::as_str),
            Some("dark")
        );
    }
}
