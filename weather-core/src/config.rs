use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{model::DEFAULT_ZIP_CODE, provider::openweather::Endpoints};

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_zip_code = "94103"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// OpenWeather API key.
    pub api_key: Option<String>,

    /// Zip code shown when none is given. Falls back to `10001`.
    pub default_zip_code: Option<String>,

    /// Endpoint overrides, mostly useful against a local stub.
    pub geocoding_url: Option<String>,
    pub weather_url: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// The API key to send, from the environment or the config file.
    ///
    /// A missing key is not an error here: the lookup goes out anyway and the
    /// geocoding service reports the problem.
    pub fn credential(&self) -> String {
        pick_credential(std::env::var(API_KEY_ENV).ok(), self.api_key.as_deref())
    }

    pub fn default_zip_code(&self) -> &str {
        self.default_zip_code
            .as_deref()
            .filter(|zip| !zip.is_empty())
            .unwrap_or(DEFAULT_ZIP_CODE)
    }

    pub fn endpoints(&self) -> Endpoints {
        let mut endpoints = Endpoints::default();
        if let Some(url) = &self.geocoding_url {
            endpoints.geocoding_url = url.clone();
        }
        if let Some(url) = &self.weather_url {
            endpoints.weather_url = url.clone();
        }
        endpoints
    }
}

fn pick_credential(from_env: Option<String>, stored: Option<&str>) -> String {
    from_env
        .filter(|key| !key.is_empty())
        .or_else(|| stored.map(str::to_owned))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::openweather::{DEFAULT_GEOCODING_URL, DEFAULT_WEATHER_URL};

    #[test]
    fn defaults_point_at_openweather() {
        let cfg = Config::default();
        let endpoints = cfg.endpoints();

        assert_eq!(endpoints.geocoding_url, DEFAULT_GEOCODING_URL);
        assert_eq!(endpoints.weather_url, DEFAULT_WEATHER_URL);
        assert_eq!(cfg.default_zip_code(), "10001");
    }

    #[test]
    fn endpoint_overrides_apply_individually() {
        let cfg = Config {
            weather_url: Some("http://localhost:8080/onecall".into()),
            ..Config::default()
        };
        let endpoints = cfg.endpoints();

        assert_eq!(endpoints.geocoding_url, DEFAULT_GEOCODING_URL);
        assert_eq!(endpoints.weather_url, "http://localhost:8080/onecall");
    }

    #[test]
    fn empty_default_zip_falls_back() {
        let cfg = Config {
            default_zip_code: Some(String::new()),
            ..Config::default()
        };
        assert_eq!(cfg.default_zip_code(), "10001");
    }

    #[test]
    fn env_key_wins_over_stored_key() {
        assert_eq!(pick_credential(Some("ENV".into()), Some("FILE")), "ENV");
        assert_eq!(pick_credential(Some(String::new()), Some("FILE")), "FILE");
        assert_eq!(pick_credential(None, Some("FILE")), "FILE");
    }

    #[test]
    fn missing_key_is_empty_credential() {
        assert_eq!(pick_credential(None, None), "");
    }

    #[test]
    fn load_missing_file_returns_default() {
        let dir = tempfile::tempdir().expect("temp dir");
        let cfg =
            Config::load_from(&dir.path().join("does-not-exist.toml")).expect("default config");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn parses_partial_toml() {
        let cfg: Config = toml::from_str("default_zip_code = \"94103\"\n").expect("valid toml");
        assert_eq!(cfg.default_zip_code(), "94103");
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("saved.toml");
        let mut cfg = Config::default();
        cfg.set_api_key("OPEN_KEY".into());

        cfg.save_to(&path).expect("save");
        let loaded = Config::load_from(&path).expect("load");

        assert_eq!(loaded.api_key.as_deref(), Some("OPEN_KEY"));
    }

    #[test]
    fn config_path_ends_with_file_name() {
        if let Ok(path) = Config::config_file_path() {
            assert!(path.ends_with("config.toml"));
        }
    }
}
