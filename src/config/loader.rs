//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::Path;

use super::Config;

pub const CONFIG_FILENAME: &str = "fleetdesk.toml";

/// Load configuration from fleetdesk.toml
pub fn load_config() -> Result<Config> {
    let config_path = find_config_file()?;
    load_config_from_path(&config_path)
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    parse_config(&content)
}

/// Parse configuration text after interpolating environment variables
pub fn parse_config(content: &str) -> Result<Config> {
    let content = interpolate_env_vars(content);
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Write configuration to a specific path
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
    fs::write(path, content)?;
    Ok(())
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<std::path::PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // Constant pattern
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# Fleetdesk Configuration

[api]
# Deployment URL of the fleet script endpoint
url = "${FLEETDESK_API_URL:-http://localhost:8080/exec}"
timeout_ms = 30000
retry_count = 3
retry_delay_ms = 1000
max_retry_delay_ms = 5000

[session]
# token_path = "/home/me/.fleetdesk/sessionToken"

[upload]
max_size = 5242880
allowed_types = ["image/jpeg", "image/png"]

[validation.password]
min_length = 8
require_uppercase = true
require_lowercase = true
require_number = true
require_special = true

[validation.od_reading]
min = 0
max = 999999

[validation.trip]
min_amount = 10.0
max_amount = 10000.0
min_km = 1.0
max_km = 1000.0
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_interpolation() {
        env::set_var("FLEETDESK_TEST_VAR", "hello");
        let content = "value = \"${FLEETDESK_TEST_VAR}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"hello\"");
        env::remove_var("FLEETDESK_TEST_VAR");
    }

    #[test]
    fn test_env_interpolation_with_default() {
        let content = "value = \"${NONEXISTENT_VAR:-default_value}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"default_value\"");
    }

    #[test]
    fn test_default_content_parses() {
        let config = parse_config(default_config_content()).expect("default config should parse");
        assert_eq!(config.api.timeout_ms, 30_000);
        assert_eq!(config.api.retry_count, 3);
        assert_eq!(config.upload.max_size, 5 * 1024 * 1024);
        assert_eq!(config.validation.od_reading.max, 999_999);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        let mut config = Config::default();
        config.api.url = "https://script.example.com/exec".to_string();
        config.api.retry_count = 5;

        save_config(&config, &path).unwrap();
        let loaded = load_config_from_path(&path).unwrap();
        assert_eq!(loaded.api.url, "https://script.example.com/exec");
        assert_eq!(loaded.api.retry_count, 5);
    }

    #[test]
    fn test_missing_file_is_config_not_found() {
        let result = load_config_from_path(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(Error::ConfigNotFound)));
    }
}
