use serde_json;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::models::{AppConfig, Environment};

const DATA_DIR: &str = ".daycare_gateway";
const CONFIG_FILE: &str = "gateway_config.json";

/// Get data directory path
pub fn get_data_dir() -> AppResult<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| AppError::Config("Failed to get user home directory".to_string()))?;
    let data_dir = home.join(DATA_DIR);

    // Ensure directory exists
    if !data_dir.exists() {
        fs::create_dir_all(&data_dir)?;
    }

    Ok(data_dir)
}

/// Load application config from the data directory, then apply environment overrides
pub fn load_app_config() -> AppResult<AppConfig> {
    let data_dir = get_data_dir()?;
    let config = load_app_config_from(&data_dir.join(CONFIG_FILE))?;
    Ok(apply_env_overrides(config, |key| std::env::var(key).ok()))
}

/// Load config from an explicit path; a missing file is created with defaults
pub fn load_app_config_from(config_path: &Path) -> AppResult<AppConfig> {
    if !config_path.exists() {
        let config = AppConfig::new();
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        save_app_config_to(config_path, &config)?;
        tracing::info!("Created default config at {}", config_path.display());
        return Ok(config);
    }

    let content = fs::read_to_string(config_path)?;

    serde_json::from_str(&content)
        .map_err(|e| AppError::Config(format!("Failed to parse config file: {}", e)))
}

/// Save application config
pub fn save_app_config(config: &AppConfig) -> AppResult<()> {
    let data_dir = get_data_dir()?;
    save_app_config_to(&data_dir.join(CONFIG_FILE), config)
}

pub fn save_app_config_to(config_path: &Path, config: &AppConfig) -> AppResult<()> {
    let content = serde_json::to_string_pretty(config)?;
    fs::write(config_path, content)?;
    Ok(())
}

/// Overlay environment values on top of the file config.
///
/// `API_URL` wins over `NEXT_PUBLIC_API_URL`; `APP_ENV` wins over `NODE_ENV`.
/// Empty values are treated as unset.
pub fn apply_env_overrides<F>(mut config: AppConfig, lookup: F) -> AppConfig
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(api_url) = get("API_URL").or_else(|| get("NEXT_PUBLIC_API_URL")) {
        config.proxy.api_url = Some(api_url);
    }

    if let Some(env) = get("APP_ENV").or_else(|| get("NODE_ENV")) {
        config.environment = Environment::from_name(&env);
    }

    if let Some(port) = get("GATEWAY_PORT") {
        match port.trim().parse::<u16>() {
            Ok(p) => config.proxy.port = p,
            Err(_) => tracing::warn!("Ignoring invalid GATEWAY_PORT value: {}", port),
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_server_side_api_url_wins() {
        let vars = env(&[
            ("API_URL", "http://backend.internal:8080"),
            ("NEXT_PUBLIC_API_URL", "https://api.example.com"),
        ]);
        let config = apply_env_overrides(AppConfig::new(), |k| vars.get(k).cloned());
        assert_eq!(config.proxy.api_url.as_deref(), Some("http://backend.internal:8080"));
    }

    #[test]
    fn test_public_api_url_fallback_and_environment() {
        let vars = env(&[
            ("API_URL", ""),
            ("NEXT_PUBLIC_API_URL", "https://api.example.com"),
            ("NODE_ENV", "production"),
            ("GATEWAY_PORT", "9100"),
        ]);
        let config = apply_env_overrides(AppConfig::new(), |k| vars.get(k).cloned());
        assert_eq!(config.proxy.api_url.as_deref(), Some("https://api.example.com"));
        assert!(config.environment.is_production());
        assert_eq!(config.proxy.port, 9100);
        assert_eq!(config.upload_proxy_endpoint(), "http://127.0.0.1:9100/api/proxy");
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let vars = env(&[("GATEWAY_PORT", "not-a-port")]);
        let config = apply_env_overrides(AppConfig::new(), |k| vars.get(k).cloned());
        assert_eq!(config.proxy.port, 8045);
    }

    #[test]
    fn test_missing_config_is_written_with_defaults() {
        let dir = std::env::temp_dir().join(format!("daycare-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join(CONFIG_FILE);

        let config = load_app_config_from(&path).unwrap();
        assert_eq!(config.proxy.port, 8045);
        assert!(path.exists());

        let on_disk: AppConfig = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.upload.upload_path, "/api/v1/s3/upload");
        assert_eq!(on_disk.upload.proxy_endpoint, None);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_then_load() {
        let dir = std::env::temp_dir().join(format!("daycare-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE);

        assert_eq!(load_app_config_from(&path).unwrap().proxy.port, 8045);

        let mut config = AppConfig::new();
        config.proxy.api_url = Some("https://api.example.com".to_string());
        config.upload.max_width = 800;
        save_app_config_to(&path, &config).unwrap();

        let loaded = load_app_config_from(&path).unwrap();
        assert_eq!(loaded.proxy.api_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(loaded.upload.max_width, 800);

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_app_config_from(&path), Err(AppError::Config(_))));

        let _ = fs::remove_dir_all(&dir);
    }
}
