use crate::proxy::ProxyConfig;
use serde::{Deserialize, Serialize};

/// Deployment environment; decides whether uploads go through the proxy route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

/// Upload helper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_max_dimension")]
    pub max_width: u32,
    #[serde(default = "default_max_dimension")]
    pub max_height: u32,
    /// Re-encode quality in 0.0..=1.0
    #[serde(default = "default_quality")]
    pub quality: f32,
    #[serde(default = "default_upload_path")]
    pub upload_path: String,
    /// Proxy route used for production uploads; unset means this gateway's own listener
    #[serde(default)]
    pub proxy_endpoint: Option<String>,
}

fn default_max_dimension() -> u32 {
    1920
}

fn default_quality() -> f32 {
    0.8
}

fn default_upload_path() -> String {
    "/api/v1/s3/upload".to_string()
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_width: default_max_dimension(),
            max_height: default_max_dimension(),
            quality: default_quality(),
            upload_path: default_upload_path(),
            proxy_endpoint: None,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            environment: Environment::Development,
            proxy: ProxyConfig::default(),
            upload: UploadConfig::default(),
        }
    }
}

impl AppConfig {
    /// Explicit `upload.proxy_endpoint`, else the local proxy route on the configured port
    pub fn upload_proxy_endpoint(&self) -> String {
        match self.upload.proxy_endpoint.as_deref().filter(|e| !e.trim().is_empty()) {
            Some(endpoint) => endpoint.to_string(),
            None => format!("http://127.0.0.1:{}/api/proxy", self.proxy.port),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}
