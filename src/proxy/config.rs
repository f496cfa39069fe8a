use serde::{Deserialize, Serialize};

/// 反代服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// 是否允许局域网访问
    /// - false: 仅本机访问 127.0.0.1（默认）
    /// - true: 允许局域网访问 0.0.0.0
    #[serde(default)]
    pub allow_lan_access: bool,

    /// 监听端口
    pub port: u16,

    /// 后端 API 源地址, 相对路径会直接拼接在其后
    /// 环境变量 API_URL / NEXT_PUBLIC_API_URL 会覆盖此值
    #[serde(default)]
    pub api_url: Option<String>,

    /// 上游请求超时时间(秒)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// 入站请求体大小上限(字节)
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,

    /// 上游代理配置
    #[serde(default)]
    pub upstream_proxy: UpstreamProxyConfig,
}

/// 上游代理配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpstreamProxyConfig {
    /// 是否启用
    pub enabled: bool,
    /// 代理地址 (http://, https://, socks5://)
    pub url: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            allow_lan_access: false,
            port: 8045,
            api_url: None,
            request_timeout: default_request_timeout(),
            body_limit: default_body_limit(),
            upstream_proxy: UpstreamProxyConfig::default(),
        }
    }
}

fn default_request_timeout() -> u64 {
    120
}

fn default_body_limit() -> usize {
    100 * 1024 * 1024
}

impl ProxyConfig {
    /// 获取实际的监听地址
    pub fn get_bind_address(&self) -> &str {
        if self.allow_lan_access {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        }
    }

    /// Non-empty base origin, if one is configured
    pub fn base_url(&self) -> Option<&str> {
        self.api_url.as_deref().filter(|s| !s.is_empty())
    }
}
