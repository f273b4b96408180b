//! Application configuration module / 应用配置模块
//!
//! Loaded from config.json, created with defaults on first run.
//! `DASH_*` environment variables override file values / 环境变量优先于配置文件

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration / 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration / 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// Icon catalog configuration / 图标目录配置
    #[serde(default)]
    pub icons: IconConfig,
}

/// Server configuration / 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address / 服务器监听地址
    pub host: String,
    /// Server port / 服务器端口
    pub port: u16,
}

/// Icon catalog configuration / 图标目录配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    /// Remote index document / 远程索引地址
    pub index_url: String,
    /// Base URL for catalog assets / 图标资源根地址
    pub raw_base: String,
    /// Iconify API base / Iconify API 地址
    pub iconify_api_base: String,
    /// Index cache TTL in seconds / 索引缓存有效期（秒）
    pub index_ttl_secs: i64,
    /// Upper bound for search `limit` / 搜索结果上限
    pub search_max_limit: usize,
    /// Outbound request timeout in seconds / 请求超时（秒）
    pub fetch_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8788,
        }
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            index_url: "https://raw.githubusercontent.com/selfhst/icons/main/index.json".to_string(),
            raw_base: "https://raw.githubusercontent.com/selfhst/icons/main".to_string(),
            iconify_api_base: "https://api.iconify.design".to_string(),
            index_ttl_secs: 21600,
            search_max_limit: 30,
            fetch_timeout_secs: 20,
        }
    }
}

impl AppConfig {
    /// Get the server bind address / 获取服务器绑定地址
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Apply `DASH_*` overrides from a variable lookup / 应用环境变量覆盖
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("DASH_BIND") {
            self.server.host = host;
        }
        override_number(&lookup, "DASH_PORT", &mut self.server.port);

        let icons = &mut self.icons;
        if let Some(url) = lookup("DASH_ICON_INDEX_URL") {
            icons.index_url = url;
        }
        if let Some(base) = lookup("DASH_ICON_RAW_BASE") {
            icons.raw_base = base;
        }
        if let Some(base) = lookup("DASH_ICONIFY_API_BASE") {
            icons.iconify_api_base = base;
        }
        override_number(&lookup, "DASH_ICON_INDEX_TTL", &mut icons.index_ttl_secs);
        override_number(&lookup, "DASH_ICON_SEARCH_MAX_LIMIT", &mut icons.search_max_limit);
        override_number(&lookup, "DASH_ICON_FETCH_TIMEOUT", &mut icons.fetch_timeout_secs);
    }
}

fn override_number<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    if let Some(raw) = lookup(key) {
        match raw.trim().parse() {
            Ok(value) => *target = value,
            Err(_) => tracing::warn!("Ignoring invalid {}={:?}", key, raw),
        }
    }
}

/// Get the config file path / 获取配置文件路径
fn get_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from file, or create default if not exists / 加载配置文件，不存在则创建默认配置
pub fn load_config() -> Result<AppConfig, String> {
    let config_path = get_config_path();

    let mut config = if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        tracing::info!("Loaded configuration from {:?}", config_path);
        config
    } else {
        let config = AppConfig::default();
        save_config(&config)?;
        tracing::info!("Created default configuration at {:?}", config_path);
        config
    };

    config.apply_overrides(|key| std::env::var(key).ok());
    Ok(config)
}

/// Save configuration to file / 保存配置到文件
pub fn save_config(config: &AppConfig) -> Result<(), String> {
    let config_path = get_config_path();

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    std::fs::write(&config_path, content)
        .map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(())
}
