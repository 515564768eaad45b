//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.cura/config.json`) and environment.
//! Everything is resolved once at startup into [`RelaySettings`]; no component reads
//! the environment after that.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Local Flask development server.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000/chat";

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Messaging platform (WhatsApp Cloud API) send settings.
    #[serde(default)]
    pub platform: PlatformConfig,

    /// Prediction backend settings.
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Gateway bind and port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Port for HTTP (default 3000).
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bind address (default "127.0.0.1").
    #[serde(default = "default_gateway_bind")]
    pub bind: String,
}

/// Outbound platform send settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformConfig {
    /// Messages endpoint, e.g. `https://graph.facebook.com/v17.0/<PHONE_NUMBER_ID>/messages`.
    /// Overridden by CURA_PLATFORM_ENDPOINT env.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Bearer access token. Overridden by CURA_PLATFORM_TOKEN env.
    #[serde(default)]
    pub credential: Option<String>,

    /// Send timeout in seconds (default 10).
    #[serde(default = "default_platform_timeout")]
    pub timeout_secs: u64,
}

/// Prediction backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendConfig {
    /// Full URL of the backend chat endpoint. Overridden by CURA_BACKEND_URL env.
    #[serde(default)]
    pub url: Option<String>,

    /// Query timeout in seconds (default 30; hosted backends can cold-start slowly).
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
}

fn default_gateway_port() -> u16 {
    3000
}

fn default_gateway_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_platform_timeout() -> u64 {
    10
}

fn default_backend_timeout() -> u64 {
    30
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            bind: default_gateway_bind(),
        }
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            credential: None,
            timeout_secs: default_platform_timeout(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_backend_timeout(),
        }
    }
}

/// Values the relay needs at runtime, resolved from config and environment.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub backend_url: String,
    pub backend_timeout: Duration,
    pub platform_endpoint: Option<String>,
    pub platform_credential: Option<String>,
    pub platform_timeout: Duration,
}

impl RelaySettings {
    /// Resolve from config and the process environment.
    pub fn resolve(config: &Config) -> Self {
        Self::resolve_with(config, |name| std::env::var(name).ok())
    }

    /// Resolve with an explicit environment lookup. `CURA_*` variables override config values;
    /// blank values count as unset.
    pub fn resolve_with<F>(config: &Config, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_override = |name: &str| env(name).as_deref().and_then(non_empty);
        Self {
            backend_url: env_override("CURA_BACKEND_URL")
                .or_else(|| config.backend.url.as_deref().and_then(non_empty))
                .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
            backend_timeout: Duration::from_secs(config.backend.timeout_secs.max(1)),
            platform_endpoint: env_override("CURA_PLATFORM_ENDPOINT")
                .or_else(|| config.platform.endpoint.as_deref().and_then(non_empty)),
            platform_credential: env_override("CURA_PLATFORM_TOKEN")
                .or_else(|| config.platform.credential.as_deref().and_then(non_empty)),
            platform_timeout: Duration::from_secs(config.platform.timeout_secs.max(1)),
        }
    }

    /// Replies can only be delivered when both the endpoint and the credential are set.
    pub fn platform_configured(&self) -> bool {
        self.platform_endpoint.is_some() && self.platform_credential.is_some()
    }
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("CURA_CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| {
        dirs::home_dir()
            .map(|h| h.join(".cura").join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    })
}

/// Load config from the given path, CURA_CONFIG_PATH, or the default. Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}
