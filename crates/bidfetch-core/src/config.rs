use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fixed request headers sent with every download (`[headers]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderConfig {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    /// Portal the notices come from; some mirrors refuse requests without it.
    pub referer: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
            accept: "application/pdf,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
                .to_string(),
            accept_language: "en-US,en;q=0.5".to_string(),
            referer: "https://bolpatra.gov.np/".to_string(),
        }
    }
}

/// Global configuration loaded from `~/.config/bidfetch/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Connect and idle-transfer timeout per file, in seconds.
    pub timeout_secs: u64,
    /// Pause between consecutive downloads, in milliseconds.
    pub pace_ms: u64,
    /// Verify TLS certificates. Off by default: the portal serves a broken chain.
    pub verify_tls: bool,
    /// Optional libcurl receive buffer size in bytes (None = library default).
    #[serde(default)]
    pub buffer_size: Option<usize>,
    #[serde(default)]
    pub headers: HeaderConfig,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 40,
            pace_ms: 500,
            verify_tls: false,
            buffer_size: None,
            headers: HeaderConfig::default(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn pace(&self) -> Duration {
        Duration::from_millis(self.pace_ms)
    }

    /// Reject values that would make every download fail.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than zero");
        }
        let referer = url::Url::parse(&self.headers.referer)
            .with_context(|| format!("invalid referer URL: {}", self.headers.referer))?;
        if referer.scheme() != "http" && referer.scheme() != "https" {
            anyhow::bail!("referer must be an http(s) URL, got {}", referer.scheme());
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("bidfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchConfig> {
    load_or_init_at(&config_path()?)
}

/// Same as [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<FetchConfig> {
    if !path.exists() {
        let default_cfg = FetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: FetchConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
