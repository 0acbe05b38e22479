use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Retry and timeout bounds for one class of requests (manifest, segment, license).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryParameters {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds.
    pub base_delay_ms: u64,
    /// Multiplier applied to the delay after each retry.
    pub backoff_factor: f64,
    /// Fraction of the delay to randomize by, in either direction (0.5 = ±50%).
    pub fuzz_factor: f64,
    /// Per-attempt timeout in milliseconds; 0 disables it.
    pub timeout_ms: u64,
    /// Upper bound on the backoff delay in milliseconds.
    pub max_delay_ms: Option<u64>,
}

impl Default for RetryParameters {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            base_delay_ms: 1000,
            backoff_factor: 2.0,
            fuzz_factor: 0.5,
            timeout_ms: 0,
            max_delay_ms: None,
        }
    }
}

impl RetryParameters {
    /// Per-attempt timeout, or `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts < 1 {
            anyhow::bail!("max_attempts must be at least 1");
        }
        if !(self.backoff_factor >= 1.0) {
            anyhow::bail!("backoff_factor must be >= 1.0, got {}", self.backoff_factor);
        }
        if !(0.0..=1.0).contains(&self.fuzz_factor) {
            anyhow::bail!("fuzz_factor must be within [0, 1], got {}", self.fuzz_factor);
        }
        Ok(())
    }
}

/// Key-system specific DRM options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedDrmConfig {
    pub distinctive_identifier_required: bool,
    pub persistent_state_required: bool,
    /// Required video security level; empty means none.
    pub video_robustness: String,
    /// Required audio security level; empty means none.
    pub audio_robustness: String,
    /// Pre-supplied server certificate; `None` lets the CDM request one.
    pub server_certificate: Option<Vec<u8>>,
}

/// License acquisition settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrmConfig {
    /// Retry parameters for license requests.
    pub retry_parameters: RetryParameters,
    /// Key system ID -> license server URI.
    pub servers: BTreeMap<String, String>,
    /// Clear-key key ID (hex) -> key (hex).
    pub clear_keys: BTreeMap<String, String>,
    pub advanced: BTreeMap<String, AdvancedDrmConfig>,
}

/// Manifest fetching settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Retry parameters for manifest requests.
    pub retry_parameters: RetryParameters,
}

/// Segment fetching and buffering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Retry parameters for segment requests.
    pub retry_parameters: RetryParameters,
    /// Seconds of content required before (re)starting playback.
    pub rebuffering_goal: f64,
    /// Seconds of content to buffer ahead of the playhead.
    pub buffering_goal: f64,
    /// Seconds of content to keep behind the playhead.
    pub buffer_behind: f64,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            retry_parameters: RetryParameters::default(),
            rebuffering_goal: 2.0,
            buffering_goal: 10.0,
            buffer_behind: 30.0,
        }
    }
}

/// Which configuration block a request's retry parameters come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    Manifest,
    Segment,
    License,
}

/// Global configuration loaded from `~/.config/mfetch/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub drm: DrmConfig,
    pub manifest: ManifestConfig,
    pub streaming: StreamingConfig,
    pub enable_adaptation: bool,
    pub preferred_audio_language: String,
    pub preferred_text_language: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            drm: DrmConfig::default(),
            manifest: ManifestConfig::default(),
            streaming: StreamingConfig::default(),
            enable_adaptation: true,
            preferred_audio_language: String::new(),
            preferred_text_language: String::new(),
        }
    }
}

impl PlayerConfig {
    pub fn retry_parameters_for(&self, kind: RequestType) -> &RetryParameters {
        match kind {
            RequestType::Manifest => &self.manifest.retry_parameters,
            RequestType::Segment => &self.streaming.retry_parameters,
            RequestType::License => &self.drm.retry_parameters,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.manifest
            .retry_parameters
            .validate()
            .context("manifest.retry_parameters")?;
        self.streaming
            .retry_parameters
            .validate()
            .context("streaming.retry_parameters")?;
        self.drm
            .retry_parameters
            .validate()
            .context("drm.retry_parameters")?;
        if self.streaming.buffering_goal < self.streaming.rebuffering_goal {
            anyhow::bail!(
                "streaming.buffering_goal ({}) must be >= rebuffering_goal ({})",
                self.streaming.buffering_goal,
                self.streaming.rebuffering_goal
            );
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PlayerConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PlayerConfig::default();
        save_to(&path, &default_cfg)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

pub fn load_from(path: &Path) -> Result<PlayerConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: PlayerConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config: {}", path.display()))?;
    Ok(cfg)
}

pub fn save_to(path: &Path, cfg: &PlayerConfig) -> Result<()> {
    let toml = toml::to_string_pretty(cfg)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml).with_context(|| format!("write config: {}", path.display()))?;
    Ok(())
}
