use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::validation::{is_in_range, is_valid_number};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  /// Custom title for header (defaults to "Joblo.ai")
  pub title: Option<String>,
  /// Durable store location (defaults to $XDG_DATA_HOME/joblo/storage.db)
  pub storage_path: Option<PathBuf>,
  #[serde(default)]
  pub service: ServiceConfig,
  #[serde(default)]
  pub cache: CacheConfig,
  #[serde(default)]
  pub jobs: JobsConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ServiceConfig {
  /// Probability in [0, 1] that a mock call fails
  #[serde(default = "default_failure_rate")]
  pub failure_rate: f64,
  /// Whether mock calls sleep for their simulated latency
  #[serde(default = "default_true")]
  pub latency: bool,
}

impl Default for ServiceConfig {
  fn default() -> Self {
    Self {
      failure_rate: default_failure_rate(),
      latency: true,
    }
  }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CacheConfig {
  /// Seconds a cached response stays fresh
  #[serde(default = "default_ttl_secs")]
  pub ttl_secs: u64,
}

impl CacheConfig {
  pub fn ttl(&self) -> Duration {
    Duration::from_secs(self.ttl_secs)
  }
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      ttl_secs: default_ttl_secs(),
    }
  }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct JobsConfig {
  /// Jobs per page when a listing doesn't ask for a limit
  #[serde(default = "default_page_limit")]
  pub page_limit: u32,
}

impl Default for JobsConfig {
  fn default() -> Self {
    Self {
      page_limit: default_page_limit(),
    }
  }
}

fn default_failure_rate() -> f64 {
  0.1
}

fn default_true() -> bool {
  true
}

fn default_ttl_secs() -> u64 {
  300
}

fn default_page_limit() -> u32 {
  12
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./joblo.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/joblo/config.yaml
  ///
  /// Without any file the defaults apply.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("joblo.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("joblo").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;
    check_failure_rate(config.service.failure_rate)
      .map_err(|e| eyre!("service.failure_rate {}", e))?;
    Ok(config)
  }

  /// Header brand
  pub fn title(&self) -> &str {
    self.title.as_deref().unwrap_or("Joblo.ai")
  }

  /// Resolve the durable store path, falling back to the data directory.
  pub fn storage_path(&self) -> Result<PathBuf> {
    if let Some(path) = &self.storage_path {
      return Ok(path.clone());
    }
    Ok(data_dir()?.join("storage.db"))
  }
}

/// Parse a `--failure-rate` argument
pub fn parse_failure_rate(raw: &str) -> std::result::Result<f64, String> {
  if !is_valid_number(raw) {
    return Err(format!("not a number: {}", raw));
  }
  if !is_in_range(raw, 0.0, 1.0) {
    return Err(format!("must be between 0 and 1, got {}", raw.trim()));
  }
  raw.trim().parse().map_err(|_| format!("not a number: {}", raw))
}

/// NaN fails the range check too
fn check_failure_rate(rate: f64) -> std::result::Result<f64, String> {
  if (0.0..=1.0).contains(&rate) {
    Ok(rate)
  } else {
    Err(format!("must be between 0 and 1, got {}", rate))
  }
}

/// Per-user data directory for the store and logs
pub fn data_dir() -> Result<PathBuf> {
  let data_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?;

  Ok(data_dir.join("joblo"))
}
