use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 7050;
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_WORKER_COUNT: usize = 4;
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const DEFAULT_PROXY_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_CLEAR_EVERY: u64 = 20;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Invalid port number: {0}")]
  InvalidPort(String),
  #[error("unable to read config file '{path}': {source}")]
  Read { path: PathBuf, source: std::io::Error },
  #[error("unable to parse config file '{path}': {source}")]
  Parse { path: PathBuf, source: serde_yaml::Error },
  #[error("static root '{path}' is not accessible: {source}")]
  StaticRoot { path: PathBuf, source: std::io::Error },
  #[error("static root '{0}' is not a directory")]
  StaticRootNotDir(PathBuf),
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
  Error,
  Warn,
  #[default]
  Info,
  Debug,
  Trace,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(default)]
pub struct ProxySettings {
  pub enabled: bool,
  pub timeout_secs: u64,
  pub preserve_content_type: bool,
  pub upstream_proxy: Option<String>,
  pub upstream_proxy_user: Option<String>,
  pub upstream_proxy_pass: Option<String>,
  pub cookies: bool,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(default)]
pub struct LogSettings {
  pub level: LogLevel,
  /// Clear the terminal every N access log lines, 0 turns it off.
  pub clear_every: u64,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub bind: String,
  pub port: u16,
  pub workers: usize,
  pub static_dir: PathBuf,
  pub proxy: ProxySettings,
  pub log: LogSettings,
}

impl Default for ProxySettings {
  fn default() -> Self {
    ProxySettings {
      enabled: true,
      timeout_secs: DEFAULT_PROXY_TIMEOUT_SECS,
      preserve_content_type: false,
      upstream_proxy: None,
      upstream_proxy_user: None,
      upstream_proxy_pass: None,
      cookies: false,
    }
  }
}

impl Default for LogSettings {
  fn default() -> Self {
    LogSettings {
      level: LogLevel::default(),
      clear_every: DEFAULT_CLEAR_EVERY,
    }
  }
}

impl Default for ServerConfig {
  fn default() -> Self {
    ServerConfig {
      bind: DEFAULT_BIND.into(),
      port: DEFAULT_PORT,
      workers: DEFAULT_WORKER_COUNT,
      static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
      proxy: ProxySettings::default(),
      log: LogSettings::default(),
    }
  }
}

impl ServerConfig {
  pub fn load_from_file(path: &Path) -> Result<ServerConfig, ConfigError> {
    let file = File::open(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    serde_yaml::from_reader(file).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Applies the `HTTP_*` and `LOG_LEVEL` environment variables on top of the current values.
  pub fn apply_env(&mut self) {
    self.apply_vars(|key| env::var(key).ok());
  }

  fn apply_vars<F>(&mut self, var: F)
  where
    F: Fn(&str) -> Option<String>,
  {
    if let Some(bind) = var("HTTP_BIND") {
      self.bind = bind;
    }
    if let Some(port) = var("HTTP_PORT").and_then(|e| e.parse::<u16>().ok()) {
      self.port = port;
    }
    if let Some(workers) = var("HTTP_WORKER_COUNT").and_then(|e| e.parse::<usize>().ok()) {
      self.workers = workers;
    }
    if let Some(proxy_url) = var("HTTP_PROXY_URL") {
      self.proxy.upstream_proxy = Some(proxy_url);
    }
    if let Some(user) = var("HTTP_PROXY_USER") {
      self.proxy.upstream_proxy_user = Some(user);
    }
    if let Some(pass) = var("HTTP_PROXY_PASS") {
      self.proxy.upstream_proxy_pass = Some(pass);
    }
    if let Some(cookies) = var("HTTP_PROXY_COOKIES").and_then(|e| e.parse::<bool>().ok()) {
      self.proxy.cookies = cookies;
    }
    if let Some(level) = var("LOG_LEVEL").and_then(|e| LogLevel::try_from(e.as_str()).ok()) {
      self.log.level = level;
    }
  }

  /// Resolves the static root once, relative paths against the working directory.
  pub fn resolve_static_root(&self) -> Result<PathBuf, ConfigError> {
    let root = self
      .static_dir
      .canonicalize()
      .map_err(|source| ConfigError::StaticRoot {
        path: self.static_dir.clone(),
        source,
      })?;

    if !root.is_dir() {
      return Err(ConfigError::StaticRootNotDir(root));
    }

    Ok(root)
  }
}

pub fn parse_port(value: &str) -> Result<u16, ConfigError> {
  u16::from_str(value.trim()).map_err(|_| ConfigError::InvalidPort(value.to_string()))
}

impl TryFrom<&str> for LogLevel {
  type Error = ();

  fn try_from(value: &str) -> Result<Self, ()> {
    match value.to_lowercase().as_str() {
      "error" => Ok(LogLevel::Error),
      "warn" => Ok(LogLevel::Warn),
      "info" => Ok(LogLevel::Info),
      "debug" => Ok(LogLevel::Debug),
      "trace" => Ok(LogLevel::Trace),
      _ => Err(()),
    }
  }
}

impl From<LogLevel> for LevelFilter {
  fn from(value: LogLevel) -> Self {
    match value {
      LogLevel::Error => LevelFilter::Error,
      LogLevel::Warn => LevelFilter::Warn,
      LogLevel::Info => LevelFilter::Info,
      LogLevel::Debug => LevelFilter::Debug,
      LogLevel::Trace => LevelFilter::Trace,
    }
  }
}
