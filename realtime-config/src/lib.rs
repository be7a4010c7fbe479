//! Loader for client configuration with file + environment overlays.
//!
//! Every field has a default, so an empty configuration is valid. Sources are
//! merged in the order they are added, then `REALTIME__`-prefixed environment
//! variables win (`REALTIME__CLIENT__TIMEOUT_SECS=5`), and finally `${VAR}`
//! placeholders inside string values are expanded.
use config::{Config, ConfigError, Environment, File};
use realtime_common::observability::{LogConfig, LogFormat};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

pub const DEFAULT_BASE_URL: &str = "https://search.yahoo.co.jp/realtime/";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RealtimeConfig {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub log: LogSettings,
}

/// Where and how the search client talks to the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Whole-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: None,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// `text` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub stderr: bool,
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: default_log_format(),
            stderr: false,
            dir: None,
        }
    }
}

impl LogSettings {
    /// Translate into the observability layer's [`LogConfig`].
    pub fn to_log_config(&self, app_name: &'static str) -> LogConfig {
        LogConfig {
            app_name,
            log_dir: self.dir.clone(),
            emit_stderr: self.stderr,
            format: LogFormat::from_name(&self.format),
            default_filter: self.filter.clone(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_timeout_secs() -> u64 {
    15
}
fn default_connect_timeout_secs() -> u64 {
    5
}
fn default_log_filter() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "text".into()
}

/// `<config dir>/realtime/realtime.yaml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("realtime").join("realtime.yaml"))
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (files + env overrides).
pub struct RealtimeConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env: Environment,
}

impl Default for RealtimeConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl RealtimeConfigLoader {
    /// Start from defaults; `REALTIME__` env overrides are applied last.
    ///
    /// ```
    /// use realtime_config::{RealtimeConfigLoader, DEFAULT_BASE_URL};
    ///
    /// let config = RealtimeConfigLoader::new().load().expect("defaults load");
    /// assert_eq!(config.client.base_url, DEFAULT_BASE_URL);
    /// assert_eq!(config.client.timeout_secs, 15);
    /// ```
    pub fn new() -> Self {
        let env = Environment::with_prefix("REALTIME")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true);
        Self {
            builder: Config::builder(),
            env,
        }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Like [`with_file`](Self::with_file), but a missing file is skipped.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use realtime_config::RealtimeConfigLoader;
    ///
    /// let cfg = RealtimeConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// client:
    ///   base_url: "http://localhost:8080/realtime/"
    ///   timeout_secs: 3
    /// log:
    ///   format: json
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.client.base_url, "http://localhost:8080/realtime/");
    /// assert_eq!(cfg.client.timeout_secs, 3);
    /// assert_eq!(cfg.client.connect_timeout_secs, 5);
    /// assert_eq!(cfg.log.format, "json");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    pub fn load(self) -> Result<RealtimeConfig, ConfigError> {
        let cfg = self.builder.add_source(self.env).build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: RealtimeConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}
