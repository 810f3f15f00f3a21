//! Configuration types for enrollment-mart.
//!
//! [`Config::load`] layers, lowest priority first: the embedded defaults, a
//! TOML file (the path given, or `mart.toml` in the working directory if it
//! exists), and finally environment variables. [`Config::defaults`] returns the
//! embedded defaults without touching the filesystem (useful in tests).

use std::path::{Path, PathBuf};

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[paths]
raw_log       = "data/raw/enrollment_logs.txt"
processed_dir = "data/processed"

[clickhouse]
host     = "localhost"
port     = 8123
database = "default"
user     = "default"
password = ""
"#;

/// File picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "mart.toml";

/// Environment variables and the config keys they override.
pub const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("CLICKHOUSE_HOST", "clickhouse.host"),
    ("CLICKHOUSE_PORT", "clickhouse.port"),
    ("CLICKHOUSE_DB", "clickhouse.database"),
    ("CLICKHOUSE_USER", "clickhouse.user"),
    ("CLICKHOUSE_PASSWORD", "clickhouse.password"),
    ("MART_RAW_LOG", "paths.raw_log"),
    ("MART_PROCESSED_DIR", "paths.processed_dir"),
];

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub clickhouse: ClickHouseSettings,
}

/// `[paths]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_raw_log")]
    pub raw_log: PathBuf,
    #[serde(default = "default_processed_dir")]
    pub processed_dir: PathBuf,
}

fn default_raw_log() -> PathBuf { PathBuf::from("data/raw/enrollment_logs.txt") }
fn default_processed_dir() -> PathBuf { PathBuf::from("data/processed") }

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_log: default_raw_log(),
            processed_dir: default_processed_dir(),
        }
    }
}

/// `[clickhouse]` section: connection parameters for the table loader.
#[derive(Clone, Deserialize)]
pub struct ClickHouseSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default)]
    pub password: String,
}

fn default_host() -> String { "localhost".to_string() }
fn default_port() -> u16 { 8123 }
fn default_database() -> String { "default".to_string() }
fn default_user() -> String { "default".to_string() }

impl Default for ClickHouseSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database: default_database(),
            user: default_user(),
            password: String::new(),
        }
    }
}

impl ClickHouseSettings {
    /// HTTP endpoint. A host that already carries a scheme is used as-is.
    pub fn url(&self) -> String {
        if self.host.starts_with("http://") || self.host.starts_with("https://") {
            format!("{}:{}", self.host.trim_end_matches('/'), self.port)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }
}

// Keeps the password out of debug logs.
impl std::fmt::Debug for ClickHouseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickHouseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `path` (required when given) or `mart.toml` (optional),
    /// layered on the built-in defaults, with process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Like [`Config::load`], reading overrides through `env` instead of the
    /// process environment.
    pub fn load_with_env<F>(path: Option<&Path>, env: F) -> Result<Self, config::ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(file);
        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, env(var))?;
        }

        builder.build()?.try_deserialize()
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
