use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment used when `ENVIRONMENT` is not set.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Application settings, built once at startup and passed to whatever needs them.
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub database_url: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_app_version")]
    pub app_version: String,
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Config {
    /// Loads configuration from `{CONFIG_DIR}/{ENVIRONMENT}` and then from
    /// environment variables, the latter taking precedence.
    ///
    /// `CONFIG_DIR` defaults to the crate's `config` directory. The file is
    /// required when `ENVIRONMENT` is set explicitly and optional otherwise.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let explicit_environment = std::env::var("ENVIRONMENT").ok();
        let environment = explicit_environment
            .clone()
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());
        let config_dir = std::env::var("CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_config_dir());

        Self::load(
            &config_dir,
            &environment,
            explicit_environment.is_some(),
            config::Environment::default(),
        )
    }

    fn load(
        config_dir: &Path,
        environment: &str,
        file_required: bool,
        variables: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let file = config_dir.join(environment);
        tracing::debug!("Loading configuration from {}", file.display());

        let settings = config::Config::builder()
            .set_default("environment", environment)?
            .add_source(config::File::from(file).required(file_required))
            .add_source(variables)
            .build()?;

        settings.try_deserialize()
    }
}

/// The `config` directory shipped next to this crate's manifest.
pub fn default_config_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("config")
}

fn default_port() -> u16 {
    8080
}

fn default_app_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_environment() -> String {
    DEFAULT_ENVIRONMENT.to_string()
}
