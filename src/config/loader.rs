//! Layered configuration loading

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat};

use crate::config::environment::Environment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

const CONFIG_DIR_ENV: &str = "COURIER_CONFIG_DIR";

const CONFIG_FILE_ENV: &str = "COURIER_CONFIG_FILE";

const DEFAULT_CONFIG_DIR: &str = "config";

const ENV_PREFIX: &str = "COURIER";

/// Separator for nested keys: `COURIER_SERVER__PORT` -> `server.port`
const ENV_SEPARATOR: &str = "__";

/// Keys whose environment values are comma separated lists
const ENV_LIST_KEYS: &[&str] = &["server.cors_allowed_origins"];

/// Where the file layers come from
#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    /// `default.toml`, `{environment}.toml`, `local.toml` from one directory
    Layered(PathBuf),
    /// Exactly one file, no overlays
    Single(PathBuf),
}

/// Loads [`Settings`] from TOML layers followed by `COURIER_*` variables.
///
/// Precedence, lowest first:
/// 1. `default.toml` (required)
/// 2. `{environment}.toml`
/// 3. `local.toml`
/// 4. `COURIER_*` environment variables
#[derive(Debug)]
pub struct ConfigLoader {
    source: Source,
    environment: Environment,
}

impl ConfigLoader {
    /// Builds a loader from `COURIER_CONFIG_DIR`, `COURIER_CONFIG_FILE` and
    /// `COURIER_APP_ENV`.
    ///
    /// # Errors
    ///
    /// Fails when both `COURIER_CONFIG_DIR` and `COURIER_CONFIG_FILE` are set.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = std::env::var(CONFIG_DIR_ENV).ok();
        let config_file = std::env::var(CONFIG_FILE_ENV).ok();

        let source = match (config_dir, config_file) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::mutual_exclusivity(
                    "COURIER_CONFIG_DIR and COURIER_CONFIG_FILE cannot both be set. \
                     Use COURIER_CONFIG_DIR for layered configuration or \
                     COURIER_CONFIG_FILE for a single configuration file.",
                ));
            }
            (None, Some(file)) => Source::Single(PathBuf::from(file)),
            (Some(dir), None) => Source::Layered(PathBuf::from(dir)),
            (None, None) => Source::Layered(PathBuf::from(DEFAULT_CONFIG_DIR)),
        };

        Ok(Self {
            source,
            environment: Environment::from_env(),
        })
    }

    /// Layered loading from `dir` for an explicit environment
    pub fn with_dir(dir: impl Into<PathBuf>, environment: Environment) -> Self {
        Self {
            source: Source::Layered(dir.into()),
            environment,
        }
    }

    /// Loads only `path`, still honouring environment variable overrides
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::Single(path.into()),
            environment: Environment::from_env(),
        }
    }

    /// Overrides the environment picked from `COURIER_APP_ENV`
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Directory the layers are read from, `None` in single-file mode
    pub fn config_dir(&self) -> Option<&Path> {
        match &self.source {
            Source::Layered(dir) => Some(dir),
            Source::Single(_) => None,
        }
    }

    /// Reads every source, deserializes and validates the result.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let builder = match &self.source {
            Source::Single(file) => Self::add_file(Config::builder(), file, true)?,
            Source::Layered(dir) => {
                let builder = Self::add_file(Config::builder(), &dir.join("default.toml"), true)?;
                let builder =
                    Self::add_file(builder, &dir.join(self.environment.config_file_name()), false)?;
                Self::add_file(builder, &dir.join("local.toml"), false)?
            }
        };

        let settings: Settings = Self::add_env(builder)
            .build()?
            .try_deserialize()
            .map_err(|e| {
                ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
            })?;

        settings.validate()?;
        Ok(settings)
    }

    fn add_file(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.is_file() {
            return Err(ConfigError::file_not_found(format!(
                "Required configuration file not found: {}",
                path.display()
            )));
        }

        let name = path.to_str().ok_or_else(|| {
            ConfigError::ParseError(format!("Non UTF-8 configuration path: {}", path.display()))
        })?;

        Ok(builder.add_source(File::new(name, FileFormat::Toml).required(required)))
    }

    fn add_env(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        let env = ENV_LIST_KEYS.iter().fold(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true)
                .list_separator(","),
            |env, key| env.with_list_parse_key(key),
        );
        builder.add_source(env)
    }
}
