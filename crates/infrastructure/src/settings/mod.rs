//! Settings loader.
//!
//! `defaults/expanse.default.toml` is embedded so the documented defaults and
//! the runtime defaults cannot drift apart. Files, environment variables and
//! explicit overrides are layered on top through [`Loader`].

use std::path::Path;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, ValueKind};
use expanse_domain::Settings;

const DEFAULT_TOML: &str = include_str!("../../defaults/expanse.default.toml");

/// Prefix for environment variables, as in `EXPANSE__CLIENT__AUTO_LOGIN`.
pub const ENV_PREFIX: &str = "EXPANSE";

/// Errors raised while loading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A source could not be read or parsed.
    #[error("failed to load settings: {0}")]
    Load(#[from] ConfigError),
}

/// Layers setting sources over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Starts a loader seeded with the embedded defaults.
    #[must_use]
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layers a TOML file. Building fails if the file is missing.
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layers a TOML file if it exists.
    #[must_use]
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layers `EXPANSE__<GROUP>__<KEY>` variables from the process
    /// environment.
    #[must_use]
    pub fn with_environment(mut self) -> Self {
        self.builder = self.builder.add_source(environment());
        self
    }

    /// Layers variables from an explicit map instead of the process
    /// environment.
    #[must_use]
    pub fn with_environment_from<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: config::Map<String, String> = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self.builder = self.builder.add_source(environment().source(Some(vars)));
        self
    }

    /// Applies a single `group.key` override.
    ///
    /// # Errors
    /// Returns an error if the key is malformed.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, SettingsError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Builds and deserializes the layered settings.
    ///
    /// # Errors
    /// Returns an error if a required file is missing or a value has the
    /// wrong type.
    pub fn build(self) -> Result<Settings, SettingsError> {
        let settings: Settings = self.builder.build()?.try_deserialize()?;
        tracing::debug!(target: "expanse::settings", ?settings, "loaded settings");
        Ok(settings)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Loads the defaults overlaid with the process environment.
///
/// # Errors
/// Returns an error if an environment variable has the wrong type.
pub fn load_settings() -> Result<Settings, SettingsError> {
    Loader::new().with_environment().build()
}
