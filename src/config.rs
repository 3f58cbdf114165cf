//! Settings with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. An optional TOML file
//! 3. Environment variables: `DICE_ROLLER__*` (nested keys joined with `__`,
//!    e.g. `DICE_ROLLER__LIMITS__MAX_SIDES=100`)

use std::path::Path;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::roll::DiceLimits;
use crate::session::Session;


const ENV_PREFIX: &str = "DICE_ROLLER";


/// Settings for the engine and the session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Largest accepted dice count and number of sides
    pub limits: DiceLimits,
    /// Number of entries kept in the roll history
    pub history_limit: usize,
    /// Rolls after which the history is cleared; `0` never clears
    pub clear_after: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            limits: DiceLimits::default(),
            history_limit: Session::DEFAULT_HISTORY_LIMIT,
            clear_after: Session::DEFAULT_CLEAR_AFTER,
        }
    }
}

impl Settings {
    /// Loads settings from defaults, then `path` if it exists, then the environment.
    ///
    /// # Errors
    /// A [`ConfigError`] if the file cannot be parsed or a value has the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    fn load_with_prefix(path: Option<&Path>, prefix: &str) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("limits.max_count", u64::from(defaults.limits.max_count))?
            .set_default("limits.max_sides", u64::from(defaults.limits.max_sides))?
            .set_default("history_limit", defaults.history_limit as u64)?
            .set_default("clear_after", defaults.clear_after)?;

        if let Some(path) = path {
            tracing::debug!(path = %path.display(), "loading settings file");
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Self = config.try_deserialize()?;
        tracing::debug!(?settings, "settings loaded");

        Ok(settings)
    }

    /// An [`Engine`] using these limits.
    pub fn engine(&self) -> Engine {
        Engine::new(self.limits)
    }

    /// An empty [`Session`] with this history limit and clear threshold.
    pub fn session(&self) -> Session {
        let clear_after = (self.clear_after > 0).then_some(self.clear_after);
        Session::new(self.history_limit, clear_after)
    }
}
