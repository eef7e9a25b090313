//! Configuration for seeding a [`crate::TaskStore`].
//!
//! Defaults are empty. [`TaskStoreConfig::tutorial`] gives the three
//! starter tasks a fresh install shows, and [`TaskStoreConfig::from_env`]
//! reads a seed list from `TASKS_SEED`. The variable is read once, through
//! [`TaskStoreConfig::from_seed_var`].

use serde::Deserialize;
use std::ffi::OsString;
use thiserror::Error;

/// Environment variable holding seed titles
pub const SEED_ENV_VAR: &str = "TASKS_SEED";

/// Separator between titles in [`SEED_ENV_VAR`]
pub const SEED_SEPARATOR: char = '|';

/// Errors reading configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Variable is set but not valid UTF-8
    #[error("{var} is not valid unicode")]
    NotUnicode {
        /// Offending variable
        var: &'static str,
    },
}

/// Initial contents of a task store
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TaskStoreConfig {
    /// Titles added in order when the store is created; blank ones are skipped
    pub seed: Vec<String>,
}

impl TaskStoreConfig {
    /// Config with the given seed titles
    #[must_use]
    pub fn with_seed<I, T>(seed: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            seed: seed.into_iter().map(Into::into).collect(),
        }
    }

    /// The starter tasks shown on first launch
    #[must_use]
    pub fn tutorial() -> Self {
        Self::with_seed(["Learn React", "Build a To-Do App", "Test app"])
    }

    /// Reads [`SEED_ENV_VAR`]; unset means an empty seed
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotUnicode`] if the variable holds invalid UTF-8.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_seed_var(std::env::var_os(SEED_ENV_VAR))
    }

    /// Builds a config from the raw value of [`SEED_ENV_VAR`], `None` if unset
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotUnicode`] if `value` is not valid UTF-8.
    pub fn from_seed_var(value: Option<OsString>) -> Result<Self, ConfigError> {
        let Some(value) = value else {
            return Ok(Self::default());
        };
        let raw = value
            .into_string()
            .map_err(|_| ConfigError::NotUnicode { var: SEED_ENV_VAR })?;
        tracing::debug!(var = SEED_ENV_VAR, "Loading seed from environment");
        Ok(Self::parse_seed(&raw))
    }

    /// Splits a `|`-separated list of titles
    ///
    /// Entries are kept verbatim; trimming and blank filtering happen when
    /// they are added to a store.
    #[must_use]
    pub fn parse_seed(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::default();
        }
        Self::with_seed(raw.split(SEED_SEPARATOR))
    }
}
