//! Application configuration
//!
//! This module re-exports the shared config type from fightline-types and
//! provides persistence and validation for it.

pub use fightline_types::{AppConfig, DEFAULT_PAGE_SIZE};

use crate::game_data::Encounter;

use super::ConfigError;

const APP_NAME: &str = "fightline";
const CONFIG_NAME: &str = "config";

/// Extension trait for AppConfig persistence
pub trait AppConfigExt: Sized {
    fn load() -> Self;
    fn try_load() -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn encounter(&self) -> Result<Encounter, ConfigError>;
}

impl AppConfigExt for AppConfig {
    /// Load the stored config, falling back to defaults if it is missing or unreadable.
    fn load() -> Self {
        Self::try_load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Using default configuration");
            AppConfig::default()
        })
    }

    fn try_load() -> Result<Self, ConfigError> {
        Ok(confy::load(APP_NAME, CONFIG_NAME)?)
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    /// Resolve `default_encounter` against the static encounter table.
    fn encounter(&self) -> Result<Encounter, ConfigError> {
        self.default_encounter
            .parse()
            .map_err(|_| ConfigError::UnknownEncounter {
                key: self.default_encounter.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_encounter_resolves_to_dsu() {
        let config = AppConfig::default();
        assert_eq!(config.encounter().unwrap(), Encounter::Dsu);
    }

    #[test]
    fn unknown_encounter_key_is_rejected() {
        let config = AppConfig {
            default_encounter: "e12s".to_string(),
            ..AppConfig::default()
        };
        let err = config.encounter().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownEncounter { ref key } if key == "e12s"));
    }
}
