//! Configuration file support for dosecalc.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/dosecalc/config.toml`.
//! Besides the data location it carries the constant tables the engine
//! reads multipliers from, so that they can be tuned without a rebuild.

use crate::{ActivityLevel, AgeCategory, Error, Gender, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub age_multipliers: AgeMultipliers,

    #[serde(default)]
    pub activity_multipliers: ActivityMultipliers,

    #[serde(default)]
    pub creatinine_clearance: CreatinineClearanceConfig,
}

/// Data source configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct DataConfig {
    /// JSON file with supplement definitions; the built-in catalog is used when unset
    #[serde(default)]
    pub supplements_file: Option<PathBuf>,
}

/// Dose multipliers per age band
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AgeMultipliers {
    #[serde(default = "default_children_multiplier")]
    pub children: f64,

    #[serde(default = "default_adult_multiplier")]
    pub adult: f64,

    #[serde(default = "default_elderly_multiplier")]
    pub elderly: f64,
}

impl Default for AgeMultipliers {
    fn default() -> Self {
        Self {
            children: default_children_multiplier(),
            adult: default_adult_multiplier(),
            elderly: default_elderly_multiplier(),
        }
    }
}

impl AgeMultipliers {
    pub fn for_category(&self, category: AgeCategory) -> f64 {
        match category {
            AgeCategory::Children => self.children,
            AgeCategory::Adult => self.adult,
            AgeCategory::Elderly => self.elderly,
        }
    }
}

/// Dose multipliers per activity level
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ActivityMultipliers {
    #[serde(default = "default_neutral_multiplier")]
    pub sedentary: f64,

    #[serde(default = "default_neutral_multiplier")]
    pub light: f64,

    #[serde(default = "default_moderate_multiplier")]
    pub moderate: f64,

    #[serde(default = "default_active_multiplier")]
    pub active: f64,

    #[serde(default = "default_very_active_multiplier")]
    pub very_active: f64,
}

impl Default for ActivityMultipliers {
    fn default() -> Self {
        Self {
            sedentary: default_neutral_multiplier(),
            light: default_neutral_multiplier(),
            moderate: default_moderate_multiplier(),
            active: default_active_multiplier(),
            very_active: default_very_active_multiplier(),
        }
    }
}

impl ActivityMultipliers {
    pub fn for_level(&self, level: ActivityLevel) -> f64 {
        match level {
            ActivityLevel::Sedentary => self.sedentary,
            ActivityLevel::Light => self.light,
            ActivityLevel::Moderate => self.moderate,
            ActivityLevel::Active => self.active,
            ActivityLevel::VeryActive => self.very_active,
        }
    }
}

/// Cockcroft-Gault gender constants
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CreatinineClearanceConfig {
    #[serde(default = "default_male_constant")]
    pub male_constant: f64,

    #[serde(default = "default_female_constant")]
    pub female_constant: f64,
}

impl Default for CreatinineClearanceConfig {
    fn default() -> Self {
        Self {
            male_constant: default_male_constant(),
            female_constant: default_female_constant(),
        }
    }
}

impl CreatinineClearanceConfig {
    /// Anything other than male uses the female constant
    pub fn constant_for(&self, gender: Gender) -> f64 {
        match gender {
            Gender::Male => self.male_constant,
            Gender::Female | Gender::Other => self.female_constant,
        }
    }
}

// Default value functions
fn default_children_multiplier() -> f64 {
    0.5
}

fn default_adult_multiplier() -> f64 {
    1.0
}

fn default_elderly_multiplier() -> f64 {
    0.8
}

fn default_neutral_multiplier() -> f64 {
    1.0
}

fn default_moderate_multiplier() -> f64 {
    1.05
}

fn default_active_multiplier() -> f64 {
    1.1
}

fn default_very_active_multiplier() -> f64 {
    1.2
}

fn default_male_constant() -> f64 {
    1.0
}

fn default_female_constant() -> f64 {
    0.85
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
        base.join("dosecalc").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reject multipliers and constants that are not positive finite numbers
    pub fn validate(&self) -> Result<()> {
        let entries = [
            ("age_multipliers.children", self.age_multipliers.children),
            ("age_multipliers.adult", self.age_multipliers.adult),
            ("age_multipliers.elderly", self.age_multipliers.elderly),
            ("activity_multipliers.sedentary", self.activity_multipliers.sedentary),
            ("activity_multipliers.light", self.activity_multipliers.light),
            ("activity_multipliers.moderate", self.activity_multipliers.moderate),
            ("activity_multipliers.active", self.activity_multipliers.active),
            ("activity_multipliers.very_active", self.activity_multipliers.very_active),
            ("creatinine_clearance.male_constant", self.creatinine_clearance.male_constant),
            ("creatinine_clearance.female_constant", self.creatinine_clearance.female_constant),
        ];

        for (key, value) in entries {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a positive number, got {}",
                    key, value
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.data.supplements_file.is_none());
        assert_eq!(config.age_multipliers.adult, 1.0);
        assert_eq!(config.activity_multipliers.sedentary, 1.0);
        assert_eq!(config.creatinine_clearance.female_constant, 0.85);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_elderly_never_exceeds_adult_by_default() {
        let config = Config::default();
        assert!(config.age_multipliers.elderly <= config.age_multipliers.adult);
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.data.supplements_file = Some(PathBuf::from("/tmp/supplements.json"));
        config.activity_multipliers.very_active = 1.3;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[age_multipliers]
elderly = 0.7
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.age_multipliers.elderly, 0.7);
        assert_eq!(config.age_multipliers.children, 0.5); // default
        assert_eq!(config.creatinine_clearance.male_constant, 1.0); // default
    }

    #[test]
    fn test_rejects_non_positive_multiplier() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[activity_multipliers]\nactive = 0.0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("activity_multipliers.active"));
    }

    #[test]
    fn test_lookup_helpers() {
        let config = Config::default();
        assert_eq!(
            config.age_multipliers.for_category(AgeCategory::Elderly),
            0.8
        );
        assert_eq!(
            config.activity_multipliers.for_level(ActivityLevel::VeryActive),
            1.2
        );
        assert_eq!(
            config.creatinine_clearance.constant_for(Gender::Other),
            0.85
        );
    }
}
