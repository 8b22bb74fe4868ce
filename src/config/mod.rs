//! Configuration module.
//!
//! Classifier token lists, catalog exclusion rules, and execution-guard
//! limits, loaded from a TOML file with defaults for every field.

mod settings;

pub use settings::{
    CatalogSettings, ClassifierSettings, GuardSettings, Settings, SettingsError,
};
