//! TOML-based configuration.
//!
//! Supports a config file (floe.toml). Every field has a default, so an
//! absent file or an empty table is valid.
//!
//! Example configuration:
//! ```toml
//! [classifier]
//! date_name_tokens = ["DATE", "_AT", "締日"]
//!
//! [catalog]
//! excluded_databases = ["SNOWFLAKE"]
//!
//! [guard]
//! default_limit_rows = 500
//! large_result_threshold = 10000
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Column classifier token lists.
    #[serde(default)]
    pub classifier: ClassifierSettings,

    /// Catalog listing exclusion rules.
    #[serde(default)]
    pub catalog: CatalogSettings,

    /// Execution guard limits.
    #[serde(default)]
    pub guard: GuardSettings,
}

/// Token lists for the column classifier.
///
/// Matching is substring-based over uppercased input, so the type lists
/// cover parameterized forms like `NUMBER(38,0)` as well.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClassifierSettings {
    /// Declared types treated as date/time.
    pub date_types: Vec<String>,

    /// Column-name substrings that mark a column date-like even when the
    /// declared type is textual. Includes the Japanese business-date
    /// vocabulary the source data uses.
    pub date_name_tokens: Vec<String>,

    /// Declared types treated as numeric.
    pub numeric_types: Vec<String>,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            date_types: vec![
                "DATE".into(),
                "DATETIME".into(),
                "TIME".into(),
                "TIMESTAMP".into(),
                "TIMESTAMP_NTZ".into(),
                "TIMESTAMP_LTZ".into(),
                "TIMESTAMP_TZ".into(),
            ],
            date_name_tokens: vec![
                "DATE".into(),
                "TIME".into(),
                "TIMESTAMP".into(),
                "CREATED".into(),
                "UPDATED".into(),
                "REGISTERED".into(),
                "_AT".into(),
                "DT".into(),
                "YMD".into(),
                "YYYYMMDD".into(),
                "日付".into(),
                "年月日".into(),
                "登録日".into(),
                "更新日".into(),
                "作成日".into(),
                "開始日".into(),
                "終了日".into(),
                "取引日".into(),
                "発生日".into(),
            ],
            numeric_types: vec![
                "NUMBER".into(),
                "NUMERIC".into(),
                "DECIMAL".into(),
                "INT".into(),
                "INTEGER".into(),
                "BIGINT".into(),
                "SMALLINT".into(),
                "TINYINT".into(),
                "BYTEINT".into(),
                "FLOAT".into(),
                "DOUBLE".into(),
                "REAL".into(),
            ],
        }
    }
}

/// Exclusion rules applied when listing catalog objects.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Databases hidden from the picker.
    pub excluded_databases: Vec<String>,

    /// Schemas hidden from the picker.
    pub excluded_schemas: Vec<String>,

    /// Application bookkeeping tables hidden from the picker.
    pub system_tables: Vec<String>,

    /// Prefix of session temp tables hidden from the picker.
    pub temp_table_prefix: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            excluded_databases: vec!["SNOWFLAKE".into(), "SNOWFLAKE_SAMPLE_DATA".into()],
            excluded_schemas: vec!["INFORMATION_SCHEMA".into()],
            system_tables: vec![
                "STANDARD_SEARCH_OBJECTS".into(),
                "ADHOC_SEARCH_OBJECTS".into(),
                "ANNOUNCEMENTS".into(),
            ],
            temp_table_prefix: "SNOWPARK_TEMP_TABLE_".into(),
        }
    }
}

/// Execution guard limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GuardSettings {
    /// Row limit appended to statements when the caller has not asked
    /// for all rows.
    pub default_limit_rows: u32,

    /// Probe counts above this are classified as large results.
    pub large_result_threshold: u64,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            default_limit_rows: 1000,
            large_result_threshold: 5000,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `FLOE_CONFIG`
    /// 2. `./floe.toml`
    /// 3. `~/.config/floe/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        // Check environment variable first
        if let Ok(path) = env::var("FLOE_CONFIG") {
            return Self::from_file(&path);
        }

        // Check local directory
        let local_config = PathBuf::from("floe.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        // Check user config directory
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("floe").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        // Return defaults if no config file found
        Ok(Settings::default())
    }
}
