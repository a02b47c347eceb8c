// Configuration utilities

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::{DEFAULT_MISSING_VALUES, DEFAULT_PLACEHOLDER, TAG_COLUMNS};
use super::{AppError, AppResult};

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub cleaning: CleaningConfig,
    pub tags: TagConfig,
    pub aggregation: AggregationConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

/// Input file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub path: String,
    pub delimiter: char,
    pub missing_values: Vec<String>,
}

/// Missing-value substitution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    pub placeholder: String,
}

/// Tag expansion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TagConfig {
    pub columns: Vec<String>,
}

/// Yearly aggregation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    pub key: String,
    pub rating_column: String,
    /// Years strictly greater than this form the "recent games" slice
    pub recent_year_floor: i64,
    /// Boundary year splitting the ratings into an earlier and a later era
    pub era_split_year: i64,
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub out_dir: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: InputConfig::default(),
            cleaning: CleaningConfig::default(),
            tags: TagConfig::default(),
            aggregation: AggregationConfig::default(),
            export: ExportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            path: "board_games.csv".to_string(),
            delimiter: ',',
            missing_values: DEFAULT_MISSING_VALUES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

impl Default for CleaningConfig {
    fn default() -> Self {
        CleaningConfig {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl Default for TagConfig {
    fn default() -> Self {
        TagConfig {
            columns: TAG_COLUMNS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        AggregationConfig {
            key: "year_published".to_string(),
            rating_column: "average_rating".to_string(),
            recent_year_floor: 2006,
            era_split_year: 1992,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            out_dir: "out".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON or YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let mut file = File::open(&path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        let config = match extension {
            "json" => serde_json::from_str(&contents)
                .map_err(|e| AppError::Config(e.to_string()))?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .map_err(|e| AppError::Config(e.to_string()))?,
            other => {
                return Err(AppError::Config(format!(
                    "unsupported config file format '{}'",
                    other
                )))
            }
        };

        Ok(config)
    }

    /// Get the log level filter
    pub fn log_level_filter(&self) -> log::LevelFilter {
        match self.logging.level.to_lowercase().as_str() {
            "off" => log::LevelFilter::Off,
            "error" => log::LevelFilter::Error,
            "warn" => log::LevelFilter::Warn,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            _ => log::LevelFilter::Info,
        }
    }
}
