use crate::error::{AnalysisError, Result};
use crate::threshold::CANDIDATE_THRESHOLDS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_PATH: &str = "data/get_around_delay_analysis.csv";
pub const DEFAULT_SELECTED_THRESHOLD: u32 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Rental table to analyze (CSV or Parquet)
    pub data_path: PathBuf,

    /// Thresholds evaluated by the sweep, in display order
    pub thresholds: Vec<u32>,

    /// Threshold used for the detailed impact and gap description
    pub selected_threshold: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            thresholds: CANDIDATE_THRESHOLDS.to_vec(),
            selected_threshold: DEFAULT_SELECTED_THRESHOLD,
        }
    }
}

/// Partial config file; missing fields keep their defaults
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    data_path: Option<PathBuf>,
    thresholds: Option<Vec<u32>>,
    selected_threshold: Option<u32>,
}

impl AnalysisConfig {
    /// Load from a JSON file on top of the defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: ConfigFile = serde_json::from_str(&content)?;

        let mut config = Self::default();
        if let Some(data_path) = file.data_path {
            config.data_path = data_path;
        }
        if let Some(thresholds) = file.thresholds {
            config.thresholds = thresholds;
        }
        if let Some(selected) = file.selected_threshold {
            config.selected_threshold = selected;
        }
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `DELAY_DATA_PATH`, `DELAY_THRESHOLDS` and
    /// `DELAY_SELECTED_THRESHOLD`. Call `dotenv::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env()
    }

    pub fn with_env(self) -> Result<Self> {
        self.with_overrides(
            std::env::var("DELAY_DATA_PATH").ok(),
            std::env::var("DELAY_THRESHOLDS").ok(),
            std::env::var("DELAY_SELECTED_THRESHOLD").ok(),
        )
    }

    /// Apply string overrides (from the environment or the command line)
    pub fn with_overrides(
        mut self,
        data_path: Option<String>,
        thresholds: Option<String>,
        selected_threshold: Option<String>,
    ) -> Result<Self> {
        if let Some(path) = data_path {
            self.data_path = PathBuf::from(path);
        }
        if let Some(list) = thresholds {
            self.thresholds = parse_thresholds(&list)?;
        }
        if let Some(selected) = selected_threshold {
            self.selected_threshold = parse_threshold(&selected)?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.thresholds.is_empty() {
            return Err(AnalysisError::Config(
                "At least one threshold is required".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_threshold(value: &str) -> Result<u32> {
    value.trim().parse::<u32>().map_err(|e| {
        AnalysisError::Config(format!("Invalid threshold '{}': {}", value.trim(), e))
    })
}

/// Parse a comma-separated list such as `60,120,240`
pub fn parse_thresholds(list: &str) -> Result<Vec<u32>> {
    list.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(parse_threshold)
        .collect()
}
