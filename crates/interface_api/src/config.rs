//! Pipeline configuration
//!
//! Values are layered: built-in defaults, then `FRAUD_*` environment
//! variables (a `.env` file is loaded into the environment by the binary).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use core_kernel::TableName;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "FRAUD";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub beneficiaries_path: PathBuf,
    pub inpatient_path: PathBuf,
    pub outpatient_path: PathBuf,
    pub providers_path: PathBuf,
    /// SQLite database holding the ingested tables
    pub database_url: String,
    pub dictionary_path: PathBuf,
    pub chart_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub serve_dashboard: bool,
    /// Serve the snapshot of a previous run instead of running the pipeline
    pub skip_pipeline: bool,
    pub log_level: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            beneficiaries_path: PathBuf::from("data/Train_Beneficiarydata.csv"),
            inpatient_path: PathBuf::from("data/Train_Inpatientdata.csv"),
            outpatient_path: PathBuf::from("data/Train_Outpatientdata.csv"),
            providers_path: PathBuf::from("data/Train.csv"),
            database_url: "sqlite://insurance_fraud.db".to_string(),
            dictionary_path: PathBuf::from("data_dictionary.md"),
            chart_path: PathBuf::from("fraud_risk_scores.svg"),
            host: "127.0.0.1".to_string(),
            port: 8501,
            serve_dashboard: true,
            skip_pipeline: false,
            log_level: "info".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Loads configuration from the environment over the defaults
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Source file of each ingested table
    pub fn sources(&self) -> [(TableName, &PathBuf); 4] {
        [
            (TableName::Beneficiaries, &self.beneficiaries_path),
            (TableName::InpatientClaims, &self.inpatient_path),
            (TableName::OutpatientClaims, &self.outpatient_path),
            (TableName::Providers, &self.providers_path),
        ]
    }

    /// Returns the dashboard address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
