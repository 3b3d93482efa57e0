use std::env;
use std::fmt;

use crate::workflows::merge::{AllowedDepartment, MergeConfig, ParseDepartmentError};

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub merge: MergeConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let department = env::var("MERGE_ALLOWED_DEPARTMENT").unwrap_or_else(|_| "undergrad".to_string());
        let allowed_department = department
            .parse::<AllowedDepartment>()
            .map_err(|source| ConfigError::InvalidDepartment { source })?;

        let threshold = env::var("MERGE_CONFLICT_ROW_THRESHOLD").unwrap_or_else(|_| "2".to_string());
        let conflict_row_threshold = threshold
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidThreshold { value: threshold.clone() })?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            merge: MergeConfig {
                allowed_department,
                conflict_row_threshold,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidDepartment { source: ParseDepartmentError },
    InvalidThreshold { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDepartment { source } => {
                write!(f, "MERGE_ALLOWED_DEPARTMENT is invalid: {source}")
            }
            ConfigError::InvalidThreshold { value } => write!(
                f,
                "MERGE_CONFLICT_ROW_THRESHOLD must be a non-negative integer, got `{value}`"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidDepartment { source } => Some(source),
            ConfigError::InvalidThreshold { .. } => None,
        }
    }
}
