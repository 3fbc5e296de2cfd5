//! Error types for the value engine

use rust_decimal::Decimal;
use thiserror::Error;

/// A record that reached the core with values the scoring cannot trust
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Player name is empty")]
    EmptyName,

    #[error("Field {field} is not a finite number: {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("Field {field} = {value} is outside [{min}, {max}]")]
    OutOfRange { field: &'static str, value: f64, min: f64, max: f64 },

    #[error("Salary cannot be negative: {salary}")]
    NegativeSalary { salary: Decimal },

    #[error("Three-point makes ({makes}) exceed attempts ({attempts})")]
    MakesExceedAttempts { makes: u32, attempts: u32 },
}

/// Errors raised while loading or checking the run configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        ConfigError::Invalid { field, message: message.into() }
    }
}
