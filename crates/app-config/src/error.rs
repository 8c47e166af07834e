// In crates/app-config/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load configuration")]
    LoadError(#[from] config::ConfigError),

    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid UTC offset '{0}' (expected +HH:MM or -HH:MM)")]
    InvalidTimezone(String),

    #[error("Invalid MACD settings: {0}")]
    InvalidMacd(#[from] strategies::Error),

    #[error("Invalid scanner settings: {0}")]
    InvalidScanner(String),

    #[error("No symbols configured for scanning")]
    NoSymbols,
}

pub type Result<T> = std::result::Result<T, Error>;
