//! Application error types.
//!
//! The hub itself never fails; these cover the surrounding application:
//! loading configuration and driving the console.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("console I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid command: {0}")]
    Command(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
