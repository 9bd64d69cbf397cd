//! Error types for the pgtuple crate
//!
//! This module contains all error types that can be returned by facade operations.

use config::ConfigError;
use converters::ConverterError;
use thiserror::Error;
use type_mapping::TupleError;

#[derive(Error, Debug)]
pub enum PgTupleError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Converter error: {0}")]
    Converter(#[from] ConverterError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Composite type not registered: {0}")]
    NotRegistered(String),
}

impl From<TupleError> for PgTupleError {
    fn from(error: TupleError) -> Self {
        PgTupleError::Converter(ConverterError::Tuple(error))
    }
}
