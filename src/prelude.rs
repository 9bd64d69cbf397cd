//! Convenience re-exports for common pgtuple usage
//!
//! # Example
//!
//! ```rust
//! use pgtuple::prelude::*;
//! ```

// Core components
pub use crate::core::PgTuple;
pub use crate::errors::PgTupleError;
pub use crate::schema::ColumnSource;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, SchemaConfig};

// Converter types and traits
pub use converters::prelude::*;

// Re-export converters module for macro-generated code
pub use converters;

// Derive for composite entities
pub use converter_derive::Composite;

// Common external dependencies
pub use async_trait;
pub use sqlx;
pub use tokio;

// Commonly used types
pub use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
pub use rust_decimal::Decimal;
pub use sqlx::PgPool;
pub use uuid::Uuid;
