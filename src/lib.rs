//! # pgtuple
//!
//! PostgreSQL composite and array text literals for Rust structs: a codec that
//! tracks escaping across arbitrary nesting, converters bound to catalog
//! column ordinals, and a derive that generates the bindings.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pgtuple::prelude::*;
//!
//! #[derive(Debug, Default, Composite)]
//! #[composite(schema = "test", name = "Simple")]
//! pub struct Simple {
//!     pub number: i32,
//!     pub text: String,
//! }
//!
//! #[derive(Debug, Default, Composite)]
//! #[composite(schema = "test", name = "Composite")]
//! pub struct Composite {
//!     pub id: Uuid,
//!
//!     #[column(record)]
//!     pub simple: Simple,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let mut pgtuple = PgTuple::new(config).await?;
//!     pgtuple.register::<Composite>()?;
//!
//!     let value = Composite {
//!         id: Uuid::new_v4(),
//!         simple: Simple { number: 5, text: "test me".to_string() },
//!     };
//!     let literal = pgtuple.encode(&value)?;
//!     let row: (String,) = sqlx::query_as("SELECT $1::test.\"Composite\"::text")
//!         .bind(&literal)
//!         .fetch_one(pgtuple.pool())
//!         .await?;
//!     let back: Option<Composite> = pgtuple.decode(&row.0)?;
//!     println!("{:?}", back);
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod prelude;
pub mod schema;

pub use core::PgTuple;
pub use errors::PgTupleError;
pub use schema::ColumnSource;

pub use config::{AppConfig, DatabaseConfig, SchemaConfig};

// Re-export internal crates used by macros and public API
// These MUST be public for the generated macro code to work correctly
pub use converter_derive;
pub use converters;
pub use type_mapping;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
