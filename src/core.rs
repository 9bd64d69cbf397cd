//! Core pgtuple functionality
//!
//! This module contains the main PgTuple struct, which owns the database pool
//! and the converter registry built from the catalog.

use converters::{ColumnInfo, CompositeConverter, CompositeType, ConverterRegistry};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::PgTupleError;
use crate::schema::ColumnSource;
use config::AppConfig;

/// Entry point that ties catalog metadata to composite converters
pub struct PgTuple {
    pool: PgPool,
    registry: ConverterRegistry,
}

impl PgTuple {
    /// Connect with the configured pool settings and load column metadata
    pub async fn new(config: AppConfig) -> Result<Self, PgTupleError> {
        config.validate()?;
        let database = &config.database;

        let mut pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(database.max_connections)
            .min_connections(database.min_connections)
            .acquire_timeout(Duration::from_secs(database.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(database.idle_timeout_seconds));

        if database.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(database.max_lifetime_seconds));
        }

        debug_log!(
            host = %database.host,
            database = %database.database,
            "connecting to PostgreSQL"
        );
        let pool = pool_options.connect(&database.connection_string()).await?;

        Self::from_pool(pool, &config.schema.include_schemas).await
    }

    /// Load column metadata through an existing pool
    pub async fn from_pool(pool: PgPool, include_schemas: &[String]) -> Result<Self, PgTupleError> {
        let columns = pool.load_columns(include_schemas).await?;
        debug_log!(columns = columns.len(), "loaded composite column metadata");
        Ok(Self::with_columns(pool, columns))
    }

    /// Use an already known column snapshot instead of querying the catalog
    pub fn with_columns(pool: PgPool, columns: Vec<ColumnInfo>) -> Self {
        Self {
            pool,
            registry: ConverterRegistry::new(columns),
        }
    }

    /// Re-read column metadata, dropping every cached converter.
    ///
    /// Types have to be registered again afterwards.
    pub async fn reload_columns(&mut self, include_schemas: &[String]) -> Result<(), PgTupleError> {
        let columns = self.pool.load_columns(include_schemas).await?;
        trace_log!(columns = columns.len(), "reloaded composite column metadata");
        self.registry = ConverterRegistry::new(columns);
        Ok(())
    }

    /// Get database pool reference
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    /// Build and cache the converter for `T` and every composite nested in it.
    ///
    /// Fails fast with a schema mismatch when the catalog has drifted.
    pub fn register<T: CompositeType>(&mut self) -> Result<Arc<CompositeConverter<T>>, PgTupleError> {
        let converter = self.registry.converter::<T>()?;
        debug_log!(
            schema = T::SCHEMA,
            type_name = T::TYPE_NAME,
            "registered composite type"
        );
        Ok(converter)
    }

    /// Converter for `T`, registered earlier with [`register`](Self::register)
    pub fn converter<T: CompositeType>(&self) -> Result<Arc<CompositeConverter<T>>, PgTupleError> {
        self.registry
            .get::<T>()
            .ok_or_else(|| PgTupleError::NotRegistered(format!("{}.{}", T::SCHEMA, T::TYPE_NAME)))
    }

    /// Literal text of `value`
    pub fn encode<T: CompositeType>(&self, value: &T) -> Result<String, PgTupleError> {
        Ok(self.converter::<T>()?.base().to_text(value))
    }

    /// `value` as an SQL string constant, ready to splice into a statement
    pub fn encode_sql<T: CompositeType>(&self, value: &T) -> Result<String, PgTupleError> {
        let converter = self.converter::<T>()?;
        Ok(converter.base().to_tuple(value).build_tuple(true))
    }

    /// Decode literal text produced by PostgreSQL; `NULL` is `None`
    pub fn decode<T: CompositeType>(&self, text: &str) -> Result<Option<T>, PgTupleError> {
        Ok(self.converter::<T>()?.base().from_text(text)?)
    }

    /// Decode an array of `T`; `NULL` elements stay `None`
    pub fn decode_collection<T: CompositeType>(
        &self,
        text: &str,
    ) -> Result<Option<Vec<Option<T>>>, PgTupleError> {
        Ok(self
            .converter::<T>()?
            .base()
            .nullable_collection_from_text(text)?)
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), PgTupleError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
