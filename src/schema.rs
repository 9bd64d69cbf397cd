//! Catalog metadata loading
//!
//! Reads the attributes of tables, views and composite types so converters
//! can bind entity fields by ordinal.

use async_trait::async_trait;
use converters::ColumnInfo;
use sqlx::{PgPool, Row};

/// Live attributes of every relation outside the system schemas.
///
/// The ordinal skips dropped attributes, matching the position a column has
/// in the record text PostgreSQL produces.
const COLUMNS_SQL: &str = r#"
SELECT
    ns.nspname::text AS type_schema,
    cl.relname::text AS type_name,
    att.attname::text AS column_name,
    tns.nspname::text AS column_schema,
    ty.typname::text AS column_type,
    (SELECT COUNT(*) + 1
       FROM pg_catalog.pg_attribute prev
      WHERE prev.attrelid = att.attrelid
        AND prev.attnum > 0
        AND NOT prev.attisdropped
        AND prev.attnum < att.attnum)::smallint AS column_order,
    NOT att.attnotnull AS is_nullable
FROM pg_catalog.pg_attribute att
JOIN pg_catalog.pg_class cl ON cl.oid = att.attrelid
JOIN pg_catalog.pg_namespace ns ON ns.oid = cl.relnamespace
JOIN pg_catalog.pg_type ty ON ty.oid = att.atttypid
JOIN pg_catalog.pg_namespace tns ON tns.oid = ty.typnamespace
WHERE cl.relkind IN ('r', 'v', 'c')
  AND att.attnum > 0
  AND NOT att.attisdropped
  AND left(ns.nspname, 3) <> 'pg_'
  AND ns.nspname <> 'information_schema'
  AND (cardinality($1::text[]) = 0 OR ns.nspname = ANY($1::text[]))
ORDER BY ns.nspname, cl.relname, att.attnum
"#;

/// Provider of composite column metadata
#[async_trait]
pub trait ColumnSource {
    /// Columns of every type in `include_schemas`, or in all user schemas when empty
    async fn load_columns(&self, include_schemas: &[String]) -> Result<Vec<ColumnInfo>, sqlx::Error>;
}

#[async_trait]
impl ColumnSource for PgPool {
    async fn load_columns(&self, include_schemas: &[String]) -> Result<Vec<ColumnInfo>, sqlx::Error> {
        let rows = sqlx::query(COLUMNS_SQL)
            .bind(include_schemas)
            .fetch_all(self)
            .await?;

        rows.iter()
            .map(|row| -> Result<ColumnInfo, sqlx::Error> {
                Ok(ColumnInfo {
                    type_schema: row.try_get("type_schema")?,
                    type_name: row.try_get("type_name")?,
                    column_name: row.try_get("column_name")?,
                    column_schema: row.try_get("column_schema")?,
                    column_type: row.try_get("column_type")?,
                    order: row.try_get("column_order")?,
                    nullable: row.try_get("is_nullable")?,
                })
            })
            .collect()
    }
}
