//! Composite (record) converters
//!
//! This module binds entity fields to composite type columns by ordinal and
//! provides the record-level parse and serialize operations.

pub mod binder;
pub mod binding;
pub mod column;
pub mod converter;

pub use binder::CompositeBinder;
pub use binding::{FieldBinding, FieldReader, FieldWriter};
pub use column::ColumnInfo;
pub use converter::{CompositeConverter, CompositeType, Projection, Resolver};
