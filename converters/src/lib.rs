//! Converters - typed codecs for PostgreSQL composite and array literals
//!
//! This crate provides the scalar codecs, the uniform field contract built on
//! top of them, and the ordinal-bound composite converters that turn entity
//! structs into literals and back.

pub mod composite;
pub mod errors;
pub mod field;
pub mod prelude;
pub mod registry;
pub mod scalar;

pub use composite::{
    ColumnInfo, CompositeBinder, CompositeConverter, CompositeType, FieldBinding, Projection,
    Resolver,
};
pub use errors::ConverterError;
pub use field::FieldValue;
pub use registry::ConverterRegistry;
pub use scalar::ScalarCodec;

pub use type_mapping;
