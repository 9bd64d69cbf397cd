//! Convenience re-exports for common converter usage

// Composite binding
pub use crate::composite::{
    ColumnInfo, CompositeBinder, CompositeConverter, CompositeType, FieldBinding, Projection,
    Resolver,
};

// Field and scalar contracts
pub use crate::field::FieldValue;
pub use crate::scalar::ScalarCodec;

// Registry and errors
pub use crate::errors::ConverterError;
pub use crate::registry::ConverterRegistry;

// Literal model
pub use type_mapping::{PostgresReader, PostgresTuple, PostgresWriter, TupleError, TupleShape};
