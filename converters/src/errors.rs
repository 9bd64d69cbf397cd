use thiserror::Error;
use type_mapping::TupleError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConverterError {
    #[error("Unable to find '{column}' column in {schema} {type_name}. Check if DB is in sync")]
    SchemaMismatch {
        schema: String,
        type_name: String,
        column: String,
    },

    #[error("Column '{column}' in {schema} {type_name} has ordinal {order}, expected 1..={count}")]
    InvalidOrdinal {
        schema: String,
        type_name: String,
        column: String,
        order: i16,
        count: usize,
    },

    #[error("Composite type {0} contains itself")]
    RecursiveComposite(String),

    #[error("Tuple error: {0}")]
    Tuple(#[from] TupleError),
}
