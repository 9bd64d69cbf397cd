use thiserror::Error;

/// Failures raised while reading or emitting a literal
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TupleError {
    /// Input ended early, or a character other than the expected delimiter appeared
    #[error("Malformed literal at position {position}: {message}")]
    MalformedLiteral { position: usize, message: String },

    /// A value reported escape requirements that contradict its own content
    #[error("Encoding invariant violated: {0}")]
    EncodingInvariant(String),
}

impl TupleError {
    pub fn is_malformed(&self) -> bool {
        matches!(self, TupleError::MalformedLiteral { .. })
    }
}
