//! Quoting rules and invariant checks for literal trees

use crate::errors::TupleError;
use crate::types::{PostgresTuple, ScalarValue};

/// Whether scalar text must be quoted to survive inside a record or array.
///
/// Empty text would read back as null, a bare `NULL` as the null token, and
/// the structural characters or whitespace would split or be trimmed.
pub fn requires_quoting(text: &str) -> bool {
    text.is_empty()
        || text.eq_ignore_ascii_case("NULL")
        || text.bytes().any(|b| {
            matches!(b, b'"' | b'\\' | b'(' | b')' | b'{' | b'}' | b',') || b.is_ascii_whitespace()
        })
}

/// Check that every precomputed literal in the tree is safe to emit unquoted
pub fn validate(tuple: &PostgresTuple) -> Result<(), TupleError> {
    match tuple {
        PostgresTuple::Null => Ok(()),
        PostgresTuple::Scalar(ScalarValue::Literal(text)) if requires_quoting(text) => Err(
            TupleError::EncodingInvariant(format!("literal {:?} is not flagged for quoting", text)),
        ),
        PostgresTuple::Scalar(_) => Ok(()),
        PostgresTuple::Record(values) | PostgresTuple::Array(values) => {
            values.iter().try_for_each(validate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    #[test]
    fn test_requires_quoting() {
        assert!(!requires_quoting("abc"));
        assert!(!requires_quoting("-2147483648"));
        assert!(requires_quoting(""));
        assert!(requires_quoting("null"));
        assert!(requires_quoting("a b"));
        assert!(requires_quoting("a\tb"));
        for special in ["\"", "\\", "(", ")", "{", "}", ","] {
            assert!(requires_quoting(special), "{} should be quoted", special);
        }
        assert!(!requires_quoting("it's"));
    }

    #[test]
    fn test_validate_accepts_plain_tree() {
        let tuple = PostgresTuple::Record(vec![
            PostgresTuple::from(i64::MIN),
            PostgresTuple::text("needs quoting, fine"),
            PostgresTuple::Array(vec![PostgresTuple::from(true), PostgresTuple::Null]),
        ]);
        assert!(validate(&tuple).is_ok());
    }

    #[test]
    fn test_validate_rejects_unsafe_literal() {
        let tuple = PostgresTuple::Array(vec![PostgresTuple::Scalar(ScalarValue::Literal(
            Cow::Borrowed("a,b"),
        ))]);
        assert!(matches!(
            validate(&tuple),
            Err(TupleError::EncodingInvariant(_))
        ));
    }
}
