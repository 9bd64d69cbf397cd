//! Value model for composite and array literals
//!
//! A [`PostgresTuple`] is built fresh for every serialize or parse call and is
//! never mutated afterwards.

use std::borrow::Cow;
use uuid::Uuid;

const INT2_MIN_LITERAL: &str = "-32768";
const INT4_MIN_LITERAL: &str = "-2147483648";
const INT8_MIN_LITERAL: &str = "-9223372036854775808";

/// One node of a PostgreSQL literal
#[derive(Debug, Clone, PartialEq)]
pub enum PostgresTuple {
    Null,
    Scalar(ScalarValue),
    /// One entry per column, in schema column order
    Record(Vec<PostgresTuple>),
    Array(Vec<PostgresTuple>),
}

/// Textual content of a primitive, formatted lazily where that avoids an allocation
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    /// Arbitrary text; quoted whenever its content requires it
    Text(String),
    /// Precomputed token that never needs quoting
    Literal(Cow<'static, str>),
    Integer(i64),
    Real(f32),
    Float(f64),
    Uuid(Uuid),
}

/// Expected structure of a literal, used to parse it without a typed converter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TupleShape {
    Scalar,
    Record(Vec<TupleShape>),
    Array(Box<TupleShape>),
}

impl TupleShape {
    pub fn array_of(element: TupleShape) -> Self {
        TupleShape::Array(Box::new(element))
    }
}

impl PostgresTuple {
    pub fn text(value: impl Into<String>) -> Self {
        PostgresTuple::Scalar(ScalarValue::Text(value.into()))
    }

    pub fn literal(value: &'static str) -> Self {
        PostgresTuple::Scalar(ScalarValue::Literal(Cow::Borrowed(value)))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PostgresTuple::Null)
    }

    /// Text of a scalar node, formatting numeric variants on demand
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            PostgresTuple::Scalar(value) => Some(value.as_text()),
            _ => None,
        }
    }
}

impl ScalarValue {
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            ScalarValue::Text(text) => Cow::Borrowed(text),
            ScalarValue::Literal(text) => Cow::Borrowed(text),
            ScalarValue::Integer(_)
            | ScalarValue::Real(_)
            | ScalarValue::Float(_)
            | ScalarValue::Uuid(_) => {
                Cow::Owned(PostgresTuple::Scalar(self.clone()).build_tuple(false))
            }
        }
    }
}

impl From<String> for PostgresTuple {
    fn from(val: String) -> Self {
        PostgresTuple::text(val)
    }
}

impl From<&str> for PostgresTuple {
    fn from(val: &str) -> Self {
        PostgresTuple::text(val)
    }
}

impl From<bool> for PostgresTuple {
    fn from(val: bool) -> Self {
        PostgresTuple::literal(if val { "t" } else { "f" })
    }
}

// The minimum of each signed width has no positive counterpart, so it is
// emitted from a precomputed literal instead of the digit formatting path.
impl From<i16> for PostgresTuple {
    fn from(val: i16) -> Self {
        if val == i16::MIN {
            return PostgresTuple::literal(INT2_MIN_LITERAL);
        }
        PostgresTuple::Scalar(ScalarValue::Integer(val.into()))
    }
}

impl From<i32> for PostgresTuple {
    fn from(val: i32) -> Self {
        if val == i32::MIN {
            return PostgresTuple::literal(INT4_MIN_LITERAL);
        }
        PostgresTuple::Scalar(ScalarValue::Integer(val.into()))
    }
}

impl From<i64> for PostgresTuple {
    fn from(val: i64) -> Self {
        if val == i64::MIN {
            return PostgresTuple::literal(INT8_MIN_LITERAL);
        }
        PostgresTuple::Scalar(ScalarValue::Integer(val))
    }
}

impl From<f32> for PostgresTuple {
    fn from(val: f32) -> Self {
        PostgresTuple::Scalar(ScalarValue::Real(val))
    }
}

impl From<f64> for PostgresTuple {
    fn from(val: f64) -> Self {
        PostgresTuple::Scalar(ScalarValue::Float(val))
    }
}

impl From<Uuid> for PostgresTuple {
    fn from(val: Uuid) -> Self {
        PostgresTuple::Scalar(ScalarValue::Uuid(val))
    }
}

impl<T> From<Option<T>> for PostgresTuple
where
    T: Into<PostgresTuple>,
{
    fn from(val: Option<T>) -> Self {
        match val {
            Some(v) => v.into(),
            None => PostgresTuple::Null,
        }
    }
}

impl<T> From<Vec<T>> for PostgresTuple
where
    T: Into<PostgresTuple>,
{
    fn from(val: Vec<T>) -> Self {
        PostgresTuple::Array(val.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_integers_use_literals() {
        assert_eq!(
            PostgresTuple::from(i32::MIN),
            PostgresTuple::literal("-2147483648")
        );
        assert_eq!(
            PostgresTuple::from(i64::MIN),
            PostgresTuple::literal("-9223372036854775808")
        );
        assert_eq!(PostgresTuple::from(i16::MIN), PostgresTuple::literal("-32768"));
        assert_eq!(
            PostgresTuple::from(-5i32),
            PostgresTuple::Scalar(ScalarValue::Integer(-5))
        );
    }

    #[test]
    fn test_option_and_vec_conversions() {
        let none: Option<i32> = None;
        assert!(PostgresTuple::from(none).is_null());
        assert_eq!(
            PostgresTuple::from(vec![Some(1i32), None]),
            PostgresTuple::Array(vec![
                PostgresTuple::Scalar(ScalarValue::Integer(1)),
                PostgresTuple::Null,
            ])
        );
    }

    #[test]
    fn test_as_text() {
        assert_eq!(PostgresTuple::from(12i64).as_text().unwrap(), "12");
        assert_eq!(PostgresTuple::from(true).as_text().unwrap(), "t");
        assert_eq!(PostgresTuple::from("x y").as_text().unwrap(), "x y");
        assert!(PostgresTuple::Record(vec![]).as_text().is_none());
    }
}
