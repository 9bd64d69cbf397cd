//! Uniform field contract
//!
//! Lifts the scalar operations onto the six shapes a composite field can
//! take, so every scalar binding goes through one constructor.

use crate::scalar::{self, ScalarCodec};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use type_mapping::{PostgresReader, PostgresTuple, TupleError};
use uuid::Uuid;

/// A value that can sit in one field of a composite
pub trait FieldValue: Sized + Send + Sync + 'static {
    /// Read the field and its trailing delimiter; the first character is not yet consumed
    fn read_field(reader: &mut PostgresReader<'_>, context: usize) -> Result<Self, TupleError>;

    fn to_tuple(&self) -> PostgresTuple;
}

macro_rules! impl_field_value {
    ($($ty:ty),* $(,)?) => {$(
        impl FieldValue for $ty {
            fn read_field(reader: &mut PostgresReader<'_>, context: usize) -> Result<Self, TupleError> {
                scalar::parse::<$ty>(reader, context)
            }

            fn to_tuple(&self) -> PostgresTuple {
                ScalarCodec::to_tuple(self)
            }
        }

        impl FieldValue for Option<$ty> {
            fn read_field(reader: &mut PostgresReader<'_>, context: usize) -> Result<Self, TupleError> {
                scalar::parse_nullable::<$ty>(reader, context)
            }

            fn to_tuple(&self) -> PostgresTuple {
                scalar::to_tuple_nullable(self.as_ref())
            }
        }

        impl FieldValue for Vec<$ty> {
            fn read_field(reader: &mut PostgresReader<'_>, context: usize) -> Result<Self, TupleError> {
                Ok(scalar::parse_collection::<$ty>(reader, context)?.unwrap_or_default())
            }

            fn to_tuple(&self) -> PostgresTuple {
                scalar::to_tuple_collection(self)
            }
        }

        impl FieldValue for Vec<Option<$ty>> {
            fn read_field(reader: &mut PostgresReader<'_>, context: usize) -> Result<Self, TupleError> {
                Ok(scalar::parse_nullable_collection::<$ty>(reader, context)?.unwrap_or_default())
            }

            fn to_tuple(&self) -> PostgresTuple {
                scalar::to_tuple_nullable_collection(self)
            }
        }

        impl FieldValue for Option<Vec<$ty>> {
            fn read_field(reader: &mut PostgresReader<'_>, context: usize) -> Result<Self, TupleError> {
                scalar::parse_collection::<$ty>(reader, context)
            }

            fn to_tuple(&self) -> PostgresTuple {
                match self {
                    Some(values) => scalar::to_tuple_collection(values),
                    None => PostgresTuple::Null,
                }
            }
        }

        impl FieldValue for Option<Vec<Option<$ty>>> {
            fn read_field(reader: &mut PostgresReader<'_>, context: usize) -> Result<Self, TupleError> {
                scalar::parse_nullable_collection::<$ty>(reader, context)
            }

            fn to_tuple(&self) -> PostgresTuple {
                match self {
                    Some(values) => scalar::to_tuple_nullable_collection(values),
                    None => PostgresTuple::Null,
                }
            }
        }
    )*};
}

impl_field_value!(
    bool,
    i16,
    i32,
    i64,
    f32,
    f64,
    Decimal,
    String,
    Uuid,
    NaiveDate,
    NaiveDateTime,
    DateTime<Utc>,
    serde_json::Value,
    Vec<u8>,
);

#[cfg(test)]
mod tests {
    use super::*;

    fn read<V: FieldValue>(literal: &str) -> V {
        let mut reader = PostgresReader::new(literal);
        reader.read();
        V::read_field(&mut reader, 1).unwrap()
    }

    #[test]
    fn test_null_field_per_shape() {
        assert_eq!(read::<i32>("()"), 0);
        assert_eq!(read::<Option<i32>>("()"), None);
        assert_eq!(read::<Vec<i32>>("()"), Vec::<i32>::new());
        assert_eq!(read::<Option<Vec<i32>>>("()"), None);
        assert_eq!(read::<Option<Vec<Option<i32>>>>("()"), None);
    }

    #[test]
    fn test_array_field_shapes() {
        assert_eq!(read::<Vec<i32>>(r#"("{1,NULL,3}")"#), vec![1, 0, 3]);
        assert_eq!(
            read::<Vec<Option<i32>>>(r#"("{1,NULL,3}")"#),
            vec![Some(1), None, Some(3)]
        );
        assert_eq!(
            read::<Option<Vec<String>>>(r#"("{a,""b c""}")"#),
            Some(vec!["a".to_string(), "b c".to_string()])
        );
    }

    #[test]
    fn test_shapes_emit_through_one_contract() {
        let values: Option<Vec<Option<String>>> = Some(vec![Some("x y".into()), None]);
        let tuple = PostgresTuple::Record(vec![FieldValue::to_tuple(&values)]);
        assert_eq!(tuple.build_tuple(false), r#"("{""x y"",NULL}")"#);

        let bytes: Option<Vec<u8>> = None;
        assert!(FieldValue::to_tuple(&bytes).is_null());
    }
}
