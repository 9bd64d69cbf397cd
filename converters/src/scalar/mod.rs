//! Scalar codecs
//!
//! Every primitive domain type implements [`ScalarCodec`]; the record and
//! array readers below are written once against that trait.

mod numeric;
mod temporal;
mod text;

use type_mapping::{read_collection, PostgresReader, PostgresTuple, TupleError};

/// Parse/format pair for one primitive PostgreSQL type
pub trait ScalarCodec: Sized + Send + Sync + 'static {
    /// Name used in error messages
    const TYPE_NAME: &'static str;

    /// Whether an unquoted array element starting with `N` is always `NULL`.
    ///
    /// Types whose text form can itself start with `N` (text, `NaN`) must
    /// turn this off and compare the whole token instead.
    const NULL_FAST_PATH: bool = true;

    /// Value used for a missing field or element on the non-nullable paths
    fn zero() -> Self;

    fn from_text(text: &str) -> Result<Self, String>;

    fn to_tuple(&self) -> PostgresTuple;

    /// Read one token whose first character was already consumed, along with
    /// its trailing `,` or `match_end`
    fn read_token(
        reader: &mut PostgresReader<'_>,
        first: u8,
        context: usize,
        match_end: u8,
    ) -> Result<Self, TupleError> {
        read_text_token(reader, first, context, match_end)
    }

    /// Read one array element; `None` is the `NULL` token
    fn read_element(
        reader: &mut PostgresReader<'_>,
        first: u8,
        context: usize,
    ) -> Result<Option<Self>, TupleError> {
        if Self::NULL_FAST_PATH {
            if first == b'N' {
                reader.read_n(4);
                return Ok(None);
            }
            return Self::read_token(reader, first, context, b'}').map(Some);
        }
        let quoted = reader.read_token(first, context, b'}')?;
        let token = reader.token()?;
        if !quoted && token == "NULL" {
            return Ok(None);
        }
        Self::from_text(token)
            .map(Some)
            .map_err(|reason| reader.invalid_value(Self::TYPE_NAME, reason))
    }
}

/// Token reading shared by every codec that decodes from text
pub fn read_text_token<S: ScalarCodec>(
    reader: &mut PostgresReader<'_>,
    first: u8,
    context: usize,
    match_end: u8,
) -> Result<S, TupleError> {
    reader.read_token(first, context, match_end)?;
    let token = reader.token()?;
    S::from_text(token).map_err(|reason| reader.invalid_value(S::TYPE_NAME, reason))
}

/// Read a record field; an empty field becomes [`ScalarCodec::zero`]
pub fn parse<S: ScalarCodec>(reader: &mut PostgresReader<'_>, context: usize) -> Result<S, TupleError> {
    Ok(parse_nullable(reader, context)?.unwrap_or_else(S::zero))
}

/// Read a record field; an empty field is `None`
pub fn parse_nullable<S: ScalarCodec>(
    reader: &mut PostgresReader<'_>,
    context: usize,
) -> Result<Option<S>, TupleError> {
    match reader.read() {
        None => Err(reader.unexpected_end()),
        Some(b',') | Some(b')') => Ok(None),
        Some(first) => S::read_token(reader, first, context, b')').map(Some),
    }
}

/// Read an array field or top-level array; `NULL` elements become [`ScalarCodec::zero`]
pub fn parse_collection<S: ScalarCodec>(
    reader: &mut PostgresReader<'_>,
    context: usize,
) -> Result<Option<Vec<S>>, TupleError> {
    let values = parse_nullable_collection::<S>(reader, context)?;
    Ok(values.map(|values| {
        values
            .into_iter()
            .map(|value| value.unwrap_or_else(S::zero))
            .collect()
    }))
}

/// Read an array field or top-level array, keeping `NULL` elements as `None`
pub fn parse_nullable_collection<S: ScalarCodec>(
    reader: &mut PostgresReader<'_>,
    context: usize,
) -> Result<Option<Vec<Option<S>>>, TupleError> {
    let first = match reader.read() {
        None => return Err(reader.unexpected_end()),
        Some(b',') | Some(b')') => return Ok(None),
        Some(first) => first,
    };
    let mut values = Vec::new();
    read_collection(reader, first, context, |reader, first, inner| {
        values.push(S::read_element(reader, first, inner)?);
        Ok(())
    })?;
    Ok(Some(values))
}

/// Decode a complete top-level array literal; `NULL` and empty input are `None`
pub fn nullable_collection_from_text<S: ScalarCodec>(
    text: &str,
) -> Result<Option<Vec<Option<S>>>, TupleError> {
    if text.is_empty() || text == "NULL" {
        return Ok(None);
    }
    let mut reader = PostgresReader::new(text);
    let values = parse_nullable_collection::<S>(&mut reader, 0)?;
    if !reader.is_at_end() {
        return Err(reader.malformed("trailing characters after array"));
    }
    Ok(values)
}

/// Like [`nullable_collection_from_text`], with `NULL` elements as [`ScalarCodec::zero`]
pub fn collection_from_text<S: ScalarCodec>(text: &str) -> Result<Option<Vec<S>>, TupleError> {
    Ok(nullable_collection_from_text::<S>(text)?.map(|values| {
        values
            .into_iter()
            .map(|value| value.unwrap_or_else(S::zero))
            .collect()
    }))
}

pub fn to_tuple<S: ScalarCodec>(value: &S) -> PostgresTuple {
    value.to_tuple()
}

pub fn to_tuple_nullable<S: ScalarCodec>(value: Option<&S>) -> PostgresTuple {
    match value {
        Some(value) => value.to_tuple(),
        None => PostgresTuple::Null,
    }
}

pub fn to_tuple_collection<S: ScalarCodec>(values: &[S]) -> PostgresTuple {
    PostgresTuple::Array(values.iter().map(ScalarCodec::to_tuple).collect())
}

pub fn to_tuple_nullable_collection<S: ScalarCodec>(values: &[Option<S>]) -> PostgresTuple {
    PostgresTuple::Array(
        values
            .iter()
            .map(|value| to_tuple_nullable(value.as_ref()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_null_handling() {
        let mut reader = PostgresReader::new("{1,NULL,3}");
        let values = parse_nullable_collection::<i32>(&mut reader, 0).unwrap();
        assert_eq!(values, Some(vec![Some(1), None, Some(3)]));

        let mut reader = PostgresReader::new("{1,NULL,3}");
        let values = parse_collection::<i32>(&mut reader, 0).unwrap();
        assert_eq!(values, Some(vec![1, 0, 3]));
    }

    #[test]
    fn test_empty_collection_is_not_null() {
        let mut reader = PostgresReader::new("{}");
        assert_eq!(parse_collection::<i64>(&mut reader, 0).unwrap(), Some(vec![]));

        let mut reader = PostgresReader::new(r#"("{}",)"#);
        reader.read();
        assert_eq!(parse_collection::<String>(&mut reader, 1).unwrap(), Some(vec![]));
        assert_eq!(reader.last(), Some(b','));
        assert_eq!(parse_collection::<String>(&mut reader, 1).unwrap(), None);
    }

    #[test]
    fn test_fields_default_or_null() {
        let mut reader = PostgresReader::new("(,7)");
        reader.read();
        assert_eq!(parse::<i32>(&mut reader, 1).unwrap(), 0);
        assert_eq!(parse_nullable::<i32>(&mut reader, 1).unwrap(), Some(7));
        assert_eq!(reader.last(), Some(b')'));

        let mut reader = PostgresReader::new("(,)");
        reader.read();
        assert_eq!(parse_nullable::<String>(&mut reader, 1).unwrap(), None);
        assert_eq!(parse::<String>(&mut reader, 1).unwrap(), "");
    }

    #[test]
    fn test_string_elements_do_not_use_null_fast_path() {
        let mut reader = PostgresReader::new(r#"{Nice,NULL,"NULL"}"#);
        let values = parse_nullable_collection::<String>(&mut reader, 0).unwrap();
        assert_eq!(
            values,
            Some(vec![Some("Nice".to_string()), None, Some("NULL".to_string())])
        );
    }

    #[test]
    fn test_top_level_array_text() {
        assert_eq!(nullable_collection_from_text::<i32>("NULL").unwrap(), None);
        assert_eq!(collection_from_text::<i32>("").unwrap(), None);
        assert_eq!(
            nullable_collection_from_text::<i32>("{1,NULL,3}").unwrap(),
            Some(vec![Some(1), None, Some(3)])
        );
        assert_eq!(collection_from_text::<i32>("{1,NULL,3}").unwrap(), Some(vec![1, 0, 3]));
        assert_eq!(collection_from_text::<String>("{}").unwrap(), Some(vec![]));
        assert!(collection_from_text::<i32>("{1,2}x").unwrap_err().is_malformed());
        assert!(collection_from_text::<i32>("{}}").is_err());
    }

    #[test]
    fn test_to_tuple_helpers() {
        let tuple = to_tuple_nullable_collection(&[Some(1i32), None]);
        assert_eq!(tuple.build_tuple(false), "{1,NULL}");
        assert_eq!(to_tuple_collection::<i64>(&[]).build_tuple(false), "{}");
        assert!(to_tuple_nullable::<bool>(None).is_null());
        assert_eq!(to_tuple(&true).build_tuple(false), "t");
    }
}
