//! Ordinal-resolved composite codec
//!
//! Declared fields are matched to catalog columns once, at bind time. After
//! that every parse and serialize walks plain vectors indexed by ordinal.

use super::binding::{FieldBinding, FieldReader, FieldWriter};
use super::column::ColumnInfo;
use crate::errors::ConverterError;
use std::sync::Arc;
use type_mapping::{
    read_collection, read_record_body, skip_field, PostgresReader, PostgresTuple, TupleError,
};

fn skip_reader<T>() -> FieldReader<T> {
    Arc::new(|_, reader, context| skip_field(reader, context))
}

pub struct CompositeBinder<T> {
    schema: String,
    type_name: String,
    columns: Vec<String>,
    readers: Vec<FieldReader<T>>,
    writers: Vec<Option<FieldWriter<T>>>,
}

impl<T> std::fmt::Debug for CompositeBinder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeBinder")
            .field("schema", &self.schema)
            .field("type_name", &self.type_name)
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

impl<T: Default> CompositeBinder<T> {
    /// Resolve `fields` against the columns of `schema`.`type_name`.
    ///
    /// Every declared field must have a column. Columns without a declared
    /// field are skipped on read and written as empty fields.
    pub fn bind(
        columns: &[ColumnInfo],
        schema: &str,
        type_name: &str,
        fields: Vec<FieldBinding<T>>,
    ) -> Result<Self, ConverterError> {
        let own: Vec<&ColumnInfo> = columns
            .iter()
            .filter(|column| column.belongs_to(schema, type_name))
            .collect();
        let count = own.len();

        let mut names = vec![String::new(); count];
        for column in &own {
            let index = ordinal_index(column, count)?;
            names[index] = column.column_name.clone();
        }

        let mut readers: Vec<FieldReader<T>> = (0..count).map(|_| skip_reader()).collect();
        let mut writers: Vec<Option<FieldWriter<T>>> = vec![None; count];

        for field in fields {
            let column = own
                .iter()
                .find(|column| column.column_name == field.name)
                .ok_or_else(|| ConverterError::SchemaMismatch {
                    schema: schema.to_string(),
                    type_name: type_name.to_string(),
                    column: field.name.clone(),
                })?;
            let index = ordinal_index(column, count)?;
            tracing::trace!(
                schema,
                type_name,
                field = %field.name,
                ordinal = index + 1,
                "bound composite field"
            );
            readers[index] = field.reader;
            writers[index] = Some(field.writer);
        }

        let unbound: Vec<&str> = names
            .iter()
            .zip(&writers)
            .filter(|(_, writer)| writer.is_none())
            .map(|(name, _)| name.as_str())
            .collect();
        tracing::debug!(
            schema,
            type_name,
            columns = count,
            ?unbound,
            "composite binder resolved"
        );

        Ok(Self {
            schema: schema.to_string(),
            type_name: type_name.to_string(),
            columns: names,
            readers,
            writers,
        })
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn column_count(&self) -> usize {
        self.readers.len()
    }

    /// 0-based position of `column` in the serialized field list
    pub fn ordinal(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    /// Read a record in field position; an empty field is `None`
    pub fn parse(
        &self,
        reader: &mut PostgresReader<'_>,
        context: usize,
    ) -> Result<Option<T>, TupleError> {
        match reader.read() {
            None => Err(reader.unexpected_end()),
            Some(b',') | Some(b')') => Ok(None),
            Some(_) => self.read_value(reader, context).map(Some),
        }
    }

    /// Read a record whose first character was already consumed
    pub fn read_value(&self, reader: &mut PostgresReader<'_>, context: usize) -> Result<T, TupleError> {
        let mut instance = T::default();
        read_record_body(reader, context, self.readers.len(), |reader, index, inner| {
            (self.readers[index])(&mut instance, reader, inner)
        })?;
        Ok(instance)
    }

    /// Read an array of records in field position; `NULL` elements become `T::default()`
    pub fn parse_collection(
        &self,
        reader: &mut PostgresReader<'_>,
        context: usize,
    ) -> Result<Option<Vec<T>>, TupleError> {
        let values = self.parse_nullable_collection(reader, context)?;
        Ok(values.map(|values| values.into_iter().map(Option::unwrap_or_default).collect()))
    }

    pub fn parse_nullable_collection(
        &self,
        reader: &mut PostgresReader<'_>,
        context: usize,
    ) -> Result<Option<Vec<Option<T>>>, TupleError> {
        let first = match reader.read() {
            None => return Err(reader.unexpected_end()),
            Some(b',') | Some(b')') => return Ok(None),
            Some(first) => first,
        };
        let mut values = Vec::new();
        read_collection(reader, first, context, |reader, first, inner| {
            if first == b'N' {
                reader.read_n(4);
                values.push(None);
            } else {
                values.push(Some(self.read_value(reader, inner)?));
            }
            Ok(())
        })?;
        Ok(Some(values))
    }

    /// Decode a complete top-level literal; `NULL` and empty input are `None`
    pub fn from_text(&self, text: &str) -> Result<Option<T>, TupleError> {
        if text.is_empty() || text == "NULL" {
            return Ok(None);
        }
        let mut reader = PostgresReader::new(text);
        reader.read();
        let value = self.read_value(&mut reader, 0)?;
        if !reader.is_at_end() {
            return Err(reader.malformed("trailing characters after record"));
        }
        Ok(Some(value))
    }

    /// Decode a complete top-level array of records; `NULL` and empty input are `None`
    pub fn nullable_collection_from_text(
        &self,
        text: &str,
    ) -> Result<Option<Vec<Option<T>>>, TupleError> {
        if text.is_empty() || text == "NULL" {
            return Ok(None);
        }
        let mut reader = PostgresReader::new(text);
        let values = self.parse_nullable_collection(&mut reader, 0)?;
        if !reader.is_at_end() {
            return Err(reader.malformed("trailing characters after array"));
        }
        Ok(values)
    }

    pub fn to_tuple(&self, value: &T) -> PostgresTuple {
        PostgresTuple::Record(
            self.writers
                .iter()
                .map(|writer| match writer {
                    Some(writer) => writer(value),
                    None => PostgresTuple::Null,
                })
                .collect(),
        )
    }

    pub fn to_tuple_nullable(&self, value: Option<&T>) -> PostgresTuple {
        match value {
            Some(value) => self.to_tuple(value),
            None => PostgresTuple::Null,
        }
    }

    pub fn to_tuple_collection(&self, values: &[T]) -> PostgresTuple {
        PostgresTuple::Array(values.iter().map(|value| self.to_tuple(value)).collect())
    }

    pub fn to_tuple_nullable_collection(&self, values: &[Option<T>]) -> PostgresTuple {
        PostgresTuple::Array(
            values
                .iter()
                .map(|value| self.to_tuple_nullable(value.as_ref()))
                .collect(),
        )
    }

    /// Unquoted literal text of `value`
    pub fn to_text(&self, value: &T) -> String {
        self.to_tuple(value).build_tuple(false)
    }
}

fn ordinal_index(column: &ColumnInfo, count: usize) -> Result<usize, ConverterError> {
    match usize::try_from(column.order) {
        Ok(order) if (1..=count).contains(&order) => Ok(order - 1),
        _ => Err(ConverterError::InvalidOrdinal {
            schema: column.type_schema.clone(),
            type_name: column.type_name.clone(),
            column: column.column_name.clone(),
            order: column.order,
            count,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Simple {
        number: i32,
        text: String,
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Composite {
        id: Uuid,
        simple: Simple,
    }

    fn simple_fields() -> Vec<FieldBinding<Simple>> {
        vec![
            FieldBinding::value("number", |s: &Simple| &s.number, |s, v| s.number = v),
            FieldBinding::value("text", |s: &Simple| &s.text, |s, v| s.text = v),
        ]
    }

    fn columns() -> Vec<ColumnInfo> {
        vec![
            ColumnInfo::new("test", "Simple", "number", "int4", 1),
            ColumnInfo::new("test", "Simple", "text", "varchar", 2),
            ColumnInfo::new("test", "Composite", "id", "uuid", 1),
            ColumnInfo::new("test", "Composite", "legacy", "text", 2),
            ColumnInfo::new("test", "Composite", "simple", "Simple", 3),
        ]
    }

    fn composite_binder() -> CompositeBinder<Composite> {
        let simple = Arc::new(CompositeBinder::bind(&columns(), "test", "Simple", simple_fields()).unwrap());
        // declared in a different order than the catalog
        let fields = vec![
            FieldBinding::record("simple", simple, |c: &Composite| &c.simple, |c, v| c.simple = v),
            FieldBinding::value("id", |c: &Composite| &c.id, |c, v| c.id = v),
        ];
        CompositeBinder::bind(&columns(), "test", "Composite", fields).unwrap()
    }

    #[test]
    fn test_fields_land_at_their_ordinals() {
        let binder = composite_binder();
        assert_eq!(binder.column_count(), 3);
        assert_eq!(binder.ordinal("id"), Some(0));
        assert_eq!(binder.ordinal("legacy"), Some(1));
        assert_eq!(binder.ordinal("simple"), Some(2));

        let id = Uuid::new_v4();
        let value = Composite {
            id,
            simple: Simple {
                number: 5,
                text: "x".to_string(),
            },
        };
        assert_eq!(binder.to_text(&value), format!("({},,\"(5,x)\")", id));
    }

    #[test]
    fn test_nested_round_trip_with_special_text() {
        let binder = composite_binder();
        let value = Composite {
            id: Uuid::new_v4(),
            simple: Simple {
                number: 5,
                text: "test me ' \\ \" now".to_string(),
            },
        };
        let text = binder.to_text(&value);
        assert_eq!(binder.from_text(&text).unwrap(), Some(value));
    }

    #[test]
    fn test_unknown_column_is_skipped() {
        let binder = composite_binder();
        let parsed = binder
            .from_text(r#"(00000000-0000-0000-0000-000000000001,"{""ignored"",x}","(1,a)")"#)
            .unwrap()
            .unwrap();
        assert_eq!(parsed.id, Uuid::from_u128(1));
        assert_eq!(parsed.simple.number, 1);
        assert_eq!(parsed.simple.text, "a");
    }

    #[test]
    fn test_missing_column_fails_bind() {
        let mut fields = simple_fields();
        fields.push(FieldBinding::value("missing", |s: &Simple| &s.number, |s, v| s.number = v));
        let err = CompositeBinder::bind(&columns(), "test", "Simple", fields).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to find 'missing' column in test Simple. Check if DB is in sync"
        );
    }

    #[test]
    fn test_invalid_ordinal() {
        let columns = vec![ColumnInfo::new("test", "Simple", "number", "int4", 3)];
        let err = CompositeBinder::bind(&columns, "test", "Simple", simple_fields()).unwrap_err();
        assert!(matches!(err, ConverterError::InvalidOrdinal { order: 3, count: 1, .. }));
    }

    #[test]
    fn test_null_nested_record_becomes_default() {
        let binder = composite_binder();
        let parsed = binder
            .from_text("(00000000-0000-0000-0000-000000000002,,)")
            .unwrap()
            .unwrap();
        assert_eq!(parsed.simple, Simple::default());
        assert_eq!(binder.from_text("NULL").unwrap(), None);
    }

    #[test]
    fn test_record_collections() {
        let simple = CompositeBinder::bind(&columns(), "test", "Simple", simple_fields()).unwrap();
        let values = vec![
            Some(Simple {
                number: 1,
                text: "a b".to_string(),
            }),
            None,
            Some(Simple::default()),
        ];
        let tuple = PostgresTuple::Record(vec![simple.to_tuple_nullable_collection(&values)]);
        let literal = tuple.build_tuple(false);
        assert_eq!(literal, r#"("{""(1,\\""a b\\"")"",NULL,""(0,\\""\\"")""}")"#);

        let mut reader = PostgresReader::new(&literal);
        reader.read();
        let parsed = simple.parse_nullable_collection(&mut reader, 1).unwrap();
        assert_eq!(parsed, Some(values));

        let mut reader = PostgresReader::new(&literal);
        reader.read();
        let parsed = simple.parse_collection(&mut reader, 1).unwrap().unwrap();
        assert_eq!(parsed[1], Simple::default());
    }

    #[test]
    fn test_top_level_record_array() {
        let simple = CompositeBinder::bind(&columns(), "test", "Simple", simple_fields()).unwrap();
        let values = vec![
            Some(Simple {
                number: 1,
                text: "a b".to_string(),
            }),
            None,
        ];
        let literal = simple.to_tuple_nullable_collection(&values).build_tuple(false);
        assert_eq!(literal, r#"{"(1,\"a b\")",NULL}"#);
        assert_eq!(simple.nullable_collection_from_text(&literal).unwrap(), Some(values));
        assert_eq!(simple.nullable_collection_from_text("NULL").unwrap(), None);
        assert_eq!(simple.nullable_collection_from_text("{}").unwrap(), Some(vec![]));
        assert!(simple.nullable_collection_from_text("{}x").is_err());
    }

    #[test]
    fn test_trailing_input_is_rejected() {
        let simple = CompositeBinder::bind(&columns(), "test", "Simple", simple_fields()).unwrap();
        assert!(simple.from_text("(1,a)x").is_err());
        assert!(simple.from_text("(1,a").is_err());
    }
}
