//! Literal emission
//!
//! Converts a [`PostgresTuple`] tree into PostgreSQL's text representation.
//! Quoting of nested values is applied recursively through [`Escaping`], so a
//! tree of any depth is written in a single pass into one buffer.

use crate::escaping::{Escaping, Level};
use crate::types::{PostgresTuple, ScalarValue};
use crate::validate::requires_quoting;
use crate::writer::PostgresWriter;

impl PostgresTuple {
    /// Whether this value must be quoted when it is a field of a record
    pub fn must_escape_record(&self) -> bool {
        match self {
            PostgresTuple::Null => false,
            PostgresTuple::Scalar(value) => value.must_escape(),
            PostgresTuple::Record(_) | PostgresTuple::Array(_) => true,
        }
    }

    /// Whether this value must be quoted when it is an element of an array
    pub fn must_escape_array(&self) -> bool {
        match self {
            PostgresTuple::Null => false,
            PostgresTuple::Scalar(value) => value.must_escape(),
            PostgresTuple::Record(_) | PostgresTuple::Array(_) => true,
        }
    }

    /// Write the bare content of this value at `escaping`.
    ///
    /// `Null` writes nothing; the enclosing record or array decides how an
    /// absent value is spelled.
    pub fn insert(&self, writer: &mut PostgresWriter, escaping: Escaping) {
        match self {
            PostgresTuple::Null => {}
            PostgresTuple::Scalar(value) => value.insert(writer, escaping),
            PostgresTuple::Record(fields) => {
                escaping.write_char(writer, '(');
                for (index, field) in fields.iter().enumerate() {
                    if index > 0 {
                        escaping.write_char(writer, ',');
                    }
                    field.insert_record(writer, escaping);
                }
                escaping.write_char(writer, ')');
            }
            PostgresTuple::Array(elements) => {
                escaping.write_char(writer, '{');
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        escaping.write_char(writer, ',');
                    }
                    element.insert_array(writer, escaping);
                }
                escaping.write_char(writer, '}');
            }
        }
    }

    /// Write this value as one field of a record whose own content is at `escaping`
    pub fn insert_record(&self, writer: &mut PostgresWriter, escaping: Escaping) {
        if self.must_escape_record() {
            self.write_nested(writer, escaping, Level::Record);
        } else {
            self.insert(writer, escaping);
        }
    }

    /// Write this value as one element of an array whose own content is at `escaping`
    pub fn insert_array(&self, writer: &mut PostgresWriter, escaping: Escaping) {
        match self {
            PostgresTuple::Null => escaping.write_str(writer, "NULL"),
            _ if self.must_escape_array() => self.write_nested(writer, escaping, Level::Array),
            _ => self.insert(writer, escaping),
        }
    }

    /// Surround this value with quotes belonging to `escaping` and write its
    /// content one level deeper
    pub fn write_nested(&self, writer: &mut PostgresWriter, escaping: Escaping, level: Level) {
        escaping.write_char(writer, '"');
        self.insert(writer, escaping.nest(level));
        escaping.write_char(writer, '"');
    }

    /// Render the complete literal.
    ///
    /// With `quote` the result is an SQL string constant: wrapped in `'` with
    /// every inner `'` doubled. A top-level `Null` renders as `NULL` either way.
    pub fn build_tuple(&self, quote: bool) -> String {
        let mut writer = PostgresWriter::new();
        self.build_tuple_into(&mut writer, quote);
        writer.into_string()
    }

    /// Same as [`build_tuple`](Self::build_tuple), appending to a caller-owned writer
    pub fn build_tuple_into(&self, writer: &mut PostgresWriter, quote: bool) {
        if self.is_null() {
            writer.write_str("NULL");
            return;
        }
        if quote {
            writer.write_raw('\'');
            writer.set_sql_quoting(true);
            self.insert(writer, Escaping::ROOT);
            writer.set_sql_quoting(false);
            writer.write_raw('\'');
        } else {
            self.insert(writer, Escaping::ROOT);
        }
    }
}

impl ScalarValue {
    fn must_escape(&self) -> bool {
        match self {
            ScalarValue::Text(text) => requires_quoting(text),
            ScalarValue::Literal(_)
            | ScalarValue::Integer(_)
            | ScalarValue::Real(_)
            | ScalarValue::Float(_)
            | ScalarValue::Uuid(_) => false,
        }
    }

    fn insert(&self, writer: &mut PostgresWriter, escaping: Escaping) {
        match self {
            ScalarValue::Text(text) => escaping.write_str(writer, text),
            ScalarValue::Literal(text) => {
                debug_assert!(
                    !requires_quoting(text),
                    "precomputed literal {:?} requires quoting",
                    text
                );
                escaping.write_str(writer, text);
            }
            ScalarValue::Integer(value) => writer.write_integer(*value),
            ScalarValue::Real(value) => writer.write_real(*value),
            ScalarValue::Float(value) => writer.write_float(*value),
            ScalarValue::Uuid(value) => writer.write_uuid(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> PostgresTuple {
        PostgresTuple::text(value)
    }

    #[test]
    fn test_simple_record() {
        let tuple = PostgresTuple::Record(vec![
            PostgresTuple::from(5i32),
            text("test"),
            PostgresTuple::Null,
        ]);
        assert_eq!(tuple.build_tuple(false), "(5,test,)");
    }

    #[test]
    fn test_empty_string_is_quoted_null_is_empty() {
        let tuple = PostgresTuple::Record(vec![text(""), PostgresTuple::Null]);
        assert_eq!(tuple.build_tuple(false), r#"("",)"#);
    }

    #[test]
    fn test_array_null_and_null_text() {
        let tuple = PostgresTuple::Array(vec![
            PostgresTuple::from(1i32),
            PostgresTuple::Null,
            text("NULL"),
        ]);
        assert_eq!(tuple.build_tuple(false), r#"{1,NULL,"NULL"}"#);
    }

    #[test]
    fn test_record_field_escaping() {
        let tuple = PostgresTuple::Record(vec![text(r#"test me ' \ " now"#)]);
        assert_eq!(tuple.build_tuple(false), r#"("test me ' \\ "" now")"#);
    }

    #[test]
    fn test_record_in_array_in_record() {
        let inner = PostgresTuple::Record(vec![text("a b"), PostgresTuple::Null]);
        let tuple = PostgresTuple::Record(vec![PostgresTuple::Array(vec![inner])]);
        assert_eq!(tuple.build_tuple(false), r#"("{""(\\""a b\\"",)""}")"#);
    }

    #[test]
    fn test_nested_empty_collections() {
        let tuple = PostgresTuple::Record(vec![
            PostgresTuple::Array(vec![]),
            PostgresTuple::Record(vec![]),
        ]);
        assert_eq!(tuple.build_tuple(false), r#"("{}","()")"#);
    }

    #[test]
    fn test_build_tuple_sql_quoting() {
        let tuple = PostgresTuple::Record(vec![text("it's"), PostgresTuple::from(1i64)]);
        assert_eq!(tuple.build_tuple(true), "'(it''s,1)'");
        assert_eq!(PostgresTuple::Null.build_tuple(true), "NULL");
        assert_eq!(PostgresTuple::Null.build_tuple(false), "NULL");
    }

    #[test]
    fn test_top_level_scalar_is_verbatim() {
        assert_eq!(text(r#"a"b"#).build_tuple(false), r#"a"b"#);
        assert_eq!(PostgresTuple::from(f64::NAN).build_tuple(false), "NaN");
    }

    #[test]
    fn test_escape_flags() {
        assert!(!text("abc").must_escape_record());
        assert!(text("a,b").must_escape_array());
        assert!(text("").must_escape_record());
        assert!(PostgresTuple::Array(vec![]).must_escape_array());
        assert!(PostgresTuple::Record(vec![]).must_escape_record());
        assert!(!PostgresTuple::from(i32::MIN).must_escape_array());
    }
}
