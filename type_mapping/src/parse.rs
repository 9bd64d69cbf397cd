//! Structural parsing of composite and array literals
//!
//! Every reader here follows one convention: a value parser consumes the value
//! and the delimiter after it, and the caller inspects
//! [`PostgresReader::last`] to decide what comes next.

use crate::errors::TupleError;
use crate::escaping::nested_context;
use crate::reader::PostgresReader;
use crate::types::{PostgresTuple, TupleShape};

/// Read the body of a record whose first character was already consumed.
///
/// `per_field` is called once per column with the column index and the
/// context its field is read at; it must consume the field and its trailing
/// delimiter. For `context > 0` the closing quote run and the delimiter after
/// the record are consumed as well.
pub fn read_record_body<'a, F>(
    reader: &mut PostgresReader<'a>,
    context: usize,
    field_count: usize,
    mut per_field: F,
) -> Result<(), TupleError>
where
    F: FnMut(&mut PostgresReader<'a>, usize, usize) -> Result<(), TupleError>,
{
    let start = reader.read_n(context);
    if start != Some(b'(') {
        return Err(reader.unexpected(start, "'('"));
    }

    let inner = nested_context(context);
    if field_count == 0 {
        let end = reader.read();
        if end != Some(b')') {
            return Err(reader.unexpected(end, "')'"));
        }
    }
    for index in 0..field_count {
        per_field(reader, index, inner)?;
        let expected = if index + 1 == field_count { b')' } else { b',' };
        if reader.last() != Some(expected) {
            let label = if expected == b')' { "')'" } else { "','" };
            return Err(reader.unexpected(reader.last(), label));
        }
    }

    close_nested(reader, context > 0, context)
}

/// Read an array whose first character `first` was already consumed.
///
/// A `first` other than `{` means the array is quoted at `context`. Each
/// element is handed to `per_element` with its first character and the
/// context it is read at; `per_element` must consume the element and the
/// delimiter after it. An empty array invokes nothing.
pub fn read_collection<'a, F>(
    reader: &mut PostgresReader<'a>,
    first: u8,
    context: usize,
    mut per_element: F,
) -> Result<(), TupleError>
where
    F: FnMut(&mut PostgresReader<'a>, u8, usize) -> Result<(), TupleError>,
{
    let escaped = first != b'{';
    if escaped {
        let open = reader.read_n(context);
        if open != Some(b'{') {
            return Err(reader.unexpected(open, "'{'"));
        }
    }

    if reader.peek() == Some(b'}') {
        reader.read();
        return close_nested(reader, escaped, context);
    }

    let inner = nested_context(context);
    loop {
        let element = match reader.read() {
            Some(c) => c,
            None => return Err(reader.unexpected_end()),
        };
        per_element(reader, element, inner)?;
        match reader.last() {
            Some(b',') => continue,
            Some(b'}') => break,
            other => return Err(reader.unexpected(other, "',' or '}'")),
        }
    }

    close_nested(reader, escaped, context)
}

/// Consume the closing quote run of an escaped value and, below the top
/// level, the delimiter after it. A top-level value leaves any trailing
/// input for the caller to reject.
fn close_nested(reader: &mut PostgresReader<'_>, escaped: bool, context: usize) -> Result<(), TupleError> {
    if escaped {
        let quote = reader.read_n(context);
        if quote != Some(b'"') {
            return Err(reader.unexpected(quote, "closing quote"));
        }
    }
    if context == 0 {
        return Ok(());
    }
    match reader.read() {
        None | Some(b',') | Some(b')') | Some(b'}') => Ok(()),
        other => Err(reader.unexpected(other, "',', ')' or '}'")),
    }
}

/// Consume one record field of any shape, including its trailing delimiter
pub fn skip_field(reader: &mut PostgresReader<'_>, context: usize) -> Result<(), TupleError> {
    match reader.read() {
        None => Err(reader.unexpected_end()),
        Some(b',') | Some(b')') => Ok(()),
        Some(first) => reader.read_token(first, context, b')').map(|_| ()),
    }
}

impl PostgresTuple {
    /// Parse a literal into an untyped tree following `shape`.
    ///
    /// Scalars come back as [`PostgresTuple::text`]; typed decoding is left to
    /// the caller. Empty input is `Null`.
    pub fn parse(
        reader: &mut PostgresReader<'_>,
        shape: &TupleShape,
        context: usize,
    ) -> Result<PostgresTuple, TupleError> {
        match reader.read() {
            None => Ok(PostgresTuple::Null),
            Some(first) => parse_value(reader, first, shape, context, b')'),
        }
    }

    /// Parse a complete top-level literal
    pub fn from_text(text: &str, shape: &TupleShape) -> Result<PostgresTuple, TupleError> {
        let mut reader = PostgresReader::new(text);
        let value = PostgresTuple::parse(&mut reader, shape, 0)?;
        if !reader.is_at_end() {
            return Err(reader.malformed("trailing characters after literal"));
        }
        Ok(value)
    }
}

fn parse_value(
    reader: &mut PostgresReader<'_>,
    first: u8,
    shape: &TupleShape,
    context: usize,
    match_end: u8,
) -> Result<PostgresTuple, TupleError> {
    match shape {
        TupleShape::Scalar => {
            reader.read_token(first, context, match_end)?;
            Ok(PostgresTuple::text(reader.token()?))
        }
        TupleShape::Record(fields) => {
            let mut values = Vec::with_capacity(fields.len());
            read_record_body(reader, context, fields.len(), |reader, index, inner| {
                values.push(parse_field(reader, &fields[index], inner)?);
                Ok(())
            })?;
            Ok(PostgresTuple::Record(values))
        }
        TupleShape::Array(element) => {
            let mut values = Vec::new();
            read_collection(reader, first, context, |reader, first, inner| {
                values.push(parse_element(reader, first, element, inner)?);
                Ok(())
            })?;
            Ok(PostgresTuple::Array(values))
        }
    }
}

fn parse_field(
    reader: &mut PostgresReader<'_>,
    shape: &TupleShape,
    context: usize,
) -> Result<PostgresTuple, TupleError> {
    match reader.read() {
        None => Err(reader.unexpected_end()),
        Some(b',') | Some(b')') => Ok(PostgresTuple::Null),
        Some(first) => parse_value(reader, first, shape, context, b')'),
    }
}

fn parse_element(
    reader: &mut PostgresReader<'_>,
    first: u8,
    shape: &TupleShape,
    context: usize,
) -> Result<PostgresTuple, TupleError> {
    match shape {
        TupleShape::Scalar => {
            let quoted = reader.read_token(first, context, b'}')?;
            let token = reader.token()?;
            if !quoted && token == "NULL" {
                Ok(PostgresTuple::Null)
            } else {
                Ok(PostgresTuple::text(token))
            }
        }
        _ if first == b'N' => {
            reader.read_n(4);
            Ok(PostgresTuple::Null)
        }
        _ => parse_value(reader, first, shape, context, b'}'),
    }
}
