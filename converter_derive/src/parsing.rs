//! Parsing utilities for composite and column attributes
//!
//! This module handles the parsing of `#[composite]` and `#[column]`
//! attributes and the validation of the names they carry.

use syn::{Attribute, Data, Error, Fields, GenericArgument, Ident, LitStr, PathArguments, Result, Type};

/// Validate a PostgreSQL identifier given in an attribute
pub fn validate_identifier_syn(name: &str, what: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name).map_err(|e| Error::new(span, format!("Invalid {} '{}': {}", what, name, e)))
}

fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    // PostgreSQL truncates identifiers longer than NAMEDATALEN - 1
    if name.len() > 63 {
        return Err(format!(
            "Name '{}' is too long: {} characters (max 63)",
            name,
            name.len()
        ));
    }

    // Quoted identifiers may contain anything except NUL and the quote itself
    if name.chars().any(|c| c == '"' || c == '\0') {
        return Err(format!("Name '{}' contains a quote or NUL character", name));
    }

    Ok(())
}

#[derive(Debug)]
pub struct CompositeInfo {
    pub schema: String,
    pub name: String,
    pub extended: Option<String>,
}

/// How a field is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any type implementing `FieldValue`
    Value,
    /// Nested composite `U`
    Record,
    /// Nested composite `Option<U>`
    NullableRecord,
    /// Nested composites `Vec<U>`
    RecordCollection,
}

#[derive(Debug)]
pub struct ColumnField {
    pub ident: Ident,
    pub column: String,
    pub kind: FieldKind,
    /// Composite type of a record field (`U` in `Option<U>` or `Vec<U>`)
    pub record_type: Option<Type>,
}

pub fn parse_composite_attributes(attrs: &[Attribute]) -> Result<CompositeInfo> {
    let mut schema = None;
    let mut name = None;
    let mut extended = None;

    for attr in attrs {
        if !attr.path().is_ident("composite") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let value: LitStr = meta.value()?.parse()?;
            if meta.path.is_ident("schema") {
                schema = Some(value);
            } else if meta.path.is_ident("name") {
                name = Some(value);
            } else if meta.path.is_ident("extended") {
                extended = Some(value);
            } else {
                return Err(meta.error("expected `schema`, `name` or `extended`"));
            }
            Ok(())
        })?;
    }

    let name = name.ok_or_else(|| {
        Error::new(
            proc_macro2::Span::call_site(),
            "composite attribute is required: add #[composite(name = \"type_name\")] to your struct",
        )
    })?;
    validate_identifier_syn(&name.value(), "type name", name.span())?;

    let schema = match schema {
        Some(schema) => {
            validate_identifier_syn(&schema.value(), "schema", schema.span())?;
            schema.value()
        }
        None => "public".to_string(),
    };

    let extended = match extended {
        Some(extended) => {
            validate_identifier_syn(&extended.value(), "extended type name", extended.span())?;
            Some(extended.value())
        }
        None => None,
    };

    Ok(CompositeInfo {
        schema,
        name: name.value(),
        extended,
    })
}

pub fn parse_column_fields(data: &Data) -> Result<Vec<ColumnField>> {
    let fields_named = match data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields_named) => fields_named,
            other => {
                return Err(Error::new_spanned(
                    other,
                    "Composite can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                proc_macro2::Span::call_site(),
                "Composite can only be derived for structs",
            ))
        }
    };

    let mut columns = Vec::new();
    for field in &fields_named.named {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;

        let mut column = None;
        let mut record = false;
        let mut skip = false;
        for attr in &field.attrs {
            if !attr.path().is_ident("column") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value: LitStr = meta.value()?.parse()?;
                    validate_identifier_syn(&value.value(), "column name", value.span())?;
                    column = Some(value.value());
                } else if meta.path.is_ident("record") {
                    record = true;
                } else if meta.path.is_ident("skip") {
                    skip = true;
                } else {
                    return Err(meta.error("expected `name`, `record` or `skip`"));
                }
                Ok(())
            })?;
        }

        if skip {
            continue;
        }

        let (kind, record_type) = if record {
            record_kind(&field.ty)
        } else {
            (FieldKind::Value, None)
        };

        columns.push(ColumnField {
            column: column.unwrap_or_else(|| ident.to_string()),
            ident,
            kind,
            record_type,
        });
    }

    Ok(columns)
}

/// Pick the record binding from the field's outer type
fn record_kind(ty: &Type) -> (FieldKind, Option<Type>) {
    for (wrapper, kind) in [
        ("Option", FieldKind::NullableRecord),
        ("Vec", FieldKind::RecordCollection),
    ] {
        if let Some(inner) = single_type_argument(ty, wrapper) {
            return (kind, Some(inner));
        }
    }
    (FieldKind::Record, Some(ty.clone()))
}

fn single_type_argument(ty: &Type, wrapper: &str) -> Option<Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        return None;
    };
    match arguments.args.first()? {
        GenericArgument::Type(inner) if arguments.args.len() == 1 => Some(inner.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::{parse_quote, DeriveInput};

    #[test]
    fn test_composite_attributes() {
        let input: DeriveInput = parse_quote! {
            #[composite(schema = "test", name = "Composite", extended = "-ngs_Composite_type-")]
            struct Composite { id: Uuid }
        };
        let info = parse_composite_attributes(&input.attrs).unwrap();
        assert_eq!(info.schema, "test");
        assert_eq!(info.name, "Composite");
        assert_eq!(info.extended.as_deref(), Some("-ngs_Composite_type-"));
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let input: DeriveInput = parse_quote! {
            #[composite(schema = "test")]
            struct Composite { id: Uuid }
        };
        assert!(parse_composite_attributes(&input.attrs).is_err());
    }

    #[test]
    fn test_column_attributes() {
        let input: DeriveInput = parse_quote! {
            struct Composite {
                id: Uuid,
                #[column(name = "simple", record)]
                inner: Simple,
                #[column(record)]
                maybe: Option<Simple>,
                #[column(record)]
                many: Vec<Simple>,
                tags: Vec<String>,
                #[column(skip)]
                cache: u64,
            }
        };
        let fields = parse_column_fields(&input.data).unwrap();
        let summary: Vec<(String, FieldKind)> = fields
            .iter()
            .map(|field| (field.column.clone(), field.kind))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("id".to_string(), FieldKind::Value),
                ("simple".to_string(), FieldKind::Record),
                ("maybe".to_string(), FieldKind::NullableRecord),
                ("many".to_string(), FieldKind::RecordCollection),
                ("tags".to_string(), FieldKind::Value),
            ]
        );
        let inner: Type = parse_quote!(Simple);
        assert_eq!(fields[2].record_type.as_ref(), Some(&inner));
    }

    #[test]
    fn test_invalid_identifier() {
        assert!(validate_identifier_syn("", "column name", proc_macro2::Span::call_site()).is_err());
        assert!(validate_identifier_syn(&"a".repeat(64), "column name", proc_macro2::Span::call_site()).is_err());
        assert!(validate_identifier_syn("a\"b", "column name", proc_macro2::Span::call_site()).is_err());
        assert!(validate_identifier_syn("Simple", "column name", proc_macro2::Span::call_site()).is_ok());
    }
}
