//! Procedural macro for composite type converters
//!
//! This crate provides the `Composite` derive, which generates the
//! `CompositeType` implementation (schema names and field bindings) for an
//! entity struct.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod codegen;
mod parsing;

use codegen::generate_composite_impl;
use parsing::{parse_column_fields, parse_composite_attributes};

/// Derive macro for the CompositeType trait
///
/// The struct must implement `Default`; fields missing from a literal keep
/// their default value.
///
/// ```rust,ignore
/// use pgtuple::prelude::*;
///
/// #[derive(Debug, Default, Composite)]
/// #[composite(schema = "test", name = "Composite")]
/// pub struct Composite {
///     pub id: Uuid,
///
///     #[column(record)]
///     pub simple: Simple,
///
///     #[column(name = "tag_list")]
///     pub tags: Vec<Option<String>>,
///
///     #[column(skip)]
///     pub transient: u64,
/// }
/// ```
#[proc_macro_derive(Composite, attributes(composite, column))]
pub fn derive_composite(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;

    let info = match parse_composite_attributes(&input.attrs) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    let fields = match parse_column_fields(&input.data) {
        Ok(fields) => fields,
        Err(e) => return e.to_compile_error().into(),
    };

    TokenStream::from(generate_composite_impl(name, &info, &fields))
}
