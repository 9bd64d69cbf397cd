//! Code generation for the `CompositeType` implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;

use crate::parsing::{ColumnField, CompositeInfo, FieldKind};

fn generate_binding(field: &ColumnField) -> TokenStream {
    let ident = &field.ident;
    let column = &field.column;

    match (field.kind, &field.record_type) {
        (FieldKind::Value, _) | (_, None) => quote! {
            converters::FieldBinding::value(
                #column,
                |entity: &Self| &entity.#ident,
                |entity: &mut Self, value| entity.#ident = value,
            )
        },
        (kind, Some(record_type)) => {
            let constructor = match kind {
                FieldKind::NullableRecord => quote!(nullable_record),
                FieldKind::RecordCollection => quote!(record_collection),
                _ => quote!(record),
            };
            quote! {
                converters::FieldBinding::#constructor(
                    #column,
                    converters::Resolver::resolve::<#record_type>(&mut *resolver)?.binder(projection),
                    |entity: &Self| &entity.#ident,
                    |entity: &mut Self, value| entity.#ident = value,
                )
            }
        }
    }
}

pub fn generate_composite_impl(
    name: &Ident,
    info: &CompositeInfo,
    fields: &[ColumnField],
) -> TokenStream {
    let schema = &info.schema;
    let type_name = &info.name;
    let extended = match &info.extended {
        Some(extended) => quote!(::core::option::Option::Some(#extended)),
        None => quote!(::core::option::Option::None),
    };
    let bindings: Vec<TokenStream> = fields.iter().map(generate_binding).collect();

    quote! {
        impl converters::CompositeType for #name {
            const SCHEMA: &'static str = #schema;
            const TYPE_NAME: &'static str = #type_name;
            const EXTENDED_TYPE_NAME: ::core::option::Option<&'static str> = #extended;

            #[allow(unused_variables)]
            fn bindings<R: converters::Resolver>(
                resolver: &mut R,
                projection: converters::Projection,
            ) -> ::core::result::Result<
                ::std::vec::Vec<converters::FieldBinding<Self>>,
                converters::ConverterError,
            > {
                ::core::result::Result::Ok(::std::vec![#(#bindings),*])
            }
        }
    }
}
