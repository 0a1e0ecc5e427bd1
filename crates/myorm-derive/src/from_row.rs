//! FromRow derive macro implementation

use crate::attrs::{column_name, field_attrs, named_fields};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = named_fields(&input, "FromRow")?;

    let field_extracts: Vec<_> = fields
        .iter()
        .map(|field| {
            let attrs = field_attrs(field)?;
            let field_name = field.ident.as_ref().unwrap();
            if attrs.skip {
                return Ok(quote! {
                    #field_name: ::core::default::Default::default()
                });
            }
            let column = column_name(field, &attrs);
            Ok(quote! {
                #field_name: row.try_column(#column)?
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(quote! {
        impl #impl_generics myorm::FromRow for #name #ty_generics #where_clause {
            fn from_row(row: &myorm::RowView<'_>) -> myorm::OrmResult<Self> {
                use myorm::RowExt;
                Ok(Self {
                    #(#field_extracts),*
                })
            }
        }
    })
}
