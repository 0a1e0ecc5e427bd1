//! ToRow derive macro implementation

use crate::attrs::{column_name, field_attrs, named_fields};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = named_fields(&input, "ToRow")?;

    let mut pushes = Vec::new();
    for field in &fields {
        let attrs = field_attrs(field)?;
        if attrs.skip {
            continue;
        }
        let field_name = field.ident.as_ref().unwrap();
        let column = column_name(field, &attrs);
        if attrs.omitempty {
            pushes.push(quote! {
                {
                    let value = myorm::ToValue::to_value(&self.#field_name);
                    if !value.is_zero() {
                        row.push((#column, value));
                    }
                }
            });
        } else {
            pushes.push(quote! {
                row.push((#column, myorm::ToValue::to_value(&self.#field_name)));
            });
        }
    }

    Ok(quote! {
        impl #impl_generics myorm::ToRow for #name #ty_generics #where_clause {
            fn to_row(&self) -> ::std::vec::Vec<(&'static str, myorm::Value)> {
                let mut row = ::std::vec::Vec::new();
                #(#pushes)*
                row
            }
        }
    })
}
