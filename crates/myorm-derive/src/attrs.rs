//! Shared `#[orm(...)]` attribute parsing.

/// Parsed per-field attributes.
#[derive(Default)]
pub struct FieldAttrs {
    pub column: Option<String>,
    pub skip: bool,
    pub omitempty: bool,
}

pub fn field_attrs(field: &syn::Field) -> syn::Result<FieldAttrs> {
    let mut attrs = FieldAttrs::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("column") {
                let lit: syn::LitStr = meta.value()?.parse()?;
                attrs.column = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("skip") {
                attrs.skip = true;
                Ok(())
            } else if meta.path.is_ident("omitempty") {
                attrs.omitempty = true;
                Ok(())
            } else {
                Err(meta.error("unknown orm attribute"))
            }
        })?;
    }
    Ok(attrs)
}

/// Column name for a field: explicit override or the field's own name.
pub fn column_name(field: &syn::Field, attrs: &FieldAttrs) -> String {
    attrs
        .column
        .clone()
        .unwrap_or_else(|| field.ident.as_ref().expect("named field").to_string())
}

/// Named fields of a struct, or an error for anything else.
pub fn named_fields(
    input: &syn::DeriveInput,
    trait_name: &str,
) -> syn::Result<Vec<syn::Field>> {
    match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            syn::Fields::Named(fields) => Ok(fields.named.iter().cloned().collect()),
            _ => Err(syn::Error::new_spanned(
                input,
                format!("{trait_name} can only be derived for structs with named fields"),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            input,
            format!("{trait_name} can only be derived for structs"),
        )),
    }
}
