//! Derive macros for myorm
//!
//! Provides `#[derive(FromRow)]` and `#[derive(ToRow)]` macros.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod from_row;
mod to_row;

/// Derive `FromRow` for a struct.
///
/// # Example
///
/// ```ignore
/// use myorm::FromRow;
///
/// #[derive(FromRow)]
/// struct User {
///     id: i64,
///     #[orm(column = "user_name")]
///     name: String,
///     nick: Option<String>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(column = "name")]` - Map the field to a different column name
/// - `#[orm(skip)]` - Exclude the field; it keeps its default value
#[proc_macro_derive(FromRow, attributes(orm))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_row::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `ToRow` for a struct: an ordered column/value row map for
/// INSERT/REPLACE statements.
///
/// # Example
///
/// ```ignore
/// use myorm::ToRow;
///
/// #[derive(ToRow)]
/// struct NewUser {
///     name: String,
///     #[orm(omitempty)]
///     nick: Option<String>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(column = "name")]` - Map the field to a different column name
/// - `#[orm(skip)]` - Exclude the field from the row map
/// - `#[orm(omitempty)]` - Drop the field when its value is the zero value
#[proc_macro_derive(ToRow, attributes(orm))]
pub fn derive_to_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    to_row::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
