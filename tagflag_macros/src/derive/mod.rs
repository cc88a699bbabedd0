//! Expansion of `#[derive(Schema)]`.

mod crate_path;
mod generate;
mod parse;


use proc_macro2::TokenStream;
use syn::DeriveInput;

/// Parse `input` and generate the `Schema` and `SchemaField` impls.
pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let schema = parse::parse_input(input)?;
    let krate = crate_path::resolve(schema.crate_path.as_ref());
    Ok(generate::schema_impls(&schema, &krate))
}
