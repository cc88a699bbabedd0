//! Crate path used by generated code.
//!
//! `#[tagflag(crate = "...")]` replaces the default `::tagflag` so the derive
//! works through a renamed or re-exported dependency.

use proc_macro2::TokenStream;
use quote::quote;

/// Resolve the crate path from the parsed container attribute.
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { ::tagflag }, |path| quote! { #path })
}
