//! Procedural macros for `tagflag`.
//!
//! `#[derive(Schema)]` reads the same `#[serde(...)]` attributes that drive
//! file decoding (`rename` for the key tag, `flatten`, `skip`) together with
//! `#[tagflag(default = "...", usage = "...")]`, and emits the field visits
//! that register one command-line flag per keyed scalar.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive macro for [`tagflag::Schema`].
///
/// Field attributes:
///
/// - `#[serde(rename = "key")]`: key tag; untagged scalars get no flag.
/// - `#[serde(flatten)]`: merge a nested record into the parent's keys.
/// - `#[serde(skip)]`: leave the field out of the walk.
/// - `#[tagflag(default = "...")]`: default in the flag's string syntax.
/// - `#[tagflag(usage = "...")]`: help text; the doc comment otherwise.
///
/// Container attribute `#[tagflag(crate = "path")]` points generated code
/// at a renamed dependency.
#[proc_macro_derive(Schema, attributes(tagflag))]
pub fn derive_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
