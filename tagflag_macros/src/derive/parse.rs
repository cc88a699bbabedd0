//! Attribute parsing for `#[derive(Schema)]`.
//!
//! `#[tagflag(...)]` is owned by this crate, so unknown keys are errors.
//! `#[serde(...)]` is shared with serde: only `rename`, `flatten` and the
//! skip markers are read and everything else is passed over.

use syn::meta::ParseNestedMeta;
use syn::{
    Attribute, Data, DeriveInput, Expr, ExprLit, Fields, Generics, Ident, Lit, LitStr, Meta, Token,
    Type,
};

/// A struct accepted by the derive.
pub(crate) struct SchemaInput {
    pub ident: Ident,
    pub generics: Generics,
    pub crate_path: Option<syn::Path>,
    pub fields: Vec<FieldInput>,
}

/// One named field and the attributes the walk cares about.
pub(crate) struct FieldInput {
    pub ident: Ident,
    pub ty: Type,
    pub key: Option<String>,
    pub default: Option<String>,
    pub usage: Option<String>,
    pub flatten: bool,
    pub skip: bool,
}

pub(crate) fn parse_input(input: &DeriveInput) -> syn::Result<SchemaInput> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Schema can only be derived for structs",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            data.struct_token,
            "Schema requires named fields",
        ));
    };

    let crate_path = parse_container_attrs(&input.attrs)?;
    let fields = named
        .named
        .iter()
        .map(parse_field)
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(SchemaInput {
        ident: input.ident.clone(),
        generics: input.generics.clone(),
        crate_path,
        fields,
    })
}

fn parse_container_attrs(attrs: &[Attribute]) -> syn::Result<Option<syn::Path>> {
    let mut crate_path = None;
    parse_tagflag(attrs, |meta| {
        if meta.path.is_ident("crate") {
            let lit = lit_str(meta, "crate")?;
            set_once(meta, &mut crate_path, lit.parse::<syn::Path>()?)
        } else {
            Err(meta.error("unknown tagflag container attribute; expected `crate`"))
        }
    })?;
    Ok(crate_path)
}

fn parse_field(field: &syn::Field) -> syn::Result<FieldInput> {
    let Some(ident) = field.ident.clone() else {
        return Err(syn::Error::new_spanned(field, "Schema requires named fields"));
    };

    let mut default = None;
    let mut usage = None;
    parse_tagflag(&field.attrs, |meta| {
        if meta.path.is_ident("default") {
            set_once(meta, &mut default, lit_str(meta, "default")?.value())
        } else if meta.path.is_ident("usage") {
            set_once(meta, &mut usage, lit_str(meta, "usage")?.value())
        } else {
            Err(meta.error("unknown tagflag field attribute; expected `default` or `usage`"))
        }
    })?;

    let serde = parse_serde_field(&field.attrs)?;
    Ok(FieldInput {
        ident,
        ty: field.ty.clone(),
        key: serde.rename,
        default,
        usage: usage.or_else(|| doc_comment(&field.attrs)),
        flatten: serde.flatten,
        skip: serde.skip,
    })
}

#[derive(Default)]
struct SerdeField {
    rename: Option<String>,
    flatten: bool,
    skip: bool,
}

fn parse_serde_field(attrs: &[Attribute]) -> syn::Result<SerdeField> {
    let mut out = SerdeField::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                parse_rename(&meta, &mut out.rename)
            } else if meta.path.is_ident("flatten") {
                out.flatten = true;
                Ok(())
            } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_deserializing") {
                out.skip = true;
                Ok(())
            } else {
                discard_unknown(&meta)
            }
        })?;
    }
    Ok(out)
}

/// `rename = "k"` or `rename(deserialize = "k")`; the deserialize name is the
/// one the file is read with.
fn parse_rename(meta: &ParseNestedMeta, out: &mut Option<String>) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        *out = Some(meta.value()?.parse::<LitStr>()?.value());
        return Ok(());
    }
    if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|nested| {
            if nested.path.is_ident("deserialize") {
                *out = Some(nested.value()?.parse::<LitStr>()?.value());
                Ok(())
            } else {
                discard_unknown(&nested)
            }
        })?;
    }
    Ok(())
}

/// First paragraph of the field's doc comment, joined into one line.
fn doc_comment(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(text), ..
                }) => Some(text.value().trim().to_owned()),
                _ => None,
            },
            _ => None,
        })
        .skip_while(String::is_empty)
        .take_while(|line| !line.is_empty())
        .collect();
    (!lines.is_empty()).then(|| lines.join(" "))
}

/// Iterate all `#[tagflag(...)]` attributes and apply a callback.
fn parse_tagflag<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("tagflag")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

fn lit_str(meta: &ParseNestedMeta, key: &str) -> syn::Result<LitStr> {
    let lit = meta.value()?.parse::<Lit>()?;
    match lit {
        Lit::Str(s) => Ok(s),
        other => Err(syn::Error::new(other.span(), format!("{key} must be a string"))),
    }
}

fn set_once<T>(meta: &ParseNestedMeta, slot: &mut Option<T>, value: T) -> syn::Result<()> {
    if slot.is_some() {
        return Err(meta.error("duplicate tagflag attribute"));
    }
    *slot = Some(value);
    Ok(())
}

/// Consume an unrecognised key-value or list without recording it.
fn discard_unknown(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        syn::parenthesized!(content in meta.input);
        content.parse::<proc_macro2::TokenStream>()?;
    }
    Ok(())
}
