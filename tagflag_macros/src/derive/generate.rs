//! Token generation for `#[derive(Schema)]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::WherePredicate;
use syn::ext::IdentExt;

use super::parse::{FieldInput, SchemaInput};

/// Emit `impl Schema` and `impl SchemaField` for the parsed struct.
pub(crate) fn schema_impls(schema: &SchemaInput, krate: &TokenStream) -> TokenStream {
    let ident = &schema.ident;
    let visible: Vec<&FieldInput> = schema.fields.iter().filter(|f| !f.skip).collect();

    let mut generics = schema.generics.clone();
    if generics.type_params().next().is_some() {
        let where_clause = generics.make_where_clause();
        for field in &visible {
            let ty = &field.ty;
            let predicate: WherePredicate = syn::parse_quote!(#ty: #krate::SchemaField);
            where_clause.predicates.push(predicate);
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let visits: Vec<TokenStream> = visible.iter().map(|field| field_visit(field, krate)).collect();
    let unused = visits.is_empty().then(|| quote! { let _ = (walker, prefix); });

    quote! {
        #[automatically_derived]
        impl #impl_generics #krate::Schema for #ident #ty_generics #where_clause {
            fn walk(
                walker: &mut #krate::SchemaWalker,
                prefix: &#krate::KeyPath,
            ) -> #krate::TagflagResult<()> {
                #unused
                #( #visits )*
                ::core::result::Result::Ok(())
            }
        }

        #[automatically_derived]
        impl #impl_generics #krate::SchemaField for #ident #ty_generics #where_clause {
            fn visit(
                walker: &mut #krate::SchemaWalker,
                prefix: &#krate::KeyPath,
                field: &#krate::FieldSpec,
            ) -> #krate::TagflagResult<()> {
                walker.record::<Self>(prefix, field)
            }
        }
    }
}

fn field_visit(field: &FieldInput, krate: &TokenStream) -> TokenStream {
    let ty = &field.ty;
    let name = field.ident.unraw().to_string();
    let key = field.key.as_ref().map(|k| quote! { .key(#k) });
    let default = field.default.as_ref().map(|d| quote! { .default_value(#d) });
    let usage = field.usage.as_ref().map(|u| quote! { .usage(#u) });
    let flatten = field.flatten.then(|| quote! { .flatten() });
    quote! {
        <#ty as #krate::SchemaField>::visit(
            walker,
            prefix,
            &#krate::FieldSpec::new(#name) #key #default #usage #flatten,
        )?;
    }
}
