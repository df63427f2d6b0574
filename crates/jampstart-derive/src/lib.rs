//! Provides derive macros for `jamp::HasDependencies`.
use std::collections::HashSet;

use quote::quote;
use syn::{Data, DataStruct, DeriveInput, Fields};

/// Returns `true` if the field carries `#[dependencies(skip)]`.
fn is_skipped(field: &syn::Field) -> syn::Result<bool> {
    let mut skip = false;
    for att in field.attrs.iter() {
        if att.path().is_ident("dependencies") {
            att.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    skip = true;
                    Ok(())
                } else {
                    Err(meta.error(format!(
                        "unsupported field attribute {:?} - must be 'skip'",
                        meta.path
                            .get_ident()
                            .map(|id| id.to_string())
                            .unwrap_or("unknown".to_string())
                    )))
                }
            })?;
        }
    }
    Ok(skip)
}

struct Tracked {
    accessors: Vec<proc_macro2::TokenStream>,
    types: Vec<syn::Type>,
}

fn get_tracked(input: &DeriveInput) -> syn::Result<Tracked> {
    let name = &input.ident;
    let fields = match &input.data {
        Data::Struct(DataStruct { fields, .. }) => fields,
        _ => {
            return Err(syn::Error::new(
                name.span(),
                "deriving HasDependencies only supports structs".to_string(),
            ));
        }
    };

    let mut accessors = vec![];
    let mut seen = HashSet::new();
    let mut types = vec![];
    let iter: Box<dyn Iterator<Item = &syn::Field>> = match fields {
        Fields::Named(named) => Box::new(named.named.iter()),
        Fields::Unnamed(unnamed) => Box::new(unnamed.unnamed.iter()),
        Fields::Unit => Box::new(std::iter::empty()),
    };
    for (i, field) in iter.enumerate() {
        if is_skipped(field)? {
            continue;
        }
        let accessor = match &field.ident {
            Some(ident) => quote! { self.#ident },
            None => {
                let index = syn::Index::from(i);
                quote! { self.#index }
            }
        };
        accessors.push(accessor);
        if seen.insert(field.ty.clone()) {
            types.push(field.ty.clone());
        }
    }
    Ok(Tracked { accessors, types })
}

/// Derives `jamp::HasDependencies` by merging the dependencies of every
/// field not marked `#[dependencies(skip)]`.
#[proc_macro_derive(HasDependencies, attributes(dependencies))]
pub fn derive_has_dependencies(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input: DeriveInput = syn::parse_macro_input!(input);
    let name = &input.ident;

    let Tracked { accessors, types } = match get_tracked(&input) {
        Ok(t) => t,
        Err(e) => return e.into_compile_error().into(),
    };

    let mut generics = input.generics.clone();
    {
        let where_clause = generics.make_where_clause();
        for ty in types.iter() {
            where_clause
                .predicates
                .push(syn::parse_quote! { #ty: jamp::HasDependencies });
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let output = quote! {
        impl #impl_generics jamp::HasDependencies for #name #ty_generics #where_clause {
            fn dependencies(&self) -> jamp::Dependencies {
                jamp::Dependencies::default()
                    #(.merge(jamp::HasDependencies::dependencies(&#accessors)))*
            }
        }
    };
    output.into()
}
