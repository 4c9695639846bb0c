//! Derive macro for pomkit locator registries.
//!
//! `#[derive(Locators)]` turns a struct of `Locator` fields into a
//! `NamedLocators` implementation, so a registry can be listed and looked up
//! by field name without a hand-maintained table.
//!
//! ```ignore
//! use pomkit::{Locator, Locators};
//!
//! #[derive(Locators)]
//! #[locators(name = "login")]
//! struct LoginLocators {
//!     #[locators(flatten)]
//!     nav: NavLocators,
//!     username: Locator,
//!     password: Locator,
//!     #[locators(skip)]
//!     base_url: String,
//! }
//! ```
//!
//! # Attributes
//!
//! - `#[locators(name = "...")]` on the struct sets the registry name
//!   (defaults to the snake_case struct name without a `Locators` suffix)
//! - `#[locators(flatten)]` on a field splices in the entries of a nested
//!   registry
//! - `#[locators(skip)]` on a field leaves it out of the listing

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr};

/// Derive `pomkit::NamedLocators` for a struct of locators.
#[proc_macro_derive(Locators, attributes(locators))]
pub fn derive_locators(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// How a field takes part in the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldRole {
    Entry,
    Flatten,
    Skip,
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let registry_name = match struct_name_attribute(&input.attrs)? {
        Some(explicit) => explicit,
        None => default_registry_name(&name.to_string()),
    };

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Locators can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Locators can only be derived for structs",
            ))
        }
    };

    let mut pushes = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        match field_role(&field.attrs)? {
            FieldRole::Entry => {
                let key = ident.to_string();
                pushes.push(quote! { entries.push((#key, &self.#ident)); });
            }
            FieldRole::Flatten => {
                pushes.push(quote! {
                    entries.extend(::pomkit::NamedLocators::entries(&self.#ident));
                });
            }
            FieldRole::Skip => {}
        }
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::pomkit::NamedLocators for #name #ty_generics #where_clause {
            fn registry_name(&self) -> &str {
                #registry_name
            }

            fn entries(&self) -> ::std::vec::Vec<(&str, &::pomkit::Locator)> {
                let mut entries: ::std::vec::Vec<(&str, &::pomkit::Locator)> =
                    ::std::vec::Vec::new();
                #(#pushes)*
                entries
            }
        }
    })
}

/// Read `#[locators(name = "...")]` from the struct attributes
fn struct_name_attribute(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut found = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("locators")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                found = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `name = \"...\"`"))
            }
        })?;
    }
    Ok(found)
}

fn field_role(attrs: &[Attribute]) -> syn::Result<FieldRole> {
    let mut role = FieldRole::Entry;
    for attr in attrs.iter().filter(|a| a.path().is_ident("locators")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("flatten") {
                role = FieldRole::Flatten;
                Ok(())
            } else if meta.path.is_ident("skip") {
                role = FieldRole::Skip;
                Ok(())
            } else {
                Err(meta.error("expected `flatten` or `skip`"))
            }
        })?;
    }
    Ok(role)
}

/// `CartLocators` -> `cart`, `NavBar` -> `nav_bar`
fn default_registry_name(struct_name: &str) -> String {
    let base = struct_name
        .strip_suffix("Locators")
        .filter(|rest| !rest.is_empty())
        .unwrap_or(struct_name);
    to_snake_case(base)
}

/// Convert PascalCase to snake_case
fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_lower {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else {
            result.push(c);
            prev_lower = true;
        }
    }

    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn expand_str(source: &str) -> syn::Result<String> {
        let input: DeriveInput = syn::parse_str(source)?;
        expand(&input).map(|tokens| {
            tokens
                .to_string()
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect()
        })
    }

    mod naming_tests {
        use super::*;

        #[test]
        fn test_to_snake_case() {
            assert_eq!(to_snake_case("Cart"), "cart");
            assert_eq!(to_snake_case("TextBox"), "text_box");
            assert_eq!(to_snake_case("ID"), "id");
        }

        #[test]
        fn test_default_registry_name_strips_suffix() {
            assert_eq!(default_registry_name("CartLocators"), "cart");
            assert_eq!(default_registry_name("CheckBoxLocators"), "check_box");
            assert_eq!(default_registry_name("Locators"), "locators");
            assert_eq!(default_registry_name("NavBar"), "nav_bar");
        }
    }

    mod expansion_tests {
        use super::*;

        #[test]
        fn test_entries_in_declaration_order() {
            let out = expand_str(
                "#[locators(name = \"login\")] struct LoginLocators { username: Locator, password: Locator }",
            )
            .unwrap();
            assert!(out.contains("\"login\""));
            let user = out.find("\"username\"").unwrap();
            let pass = out.find("\"password\"").unwrap();
            assert!(user < pass);
        }

        #[test]
        fn test_flatten_and_skip() {
            let out = expand_str(
                "struct CartLocators { #[locators(flatten)] nav: NavLocators, rows: Locator, #[locators(skip)] url: String }",
            )
            .unwrap();
            assert!(out.contains("NamedLocators::entries(&self.nav)"));
            assert!(out.contains("\"rows\""));
            assert!(!out.contains("\"url\""));
            assert!(!out.contains("\"nav\""));
            assert!(out.contains("\"cart\""));
        }

        #[test]
        fn test_unknown_attribute_is_error() {
            let err = expand_str("struct A { #[locators(lazy)] a: Locator }").unwrap_err();
            assert!(err.to_string().contains("flatten"));
        }

        #[test]
        fn test_tuple_struct_rejected() {
            assert!(expand_str("struct A(Locator);").is_err());
            assert!(expand_str("enum A { B }").is_err());
        }
    }
}
