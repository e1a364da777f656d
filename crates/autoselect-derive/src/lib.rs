//! Derive macro for the `Selectable` trait.
//!
//! Generates the entity schema and field accessors from a struct's field
//! definitions, so the struct shape IS the selectable shape.
//!
//! # Usage
//!
//! ```ignore
//! use autoselect::Selectable;
//!
//! #[derive(Selectable)]
//! #[selectable(rename_all = "camelCase")]
//! struct Customer {
//!     id: i64,
//!     display_name: String,
//!     orders: Vec<Order>,
//!     #[selectable(skip)]
//!     password_hash: String,
//! }
//!
//! #[derive(Selectable)]
//! enum OrderStatus {
//!     Open,
//!     #[selectable(rename = "closed")]
//!     Paid,
//! }
//! ```
//!
//! Structs become entities (`Selectable`, `Entity`, `FieldAccess`); enums with
//! unit variants become enum scalars whose value is the variant name.

use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase,
};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr};

/// Derive `Selectable` for a struct with named fields, or `FieldAccess` for a
/// unit-only enum.
///
/// Attributes:
/// - `#[selectable(rename_all = "...")]` on the type: `camelCase`, `snake_case`,
///   `PascalCase`, `kebab-case`, `SCREAMING_SNAKE_CASE`, `lowercase`, `UPPERCASE`.
/// - `#[selectable(rename = "...")]` on a field or variant.
/// - `#[selectable(skip)]` on a field: not part of the schema.
#[proc_macro_derive(Selectable, attributes(selectable))]
pub fn derive_selectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let expanded = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => expand_struct(&input, named.named.iter()),
            _ => Err(syn::Error::new_spanned(
                &input,
                "Selectable can only be derived on structs with named fields",
            )),
        },
        Data::Enum(data) => expand_enum(&input, data.variants.iter()),
        Data::Union(_) => Err(syn::Error::new_spanned(
            &input,
            "Selectable can only be derived on structs and enums",
        )),
    };
    expanded.unwrap_or_else(syn::Error::into_compile_error).into()
}

fn expand_struct<'a>(
    input: &DeriveInput,
    fields: impl Iterator<Item = &'a syn::Field>,
) -> syn::Result<TokenStream2> {
    reject_generics(input)?;
    let name = &input.ident;
    let rename_all = container_rename(&input.attrs)?;

    let mut descriptors = Vec::new();
    let mut arms = Vec::new();
    for field in fields {
        let options = FieldOptions::parse(&field.attrs)?;
        if options.skip {
            continue;
        }
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "named field should have ident"))?;
        // Handle raw identifiers (r#type → type).
        let rust_name = ident.to_string();
        let clean_name = rust_name.strip_prefix("r#").unwrap_or(&rust_name);
        let field_name = match options.rename {
            Some(rename) => rename,
            None => apply_case(clean_name, rename_all.as_deref()),
        };

        let ty = &field.ty;
        let position = descriptors.len();
        descriptors.push(quote! {
            ::autoselect::FieldDescriptor::new(
                #field_name,
                <#ty as ::autoselect::FieldAccess>::field_type(),
            )
        });
        arms.push(quote! {
            #position => ::autoselect::FieldAccess::field_ref(&self.#ident),
        });
    }

    Ok(quote! {
        impl ::autoselect::Selectable for #name {
            fn schema() -> &'static ::autoselect::EntitySchema {
                static SCHEMA: ::std::sync::OnceLock<::autoselect::EntitySchema> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    ::autoselect::EntitySchema::new(
                        ::std::any::type_name::<#name>(),
                        ::std::vec![#(#descriptors),*],
                    )
                })
            }
        }

        impl ::autoselect::Entity for #name {
            fn entity_schema(&self) -> &'static ::autoselect::EntitySchema {
                <Self as ::autoselect::Selectable>::schema()
            }

            fn field(&self, index: usize) -> ::autoselect::FieldRef<'_> {
                match index {
                    #(#arms)*
                    _ => ::autoselect::FieldRef::Null,
                }
            }
        }

        impl ::autoselect::FieldAccess for #name {
            fn field_type() -> ::autoselect::FieldType {
                ::autoselect::FieldType::Object(<Self as ::autoselect::Selectable>::schema)
            }

            fn field_ref(&self) -> ::autoselect::FieldRef<'_> {
                ::autoselect::FieldRef::Entity(self)
            }
        }
    })
}

fn expand_enum<'a>(
    input: &DeriveInput,
    variants: impl Iterator<Item = &'a syn::Variant>,
) -> syn::Result<TokenStream2> {
    reject_generics(input)?;
    let name = &input.ident;
    let rename_all = container_rename(&input.attrs)?;

    let mut arms = Vec::new();
    for variant in variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "Selectable enums can only have unit variants",
            ));
        }
        let options = FieldOptions::parse(&variant.attrs)?;
        let ident = &variant.ident;
        let value = match options.rename {
            Some(rename) => rename,
            None => apply_case(&ident.to_string(), rename_all.as_deref()),
        };
        arms.push(quote! { Self::#ident => #value, });
    }

    Ok(quote! {
        impl ::autoselect::FieldAccess for #name {
            fn field_type() -> ::autoselect::FieldType {
                ::autoselect::FieldType::Scalar(::autoselect::ScalarKind::Enum)
            }

            fn field_ref(&self) -> ::autoselect::FieldRef<'_> {
                let value: &'static str = match *self {
                    #(#arms)*
                };
                ::autoselect::FieldRef::Value(::autoselect::serde_json::Value::String(
                    value.to_string(),
                ))
            }
        }
    })
}

// Schemas live in a per-item static, which cannot vary by type parameter.
fn reject_generics(input: &DeriveInput) -> syn::Result<()> {
    if input.generics.params.is_empty() {
        Ok(())
    } else {
        Err(syn::Error::new_spanned(
            &input.generics,
            "Selectable cannot be derived on generic types",
        ))
    }
}

#[derive(Default)]
struct FieldOptions {
    rename: Option<String>,
    skip: bool,
}

impl FieldOptions {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut options = Self::default();
        for attr in attrs {
            if !attr.path().is_ident("selectable") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    options.skip = true;
                    Ok(())
                } else if meta.path.is_ident("rename") {
                    let lit: LitStr = meta.value()?.parse()?;
                    options.rename = Some(lit.value());
                    Ok(())
                } else {
                    Err(meta.error("expected `skip` or `rename = \"...\"`"))
                }
            })?;
        }
        Ok(options)
    }
}

fn container_rename(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut rename_all = None;
    for attr in attrs {
        if !attr.path().is_ident("selectable") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let lit: LitStr = meta.value()?.parse()?;
                let rule = lit.value();
                if !CASE_RULES.contains(&rule.as_str()) {
                    return Err(syn::Error::new_spanned(
                        &lit,
                        format!("unknown rename_all rule, expected one of {:?}", CASE_RULES),
                    ));
                }
                rename_all = Some(rule);
                Ok(())
            } else {
                Err(meta.error("expected `rename_all = \"...\"`"))
            }
        })?;
    }
    Ok(rename_all)
}

const CASE_RULES: &[&str] = &[
    "camelCase",
    "snake_case",
    "PascalCase",
    "kebab-case",
    "SCREAMING_SNAKE_CASE",
    "lowercase",
    "UPPERCASE",
];

fn apply_case(name: &str, rule: Option<&str>) -> String {
    match rule {
        Some("camelCase") => name.to_lower_camel_case(),
        Some("snake_case") => name.to_snake_case(),
        Some("PascalCase") => name.to_upper_camel_case(),
        Some("kebab-case") => name.to_kebab_case(),
        Some("SCREAMING_SNAKE_CASE") => name.to_shouty_snake_case(),
        Some("lowercase") => name.to_lowercase(),
        Some("UPPERCASE") => name.to_uppercase(),
        _ => name.to_string(),
    }
}
