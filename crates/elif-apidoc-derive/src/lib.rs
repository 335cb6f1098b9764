/*!
Procedural macros for elif-apidoc type descriptions.

`#[derive(Describe)]` reads the same `serde` attributes that shape a type's
wire format, so the derived description matches what the type serializes to.
*/

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    ext::IdentExt, meta::ParseNestedMeta, parse_macro_input, Attribute, Data, DeriveInput, Field,
    Fields, LitStr, Token,
};

/// Derive `elif_apidoc::Describe` for a struct
///
/// Supported `serde` attributes: `rename`, `rename_all`, `flatten`, `skip`,
/// `skip_serializing` and `transparent`. Other `serde` attributes are ignored.
#[proc_macro_derive(Describe, attributes(serde))]
pub fn derive_describe(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    generate_describe_impl(&input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

fn generate_describe_impl(input: &DeriveInput) -> Result<TokenStream2, syn::Error> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Describe cannot be derived for generic types",
        ));
    }

    let data = match &input.data {
        Data::Struct(data) => data,
        Data::Enum(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "Describe cannot be derived for enums; register a known type instead",
            ));
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "Describe cannot be derived for union types",
            ));
        }
    };

    let container = ContainerAttrs::from_attrs(&input.attrs)?;

    let body = match &data.fields {
        Fields::Named(named) if container.transparent => {
            let mut fields = named.named.iter();
            match (fields.next(), fields.next()) {
                (Some(field), None) => describe_inner(field),
                _ => {
                    return Err(syn::Error::new_spanned(
                        &named.named,
                        "transparent structs must have exactly one field",
                    ));
                }
            }
        }
        Fields::Named(named) => {
            let type_name = name.unraw().to_string();
            let fields = named
                .named
                .iter()
                .map(|field| describe_field(field, container.rename_all))
                .collect::<Result<Vec<_>, _>>()?;

            quote! {
                ::elif_apidoc::TypeDescriptor::structure(
                    module_path!(),
                    #type_name,
                    vec![#(#fields),*],
                )
            }
        }
        Fields::Unnamed(unnamed) if unnamed.unnamed.len() == 1 => {
            describe_inner(&unnamed.unnamed[0])
        }
        Fields::Unnamed(unnamed) => {
            return Err(syn::Error::new_spanned(
                unnamed,
                "Describe cannot be derived for tuple structs with more than one field",
            ));
        }
        Fields::Unit => {
            return Err(syn::Error::new_spanned(
                input,
                "Describe cannot be derived for unit structs",
            ));
        }
    };

    Ok(quote! {
        impl ::elif_apidoc::Describe for #name {
            fn describe() -> ::elif_apidoc::TypeDescriptor {
                #body
            }
        }
    })
}

/// Newtypes serialize as their only field
fn describe_inner(field: &Field) -> TokenStream2 {
    let ty = &field.ty;
    quote! {
        <#ty as ::elif_apidoc::Describe>::describe()
    }
}

fn describe_field(field: &Field, rename_all: Option<RenameRule>) -> Result<TokenStream2, syn::Error> {
    let ident = match &field.ident {
        Some(ident) => ident.unraw().to_string(),
        None => return Err(syn::Error::new_spanned(field, "expected a named field")),
    };
    let attrs = FieldAttrs::from_attrs(&field.attrs)?;

    // Skipped fields never reach the wire, so their type need not be describable
    if attrs.skip {
        return Ok(quote! {
            ::elif_apidoc::FieldDescriptor::new(#ident, ::elif_apidoc::TypeRef::of::<()>()).hidden()
        });
    }

    let ty = &field.ty;
    let mut tokens = quote! {
        ::elif_apidoc::FieldDescriptor::new(#ident, ::elif_apidoc::TypeRef::of::<#ty>())
    };

    let serialized = attrs
        .rename
        .or_else(|| rename_all.map(|rule| rule.apply(&ident)))
        .filter(|name| name != &ident);
    if let Some(serialized) = serialized {
        tokens = quote! { #tokens.rename(#serialized) };
    }
    if attrs.flatten {
        tokens = quote! { #tokens.embedded() };
    }

    Ok(tokens)
}

#[derive(Default)]
struct ContainerAttrs {
    rename_all: Option<RenameRule>,
    transparent: bool,
}

impl ContainerAttrs {
    fn from_attrs(attrs: &[Attribute]) -> Result<Self, syn::Error> {
        let mut parsed = Self::default();

        for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    if let Some(lit) = serialize_name(&meta)? {
                        parsed.rename_all = Some(RenameRule::parse(&lit)?);
                    }
                } else if meta.path.is_ident("transparent") {
                    parsed.transparent = true;
                } else {
                    skip_meta(&meta)?;
                }
                Ok(())
            })?;
        }

        Ok(parsed)
    }
}

#[derive(Default)]
struct FieldAttrs {
    rename: Option<String>,
    flatten: bool,
    skip: bool,
}

impl FieldAttrs {
    fn from_attrs(attrs: &[Attribute]) -> Result<Self, syn::Error> {
        let mut parsed = Self::default();

        for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    if let Some(lit) = serialize_name(&meta)? {
                        parsed.rename = Some(lit.value());
                    }
                } else if meta.path.is_ident("flatten") {
                    parsed.flatten = true;
                } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                    parsed.skip = true;
                } else {
                    skip_meta(&meta)?;
                }
                Ok(())
            })?;
        }

        Ok(parsed)
    }
}

/// Value of `key = "..."` or the `serialize` half of `key(serialize = "...", ...)`
fn serialize_name(meta: &ParseNestedMeta) -> Result<Option<LitStr>, syn::Error> {
    if meta.input.peek(Token![=]) {
        return Ok(Some(meta.value()?.parse()?));
    }

    let mut serialize = None;
    meta.parse_nested_meta(|nested| {
        if nested.path.is_ident("serialize") {
            serialize = Some(nested.value()?.parse()?);
        } else {
            skip_meta(&nested)?;
        }
        Ok(())
    })?;
    Ok(serialize)
}

/// Consume an attribute this macro has no use for
fn skip_meta(meta: &ParseNestedMeta) -> Result<(), syn::Error> {
    if meta.input.peek(Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|nested| skip_meta(&nested))?;
    }
    Ok(())
}

/// Case conventions accepted by `#[serde(rename_all = "...")]`
#[derive(Clone, Copy)]
enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    fn parse(lit: &LitStr) -> Result<Self, syn::Error> {
        Ok(match lit.value().as_str() {
            "lowercase" => Self::Lower,
            "UPPERCASE" => Self::Upper,
            "PascalCase" => Self::Pascal,
            "camelCase" => Self::Camel,
            "snake_case" => Self::Snake,
            "SCREAMING_SNAKE_CASE" => Self::ScreamingSnake,
            "kebab-case" => Self::Kebab,
            "SCREAMING-KEBAB-CASE" => Self::ScreamingKebab,
            other => {
                return Err(syn::Error::new_spanned(
                    lit,
                    format!("unknown rename rule `{}`", other),
                ));
            }
        })
    }

    /// Rename a snake_case field identifier
    fn apply(self, field: &str) -> String {
        match self {
            Self::Lower | Self::Snake => field.to_ascii_lowercase(),
            Self::Upper | Self::ScreamingSnake => field.to_ascii_uppercase(),
            Self::Pascal => pascal_case(field),
            Self::Camel => {
                let pascal = pascal_case(field);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                    None => pascal,
                }
            }
            Self::Kebab => field.replace('_', "-"),
            Self::ScreamingKebab => field.to_ascii_uppercase().replace('_', "-"),
        }
    }
}

fn pascal_case(field: &str) -> String {
    let mut result = String::with_capacity(field.len());
    let mut capitalize = true;
    for ch in field.chars() {
        if ch == '_' {
            capitalize = true;
        } else if capitalize {
            result.push(ch.to_ascii_uppercase());
            capitalize = false;
        } else {
            result.push(ch);
        }
    }
    result
}
