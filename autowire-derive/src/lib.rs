//! Derive macro for autowire
//!
//! `#[derive(Component)]` generates an `autowire::Describe` implementation,
//! so a type can be registered with `Catalog::with_component::<T>()` instead
//! of a hand-written descriptor.
//!
//! # Example
//!
//! ```rust,ignore
//! use autowire::{Catalog, Component, Construct, Container, Inject};
//! use std::sync::Arc;
//!
//! trait Transport: Send + Sync {}
//!
//! #[derive(Default, Component)]
//! #[component(implements(dyn Transport))]
//! struct Tcp;
//! impl Transport for Tcp {}
//!
//! #[derive(Default, Component)]
//! #[component(implements(dyn Transport))]
//! struct Udp;
//! impl Transport for Udp {}
//!
//! #[derive(Default, Component)]
//! struct Client {
//!     #[autowired]
//!     #[qualifier("Udp")]
//!     transport: Inject<dyn Transport>,
//! }
//!
//! let container = Container::start(
//!     Catalog::new()
//!         .with_component::<Tcp>()
//!         .with_component::<Udp>()
//!         .with_component::<Client>(),
//! )
//! .unwrap();
//! ```
//!
//! # Attributes
//!
//! On the type:
//!
//! - `#[component(implements(dyn A, dyn B))]` - capabilities the type implements
//! - `#[component(constructor)]` - build through `autowire::Construct`
//!   instead of `Default`
//! - `#[component(scanned)]` - index the type but never instantiate it
//! - `#[component(name = "...")]` - register under an explicit identifier
//!
//! On fields:
//!
//! - `#[autowired]` - inject the field; its type must be `Inject<T>`
//! - `#[qualifier("...")]` - pick an implementor when several exist

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::parse::Parse;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr, Token, Type};

/// Derive macro generating a component descriptor.
///
/// # Generated Code
///
/// ```rust,ignore
/// impl ::autowire::Describe for Client {
///     fn descriptor() -> ::autowire::ComponentDescriptor {
///         ::autowire::ComponentDescriptor::component(<Self as Default>::default)
///             .qualified_field::<dyn Transport>("transport", "Udp", |c| &c.transport)
///             .build()
///     }
/// }
/// ```
#[proc_macro_derive(Component, attributes(component, autowired, qualifier))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_component(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_component(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let component = parse_component_attr(&input.attrs)?;

    // Unit structs are fine, they just have nothing to inject
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields.named.iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Component can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Component can only be derived for structs",
            ));
        }
    };

    let construction = match component.kind {
        ConstructionKind::Default => quote! {
            ::autowire::ComponentDescriptor::component(
                <Self as ::core::default::Default>::default
            )
        },
        ConstructionKind::Constructor => quote! {
            ::autowire::ComponentDescriptor::constructed(
                <Self as ::autowire::Construct>::construct
            )
        },
        ConstructionKind::Scanned => quote! {
            ::autowire::ComponentDescriptor::scanned::<Self>()
        },
    };

    let named = component.name.map(|name| quote! { .named(#name) });

    let implements = component.implements.iter().map(|capability| {
        quote! { .implements::<#capability>(|component| component) }
    });

    let mut injected = Vec::new();
    for field in fields {
        let qualifier = find_qualifier_attr(&field.attrs)?;
        if !has_autowired_attr(&field.attrs) {
            if let Some(qualifier) = qualifier {
                return Err(syn::Error::new_spanned(
                    qualifier,
                    "#[qualifier] requires #[autowired] on the same field",
                ));
            }
            continue;
        }

        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let Some(target) = extract_inject_inner_type(&field.ty) else {
            return Err(syn::Error::new_spanned(
                &field.ty,
                "Fields marked with #[autowired] must have type Inject<T>",
            ));
        };
        let label = field_name.to_string();

        injected.push(match qualifier {
            Some(qualifier) => quote! {
                .qualified_field::<#target>(#label, #qualifier, |component| &component.#field_name)
            },
            None => quote! {
                .field::<#target>(#label, |component| &component.#field_name)
            },
        });
    }

    Ok(quote! {
        impl #impl_generics ::autowire::Describe for #name #ty_generics #where_clause {
            fn descriptor() -> ::autowire::ComponentDescriptor {
                #construction
                    #named
                    #(#implements)*
                    #(#injected)*
                    .build()
            }
        }
    })
}

/// How the derived descriptor instantiates the type
enum ConstructionKind {
    Default,
    Constructor,
    Scanned,
}

/// Parsed `#[component(...)]` attributes
struct ComponentAttr {
    kind: ConstructionKind,
    name: Option<LitStr>,
    implements: Vec<Type>,
}

fn parse_component_attr(attrs: &[Attribute]) -> syn::Result<ComponentAttr> {
    let mut parsed = ComponentAttr {
        kind: ConstructionKind::Default,
        name: None,
        implements: Vec::new(),
    };

    for attr in attrs {
        if !attr.path().is_ident("component") || attr.meta.require_path_only().is_ok() {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("implements") {
                let content;
                syn::parenthesized!(content in meta.input);
                let capabilities = content.parse_terminated(Type::parse, Token![,])?;
                parsed.implements.extend(capabilities);
                Ok(())
            } else if meta.path.is_ident("constructor") {
                set_kind(&mut parsed.kind, ConstructionKind::Constructor, &meta)
            } else if meta.path.is_ident("scanned") {
                set_kind(&mut parsed.kind, ConstructionKind::Scanned, &meta)
            } else if meta.path.is_ident("name") {
                parsed.name = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `implements(...)`, `constructor`, `scanned` or `name = \"...\"`"))
            }
        })?;
    }

    Ok(parsed)
}

fn set_kind(
    kind: &mut ConstructionKind,
    requested: ConstructionKind,
    meta: &syn::meta::ParseNestedMeta<'_>,
) -> syn::Result<()> {
    if !matches!(kind, ConstructionKind::Default) {
        return Err(meta.error("`constructor` and `scanned` are mutually exclusive"));
    }
    *kind = requested;
    Ok(())
}

/// Check for a bare `#[autowired]`
fn has_autowired_attr(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident("autowired"))
}

/// Find and parse `#[qualifier("...")]`
fn find_qualifier_attr(attrs: &[Attribute]) -> syn::Result<Option<LitStr>> {
    for attr in attrs {
        if attr.path().is_ident("qualifier") {
            return attr.parse_args::<LitStr>().map(Some);
        }
    }
    Ok(None)
}

/// Extract T from Inject<T>
fn extract_inject_inner_type(ty: &Type) -> Option<&Type> {
    if let Type::Path(type_path) = ty {
        let segment = type_path.path.segments.last()?;
        if segment.ident == "Inject" {
            if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                    return Some(inner);
                }
            }
        }
    }
    None
}
