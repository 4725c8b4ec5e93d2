//! Derive macro for Lineage ECS entity types.
//!
//! `#[derive(Entity)]` implements `lineage_ecs::Entity` for a struct that
//! carries an `EntityHeader`. The supertype is named with
//! `#[entity(extends = Parent)]`; without it the type is top-level.
//!
//! ```ignore
//! #[derive(Default, Entity)]
//! struct Node {
//!     header: EntityHeader,
//!     visible: bool,
//! }
//!
//! #[derive(Default, Entity)]
//! #[entity(extends = Node)]
//! struct Sprite {
//!     #[entity(header)]
//!     base: EntityHeader,
//!     frame: u16,
//! }
//! ```
//!
//! # Header field
//!
//! The header is the field marked `#[entity(header)]`, or else the one
//! field whose type is named `EntityHeader`. Tuple structs work the same
//! way. Enums and unions cannot be entities.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{
    Attribute, Data, DeriveInput, Fields, Index, Member, Path, Type, parse_quote,
    spanned::Spanned,
};

/// Options from the type-level `#[entity(...)]` attribute.
#[derive(Default)]
struct EntityOptions {
    extends: Option<Path>,
}

fn parse_options(attrs: &[Attribute]) -> syn::Result<EntityOptions> {
    let mut options = EntityOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("entity") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("extends") {
                if options.extends.is_some() {
                    return Err(meta.error("`extends` given more than once"));
                }
                options.extends = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `extends = Parent`"))
            }
        })?;
    }

    Ok(options)
}

/// Whether a field carries `#[entity(header)]`.
fn is_marked_header(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut marked = false;

    for attr in attrs {
        if !attr.path().is_ident("entity") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("header") {
                marked = true;
                Ok(())
            } else {
                Err(meta.error("expected `header`"))
            }
        })?;
    }

    Ok(marked)
}

fn is_header_type(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "EntityHeader"),
        Type::Group(group) => is_header_type(&group.elem),
        Type::Paren(paren) => is_header_type(&paren.elem),
        _ => false,
    }
}

/// Find the header field: an explicit marker wins over a type match.
fn find_header(fields: &Fields, span: Span) -> syn::Result<Member> {
    let mut marked = Vec::new();
    let mut typed = Vec::new();

    for (i, field) in fields.iter().enumerate() {
        let member = field.ident.clone().map_or_else(
            || Member::Unnamed(Index::from(i)),
            Member::Named,
        );
        if is_marked_header(&field.attrs)? {
            marked.push((member, field.ty.span()));
        } else if is_header_type(&field.ty) {
            typed.push((member, field.ty.span()));
        }
    }

    let candidates = if marked.is_empty() { typed } else { marked };
    match candidates.as_slice() {
        [(member, _)] => Ok(member.clone()),
        [] => Err(syn::Error::new(
            span,
            "entity types need an `EntityHeader` field, or a field marked `#[entity(header)]`",
        )),
        [_, (_, second), ..] => Err(syn::Error::new(
            *second,
            "more than one header field; mark the right one with `#[entity(header)]`",
        )),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let options = parse_options(&input.attrs)?;

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(data) => {
            return Err(syn::Error::new(data.enum_token.span, "only structs can derive Entity"));
        }
        Data::Union(data) => {
            return Err(syn::Error::new(data.union_token.span, "only structs can derive Entity"));
        }
    };
    let header = find_header(fields, input.ident.span())?;

    let parent: Path = options
        .extends
        .unwrap_or_else(|| parse_quote!(::lineage_ecs::Root));
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::lineage_ecs::Entity for #name #ty_generics #where_clause {
            type Super = #parent;

            fn header(&self) -> &::lineage_ecs::EntityHeader {
                &self.#header
            }

            fn header_mut(&mut self) -> &mut ::lineage_ecs::EntityHeader {
                &mut self.#header
            }
        }
    })
}

/// Derive macro for entity types.
///
/// See the crate documentation for the accepted attributes.
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
