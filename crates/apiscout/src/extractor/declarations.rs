//! Lowering of struct, enum and trait items into the declaration table

use apiscout_core::{AccessorDecl, FieldDecl, TypeDecl, TypeExpr, TypeIdentity, TypeRegistry};
use quote::ToTokens;
use syn::ext::IdentExt;
use syn::{Fields, Item, ItemEnum, ItemStruct, ItemTrait, ReturnType, TraitItem, TypeParamBound};
use tracing::trace;

use super::scope::{DeclIndex, Imports, Scope, generic_names, is_option};
use super::serde_attrs::{has_serde_flag, serde_rename};
use crate::file_utils::module_path;

/// Record the identity of every type declared in `items`, inline modules included
pub(crate) fn index_items(items: &[Item], module: &str, index: &mut DeclIndex) {
    for item in items {
        let ident = match item {
            Item::Struct(item) => &item.ident,
            Item::Enum(item) => &item.ident,
            Item::Trait(item) => &item.ident,
            Item::Mod(item_mod) => {
                if let Some((_, content)) = &item_mod.content {
                    let child = module_path(module, &[item_mod.ident.unraw().to_string()]);
                    index_items(content, &child, index);
                }
                continue;
            }
            _ => continue,
        };
        index.insert(TypeIdentity::new(module, ident.unraw().to_string()));
    }
}

/// Lower every type declared in `items` and register it
pub(crate) fn register_items(
    items: &[Item],
    module: &str,
    index: &DeclIndex,
    registry: &mut TypeRegistry,
) {
    let imports = Imports::collect(items, module);
    for item in items {
        let decl = match item {
            Item::Struct(item) => lower_struct(item, Scope::new(module, &imports, index)),
            Item::Enum(item) => lower_enum(item, module),
            Item::Trait(item) => lower_trait(item, Scope::new(module, &imports, index)),
            Item::Mod(item_mod) => {
                if let Some((_, content)) = &item_mod.content {
                    let child = module_path(module, &[item_mod.ident.unraw().to_string()]);
                    register_items(content, &child, index, registry);
                }
                continue;
            }
            _ => continue,
        };
        trace!(
            identity = %decl.identity,
            fields = decl.fields.len(),
            accessors = decl.accessors.len(),
            "registered declaration"
        );
        registry.register(decl);
    }
}

fn lower_struct(item: &ItemStruct, scope: Scope<'_>) -> TypeDecl {
    let identity = TypeIdentity::new(scope.module(), item.ident.unraw().to_string());
    let scope = scope
        .with_generics(&item.generics)
        .with_self_type(identity.clone());
    let generics = generic_names(&item.generics);

    // serde writes newtypes and transparent structs as their single field
    let transparent = match &item.fields {
        Fields::Unnamed(fields) if fields.unnamed.len() == 1 => fields.unnamed.first(),
        Fields::Named(fields)
            if fields.named.len() == 1 && has_serde_flag(&item.attrs, "transparent") =>
        {
            fields.named.first()
        }
        _ => None,
    };
    if let Some(field) = transparent
        && let Some(inner) = scope.lower(&field.ty)
    {
        return TypeDecl::newtype(identity, inner).with_generics(generics);
    }

    let mut decl = TypeDecl::structure(identity).with_generics(generics);
    let Fields::Named(fields) = &item.fields else {
        return decl;
    };
    for field in &fields.named {
        let Some(ident) = &field.ident else {
            continue;
        };
        let Some(ty) = scope.lower(&field.ty) else {
            trace!(
                field = %ident,
                ty = %field.ty.to_token_stream(),
                "field type has no documented form"
            );
            continue;
        };
        // Flattened fields contribute their members like a parent type
        if has_serde_flag(&field.attrs, "flatten") {
            decl = decl.with_supertype(ty);
            continue;
        }

        let name = serde_rename(&field.attrs).unwrap_or_else(|| ident.unraw().to_string());
        let mut field_decl = FieldDecl::new(name, ty);
        if has_serde_flag(&field.attrs, "skip") {
            field_decl = field_decl.excluded();
        }
        if is_option(&field.ty) {
            field_decl = field_decl.optional();
        }
        decl = decl.with_field(field_decl);
    }
    decl
}

fn lower_enum(item: &ItemEnum, module: &str) -> TypeDecl {
    let variants = item
        .variants
        .iter()
        .filter(|variant| !has_serde_flag(&variant.attrs, "skip"))
        .map(|variant| {
            serde_rename(&variant.attrs).unwrap_or_else(|| variant.ident.unraw().to_string())
        });
    TypeDecl::enumeration(TypeIdentity::new(module, item.ident.unraw().to_string()), variants)
        .with_generics(generic_names(&item.generics))
}

fn lower_trait(item: &ItemTrait, scope: Scope<'_>) -> TypeDecl {
    let identity = TypeIdentity::new(scope.module(), item.ident.unraw().to_string());
    let scope = scope
        .with_generics(&item.generics)
        .with_self_type(identity.clone());
    let mut decl = TypeDecl::interface(identity).with_generics(generic_names(&item.generics));

    for bound in &item.supertraits {
        if let TypeParamBound::Trait(trait_bound) = bound
            && let Some(supertype) = scope.lower_path(&trait_bound.path)
            && let TypeExpr::Named { identity, .. } = &supertype
            && scope.index().contains(identity)
        {
            decl = decl.with_supertype(supertype);
        }
    }

    for trait_item in &item.items {
        let TraitItem::Fn(method) = trait_item else {
            continue;
        };
        let sig = &method.sig;
        let receiver_only = sig.inputs.len() == 1 && sig.receiver().is_some();
        if !receiver_only || sig.generics.type_params().next().is_some() {
            continue;
        }
        let ReturnType::Type(_, ret) = &sig.output else {
            continue;
        };
        let Some(ty) = scope.lower(ret) else {
            continue;
        };
        if let Some(mut accessor) = AccessorDecl::from_method(&sig.ident.unraw().to_string(), ty) {
            accessor.optional = is_option(ret);
            decl = decl.with_accessor(accessor);
        }
    }
    decl
}
