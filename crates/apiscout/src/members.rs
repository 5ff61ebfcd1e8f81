//! Documented members of a declared type across its inheritance chain

use std::collections::{HashSet, VecDeque};

use apiscout_core::{TypeDescriptor, TypeKind, TypeRegistry};

/// One documented property, already resolved against its owner's bindings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub descriptor: TypeDescriptor,
    pub optional: bool,
}

/// Non-excluded fields of `descriptor`'s type and of every supertype, plus the
/// accessor properties of interfaces in that chain.
///
/// The type's own members come first, then its supertypes breadth-first. Each
/// member is resolved against the descriptor of the type that declares it, so
/// a supertype written as `Audited<T>` sees the outer binding of `T`. Enums
/// have no documented members.
pub fn documented_members(descriptor: &TypeDescriptor, registry: &TypeRegistry) -> Vec<Member> {
    let mut members = Vec::new();
    if descriptor.is_enum() {
        return members;
    }

    let mut visited = HashSet::new();
    let mut chain = VecDeque::from([descriptor.clone()]);
    while let Some(current) = chain.pop_front() {
        if !visited.insert(current.identity().clone()) {
            continue;
        }
        let Some(decl) = registry.get(current.identity()) else {
            continue;
        };
        if decl.kind == TypeKind::Enum {
            continue;
        }

        members.extend(decl.fields.iter().filter(|field| !field.excluded).map(|field| Member {
            name: field.name.clone(),
            descriptor: current.resolve(&field.ty, registry),
            optional: field.optional,
        }));
        if decl.kind == TypeKind::Interface {
            members.extend(decl.accessors.iter().map(|accessor| Member {
                name: accessor.property.clone(),
                descriptor: current.resolve(&accessor.ty, registry),
                optional: accessor.optional,
            }));
        }
        chain.extend(
            decl.supertypes
                .iter()
                .map(|supertype| current.resolve(supertype, registry)),
        );
    }
    members
}
