//! Declaration table standing in for runtime type introspection
//!
//! Every composite type a generation run can reach is described once here:
//! its generic parameters, fields, accessor properties and supertypes.

use std::collections::HashMap;

use crate::data_type::OpenApiDataType;
use crate::descriptor::{TypeExpr, TypeIdentity, TypeKind};

const GETTER_PREFIX: &str = "get";
const BOOLEAN_GETTER_PREFIX: &str = "is";

/// Map containers known without a declaration, keyed `K` and valued `V`
const BUILTIN_MAPS: &[(&str, &str)] = &[
    ("std::collections", "HashMap"),
    ("std::collections", "BTreeMap"),
];

/// A declared field of a struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeExpr,
    /// Tagged for exclusion from documentation (`#[serde(skip)]`)
    pub excluded: bool,
    /// Declared as `Option<_>`
    pub optional: bool,
}

impl FieldDecl {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            excluded: false,
            optional: false,
        }
    }

    #[must_use]
    pub fn excluded(mut self) -> Self {
        self.excluded = true;
        self
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// A documented property of an interface, backed by a zero-argument accessor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorDecl {
    /// Property name as documented
    pub property: String,
    /// Accessor method name
    pub method: String,
    pub ty: TypeExpr,
    pub optional: bool,
}

impl AccessorDecl {
    /// Build an accessor from a zero-argument method following the getter
    /// convention: `get` or `is` followed by at least one more character.
    #[must_use]
    pub fn from_method(method: &str, ty: TypeExpr) -> Option<Self> {
        let suffix = accessor_suffix(method)?;
        let trimmed = suffix.trim_start_matches('_');
        let property = if trimmed.is_empty() {
            suffix.to_string()
        } else {
            lowercase_first(trimmed)
        };
        Some(Self {
            property,
            method: method.to_string(),
            ty,
            optional: false,
        })
    }
}

/// Returns the part of `method` after its getter prefix, if it is an accessor name
#[must_use]
pub fn accessor_suffix(method: &str) -> Option<&str> {
    [GETTER_PREFIX, BOOLEAN_GETTER_PREFIX]
        .iter()
        .find_map(|prefix| method.strip_prefix(prefix))
        .filter(|suffix| !suffix.is_empty())
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

/// One declared type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub identity: TypeIdentity,
    pub kind: TypeKind,
    /// Formal generic parameter names, in declaration order
    pub generics: Vec<String>,
    pub fields: Vec<FieldDecl>,
    pub accessors: Vec<AccessorDecl>,
    /// Inheritance chain (super-contracts for interfaces)
    pub supertypes: Vec<TypeExpr>,
    /// Enum values, in declaration order
    pub variants: Vec<String>,
    /// Serialized as this inner type (newtype or `#[serde(transparent)]` struct)
    pub transparent: Option<TypeExpr>,
}

impl TypeDecl {
    fn new(identity: TypeIdentity, kind: TypeKind) -> Self {
        Self {
            identity,
            kind,
            generics: Vec::new(),
            fields: Vec::new(),
            accessors: Vec::new(),
            supertypes: Vec::new(),
            variants: Vec::new(),
            transparent: None,
        }
    }

    #[must_use]
    pub fn structure(identity: TypeIdentity) -> Self {
        Self::new(identity, TypeKind::Struct)
    }

    #[must_use]
    pub fn enumeration<I, S>(identity: TypeIdentity, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            variants: variants.into_iter().map(Into::into).collect(),
            ..Self::new(identity, TypeKind::Enum)
        }
    }

    /// Struct documented as its single inner type
    #[must_use]
    pub fn newtype(identity: TypeIdentity, inner: TypeExpr) -> Self {
        Self {
            transparent: Some(inner),
            ..Self::new(identity, TypeKind::Struct)
        }
    }

    #[must_use]
    pub fn interface(identity: TypeIdentity) -> Self {
        Self::new(identity, TypeKind::Interface)
    }

    #[must_use]
    pub fn with_generics<I, S>(mut self, generics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.generics = generics.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn with_accessor(mut self, accessor: AccessorDecl) -> Self {
        self.accessors.push(accessor);
        self
    }

    #[must_use]
    pub fn with_supertype(mut self, supertype: TypeExpr) -> Self {
        self.supertypes.push(supertype);
        self
    }
}

/// Identity → declaration table for one generation run
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    decls: HashMap<TypeIdentity, TypeDecl>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Registry holding only the built-in map containers
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            decls: HashMap::new(),
        };
        for (module, name) in BUILTIN_MAPS {
            registry.register(
                TypeDecl::structure(TypeIdentity::new(*module, *name)).with_generics(["K", "V"]),
            );
        }
        registry
    }

    /// Register a declaration, returning the one it replaced
    pub fn register(&mut self, decl: TypeDecl) -> Option<TypeDecl> {
        self.decls.insert(decl.identity.clone(), decl)
    }

    #[must_use]
    pub fn get(&self, identity: &TypeIdentity) -> Option<&TypeDecl> {
        self.decls.get(identity)
    }

    #[must_use]
    pub fn contains(&self, identity: &TypeIdentity) -> bool {
        self.decls.contains_key(identity)
    }

    /// Kind of a declared or undeclared identity.
    ///
    /// Undeclared identities the primitive classifier maps to anything but
    /// `object` are primitives; the rest are opaque structs without members.
    #[must_use]
    pub fn kind_of(&self, identity: &TypeIdentity) -> TypeKind {
        if let Some(decl) = self.decls.get(identity) {
            return decl.kind;
        }
        match OpenApiDataType::classify(identity, self) {
            OpenApiDataType::Object => TypeKind::Struct,
            _ => TypeKind::Primitive,
        }
    }

    #[must_use]
    pub fn generics_of(&self, identity: &TypeIdentity) -> &[String] {
        self.decls
            .get(identity)
            .map(|decl| decl.generics.as_slice())
            .unwrap_or_default()
    }

    /// Inner type a transparent declaration serializes as
    #[must_use]
    pub fn transparent_of(&self, identity: &TypeIdentity) -> Option<&TypeExpr> {
        self.decls.get(identity)?.transparent.as_ref()
    }

    /// Whether the identity is a string-keyed map container
    #[must_use]
    pub fn is_map(&self, identity: &TypeIdentity) -> bool {
        BUILTIN_MAPS
            .iter()
            .any(|(module, name)| identity.module == *module && identity.name == *name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}
