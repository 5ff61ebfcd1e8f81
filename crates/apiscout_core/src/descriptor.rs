//! Type identities and resolved type descriptors

use std::fmt;

use crate::declaration::TypeRegistry;

/// Simple names that wrap an ordered collection or a set of items
const COLLECTION_NAMES: &[&str] = &["Vec", "VecDeque", "LinkedList", "HashSet", "BTreeSet", "[]"];

/// Handle to an underlying type: its module path plus its simple name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeIdentity {
    /// Module path (e.g. "routes::users"), empty for built-in types
    pub module: String,
    /// Unqualified type name (e.g. "User")
    pub name: String,
}

impl TypeIdentity {
    #[must_use]
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }

    /// Identity of a type that lives outside any module (primitives, type parameters)
    #[must_use]
    pub fn builtin(name: impl Into<String>) -> Self {
        Self::new(String::new(), name)
    }

    /// Parse a canonical name such as `routes::users::User`
    #[must_use]
    pub fn parse(canonical: &str) -> Self {
        match canonical.rsplit_once("::") {
            Some((module, name)) => Self::new(module, name),
            None => Self::builtin(canonical),
        }
    }

    /// Fully-qualified name, used for deterministic ordering
    #[must_use]
    pub fn canonical_name(&self) -> String {
        if self.module.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.module, self.name)
        }
    }

    #[must_use]
    pub fn simple_name(&self) -> &str {
        &self.name
    }

    /// Whether this identity is an array-like collection wrapper
    #[must_use]
    pub fn is_collection(&self) -> bool {
        COLLECTION_NAMES.contains(&self.name.as_str())
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.module.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}::{}", self.module, self.name)
        }
    }
}

/// A type as written at a declaration site, before generic substitution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A named type with its (possibly empty) type arguments
    Named {
        identity: TypeIdentity,
        args: Vec<TypeExpr>,
    },
    /// A formal generic parameter of the enclosing declaration
    Param(String),
    /// An array, ordered collection or set of `item`
    Array {
        collection: TypeIdentity,
        item: Box<TypeExpr>,
    },
}

impl TypeExpr {
    /// Named type without type arguments
    #[must_use]
    pub fn named(identity: TypeIdentity) -> Self {
        Self::Named {
            identity,
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn generic(identity: TypeIdentity, args: Vec<TypeExpr>) -> Self {
        Self::Named { identity, args }
    }

    #[must_use]
    pub fn param(name: impl Into<String>) -> Self {
        Self::Param(name.into())
    }

    /// `Vec<item>`
    #[must_use]
    pub fn vec_of(item: TypeExpr) -> Self {
        Self::Array {
            collection: TypeIdentity::builtin("Vec"),
            item: Box::new(item),
        }
    }
}

/// Structural kind of a declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive,
    Struct,
    Enum,
    /// Capability contract (trait) with no concrete fields
    Interface,
}

/// How the exploration engine treats a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Ordinary composite, schema-eligible
    Reference,
    /// Carries generic bindings; its arguments and members are explored
    Generic,
    /// Collection wrapper, only the item type is explored
    Array,
    /// Schema-eligible, members never explored
    Enum,
    Primitive,
}

/// One concrete, possibly generically-parameterized, type occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    identity: TypeIdentity,
    kind: TypeKind,
    generic_bindings: Option<Vec<(String, TypeDescriptor)>>,
    item_type: Option<Box<TypeDescriptor>>,
    reference_name: Option<String>,
}

impl TypeDescriptor {
    /// Descriptor for a bare type identity, without generic bindings
    #[must_use]
    pub fn of(identity: TypeIdentity, registry: &TypeRegistry) -> Self {
        Self::contextual(&TypeExpr::named(identity), registry, None)
    }

    /// Descriptor for a declared type, resolved against an enclosing generic context.
    ///
    /// Formal parameters bound in `context` are replaced by their bound descriptor.
    /// Unbound parameters become opaque primitives named after the parameter, and
    /// missing trailing type arguments leave their parameter unbound.
    /// Transparent declarations resolve to their inner type, once per
    /// declaration along a chain so that self-wrapping newtypes terminate.
    #[must_use]
    pub fn contextual(
        declared: &TypeExpr,
        registry: &TypeRegistry,
        context: Option<&TypeDescriptor>,
    ) -> Self {
        Self::build(declared, registry, context, &mut Vec::new())
    }

    fn build(
        declared: &TypeExpr,
        registry: &TypeRegistry,
        context: Option<&TypeDescriptor>,
        expanding: &mut Vec<TypeIdentity>,
    ) -> Self {
        match declared {
            TypeExpr::Param(name) => context
                .and_then(|ctx| ctx.binding(name))
                .cloned()
                .unwrap_or_else(|| Self::unbound(name)),
            TypeExpr::Array { collection, item } => Self {
                identity: collection.clone(),
                kind: TypeKind::Primitive,
                generic_bindings: None,
                item_type: Some(Box::new(Self::build(item, registry, context, expanding))),
                reference_name: None,
            },
            TypeExpr::Named { identity, args } => {
                let mut bindings = Vec::new();
                for (param, arg) in registry.generics_of(identity).iter().zip(args) {
                    bindings.push((param.clone(), Self::build(arg, registry, context, expanding)));
                }

                let descriptor = Self {
                    identity: identity.clone(),
                    kind: registry.kind_of(identity),
                    generic_bindings: (!bindings.is_empty()).then_some(bindings),
                    item_type: None,
                    reference_name: None,
                };
                match registry.transparent_of(identity) {
                    Some(inner) if !expanding.contains(identity) => {
                        expanding.push(identity.clone());
                        let resolved = Self::build(inner, registry, Some(&descriptor), expanding);
                        expanding.pop();
                        resolved
                    }
                    _ => descriptor,
                }
            }
        }
    }

    fn unbound(param: &str) -> Self {
        Self {
            identity: TypeIdentity::builtin(param),
            kind: TypeKind::Primitive,
            generic_bindings: None,
            item_type: None,
            reference_name: None,
        }
    }

    /// Resolve a type declared inside this descriptor's type (a field or accessor),
    /// substituting this descriptor's bindings for its generic parameters.
    #[must_use]
    pub fn resolve(&self, declared: &TypeExpr, registry: &TypeRegistry) -> TypeDescriptor {
        Self::contextual(declared, registry, Some(self))
    }

    /// Canonical deduplication key: identity plus resolved bindings (or item type)
    #[must_use]
    pub fn signature(&self) -> String {
        let mut signature = self.identity.canonical_name();
        if let Some(item) = &self.item_type {
            signature.push('<');
            signature.push_str(&item.signature());
            signature.push('>');
        } else if let Some(bindings) = &self.generic_bindings {
            let args: Vec<String> = bindings.iter().map(|(_, ty)| ty.signature()).collect();
            signature.push('<');
            signature.push_str(&args.join(","));
            signature.push('>');
        }
        signature
    }

    #[must_use]
    pub fn classification(&self) -> Classification {
        if self.item_type.is_some() {
            return Classification::Array;
        }
        match self.kind {
            TypeKind::Enum => Classification::Enum,
            TypeKind::Primitive => Classification::Primitive,
            TypeKind::Struct | TypeKind::Interface if self.is_generically_typed() => {
                Classification::Generic
            }
            TypeKind::Struct | TypeKind::Interface => Classification::Reference,
        }
    }

    /// Whether the type must be emitted as a standalone schema entry
    #[must_use]
    pub fn is_schema_eligible(&self) -> bool {
        matches!(
            self.classification(),
            Classification::Reference | Classification::Enum
        )
    }

    #[must_use]
    pub fn is_generically_typed(&self) -> bool {
        self.generic_bindings
            .as_ref()
            .is_some_and(|bindings| !bindings.is_empty())
    }

    #[must_use]
    pub fn identity(&self) -> &TypeIdentity {
        &self.identity
    }

    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    /// Bindings in the declaration order of the type's generic parameters
    #[must_use]
    pub fn generic_bindings(&self) -> Option<&[(String, TypeDescriptor)]> {
        self.generic_bindings.as_deref()
    }

    /// Concrete descriptor bound to a formal generic parameter
    #[must_use]
    pub fn binding(&self, param: &str) -> Option<&TypeDescriptor> {
        self.generic_bindings
            .as_ref()?
            .iter()
            .find(|(name, _)| name == param)
            .map(|(_, ty)| ty)
    }

    #[must_use]
    pub fn item_type(&self) -> Option<&TypeDescriptor> {
        self.item_type.as_deref()
    }

    #[must_use]
    pub fn reference_name(&self) -> Option<&str> {
        self.reference_name.as_deref()
    }

    pub fn set_reference_name(&mut self, name: impl Into<String>) {
        self.reference_name = Some(name.into());
    }
}
