//! Short, collision-free reference names for explored schemas

use std::collections::{BTreeMap, HashMap};

use apiscout_core::{Classification, TypeDescriptor, TypeIdentity};
use tracing::debug;

/// Assigns reference names over one exploration result
pub struct ReferenceNameResolver {
    schemas: Vec<TypeDescriptor>,
}

impl ReferenceNameResolver {
    #[must_use]
    pub fn new(schemas: Vec<TypeDescriptor>) -> Self {
        Self { schemas }
    }

    /// Name every schema after its simple type name.
    ///
    /// Schemas are processed in ascending canonical-name order; a name already
    /// taken gets the first free `_1`, `_2`, ... suffix.
    #[must_use]
    pub fn resolve_names(self) -> NamedSchemas {
        let mut schemas: Vec<TypeDescriptor> = self
            .schemas
            .into_iter()
            .filter(|descriptor| {
                matches!(
                    descriptor.classification(),
                    Classification::Reference | Classification::Generic | Classification::Enum
                )
            })
            .collect();
        schemas.sort_by_cached_key(|descriptor| descriptor.identity().canonical_name());

        let mut by_name = BTreeMap::new();
        let mut by_identity = HashMap::new();
        for (position, descriptor) in schemas.iter_mut().enumerate() {
            let simple = descriptor.identity().simple_name().to_string();
            let mut candidate = simple.clone();
            let mut suffix = 0;
            while by_name.contains_key(&candidate) {
                suffix += 1;
                candidate = format!("{simple}_{suffix}");
            }
            if suffix > 0 {
                debug!(identity = %descriptor.identity(), name = %candidate, "suffixed reference name");
            }

            descriptor.set_reference_name(candidate.clone());
            by_name.insert(candidate, position);
            by_identity.insert(descriptor.identity().clone(), position);
        }

        NamedSchemas {
            schemas,
            by_name,
            by_identity,
        }
    }
}

/// Named schema set with its name and identity lookups
#[derive(Debug, Clone, Default)]
pub struct NamedSchemas {
    /// Sorted by canonical name
    schemas: Vec<TypeDescriptor>,
    by_name: BTreeMap<String, usize>,
    by_identity: HashMap<TypeIdentity, usize>,
}

impl NamedSchemas {
    /// Named descriptor of a type identity
    #[must_use]
    pub fn lookup(&self, identity: &TypeIdentity) -> Option<&TypeDescriptor> {
        self.by_identity.get(identity).map(|&i| &self.schemas[i])
    }

    #[must_use]
    pub fn reference_name(&self, identity: &TypeIdentity) -> Option<&str> {
        self.lookup(identity)?.reference_name()
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&TypeDescriptor> {
        self.by_name.get(name).map(|&i| &self.schemas[i])
    }

    /// `(reference name, descriptor)` pairs in canonical-name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeDescriptor)> {
        self.schemas
            .iter()
            .filter_map(|descriptor| Some((descriptor.reference_name()?, descriptor)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use apiscout_core::{TypeDecl, TypeExpr, TypeRegistry};
    use rstest::rstest;

    use super::*;

    fn registry(canonicals: &[&str]) -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        for canonical in canonicals {
            registry.register(TypeDecl::structure(TypeIdentity::parse(canonical)));
        }
        registry
    }

    fn resolve(canonicals: &[&str], discovery_order: &[&str]) -> NamedSchemas {
        let registry = registry(canonicals);
        let schemas = discovery_order
            .iter()
            .map(|c| TypeDescriptor::of(TypeIdentity::parse(c), &registry))
            .collect();
        ReferenceNameResolver::new(schemas).resolve_names()
    }

    #[rstest]
    #[case(vec!["b::Status", "a::Status", "c::Status"])]
    #[case(vec!["c::Status", "b::Status", "a::Status"])]
    #[case(vec!["a::Status", "b::Status", "c::Status"])]
    fn collisions_are_suffixed_in_canonical_order(#[case] discovery: Vec<&str>) {
        let all = ["a::Status", "b::Status", "c::Status"];
        let named = resolve(&all, &discovery);

        let name_of = |c: &str| named.reference_name(&TypeIdentity::parse(c)).map(str::to_string);
        assert_eq!(name_of("a::Status").as_deref(), Some("Status"));
        assert_eq!(name_of("b::Status").as_deref(), Some("Status_1"));
        assert_eq!(name_of("c::Status").as_deref(), Some("Status_2"));
    }

    #[test]
    fn existing_suffixed_name_is_skipped() {
        let named = resolve(
            &["a::Status", "b::Status_1", "c::Status"],
            &["c::Status", "b::Status_1", "a::Status"],
        );

        let names: Vec<&str> = named.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["Status", "Status_1", "Status_2"]);
        assert_eq!(
            named.by_name("Status_2").map(|d| d.identity().canonical_name()),
            Some("c::Status".to_string())
        );
    }

    #[test]
    fn distinct_names_are_verbatim() {
        let named = resolve(&["m::User", "m::Order"], &["m::User", "m::Order"]);

        let names: Vec<&str> = named.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["Order", "User"]);
        assert_eq!(named.len(), 2);
        assert!(named.lookup(&TypeIdentity::parse("m::Missing")).is_none());
    }

    #[test]
    fn arrays_and_primitives_are_never_named() {
        let registry = registry(&["m::User"]);
        let schemas = vec![
            TypeDescriptor::of(TypeIdentity::builtin("i32"), &registry),
            TypeDescriptor::contextual(
                &TypeExpr::vec_of(TypeExpr::named(TypeIdentity::parse("m::User"))),
                &registry,
                None,
            ),
            TypeDescriptor::of(TypeIdentity::parse("m::User"), &registry),
        ];

        let named = ReferenceNameResolver::new(schemas).resolve_names();
        assert_eq!(named.len(), 1);
        assert_eq!(named.reference_name(&TypeIdentity::parse("m::User")), Some("User"));
    }

    #[test]
    fn names_are_reproducible() {
        let discovery = ["x::Item", "y::Item", "z::Other"];
        let first: Vec<(String, String)> = resolve(&discovery, &discovery)
            .iter()
            .map(|(name, d)| (name.to_string(), d.identity().canonical_name()))
            .collect();
        let second: Vec<(String, String)> = resolve(&discovery, &["z::Other", "y::Item", "x::Item"])
            .iter()
            .map(|(name, d)| (name.to_string(), d.identity().canonical_name()))
            .collect();
        assert_eq!(first, second);
    }
}
