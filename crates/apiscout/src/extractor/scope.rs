//! Name resolution and lowering of `syn` types into declared type expressions

use std::collections::HashMap;

use apiscout_core::{TypeExpr, TypeIdentity};
use syn::punctuated::Punctuated;
use syn::{GenericArgument, Item, PathArguments, Type, TypeParamBound, UseTree};

/// Wrappers that document as their single type argument
const TRANSPARENT_WRAPPERS: &[&str] = &["Option", "Box", "Rc", "Arc", "Cow"];
/// Wrappers that document as an array of their item type
const COLLECTION_WRAPPERS: &[&str] = &["Vec", "VecDeque", "LinkedList", "HashSet", "BTreeSet"];
const MAP_CONTAINERS: &[&str] = &["HashMap", "BTreeMap"];
const MAP_MODULE: &str = "std::collections";
const SLICE: &str = "[]";

/// Every declared type of the source tree, by simple name
#[derive(Debug, Default)]
pub(crate) struct DeclIndex {
    by_name: HashMap<String, Vec<TypeIdentity>>,
}

impl DeclIndex {
    pub fn insert(&mut self, identity: TypeIdentity) {
        self.by_name
            .entry(identity.name.clone())
            .or_default()
            .push(identity);
    }

    pub fn contains(&self, identity: &TypeIdentity) -> bool {
        self.by_name
            .get(&identity.name)
            .is_some_and(|ids| ids.contains(identity))
    }

    /// Declaration with this simple name whose module shares the longest
    /// prefix with `module`; ties go to the smallest canonical name
    pub fn nearest(&self, name: &str, module: &str) -> Option<&TypeIdentity> {
        let module = split_module(module);
        self.by_name.get(name)?.iter().min_by_key(|identity| {
            let shared = split_module(&identity.module)
                .iter()
                .zip(&module)
                .take_while(|(a, b)| a == b)
                .count();
            (std::cmp::Reverse(shared), identity.canonical_name())
        })
    }
}

/// `use` declarations of one module, as absolute paths
#[derive(Debug, Default)]
pub(crate) struct Imports {
    named: HashMap<String, Vec<String>>,
    globs: Vec<Vec<String>>,
}

impl Imports {
    pub fn collect(items: &[Item], module: &str) -> Self {
        let mut imports = Self::default();
        for item in items {
            if let Item::Use(item_use) = item {
                imports.add_tree(&item_use.tree, Vec::new(), module);
            }
        }
        imports
    }

    fn add_tree(&mut self, tree: &UseTree, mut prefix: Vec<String>, module: &str) {
        match tree {
            UseTree::Path(use_path) => {
                prefix.push(use_path.ident.to_string());
                self.add_tree(&use_path.tree, prefix, module);
            }
            UseTree::Name(use_name) => {
                let name = use_name.ident.to_string();
                if name == "self" {
                    if let Some(last) = prefix.last().cloned() {
                        self.named.insert(last, absolute(&prefix, module));
                    }
                } else {
                    prefix.push(name.clone());
                    self.named.insert(name, absolute(&prefix, module));
                }
            }
            UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                self.named
                    .insert(rename.rename.to_string(), absolute(&prefix, module));
            }
            UseTree::Glob(_) => self.globs.push(absolute(&prefix, module)),
            UseTree::Group(group) => {
                for item in &group.items {
                    self.add_tree(item, prefix.clone(), module);
                }
            }
        }
    }
}

/// Module path segments
pub(crate) fn split_module(module: &str) -> Vec<String> {
    module
        .split("::")
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve `crate::`, `self::` and `super::` against the current module
fn absolute(path: &[String], module: &str) -> Vec<String> {
    let Some((first, rest)) = path.split_first() else {
        return Vec::new();
    };
    let mut resolved = match first.as_str() {
        "crate" => Vec::new(),
        "self" => split_module(module),
        "super" => {
            let mut parent = split_module(module);
            let supers = path.iter().take_while(|s| *s == "super").count();
            parent.truncate(parent.len().saturating_sub(supers));
            parent.extend(path[supers..].iter().cloned());
            return parent;
        }
        _ => return path.to_vec(),
    };
    resolved.extend(rest.iter().cloned());
    resolved
}

/// Resolution context of one declaration site
pub(crate) struct Scope<'a> {
    module: &'a str,
    imports: &'a Imports,
    index: &'a DeclIndex,
    generics: Vec<String>,
    self_type: Option<TypeIdentity>,
}

impl<'a> Scope<'a> {
    pub fn new(module: &'a str, imports: &'a Imports, index: &'a DeclIndex) -> Self {
        Self {
            module,
            imports,
            index,
            generics: Vec::new(),
            self_type: None,
        }
    }

    #[must_use]
    pub fn with_generics(mut self, generics: &syn::Generics) -> Self {
        self.generics.extend(generic_names(generics));
        self
    }

    #[must_use]
    pub fn with_self_type(mut self, identity: TypeIdentity) -> Self {
        self.self_type = Some(identity);
        self
    }

    pub fn module(&self) -> &str {
        self.module
    }

    pub fn index(&self) -> &DeclIndex {
        self.index
    }

    /// Lower a written type; `None` for shapes with no documented form (tuples, fn pointers, ...)
    pub fn lower(&self, ty: &Type) -> Option<TypeExpr> {
        match ty {
            Type::Reference(reference) => self.lower(&reference.elem),
            Type::Paren(paren) => self.lower(&paren.elem),
            Type::Group(group) => self.lower(&group.elem),
            Type::Slice(slice) => Some(array_of(SLICE, self.lower(&slice.elem)?)),
            Type::Array(array) => Some(array_of(SLICE, self.lower(&array.elem)?)),
            Type::TraitObject(object) => self.lower_bounds(&object.bounds),
            Type::ImplTrait(bounds) => self.lower_bounds(&bounds.bounds),
            Type::Path(type_path) if type_path.qself.is_none() => self.lower_path(&type_path.path),
            _ => None,
        }
    }

    fn lower_bounds<P>(&self, bounds: &Punctuated<TypeParamBound, P>) -> Option<TypeExpr> {
        bounds.iter().find_map(|bound| match bound {
            TypeParamBound::Trait(trait_bound) => self.lower_path(&trait_bound.path),
            _ => None,
        })
    }

    pub fn lower_path(&self, path: &syn::Path) -> Option<TypeExpr> {
        let last = path.segments.last()?;
        let name = last.ident.to_string();
        let args = type_arguments(&last.arguments);

        if TRANSPARENT_WRAPPERS.contains(&name.as_str())
            && let Some(inner) = args.first()
        {
            return self.lower(inner);
        }
        if COLLECTION_WRAPPERS.contains(&name.as_str())
            && let Some(item) = args.first()
        {
            return Some(array_of(&name, self.lower(item)?));
        }

        let identity = match self.resolve_path(path) {
            Resolved::Param(param) => return Some(TypeExpr::Param(param)),
            Resolved::Type(identity) => identity,
        };
        // Stop at the first argument without a documented form; the rest stay unbound
        let args = args.iter().map_while(|arg| self.lower(arg)).collect();
        Some(TypeExpr::generic(identity, args))
    }

    fn resolve_path(&self, path: &syn::Path) -> Resolved {
        let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
        if let [name] = segments.as_slice()
            && path.leading_colon.is_none()
        {
            return self.resolve_name(name);
        }

        if path.leading_colon.is_some() {
            return Resolved::Type(TypeIdentity::parse(&segments.join("::")));
        }

        // A leading imported name expands to its import path
        let imported = segments.split_first().and_then(|(first, rest)| {
            let target = self.imports.named.get(first)?;
            Some(target.iter().chain(rest).cloned().collect::<Vec<_>>())
        });
        if let Some(imported) = imported {
            return Resolved::Type(TypeIdentity::parse(&imported.join("::")));
        }

        // Paths without `crate`, `self` or `super` are relative to the current module first
        let relative = segments
            .first()
            .is_some_and(|first| !matches!(first.as_str(), "crate" | "self" | "super"));
        if relative {
            let mut child = split_module(self.module);
            child.extend(segments.iter().cloned());
            let identity = TypeIdentity::parse(&child.join("::"));
            if self.index.contains(&identity) {
                return Resolved::Type(identity);
            }
        }
        Resolved::Type(TypeIdentity::parse(&absolute(&segments, self.module).join("::")))
    }

    fn resolve_name(&self, name: &str) -> Resolved {
        if self.generics.iter().any(|param| param == name) {
            return Resolved::Param(name.to_string());
        }
        if name == "Self"
            && let Some(identity) = &self.self_type
        {
            return Resolved::Type(identity.clone());
        }
        if let Some(target) = self.imports.named.get(name) {
            return Resolved::Type(TypeIdentity::parse(&target.join("::")));
        }

        let local = TypeIdentity::new(self.module, name);
        if self.index.contains(&local) {
            return Resolved::Type(local);
        }
        let from_glob = self.imports.globs.iter().find_map(|glob| {
            let candidate = TypeIdentity::new(glob.join("::"), name);
            self.index.contains(&candidate).then_some(candidate)
        });
        if let Some(identity) = from_glob {
            return Resolved::Type(identity);
        }
        if let Some(identity) = self.index.nearest(name, self.module) {
            return Resolved::Type(identity.clone());
        }
        if MAP_CONTAINERS.contains(&name) {
            return Resolved::Type(TypeIdentity::new(MAP_MODULE, name));
        }
        Resolved::Type(TypeIdentity::builtin(name))
    }
}

enum Resolved {
    Param(String),
    Type(TypeIdentity),
}

fn array_of(collection: &str, item: TypeExpr) -> TypeExpr {
    TypeExpr::Array {
        collection: TypeIdentity::builtin(collection),
        item: Box::new(item),
    }
}

pub(crate) fn generic_names(generics: &syn::Generics) -> Vec<String> {
    generics
        .type_params()
        .map(|param| param.ident.to_string())
        .collect()
}

/// Type arguments of a path segment, lifetimes and constants left out
pub(crate) fn type_arguments(arguments: &PathArguments) -> Vec<&Type> {
    match arguments {
        PathArguments::AngleBracketed(angle) => angle
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Last path segment of a type, looking through references
pub(crate) fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Reference(reference) => last_segment(&reference.elem),
        Type::Paren(paren) => last_segment(&paren.elem),
        Type::Group(group) => last_segment(&group.elem),
        Type::Path(type_path) => type_path.path.segments.last(),
        _ => None,
    }
}

/// First type argument of `ty` if its last segment is named `wrapper`
pub(crate) fn unwrap_named<'t>(ty: &'t Type, wrapper: &str) -> Option<&'t Type> {
    let segment = last_segment(ty)?;
    if segment.ident != wrapper {
        return None;
    }
    type_arguments(&segment.arguments).first().copied()
}

pub(crate) fn is_option(ty: &Type) -> bool {
    last_segment(ty).is_some_and(|segment| segment.ident == "Option")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn index() -> DeclIndex {
        let mut index = DeclIndex::default();
        for canonical in [
            "models::User",
            "models::Page",
            "users::Status",
            "orders::Status",
            "orders::Order",
        ] {
            index.insert(TypeIdentity::parse(canonical));
        }
        index
    }

    fn imports(source: &str, module: &str) -> Imports {
        let file = syn::parse_file(source).unwrap();
        Imports::collect(&file.items, module)
    }

    fn lower(scope: &Scope<'_>, ty: &str) -> Option<TypeExpr> {
        scope.lower(&syn::parse_str::<Type>(ty).unwrap())
    }

    fn named(canonical: &str) -> TypeExpr {
        TypeExpr::named(TypeIdentity::parse(canonical))
    }

    #[rstest]
    #[case("use crate::models::User;", "routes::users", "User", "models::User")]
    #[case("use super::models::User;", "routes::users", "User", "routes::models::User")]
    #[case("use self::inner::Thing;", "routes", "Thing", "routes::inner::Thing")]
    #[case("use crate::models::{User as Account};", "users", "Account", "models::User")]
    #[case("use std::collections::HashMap;", "users", "HashMap", "std::collections::HashMap")]
    #[case("use crate::models::{self};", "users", "models", "models")]
    fn imports_resolve_to_absolute_paths(
        #[case] source: &str,
        #[case] module: &str,
        #[case] alias: &str,
        #[case] expected: &str,
    ) {
        let imports = imports(source, module);
        assert_eq!(imports.named.get(alias).map(|p| p.join("::")).as_deref(), Some(expected));
    }

    #[test]
    fn single_names_follow_resolution_order() {
        let index = index();
        let imports = imports("use crate::orders::Status;", "users");
        let generics: syn::Generics = syn::parse_str("<T>").unwrap();
        let scope = Scope::new("users", &imports, &index).with_generics(&generics);

        assert_eq!(lower(&scope, "T"), Some(TypeExpr::param("T")));
        // import wins over the same-module declaration
        assert_eq!(lower(&scope, "Status"), Some(named("orders::Status")));
        // nearest declaration with that simple name
        assert_eq!(lower(&scope, "User"), Some(named("models::User")));
        // unknown names stay external
        assert_eq!(lower(&scope, "Uuid"), Some(named("Uuid")));
    }

    #[test]
    fn glob_imports_are_searched_before_unique_names() {
        let index = index();
        let imports = imports("use crate::users::*;", "admin");
        let scope = Scope::new("admin", &imports, &index);

        assert_eq!(lower(&scope, "Status"), Some(named("users::Status")));
    }

    #[test]
    fn module_relative_paths_reach_child_modules() {
        let mut index = index();
        index.insert(TypeIdentity::parse("routes::models::User"));
        index.insert(TypeIdentity::parse("routes::api::dto::Profile"));
        let imports = Imports::default();
        let scope = Scope::new("routes", &imports, &index);

        assert_eq!(lower(&scope, "models::User"), Some(named("routes::models::User")));
        assert_eq!(
            lower(&scope, "api::dto::Profile"),
            Some(named("routes::api::dto::Profile"))
        );
        // no such child module: the path is taken as written
        assert_eq!(lower(&scope, "orders::Order"), Some(named("orders::Order")));
        assert_eq!(lower(&scope, "chrono::Utc"), Some(named("chrono::Utc")));
    }

    #[rstest]
    #[case("users::profile", "users::Status")]
    #[case("orders::admin", "orders::Status")]
    #[case("billing", "orders::Status")]
    fn shared_simple_names_pick_the_nearest_module(#[case] module: &str, #[case] expected: &str) {
        let index = index();
        let imports = Imports::default();
        let scope = Scope::new(module, &imports, &index);

        assert_eq!(lower(&scope, "Status"), Some(named(expected)));
    }

    #[rstest]
    #[case("Option<User>", named("models::User"))]
    #[case("Box<User>", named("models::User"))]
    #[case("&'a User", named("models::User"))]
    #[case("Arc<Option<User>>", named("models::User"))]
    #[case("Vec<User>", TypeExpr::vec_of(named("models::User")))]
    #[case("&[User]", array_of("[]", named("models::User")))]
    #[case("HashSet<String>", array_of("HashSet", named("String")))]
    #[case(
        "HashMap<String, User>",
        TypeExpr::generic(
            TypeIdentity::new("std::collections", "HashMap"),
            vec![named("String"), named("models::User")],
        )
    )]
    #[case(
        "crate::models::Page<User>",
        TypeExpr::generic(TypeIdentity::parse("models::Page"), vec![named("models::User")])
    )]
    #[case("chrono::DateTime<chrono::Utc>", TypeExpr::generic(TypeIdentity::parse("chrono::DateTime"), vec![named("chrono::Utc")]))]
    fn lower_wrappers_and_paths(#[case] ty: &str, #[case] expected: TypeExpr) {
        let index = index();
        let imports = Imports::default();
        let scope = Scope::new("routes", &imports, &index);
        assert_eq!(lower(&scope, ty), Some(expected));
    }

    #[rstest]
    #[case("(i32, String)")]
    #[case("fn(i32) -> i32")]
    #[case("Vec<(i32, i32)>")]
    fn undocumentable_shapes(#[case] ty: &str) {
        let index = index();
        let imports = Imports::default();
        let scope = Scope::new("routes", &imports, &index);
        assert_eq!(lower(&scope, ty), None);
    }

    #[test]
    fn generic_arguments_stop_at_first_undocumentable() {
        let index = index();
        let imports = Imports::default();
        let scope = Scope::new("models", &imports, &index);

        assert_eq!(
            lower(&scope, "Page<(i32, i32), User>"),
            Some(TypeExpr::generic(TypeIdentity::parse("models::Page"), Vec::new()))
        );
    }

    #[rstest]
    #[case("Option<String>", true)]
    #[case("&Option<String>", true)]
    #[case("std::option::Option<u8>", true)]
    #[case("String", false)]
    #[case("Vec<Option<String>>", false)]
    fn option_detection(#[case] ty: &str, #[case] expected: bool) {
        assert_eq!(is_option(&syn::parse_str::<Type>(ty).unwrap()), expected);
    }
}
