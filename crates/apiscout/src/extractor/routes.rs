//! Route discovery: one tag per source file holding annotated handlers

use apiscout_core::{
    Endpoint, EndpointParameter, HttpMethod, ParameterLocation, Tag, TypeDescriptor, TypeRegistry,
};
use syn::ext::IdentExt;
use syn::{FnArg, Item, Pat, ReturnType, Type};
use tracing::{debug, trace};

use super::SourceFile;
use super::args::RouteArgs;
use super::scope::{DeclIndex, Imports, Scope, is_option, last_segment, unwrap_named};
use crate::error::{ExtractError, Result};

const ROOT_TAG: &str = "Root";
const DEFAULT_METHOD: &str = "get";
/// Handler arguments that never document as parameters
const SKIPPED_EXTRACTORS: &[&str] = &["State", "HeaderMap", "Extension"];

pub fn check_route_by_path(path: &syn::Path) -> bool {
    (path.segments.len() == 2
        && path.segments[0].ident == "apiscout"
        && path.segments[1].ident == "route")
        || (path.segments.len() == 1 && path.segments[0].ident == "route")
}

fn route_args(attr: &syn::Attribute) -> syn::Result<RouteArgs> {
    match &attr.meta {
        syn::Meta::Path(_) => Ok(RouteArgs::default()),
        syn::Meta::List(meta_list) => meta_list.parse_args(),
        // #[route = "patch"]
        syn::Meta::NameValue(meta_nv) => match &meta_nv.value {
            syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(lit_str),
                ..
            }) => Ok(RouteArgs {
                method: Some(lit_str.value().to_lowercase()),
                path: None,
            }),
            other => Err(syn::Error::new_spanned(other, "expected a method name string")),
        },
    }
}

/// Build the tag of one source file; `None` when the file has no routes
pub(crate) fn extract_tag(
    source: &SourceFile,
    index: &DeclIndex,
    registry: &TypeRegistry,
) -> Result<Option<Tag>> {
    let imports = Imports::collect(&source.ast.items, &source.module);
    let file = source.path.display().to_string();
    let mut tag = Tag::new(tag_name(&source.segments));

    for item in &source.ast.items {
        let Item::Fn(fn_item) = item else {
            continue;
        };
        let Some(attr) = fn_item
            .attrs
            .iter()
            .find(|attr| check_route_by_path(attr.path()))
        else {
            continue;
        };
        let function = fn_item.sig.ident.unraw().to_string();

        let args = route_args(attr).map_err(|e| ExtractError::InvalidRoute {
            file: file.clone(),
            function: function.clone(),
            message: e.to_string(),
        })?;
        let method = args.method.unwrap_or_else(|| DEFAULT_METHOD.to_string());
        let operation =
            HttpMethod::try_from(method.as_str()).map_err(|_| ExtractError::UnsupportedMethod {
                file: file.clone(),
                function: function.clone(),
                method,
            })?;
        let custom_path = args.path.as_ref().map(syn::LitStr::value);
        let path = route_path(&source.segments, custom_path.as_deref());

        let scope =
            Scope::new(&source.module, &imports, index).with_generics(&fn_item.sig.generics);
        let parameters = extract_parameters(&fn_item.sig, &path, &scope, registry);
        let response = extract_response(&fn_item.sig.output, &scope, registry);

        debug!(
            %operation,
            %path,
            function = %function,
            parameters = parameters.len(),
            "extracted endpoint"
        );
        tag.add_endpoint(Endpoint {
            name: function,
            operation,
            path,
            parameters,
            response,
        });
    }

    Ok((!tag.endpoints.is_empty()).then_some(tag))
}

/// PascalCase of the last module segment
pub fn tag_name(segments: &[String]) -> String {
    let Some(last) = segments.last() else {
        return ROOT_TAG.to_string();
    };
    last.split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect::<String>())
                .unwrap_or_default()
        })
        .collect()
}

/// Module segments joined with `/`, followed by the attribute's custom path
pub fn route_path(segments: &[String], custom_path: Option<&str>) -> String {
    let base = format!("/{}", segments.join("/"));
    let path = match custom_path {
        Some(custom) => format!(
            "{}/{}",
            base.trim_end_matches('/'),
            custom.trim_start_matches('/')
        ),
        None => base,
    };
    if path.len() > 1 {
        path.trim_end_matches('/').to_string()
    } else {
        path
    }
}

fn extract_parameters(
    sig: &syn::Signature,
    path: &str,
    scope: &Scope<'_>,
    registry: &TypeRegistry,
) -> Vec<EndpointParameter> {
    let mut parameters = Vec::new();
    for (position, input) in sig.inputs.iter().enumerate() {
        let FnArg::Typed(pat_type) = input else {
            continue;
        };
        let ty = pat_type.ty.as_ref();
        let name = binding_name(&pat_type.pat).unwrap_or_else(|| format!("arg{position}"));
        let extractor = last_segment(ty).map(|segment| segment.ident.to_string());

        match extractor.as_deref() {
            Some(skipped) if SKIPPED_EXTRACTORS.contains(&skipped) => {}
            Some("Path") => {
                let Some(inner) = unwrap_named(ty, "Path") else {
                    continue;
                };
                if let Type::Tuple(tuple) = inner {
                    let names = tuple_binding_names(&pat_type.pat);
                    for (i, elem) in tuple.elems.iter().enumerate() {
                        let name = names
                            .get(i)
                            .cloned()
                            .flatten()
                            .unwrap_or_else(|| format!("param{i}"));
                        parameters.extend(parameter(name, ParameterLocation::Path, elem, scope, registry));
                    }
                } else {
                    parameters.extend(parameter(name, ParameterLocation::Path, inner, scope, registry));
                }
            }
            Some(wrapper @ ("Query" | "Json" | "Form")) => {
                let location = if wrapper == "Query" {
                    ParameterLocation::Query
                } else {
                    ParameterLocation::Body
                };
                if let Some(inner) = unwrap_named(ty, wrapper) {
                    parameters.extend(parameter(name, location, inner, scope, registry));
                }
            }
            _ => {
                let location = if path.contains(&format!("{{{name}}}")) {
                    ParameterLocation::Path
                } else {
                    ParameterLocation::Query
                };
                parameters.extend(parameter(name, location, ty, scope, registry));
            }
        }
    }
    parameters
}

fn parameter(
    name: String,
    location: ParameterLocation,
    ty: &Type,
    scope: &Scope<'_>,
    registry: &TypeRegistry,
) -> Option<EndpointParameter> {
    let Some(expr) = scope.lower(ty) else {
        trace!(parameter = %name, "parameter type has no documented form");
        return None;
    };
    Some(EndpointParameter {
        name,
        location,
        required: !is_option(ty),
        descriptor: TypeDescriptor::contextual(&expr, registry, None),
    })
}

fn extract_response(
    output: &ReturnType,
    scope: &Scope<'_>,
    registry: &TypeRegistry,
) -> Option<TypeDescriptor> {
    let ReturnType::Type(_, ty) = output else {
        return None;
    };
    let expr = scope.lower(unwrap_response(ty)?)?;
    Some(TypeDescriptor::contextual(&expr, registry, None))
}

/// Peel `Result` and `Json` wrappers; a tuple response documents as its last element
fn unwrap_response(ty: &Type) -> Option<&Type> {
    match ty {
        Type::Tuple(tuple) => tuple.elems.last().and_then(unwrap_response),
        Type::ImplTrait(_) => None,
        _ => match unwrap_named(ty, "Result").or_else(|| unwrap_named(ty, "Json")) {
            Some(inner) => unwrap_response(inner),
            None => Some(ty),
        },
    }
}

fn binding_name(pat: &Pat) -> Option<String> {
    match pat {
        Pat::Ident(pat_ident) => {
            let name = pat_ident.ident.unraw().to_string();
            let trimmed = name.trim_start_matches('_');
            if trimmed.is_empty() {
                Some(name)
            } else {
                Some(trimmed.to_string())
            }
        }
        Pat::TupleStruct(pat) if pat.elems.len() == 1 => binding_name(&pat.elems[0]),
        Pat::Reference(pat) => binding_name(&pat.pat),
        Pat::Type(pat) => binding_name(&pat.pat),
        _ => None,
    }
}

/// Names bound by `Path((a, b))`
fn tuple_binding_names(pat: &Pat) -> Vec<Option<String>> {
    match pat {
        Pat::TupleStruct(pat) if pat.elems.len() == 1 => tuple_binding_names(&pat.elems[0]),
        Pat::Tuple(tuple) => tuple.elems.iter().map(binding_name).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use apiscout_core::{Classification, TypeDecl, TypeIdentity};
    use rstest::rstest;

    use super::*;

    fn source(segments: &[&str], code: &str) -> SourceFile {
        let segments: Vec<String> = segments.iter().map(|s| s.to_string()).collect();
        SourceFile {
            path: PathBuf::from(format!("src/routes/{}.rs", segments.join("/"))),
            module: segments.join("::"),
            segments,
            ast: syn::parse_file(code).unwrap(),
        }
    }

    fn index_and_registry() -> (DeclIndex, TypeRegistry) {
        let mut index = DeclIndex::default();
        let mut registry = TypeRegistry::new();
        for canonical in ["models::User", "models::NewUser", "models::Filter"] {
            let identity = TypeIdentity::parse(canonical);
            index.insert(identity.clone());
            registry.register(TypeDecl::structure(identity));
        }
        (index, registry)
    }

    fn tag_of(segments: &[&str], code: &str) -> Result<Option<Tag>> {
        let (index, registry) = index_and_registry();
        extract_tag(&source(segments, code), &index, &registry)
    }

    #[rstest]
    #[case(vec![], "Root")]
    #[case(vec!["users"], "Users")]
    #[case(vec!["admin", "user_profiles"], "UserProfiles")]
    #[case(vec!["health-check"], "HealthCheck")]
    fn test_tag_name(#[case] segments: Vec<&str>, #[case] expected: &str) {
        let segments: Vec<String> = segments.into_iter().map(str::to_string).collect();
        assert_eq!(tag_name(&segments), expected);
    }

    #[rstest]
    #[case(vec![], None, "/")]
    #[case(vec![], Some("/health"), "/health")]
    #[case(vec!["users"], None, "/users")]
    #[case(vec!["users"], Some("/{id}"), "/users/{id}")]
    #[case(vec!["users"], Some("{id}/posts"), "/users/{id}/posts")]
    #[case(vec!["users"], Some("/"), "/users")]
    #[case(vec!["api", "v1"], Some("/items/"), "/api/v1/items")]
    fn test_route_path(
        #[case] segments: Vec<&str>,
        #[case] custom: Option<&str>,
        #[case] expected: &str,
    ) {
        let segments: Vec<String> = segments.into_iter().map(str::to_string).collect();
        assert_eq!(route_path(&segments, custom), expected);
    }

    #[rstest]
    #[case("route", true)]
    #[case("apiscout::route", true)]
    #[case("other::route", false)]
    #[case("routes", false)]
    #[case("apiscout::route::extra", false)]
    fn test_check_route_by_path(#[case] path: &str, #[case] expected: bool) {
        let path: syn::Path = syn::parse_str(path).unwrap();
        assert_eq!(check_route_by_path(&path), expected);
    }

    #[test]
    fn extracts_endpoints_in_declaration_order() {
        let tag = tag_of(
            &["users"],
            r#"
            use crate::models::{Filter, NewUser, User};

            #[route(get)]
            pub async fn list_users(Query(filter): Query<Option<Filter>>) -> Json<Vec<User>> { todo!() }

            #[route(get, path = "/{id}")]
            pub async fn get_user(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<User>, AppError> { todo!() }

            #[apiscout::route(post)]
            pub async fn create_user(headers: HeaderMap, Json(body): Json<NewUser>) -> (StatusCode, Json<User>) { todo!() }

            #[route(delete, path = "/{id}")]
            pub async fn delete_user(id: i64, force: Option<bool>) {}

            pub fn helper() -> User { todo!() }
            "#,
        )
        .unwrap()
        .unwrap();

        assert_eq!(tag.name, "Users");
        let names: Vec<&str> = tag.endpoints.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["list_users", "get_user", "create_user", "delete_user"]);

        let list = &tag.endpoints[0];
        assert_eq!(list.operation, HttpMethod::Get);
        assert_eq!(list.path, "/users");
        assert_eq!(list.parameters[0].name, "filter");
        assert_eq!(list.parameters[0].location, ParameterLocation::Query);
        assert!(!list.parameters[0].required);
        let response = list.response.as_ref().unwrap();
        assert_eq!(response.classification(), Classification::Array);
        assert_eq!(response.signature(), "Vec<models::User>");

        let get = &tag.endpoints[1];
        assert_eq!(get.path, "/users/{id}");
        assert_eq!(get.parameters.len(), 1);
        assert_eq!(get.parameters[0].location, ParameterLocation::Path);
        assert_eq!(get.response.as_ref().unwrap().signature(), "models::User");

        let create = &tag.endpoints[2];
        assert_eq!(create.operation, HttpMethod::Post);
        assert_eq!(create.parameters.len(), 1);
        assert_eq!(create.parameters[0].location, ParameterLocation::Body);
        assert_eq!(create.parameters[0].descriptor.signature(), "models::NewUser");
        assert_eq!(create.response.as_ref().unwrap().signature(), "models::User");

        let delete = &tag.endpoints[3];
        assert_eq!(delete.operation, HttpMethod::Delete);
        assert!(delete.response.is_none());
        assert_eq!(delete.parameters[0].location, ParameterLocation::Path);
        assert!(delete.parameters[0].required);
        assert_eq!(delete.parameters[1].location, ParameterLocation::Query);
        assert!(!delete.parameters[1].required);
    }

    #[test]
    fn tuple_path_parameters_are_split() {
        let tag = tag_of(
            &["posts"],
            r#"
            #[route(get, path = "/{user_id}/{post_id}")]
            pub async fn get_post(Path((user_id, post_id)): Path<(i64, String)>) -> String { todo!() }
            "#,
        )
        .unwrap()
        .unwrap();

        let params = &tag.endpoints[0].parameters;
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["user_id", "post_id"]);
        assert!(params.iter().all(|p| p.location == ParameterLocation::Path));
    }

    #[rstest]
    #[case("#[route]", HttpMethod::Get)]
    #[case("#[route = \"patch\"]", HttpMethod::Patch)]
    #[case("#[route(TRACE)]", HttpMethod::Trace)]
    #[case("#[route(path = \"/x\")]", HttpMethod::Get)]
    fn attribute_forms(#[case] attr: &str, #[case] expected: HttpMethod) {
        let tag = tag_of(&["misc"], &format!("{attr} pub fn handler() {{}}"))
            .unwrap()
            .unwrap();
        assert_eq!(tag.endpoints[0].operation, expected);
    }

    #[test]
    fn unsupported_method_aborts_with_context() {
        let err = tag_of(&["users"], "#[route(connect)] pub fn tunnel() {}").unwrap_err();
        match err {
            ExtractError::UnsupportedMethod {
                file,
                function,
                method,
            } => {
                assert_eq!(file, "src/routes/users.rs");
                assert_eq!(function, "tunnel");
                assert_eq!(method, "connect");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_attribute_is_invalid_route() {
        let err = tag_of(&["users"], "#[route(get, 42)] pub fn broken() {}").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidRoute { ref function, .. } if function == "broken"));
    }

    #[test]
    fn file_without_routes_has_no_tag() {
        let tag = tag_of(&["models"], "pub struct User { pub id: i64 }").unwrap();
        assert!(tag.is_none());
    }
}
