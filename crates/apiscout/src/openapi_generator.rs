//! OpenAPI document generation from tags and named schemas

use std::collections::BTreeMap;

use apiscout_core::data_type::default_media_type;
use apiscout_core::openapi::{
    Info, MediaType, OpenApi, OpenApiVersion, Operation, Parameter, ParameterIn, PathItem,
    RequestBody, Response, Server, Tag as DocTag,
};
use apiscout_core::schema::{Components, Reference, Schema, SchemaRef, SchemaType};
use apiscout_core::{Endpoint, OpenApiDataType, ParameterLocation, Tag, TypeDescriptor, TypeRegistry};
use tracing::warn;

use crate::config::GeneratorConfig;
use crate::members::documented_members;
use crate::naming::NamedSchemas;

/// Build the document: one tag per [`Tag`], one operation per endpoint, one component per named schema
pub fn generate_document(
    config: &GeneratorConfig,
    registry: &TypeRegistry,
    tags: &[Tag],
    named: &NamedSchemas,
) -> OpenApi {
    let writer = SchemaWriter { registry, named };

    let mut paths: BTreeMap<String, PathItem> = BTreeMap::new();
    for tag in tags {
        for endpoint in &tag.endpoints {
            let operation = writer.operation(tag, endpoint);
            let path_item = paths.entry(endpoint.path.clone()).or_default();
            if path_item.set_operation(endpoint.operation, operation).is_some() {
                warn!(
                    path = %endpoint.path,
                    method = %endpoint.operation,
                    handler = %endpoint.name,
                    "duplicate route replaces an earlier handler"
                );
            }
        }
    }

    let components = (!named.is_empty()).then(|| Components {
        schemas: Some(
            named
                .iter()
                .map(|(name, descriptor)| (name.to_string(), writer.component(descriptor)))
                .collect(),
        ),
    });

    OpenApi {
        openapi: OpenApiVersion::V3_0_3,
        info: Info {
            title: config.title.clone(),
            version: config.version.clone(),
            description: config.description.clone(),
        },
        servers: config
            .servers
            .iter()
            .map(|url| Server { url: url.clone() })
            .collect(),
        tags: tags
            .iter()
            .map(|tag| DocTag {
                name: tag.name.clone(),
            })
            .collect(),
        paths,
        components,
    }
}

/// Pretty-printed JSON of a document
pub fn to_json(document: &OpenApi) -> serde_json::Result<String> {
    serde_json::to_string_pretty(document)
}

struct SchemaWriter<'a> {
    registry: &'a TypeRegistry,
    named: &'a NamedSchemas,
}

impl SchemaWriter<'_> {
    fn operation(&self, tag: &Tag, endpoint: &Endpoint) -> Operation {
        let mut parameters = Vec::new();
        let mut request_body = None;
        for parameter in &endpoint.parameters {
            let location = match parameter.location {
                ParameterLocation::Path => ParameterIn::Path,
                ParameterLocation::Query => ParameterIn::Query,
                ParameterLocation::Body => {
                    request_body = Some(RequestBody {
                        required: parameter.required,
                        content: self.content(&parameter.descriptor),
                    });
                    continue;
                }
            };
            parameters.push(Parameter {
                name: parameter.name.clone(),
                location,
                // path parameters are always required
                required: parameter.required || location == ParameterIn::Path,
                schema: self.schema_ref(&parameter.descriptor),
            });
        }

        let mut responses = BTreeMap::new();
        match &endpoint.response {
            Some(response) => responses.insert(
                "200".to_string(),
                Response {
                    description: "Successful response".to_string(),
                    content: Some(self.content(response)),
                },
            ),
            None => responses.insert(
                "204".to_string(),
                Response {
                    description: "No content".to_string(),
                    content: None,
                },
            ),
        };

        Operation {
            operation_id: endpoint.name.clone(),
            tags: vec![tag.name.clone()],
            parameters,
            request_body,
            responses,
        }
    }

    fn content(&self, descriptor: &TypeDescriptor) -> BTreeMap<String, MediaType> {
        BTreeMap::from([(
            default_media_type(descriptor, self.registry).to_string(),
            MediaType {
                schema: self.schema_ref(descriptor),
            },
        )])
    }

    /// Component entry of a named schema
    fn component(&self, descriptor: &TypeDescriptor) -> Schema {
        if descriptor.is_enum() {
            let variants = self
                .registry
                .get(descriptor.identity())
                .map(|decl| decl.variants.clone())
                .unwrap_or_default();
            return Schema::string_enum(variants);
        }
        self.object_schema(descriptor, &mut vec![descriptor.signature()])
    }

    fn schema_ref(&self, descriptor: &TypeDescriptor) -> SchemaRef {
        self.inline(descriptor, &mut Vec::new())
    }

    /// `$ref` for named schemas, inline shape otherwise; `stack` holds the
    /// generic instantiations being inlined, so a recursive one ends as a bare object
    fn inline(&self, descriptor: &TypeDescriptor, stack: &mut Vec<String>) -> SchemaRef {
        if let Some(item) = descriptor.item_type() {
            return SchemaRef::inline(Schema::array(self.inline(item, stack)));
        }
        if descriptor.is_schema_eligible()
            && let Some(name) = self.named.reference_name(descriptor.identity())
        {
            return SchemaRef::Ref(Reference::schema(name));
        }
        if descriptor.is_generically_typed() {
            if self.registry.is_map(descriptor.identity()) {
                let values = match descriptor.binding("V") {
                    Some(value) => self.inline(value, stack),
                    None => SchemaRef::inline(Schema::new(SchemaType::Object)),
                };
                return SchemaRef::inline(Schema::map(values));
            }

            let signature = descriptor.signature();
            if stack.contains(&signature) {
                return SchemaRef::inline(Schema::new(SchemaType::Object));
            }
            stack.push(signature);
            let schema = self.object_schema(descriptor, stack);
            stack.pop();
            return SchemaRef::inline(schema);
        }

        let data_type = OpenApiDataType::of_descriptor(descriptor, self.registry);
        SchemaRef::inline(Schema::typed(data_type.value(), data_type.format()))
    }

    fn object_schema(&self, descriptor: &TypeDescriptor, stack: &mut Vec<String>) -> Schema {
        let mut properties = BTreeMap::new();
        let mut required = Vec::new();
        for member in documented_members(descriptor, self.registry) {
            if properties.contains_key(&member.name) {
                continue;
            }
            if !member.optional {
                required.push(member.name.clone());
            }
            let schema = self.inline(&member.descriptor, stack);
            properties.insert(member.name, schema);
        }
        Schema::object(properties, required)
    }
}
