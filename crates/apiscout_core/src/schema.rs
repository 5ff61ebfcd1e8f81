//! Schema section of the generated document

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

const COMPONENT_SCHEMA_PREFIX: &str = "#/components/schemas/";

/// Schema reference or inline schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaRef {
    Ref(Reference),
    Inline(Box<Schema>),
}

impl SchemaRef {
    #[must_use]
    pub fn inline(schema: Schema) -> Self {
        Self::Inline(Box::new(schema))
    }
}

/// `$ref` object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "$ref")]
    pub ref_path: String,
}

impl Reference {
    /// Reference to a named component schema
    #[must_use]
    pub fn schema(name: &str) -> Self {
        Self {
            ref_path: format!("{COMPONENT_SCHEMA_PREFIX}{name}"),
        }
    }
}

/// JSON Schema type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

impl SchemaType {
    /// Parse an OpenAPI `type` keyword
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "string" => Self::String,
            "number" => Self::Number,
            "integer" => Self::Integer,
            "boolean" => Self::Boolean,
            "array" => Self::Array,
            _ => Self::Object,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, SchemaRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<SchemaRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#enum: Option<Vec<String>>,
}

impl Schema {
    #[must_use]
    pub fn new(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    /// Schema with a type keyword and optional format
    #[must_use]
    pub fn typed(keyword: &str, format: Option<&str>) -> Self {
        Self {
            format: format.map(str::to_string),
            ..Self::new(SchemaType::from_keyword(keyword))
        }
    }

    #[must_use]
    pub fn array(items: SchemaRef) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::new(SchemaType::Array)
        }
    }

    /// String-keyed map whose values follow `values`
    #[must_use]
    pub fn map(values: SchemaRef) -> Self {
        Self {
            additional_properties: Some(Box::new(values)),
            ..Self::new(SchemaType::Object)
        }
    }

    #[must_use]
    pub fn string_enum(values: Vec<String>) -> Self {
        Self {
            r#enum: Some(values),
            ..Self::new(SchemaType::String)
        }
    }

    /// Object schema; empty property and required lists are omitted
    #[must_use]
    pub fn object(properties: BTreeMap<String, SchemaRef>, required: Vec<String>) -> Self {
        Self {
            properties: (!properties.is_empty()).then_some(properties),
            required: (!required.is_empty()).then_some(required),
            ..Self::new(SchemaType::Object)
        }
    }
}

/// Reusable components
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemas: Option<BTreeMap<String, Schema>>,
}
