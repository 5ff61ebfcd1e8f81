//! Mapping of primitive and intrinsic types to OpenAPI data types

use crate::declaration::TypeRegistry;
use crate::descriptor::{Classification, TypeDescriptor, TypeIdentity, TypeKind};

pub const APPLICATION_JSON: &str = "application/json";
pub const TEXT_PLAIN: &str = "text/plain";

/// Base output kind of a type, with its optional format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenApiDataType {
    String,
    StringBinary,
    StringDate,
    StringDateTime,
    Boolean,
    Integer32,
    Integer64,
    NumberFloat,
    NumberDouble,
    Array,
    Object,
}

impl OpenApiDataType {
    /// OpenAPI `type` keyword
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::String | Self::StringBinary | Self::StringDate | Self::StringDateTime => {
                "string"
            }
            Self::Boolean => "boolean",
            Self::Integer32 | Self::Integer64 => "integer",
            Self::NumberFloat | Self::NumberDouble => "number",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// OpenAPI `format` keyword, if any
    #[must_use]
    pub const fn format(self) -> Option<&'static str> {
        match self {
            Self::StringBinary => Some("binary"),
            Self::StringDate => Some("date"),
            Self::StringDateTime => Some("date-time"),
            Self::Integer32 => Some("int32"),
            Self::Integer64 => Some("int64"),
            Self::NumberFloat => Some("float"),
            Self::NumberDouble => Some("double"),
            Self::String | Self::Boolean | Self::Array | Self::Object => None,
        }
    }

    /// Classify a raw type identity.
    ///
    /// Declared types are classified structurally (enums are strings, the rest
    /// objects). Undeclared types go through exact simple-name checks first,
    /// then the array-like check.
    #[must_use]
    pub fn classify(identity: &TypeIdentity, registry: &TypeRegistry) -> Self {
        if let Some(decl) = registry.get(identity) {
            return match decl.kind {
                TypeKind::Enum => Self::String,
                TypeKind::Primitive | TypeKind::Struct | TypeKind::Interface => Self::Object,
            };
        }

        match identity.simple_name() {
            "bool" => Self::Boolean,
            "i8" | "i16" | "i32" | "u8" | "u16" => Self::Integer32,
            "i64" | "i128" | "isize" | "u32" | "u64" | "u128" | "usize" => Self::Integer64,
            "f32" => Self::NumberFloat,
            "f64" => Self::NumberDouble,
            "String" | "str" | "char" | "Uuid" => Self::String,
            "DateTime" | "NaiveDateTime" | "OffsetDateTime" | "SystemTime" => {
                Self::StringDateTime
            }
            "NaiveDate" | "Date" => Self::StringDate,
            "Bytes" | "NamedTempFile" | "FieldData" => Self::StringBinary,
            _ if identity.is_collection() => Self::Array,
            _ => Self::Object,
        }
    }

    /// Classify a resolved descriptor; array wrappers are always arrays
    #[must_use]
    pub fn of_descriptor(descriptor: &TypeDescriptor, registry: &TypeRegistry) -> Self {
        match descriptor.classification() {
            Classification::Array => Self::Array,
            Classification::Enum => Self::String,
            _ => Self::classify(descriptor.identity(), registry),
        }
    }
}

/// Default media type used when a body or response carries `descriptor`
#[must_use]
pub fn default_media_type(descriptor: &TypeDescriptor, registry: &TypeRegistry) -> &'static str {
    if descriptor.is_enum() {
        return APPLICATION_JSON;
    }
    match OpenApiDataType::of_descriptor(descriptor, registry) {
        OpenApiDataType::String => TEXT_PLAIN,
        _ => APPLICATION_JSON,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::declaration::TypeDecl;
    use crate::descriptor::TypeExpr;

    #[rstest]
    #[case("bool", OpenApiDataType::Boolean)]
    #[case("i32", OpenApiDataType::Integer32)]
    #[case("u16", OpenApiDataType::Integer32)]
    #[case("i64", OpenApiDataType::Integer64)]
    #[case("usize", OpenApiDataType::Integer64)]
    #[case("f32", OpenApiDataType::NumberFloat)]
    #[case("f64", OpenApiDataType::NumberDouble)]
    #[case("String", OpenApiDataType::String)]
    #[case("uuid::Uuid", OpenApiDataType::String)]
    #[case("chrono::DateTime", OpenApiDataType::StringDateTime)]
    #[case("chrono::NaiveDate", OpenApiDataType::StringDate)]
    #[case("tempfile::NamedTempFile", OpenApiDataType::StringBinary)]
    #[case("Vec", OpenApiDataType::Array)]
    #[case("HashSet", OpenApiDataType::Array)]
    #[case("models::Status", OpenApiDataType::String)]
    #[case("models::User", OpenApiDataType::Object)]
    #[case("external::Unknown", OpenApiDataType::Object)]
    fn classify_identities(#[case] canonical: &str, #[case] expected: OpenApiDataType) {
        let mut registry = TypeRegistry::new();
        registry.register(TypeDecl::enumeration(
            TypeIdentity::parse("models::Status"),
            ["Active", "Inactive"],
        ));
        registry.register(TypeDecl::structure(TypeIdentity::parse("models::User")));

        assert_eq!(
            OpenApiDataType::classify(&TypeIdentity::parse(canonical), &registry),
            expected
        );
    }

    #[rstest]
    #[case(OpenApiDataType::String, "string", None)]
    #[case(OpenApiDataType::StringBinary, "string", Some("binary"))]
    #[case(OpenApiDataType::StringDate, "string", Some("date"))]
    #[case(OpenApiDataType::StringDateTime, "string", Some("date-time"))]
    #[case(OpenApiDataType::Boolean, "boolean", None)]
    #[case(OpenApiDataType::Integer32, "integer", Some("int32"))]
    #[case(OpenApiDataType::Integer64, "integer", Some("int64"))]
    #[case(OpenApiDataType::NumberFloat, "number", Some("float"))]
    #[case(OpenApiDataType::NumberDouble, "number", Some("double"))]
    #[case(OpenApiDataType::Array, "array", None)]
    #[case(OpenApiDataType::Object, "object", None)]
    fn value_and_format(
        #[case] data_type: OpenApiDataType,
        #[case] value: &str,
        #[case] format: Option<&str>,
    ) {
        assert_eq!(data_type.value(), value);
        assert_eq!(data_type.format(), format);
    }

    #[test]
    fn media_type_follows_data_type() {
        let mut registry = TypeRegistry::new();
        registry.register(TypeDecl::enumeration(
            TypeIdentity::parse("models::Status"),
            ["Active"],
        ));

        let string = TypeDescriptor::of(TypeIdentity::builtin("String"), &registry);
        let status = TypeDescriptor::of(TypeIdentity::parse("models::Status"), &registry);
        let list = TypeDescriptor::contextual(
            &TypeExpr::vec_of(TypeExpr::named(TypeIdentity::builtin("String"))),
            &registry,
            None,
        );

        assert_eq!(default_media_type(&string, &registry), TEXT_PLAIN);
        assert_eq!(default_media_type(&status, &registry), APPLICATION_JSON);
        assert_eq!(default_media_type(&list, &registry), APPLICATION_JSON);
    }
}
