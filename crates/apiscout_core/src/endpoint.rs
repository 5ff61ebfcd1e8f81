//! Endpoints and tags handed over by route extraction

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::descriptor::TypeDescriptor;

/// HTTP operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Patch,
    Delete,
    Head,
    Trace,
    Options,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Put => write!(f, "PUT"),
            Self::Post => write!(f, "POST"),
            Self::Patch => write!(f, "PATCH"),
            Self::Delete => write!(f, "DELETE"),
            Self::Head => write!(f, "HEAD"),
            Self::Trace => write!(f, "TRACE"),
            Self::Options => write!(f, "OPTIONS"),
        }
    }
}

impl TryFrom<&str> for HttpMethod {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "PUT" => Ok(Self::Put),
            "POST" => Ok(Self::Post),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            "TRACE" => Ok(Self::Trace),
            "OPTIONS" => Ok(Self::Options),
            other => Err(format!("unknown HTTP method: {other}")),
        }
    }
}

/// Where a parameter travels in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Body,
}

/// One declared endpoint parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointParameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub descriptor: TypeDescriptor,
}

/// One routable operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Handler name, used as the operation id
    pub name: String,
    pub operation: HttpMethod,
    pub path: String,
    pub parameters: Vec<EndpointParameter>,
    /// Absent when the handler returns nothing
    pub response: Option<TypeDescriptor>,
}

/// A routable controller grouping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub endpoints: Vec<Endpoint>,
}

impl Tag {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoints: Vec::new(),
        }
    }

    pub fn add_endpoint(&mut self, endpoint: Endpoint) {
        self.endpoints.push(endpoint);
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("GET", HttpMethod::Get)]
    #[case("get", HttpMethod::Get)]
    #[case("Put", HttpMethod::Put)]
    #[case("post", HttpMethod::Post)]
    #[case("PATCH", HttpMethod::Patch)]
    #[case("delete", HttpMethod::Delete)]
    #[case("head", HttpMethod::Head)]
    #[case("trace", HttpMethod::Trace)]
    #[case("Options", HttpMethod::Options)]
    fn http_method_from_str(#[case] input: &str, #[case] expected: HttpMethod) {
        assert_eq!(HttpMethod::try_from(input).unwrap(), expected);
    }

    #[rstest]
    #[case("CONNECT")]
    #[case("purge")]
    #[case("")]
    fn http_method_rejects_unknown(#[case] input: &str) {
        let err = HttpMethod::try_from(input).unwrap_err();
        assert!(err.contains("unknown HTTP method"), "got: {err}");
    }

    #[rstest]
    #[case(HttpMethod::Get, "GET")]
    #[case(HttpMethod::Trace, "TRACE")]
    #[case(HttpMethod::Options, "OPTIONS")]
    fn http_method_display_matches_serde(#[case] method: HttpMethod, #[case] expected: &str) {
        assert_eq!(method.to_string(), expected);
        assert_eq!(
            serde_json::to_string(&method).unwrap(),
            format!("\"{expected}\"")
        );
    }

    #[test]
    fn parameter_location_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ParameterLocation::Body).unwrap(),
            "\"body\""
        );
    }
}
