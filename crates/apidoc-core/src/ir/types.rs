use std::fmt;

use serde::Serialize;

use super::properties::{Property, RequestBodySchema, Response};

/// HTTP method of an operation declared under a path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Trace,
    ];

    /// The key used for this method inside an OpenAPI path item.
    pub fn as_key(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }

    /// Parse a method name case-insensitively (`POST`, `post`, `Post`).
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        Self::ALL.into_iter().find(|m| m.as_key() == lower)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_key().to_ascii_uppercase())
    }
}

/// A developer-portal section: every operation sharing one tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationGroup {
    pub name: String,
    pub path: String,
    pub description: String,
    pub methods: Vec<Method>,
}

/// One operation, denormalized for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Method {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub http_verb: HttpMethod,
    pub url: String,
    pub description: String,
    pub summary: String,
    #[serde(rename = "operationId")]
    pub operation_id: String,
    pub attributes: Vec<Property>,
    #[serde(rename = "requestBody")]
    pub request_body: Option<RequestBodySchema>,
    pub responses: Vec<Response>,
}
