use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Where an attribute is supplied in a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Query,
    Header,
    Path,
    Cookie,
    Body,
}

impl Location {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "query" => Some(Location::Query),
            "header" => Some(Location::Header),
            "path" => Some(Location::Path),
            "cookie" => Some(Location::Cookie),
            "body" => Some(Location::Body),
            _ => None,
        }
    }
}

/// A copied-through schema keyword. Nested object `properties` and array
/// `items` are rendered as property lists, everything else verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Keyword {
    Properties(Vec<Property>),
    Value(Value),
}

/// A named field: a request parameter, a body field or a nested property.
///
/// `required` is false unless the name is listed in the owning schema's
/// `required` list (or, for parameters, the parameter declares
/// `required: true`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub name: String,
    pub required: bool,
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(flatten)]
    pub keywords: IndexMap<String, Keyword>,
}

impl Property {
    /// Keys owned by the struct itself; never copied into `keywords`.
    pub const RESERVED_KEYS: [&'static str; 3] = ["name", "required", "in"];

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            location: None,
            keywords: IndexMap::new(),
        }
    }

    /// A copied-through keyword value, if present and not a nested list.
    pub fn value(&self, key: &str) -> Option<&Value> {
        match self.keywords.get(key) {
            Some(Keyword::Value(v)) => Some(v),
            _ => None,
        }
    }

    /// A nested property list (object `properties` or array `items`).
    pub fn nested(&self, key: &str) -> Option<&[Property]> {
        match self.keywords.get(key) {
            Some(Keyword::Properties(props)) => Some(props),
            _ => None,
        }
    }
}

/// The request body of an operation, flattened to a property list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBodySchema {
    pub description: Option<String>,
    pub required: bool,
    #[serde(rename = "contentType")]
    pub content_type: String,
    pub properties: Vec<Property>,
    #[serde(flatten)]
    pub keywords: IndexMap<String, Value>,
}

/// Item schema of an array response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseItems {
    #[serde(rename = "type")]
    pub item_type: Option<Value>,
    pub properties: Vec<Property>,
}

/// One declared response of an operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub status: String,
    pub description: Option<String>,
    #[serde(rename = "contentType", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<Property>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ResponseItems>>,
    #[serde(flatten)]
    pub keywords: IndexMap<String, Value>,
}
