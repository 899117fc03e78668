use log::debug;
use serde_json::{Map, Value};

use crate::error::TransformError;
use crate::ir::HttpMethod;
use crate::parse::ref_resolve::REFERENCE_KEY;

/// Content types searched for a request body schema, in preference order.
pub const REQUEST_CONTENT_TYPES: [&str; 2] = ["application/json", "multipart/form-data"];

/// Collapse request body schemas that wrap the real schema one level deeper
/// than expected.
///
/// For every operation with a `requestBody`, the schema under the preferred
/// content type is replaced by its first nested mapping when it has no
/// `properties` of its own. This is a best-effort unwrap, not a composition
/// merge.
pub fn flatten_request_bodies(mut document: Value) -> Result<Value, TransformError> {
    let paths = document
        .get_mut("paths")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| TransformError::MalformedSpec("paths key not found".to_string()))?;

    for (path, item) in paths.iter_mut() {
        let Some(item) = item.as_object_mut() else {
            continue;
        };
        for method in HttpMethod::ALL {
            let Some(body) = item
                .get_mut(method.as_key())
                .and_then(|op| op.get_mut("requestBody"))
            else {
                continue;
            };

            let schema = request_schema_mut(body).ok_or_else(|| {
                TransformError::MissingRequestSchema {
                    method: method.to_string(),
                    path: path.clone(),
                }
            })?;

            if let Some(inner) = unwrap_schema(schema) {
                debug!("unwrapping nested request body schema for {method} {path}");
                *schema = Value::Object(inner);
            }
        }
    }
    Ok(document)
}

/// The schema under `content.<type>.schema` for the first preferred content
/// type the body declares.
fn request_schema_mut(body: &mut Value) -> Option<&mut Value> {
    let content = body.get_mut("content")?.as_object_mut()?;
    let content_type = REQUEST_CONTENT_TYPES
        .into_iter()
        .find(|ct| content.contains_key(*ct))?;
    content
        .get_mut(content_type)?
        .get_mut("schema")
        .filter(|schema| schema.is_object())
}

/// When `schema` has no `properties`, the nested mapping that holds the real
/// schema: the reference sentinel if present, else the first mapping-valued
/// entry. `None` when the schema needs no unwrapping.
fn unwrap_schema(schema: &Value) -> Option<Map<String, Value>> {
    wrapper_entry(schema.as_object()?).map(|(_, inner)| inner.clone())
}

/// The key and mapping of the wrapper entry of a schema without `properties`.
pub(crate) fn wrapper_entry(schema: &Map<String, Value>) -> Option<(&str, &Map<String, Value>)> {
    if schema.contains_key("properties") {
        return None;
    }
    let sentinel = schema
        .get(REFERENCE_KEY)
        .and_then(Value::as_object)
        .map(|inner| (REFERENCE_KEY, inner));
    sentinel.or_else(|| {
        schema
            .iter()
            .find_map(|(key, val)| Some((key.as_str(), val.as_object()?)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc_with_schema(content_type: &str, schema: Value) -> Value {
        json!({
            "paths": {
                "/widgets": {
                    "parameters": [],
                    "post": {
                        "requestBody": {"content": {content_type: {"schema": schema}}}
                    }
                }
            }
        })
    }

    fn schema_of(doc: &Value, content_type: &str) -> Value {
        doc["paths"]["/widgets"]["post"]["requestBody"]["content"][content_type]["schema"].clone()
    }

    #[test]
    fn test_schema_with_properties_is_untouched() {
        let schema = json!({"type": "object", "properties": {"name": {"type": "string"}}});
        let doc = flatten_request_bodies(doc_with_schema("application/json", schema.clone())).unwrap();
        assert_eq!(schema_of(&doc, "application/json"), schema);
    }

    #[test]
    fn test_wrapper_schema_is_unwrapped() {
        let inner = json!({"type": "object", "properties": {"name": {"type": "string"}}});
        let doc = flatten_request_bodies(doc_with_schema(
            "application/json",
            json!({REFERENCE_KEY: inner.clone()}),
        ))
        .unwrap();
        assert_eq!(schema_of(&doc, "application/json"), inner);
    }

    #[test]
    fn test_multipart_schema_is_unwrapped_in_place() {
        let inner = json!({"properties": {"file": {"type": "string", "format": "binary"}}});
        let doc = flatten_request_bodies(doc_with_schema(
            "multipart/form-data",
            json!({"upload": inner.clone()}),
        ))
        .unwrap();
        assert_eq!(schema_of(&doc, "multipart/form-data"), inner);
    }

    #[test]
    fn test_scalar_schema_is_untouched() {
        let schema = json!({"type": "string"});
        let doc = flatten_request_bodies(doc_with_schema("application/json", schema.clone())).unwrap();
        assert_eq!(schema_of(&doc, "application/json"), schema);
    }

    #[test]
    fn test_unsupported_content_type_is_missing_schema() {
        let doc = doc_with_schema("text/plain", json!({"type": "string"}));
        let err = flatten_request_bodies(doc).unwrap_err();
        assert!(matches!(
            err,
            TransformError::MissingRequestSchema { ref method, ref path } if method == "POST" && path == "/widgets"
        ));
    }

    #[test]
    fn test_missing_paths_is_malformed() {
        let err = flatten_request_bodies(json!({"openapi": "3.0.0"})).unwrap_err();
        assert!(matches!(err, TransformError::MalformedSpec(_)));
    }
}
