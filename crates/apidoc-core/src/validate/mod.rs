pub mod evaluator;
pub mod path_match;

use std::path::Path;

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::error::ValidateError;
use crate::parse::ref_resolve::RefResolver;
use crate::store::SpecStore;

pub use evaluator::{JsonSchemaEvaluator, SchemaEvaluator};
pub use path_match::{find_path, matches};

/// Knobs supplied by the embedding web service.
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Path prefixes of the service's router groups. Declared paths that
    /// contain one of them are never prefix-stripped.
    pub router_groups: Vec<String>,
    /// Reduce `group-eventName` operation ids to `eventName`.
    pub strip_event_prefix: bool,
}

/// An incoming request, already JSON-decoded.
#[derive(Debug, Clone, Copy)]
pub struct IncomingRequest<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub body: Option<&'a Value>,
}

/// Validate `request` against the document at `spec_path`, loading it
/// through `store`. Returns the event name of the matched operation.
pub fn validate_request(
    store: &SpecStore,
    spec_path: &Path,
    request: &IncomingRequest<'_>,
    options: &ValidateOptions,
) -> Result<String, ValidateError> {
    let document = store.load(spec_path)?;
    validate_document(&document, request, options, &JsonSchemaEvaluator)
}

/// Validate `request` against an already-loaded document.
///
/// A request that matches no declared path, or a declared path without the
/// request's method, is not an error: the event name is empty and nothing
/// is checked. An absent or `null` body skips the schema check; `{}` is a
/// body like any other. Schema violations are aggregated into
/// [`ValidateError::ValidationFailed`].
pub fn validate_document(
    document: &Value,
    request: &IncomingRequest<'_>,
    options: &ValidateOptions,
    evaluator: &dyn SchemaEvaluator,
) -> Result<String, ValidateError> {
    let url_path = if request.path.starts_with('/') {
        request.path.to_string()
    } else {
        format!("/{}", request.path)
    };

    let paths = document
        .get("paths")
        .and_then(Value::as_object)
        .ok_or_else(|| ValidateError::MalformedSpec("paths key not found".to_string()))?;

    let Some((template, item)) = find_path(paths, &url_path, &options.router_groups) else {
        warn!("no schema found for {} {url_path}", request.method);
        return Ok(String::new());
    };

    let method_key = request.method.to_ascii_lowercase();
    let Some(operation) = item.get(&method_key).and_then(Value::as_object) else {
        warn!("method {} is not defined for {template}", request.method);
        return Ok(String::new());
    };

    let operation_id = operation
        .get("operationId")
        .and_then(Value::as_str)
        .ok_or_else(|| ValidateError::MissingOperationId {
            method: request.method.to_ascii_uppercase(),
            path: template.to_string(),
        })?;
    let event_name = if options.strip_event_prefix {
        parse_event_name(operation_id).to_string()
    } else {
        operation_id.to_string()
    };

    let Some(body) = request.body.filter(|b| !b.is_null()) else {
        return Ok(event_name);
    };
    let Some(request_body) = operation.get("requestBody") else {
        warn!("requestBody is not declared for {} {template}", request.method);
        return Ok(event_name);
    };

    let Some(schema) = request_schema(document, request_body, request.method, template)? else {
        debug!("no application/json schema for {} {template}", request.method);
        return Ok(event_name);
    };

    let violations = evaluator.evaluate(&schema, body)?;
    if violations.is_empty() {
        Ok(event_name)
    } else {
        Err(ValidateError::ValidationFailed(violations))
    }
}

/// Reduce an operation id of the form `prefix-name` to `name`.
pub fn parse_event_name(operation_id: &str) -> &str {
    operation_id
        .split_once('-')
        .map(|(_, name)| name)
        .unwrap_or(operation_id)
}

/// The JSON schema of a request body, following a `$ref` on the body and
/// one more on its schema. `None` when no `application/json` schema is
/// declared.
fn request_schema(
    document: &Value,
    request_body: &Value,
    method: &str,
    template: &str,
) -> Result<Option<Value>, ValidateError> {
    let resolver = RefResolver::new(document);
    let improper = || ValidateError::MissingRequestSchema {
        method: method.to_ascii_uppercase(),
        path: template.to_string(),
    };

    let request_body = match request_body.get("$ref").and_then(Value::as_str) {
        Some(pointer) => resolver.lookup(pointer)?,
        None => request_body,
    };

    let content = request_body
        .get("content")
        .and_then(Value::as_object)
        .ok_or_else(improper)?;
    let Some(schema) = content
        .get("application/json")
        .and_then(|media| media.get("schema"))
    else {
        return Ok(None);
    };

    let schema = match schema.get("$ref").and_then(Value::as_str) {
        Some(pointer) => resolver.lookup(pointer)?,
        None => schema,
    };
    let schema = schema.as_object().ok_or_else(improper)?;

    Ok(Some(Value::Object(with_components(document, schema))))
}

/// Attach the document's `components` to the schema root so nested internal
/// pointers resolve inside the evaluator.
fn with_components(document: &Value, schema: &Map<String, Value>) -> Map<String, Value> {
    let mut schema = schema.clone();
    if let Some(components) = document.get("components") {
        schema
            .entry("components")
            .or_insert_with(|| components.clone());
    }
    schema
}
