use std::path::Path;

use log::{debug, info};
use serde_json::{Map, Value};

use crate::error::TransformError;
use crate::ir::grouping::find_group;
use crate::ir::{HttpMethod, Location, Method, OperationGroup, Property};
use crate::parse::ref_resolve::expand_refs;
use crate::store::SpecStore;

use super::flatten::flatten_request_bodies;
use super::properties::{parse_parameters, parse_request_body, parse_responses};
use super::slug::slugify;

/// Group name for operations that declare no tags.
pub const DEFAULT_GROUP: &str = "default";

/// Load the document at `spec_path` through `store` and transform it into
/// portal groups.
pub fn transform(store: &SpecStore, spec_path: &Path) -> Result<Vec<OperationGroup>, TransformError> {
    let document = store.load(spec_path)?;
    transform_document(&document)
}

/// Transform a parsed OpenAPI document into portal groups.
///
/// Groups appear in first-encounter order while walking `paths` in key order.
/// Methods within a group are sorted by `operationId`, responses within a
/// method by status code string.
pub fn transform_document(document: &Value) -> Result<Vec<OperationGroup>, TransformError> {
    if !document.get("paths").is_some_and(Value::is_object) {
        return Err(TransformError::MalformedSpec("paths key not found".to_string()));
    }

    // Phase 1: Expand all internal references
    let expanded = expand_refs(document)?;

    // Phase 2: Unwrap nested request body schemas
    let flattened = flatten_request_bodies(expanded)?;

    // Phase 3: Build groups
    let tags = document
        .get("tags")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let mut groups = build_groups(&flattened, tags)?;

    // Phase 4: Deterministic ordering
    order_groups(&mut groups);

    info!(
        "transformed {} operations into {} groups",
        groups.iter().map(|g| g.methods.len()).sum::<usize>(),
        groups.len()
    );
    Ok(groups)
}

fn build_groups(document: &Value, tags: &[Value]) -> Result<Vec<OperationGroup>, TransformError> {
    let mut groups: Vec<OperationGroup> = Vec::new();
    let Some(paths) = document.get("paths").and_then(Value::as_object) else {
        return Ok(groups);
    };

    for (path, item) in paths {
        let Some(item) = item.as_object() else {
            continue;
        };
        let path_params = item
            .get("parameters")
            .and_then(Value::as_array)
            .map(|params| parse_parameters(params))
            .unwrap_or_default();

        for method in HttpMethod::ALL {
            let Some(op) = item.get(method.as_key()).and_then(Value::as_object) else {
                continue;
            };

            let tag = op
                .get("tags")
                .and_then(Value::as_array)
                .and_then(|tags| tags.first())
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_GROUP);

            let index = match find_group(&groups, tag) {
                Some(index) => index,
                None => {
                    debug!("creating group {tag}");
                    groups.push(OperationGroup {
                        name: tag.to_string(),
                        path: tag.to_lowercase(),
                        description: tag_description(tags, tag),
                        methods: Vec::new(),
                    });
                    groups.len() - 1
                }
            };

            let built = build_method(method, path, op, &path_params)?;
            groups[index].methods.push(built);
        }
    }

    Ok(groups)
}

fn build_method(
    method: HttpMethod,
    path: &str,
    op: &Map<String, Value>,
    path_params: &[Property],
) -> Result<Method, TransformError> {
    let operation_id = op
        .get("operationId")
        .and_then(Value::as_str)
        .ok_or_else(|| TransformError::MissingOperationId {
            method: method.to_string(),
            path: path.to_string(),
        })?;

    let summary = string_field(op, "summary");
    let name = if summary.is_empty() {
        operation_id.to_string()
    } else {
        summary.clone()
    };

    // Path-level parameters apply unless the operation redeclares them.
    let op_params = op
        .get("parameters")
        .and_then(Value::as_array)
        .map(|params| parse_parameters(params))
        .unwrap_or_default();
    let mut attributes: Vec<Property> = path_params
        .iter()
        .filter(|p| {
            !op_params
                .iter()
                .any(|o| o.name == p.name && o.location == p.location)
        })
        .cloned()
        .collect();
    attributes.extend(op_params);

    let request_body = op
        .get("requestBody")
        .and_then(Value::as_object)
        .and_then(parse_request_body);
    if let Some(ref body) = request_body {
        attributes.extend(body.properties.iter().cloned().map(|mut field| {
            field.location = Some(Location::Body);
            field
        }));
    }

    let responses = op
        .get("responses")
        .and_then(Value::as_object)
        .map(parse_responses)
        .unwrap_or_default();

    Ok(Method {
        path: slugify(&name),
        name,
        http_verb: method,
        url: path.to_string(),
        description: string_field(op, "description"),
        summary,
        operation_id: operation_id.to_string(),
        attributes,
        request_body,
        responses,
    })
}

fn string_field(map: &Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Description of `tag` from the document's top-level `tags` list.
fn tag_description(tags: &[Value], tag: &str) -> String {
    tags.iter()
        .find(|t| t.get("name").and_then(Value::as_str) == Some(tag))
        .and_then(|t| t.get("description"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Sort methods by `operationId` and responses by status, both as plain
/// strings. Status codes compare lexicographically, which matches numeric
/// order only for same-width codes.
fn order_groups(groups: &mut [OperationGroup]) {
    for group in groups {
        group
            .methods
            .sort_by(|a, b| a.operation_id.cmp(&b.operation_id));
        for method in &mut group.methods {
            method.responses.sort_by(|a, b| a.status.cmp(&b.status));
        }
    }
}
