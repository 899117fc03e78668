use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::flatten::{REQUEST_CONTENT_TYPES, wrapper_entry};
use crate::ir::{Keyword, Location, Property, RequestBodySchema, Response, ResponseItems};
use crate::parse::ref_resolve::REFERENCE_KEY;

/// Names listed in a schema's `required` keyword, if it is a list.
fn required_names(schema: &Map<String, Value>) -> Vec<&str> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

/// Flatten declared parameters into attributes.
///
/// A parameter fetched by reference is unwrapped first, then its `schema`
/// keys are hoisted to the top level. Parameter keys win over schema keys.
pub fn parse_parameters(parameters: &[Value]) -> Vec<Property> {
    parameters
        .iter()
        .filter_map(Value::as_object)
        .map(|param| {
            let mut fields = match param.get(REFERENCE_KEY).and_then(Value::as_object) {
                Some(referent) => referent.clone(),
                None => Map::new(),
            };
            for (key, val) in param {
                if key != REFERENCE_KEY {
                    fields.insert(key.clone(), val.clone());
                }
            }

            if let Some(Value::Object(schema)) = fields.remove("schema") {
                for (key, val) in schema {
                    fields.entry(key).or_insert(val);
                }
            }

            let mut prop = Property::new(fields.get("name").and_then(Value::as_str).unwrap_or_default());
            prop.required = fields.get("required").and_then(Value::as_bool).unwrap_or(false);
            prop.location = fields.get("in").and_then(Value::as_str).and_then(Location::from_name);
            prop.keywords = fields
                .into_iter()
                .filter(|(key, _)| !Property::RESERVED_KEYS.contains(&key.as_str()))
                .map(|(key, val)| (key, Keyword::Value(val)))
                .collect();
            prop
        })
        .collect()
}

/// Convert a schema `properties` mapping into a property list.
///
/// Each property is flagged required iff its name appears in `required`.
/// Nested object `properties` carry their own `required` list. An inline
/// `items` schema becomes a one-element list named after the property; items
/// fetched by reference stay under the reference sentinel.
pub fn parse_properties(properties: &Map<String, Value>, required: &[&str]) -> Vec<Property> {
    properties
        .iter()
        .map(|(name, schema)| {
            let mut prop = Property::new(name.as_str());
            prop.required = required.contains(&name.as_str());

            let Some(schema) = schema.as_object() else {
                return prop;
            };
            for (key, val) in schema {
                if Property::RESERVED_KEYS.contains(&key.as_str()) {
                    continue;
                }
                let keyword = match (key.as_str(), val) {
                    ("properties", Value::Object(nested)) => {
                        Keyword::Properties(parse_properties(nested, &required_names(schema)))
                    }
                    ("items", Value::Object(items)) if items.contains_key(REFERENCE_KEY) => {
                        Keyword::Properties(parse_properties(items, &[]))
                    }
                    ("items", Value::Object(_)) => {
                        let mut wrapped = Map::new();
                        wrapped.insert(name.clone(), val.clone());
                        Keyword::Properties(parse_properties(&wrapped, &[]))
                    }
                    _ => Keyword::Value(val.clone()),
                };
                prop.keywords.insert(key.clone(), keyword);
            }
            prop
        })
        .collect()
}

/// Pick the media type to render: JSON first, then multipart, then whatever
/// is declared first.
fn preferred_media(content: &Map<String, Value>) -> Option<(&str, &Value)> {
    REQUEST_CONTENT_TYPES
        .into_iter()
        .find_map(|ct| content.get(ct).map(|media| (ct, media)))
        .or_else(|| content.iter().next().map(|(ct, media)| (ct.as_str(), media)))
}

fn media_schema(media: &Value) -> Map<String, Value> {
    media
        .get("schema")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

/// Flatten an operation's request body.
pub fn parse_request_body(body: &Map<String, Value>) -> Option<RequestBodySchema> {
    let content = body.get("content")?.as_object()?;
    let (content_type, media) = preferred_media(content)?;
    let schema = media_schema(media);

    let description = body
        .get("description")
        .or_else(|| schema.get("description"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| parse_properties(props, &required_names(&schema)))
        .unwrap_or_default();

    let keywords: IndexMap<String, Value> = schema
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "properties" | "required" | "description"))
        .map(|(key, val)| (key.clone(), val.clone()))
        .collect();

    Some(RequestBodySchema {
        description,
        required: body.get("required").and_then(Value::as_bool).unwrap_or(false),
        content_type: content_type.to_string(),
        properties,
        keywords,
    })
}

/// Flatten an operation's responses, in declaration-map order.
pub fn parse_responses(responses: &Map<String, Value>) -> Vec<Response> {
    responses
        .iter()
        .filter_map(|(status, response)| {
            let response = response.as_object()?;
            Some(parse_response(status, response))
        })
        .collect()
}

fn parse_response(status: &str, response: &Map<String, Value>) -> Response {
    let media = response
        .get("content")
        .and_then(Value::as_object)
        .and_then(preferred_media);

    let mut schema = media.map(|(_, m)| media_schema(m)).unwrap_or_default();

    let items = schema
        .get("items")
        .and_then(Value::as_object)
        .map(|items| {
            items
                .get(REFERENCE_KEY)
                .and_then(Value::as_object)
                .unwrap_or(items)
        })
        .filter(|items| items.contains_key("properties"))
        .map(|items| ResponseItems {
            item_type: items.get("type").cloned(),
            properties: items
                .get("properties")
                .and_then(Value::as_object)
                .map(|props| parse_properties(props, &required_names(items)))
                .unwrap_or_default(),
        });

    let mut properties = None;
    if items.is_some() {
        schema.remove("items");
    } else {
        // Primitive arrays keep their `items` as a plain keyword.
        let wrapper = if schema.contains_key("items") {
            None
        } else {
            wrapper_entry(&schema).map(|(key, inner)| (key.to_string(), inner.clone()))
        };
        if let Some((key, inner)) = wrapper {
            schema.remove(&key);
            schema.extend(inner);
        }
        properties = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| parse_properties(props, &required_names(&schema)));
    }

    let keywords = schema
        .into_iter()
        .filter(|(key, _)| {
            !matches!(
                key.as_str(),
                "properties" | "required" | "description" | "status" | "contentType"
            )
        })
        .collect();

    Response {
        status: status.to_string(),
        description: response
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        content_type: media.map(|(ct, _)| ct.to_string()),
        properties,
        items: items.map(|items| vec![items]),
        keywords,
    }
}
