pub mod pointer;
pub mod ref_resolve;

use std::fs;
use std::path::Path;

use serde_json::{Map, Number, Value};

use crate::error::{LoadError, ParseError};

/// A generic OpenAPI document. Mappings are key-sorted, so every walk over a
/// document visits keys in the same order.
pub type Document = Value;

/// Parse an OpenAPI document from YAML, normalizing it to the JSON data model.
/// Merge keys (`<<: *anchor`) are applied first.
pub fn from_yaml(input: &str) -> Result<Document, ParseError> {
    let mut yaml: serde_yaml_ng::Value = serde_yaml_ng::from_str(input)?;
    yaml.apply_merge()?;
    yaml_to_json(yaml)
}

/// Parse an OpenAPI document from JSON.
pub fn from_json(input: &str) -> Result<Document, ParseError> {
    Ok(serde_json::from_str(input)?)
}

/// Read and parse a document from disk. `.json` files are parsed as JSON,
/// everything else goes through the YAML normalizer (which accepts JSON too).
pub fn load_document(path: &Path) -> Result<Document, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");
    let parsed = match ext {
        "json" => from_json(&content),
        _ => from_yaml(&content),
    };

    parsed.map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Convert a YAML value into a JSON value. Mapping keys are stringified the
/// way a YAML→JSON converter would: `200:` becomes `"200"`.
fn yaml_to_json(value: serde_yaml_ng::Value) -> Result<Value, ParseError> {
    use serde_yaml_ng::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => yaml_number_to_json(&n),
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(seq) => Value::Array(
            seq.into_iter()
                .map(yaml_to_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut object = Map::with_capacity(mapping.len());
            for (key, val) in mapping {
                object.insert(yaml_key_to_string(key)?, yaml_to_json(val)?);
            }
            Value::Object(object)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn yaml_number_to_json(n: &serde_yaml_ng::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        Value::Number(u.into())
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn yaml_key_to_string(key: serde_yaml_ng::Value) -> Result<String, ParseError> {
    use serde_yaml_ng::Value as Yaml;

    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        Yaml::Tagged(tagged) => yaml_key_to_string(tagged.value),
        other => Err(ParseError::UnsupportedKey(format!("{other:?}"))),
    }
}
