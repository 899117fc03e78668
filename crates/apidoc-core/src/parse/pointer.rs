use serde_json::Value;

use crate::error::ResolveError;

/// Returns true when `value` is an internal pointer such as
/// `#/components/schemas/Pet`.
pub fn is_internal_ref(value: &str) -> bool {
    value.starts_with("#/")
}

/// Walk `root` along the segments of an internal pointer.
///
/// Mappings are indexed by key and lists by numeric position. `~1` and `~0`
/// escapes are decoded per segment.
pub fn lookup<'a>(root: &'a Value, pointer: &str) -> Result<&'a Value, ResolveError> {
    let path = pointer
        .strip_prefix("#/")
        .ok_or_else(|| ResolveError::InvalidReference(pointer.to_string()))?;

    let mut current = root;
    for raw in path.split('/') {
        let segment = decode_segment(raw);
        let next = match current {
            Value::Object(map) => map.get(segment.as_str()),
            Value::Array(list) => segment.parse::<usize>().ok().and_then(|i| list.get(i)),
            _ => None,
        };
        current = next.ok_or_else(|| ResolveError::ReferenceNotFound(pointer.to_string()))?;
    }
    Ok(current)
}

fn decode_segment(raw: &str) -> String {
    raw.replace("~1", "/").replace("~0", "~")
}
