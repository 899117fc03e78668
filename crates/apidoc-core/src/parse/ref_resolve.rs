use std::collections::HashMap;

use log::debug;
use serde_json::{Map, Value};

use super::pointer::{is_internal_ref, lookup};
use crate::error::ResolveError;

/// Key under which a referent is stored when it is fetched by reference but
/// not spliced into its parent mapping.
pub const REFERENCE_KEY: &str = "$refValues";

/// List-valued keys whose elements are always spliced, never wrapped.
const EMBEDDED_LIST_KEYS: [&str; 4] = ["responses", "requestBody", "401", "403"];

/// Expands every internal pointer in a document into the sub-document it
/// points at, producing a document with no unresolved `#/` strings.
///
/// A pointer found inside a mapping is either spliced into that mapping
/// (`embed_as_object`) or kept addressable under [`REFERENCE_KEY`]. Array item
/// schemas are always kept under the sentinel so they retain their own
/// identity inside a list. A pointer met again while its own referent is
/// still being expanded is stored unexpanded under the sentinel.
pub struct RefResolver<'a> {
    root: &'a Value,
    visiting: Vec<String>,
    expanded: HashMap<String, Value>,
}

impl<'a> RefResolver<'a> {
    pub fn new(root: &'a Value) -> Self {
        Self {
            root,
            visiting: Vec::new(),
            expanded: HashMap::new(),
        }
    }

    /// Expand the whole root document. The root itself is never spliced.
    pub fn expand_document(&mut self) -> Result<Value, ResolveError> {
        let root = self.root;
        self.expand(root, false)
    }

    /// Look up an internal pointer against the root without expanding it.
    pub fn lookup(&self, pointer: &str) -> Result<&'a Value, ResolveError> {
        lookup(self.root, pointer)
    }

    /// Recursively expand `node`.
    pub fn expand(&mut self, node: &Value, embed_as_object: bool) -> Result<Value, ResolveError> {
        match node {
            Value::Object(map) => self.expand_mapping(map, embed_as_object),
            Value::Array(list) => self.expand_list(list, embed_as_object),
            scalar => Ok(scalar.clone()),
        }
    }

    fn expand_mapping(
        &mut self,
        map: &Map<String, Value>,
        embed_as_object: bool,
    ) -> Result<Value, ResolveError> {
        let mut out = Map::with_capacity(map.len());
        let mut spliced = Map::new();

        for (key, val) in map {
            match val {
                Value::String(s) if is_internal_ref(s) && self.is_visiting(s) => {
                    // Self-referential schema: keep the referent unexpanded.
                    debug!("reference {s} is already being expanded, leaving it as is");
                    out.insert(REFERENCE_KEY.to_string(), lookup(self.root, s)?.clone());
                }
                Value::String(s) if is_internal_ref(s) => {
                    let referent = self.expand_pointer(s)?;
                    match referent {
                        Value::Object(fields) if embed_as_object => spliced.extend(fields),
                        other => {
                            out.insert(REFERENCE_KEY.to_string(), other);
                        }
                    }
                }
                Value::Object(_) => {
                    let expanded = self.expand(val, key != "items")?;
                    out.insert(key.clone(), expanded);
                }
                Value::Array(list) => {
                    let embed = EMBEDDED_LIST_KEYS.contains(&key.as_str());
                    out.insert(key.clone(), self.expand_list(list, embed)?);
                }
                scalar => {
                    out.insert(key.clone(), scalar.clone());
                }
            }
        }

        // Sibling keys of a spliced reference take precedence over the referent.
        for (key, val) in spliced {
            out.entry(key).or_insert(val);
        }
        Ok(Value::Object(out))
    }

    fn expand_list(&mut self, list: &[Value], embed_as_object: bool) -> Result<Value, ResolveError> {
        list.iter()
            .map(|item| match item {
                Value::Object(_) | Value::Array(_) => self.expand(item, embed_as_object),
                scalar => Ok(scalar.clone()),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }

    fn is_visiting(&self, pointer: &str) -> bool {
        self.visiting.iter().any(|p| p == pointer)
    }

    /// Resolve a pointer and expand its referent, memoizing the result.
    fn expand_pointer(&mut self, pointer: &str) -> Result<Value, ResolveError> {
        if let Some(done) = self.expanded.get(pointer) {
            return Ok(done.clone());
        }

        debug!("expanding reference {pointer}");
        let referent = lookup(self.root, pointer)?;
        self.visiting.push(pointer.to_string());
        let expanded = self.expand(referent, true);
        self.visiting.pop();

        let expanded = expanded?;
        self.expanded.insert(pointer.to_string(), expanded.clone());
        Ok(expanded)
    }
}

/// Expand all references of `root`, starting with `embed_as_object = false`.
pub fn expand_refs(root: &Value) -> Result<Value, ResolveError> {
    RefResolver::new(root).expand_document()
}
