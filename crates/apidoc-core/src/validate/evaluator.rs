use serde_json::Value;

use crate::error::ValidateError;

/// Checks a JSON instance against a JSON Schema and reports every violation.
pub trait SchemaEvaluator {
    fn evaluate(&self, schema: &Value, instance: &Value) -> Result<Vec<String>, ValidateError>;
}

/// [`SchemaEvaluator`] backed by the `jsonschema` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaEvaluator;

impl SchemaEvaluator for JsonSchemaEvaluator {
    fn evaluate(&self, schema: &Value, instance: &Value) -> Result<Vec<String>, ValidateError> {
        let validator = jsonschema::validator_for(schema)
            .map_err(|e| ValidateError::InvalidSchema(e.to_string()))?;
        Ok(validator
            .iter_errors(instance)
            .map(|err| err.to_string())
            .collect())
    }
}
