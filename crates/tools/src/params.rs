//! Declarative argument validation for the command catalog.
//!
//! Every offending field is reported, not just the first, as
//! `path: message` pairs joined by commas, followed by the tool's usage
//! hint. Nested paths are dot-joined.

use serde_json::{json, Map, Value};

use webbridge_core::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    String,
    Number,
}

impl FieldKind {
    fn schema_type(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
        }
    }
}

pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
}

impl FieldSpec {
    pub const fn string(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::String,
            description,
        }
    }

    pub const fn number(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Number,
            description,
        }
    }
}

/// Project a field table into the JSON schema document exposed for
/// tool discovery. Every declared field is required.
pub fn object_schema(fields: &[FieldSpec]) -> Value {
    let mut properties = Map::new();
    for field in fields {
        properties.insert(
            field.name.to_string(),
            json!({
                "type": field.kind.schema_type(),
                "description": field.description,
            }),
        );
    }
    let required: Vec<&str> = fields.iter().map(|f| f.name).collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Check `params` against the field table. Unknown extra fields are
/// ignored; failures are aggregated into one `Validation` error ending
/// with the usage hint.
pub fn validate_object(params: &Value, fields: &[FieldSpec], usage: &str) -> Result<()> {
    let empty = Map::new();
    let object = match params {
        Value::Object(map) => map,
        Value::Null => &empty,
        other => {
            return Err(Error::Validation(format!(
                "Invalid parameters: Expected object, received {}. {}",
                type_name(other),
                usage
            )));
        }
    };

    let mut failures: Vec<String> = Vec::new();
    for field in fields {
        match object.get(field.name) {
            None | Some(Value::Null) => {
                failures.push(format!("{}: Required", field.name));
            }
            Some(value) if !field.kind.matches(value) => {
                failures.push(format!(
                    "{}: Expected {}, received {}",
                    field.name,
                    field.kind.schema_type(),
                    type_name(value)
                ));
            }
            Some(_) => {}
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "Invalid parameters: {}. {}",
            failures.join(", "),
            usage
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::string("element", "Element name or selector"),
        FieldSpec::string("text", "Text to type"),
    ];

    #[test]
    fn test_valid_object_passes() {
        let params = json!({"element": "Search box", "text": "hello"});
        assert!(validate_object(&params, FIELDS, "usage").is_ok());
    }

    #[test]
    fn test_missing_field_named_by_path() {
        let err = validate_object(&json!({"element": "x"}), FIELDS, "usage").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Invalid parameters: text: Required. usage"
        );
    }

    #[test]
    fn test_multiple_failures_aggregated() {
        let err = validate_object(&json!({}), FIELDS, "usage").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("element: Required, text: Required"), "{}", msg);
    }

    #[test]
    fn test_wrong_type_reported() {
        let fields = &[FieldSpec::number("time", "Seconds")];
        let err = validate_object(&json!({"time": "5"}), fields, "usage").unwrap_err();
        assert!(
            err.to_string().contains("time: Expected number, received string"),
            "{}",
            err
        );
    }

    #[test]
    fn test_non_object_params_rejected() {
        let err = validate_object(&json!("click"), FIELDS, "usage").unwrap_err();
        assert!(
            err.to_string().contains("Expected object, received string"),
            "{}",
            err
        );
    }

    #[test]
    fn test_empty_field_table_accepts_anything_object_shaped() {
        assert!(validate_object(&json!({}), &[], "usage").is_ok());
        assert!(validate_object(&json!({"extra": 1}), &[], "usage").is_ok());
        assert!(validate_object(&Value::Null, &[], "usage").is_ok());
    }

    #[test]
    fn test_object_schema_projection() {
        let fields = &[FieldSpec::string("url", "URL to navigate to")];
        let schema = object_schema(fields);
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["url"]["type"], "string");
        assert_eq!(schema["required"], json!(["url"]));
    }
}
