//! Declarative argument schemas and the validation boundary for tool input.
//!
//! A [`Schema`] is an ordered list of named [`FieldSpec`]s. It serves two
//! purposes: [`Schema::validate`] turns an untrusted JSON argument bag into
//! [`ToolArguments`], and [`Schema::to_json_schema`] derives the `inputSchema`
//! advertised to clients. Both read the same declaration, so the advertised
//! shape and the enforced shape cannot drift apart.

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::collections::HashSet;

// =============================================================================
// Field types
// =============================================================================

/// Semantic type of a tool argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    /// Whole number. `10.0` is accepted and normalized to `10`.
    Integer,
    Boolean,
    /// String restricted to a fixed set of values.
    Enum(&'static [&'static str]),
}

impl FieldType {
    /// Check a value against this type.
    ///
    /// Returns `Ok(Some(v))` when the value is accepted in a normalized form,
    /// `Ok(None)` when it is accepted as-is.
    fn check(&self, value: &Value) -> Result<Option<Value>, String> {
        match self {
            FieldType::String => {
                if value.is_string() {
                    Ok(None)
                } else {
                    Err(format!("expected string, got {}", value_type_name(value)))
                }
            }
            FieldType::Number => {
                if value.is_number() {
                    Ok(None)
                } else {
                    Err(format!("expected number, got {}", value_type_name(value)))
                }
            }
            FieldType::Integer => {
                if value.is_i64() || value.is_u64() {
                    return Ok(None);
                }
                match value.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        Ok(Some(Value::from(f as i64)))
                    }
                    Some(f) => Err(format!("expected integer, got {}", f)),
                    None => Err(format!("expected integer, got {}", value_type_name(value))),
                }
            }
            FieldType::Boolean => {
                if value.is_boolean() {
                    Ok(None)
                } else {
                    Err(format!("expected boolean, got {}", value_type_name(value)))
                }
            }
            FieldType::Enum(variants) => match value.as_str() {
                Some(s) if variants.iter().any(|v| *v == s) => Ok(None),
                Some(s) => Err(format!(
                    "invalid value '{}', expected one of: {}",
                    s,
                    variants.join(", ")
                )),
                None => Err(format!(
                    "expected string for enum, got {}",
                    value_type_name(value)
                )),
            },
        }
    }

    /// JSON Schema `type` keyword for this field type.
    pub fn json_type(&self) -> &'static str {
        match self {
            FieldType::String | FieldType::Enum(_) => "string",
            FieldType::Number => "number",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
        }
    }
}

fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Field specification
// =============================================================================

/// One declared argument.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub field_type: FieldType,
    pub required: bool,
    pub default: Option<Value>,
    pub description: String,
}

impl FieldSpec {
    fn new(field_type: FieldType, description: impl Into<String>) -> Self {
        Self {
            field_type,
            required: true,
            default: None,
            description: description.into(),
        }
    }

    pub fn string(description: impl Into<String>) -> Self {
        Self::new(FieldType::String, description)
    }

    pub fn number(description: impl Into<String>) -> Self {
        Self::new(FieldType::Number, description)
    }

    pub fn integer(description: impl Into<String>) -> Self {
        Self::new(FieldType::Integer, description)
    }

    pub fn boolean(description: impl Into<String>) -> Self {
        Self::new(FieldType::Boolean, description)
    }

    pub fn one_of(variants: &'static [&'static str], description: impl Into<String>) -> Self {
        Self::new(FieldType::Enum(variants), description)
    }

    /// Mark the field optional. Absent values stay absent.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Mark the field optional with a value used when it is absent.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.required = false;
        self.default = Some(value.into());
        self
    }

    fn to_json_schema(&self) -> Value {
        let mut property = json_schema_property(self.field_type.json_type(), &self.description);
        if let FieldType::Enum(variants) = &self.field_type {
            property["enum"] = json!(variants);
        }
        if let Some(default) = &self.default {
            property["default"] = default.clone();
        }
        property
    }
}

// =============================================================================
// Schema
// =============================================================================

/// Ordered argument declaration for one tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<(String, FieldSpec)>,
}

impl Schema {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field. Declaration order is preserved everywhere.
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.push((name.into(), spec));
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check the declaration itself: unique names, non-empty descriptions,
    /// defaults that satisfy their own type.
    pub fn check(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for (name, spec) in &self.fields {
            if name.is_empty() {
                return Err("field name cannot be empty".to_string());
            }
            if !seen.insert(name.as_str()) {
                return Err(format!("duplicate field '{}'", name));
            }
            if spec.description.trim().is_empty() {
                return Err(format!("field '{}' has no description", name));
            }
            if let Some(default) = &spec.default {
                spec.field_type
                    .check(default)
                    .map_err(|e| format!("default for field '{}': {}", name, e))?;
            }
        }
        Ok(())
    }

    /// Validate an untrusted argument bag.
    ///
    /// Defaults are applied before type checks. Undeclared fields are dropped.
    /// Every violation is reported, not just the first.
    pub fn validate(&self, arguments: Value) -> Result<ToolArguments, ValidationError> {
        let mut provided = match arguments {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(ValidationError::single(
                    "arguments",
                    format!("expected object, got {}", value_type_name(&other)),
                ))
            }
        };

        let mut validated = Map::new();
        let mut issues = Vec::new();

        for (name, spec) in &self.fields {
            let value = provided.remove(name).or_else(|| spec.default.clone());
            match value {
                None if spec.required => issues.push(FieldIssue::new(name, "missing required field")),
                None => {}
                Some(value) => match spec.field_type.check(&value) {
                    Ok(Some(normalized)) => {
                        validated.insert(name.clone(), normalized);
                    }
                    Ok(None) => {
                        validated.insert(name.clone(), value);
                    }
                    Err(problem) => issues.push(FieldIssue::new(name, problem)),
                },
            }
        }

        if issues.is_empty() {
            Ok(ToolArguments(validated))
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Derive the JSON Schema advertised as a tool's `inputSchema`.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for (name, spec) in &self.fields {
            properties.insert(name.clone(), spec.to_json_schema());
        }
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|(_, spec)| spec.required)
            .map(|(name, _)| name.as_str())
            .collect();
        json_schema_object(Value::Object(properties), required)
    }
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: Value, required: Vec<&str>) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_property(json_type: &str, description: &str) -> Value {
    json!({
        "type": json_type,
        "description": description
    })
}

// =============================================================================
// Validated arguments
// =============================================================================

/// Arguments that passed [`Schema::validate`], with defaults applied.
///
/// Handlers only ever see this type, never the raw argument bag.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolArguments(Map<String, Value>);

impl ToolArguments {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Deserialize into a handler's typed argument struct.
    pub fn parse<T: DeserializeOwned>(self) -> Result<T, ValidationError> {
        serde_json::from_value(Value::Object(self.0))
            .map_err(|e| ValidationError::single("arguments", e.to_string()))
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

// =============================================================================
// Validation errors
// =============================================================================

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub problem: String,
}

impl FieldIssue {
    fn new(field: &str, problem: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            problem: problem.into(),
        }
    }
}

/// Arguments rejected by a schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid arguments: {}", format_issues(.issues))]
pub struct ValidationError {
    issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn single(field: &str, problem: impl Into<String>) -> Self {
        Self {
            issues: vec![FieldIssue::new(field, problem)],
        }
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }
}

/// `field: problem` pairs joined with `; `.
fn format_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{}: {}", issue.field, issue.problem))
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Tests
// =============================================================================
