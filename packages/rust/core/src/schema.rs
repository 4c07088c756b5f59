//! A JSON-Schema subset, enough for structural content contracts.
//!
//! Supported keywords: `type`, `required`, `properties`,
//! `additionalProperties`, `items`, `enum`, `const`, `minLength`,
//! `maxLength`, `pattern`, `minimum`, `maximum`, `minItems`, `maxItems` and
//! `format` (`uri`, `uri-reference`, `date`). Annotations such as `title`
//! and `description` are accepted. Any other keyword is reported by
//! [`Schema::unsupported_keywords`] so the loader can refuse the file.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use faqkit_shared::ValidationIssue;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One schema node.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(default, rename = "type")]
    pub types: Option<TypeSet>,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, Schema>,
    #[serde(default)]
    pub additional_properties: Option<Additional>,
    #[serde(default)]
    pub items: Option<Box<Schema>>,
    #[serde(default, rename = "enum")]
    pub enumeration: Option<Vec<Value>>,
    #[serde(default, rename = "const")]
    pub constant: Option<Value>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    #[serde(default)]
    pub pattern: Option<Pattern>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub format: Option<String>,
    /// Keywords not interpreted above.
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

/// Keywords that carry no validation meaning.
const ANNOTATIONS: &[&str] = &[
    "$schema",
    "$id",
    "$comment",
    "title",
    "description",
    "default",
    "examples",
    "deprecated",
    "readOnly",
    "writeOnly",
];

/// `type` as a single name or a list of names.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    One(JsonType),
    Many(Vec<JsonType>),
}

impl TypeSet {
    fn allows(&self, value: &Value) -> bool {
        match self {
            Self::One(ty) => ty.matches(value),
            Self::Many(types) => types.iter().any(|ty| ty.matches(value)),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::One(ty) => ty.name().to_string(),
            Self::Many(types) => types
                .iter()
                .map(|ty| ty.name())
                .collect::<Vec<_>>()
                .join(" or "),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    Null,
    Boolean,
    Object,
    Array,
    Number,
    String,
    Integer,
}

impl JsonType {
    fn matches(self, value: &Value) -> bool {
        match self {
            Self::Null => value.is_null(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
            Self::Number => value.is_number(),
            Self::String => value.is_string(),
            Self::Integer => match value {
                Value::Number(n) => {
                    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
                }
                _ => false,
            },
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Number => "number",
            Self::String => "string",
            Self::Integer => "integer",
        }
    }
}

/// `additionalProperties`: a flag or a schema for the extra properties.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Additional {
    Allowed(bool),
    Schema(Box<Schema>),
}

/// A `pattern` keyword, compiled when the schema is loaded.
#[derive(Debug, Clone)]
pub struct Pattern(pub Regex);

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Regex::new(&source)
            .map(Pattern)
            .map_err(|e| serde::de::Error::custom(format!("invalid pattern {source:?}: {e}")))
    }
}

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date regex"));

static URI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:[^\s]*$").expect("uri regex"));

impl Schema {
    /// Check `value` and return every violation found. Empty means valid.
    pub fn validate(&self, value: &Value) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        self.check(value, "", &mut issues);
        issues
    }

    /// Schema locations (JSON pointers) of keywords this subset cannot
    /// enforce, such as `/allOf` or `/properties/status/not`.
    pub fn unsupported_keywords(&self) -> Vec<String> {
        let mut found = Vec::new();
        self.collect_unsupported("", &mut found);
        found
    }

    fn collect_unsupported(&self, path: &str, found: &mut Vec<String>) {
        found.extend(
            self.other
                .keys()
                .filter(|key| !ANNOTATIONS.contains(&key.as_str()))
                .map(|key| child(path, key)),
        );
        for (name, schema) in &self.properties {
            schema.collect_unsupported(&child(&child(path, "properties"), name), found);
        }
        if let Some(Additional::Schema(schema)) = &self.additional_properties {
            schema.collect_unsupported(&child(path, "additionalProperties"), found);
        }
        if let Some(schema) = &self.items {
            schema.collect_unsupported(&child(path, "items"), found);
        }
    }

    fn check(&self, value: &Value, path: &str, issues: &mut Vec<ValidationIssue>) {
        if let Some(types) = &self.types {
            if !types.allows(value) {
                push(issues, path, format!("expected {}", types.describe()), value);
                return;
            }
        }

        if let Some(allowed) = &self.enumeration {
            if !allowed.contains(value) {
                push(issues, path, "value is not one of the allowed values".into(), value);
            }
        }
        if let Some(expected) = &self.constant {
            if expected != value {
                push(issues, path, format!("expected constant {expected}"), value);
            }
        }

        match value {
            Value::String(text) => self.check_string(text, value, path, issues),
            Value::Number(n) => {
                if let Some(f) = n.as_f64() {
                    self.check_number(f, value, path, issues);
                }
            }
            Value::Array(items) => self.check_array(items, value, path, issues),
            Value::Object(map) => self.check_object(map, path, issues),
            _ => {}
        }
    }

    fn check_string(
        &self,
        text: &str,
        value: &Value,
        path: &str,
        issues: &mut Vec<ValidationIssue>,
    ) {
        let len = text.chars().count();
        if let Some(min) = self.min_length {
            if len < min {
                push(issues, path, format!("shorter than {min} characters"), value);
            }
        }
        if let Some(max) = self.max_length {
            if len > max {
                push(issues, path, format!("longer than {max} characters"), value);
            }
        }
        if let Some(Pattern(re)) = &self.pattern {
            if !re.is_match(text) {
                push(issues, path, format!("does not match pattern {}", re.as_str()), value);
            }
        }
        if let Some(format) = &self.format {
            if !format_matches(format, text) {
                push(issues, path, format!("not a valid {format}"), value);
            }
        }
    }

    fn check_number(&self, n: f64, value: &Value, path: &str, issues: &mut Vec<ValidationIssue>) {
        if let Some(min) = self.minimum {
            if n < min {
                push(issues, path, format!("less than minimum {min}"), value);
            }
        }
        if let Some(max) = self.maximum {
            if n > max {
                push(issues, path, format!("greater than maximum {max}"), value);
            }
        }
    }

    fn check_array(
        &self,
        items: &[Value],
        value: &Value,
        path: &str,
        issues: &mut Vec<ValidationIssue>,
    ) {
        if let Some(min) = self.min_items {
            if items.len() < min {
                push(issues, path, format!("fewer than {min} items"), value);
            }
        }
        if let Some(max) = self.max_items {
            if items.len() > max {
                push(issues, path, format!("more than {max} items"), value);
            }
        }
        if let Some(schema) = &self.items {
            for (i, item) in items.iter().enumerate() {
                schema.check(item, &format!("{path}/{i}"), issues);
            }
        }
    }

    fn check_object(
        &self,
        map: &serde_json::Map<String, Value>,
        path: &str,
        issues: &mut Vec<ValidationIssue>,
    ) {
        for name in &self.required {
            if !map.contains_key(name) {
                issues.push(ValidationIssue {
                    path: display_path(&child(path, name)),
                    message: "required property is missing".into(),
                    value: None,
                });
            }
        }

        for (name, child_value) in map {
            let child_path = child(path, name);
            match (self.properties.get(name), &self.additional_properties) {
                (Some(schema), _) => schema.check(child_value, &child_path, issues),
                (None, Some(Additional::Allowed(false))) => {
                    push(
                        issues,
                        &child_path,
                        "additional property is not allowed".into(),
                        child_value,
                    );
                }
                (None, Some(Additional::Schema(schema))) => {
                    schema.check(child_value, &child_path, issues);
                }
                (None, _) => {}
            }
        }
    }
}

fn format_matches(format: &str, text: &str) -> bool {
    match format {
        "date" => DATE_RE.is_match(text),
        "uri" => URI_RE.is_match(text),
        "uri-reference" => !text.chars().any(char::is_whitespace),
        _ => true,
    }
}

/// JSON-pointer child path, escaping `~` and `/` in the segment.
fn child(path: &str, name: &str) -> String {
    format!("{path}/{}", name.replace('~', "~0").replace('/', "~1"))
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

fn push(issues: &mut Vec<ValidationIssue>, path: &str, message: String, value: &Value) {
    issues.push(ValidationIssue {
        path: display_path(path),
        message,
        value: Some(value.clone()),
    });
}
