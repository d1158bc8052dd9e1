//! Declarative payload schemas.
//!
//! A [`Schema`] is a tree of typed constraints. [`Schema::validate`] walks a
//! candidate JSON value against it and returns either the normalized value
//! (declared defaults filled in, undeclared keys dropped) or every violation
//! found. The same tree exports to the OpenAPI subset the model API accepts
//! for `responseSchema` and function parameters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    String(StringSchema),
    Number(NumberSchema),
    Boolean { description: Option<String> },
    Enum(EnumSchema),
    Array(ArraySchema),
    Object(ObjectSchema),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringSchema {
    pub description: Option<String>,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberSchema {
    pub description: Option<String>,
    pub integer: bool,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumSchema {
    pub description: Option<String>,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    pub description: Option<String>,
    pub items: Box<Schema>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    pub description: Option<String>,
    pub fields: Vec<Field>,
}

/// A named property of an [`ObjectSchema`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub schema: Schema,
    pub required: bool,
    pub default: Option<Value>,
}

/// The constraint a value failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Constraint {
    Type { expected: String },
    Required,
    MinLength { min: usize },
    MaxLength { max: usize },
    Minimum { min: f64 },
    Maximum { max: f64 },
    Integer,
    MinItems { min: usize },
    MaxItems { max: usize },
    OneOf { allowed: Vec<String> },
}

/// One failed constraint, located by a path such as `history[0].content[0].text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub path: String,
    pub constraint: Constraint,
    pub actual: Value,
}

impl Violation {
    pub fn new(path: impl Into<String>, constraint: Constraint, actual: Value) -> Self {
        Self { path: path.into(), constraint, actual }
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::Type { expected } => write!(f, "expected {expected}"),
            Constraint::Required => f.write_str("is required"),
            Constraint::MinLength { min } => write!(f, "must be at least {min} characters"),
            Constraint::MaxLength { max } => write!(f, "must be at most {max} characters"),
            Constraint::Minimum { min } => write!(f, "must be >= {min}"),
            Constraint::Maximum { max } => write!(f, "must be <= {max}"),
            Constraint::Integer => f.write_str("must be an integer"),
            Constraint::MinItems { min } => write!(f, "must have at least {min} items"),
            Constraint::MaxItems { max } => write!(f, "must have at most {max} items"),
            Constraint::OneOf { allowed } => write!(f, "must be one of [{}]", allowed.join(", ")),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = if self.path.is_empty() { "<root>" } else { self.path.as_str() };
        write!(f, "{path} {}", self.constraint)
    }
}

impl Schema {
    pub fn string() -> StringSchema {
        StringSchema::default()
    }

    pub fn number() -> NumberSchema {
        NumberSchema::default()
    }

    pub fn integer() -> NumberSchema {
        NumberSchema { integer: true, ..Default::default() }
    }

    pub fn boolean() -> Schema {
        Schema::Boolean { description: None }
    }

    pub fn enumeration<I, S>(values: I) -> EnumSchema
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EnumSchema { description: None, values: values.into_iter().map(Into::into).collect() }
    }

    pub fn array(items: impl Into<Schema>) -> ArraySchema {
        ArraySchema { description: None, items: Box::new(items.into()), min_items: None, max_items: None }
    }

    pub fn object() -> ObjectSchema {
        ObjectSchema::default()
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Schema::String(s) => s.description.as_deref(),
            Schema::Number(s) => s.description.as_deref(),
            Schema::Boolean { description } => description.as_deref(),
            Schema::Enum(s) => s.description.as_deref(),
            Schema::Array(s) => s.description.as_deref(),
            Schema::Object(s) => s.description.as_deref(),
        }
    }

    pub fn describe(mut self, text: impl Into<String>) -> Self {
        let text = Some(text.into());
        match &mut self {
            Schema::String(s) => s.description = text,
            Schema::Number(s) => s.description = text,
            Schema::Boolean { description } => *description = text,
            Schema::Enum(s) => s.description = text,
            Schema::Array(s) => s.description = text,
            Schema::Object(s) => s.description = text,
        }
        self
    }

    /// Validate `value`, returning the normalized value or every violation found.
    pub fn validate(&self, value: &Value) -> Result<Value, Vec<Violation>> {
        let mut violations = Vec::new();
        let normalized = self.check(value, "", &mut violations);
        match normalized {
            Some(v) if violations.is_empty() => Ok(v),
            _ => Err(violations),
        }
    }

    fn check(&self, value: &Value, path: &str, out: &mut Vec<Violation>) -> Option<Value> {
        match self {
            Schema::String(s) => s.check(value, path, out),
            Schema::Number(s) => s.check(value, path, out),
            Schema::Boolean { .. } => match value {
                Value::Bool(_) => Some(value.clone()),
                _ => mismatch("boolean", value, path, out),
            },
            Schema::Enum(s) => s.check(value, path, out),
            Schema::Array(s) => s.check(value, path, out),
            Schema::Object(s) => s.check(value, path, out),
        }
    }

    /// Export as the OpenAPI-style schema the model API understands.
    pub fn to_model_schema(&self) -> Value {
        let mut out = match self {
            Schema::String(_) => json!({ "type": "STRING" }),
            Schema::Number(s) => {
                let mut v = json!({ "type": if s.integer { "INTEGER" } else { "NUMBER" } });
                if let Some(min) = s.minimum {
                    v["minimum"] = json!(min);
                }
                if let Some(max) = s.maximum {
                    v["maximum"] = json!(max);
                }
                v
            }
            Schema::Boolean { .. } => json!({ "type": "BOOLEAN" }),
            Schema::Enum(s) => json!({ "type": "STRING", "format": "enum", "enum": s.values }),
            Schema::Array(s) => {
                let mut v = json!({ "type": "ARRAY", "items": s.items.to_model_schema() });
                if let Some(min) = s.min_items {
                    v["minItems"] = json!(min);
                }
                if let Some(max) = s.max_items {
                    v["maxItems"] = json!(max);
                }
                v
            }
            Schema::Object(s) => {
                let mut properties = Map::new();
                for field in &s.fields {
                    properties.insert(field.name.clone(), field.schema.to_model_schema());
                }
                let required: Vec<&str> =
                    s.fields.iter().filter(|f| f.required).map(|f| f.name.as_str()).collect();
                let ordering: Vec<&str> = s.fields.iter().map(|f| f.name.as_str()).collect();
                let mut v = json!({
                    "type": "OBJECT",
                    "properties": properties,
                    "propertyOrdering": ordering,
                });
                if !required.is_empty() {
                    v["required"] = json!(required);
                }
                v
            }
        };
        if let Some(description) = self.description() {
            out["description"] = json!(description);
        }
        out
    }
}

fn mismatch(expected: &str, value: &Value, path: &str, out: &mut Vec<Violation>) -> Option<Value> {
    out.push(Violation::new(path, Constraint::Type { expected: expected.to_string() }, value.clone()));
    None
}

fn child_path(path: &str, name: &str) -> String {
    if path.is_empty() { name.to_string() } else { format!("{path}.{name}") }
}

impl StringSchema {
    pub fn min_len(mut self, n: usize) -> Self {
        self.min_len = Some(n);
        self
    }

    pub fn max_len(mut self, n: usize) -> Self {
        self.max_len = Some(n);
        self
    }

    /// Shorthand for `min_len(1)`.
    pub fn non_empty(self) -> Self {
        self.min_len(1)
    }

    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    fn check(&self, value: &Value, path: &str, out: &mut Vec<Violation>) -> Option<Value> {
        let Value::String(s) = value else {
            return mismatch("string", value, path, out);
        };
        let len = s.chars().count();
        let before = out.len();
        if let Some(min) = self.min_len.filter(|&min| len < min) {
            out.push(Violation::new(path, Constraint::MinLength { min }, value.clone()));
        }
        if let Some(max) = self.max_len.filter(|&max| len > max) {
            out.push(Violation::new(path, Constraint::MaxLength { max }, value.clone()));
        }
        (out.len() == before).then(|| value.clone())
    }
}

impl NumberSchema {
    pub fn min(mut self, n: f64) -> Self {
        self.minimum = Some(n);
        self
    }

    pub fn max(mut self, n: f64) -> Self {
        self.maximum = Some(n);
        self
    }

    pub fn range(self, min: f64, max: f64) -> Self {
        self.min(min).max(max)
    }

    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    fn check(&self, value: &Value, path: &str, out: &mut Vec<Violation>) -> Option<Value> {
        let Value::Number(n) = value else {
            return mismatch(if self.integer { "integer" } else { "number" }, value, path, out);
        };
        let before = out.len();
        if self.integer && !(n.is_i64() || n.is_u64()) {
            out.push(Violation::new(path, Constraint::Integer, value.clone()));
        }
        let x = n.as_f64().unwrap_or(f64::NAN);
        if let Some(min) = self.minimum.filter(|&min| x < min) {
            out.push(Violation::new(path, Constraint::Minimum { min }, value.clone()));
        }
        if let Some(max) = self.maximum.filter(|&max| x > max) {
            out.push(Violation::new(path, Constraint::Maximum { max }, value.clone()));
        }
        (out.len() == before).then(|| value.clone())
    }
}

impl EnumSchema {
    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    fn check(&self, value: &Value, path: &str, out: &mut Vec<Violation>) -> Option<Value> {
        let Value::String(s) = value else {
            return mismatch("string", value, path, out);
        };
        if self.values.iter().any(|v| v == s) {
            Some(value.clone())
        } else {
            out.push(Violation::new(
                path,
                Constraint::OneOf { allowed: self.values.clone() },
                value.clone(),
            ));
            None
        }
    }
}

impl ArraySchema {
    pub fn min_items(mut self, n: usize) -> Self {
        self.min_items = Some(n);
        self
    }

    pub fn max_items(mut self, n: usize) -> Self {
        self.max_items = Some(n);
        self
    }

    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    fn check(&self, value: &Value, path: &str, out: &mut Vec<Violation>) -> Option<Value> {
        let Value::Array(items) = value else {
            return mismatch("array", value, path, out);
        };
        let before = out.len();
        if let Some(min) = self.min_items.filter(|&min| items.len() < min) {
            out.push(Violation::new(path, Constraint::MinItems { min }, value.clone()));
        }
        if let Some(max) = self.max_items.filter(|&max| items.len() > max) {
            out.push(Violation::new(path, Constraint::MaxItems { max }, value.clone()));
        }
        let normalized: Vec<Value> = items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| self.items.check(item, &format!("{path}[{i}]"), out))
            .collect();
        (out.len() == before).then_some(Value::Array(normalized))
    }
}

impl ObjectSchema {
    pub fn required(mut self, name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            schema: schema.into(),
            required: true,
            default: None,
        });
        self
    }

    pub fn optional(mut self, name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            schema: schema.into(),
            required: false,
            default: None,
        });
        self
    }

    /// An optional field that takes `default` when absent.
    pub fn with_default(
        mut self,
        name: impl Into<String>,
        schema: impl Into<Schema>,
        default: Value,
    ) -> Self {
        self.fields.push(Field {
            name: name.into(),
            schema: schema.into(),
            required: false,
            default: Some(default),
        });
        self
    }

    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn check(&self, value: &Value, path: &str, out: &mut Vec<Violation>) -> Option<Value> {
        let Value::Object(map) = value else {
            return mismatch("object", value, path, out);
        };
        let before = out.len();
        let mut normalized = Map::new();
        for field in &self.fields {
            let field_path = child_path(path, &field.name);
            match map.get(&field.name).filter(|v| !v.is_null()) {
                Some(v) => {
                    if let Some(v) = field.schema.check(v, &field_path, out) {
                        normalized.insert(field.name.clone(), v);
                    }
                }
                None => {
                    if let Some(default) = &field.default {
                        normalized.insert(field.name.clone(), default.clone());
                    } else if field.required {
                        out.push(Violation::new(field_path, Constraint::Required, Value::Null));
                    }
                }
            }
        }
        (out.len() == before).then_some(Value::Object(normalized))
    }
}

impl From<StringSchema> for Schema {
    fn from(s: StringSchema) -> Self {
        Schema::String(s)
    }
}

impl From<NumberSchema> for Schema {
    fn from(s: NumberSchema) -> Self {
        Schema::Number(s)
    }
}

impl From<EnumSchema> for Schema {
    fn from(s: EnumSchema) -> Self {
        Schema::Enum(s)
    }
}

impl From<ArraySchema> for Schema {
    fn from(s: ArraySchema) -> Self {
        Schema::Array(s)
    }
}

impl From<ObjectSchema> for Schema {
    fn from(s: ObjectSchema) -> Self {
        Schema::Object(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chat_schema() -> Schema {
        let turn = Schema::object()
            .required("role", Schema::enumeration(["user", "model"]))
            .required("content", Schema::array(Schema::object().required("text", Schema::string())));
        Schema::object()
            .required("subject", Schema::string().non_empty())
            .required("query", Schema::string().non_empty())
            .with_default("history", Schema::array(turn), json!([]))
            .into()
    }

    #[test]
    fn test_valid_input_is_normalized() {
        let input = json!({
            "subject": "Calculus",
            "query": "What is a limit?",
            "extra": "dropped"
        });
        let normalized = chat_schema().validate(&input).unwrap();
        assert_eq!(
            normalized,
            json!({"subject": "Calculus", "query": "What is a limit?", "history": []})
        );
    }

    #[test]
    fn test_missing_required_and_empty_string() {
        let violations = chat_schema().validate(&json!({"query": ""})).unwrap_err();
        let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["subject", "query"]);
        assert_eq!(violations[0].constraint, Constraint::Required);
        assert_eq!(violations[1].constraint, Constraint::MinLength { min: 1 });
    }

    #[test]
    fn test_nested_paths() {
        let input = json!({
            "subject": "Physics",
            "query": "Why?",
            "history": [{"role": "assistant", "content": [{"text": 3}]}]
        });
        let violations = chat_schema().validate(&input).unwrap_err();
        let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["history[0].role", "history[0].content[0].text"]);
        assert!(matches!(violations[0].constraint, Constraint::OneOf { .. }));
        assert_eq!(violations[1].actual, json!(3));
    }

    #[test]
    fn test_integer_range() {
        let schema: Schema = Schema::integer().range(0.0, 100.0).into();
        assert!(schema.validate(&json!(85)).is_ok());
        assert_eq!(
            schema.validate(&json!(101)).unwrap_err()[0].constraint,
            Constraint::Maximum { max: 100.0 }
        );
        assert_eq!(schema.validate(&json!(85.5)).unwrap_err()[0].constraint, Constraint::Integer);
        assert!(schema.validate(&json!("85")).is_err());
    }

    #[test]
    fn test_array_bounds() {
        let schema: Schema = Schema::array(Schema::string()).min_items(1).max_items(3).into();
        assert!(schema.validate(&json!(["a"])).is_ok());
        assert_eq!(
            schema.validate(&json!([])).unwrap_err()[0].constraint,
            Constraint::MinItems { min: 1 }
        );
        assert_eq!(
            schema.validate(&json!(["a", "b", "c", "d"])).unwrap_err()[0].constraint,
            Constraint::MaxItems { max: 3 }
        );
    }

    #[test]
    fn test_null_optional_is_absent() {
        let schema: Schema = Schema::object()
            .required("response", Schema::string())
            .optional("location", Schema::object().required("name", Schema::string()))
            .into();
        let normalized = schema.validate(&json!({"response": "hi", "location": null})).unwrap();
        assert_eq!(normalized, json!({"response": "hi"}));
    }

    #[test]
    fn test_violation_display() {
        let v = Violation::new("rating", Constraint::Maximum { max: 5.0 }, json!(6));
        assert_eq!(v.to_string(), "rating must be <= 5");
        let root = Violation::new("", Constraint::Type { expected: "object".into() }, json!(1));
        assert_eq!(root.to_string(), "<root> expected object");
    }

    #[test]
    fn test_model_schema_export() {
        let schema: Schema = Schema::object()
            .describe("A match")
            .required("name", Schema::string().describe("Buddy name"))
            .required("similarityScore", Schema::integer().range(0.0, 100.0))
            .optional("mood", Schema::enumeration(["calm", "tense"]))
            .into();
        let exported = schema.to_model_schema();
        assert_eq!(exported["type"], "OBJECT");
        assert_eq!(exported["description"], "A match");
        assert_eq!(exported["required"], json!(["name", "similarityScore"]));
        assert_eq!(exported["propertyOrdering"], json!(["name", "similarityScore", "mood"]));
        assert_eq!(exported["properties"]["name"]["description"], "Buddy name");
        assert_eq!(exported["properties"]["similarityScore"]["type"], "INTEGER");
        assert_eq!(exported["properties"]["similarityScore"]["maximum"], json!(100.0));
        assert_eq!(exported["properties"]["mood"]["format"], "enum");
    }

    proptest! {
        #[test]
        fn prop_string_length_bounds(s in "\\PC{0,40}") {
            let schema: Schema = Schema::string().min_len(10).max_len(30).into();
            let len = s.chars().count();
            let ok = schema.validate(&Value::String(s)).is_ok();
            prop_assert_eq!(ok, (10..=30).contains(&len));
        }

        #[test]
        fn prop_normalized_value_revalidates(
            subject in "[A-Za-z ]{1,20}",
            query in "\\PC{1,60}",
            texts in proptest::collection::vec("\\PC{0,20}", 0..6),
        ) {
            let history: Vec<Value> = texts
                .iter()
                .enumerate()
                .map(|(i, t)| json!({
                    "role": if i % 2 == 0 { "user" } else { "model" },
                    "content": [{"text": t}],
                }))
                .collect();
            let input = json!({"subject": subject, "query": query, "history": history});
            let schema = chat_schema();
            let first = schema.validate(&input).unwrap();
            let second = schema.validate(&first).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
