//! Handlebars prompt templates.
//!
//! Templates are compiled once, when the owning flow is built. Rendering only
//! does lookup, `#each`/`#if`/`#unless` blocks and the registered helpers, and
//! never HTML-escapes. Rendering is lenient: a field absent from the data
//! renders as an empty string, since optional profile fields are often unset.

use campus_core::{CampusError, Result};
use handlebars::Handlebars;
use serde::Serialize;

/// A compiled prompt template.
pub struct PromptTemplate {
    name: String,
    handlebars: Handlebars<'static>,
}

impl PromptTemplate {
    /// Compile `source`. A syntax error fails here, not at render time.
    pub fn new(name: impl Into<String>, source: &str) -> Result<Self> {
        let name = name.into();
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.register_helper("default", Box::new(default_helper));
        handlebars
            .register_template_string(&name, source)
            .map_err(|e| CampusError::Template(format!("{name}: {e}")))?;
        Ok(Self { name, handlebars })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render<T: Serialize>(&self, data: &T) -> Result<String> {
        self.handlebars
            .render(&self.name, data)
            .map_err(|e| CampusError::Template(format!("{}: {e}", self.name)))
    }
}

impl std::fmt::Debug for PromptTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptTemplate").field("name", &self.name).finish()
    }
}

/// `{{default value "fallback"}}` writes `value` unless it is missing, null or empty.
fn default_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    let value = h.param(0).map(|p| p.value()).filter(|v| match v {
        serde_json::Value::Null => false,
        serde_json::Value::String(s) => !s.is_empty(),
        _ => true,
    });
    let rendered = match value {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => h.param(1).and_then(|p| p.value().as_str()).unwrap_or_default().to_string(),
    };
    out.write(&rendered)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_each_with_last_separator() {
        let t = PromptTemplate::new(
            "courses",
            "Courses: {{#each courses}}{{{this}}}{{#unless @last}}, {{/unless}}{{/each}}",
        )
        .unwrap();
        let out = t.render(&json!({"courses": ["CS101", "MATH300", "PHYS201"]})).unwrap();
        assert_eq!(out, "Courses: CS101, MATH300, PHYS201");
    }

    #[test]
    fn test_nested_lookup_and_no_escaping() {
        let t = PromptTemplate::new("user", "{{currentUser.name}} asks: {{query}}").unwrap();
        let out = t
            .render(&json!({"currentUser": {"name": "Alex"}, "query": "Is 3 < 4 & \"true\"?"}))
            .unwrap();
        assert_eq!(out, "Alex asks: Is 3 < 4 & \"true\"?");
    }

    #[test]
    fn test_if_else_and_default_helper() {
        let t = PromptTemplate::new(
            "cond",
            "{{#if subject}}Subject: {{subject}}{{else}}No subject{{/if}} / {{default style \"Any\"}}",
        )
        .unwrap();
        assert_eq!(t.render(&json!({"subject": "Physics"})).unwrap(), "Subject: Physics / Any");
        assert_eq!(t.render(&json!({"style": "Quiet"})).unwrap(), "No subject / Quiet");
    }

    #[test]
    fn test_missing_optional_field_renders_empty() {
        let t = PromptTemplate::new("opt", "Style: {{studyStyle}}{{#if major}} ({{major}}){{/if}}.").unwrap();
        assert_eq!(t.render(&json!({"name": "Alex"})).unwrap(), "Style: .");
    }

    #[test]
    fn test_syntax_error_at_construction() {
        let err = PromptTemplate::new("broken", "{{#each items}}unterminated").unwrap_err();
        assert!(matches!(err, CampusError::Template(_)));
    }
}
