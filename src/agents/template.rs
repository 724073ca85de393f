//! Prompt templates
//!
//! A small subset of mustache: `{{field}}` and `{{{field}}}` substitute a
//! prompt field verbatim, and `{{#if field}}…{{else}}…{{/if}}` keeps one
//! branch depending on whether the field is non-empty. Conditionals are
//! resolved first, then placeholders are replaced in a single pass so that
//! user text containing braces is never expanded again.

use crate::agents::input::PromptFields;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeSet;

static IF_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\{\{#if\s+(\w+)\s*\}\}(.*?)(?:\{\{else\}\}(.*?))?\{\{/if\}\}")
        .expect("if-block pattern is valid")
});

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\{\s*(\w+)\s*\}\}\}|\{\{\s*(\w+)\s*\}\}").expect("placeholder pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate(&'static str);

impl PromptTemplate {
    pub const fn new(source: &'static str) -> Self {
        Self(source)
    }

    pub fn source(&self) -> &'static str {
        self.0
    }

    pub fn render(&self, fields: &PromptFields) -> String {
        let is_set = |name: &str| fields.get(name).is_some_and(|v| !v.trim().is_empty());

        let resolved = IF_BLOCK.replace_all(self.0, |caps: &Captures| {
            let branch = if is_set(&caps[1]) { caps.get(2) } else { caps.get(3) };
            branch.map_or(String::new(), |m| m.as_str().to_string())
        });

        PLACEHOLDER
            .replace_all(&resolved, |caps: &Captures| {
                let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
                fields.get(name).cloned().unwrap_or_default()
            })
            .into_owned()
    }

    /// Every field name the template refers to
    pub fn placeholders(&self) -> BTreeSet<&'static str> {
        let source = self.0;
        let mut names: BTreeSet<&'static str> = IF_BLOCK
            .captures_iter(source)
            .filter_map(|caps| caps.get(1).map(|m| &source[m.range()]))
            .collect();
        names.extend(
            PLACEHOLDER
                .captures_iter(source)
                .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
                .map(|m| &source[m.range()]),
        );
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> PromptFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_double_and_triple_braces() {
        let template = PromptTemplate::new("Scan: {{scanResults}} / {{{ scanResults }}}");
        let rendered = template.render(&fields(&[("scanResults", "22/tcp <open>")]));
        assert_eq!(rendered, "Scan: 22/tcp <open> / 22/tcp <open>");
    }

    #[test]
    fn test_missing_field_renders_empty() {
        let template = PromptTemplate::new("[{{{absent}}}]");
        assert_eq!(template.render(&PromptFields::new()), "[]");
    }

    #[test]
    fn test_if_block_with_value() {
        let template =
            PromptTemplate::new("{{#if reviewFocus}}Focus on: {{{reviewFocus}}}{{/if}}.");
        assert_eq!(
            template.render(&fields(&[("reviewFocus", "security")])),
            "Focus on: security."
        );
        assert_eq!(template.render(&fields(&[("reviewFocus", "")])), ".");
    }

    #[test]
    fn test_if_else_block() {
        let template = PromptTemplate::new(
            "Logs:\n{{#if challengeLogs}}{{{challengeLogs}}}{{else}}None provided.{{/if}}",
        );
        assert_eq!(
            template.render(&fields(&[("challengeLogs", "tried sqlmap")])),
            "Logs:\ntried sqlmap"
        );
        assert_eq!(
            template.render(&fields(&[("challengeLogs", "  ")])),
            "Logs:\nNone provided."
        );
    }

    #[test]
    fn test_user_text_is_not_expanded() {
        let template = PromptTemplate::new("Task: {{{taskDescription}}} Goal: {{{goal}}}");
        let rendered = template.render(&fields(&[
            ("taskDescription", "print {{goal}} and {{#if x}}y{{/if}}"),
            ("goal", "G"),
        ]));
        assert_eq!(rendered, "Task: print {{goal}} and {{#if x}}y{{/if}} Goal: G");
    }

    #[test]
    fn test_placeholders() {
        let template = PromptTemplate::new(
            "{{{context}}} {{learningGoal}} {{#if targetAudience}}for {{{targetAudience}}}{{/if}}",
        );
        let names: Vec<_> = template.placeholders().into_iter().collect();
        assert_eq!(names, vec!["context", "learningGoal", "targetAudience"]);
    }
}
