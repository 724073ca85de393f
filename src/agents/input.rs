//! Structured task input
//!
//! Turns the free text after a mention into the named fields a prompt
//! template expects. Parsing happens before any LLM call, so a missing
//! required field never costs a request.

use crate::error::{HubError, HubResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// Named values substituted into a prompt template
pub type PromptFields = BTreeMap<String, String>;

/// A `Label:` section inside a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Text that introduces the section. Matched case-sensitively, followed by a colon,
    /// at the start of the task or after whitespace
    pub label: &'static str,
    /// Prompt field the section fills
    pub field: &'static str,
    pub required: bool,
}

impl Marker {
    pub const fn required(label: &'static str, field: &'static str) -> Self {
        Self {
            label,
            field,
            required: true,
        }
    }

    pub const fn optional(label: &'static str, field: &'static str) -> Self {
        Self {
            label,
            field,
            required: false,
        }
    }

    fn pattern(&self) -> HubResult<Regex> {
        let mut cache = MARKER_PATTERNS
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(pattern) = cache.get(self.label) {
            return Ok(pattern.clone());
        }

        let pattern = Regex::new(&format!(r"(?:^|\s){}\s*:", regex::escape(self.label)))
            .map_err(|e| HubError::internal(format!("bad marker '{}': {e}", self.label)))?;
        cache.insert(self.label, pattern.clone());
        Ok(pattern)
    }
}

/// Compiled marker patterns keyed by label
static MARKER_PATTERNS: Lazy<Mutex<HashMap<&'static str, Regex>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// How an agent's task text is split into prompt fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputShape {
    /// The whole task fills one required field
    Freeform {
        field: &'static str,
        label: &'static str,
    },
    /// First whitespace-separated token is required; the rest is optional
    LeadingToken {
        field: &'static str,
        label: &'static str,
        rest: &'static str,
    },
    /// Text before the first marker fills `field`; each marker fills its own field
    Marked {
        field: &'static str,
        label: &'static str,
        markers: &'static [Marker],
    },
}

impl InputShape {
    /// Parse `task`. `usage` is the agent's `@tag <hint>` and is echoed in
    /// validation errors.
    pub fn parse(&self, task: &str, usage: &str) -> HubResult<PromptFields> {
        let task = task.trim();
        let mut fields = PromptFields::new();

        match self {
            InputShape::Freeform { field, label } => {
                if task.is_empty() {
                    return Err(HubError::missing_input(*label, usage));
                }
                fields.insert(field.to_string(), task.to_string());
            }
            InputShape::LeadingToken { field, label, rest } => {
                let mut parts = task.splitn(2, char::is_whitespace);
                let head = parts.next().unwrap_or_default();
                if head.is_empty() {
                    return Err(HubError::missing_input(*label, usage));
                }
                fields.insert(field.to_string(), head.to_string());
                fields.insert(
                    rest.to_string(),
                    parts.next().unwrap_or_default().trim().to_string(),
                );
            }
            InputShape::Marked {
                field,
                label,
                markers,
            } => {
                parse_marked(task, usage, field, label, markers, &mut fields)?;
            }
        }

        Ok(fields)
    }
}

fn parse_marked(
    task: &str,
    usage: &str,
    field: &str,
    label: &str,
    markers: &[Marker],
    fields: &mut PromptFields,
) -> HubResult<()> {
    // (start, end, marker index) for every marker occurrence
    let mut hits = Vec::new();
    for (index, marker) in markers.iter().enumerate() {
        for found in marker.pattern()?.find_iter(task) {
            hits.push((found.start(), found.end(), index));
        }
    }
    hits.sort_unstable();

    let primary_end = hits.first().map_or(task.len(), |hit| hit.0);
    let primary = task[..primary_end].trim();
    if primary.is_empty() {
        return Err(HubError::missing_input(label, usage));
    }
    fields.insert(field.to_string(), primary.to_string());

    for (position, &(_, value_start, index)) in hits.iter().enumerate() {
        let marker = &markers[index];
        let value_end = hits.get(position + 1).map_or(task.len(), |next| next.0);
        let value = task[value_start..value_end].trim();

        if fields.contains_key(marker.field) {
            return Err(HubError::invalid_input(format!(
                "'{}:' may only appear once. Usage: {usage}",
                marker.label
            )));
        }
        fields.insert(marker.field.to_string(), value.to_string());
    }

    for marker in markers {
        let value = fields.get(marker.field).map(String::as_str).unwrap_or("");
        if marker.required && value.is_empty() {
            return Err(HubError::missing_input(marker.label, usage));
        }
        fields.entry(marker.field.to_string()).or_default();
    }

    Ok(())
}
