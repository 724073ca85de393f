//! Mention parsing
//!
//! A mention is an `@` followed by one or more ASCII alphanumerics or
//! underscores, anchored at the start of the input. Everything after it,
//! including newlines, is the task.

use once_cell::sync::Lazy;
use regex::Regex;

static MENTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^(@[A-Za-z0-9_]+)\s*(.*)$").expect("mention pattern is valid")
});

static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@[A-Za-z0-9_]+$").expect("tag pattern is valid"));

/// A leading mention split from its task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention<'a> {
    /// The `@tag` token, verbatim
    pub tag: &'a str,
    /// Remainder after the tag and any whitespace, trimmed
    pub task: &'a str,
}

/// Split a leading `@tag` from `input`. Returns `None` when the input does not
/// begin with a mention.
pub fn parse_mention(input: &str) -> Option<Mention<'_>> {
    let captures = MENTION_PATTERN.captures(input)?;
    let tag = captures.get(1)?.as_str();
    let task = captures.get(2).map_or("", |m| m.as_str()).trim();
    Some(Mention { tag, task })
}

/// Whether `tag` is a syntactically valid mention tag
pub fn is_valid_tag(tag: &str) -> bool {
    TAG_PATTERN.is_match(tag)
}
