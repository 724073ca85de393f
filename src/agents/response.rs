//! Pulling structured data out of raw LLM text
//!
//! Providers are asked for bare JSON, but models still wrap answers in
//! markdown fences or surround them with prose. These helpers recover the
//! payload in that order: raw JSON, fenced block, first balanced object.

use serde_json::Value;

/// A fenced code block found in a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Info string after the opening fence, lowercased; empty if absent
    pub language: String,
    pub code: String,
}

/// Parse a JSON object out of `response`
pub fn extract_json(response: &str) -> Option<Value> {
    let trimmed = response.trim();

    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    if let Some(json_str) = extract_json_from_markdown(trimmed) {
        if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(&json_str) {
            return Some(value);
        }
    }

    find_json_object(trimmed)
}

/// Extract JSON from markdown code blocks
fn extract_json_from_markdown(text: &str) -> Option<String> {
    if let Some(start) = text.find("```json") {
        let content = &text[start + 7..];
        if let Some(end) = content.find("```") {
            return Some(content[..end].trim().to_string());
        }
    }

    // Unlabelled fence that looks like an object
    if let Some(start) = text.find("```") {
        let content = &text[start + 3..];
        if let Some(end) = content.find("```") {
            let candidate = content[..end].trim();
            if candidate.starts_with('{') && candidate.ends_with('}') {
                return Some(candidate.to_string());
            }
        }
    }

    None
}

/// First balanced `{...}` that parses as JSON
fn find_json_object(text: &str) -> Option<Value> {
    let mut depth = 0usize;
    let mut start_pos = None;

    for (i, ch) in text.char_indices() {
        match ch {
            '{' => {
                if start_pos.is_none() {
                    start_pos = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(start) = start_pos.take() {
                        if let Ok(value) = serde_json::from_str::<Value>(&text[start..=i]) {
                            return Some(value);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    None
}

/// First fenced code block in `text`, if it has a closing fence
pub fn first_code_block(text: &str) -> Option<CodeBlock> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];
    let (info, body) = after_fence.split_once('\n')?;
    let end = body.find("```")?;

    let code = body[..end].trim_end().to_string();
    if code.trim().is_empty() {
        return None;
    }

    Some(CodeBlock {
        language: info.trim().to_ascii_lowercase(),
        code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_json() {
        let value = extract_json(r#"  {"summary": "two open ports"} "#).unwrap();
        assert_eq!(value, json!({"summary": "two open ports"}));
    }

    #[test]
    fn test_json_in_labelled_fence() {
        let response = "Here you go:\n```json\n{\"answer\": \"yes\"}\n```\nAnything else?";
        assert_eq!(extract_json(response).unwrap(), json!({"answer": "yes"}));
    }

    #[test]
    fn test_json_in_bare_fence() {
        let response = "```\n{\"advice\": \"start with recon\"}\n```";
        assert_eq!(
            extract_json(response).unwrap(),
            json!({"advice": "start with recon"})
        );
    }

    #[test]
    fn test_json_embedded_in_prose() {
        let response = "Result: {\"isValidFlagFormat\": true, \"confidenceScore\": 0.8} done";
        let value = extract_json(response).unwrap();
        assert_eq!(value["confidenceScore"], json!(0.8));
    }

    #[test]
    fn test_non_object_json_rejected() {
        assert!(extract_json("[1, 2, 3]").is_none());
        assert!(extract_json("\"just a string\"").is_none());
        assert!(extract_json("no json here").is_none());
    }

    #[test]
    fn test_stray_closing_brace_is_ignored() {
        let value = extract_json("} oops {\"a\": 1}").unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_first_code_block() {
        let text = "Here is the script:\n```Python\nprint('hi')\n```\nand more\n```rust\nfn main() {}\n```";
        let block = first_code_block(text).unwrap();
        assert_eq!(block.language, "python");
        assert_eq!(block.code, "print('hi')");
    }

    #[test]
    fn test_code_block_without_language() {
        let block = first_code_block("```\necho hi\n```").unwrap();
        assert_eq!(block.language, "");
        assert_eq!(block.code, "echo hi");
    }

    #[test]
    fn test_unterminated_or_empty_block() {
        assert!(first_code_block("```python\nprint('hi')").is_none());
        assert!(first_code_block("```\n\n```").is_none());
        assert!(first_code_block("no code").is_none());
    }
}
