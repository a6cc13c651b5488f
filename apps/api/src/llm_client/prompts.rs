// Shared prompt constants and prompt-building utilities.
// Each pipeline that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Instruction appended to every JSON-mode system prompt.
/// JSON mode requires the word "JSON" to appear in the conversation.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    You MUST respond with a valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Closing line shared by every system prompt.
pub const CLOSING_INSTRUCTION: &str = "Please do your best. Let's start!";

/// Expressions the calm tone forbids, even when the user's notes use them.
pub const PROHIBITED_EXPRESSIONS: &[&str] = &["추천", "너무", "정말", "특별한", "최고"];

/// Renders `PROHIBITED_EXPRESSIONS` as a quoted, comma-separated list.
pub fn prohibited_expressions() -> String {
    PROHIBITED_EXPRESSIONS
        .iter()
        .map(|e| format!("\"{e}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders a list as a JSON array for embedding into a prompt.
pub fn json_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| items.join(", "))
}

/// Fills `{name}` placeholders in a single pass. Substituted text is never
/// rescanned, so user input containing `{...}` stays as written. Unknown
/// placeholders and literal braces are kept.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let filled = after.find('}').and_then(|end| {
            let name = &after[..end];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, end))
        });
        match filled {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
