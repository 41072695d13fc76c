// Shared prompt constants and prompt-building utilities.
// Each suggestion kind defines its own template in suggestion/prompts.rs.
// This file contains cross-cutting prompt fragments.

/// System instruction that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured career advisor. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON array. \
    Do NOT include explanations or apologies.";

/// Closing line appended to every suggestion prompt.
pub const JSON_ARRAY_ONLY: &str = "Respond only with the JSON array and no other text.";

/// Rendered in place of an empty list so the prompt never carries a blank fragment.
pub const NONE_SPECIFIED: &str = "None specified";

/// Joins items with `sep`, or returns `NONE_SPECIFIED` when nothing is left to render.
pub fn join_or_none<S: AsRef<str>>(items: &[S], sep: &str) -> String {
    let rendered: Vec<&str> = items
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .collect();
    if rendered.is_empty() {
        NONE_SPECIFIED.to_string()
    } else {
        rendered.join(sep)
    }
}

/// Fills `{key}` placeholders in a single pass, so substituted user text is never
/// itself scanned for placeholders. Unknown `{...}` sequences are left as-is.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let candidate = &rest[open + 1..];
        let hit = values.iter().find(|(key, _)| {
            candidate.starts_with(key) && candidate[key.len()..].starts_with('}')
        });
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &candidate[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = candidate;
            }
        }
    }
    out.push_str(rest);
    out
}
