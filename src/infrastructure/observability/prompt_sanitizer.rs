use regex::Regex;
use std::sync::LazyLock;

const MAX_VISIBLE_CHARS: usize = 100;

static SECRET_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(bearer |api_key=|password=|secret=|token=)[^\s&"']+"#).unwrap()
});
static OPENAI_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"sk-[A-Za-z0-9_\-]{8,}").unwrap());

/// Shortens user text for logs and masks anything that looks like a credential.
pub fn sanitize_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let redacted = redact_sensitive_patterns(trimmed);
    let total_chars = redacted.chars().count();

    if total_chars > MAX_VISIBLE_CHARS {
        let visible: String = redacted.chars().take(MAX_VISIBLE_CHARS).collect();
        format!("{}... ({} chars total)", visible, total_chars)
    } else {
        redacted
    }
}

fn redact_sensitive_patterns(text: &str) -> String {
    let masked = SECRET_ASSIGNMENT.replace_all(text, "${1}[REDACTED]");
    OPENAI_KEY.replace_all(&masked, "sk-[REDACTED]").into_owned()
}
