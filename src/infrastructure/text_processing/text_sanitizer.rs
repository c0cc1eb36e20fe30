use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[a-zA-Z][^>]*>").unwrap());
static STYLE_OVERRIDE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\\[^}]*\}").unwrap());
static SPEAKER_DASH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-–—]\s*").unwrap());

/// Cleans one subtitle cue line: NFKC, formatting tags, dialogue dashes
/// and runs of whitespace.
pub fn sanitize_dialogue_line(raw: &str) -> String {
    let normalized: String = raw.nfkc().collect();
    let without_tags = MARKUP_TAG.replace_all(&normalized, "");
    let without_overrides = STYLE_OVERRIDE.replace_all(&without_tags, "");
    let trimmed = without_overrides.trim();
    let without_dash = SPEAKER_DASH.replace(trimmed, "");

    let mut result = String::with_capacity(without_dash.len());
    collapse_internal_whitespace(&without_dash, &mut result);
    result.trim().to_string()
}

fn collapse_internal_whitespace(line: &str, out: &mut String) {
    let mut prev_was_space = false;

    for ch in line.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                out.push(' ');
                prev_was_space = true;
            }
        } else {
            out.push(ch);
            prev_was_space = false;
        }
    }
}
