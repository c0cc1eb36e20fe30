use std::sync::LazyLock;

use regex::Regex;

pub const PERFECT_CODE_VERDICT: &str = "The code is perfect";

static BUG_REPORT_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[\s#*]*(?:1[.)][ \t]*)?\**[ \t]*bug report[ \t]*\**[ \t]*:?[ \t]*\**[ \t]*").unwrap()
});

static FIXED_CODE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[\s#*]*(?:2[.)][ \t]*)?\**[ \t]*fixed code[ \t]*\**[ \t]*:?[ \t]*\**[ \t]*").unwrap()
});

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[\w+#-]*[ \t]*\r?\n(.*?)```").unwrap());

/// Reviewer answer split into its two mandatory parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeReview {
    pub bug_report: String,
    pub fixed_code: String,
}

impl CodeReview {
    /// Splits a model answer into bug report and fixed code.
    ///
    /// Falls back to the whole answer as the report and the submitted code
    /// as the fix when the model ignores the two-part layout, so callers
    /// always get both parts.
    pub fn parse(raw: &str, submitted_code: &str) -> Self {
        let raw = raw.trim();

        let Some(fixed_heading) = FIXED_CODE_HEADING.find(raw) else {
            let report = strip_heading(&BUG_REPORT_HEADING, raw);
            return Self {
                bug_report: non_empty_or(report, raw),
                fixed_code: submitted_code.to_string(),
            };
        };

        let report_section = &raw[..fixed_heading.start()];
        let bug_report = strip_heading(&BUG_REPORT_HEADING, report_section);
        let fixed_section = &raw[fixed_heading.end()..];
        let fixed_code = unfence(fixed_section);

        Self {
            bug_report: non_empty_or(bug_report, PERFECT_CODE_VERDICT),
            fixed_code: non_empty_or(fixed_code, submitted_code),
        }
    }

    pub fn is_perfect(&self) -> bool {
        self.bug_report
            .to_lowercase()
            .contains(&PERFECT_CODE_VERDICT.to_lowercase())
    }
}

fn strip_heading(heading: &Regex, section: &str) -> String {
    let section = section.trim();
    match heading.find(section) {
        Some(m) if m.start() == 0 => section[m.end()..].trim().to_string(),
        _ => section.to_string(),
    }
}

fn unfence(section: &str) -> String {
    if let Some(captures) = FENCED_BLOCK.captures(section) {
        return captures[1].trim_end().to_string();
    }

    // unterminated fence
    let trimmed = section.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => rest
            .split_once('\n')
            .map(|(_, body)| body.trim_end().to_string())
            .unwrap_or_default(),
        None => trimmed.to_string(),
    }
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
