use demohub::infrastructure::observability::{TracingConfig, sanitize_prompt};
use demohub::presentation::config::{Environment, LoggingSettings};

#[test]
fn given_blank_prompt_when_sanitizing_then_marks_it_empty() {
    assert_eq!(sanitize_prompt("   \n\t"), "[EMPTY]");
}

#[test]
fn given_short_prompt_when_sanitizing_then_keeps_trimmed_text() {
    assert_eq!(sanitize_prompt("  I'll be back  "), "I'll be back");
}

#[test]
fn given_long_prompt_when_sanitizing_then_truncates_with_total_length() {
    let prompt = "a".repeat(150);

    let sanitized = sanitize_prompt(&prompt);

    assert_eq!(sanitized, format!("{}... (150 chars total)", "a".repeat(100)));
}

#[test]
fn given_multibyte_prompt_when_truncating_then_cuts_on_char_boundary() {
    let prompt = "é".repeat(120);

    let sanitized = sanitize_prompt(&prompt);

    assert!(sanitized.starts_with(&"é".repeat(100)));
    assert!(sanitized.ends_with("(120 chars total)"));
}

#[test]
fn given_credentials_in_prompt_when_sanitizing_then_redacts_them() {
    let sanitized = sanitize_prompt(
        "Authorization: Bearer abc.def.ghi and password=hunter2 key sk-proj1234567890abcdef",
    );

    assert!(!sanitized.contains("abc.def.ghi"));
    assert!(!sanitized.contains("hunter2"));
    assert!(!sanitized.contains("1234567890abcdef"));
    assert!(sanitized.contains("Bearer [REDACTED]"));
    assert!(sanitized.contains("password=[REDACTED]"));
    assert!(sanitized.contains("sk-[REDACTED]"));
}

#[test]
fn given_mixed_case_secret_names_when_sanitizing_then_redacts_them() {
    let sanitized = sanitize_prompt("API_KEY=xyz&Token=abc");

    assert_eq!(sanitized, "API_KEY=[REDACTED]&Token=[REDACTED]");
}

#[test]
fn given_logging_settings_when_building_tracing_config_then_copies_level_and_format() {
    let logging = LoggingSettings {
        level: "trace".to_string(),
        enable_json: true,
    };

    let config = TracingConfig::from_settings("demohub", Environment::Prod, &logging);

    assert_eq!(config.service, "demohub");
    assert_eq!(config.environment, "Prod");
    assert_eq!(config.level, "trace");
    assert!(config.json_format);
}
