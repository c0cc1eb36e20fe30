use crate::presentation::config::{Environment, LoggingSettings};

/// Configuration for tracing initialization.
pub struct TracingConfig {
    pub service: &'static str,
    pub environment: String,
    pub level: String,
    pub json_format: bool,
}

impl TracingConfig {
    /// `LOG_FORMAT=json` forces JSON output regardless of settings.
    pub fn from_settings(
        service: &'static str,
        environment: Environment,
        logging: &LoggingSettings,
    ) -> Self {
        let json_from_env = std::env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Self {
            service,
            environment: environment.to_string(),
            level: logging.level.clone(),
            json_format: logging.enable_json || json_from_env,
        }
    }

    pub(super) fn default_directives(&self) -> String {
        format!("info,demohub={},tower_http=debug", self.level)
    }
}
