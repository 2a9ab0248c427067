//! Configuration validation with aggregated errors.

use tracing::{error, info};

use crate::config::settings::{ServiceConfig, SettingsConfig};

/// Returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);

    if errors.is_empty() {
        info!("config validated");
        Ok(())
    } else {
        for e in &errors {
            error!("config validation: {}", e);
        }
        Err(errors)
    }
}

fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if settings.request_timeout_ms == Some(0) {
        errors.push("settings.request_timeout_ms must be > 0".to_string());
    }

    for (name, url) in [
        ("settings.provider.token_url", &settings.provider.token_url),
        ("settings.provider.api_url", &settings.provider.api_url),
    ] {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(format!("{} must be an http(s) URL, got '{}'", name, url));
        }
    }

    if settings.server.host.trim().is_empty() {
        errors.push("settings.server.host must not be empty".to_string());
    }
    if settings.server.port.parse::<u16>().is_err() {
        errors.push(format!("settings.server.port '{}' is not a valid port", settings.server.port));
    }

    if settings.metrics.is_enabled && !settings.metrics.path.starts_with('/') {
        errors.push(format!("settings.metrics.path '{}' must start with '/'", settings.metrics.path));
    }

    if let Some(logging) = &settings.logging {
        let level = logging.level.to_lowercase();
        if !["trace", "debug", "info", "warn", "error"].contains(&level.as_str()) {
            errors.push(format!("settings.logging.level '{}' is not supported", logging.level));
        }
    }

    if let Some(fields) = &settings.serving.scaled_fields {
        if fields.iter().any(|f| f.trim().is_empty()) {
            errors.push("settings.serving.scaled_fields must not contain empty names".to_string());
        }
    }
}
