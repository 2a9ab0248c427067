use std::{fs, path::Path};
use anyhow::{anyhow, Result};
use regex::Regex;
use tracing::{debug, error, info};

use crate::config::settings::{LoggingConfig, ServiceConfig};
use crate::config::validator::validate_service_config;

/// Load and validate config from YAML file.
///
/// A missing file is not an error: every setting has a default.
pub async fn file_to_config(path: &Path) -> Result<ServiceConfig> {
    if !path.exists() {
        info!("config file {} not found, using defaults", path.display());
        return finalize(ServiceConfig::default());
    }
    let content = fs::read_to_string(path)?;

    let expanded = expand_env_vars(&content);
    parse_config(expanded)
}

pub fn parse_config(content: String) -> Result<ServiceConfig> {
    let service_config: ServiceConfig = if content.trim().is_empty() {
        ServiceConfig::default()
    } else {
        serde_yaml::from_str(&content).inspect_err(|e| error!("parse config error: {}", e))?
    };
    finalize(service_config)
}

fn finalize(mut service_config: ServiceConfig) -> Result<ServiceConfig> {
    // Apply defaults
    if service_config.settings.logging.is_none() {
        service_config.settings.logging = Some(LoggingConfig::default());
    }
    debug!("validation config ...");
    validate_service_config(&service_config)
        .map_err(|errors| anyhow!("config is not valid: {}", errors.join("; ")))?;

    Ok(service_config)
}

/// Replace `${VAR}` and `${VAR:default}` with environment values.
pub fn expand_env_vars(input: &str) -> String {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]*))?\}").expect("static regex");
    re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}
