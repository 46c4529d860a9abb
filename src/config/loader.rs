//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (OFFICE_GATE__*)
//! 2. Configuration file (TOML)
//! 3. Default values

use crate::config::types::{AppConfig, PolicySource};
use crate::error::ConfigError;
use axum::http::HeaderName;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "office-gate.toml",
    ".office-gate.toml",
    "~/.config/office-gate/config.toml",
    "/etc/office-gate/config.toml",
];

/// Environment variable prefix; `OFFICE_GATE__SERVER__PORT` maps to `server.port`
const ENV_PREFIX: &str = "OFFICE_GATE";

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    finish(config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. Start with defaults (handled by serde defaults on AppConfig)

    // 2. Add configuration file
    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // Try default paths (first existing one wins)
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // 3. Add environment variables, double underscore maps to nested keys
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    finish(config)
}

fn finish(config: Config) -> Result<AppConfig, ConfigError> {
    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.host.trim().is_empty() {
        return Err(ConfigError::Missing {
            field: "server.host".to_string(),
        });
    }

    if config.server.port == 0 {
        return Err(ConfigError::Invalid {
            message: "server.port must be greater than 0".to_string(),
        });
    }

    if let Err(e) = HeaderName::try_from(config.gate.client_ip_header.as_str()) {
        return Err(ConfigError::Invalid {
            message: format!(
                "gate.client_ip_header '{}' is not a valid header name: {}",
                config.gate.client_ip_header, e
            ),
        });
    }

    if config.policy.source == PolicySource::File && config.policy.path.trim().is_empty() {
        return Err(ConfigError::Missing {
            field: "policy.path (required when policy.source = \"file\")".to_string(),
        });
    }

    Ok(())
}
