use std::path::Path;

use crate::config::schema::{Config, ProgressConfig};
use crate::error::ConfigError;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        message: message.into(),
    }
}

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.max_size_bytes == 0 {
        return Err(invalid("maxSizeBytes must be greater than zero"));
    }

    if config.allowed_types.is_empty() {
        return Err(invalid("allowedTypes must not be empty"));
    }

    for mime in &config.allowed_types {
        if !mime.contains('/') || mime.trim() != mime {
            return Err(invalid(format!("Invalid MIME type in allowedTypes: '{}'", mime)));
        }
    }

    validate_progress(&config.progress)?;

    let links = &config.links;
    for (name, value) in [
        ("fileBaseUrl", &links.file_base_url),
        ("thumbnailBaseUrl", &links.thumbnail_base_url),
        ("shareBaseUrl", &links.share_base_url),
    ] {
        if value.trim().is_empty() {
            return Err(invalid(format!("links.{} must not be empty", name)));
        }
    }
    if links.share_token_length == 0 {
        return Err(invalid("links.shareTokenLength must be greater than zero"));
    }

    Ok(())
}

/// Checks the progress trajectory settings on their own, for configs built in code.
pub fn validate_progress(progress: &ProgressConfig) -> Result<(), ConfigError> {
    // A step of at least 1 keeps truncated progress strictly increasing.
    if progress.min_step.is_nan()
        || progress.max_step.is_nan()
        || progress.min_step < 1.0
        || progress.min_step >= progress.max_step
    {
        return Err(invalid(format!(
            "progress step range must satisfy 1 <= minStep < maxStep (got {}..{})",
            progress.min_step, progress.max_step
        )));
    }
    if progress.max_step > 100.0 {
        return Err(invalid("progress.maxStep must not exceed 100"));
    }
    if progress.min_interval_ms >= progress.max_interval_ms {
        return Err(invalid(format!(
            "progress interval range must satisfy minIntervalMs < maxIntervalMs (got {}..{})",
            progress.min_interval_ms, progress.max_interval_ms
        )));
    }
    Ok(())
}
