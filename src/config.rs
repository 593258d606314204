//! Configuration loaded from environment variables.

use std::env;

use anyhow::{Context, Result};

/// Default size ceiling for an uploaded SVG (10 MB).
pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Runtime configuration for the upload guard.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Master switch. When false, every SVG upload is rejected outright
    /// rather than passed through unsanitized.
    pub enabled: bool,

    /// Restrict SVG uploads to administrators.
    pub admin_only: bool,

    /// Maximum candidate size in bytes.
    pub max_file_size: usize,
}

impl GuardConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let enabled = env::var("SVGWARD_ENABLED")
            .map(|v| parse_bool(&v))
            .unwrap_or(true);

        let admin_only = env::var("SVGWARD_ADMIN_ONLY")
            .map(|v| parse_bool(&v))
            .unwrap_or(false);

        let max_file_size = match env::var("SVGWARD_MAX_FILE_SIZE") {
            Ok(v) => v
                .parse()
                .context("SVGWARD_MAX_FILE_SIZE must be a valid usize")?,
            Err(_) => DEFAULT_MAX_FILE_SIZE,
        };

        Ok(Self {
            enabled,
            admin_only,
            max_file_size,
        })
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            admin_only: false,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("1"));
        assert!(parse_bool("true"));
        assert!(parse_bool("Yes"));
        assert!(parse_bool(" on "));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn test_defaults() {
        let config = GuardConfig::default();
        assert!(config.enabled);
        assert!(!config.admin_only);
        assert_eq!(config.max_file_size, DEFAULT_MAX_FILE_SIZE);
    }
}
