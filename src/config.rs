use std::path::PathBuf;

use crate::utils::errors::ConfigError;

const OUTPUT_VAR: &str = "GOODS_CHART_OUTPUT";
const DEFAULT_OUTPUT: &str = "goods_chart.html";

/// Runtime settings read from the environment (after `.env` is loaded)
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Where the rendered page is written
    pub output_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let output_path = match lookup(OUTPUT_VAR) {
            Some(value) if value.trim().is_empty() => return Err(ConfigError::EmptyValue(OUTPUT_VAR)),
            Some(value) => PathBuf::from(value.trim()),
            None => PathBuf::from(DEFAULT_OUTPUT),
        };

        Ok(AppConfig { output_path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.output_path, PathBuf::from("goods_chart.html"));
    }

    #[test]
    fn test_output_path_override() {
        let config = AppConfig::from_lookup(|_| Some(" /tmp/prices.html ".to_string())).unwrap();
        assert_eq!(config.output_path, PathBuf::from("/tmp/prices.html"));
    }

    #[test]
    fn test_empty_output_path_rejected() {
        let err = AppConfig::from_lookup(|_| Some("  ".to_string())).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyValue("GOODS_CHART_OUTPUT")));
    }
}
