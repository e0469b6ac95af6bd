use crate::storage::default_data_path;
use std::{env, path::PathBuf};

const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Runtime settings, all taken from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = non_empty("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let data_path = non_empty("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_path);

        Self {
            port,
            data_path,
            gemini_api_key: non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")),
            gemini_model: non_empty("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_api_base: non_empty("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config(&[]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_path, PathBuf::from("data/jdvp_data_v1.json"));
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn api_key_falls_back_and_blank_values_are_ignored() {
        let config = config(&[("GEMINI_API_KEY", "  "), ("API_KEY", "k-123"), ("PORT", "nope")]);
        assert_eq!(config.gemini_api_key.as_deref(), Some("k-123"));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn explicit_values_win() {
        let config = config(&[
            ("PORT", "9001"),
            ("APP_DATA_PATH", "/tmp/att.json"),
            ("GEMINI_API_KEY", "primary"),
            ("API_KEY", "secondary"),
            ("GEMINI_MODEL", "gemini-pro"),
        ]);
        assert_eq!(config.port, 9001);
        assert_eq!(config.data_path, PathBuf::from("/tmp/att.json"));
        assert_eq!(config.gemini_api_key.as_deref(), Some("primary"));
        assert_eq!(config.gemini_model, "gemini-pro");
    }
}
