//! Server configuration.
//!
//! Every setting has a default and can be overridden through the environment
//! (a `.env` file is honoured). Values that are present but malformed stop start-up.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::numbering::{PersistencePolicy, DEFAULT_CERTIFICATE_PREFIX};

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_address: String,
    pub port: u16,
    /// Rendered PDFs are kept here as `<id>.pdf`.
    pub documents_dir: PathBuf,
    /// `logo.png`, `header.png` and `footer.png`.
    pub assets_dir: PathBuf,
    pub counter_file: PathBuf,
    pub numbering_strict: bool,
    pub certificate_prefix: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            documents_dir: PathBuf::from("./documents"),
            assets_dir: PathBuf::from("./static"),
            counter_file: PathBuf::from("./data/certificate_counter.json"),
            numbering_strict: false,
            certificate_prefix: DEFAULT_CERTIFICATE_PREFIX.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `BIND_ADDRESS` (default: `0.0.0.0`)
    /// - `PORT` (default: 8080)
    /// - `DOCUMENTS_DIR` (default: `./documents`)
    /// - `ASSETS_DIR` (default: `./static`)
    /// - `COUNTER_FILE` (default: `./data/certificate_counter.json`)
    /// - `NUMBERING_STRICT` (default: false)
    /// - `CERTIFICATE_PREFIX` (default: `RPS/CERT`)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got '{}'", raw))?,
            None => defaults.port,
        };
        let numbering_strict = match get("NUMBERING_STRICT") {
            Some(raw) => parse_bool(&raw)
                .with_context(|| format!("NUMBERING_STRICT must be true or false, got '{}'", raw))?,
            None => defaults.numbering_strict,
        };
        let certificate_prefix = get("CERTIFICATE_PREFIX")
            .map(|p| p.trim_end_matches('/').to_string())
            .unwrap_or(defaults.certificate_prefix);
        if certificate_prefix.is_empty() {
            anyhow::bail!("CERTIFICATE_PREFIX must not be empty");
        }

        Ok(Self {
            bind_address: get("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port,
            documents_dir: get("DOCUMENTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.documents_dir),
            assets_dir: get("ASSETS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.assets_dir),
            counter_file: get("COUNTER_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.counter_file),
            numbering_strict,
            certificate_prefix,
        })
    }

    pub fn persistence_policy(&self) -> PersistencePolicy {
        if self.numbering_strict {
            PersistencePolicy::Strict
        } else {
            PersistencePolicy::BestEffort
        }
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("not a boolean"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.persistence_policy(), PersistencePolicy::BestEffort);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PORT", "9090"),
            ("DOCUMENTS_DIR", "/srv/docs"),
            ("NUMBERING_STRICT", "TRUE"),
            ("CERTIFICATE_PREFIX", "LAB/CAL/"),
        ])
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.documents_dir, PathBuf::from("/srv/docs"));
        assert_eq!(config.persistence_policy(), PersistencePolicy::Strict);
        assert_eq!(config.certificate_prefix, "LAB/CAL");
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(load(&[("PORT", "eighty")]).is_err());
        assert!(load(&[("NUMBERING_STRICT", "maybe")]).is_err());
        assert!(load(&[("CERTIFICATE_PREFIX", "///")]).is_err());
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = load(&[("PORT", "  "), ("ASSETS_DIR", "")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.assets_dir, PathBuf::from("./static"));
    }
}
