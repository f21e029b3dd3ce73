//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::{ContentKeys, ProxyConfig};
use crate::config::validation::{validate_config, ValidationError};
use crate::content::KeyPath;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ProxyConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load the content-keys document and compile its paths.
///
/// The document is TOML with a single `keys` array of colon-delimited path
/// strings; order is preserved.
pub fn load_content_keys(path: &Path) -> Result<Vec<KeyPath>, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let keys: ContentKeys = toml::from_str(&content).map_err(ConfigError::Parse)?;

    Ok(keys.keys.iter().map(|raw| KeyPath::parse(raw)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_parses_with_defaults() {
        let parsed: ProxyConfig = toml::from_str(
            r#"
            [upstreams]
            frontend_url = "http://127.0.0.1:3000"
            backend_url = "http://127.0.0.1:3001"
            frontend_hostname = "app.example.com"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.upstreams.frontend_hostname, "app.example.com");
        assert_eq!(parsed.listener.bind_address, "0.0.0.0:8000");
        assert_eq!(parsed.scoring.threshold, 0.7);
        assert!(parsed.listener.tls.is_none());
    }

    #[test]
    fn test_content_keys_preserve_order() {
        let keys: ContentKeys = toml::from_str(
            r#"
            keys = ["user:profile:email", "message", "meta:origin"]
            "#,
        )
        .unwrap();

        let paths: Vec<KeyPath> = keys.keys.iter().map(|raw| KeyPath::parse(raw)).collect();
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[0].segments(), ["user", "profile", "email"]);
        assert_eq!(paths[1].segments(), ["message"]);
        assert_eq!(paths[2].segments(), ["meta", "origin"]);
    }
}
