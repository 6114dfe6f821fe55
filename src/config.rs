//! Configuration loader — merges env vars, .env file, and config.toml.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use common::{AppConfig, Error};

const MAX_CACHE_TTL_SECS: u64 = 86_400;
const MAX_HTTP_TIMEOUT_SECS: u64 = 300;

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    let parsed = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

fn validate_config(config: &AppConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.bind_addr.parse::<SocketAddr>().is_err() {
        issues.push(format!(
            "bind_addr must be host:port, got {:?}",
            config.bind_addr
        ));
    }
    if !(config.api_base_url.starts_with("http://") || config.api_base_url.starts_with("https://"))
    {
        issues.push("api_base_url must start with http:// or https://".into());
    }
    if config.cache_ttl_secs == 0 || config.cache_ttl_secs > MAX_CACHE_TTL_SECS {
        issues.push(format!(
            "cache_ttl_secs must be between 1 and {MAX_CACHE_TTL_SECS}, got {}",
            config.cache_ttl_secs
        ));
    }
    if config.http_timeout_secs == 0 || config.http_timeout_secs > MAX_HTTP_TIMEOUT_SECS {
        issues.push(format!(
            "http_timeout_secs must be between 1 and {MAX_HTTP_TIMEOUT_SECS}, got {}",
            config.http_timeout_secs
        ));
    }
    if let Some(path) = &config.fallback_path {
        if path.as_os_str().is_empty() {
            issues.push("fallback_path must not be empty when set".into());
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Load service configuration from environment and optional config file.
pub fn load_config() -> Result<AppConfig, Error> {
    // 1. Load .env file from project root or parent directories.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults, replaced wholesale by config.toml if present.
    let mut config = AppConfig::default();

    let config_path = Path::new("config.toml");
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config.toml: {}", e)))?;
        config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config.toml: {}", e)))?;
    }

    // 3. Override with environment variables (highest priority).
    if let Ok(addr) = std::env::var("FX_BIND_ADDR") {
        config.bind_addr = addr.trim().to_string();
    }
    if let Ok(url) = std::env::var("FX_API_BASE_URL") {
        config.api_base_url = url.trim().trim_end_matches('/').to_string();
    }
    if let Ok(raw) = std::env::var("FX_CACHE_TTL_SECS") {
        config.cache_ttl_secs = parse_positive_u64(&raw, "FX_CACHE_TTL_SECS")?;
    }
    if let Ok(raw) = std::env::var("FX_HTTP_TIMEOUT_SECS") {
        config.http_timeout_secs = parse_positive_u64(&raw, "FX_HTTP_TIMEOUT_SECS")?;
    }
    if let Ok(raw) = std::env::var("FX_FALLBACK_PATH") {
        let trimmed = raw.trim();
        config.fallback_path = (!trimmed.is_empty()).then(|| PathBuf::from(trimmed));
    }

    validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_all_issues_are_reported() {
        let config = AppConfig {
            bind_addr: "localhost".into(),
            api_base_url: "ftp://example.com".into(),
            cache_ttl_secs: 0,
            http_timeout_secs: 0,
            fallback_path: None,
        };

        let Err(Error::Config(msg)) = validate_config(&config) else {
            panic!("expected config error");
        };
        assert!(msg.contains("bind_addr"));
        assert!(msg.contains("api_base_url"));
        assert!(msg.contains("cache_ttl_secs"));
        assert!(msg.contains("http_timeout_secs"));
    }

    #[test]
    fn test_oversized_durations_are_rejected() {
        let config = AppConfig {
            cache_ttl_secs: 10_000_000_000_000_000,
            http_timeout_secs: u64::MAX,
            ..AppConfig::default()
        };

        let Err(Error::Config(msg)) = validate_config(&config) else {
            panic!("expected config error");
        };
        assert!(msg.contains("cache_ttl_secs must be between 1 and 86400"));
        assert!(msg.contains("http_timeout_secs must be between 1 and 300"));

        let config = AppConfig {
            cache_ttl_secs: MAX_CACHE_TTL_SECS,
            http_timeout_secs: MAX_HTTP_TIMEOUT_SECS,
            ..AppConfig::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_parse_positive_u64() {
        assert_eq!(parse_positive_u64(" 60 ", "X").unwrap(), 60);
        assert!(parse_positive_u64("0", "X").is_err());
        assert!(parse_positive_u64("-5", "X").is_err());
        assert!(parse_positive_u64("soon", "X").is_err());
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            bind_addr = "127.0.0.1:9000"
            cache_ttl_secs = 60
            fallback_path = "data/sample_fx.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.cache_ttl_secs, 60);
        assert_eq!(config.http_timeout_secs, 10);
        assert_eq!(
            config.fallback_path.as_deref(),
            Some(Path::new("data/sample_fx.json"))
        );
        assert!(validate_config(&config).is_ok());
    }
}
