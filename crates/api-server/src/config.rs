use analysis_core::LookbackPeriod;
use anyhow::{bail, Context};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// JSON registry file; the built-in registry is used when unset
    pub registry_path: Option<PathBuf>,
    pub request_delay: Duration,
    pub scan_concurrency: usize,
    pub lookback: LookbackPeriod,
    pub default_min_score: f64,
    /// Yahoo requests per minute
    pub yahoo_rate_limit: usize,
    pub cache_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            registry_path: None,
            request_delay: Duration::from_millis(500),
            scan_concurrency: 1,
            lookback: LookbackPeriod::SixMonths,
            default_min_score: 50.0,
            yahoo_rate_limit: 60,
            cache_ttl: Duration::from_secs(300),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source. Unset or blank keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let lookback = match get("AGRO_LOOKBACK") {
            Some(raw) => LookbackPeriod::parse(&raw)
                .with_context(|| format!("AGRO_LOOKBACK: unsupported period '{}'", raw))?,
            None => defaults.lookback,
        };

        let config = Self {
            bind_addr: parse_or("AGRO_BIND_ADDR", get("AGRO_BIND_ADDR"), defaults.bind_addr)?,
            registry_path: get("AGRO_REGISTRY_PATH").map(PathBuf::from),
            request_delay: Duration::from_millis(parse_or(
                "AGRO_REQUEST_DELAY_MS",
                get("AGRO_REQUEST_DELAY_MS"),
                defaults.request_delay.as_millis() as u64,
            )?),
            scan_concurrency: parse_or(
                "AGRO_SCAN_CONCURRENCY",
                get("AGRO_SCAN_CONCURRENCY"),
                defaults.scan_concurrency,
            )?,
            lookback,
            default_min_score: parse_or(
                "AGRO_DEFAULT_MIN_SCORE",
                get("AGRO_DEFAULT_MIN_SCORE"),
                defaults.default_min_score,
            )?,
            yahoo_rate_limit: parse_or("YAHOO_RATE_LIMIT", get("YAHOO_RATE_LIMIT"), defaults.yahoo_rate_limit)?,
            cache_ttl: Duration::from_secs(parse_or(
                "AGRO_CACHE_TTL_SECS",
                get("AGRO_CACHE_TTL_SECS"),
                defaults.cache_ttl.as_secs(),
            )?),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.scan_concurrency == 0 {
            bail!("AGRO_SCAN_CONCURRENCY must be at least 1");
        }
        if self.yahoo_rate_limit == 0 {
            bail!("YAHOO_RATE_LIMIT must be at least 1");
        }
        if !(0.0..=100.0).contains(&self.default_min_score) {
            bail!("AGRO_DEFAULT_MIN_SCORE must be within 0-100, got {}", self.default_min_score);
        }
        Ok(())
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{}: invalid value '{}'", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> anyhow::Result<ServerConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(from_pairs(&[]).unwrap(), ServerConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("AGRO_BIND_ADDR", "127.0.0.1:8080"),
            ("AGRO_REGISTRY_PATH", "/etc/agro/registry.json"),
            ("AGRO_REQUEST_DELAY_MS", "250"),
            ("AGRO_SCAN_CONCURRENCY", "4"),
            ("AGRO_LOOKBACK", "1y"),
            ("AGRO_DEFAULT_MIN_SCORE", "60"),
            ("YAHOO_RATE_LIMIT", "30"),
            ("AGRO_CACHE_TTL_SECS", "0"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.registry_path, Some(PathBuf::from("/etc/agro/registry.json")));
        assert_eq!(config.request_delay, Duration::from_millis(250));
        assert_eq!(config.scan_concurrency, 4);
        assert_eq!(config.lookback, LookbackPeriod::OneYear);
        assert_eq!(config.default_min_score, 60.0);
        assert_eq!(config.yahoo_rate_limit, 30);
        assert!(config.cache_ttl.is_zero());
    }

    #[test]
    fn test_blank_values_keep_defaults() {
        let config = from_pairs(&[("AGRO_REQUEST_DELAY_MS", "  ")]).unwrap();
        assert_eq!(config.request_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(from_pairs(&[("AGRO_REQUEST_DELAY_MS", "soon")]).is_err());
        assert!(from_pairs(&[("AGRO_LOOKBACK", "5y")]).is_err());
        assert!(from_pairs(&[("AGRO_SCAN_CONCURRENCY", "0")]).is_err());
        assert!(from_pairs(&[("AGRO_DEFAULT_MIN_SCORE", "150")]).is_err());
        assert!(from_pairs(&[("AGRO_BIND_ADDR", "localhost")]).is_err());
    }
}
