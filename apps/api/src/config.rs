use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::matching::DEFAULT_TOP_N;

/// Application configuration loaded from environment variables.
/// Every key has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub job_listings_path: PathBuf,
    pub skill_patterns_path: PathBuf,
    pub match_top_n: usize,
    pub max_upload_bytes: usize,
    pub debug: bool,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let debug = parse_bool(&get("APP_DEBUG", "false"))
            .context("APP_DEBUG must be true or false")?;
        let default_log = if debug { "debug" } else { "info" };

        Ok(Config {
            host: get("HOST", "127.0.0.1"),
            port: get("PORT", "5000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            upload_dir: get("UPLOAD_DIR", "uploads").into(),
            job_listings_path: get("JOB_LISTINGS_PATH", "data/job_listings.csv").into(),
            skill_patterns_path: get("SKILL_PATTERNS_PATH", "data/skill_patterns.jsonl").into(),
            match_top_n: get("MATCH_TOP_N", &DEFAULT_TOP_N.to_string())
                .parse::<usize>()
                .context("MATCH_TOP_N must be a non-negative integer")?,
            max_upload_bytes: get("MAX_UPLOAD_BYTES", "16777216")
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            debug,
            rust_log: get("RUST_LOG", default_log),
        })
    }

    /// Host and port to listen on. The host may be a name such as `localhost`.
    pub fn listen_addr(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("unrecognized boolean '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let c = config(&[]).unwrap();
        assert_eq!(c.host, "127.0.0.1");
        assert_eq!(c.port, 5000);
        assert_eq!(c.upload_dir, PathBuf::from("uploads"));
        assert_eq!(c.job_listings_path, PathBuf::from("data/job_listings.csv"));
        assert_eq!(c.skill_patterns_path, PathBuf::from("data/skill_patterns.jsonl"));
        assert_eq!(c.match_top_n, DEFAULT_TOP_N);
        assert_eq!(c.max_upload_bytes, 16 * 1024 * 1024);
        assert!(!c.debug);
        assert_eq!(c.rust_log, "info");
    }

    #[test]
    fn test_debug_raises_log_level() {
        let c = config(&[("APP_DEBUG", "true")]).unwrap();
        assert!(c.debug);
        assert_eq!(c.rust_log, "debug");
    }

    #[test]
    fn test_invalid_numbers_fail() {
        assert!(config(&[("PORT", "http")]).is_err());
        assert!(config(&[("MATCH_TOP_N", "-1")]).is_err());
        assert!(config(&[("APP_DEBUG", "maybe")]).is_err());
    }

    #[tokio::test]
    async fn test_hostname_listen_addr_binds() {
        let c = config(&[("HOST", "localhost"), ("PORT", "0")]).unwrap();
        assert_eq!(c.listen_addr(), ("localhost", 0));
        let listener = tokio::net::TcpListener::bind(c.listen_addr()).await.unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }
}
