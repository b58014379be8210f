//! Configuration loaded from the environment.
//!
//! `dotenvy::dotenv()` is called by the binary before `Config::from_env`;
//! everything here reads plain environment variables with defaults suitable
//! for local development.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TTL_SECS: u64 = 3600;
const DEFAULT_REAPER_INTERVAL_SECS: u64 = 600;
const DEFAULT_REAPER_GRACE_SECS: u64 = 30;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// Public base URL embedded in download links and QR codes,
    /// e.g. "http://localhost:3000".
    pub base_url: String,
    /// SQLite database URL, e.g. "sqlite://droplink.db".
    pub database_url: String,
    /// Root directory for stored blobs.
    pub storage_path: String,
    /// Time-to-live applied to every file group.
    pub file_ttl: Duration,
    /// Interval between reaper sweeps.
    pub reaper_interval: Duration,
    /// Grace window subtracted from "now" when selecting expired groups, so
    /// the reaper does not race a download that started just before expiry.
    pub reaper_grace: Duration,
    /// Allowed CORS origins; empty means allow any origin.
    pub cors_origins: Vec<String>,
    /// Request body limit for uploads.
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let server_port = parse_or("SERVER_PORT", DEFAULT_PORT)?;
        let base_url = env::var("BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", server_port));
        let config = Config {
            server_port,
            base_url: base_url.trim_end_matches('/').to_string(),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://droplink.db".to_string()),
            storage_path: env::var("STORAGE_PATH").unwrap_or_else(|_| "./data/blobs".to_string()),
            file_ttl: Duration::from_secs(parse_or("FILE_TTL_SECS", DEFAULT_TTL_SECS)?),
            reaper_interval: Duration::from_secs(parse_or(
                "REAPER_INTERVAL_SECS",
                DEFAULT_REAPER_INTERVAL_SECS,
            )?),
            reaper_grace: Duration::from_secs(parse_or(
                "REAPER_GRACE_SECS",
                DEFAULT_REAPER_GRACE_SECS,
            )?),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.file_ttl.is_zero(), "FILE_TTL_SECS must be positive");
        anyhow::ensure!(
            !self.reaper_interval.is_zero(),
            "REAPER_INTERVAL_SECS must be positive"
        );
        anyhow::ensure!(
            self.max_upload_bytes > 0,
            "MAX_UPLOAD_BYTES must be positive"
        );
        Ok(())
    }

    /// Canonical download URL for a share code. This is the only place link
    /// shape is decided; the QR image encodes exactly this string.
    pub fn download_link(&self, code: &str) -> String {
        format!("{}/download/{}", self.base_url, code)
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}", key)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_link_has_no_double_slash() {
        let config = Config {
            server_port: 3000,
            base_url: "http://localhost:3000".to_string(),
            database_url: "sqlite::memory:".to_string(),
            storage_path: "/tmp/blobs".to_string(),
            file_ttl: Duration::from_secs(3600),
            reaper_interval: Duration::from_secs(600),
            reaper_grace: Duration::from_secs(30),
            cors_origins: vec![],
            max_upload_bytes: 1024,
        };
        assert_eq!(
            config.download_link("AB12CD"),
            "http://localhost:3000/download/AB12CD"
        );
    }
}
