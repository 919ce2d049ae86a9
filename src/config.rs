use std::env;

use anyhow::{Context, Result};
use chrono_tz::Tz;

/// Tunables for the counter. Hosts either build this directly or let
/// `from_env` pick the values up from the environment.
#[derive(Debug, Clone)]
pub struct QuotaConfig {
    /// Zone used when neither the user nor the request carries one.
    pub default_timezone: Tz,
    /// Exclude future-dated hits (timestamp past the period end) from the
    /// authoritative count. Backdated hits before the period start are
    /// excluded either way.
    pub bound_future_hits: bool,
    /// Extra attempts for the cache-population write on the count miss path.
    /// Population is read-only with respect to ground truth, so retrying it
    /// is safe; hit recording is never retried here.
    pub cache_populate_retries: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            default_timezone: Tz::UTC,
            bound_future_hits: true,
            cache_populate_retries: 1,
        }
    }
}

impl QuotaConfig {
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();

        if let Ok(zone) = env::var("QUOTA_DEFAULT_TIMEZONE") {
            cfg.default_timezone = zone
                .parse()
                .ok()
                .with_context(|| format!("QUOTA_DEFAULT_TIMEZONE is not a known zone: {zone}"))?;
        }
        if let Ok(flag) = env::var("QUOTA_BOUND_FUTURE_HITS") {
            cfg.bound_future_hits = parse_bool(&flag)
                .with_context(|| format!("QUOTA_BOUND_FUTURE_HITS is invalid: {flag}"))?;
        }
        if let Ok(retries) = env::var("QUOTA_CACHE_POPULATE_RETRIES") {
            cfg.cache_populate_retries = retries
                .parse()
                .context("QUOTA_CACHE_POPULATE_RETRIES must be a non-negative integer")?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache_populate_retries > 10 {
            anyhow::bail!("QUOTA_CACHE_POPULATE_RETRIES must be 10 or fewer");
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        _ => anyhow::bail!("invalid boolean value {value}"),
    }
}
