use analysis_core::AnalysisError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use technical_analysis::IndicatorParams;

use crate::logging::json_requested;
use crate::peer_cache::{PEER_CACHE_MAX_ENTRIES, PEER_CACHE_TTL_SECS};

/// Which news scorer feeds the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsScoring {
    /// Headline counts only
    Headline,
    /// Search interest blended with headline counts
    Blended,
}

impl FromStr for NewsScoring {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "headline" => Ok(NewsScoring::Headline),
            "blended" => Ok(NewsScoring::Blended),
            other => Err(AnalysisError::Config(format!("unknown news scoring '{}'", other))),
        }
    }
}

/// Which insider scorer feeds the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsiderScoring {
    /// Buys up, sells down, everything else ignored
    Activity,
    /// Everything that is not a sell counts as a buy
    Flow,
}

impl FromStr for InsiderScoring {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "activity" => Ok(InsiderScoring::Activity),
            "flow" => Ok(InsiderScoring::Flow),
            other => Err(AnalysisError::Config(format!("unknown insider scoring '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub peer_cache_ttl_secs: i64,      // 3600
    pub peer_cache_max_entries: usize, // 1024
    pub volume_spike_factor: f64,      // 2.0
    pub squeeze_threshold: f64,        // 0.75
    pub news_scoring: NewsScoring,
    pub insider_scoring: InsiderScoring,
    pub json_logging: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let params = IndicatorParams::default();
        Self {
            peer_cache_ttl_secs: PEER_CACHE_TTL_SECS,
            peer_cache_max_entries: PEER_CACHE_MAX_ENTRIES,
            volume_spike_factor: params.volume_spike_factor,
            squeeze_threshold: params.squeeze_threshold,
            news_scoring: NewsScoring::Headline,
            insider_scoring: InsiderScoring::Activity,
            json_logging: false,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().with_context(|| format!("invalid {}: '{}'", key, raw)),
        None => Ok(default),
    }
}

impl EngineConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            peer_cache_ttl_secs: parse_or(&lookup, "PEER_CACHE_TTL_SECS", defaults.peer_cache_ttl_secs)?,
            peer_cache_max_entries: parse_or(&lookup, "PEER_CACHE_MAX_ENTRIES", defaults.peer_cache_max_entries)?,
            volume_spike_factor: parse_or(&lookup, "VOLUME_SPIKE_FACTOR", defaults.volume_spike_factor)?,
            squeeze_threshold: parse_or(&lookup, "SQUEEZE_THRESHOLD", defaults.squeeze_threshold)?,
            news_scoring: parse_or(&lookup, "NEWS_SCORING", defaults.news_scoring)?,
            insider_scoring: parse_or(&lookup, "INSIDER_SCORING", defaults.insider_scoring)?,
            json_logging: json_requested(lookup("RUST_LOG_FORMAT").as_deref()),
        };

        config.validate().context("invalid engine configuration")?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.peer_cache_ttl_secs <= 0 {
            return Err(AnalysisError::Config("PEER_CACHE_TTL_SECS must be positive".to_string()));
        }
        if self.peer_cache_max_entries == 0 {
            return Err(AnalysisError::Config("PEER_CACHE_MAX_ENTRIES must be at least 1".to_string()));
        }
        if !self.volume_spike_factor.is_finite() || self.volume_spike_factor <= 0.0 {
            return Err(AnalysisError::Config("VOLUME_SPIKE_FACTOR must be a positive number".to_string()));
        }
        if !self.squeeze_threshold.is_finite() || self.squeeze_threshold <= 0.0 {
            return Err(AnalysisError::Config("SQUEEZE_THRESHOLD must be a positive number".to_string()));
        }
        Ok(())
    }

    pub fn peer_cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.peer_cache_ttl_secs)
    }

    /// Indicator parameters with the configurable thresholds applied
    pub fn indicator_params(&self) -> IndicatorParams {
        IndicatorParams {
            volume_spike_factor: self.volume_spike_factor,
            squeeze_threshold: self.squeeze_threshold,
            ..IndicatorParams::default()
        }
    }
}
