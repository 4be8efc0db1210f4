use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{AnalysisError, Domain, FundamentalFacts, PeerCacheEntry};

/// A strategy that turns one domain's facts into a [0, 1] sub-score.
///
/// Several strategies may exist for the same domain; callers pick one.
pub trait DomainScorer: Send + Sync {
    type Input: ?Sized;

    fn domain(&self) -> Domain;

    /// Score in [0, 1]. Never fails; missing facts resolve to neutral values.
    fn score(&self, input: &Self::Input) -> f64;
}

/// External "find similar securities" service
#[async_trait]
pub trait PeerLookup: Send + Sync {
    async fn similar_tickers(&self, ticker: &str) -> Result<Vec<String>, AnalysisError>;
}

/// External fundamentals provider, used to price peers against the subject
#[async_trait]
pub trait FundamentalsLookup: Send + Sync {
    async fn fundamentals(&self, ticker: &str) -> Result<FundamentalFacts, AnalysisError>;
}

/// Backing storage for peer lookups. Expiry is judged by the caller from the
/// stored timestamp, so implementations only need to keep the latest write.
pub trait PeerStore: Send + Sync {
    fn get(&self, ticker: &str) -> Option<PeerCacheEntry>;

    fn put(&self, ticker: &str, peers: Vec<String>, timestamp: DateTime<Utc>);
}
