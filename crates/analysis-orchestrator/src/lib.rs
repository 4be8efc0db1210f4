use analysis_core::{
    DomainScorer, FundamentalFacts, FundamentalsLookup, IndicatorSet, InsiderTrade,
    NewsSentimentCounts, PeerLookup, PriceSeries, ScoreVector, SentimentSnapshot,
};
use fundamental_analysis::{industry_context, FundamentalScorer, PeerValuation};
use sentiment_analysis::{
    search_interest_score, BlendedSentimentScorer, InsiderActivityScorer, InsiderFlowScorer,
    NewsCountScorer,
};
use serde::Serialize;
use std::sync::Arc;
use technical_analysis::{TechnicalAnalysisEngine, TechnicalScorer};

pub mod aggregator;
pub mod config;
pub mod logging;
pub mod peer_cache;
pub mod prompt;

pub use aggregator::{ProfileKind, ScoreAggregator, SubScores, Term, WeightProfile};
pub use config::{EngineConfig, InsiderScoring, NewsScoring};
pub use logging::init_tracing;
pub use peer_cache::{InMemoryPeerStore, PeerCache, PEER_CACHE_TTL_SECS};
pub use prompt::{build_prompt, PromptMeta};

/// Everything known about one ticker for a single scoring run
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub series: PriceSeries,
    pub term: String,
    pub penny: bool,
    pub age: Option<String>,
    pub risk_profile: Option<String>,
    pub fundamentals: FundamentalFacts,
    pub insider_trades: Vec<InsiderTrade>,
    pub news: NewsSentimentCounts,
    /// Raw 0-100 search-interest readings, oldest first
    pub search_interest: Vec<f64>,
}

impl AnalysisRequest {
    pub fn new(series: PriceSeries) -> Self {
        Self {
            series,
            term: Term::Long.as_str().to_string(),
            penny: false,
            age: None,
            risk_profile: None,
            fundamentals: FundamentalFacts::default(),
            insider_trades: Vec::new(),
            news: NewsSentimentCounts::default(),
            search_interest: Vec::new(),
        }
    }
}

/// Output of a full analysis run, rounded to 4 decimals
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub ticker: String,
    pub profile: ProfileKind,
    pub indicators: IndicatorSet,
    pub scores: ScoreVector,
    pub peer_valuation: Option<PeerValuation>,
    pub peer_comment: String,
    pub prompt: String,
}

struct PeerSupport {
    cache: PeerCache,
    fundamentals: Arc<dyn FundamentalsLookup>,
}

pub struct AnalysisOrchestrator {
    config: EngineConfig,
    technical_analyzer: TechnicalAnalysisEngine,
    aggregator: ScoreAggregator,
    peers: Option<PeerSupport>,
}

impl AnalysisOrchestrator {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            technical_analyzer: TechnicalAnalysisEngine::with_params(config.indicator_params()),
            aggregator: ScoreAggregator::new(),
            peers: None,
            config,
        }
    }

    /// Enable peer valuation using a process-wide peer cache sized from config
    pub fn with_peer_lookup(
        self,
        lookup: Arc<dyn PeerLookup>,
        fundamentals: Arc<dyn FundamentalsLookup>,
    ) -> Self {
        let store = Arc::new(InMemoryPeerStore::new(
            self.config.peer_cache_ttl(),
            self.config.peer_cache_max_entries,
        ));
        let cache = PeerCache::with_store(lookup, store, self.config.peer_cache_ttl());
        self.with_peer_cache(cache, fundamentals)
    }

    pub fn with_peer_cache(mut self, cache: PeerCache, fundamentals: Arc<dyn FundamentalsLookup>) -> Self {
        self.peers = Some(PeerSupport { cache, fundamentals });
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn news_score(&self, request: &AnalysisRequest) -> f64 {
        match self.config.news_scoring {
            NewsScoring::Headline => NewsCountScorer.score(&request.news),
            NewsScoring::Blended => BlendedSentimentScorer.score(&SentimentSnapshot {
                counts: request.news,
                trend_score: search_interest_score(&request.search_interest),
            }),
        }
    }

    fn insider_score(&self, trades: &[InsiderTrade]) -> f64 {
        match self.config.insider_scoring {
            InsiderScoring::Activity => InsiderActivityScorer.score(trades),
            InsiderScoring::Flow => InsiderFlowScorer.score(trades),
        }
    }

    /// Indicators and unrounded scores. No I/O; never fails.
    pub fn score(&self, request: &AnalysisRequest) -> (IndicatorSet, ScoreVector) {
        let indicators = self.technical_analyzer.compute(&request.series);

        let sub = SubScores {
            fund: FundamentalScorer.score(&request.fundamentals),
            tech: TechnicalScorer.score(&indicators),
            insider: self.insider_score(&request.insider_trades),
            news: self.news_score(request),
        };

        let scores = self.aggregator.aggregate(sub, request.penny, Term::parse(&request.term));
        (indicators, scores)
    }

    async fn peer_valuation(&self, ticker: &str, subject_pe: Option<f64>) -> Option<PeerValuation> {
        let support = self.peers.as_ref()?;
        let peers = support.cache.get_peers(ticker).await;

        let mut peer_pes = Vec::with_capacity(peers.len());
        for peer in peers.into_iter().filter(|p| !p.eq_ignore_ascii_case(ticker)) {
            let pe = match support.fundamentals.fundamentals(&peer).await {
                Ok(facts) => facts.pe,
                Err(e) => {
                    tracing::warn!("Fundamentals lookup failed for peer {}: {}", peer, e);
                    None
                }
            };
            peer_pes.push((peer, pe));
        }

        Some(PeerValuation::from_peers(ticker, subject_pe, &peer_pes))
    }

    /// Full run: indicators, scores, optional peer valuation and the prompt.
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisReport {
        let ticker = request.series.symbol().to_uppercase();
        tracing::info!("Analyzing {} over {} bars", ticker, request.series.len());

        let (indicators, raw_scores) = self.score(request);
        let term = Term::parse(&request.term);

        let peer_valuation = self.peer_valuation(&ticker, request.fundamentals.pe).await;
        let peer_comment = peer_valuation
            .as_ref()
            .map(|v| v.comment(raw_scores.news))
            .unwrap_or_default();

        let indicators = indicators.rounded();
        let scores = raw_scores.rounded();

        let context = industry_context(
            request.fundamentals.sector.as_deref(),
            request.fundamentals.industry.as_deref(),
        );
        let meta = PromptMeta {
            term: term.as_str().to_string(),
            penny_flag: request.penny,
            age: request.age.clone(),
            risk_profile: request.risk_profile.clone(),
        };
        let prompt = build_prompt(&ticker, &scores, &context, &peer_comment, &meta, Some(&indicators));

        let profile = WeightProfile::select(request.penny, term).kind;
        tracing::info!(
            "Analysis complete for {}: final={:.4} profile={:?}",
            ticker,
            scores.final_score,
            profile
        );

        AnalysisReport {
            ticker,
            profile,
            indicators,
            scores,
            peer_valuation,
            peer_comment,
            prompt,
        }
    }
}
