use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AnalysisError;
use crate::normalize::{round4, round4_opt};

/// OHLCV bar data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Daily price history for one ticker, oldest bar first.
///
/// Timestamps are strictly increasing. Missing sessions are allowed; they
/// simply shorten the lookback available to the indicators.
#[derive(Debug, Clone, Serialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, AnalysisError> {
        let symbol = symbol.into();
        if let Some(pos) = bars.windows(2).position(|w| w[1].timestamp <= w[0].timestamp) {
            return Err(AnalysisError::InvalidData(format!(
                "{}: bar {} at {} is not after {}",
                symbol,
                pos + 1,
                bars[pos + 1].timestamp,
                bars[pos].timestamp
            )));
        }
        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}

/// Position of the latest close relative to SMA50 and SMA200
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendZone {
    #[serde(rename = "Strong Bull")]
    StrongBull,
    #[serde(rename = "Bull with Pullback")]
    BullWithPullback,
    #[serde(rename = "Bear")]
    Bear,
    #[serde(rename = "Neutral")]
    Neutral,
}

impl TrendZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendZone::StrongBull => "Strong Bull",
            TrendZone::BullWithPullback => "Bull with Pullback",
            TrendZone::Bear => "Bear",
            TrendZone::Neutral => "Neutral",
        }
    }
}

/// Bollinger width relative to its own trailing average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SqueezeZone {
    Squeeze,
    Expansion,
}

impl SqueezeZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            SqueezeZone::Squeeze => "Squeeze",
            SqueezeZone::Expansion => "Expansion",
        }
    }
}

/// EMA12 vs EMA26 at the latest bar. There is no neutral state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmaCrossover {
    #[serde(rename = "Bullish Crossover")]
    Bullish,
    #[serde(rename = "Bearish Crossover")]
    Bearish,
}

impl EmaCrossover {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmaCrossover::Bullish => "Bullish Crossover",
            EmaCrossover::Bearish => "Bearish Crossover",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandleType {
    Bullish,
    Bearish,
}

impl CandleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandleType::Bullish => "Bullish",
            CandleType::Bearish => "Bearish",
        }
    }
}

macro_rules! display_via_as_str {
    ($($t:ty),*) => {
        $(impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_via_as_str!(TrendZone, SqueezeZone, EmaCrossover, CandleType);

/// Point-in-time technical readings as of the latest close.
///
/// Numeric readings are `None` when the series is shorter than the
/// indicator's lookback. Labels that depend on a missing reading are `None`
/// as well, except `trend_zone`, which falls through to `Neutral`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub current_price: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub signal: Option<f64>,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub trend_zone: TrendZone,
    pub ema_crossover: Option<EmaCrossover>,
    pub stochastic_rsi: Option<f64>,
    pub adx: Option<f64>,
    pub volatility_index: Option<f64>,
    pub squeeze_zone: Option<SqueezeZone>,
    pub volume_today: Option<f64>,
    pub avg_volume_20: Option<f64>,
    pub volume_spike: bool,
    pub last_candle: Option<CandleType>,
}

impl IndicatorSet {
    /// No readings at all, as for a series without bars.
    pub fn empty() -> Self {
        Self {
            current_price: None,
            rsi: None,
            macd: None,
            signal: None,
            sma_50: None,
            sma_200: None,
            trend_zone: TrendZone::Neutral,
            ema_crossover: None,
            stochastic_rsi: None,
            adx: None,
            volatility_index: None,
            squeeze_zone: None,
            volume_today: None,
            avg_volume_20: None,
            volume_spike: false,
            last_candle: None,
        }
    }

    /// Copy with every reading rounded to 4 decimals for output.
    pub fn rounded(&self) -> Self {
        Self {
            current_price: round4_opt(self.current_price),
            rsi: round4_opt(self.rsi),
            macd: round4_opt(self.macd),
            signal: round4_opt(self.signal),
            sma_50: round4_opt(self.sma_50),
            sma_200: round4_opt(self.sma_200),
            stochastic_rsi: round4_opt(self.stochastic_rsi),
            adx: round4_opt(self.adx),
            volatility_index: round4_opt(self.volatility_index),
            volume_today: round4_opt(self.volume_today),
            avg_volume_20: round4_opt(self.avg_volume_20),
            ..self.clone()
        }
    }
}

/// Valuation and profitability facts from a fundamentals provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundamentalFacts {
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub pb: Option<f64>,
    pub peg: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub market_cap: Option<f64>,
    pub free_cash_flow: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub earnings_growth: Option<f64>,
    pub revenue_growth: Option<f64>,
}

/// One insider transaction as reported by the regulatory-data provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsiderTrade {
    #[serde(default)]
    pub filing_date: Option<String>,
    #[serde(default)]
    pub trade_date: Option<String>,
    #[serde(default)]
    pub insider: Option<String>,
    #[serde(default)]
    pub trade_type: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub value: Option<f64>,
}

/// Headline sentiment tallies for the lookback window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsSentimentCounts {
    pub positive: u32,
    pub negative: u32,
    pub neutral: u32,
}

impl NewsSentimentCounts {
    /// Widened so provider-sized counts cannot overflow.
    pub fn total(&self) -> u64 {
        u64::from(self.positive) + u64::from(self.negative) + u64::from(self.neutral)
    }
}

/// Headline counts together with the search-interest trend score (0-1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentSnapshot {
    pub counts: NewsSentimentCounts,
    pub trend_score: f64,
}

/// Scoring domain a `DomainScorer` produces a sub-score for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Fundamental,
    Technical,
    Insider,
    News,
}

/// Sub-scores and the blended final score, all in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreVector {
    pub fund: f64,
    pub tech: f64,
    pub insider: f64,
    pub news: f64,
    #[serde(rename = "final")]
    pub final_score: f64,
}

impl ScoreVector {
    pub fn rounded(&self) -> Self {
        Self {
            fund: round4(self.fund),
            tech: round4(self.tech),
            insider: round4(self.insider),
            news: round4(self.news),
            final_score: round4(self.final_score),
        }
    }
}

/// Cached result of a similar-securities lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerCacheEntry {
    pub ticker: String,
    pub timestamp: DateTime<Utc>,
    pub peers: Vec<String>,
}

impl PeerCacheEntry {
    /// Entries live for `ttl` from insertion; reads do not extend them.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now - self.timestamp < ttl
    }
}
