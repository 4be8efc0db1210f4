use analysis_core::normalize::{clamp_unit, NEUTRAL_SCORE};
use analysis_core::{Domain, DomainScorer, IndicatorSet, PriceSeries};

use crate::indicators::*;

/// Lookbacks and thresholds used to build an `IndicatorSet`
#[derive(Debug, Clone)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub sma_short: usize,
    pub sma_long: usize,
    pub bollinger_period: usize,
    pub volatility_average_window: usize,
    pub squeeze_threshold: f64,
    pub adx_period: usize,
    pub volume_window: usize,
    pub volume_spike_factor: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            sma_short: 50,
            sma_long: 200,
            bollinger_period: 20,
            volatility_average_window: 100,
            squeeze_threshold: 0.75,
            adx_period: 14,
            volume_window: 20,
            volume_spike_factor: 2.0,
        }
    }
}

pub struct TechnicalAnalysisEngine {
    params: IndicatorParams,
}

impl TechnicalAnalysisEngine {
    pub fn new() -> Self {
        Self::with_params(IndicatorParams::default())
    }

    pub fn with_params(params: IndicatorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    /// Compute every reading as of the latest bar.
    ///
    /// Short series leave the affected readings as `None`; an empty series
    /// yields a set with no readings at all.
    pub fn compute(&self, series: &PriceSeries) -> IndicatorSet {
        let Some(last_bar) = series.last() else {
            tracing::debug!("No bars for {}; indicators left empty", series.symbol());
            return IndicatorSet::empty();
        };

        let p = &self.params;
        let closes = series.closes();
        let volumes = series.volumes();
        let current_price = last_bar.close;

        let macd_result = macd(&closes, p.macd_fast, p.macd_slow, p.macd_signal);
        let sma_50 = last_sma(&closes, p.sma_short);
        let sma_200 = last_sma(&closes, p.sma_long);

        let volatility_index = volatility_index(&closes, p.bollinger_period, p.volatility_average_window);
        let squeeze = volatility_index.map(|v| squeeze_zone(v, p.squeeze_threshold));

        let adx_value = adx(series.bars(), p.adx_period).adx.last().copied();

        let indicators = IndicatorSet {
            current_price: Some(current_price),
            rsi: rsi(&closes, p.rsi_period),
            macd: macd_result.macd_line.last().copied(),
            signal: macd_result.signal_line.last().copied(),
            sma_50,
            sma_200,
            trend_zone: trend_zone(current_price, sma_50, sma_200),
            ema_crossover: ema_crossover(&closes, p.macd_fast, p.macd_slow),
            stochastic_rsi: stochastic_rsi(&closes, p.rsi_period),
            adx: adx_value,
            volatility_index,
            squeeze_zone: squeeze,
            volume_today: Some(last_bar.volume),
            avg_volume_20: last_sma(&volumes, p.volume_window),
            volume_spike: volume_spike(&volumes, p.volume_spike_factor, p.volume_window),
            last_candle: Some(candle_type(last_bar)),
        };

        tracing::debug!(
            "Indicators for {} over {} bars: rsi={:?} trend={} spike={}",
            series.symbol(),
            series.len(),
            indicators.rsi,
            indicators.trend_zone,
            indicators.volume_spike
        );

        indicators
    }
}

impl Default for TechnicalAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Bonus added to the technical score on a volume spike
pub const VOLUME_SPIKE_BONUS: f64 = 0.1;

/// `1 - |RSI - 50| / 50`, peaking at neutral momentum, plus a bonus when
/// volume spikes. Capped at 1.0. Without an RSI reading the base is neutral.
pub fn technical_score(rsi: Option<f64>, volume_spike: bool) -> f64 {
    let base = match rsi {
        Some(r) if r.is_finite() => 1.0 - (r - 50.0).abs() / 50.0,
        _ => NEUTRAL_SCORE,
    };
    let bonus = if volume_spike { VOLUME_SPIKE_BONUS } else { 0.0 };
    clamp_unit(base + bonus)
}

/// Technical sub-score from RSI and the volume-spike flag
#[derive(Debug, Default, Clone, Copy)]
pub struct TechnicalScorer;

impl DomainScorer for TechnicalScorer {
    type Input = IndicatorSet;

    fn domain(&self) -> Domain {
        Domain::Technical
    }

    fn score(&self, input: &IndicatorSet) -> f64 {
        technical_score(input.rsi, input.volume_spike)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{Bar, CandleType, EmaCrossover, SqueezeZone, TrendZone};
    use approx::assert_abs_diff_eq;
    use chrono::{Duration, TimeZone, Utc};

    fn series_from(closes: &[f64], volumes: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 21, 0, 0).unwrap();
        let bars = closes
            .iter()
            .zip(volumes.iter())
            .enumerate()
            .map(|(i, (&close, &volume))| Bar {
                timestamp: start + Duration::days(i as i64),
                open: close - 0.5,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume,
            })
            .collect();
        PriceSeries::new("TEST", bars).unwrap()
    }

    /// One trading year of a gently rising, oscillating series
    fn trading_year() -> PriceSeries {
        let closes: Vec<f64> = (0..260)
            .map(|i| 100.0 + i as f64 * 0.2 + (i as f64 * 0.7).sin() * 3.0)
            .collect();
        let volumes = vec![1_000_000.0; 260];
        series_from(&closes, &volumes)
    }

    #[test]
    fn test_compute_full_year() {
        let engine = TechnicalAnalysisEngine::new();
        let ind = engine.compute(&trading_year());

        assert!(ind.rsi.is_some());
        assert!(ind.macd.is_some());
        assert!(ind.signal.is_some());
        assert!(ind.sma_50.is_some());
        assert!(ind.sma_200.is_some());
        assert!(ind.stochastic_rsi.is_some());
        assert!(ind.adx.is_some());
        assert!(ind.volatility_index.is_some());
        assert!(ind.squeeze_zone.is_some());
        assert!(ind.ema_crossover.is_some());
        assert_eq!(ind.last_candle, Some(CandleType::Bullish));
        assert!(!ind.volume_spike);

        let rsi = ind.rsi.unwrap();
        assert!((0.0..=100.0).contains(&rsi));
        let stoch = ind.stochastic_rsi.unwrap();
        assert!((0.0..=100.0).contains(&stoch));
    }

    #[test]
    fn test_short_series_leaves_long_lookbacks_empty() {
        let closes: Vec<f64> = (0..90).map(|i| 50.0 + (i % 7) as f64).collect();
        let volumes = vec![500.0; 90];
        let ind = TechnicalAnalysisEngine::new().compute(&series_from(&closes, &volumes));

        assert!(ind.sma_50.is_some());
        assert!(ind.sma_200.is_none());
        assert!(ind.volatility_index.is_none());
        assert!(ind.squeeze_zone.is_none());
        assert!(ind.rsi.is_some());
        assert_eq!(ind.trend_zone, TrendZone::Neutral);
    }

    #[test]
    fn test_empty_series_has_no_readings() {
        let series = PriceSeries::new("EMPTY", vec![]).unwrap();
        let ind = TechnicalAnalysisEngine::new().compute(&series);

        assert_eq!(ind, IndicatorSet::empty());
        assert!(ind.current_price.is_none());
        assert!(ind.last_candle.is_none());
        assert!(ind.volume_today.is_none());
        assert_eq!(ind.trend_zone, TrendZone::Neutral);
        assert!(!ind.volume_spike);
        assert_abs_diff_eq!(TechnicalScorer.score(&ind), 0.5);
    }

    #[test]
    fn test_steady_uptrend_reads_strong_bull() {
        let closes: Vec<f64> = (0..250).map(|i| 10.0 + i as f64).collect();
        let volumes = vec![1_000.0; 250];
        let ind = TechnicalAnalysisEngine::new().compute(&series_from(&closes, &volumes));

        assert_eq!(ind.trend_zone, TrendZone::StrongBull);
        assert_eq!(ind.rsi, Some(100.0));
        assert_eq!(ind.ema_crossover, Some(EmaCrossover::Bullish));
    }

    #[test]
    fn test_volume_spike_on_last_bar() {
        let closes: Vec<f64> = (0..30).map(|i| 20.0 + (i % 3) as f64).collect();
        let mut volumes = vec![100.0; 30];
        volumes[29] = 1_000.0;
        let ind = TechnicalAnalysisEngine::new().compute(&series_from(&closes, &volumes));
        assert!(ind.volume_spike);
        assert_eq!(ind.volume_today, Some(1_000.0));
    }

    #[test]
    fn test_quiet_tail_reads_squeeze() {
        let mut closes: Vec<f64> = (0..180)
            .map(|i| 100.0 + if i % 2 == 0 { 6.0 } else { -6.0 })
            .collect();
        closes.extend((0..40).map(|i| 100.0 + if i % 2 == 0 { 0.2 } else { -0.2 }));
        let volumes = vec![1_000.0; closes.len()];
        let ind = TechnicalAnalysisEngine::new().compute(&series_from(&closes, &volumes));
        assert_eq!(ind.squeeze_zone, Some(SqueezeZone::Squeeze));
        assert!(ind.volatility_index.unwrap() < 0.75);
    }

    #[test]
    fn test_technical_score_peaks_at_neutral_rsi() {
        assert_abs_diff_eq!(technical_score(Some(50.0), false), 1.0);
        assert_abs_diff_eq!(technical_score(Some(75.0), false), 0.5);
        assert_abs_diff_eq!(technical_score(Some(100.0), false), 0.0);
        assert_abs_diff_eq!(technical_score(Some(0.0), false), 0.0);
        assert!(technical_score(Some(49.0), false) < 1.0);
        assert!(technical_score(Some(51.0), false) < 1.0);
    }

    #[test]
    fn test_technical_score_spike_bonus_is_capped() {
        assert_abs_diff_eq!(technical_score(Some(50.0), true), 1.0);
        assert_abs_diff_eq!(technical_score(Some(75.0), true), 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(technical_score(Some(100.0), true), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_technical_score_without_rsi_is_neutral() {
        assert_abs_diff_eq!(technical_score(None, false), 0.5);
        assert_abs_diff_eq!(technical_score(Some(f64::NAN), false), 0.5);
    }

    #[test]
    fn test_technical_scorer_reads_indicator_set() {
        let ind = TechnicalAnalysisEngine::new().compute(&trading_year());
        let score = TechnicalScorer.score(&ind);
        assert!((0.0..=1.0).contains(&score));
        assert_eq!(TechnicalScorer.domain(), Domain::Technical);
        assert_abs_diff_eq!(score, technical_score(ind.rsi, ind.volume_spike));
    }
}
