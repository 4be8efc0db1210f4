use analysis_core::normalize::mean;
use analysis_core::{Bar, CandleType, EmaCrossover, SqueezeZone, TrendZone};

/// Simple Moving Average
pub fn sma(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let mut result = Vec::with_capacity(data.len() - period + 1);
    for i in period - 1..data.len() {
        let sum: f64 = data[i + 1 - period..=i].iter().sum();
        result.push(sum / period as f64);
    }
    result
}

/// Latest value of the trailing SMA, `None` with fewer than `period` points
pub fn last_sma(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 || data.len() < period {
        return None;
    }
    mean(&data[data.len() - period..])
}

/// Exponential Moving Average
///
/// Recursive smoothing with `alpha = 2 / (period + 1)`, seeded by the first
/// observation. One output per input.
pub fn ema(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.is_empty() {
        return vec![];
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut result = Vec::with_capacity(data.len());
    result.push(data[0]);

    for i in 1..data.len() {
        let ema_val = (data[i] - result[i - 1]) * multiplier + result[i - 1];
        result.push(ema_val);
    }

    result
}

/// RSI over one window of price changes. Zero average loss reads as 100.
fn rsi_from_changes(changes: &[f64]) -> f64 {
    let n = changes.len() as f64;
    let avg_gain = changes.iter().filter(|&&c| c > 0.0).sum::<f64>() / n;
    let avg_loss = changes.iter().filter(|&&c| c < 0.0).map(|c| -c).sum::<f64>() / n;

    if avg_loss == 0.0 {
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

fn changes(data: &[f64]) -> Vec<f64> {
    data.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Relative Strength Index as of the latest close
///
/// Uses simple averages of the last `period` changes. A series of exactly
/// `period` closes is scored over the `period - 1` changes it has.
pub fn rsi(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 || data.len() < period.max(2) {
        return None;
    }

    let start = data.len().saturating_sub(period + 1);
    Some(rsi_from_changes(&changes(&data[start..])))
}

/// Rolling RSI, one value per close from index `period` onward
pub fn rsi_series(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period + 1 {
        return vec![];
    }

    let deltas = changes(data);
    deltas.windows(period).map(rsi_from_changes).collect()
}

/// Stochastic RSI (0-100): where the latest RSI sits within its own
/// min/max over the last `period` RSI readings.
///
/// A flat RSI window reads as 50.
pub fn stochastic_rsi(data: &[f64], period: usize) -> Option<f64> {
    let series = rsi_series(data, period);
    if period == 0 || series.len() < period {
        return None;
    }

    let window = &series[series.len() - period..];
    let highest = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lowest = window.iter().copied().fold(f64::INFINITY, f64::min);
    let last = *window.last()?;

    if highest - lowest < f64::EPSILON {
        Some(50.0)
    } else {
        Some(100.0 * (last - lowest) / (highest - lowest))
    }
}

/// MACD (Moving Average Convergence Divergence)
pub struct MacdResult {
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn macd(data: &[f64], fast_period: usize, slow_period: usize, signal_period: usize) -> MacdResult {
    if fast_period == 0 || slow_period == 0 || signal_period == 0 || slow_period < fast_period {
        return MacdResult { macd_line: vec![], signal_line: vec![], histogram: vec![] };
    }

    let ema_fast = ema(data, fast_period);
    let ema_slow = ema(data, slow_period);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(ema_slow.iter())
        .map(|(fast, slow)| fast - slow)
        .collect();

    let signal_line = ema(&macd_line, signal_period);

    let histogram = macd_line
        .iter()
        .zip(signal_line.iter())
        .map(|(m, s)| m - s)
        .collect();

    MacdResult {
        macd_line,
        signal_line,
        histogram,
    }
}

/// Bollinger Bands
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn bollinger_bands(data: &[f64], period: usize, std_dev: f64) -> BollingerBands {
    if period == 0 || data.len() < period {
        return BollingerBands { upper: vec![], middle: vec![], lower: vec![] };
    }

    let middle = sma(data, period);
    let mut upper = Vec::with_capacity(middle.len());
    let mut lower = Vec::with_capacity(middle.len());

    for i in period - 1..data.len() {
        let slice = &data[i + 1 - period..=i];
        let mean = middle[i + 1 - period];
        let variance: f64 = slice.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period as f64;
        let std = variance.sqrt();

        upper.push(mean + std_dev * std);
        lower.push(mean - std_dev * std);
    }

    BollingerBands {
        upper,
        middle,
        lower,
    }
}

/// Band width `(upper - lower) / middle` for every full window
pub fn bollinger_width(data: &[f64], period: usize, std_dev: f64) -> Vec<f64> {
    let bb = bollinger_bands(data, period, std_dev);
    bb.upper
        .iter()
        .zip(bb.middle.iter())
        .zip(bb.lower.iter())
        .map(|((upper, middle), lower)| {
            if *middle != 0.0 {
                (upper - lower) / middle
            } else {
                0.0
            }
        })
        .collect()
}

/// Latest Bollinger width divided by the mean of the last `average_window`
/// widths. Below 1.0 means bands are tighter than usual.
///
/// `None` until `average_window` widths exist, or when every width in the
/// window is zero (a flat series has no volatility to compare against).
pub fn volatility_index(data: &[f64], bb_period: usize, average_window: usize) -> Option<f64> {
    let widths = bollinger_width(data, bb_period, 2.0);
    if average_window == 0 || widths.len() < average_window {
        return None;
    }

    let average = mean(&widths[widths.len() - average_window..])?;
    if average <= f64::EPSILON {
        return None;
    }

    widths.last().map(|w| w / average)
}

pub fn squeeze_zone(volatility_index: f64, threshold: f64) -> SqueezeZone {
    if volatility_index < threshold {
        SqueezeZone::Squeeze
    } else {
        SqueezeZone::Expansion
    }
}

/// Average Directional Index (ADX): trend strength on a 0-100 scale.
///
/// Wilder smoothing; the first ADX lands on bar `2 * period - 1`.
pub struct AdxResult {
    pub adx: Vec<f64>,
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
}

pub fn adx(bars: &[Bar], period: usize) -> AdxResult {
    if period == 0 || bars.len() < period * 2 {
        return AdxResult { adx: vec![], plus_di: vec![], minus_di: vec![] };
    }

    // +DM, -DM and TR
    let mut plus_dm = Vec::with_capacity(bars.len() - 1);
    let mut minus_dm = Vec::with_capacity(bars.len() - 1);
    let mut true_range = Vec::with_capacity(bars.len() - 1);

    for i in 1..bars.len() {
        let up_move = bars[i].high - bars[i - 1].high;
        let down_move = bars[i - 1].low - bars[i].low;

        plus_dm.push(if up_move > down_move && up_move > 0.0 { up_move } else { 0.0 });
        minus_dm.push(if down_move > up_move && down_move > 0.0 { down_move } else { 0.0 });

        let hl = bars[i].high - bars[i].low;
        let hc = (bars[i].high - bars[i - 1].close).abs();
        let lc = (bars[i].low - bars[i - 1].close).abs();
        true_range.push(hl.max(hc).max(lc));
    }

    // Wilder smoothing
    let mut smoothed_plus_dm = plus_dm[..period].iter().sum::<f64>();
    let mut smoothed_minus_dm = minus_dm[..period].iter().sum::<f64>();
    let mut smoothed_tr = true_range[..period].iter().sum::<f64>();

    let mut plus_di_values = Vec::new();
    let mut minus_di_values = Vec::new();
    let mut dx_values = Vec::new();

    // First DI/DX comes from the initial sums, then one per smoothed bar.
    for i in period - 1..plus_dm.len() {
        if i >= period {
            smoothed_plus_dm = smoothed_plus_dm - smoothed_plus_dm / period as f64 + plus_dm[i];
            smoothed_minus_dm = smoothed_minus_dm - smoothed_minus_dm / period as f64 + minus_dm[i];
            smoothed_tr = smoothed_tr - smoothed_tr / period as f64 + true_range[i];
        }

        let pdi = if smoothed_tr > 0.0 { 100.0 * smoothed_plus_dm / smoothed_tr } else { 0.0 };
        let mdi = if smoothed_tr > 0.0 { 100.0 * smoothed_minus_dm / smoothed_tr } else { 0.0 };

        plus_di_values.push(pdi);
        minus_di_values.push(mdi);

        let di_sum = pdi + mdi;
        let dx = if di_sum > 0.0 { 100.0 * (pdi - mdi).abs() / di_sum } else { 0.0 };
        dx_values.push(dx);
    }

    if dx_values.len() < period {
        return AdxResult { adx: vec![], plus_di: plus_di_values, minus_di: minus_di_values };
    }

    let mut adx_values = Vec::new();
    let mut adx_val = dx_values[..period].iter().sum::<f64>() / period as f64;
    adx_values.push(adx_val);

    for dx in &dx_values[period..] {
        adx_val = (adx_val * (period - 1) as f64 + dx) / period as f64;
        adx_values.push(adx_val);
    }

    AdxResult {
        adx: adx_values,
        plus_di: plus_di_values,
        minus_di: minus_di_values,
    }
}

/// Close vs SMA50/SMA200. Ties and missing averages fall through to Neutral.
pub fn trend_zone(close: f64, sma_50: Option<f64>, sma_200: Option<f64>) -> TrendZone {
    match (sma_50, sma_200) {
        (Some(s50), Some(s200)) if close > s50 && s50 > s200 => TrendZone::StrongBull,
        (Some(s50), Some(s200)) if close > s200 && close < s50 => TrendZone::BullWithPullback,
        (_, Some(s200)) if close < s200 => TrendZone::Bear,
        _ => TrendZone::Neutral,
    }
}

/// True when the latest volume is at least `factor` times the mean of the
/// last `window` volumes (the latest included). False without a full window.
pub fn volume_spike(volumes: &[f64], factor: f64, window: usize) -> bool {
    match (volumes.last(), last_sma(volumes, window)) {
        (Some(today), Some(average)) => *today >= factor * average,
        _ => false,
    }
}

pub fn candle_type(bar: &Bar) -> CandleType {
    if bar.close > bar.open {
        CandleType::Bullish
    } else {
        CandleType::Bearish
    }
}

/// Fast EMA above slow EMA at the latest close is bullish, anything else bearish
pub fn ema_crossover(data: &[f64], fast_period: usize, slow_period: usize) -> Option<EmaCrossover> {
    let fast = *ema(data, fast_period).last()?;
    let slow = *ema(data, slow_period).last()?;
    Some(if fast > slow { EmaCrossover::Bullish } else { EmaCrossover::Bearish })
}
