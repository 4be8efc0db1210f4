use analysis_core::{IndicatorSet, ScoreVector};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Caller context echoed into the prompt
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptMeta {
    pub term: String,
    pub penny_flag: bool,
    pub age: Option<String>,
    pub risk_profile: Option<String>,
}

const INSTRUCTIONS: &str = "You are an equity analyst.

Return your answer in **Markdown**, using ONLY these exact headers and structure (no extras):

## **[Verdict]**   <- e.g. **BUY**, **HOLD**, **STRONG SELL**, etc.

Start with a well-reasoned paragraph (2-3 lines max) explaining *why* this verdict was chosen, based on:

- Fundamental scores
- Market positioning
- Sentiment
- Financial growth or risks

Then, include a **technical breakdown** (2-4 lines max), explaining:

- RSI
- MACD
- Trend zone (SMA)
- Volume spike
- Bollinger bands

Describe whether each supports or weakens the recommendation.

---

Then include the following headers with similar structure:

## Strengths
- ...

## Weaknesses
- ...

## Fundamentals
- ...

Here is the stock data:
---
";

fn reading(value: Option<f64>) -> String {
    value.map(|v| format!("{:.4}", v)).unwrap_or_else(|| "n/a".to_string())
}

fn label<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "n/a".to_string())
}

fn technical_block(t: &IndicatorSet) -> String {
    let mut out = String::from("Technical Indicators:\n");
    // Writing into a String cannot fail.
    let _ = writeln!(out, "• Current Price: ${}", reading(t.current_price));
    let _ = writeln!(out, "• SMA 50: {} | SMA 200: {}", reading(t.sma_50), reading(t.sma_200));
    let _ = writeln!(out, "• Trend Zone: {}", t.trend_zone);
    let _ = writeln!(out, "• EMA Crossover: {}", label(t.ema_crossover));
    let _ = writeln!(out, "• ADX: {}", reading(t.adx));
    let _ = writeln!(out, "• RSI: {}", reading(t.rsi));
    let _ = writeln!(out, "• MACD: {} vs Signal: {}", reading(t.macd), reading(t.signal));
    let _ = writeln!(out, "• Stochastic RSI: {}", reading(t.stochastic_rsi));
    let _ = writeln!(
        out,
        "• Volatility Index: {} ({})",
        reading(t.volatility_index),
        label(t.squeeze_zone)
    );
    let _ = writeln!(out, "• Volume Today: {}", reading(t.volume_today));
    let _ = writeln!(out, "• Volume Spike: {}", t.volume_spike);
    let _ = writeln!(out, "• Last Candle: {}", label(t.last_candle));
    out
}

/// Assemble the analyst prompt: output instructions, scores at 2 decimals,
/// caller meta, industry context, peer comment and (optionally) the
/// technical indicator block.
pub fn build_prompt(
    ticker: &str,
    scores: &ScoreVector,
    context: &str,
    peer_comment: &str,
    meta: &PromptMeta,
    technicals: Option<&IndicatorSet>,
) -> String {
    let mut prompt = String::from(INSTRUCTIONS);

    let _ = write!(
        prompt,
        "\nStock: {ticker}\n\n\
         Scores:\n\
         • Fundamentals: {:.2}\n\
         • Technicals: {:.2}\n\
         • Insider Activity: {:.2}\n\
         • Sentiment: {:.2}\n\
         • Final Score: {:.2}\n\n\
         Meta:\n\
         • Term: {}\n\
         • Penny Stock: {}\n\
         • Age: {}\n\
         • Risk Profile: {}\n\n",
        scores.fund,
        scores.tech,
        scores.insider,
        scores.news,
        scores.final_score,
        meta.term,
        meta.penny_flag,
        meta.age.as_deref().unwrap_or("n/a"),
        meta.risk_profile.as_deref().unwrap_or("n/a"),
    );

    prompt.push_str(context);
    prompt.push('\n');
    if !peer_comment.is_empty() {
        prompt.push_str(peer_comment);
        prompt.push('\n');
    }

    if let Some(t) = technicals {
        prompt.push('\n');
        prompt.push_str(&technical_block(t));
    }

    prompt
}
