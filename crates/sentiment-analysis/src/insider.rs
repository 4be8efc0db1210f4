use analysis_core::normalize::{clamp_unit, NEUTRAL_SCORE};
use analysis_core::{Domain, DomainScorer, InsiderTrade};

/// Score change per insider trade
const TRADE_STEP: f64 = 0.1;

fn is_buy(trade: &InsiderTrade) -> bool {
    trade.trade_type.trim().eq_ignore_ascii_case("buy")
}

fn is_sell(trade: &InsiderTrade) -> bool {
    trade.trade_type.trim().eq_ignore_ascii_case("sell")
}

fn tally(trades: &[InsiderTrade], step: impl Fn(&InsiderTrade) -> f64) -> f64 {
    let score = trades.iter().fold(NEUTRAL_SCORE, |acc, t| acc + step(t));
    clamp_unit(score)
}

/// Starts at 0.5; each "buy" adds 0.1, each "sell" removes 0.1. Any other
/// trade type (grants, option exercises, gifts) leaves the score alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct InsiderActivityScorer;

impl DomainScorer for InsiderActivityScorer {
    type Input = [InsiderTrade];

    fn domain(&self) -> Domain {
        Domain::Insider
    }

    fn score(&self, trades: &[InsiderTrade]) -> f64 {
        tally(trades, |t| {
            if is_buy(t) {
                TRADE_STEP
            } else if is_sell(t) {
                -TRADE_STEP
            } else {
                0.0
            }
        })
    }
}

/// Net flow variant: every trade that is not a "sell" counts as a buy.
#[derive(Debug, Default, Clone, Copy)]
pub struct InsiderFlowScorer;

impl DomainScorer for InsiderFlowScorer {
    type Input = [InsiderTrade];

    fn domain(&self) -> Domain {
        Domain::Insider
    }

    fn score(&self, trades: &[InsiderTrade]) -> f64 {
        tally(trades, |t| if is_sell(t) { -TRADE_STEP } else { TRADE_STEP })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn trades(kinds: &[&str]) -> Vec<InsiderTrade> {
        kinds
            .iter()
            .map(|k| InsiderTrade {
                trade_type: k.to_string(),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_no_trades_is_neutral() {
        assert_abs_diff_eq!(InsiderActivityScorer.score(&[]), 0.5);
        assert_abs_diff_eq!(InsiderFlowScorer.score(&[]), 0.5);
    }

    #[test]
    fn test_buys_and_sells_move_score() {
        let score = InsiderActivityScorer.score(&trades(&["Buy", "buy", "SELL"]));
        assert_abs_diff_eq!(score, 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_unknown_types_are_ignored() {
        let score = InsiderActivityScorer.score(&trades(&["Grant", "Option Exercise", "buy"]));
        assert_abs_diff_eq!(score, 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_flow_variant_counts_non_sells_as_buys() {
        let score = InsiderFlowScorer.score(&trades(&["Grant", "Option Exercise", "sell"]));
        assert_abs_diff_eq!(score, 0.6, epsilon = 1e-12);
        assert_eq!(InsiderFlowScorer.domain(), Domain::Insider);
    }

    #[test]
    fn test_score_is_clamped() {
        let buys = trades(&["buy"; 12]);
        assert_abs_diff_eq!(InsiderActivityScorer.score(&buys), 1.0);

        let sells = trades(&["sell"; 9]);
        assert_abs_diff_eq!(InsiderActivityScorer.score(&sells), 0.0);
    }

    #[test]
    fn test_trades_deserialize_with_missing_fields() {
        let json = r#"[{"trade_type": "Buy", "insider": "Jane Doe"}, {"trade_type": "Sell"}]"#;
        let parsed: Vec<InsiderTrade> = serde_json::from_str(json).unwrap();
        assert_abs_diff_eq!(InsiderActivityScorer.score(&parsed), 0.5, epsilon = 1e-12);
    }
}
