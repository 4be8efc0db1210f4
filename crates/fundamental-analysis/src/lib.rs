use analysis_core::normalize::{
    DEBT_TO_EQUITY_RANGE, FREE_CASH_FLOW_RANGE, PB_RANGE, PE_RANGE, ROE_RANGE,
};
use analysis_core::{Domain, DomainScorer, FundamentalFacts};

pub mod valuation;
pub use valuation::{industry_context, PeerValuation};

/// Fundamental sub-score: equal-weight mean of five normalized metrics.
///
/// PE, PB, free cash flow and ROE are scored as-is over their fixed ranges;
/// debt/equity is inverted so lower leverage scores higher. Each missing
/// metric contributes a neutral 0.5.
#[derive(Debug, Default, Clone, Copy)]
pub struct FundamentalScorer;

impl FundamentalScorer {
    pub fn new() -> Self {
        Self
    }

    /// Per-metric normalized values, in scoring order
    pub fn components(&self, facts: &FundamentalFacts) -> [(&'static str, f64); 5] {
        [
            ("pe", PE_RANGE.normalize(facts.pe)),
            ("pb", PB_RANGE.normalize(facts.pb)),
            ("free_cash_flow", FREE_CASH_FLOW_RANGE.normalize(facts.free_cash_flow)),
            ("return_on_equity", ROE_RANGE.normalize(facts.return_on_equity)),
            ("debt_to_equity", 1.0 - DEBT_TO_EQUITY_RANGE.normalize(facts.debt_to_equity)),
        ]
    }
}

impl DomainScorer for FundamentalScorer {
    type Input = FundamentalFacts;

    fn domain(&self) -> Domain {
        Domain::Fundamental
    }

    fn score(&self, facts: &FundamentalFacts) -> f64 {
        let components = self.components(facts);
        components.iter().map(|(_, v)| v).sum::<f64>() / components.len() as f64
    }
}
