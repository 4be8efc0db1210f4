use analysis_core::normalize::clamp_unit;
use analysis_core::ScoreVector;
use serde::{Deserialize, Serialize};

/// Investment horizon requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Term {
    Short,
    Long,
}

impl Term {
    /// Exactly "short" selects the short horizon; anything else is long.
    pub fn parse(term: &str) -> Self {
        if term == "short" {
            Term::Short
        } else {
            Term::Long
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Term::Short => "short",
            Term::Long => "long",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    PennyStock,
    ShortTerm,
    LongTerm,
}

/// Blending coefficients over the four sub-scores. Weights sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightProfile {
    pub kind: ProfileKind,
    pub news: f64,
    pub insider: f64,
    pub tech: f64,
    pub fund: f64,
}

pub const PENNY_STOCK_PROFILE: WeightProfile = WeightProfile {
    kind: ProfileKind::PennyStock,
    news: 0.45,
    insider: 0.125,
    tech: 0.325,
    fund: 0.10,
};

pub const SHORT_TERM_PROFILE: WeightProfile = WeightProfile {
    kind: ProfileKind::ShortTerm,
    news: 0.30,
    insider: 0.05,
    tech: 0.35,
    fund: 0.30,
};

pub const LONG_TERM_PROFILE: WeightProfile = WeightProfile {
    kind: ProfileKind::LongTerm,
    news: 0.15,
    insider: 0.02,
    tech: 0.38,
    fund: 0.45,
};

pub const ALL_PROFILES: [WeightProfile; 3] = [PENNY_STOCK_PROFILE, SHORT_TERM_PROFILE, LONG_TERM_PROFILE];

impl WeightProfile {
    /// Penny-stock flag wins over term.
    pub fn select(penny: bool, term: Term) -> &'static WeightProfile {
        if penny {
            &PENNY_STOCK_PROFILE
        } else if term == Term::Short {
            &SHORT_TERM_PROFILE
        } else {
            &LONG_TERM_PROFILE
        }
    }

    pub fn total(&self) -> f64 {
        self.news + self.insider + self.tech + self.fund
    }

    /// Weighted sum of the sub-scores, each clamped to [0, 1] first
    pub fn blend(&self, sub: &SubScores) -> f64 {
        self.news * clamp_unit(sub.news)
            + self.insider * clamp_unit(sub.insider)
            + self.tech * clamp_unit(sub.tech)
            + self.fund * clamp_unit(sub.fund)
    }
}

/// Per-domain scores before blending
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub fund: f64,
    pub tech: f64,
    pub insider: f64,
    pub news: f64,
}

/// Picks a weight profile and blends sub-scores into a `ScoreVector`
#[derive(Debug, Default, Clone, Copy)]
pub struct ScoreAggregator;

impl ScoreAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate(&self, sub: SubScores, penny: bool, term: Term) -> ScoreVector {
        let profile = WeightProfile::select(penny, term);
        // Weights sum to 1.0, so this only absorbs float rounding at the edges.
        let final_score = clamp_unit(profile.blend(&sub));

        tracing::debug!(
            "Blended scores with {:?} profile: fund={:.4} tech={:.4} insider={:.4} news={:.4} -> {:.4}",
            profile.kind,
            sub.fund,
            sub.tech,
            sub.insider,
            sub.news,
            final_score
        );

        ScoreVector {
            fund: clamp_unit(sub.fund),
            tech: clamp_unit(sub.tech),
            insider: clamp_unit(sub.insider),
            news: clamp_unit(sub.news),
            final_score,
        }
    }
}
