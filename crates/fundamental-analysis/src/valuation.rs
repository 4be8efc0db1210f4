use serde::Serialize;

/// Peer PE within this distance of the subject counts as "in line"
const PE_IN_LINE_TOLERANCE: f64 = 3.0;
/// News scores below this are treated as negative sentiment
const NEGATIVE_NEWS_THRESHOLD: f64 = 0.4;

/// Subject PE compared against the average PE of similar securities
#[derive(Debug, Clone, Serialize)]
pub struct PeerValuation {
    pub ticker: String,
    pub subject_pe: Option<f64>,
    pub peer_pes: Vec<(String, f64)>,
    pub average_pe: Option<f64>,
}

impl PeerValuation {
    /// Build from peer PE readings. The subject itself, missing PEs and
    /// zero PEs are skipped.
    pub fn from_peers(ticker: &str, subject_pe: Option<f64>, peers: &[(String, Option<f64>)]) -> Self {
        let peer_pes: Vec<(String, f64)> = peers
            .iter()
            .filter(|(peer, _)| !peer.eq_ignore_ascii_case(ticker))
            .filter_map(|(peer, pe)| match pe {
                Some(v) if v.is_finite() && *v != 0.0 => Some((peer.clone(), *v)),
                _ => None,
            })
            .collect();

        let average_pe = if peer_pes.is_empty() {
            None
        } else {
            Some(peer_pes.iter().map(|(_, pe)| pe).sum::<f64>() / peer_pes.len() as f64)
        };

        Self {
            ticker: ticker.to_string(),
            subject_pe,
            peer_pes,
            average_pe,
        }
    }

    /// One-line comparison for the analysis prompt; empty without peer data.
    ///
    /// When the subject trades in line with peers but news sentiment is
    /// negative, a short-term caveat is appended.
    pub fn comment(&self, news_score: f64) -> String {
        let Some(average) = self.average_pe else {
            return String::new();
        };

        let subject = self
            .subject_pe
            .map(|pe| format!("{:.2}", pe))
            .unwrap_or_else(|| "n/a".to_string());

        let mut comment = format!(
            "{} has a PE of {}, compared to similar peers' average PE of {:.2}.",
            self.ticker, subject, average
        );

        let in_line = self
            .subject_pe
            .map(|pe| (pe - average).abs() < PE_IN_LINE_TOLERANCE)
            .unwrap_or(false);
        if in_line && news_score < NEGATIVE_NEWS_THRESHOLD {
            comment.push_str(
                " However, recent news sentiment is negative, which may impact short-term movement.",
            );
        }

        comment
    }
}

/// Valuation guidance that frames PE expectations by sector
pub fn industry_context(sector: Option<&str>, industry: Option<&str>) -> String {
    format!(
        "When analyzing valuation metrics like PE ratio, consider the industry context:\n\n\
         - For **tech, AI, or high-growth sectors**, a PE ratio around **25-35** is often acceptable.\n\
         - For **stable or low-growth sectors** like **healthcare, energy, or retail**, a PE above **25** can signal **overvaluation**.\n\
         - Always adjust valuation expectations based on the industry.\n\n\
         This stock's sector is: {}, industry: {}.\n",
        sector.unwrap_or("Unknown"),
        industry.unwrap_or("Unknown")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn peers(list: &[(&str, Option<f64>)]) -> Vec<(String, Option<f64>)> {
        list.iter().map(|(t, pe)| (t.to_string(), *pe)).collect()
    }

    #[test]
    fn test_average_skips_subject_and_missing() {
        let valuation = PeerValuation::from_peers(
            "AAPL",
            Some(30.0),
            &peers(&[("MSFT", Some(35.0)), ("aapl", Some(99.0)), ("GOOG", None), ("META", Some(25.0)), ("X", Some(0.0))]),
        );
        assert_eq!(valuation.peer_pes.len(), 2);
        assert_abs_diff_eq!(valuation.average_pe.unwrap(), 30.0);
    }

    #[test]
    fn test_no_peers_gives_empty_comment() {
        let valuation = PeerValuation::from_peers("AAPL", Some(30.0), &[]);
        assert!(valuation.average_pe.is_none());
        assert_eq!(valuation.comment(0.1), "");
    }

    #[test]
    fn test_comment_text() {
        let valuation = PeerValuation::from_peers("NVDA", Some(60.0), &peers(&[("AMD", Some(40.0))]));
        assert_eq!(
            valuation.comment(0.8),
            "NVDA has a PE of 60.00, compared to similar peers' average PE of 40.00."
        );
    }

    #[test]
    fn test_negative_news_caveat_when_in_line() {
        let valuation = PeerValuation::from_peers("KO", Some(24.0), &peers(&[("PEP", Some(25.5))]));
        assert!(valuation.comment(0.3).contains("news sentiment is negative"));
        assert!(!valuation.comment(0.5).contains("news sentiment is negative"));

        let far = PeerValuation::from_peers("KO", Some(40.0), &peers(&[("PEP", Some(25.5))]));
        assert!(!far.comment(0.1).contains("news sentiment is negative"));
    }

    #[test]
    fn test_industry_context_defaults() {
        let text = industry_context(None, None);
        assert!(text.contains("sector is: Unknown, industry: Unknown"));

        let text = industry_context(Some("Technology"), Some("Semiconductors"));
        assert!(text.contains("sector is: Technology, industry: Semiconductors"));
    }
}
