//! Acceptance gate.
//!
//! A ranked result list is accepted only if the best score clears an
//! absolute threshold AND the best is separated from the runner-up by at
//! least a minimum margin. The two checks are independent: a very high but
//! tightly clustered set of scores is rejected as ambiguous.

use catalog_types::GateSettings;
use tracing::debug;

use crate::search::SearchResult;

/// Outcome of gating one ranked result list.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// Confident match; results in rank order
    Accepted(Vec<SearchResult>),
    /// No trustworthy match
    Rejected,
}

impl GateDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, GateDecision::Accepted(_))
    }

    /// Top result of an accepted decision.
    pub fn best(&self) -> Option<&SearchResult> {
        match self {
            GateDecision::Accepted(results) => results.first(),
            GateDecision::Rejected => None,
        }
    }

    /// Accepted results, or an empty list when rejected.
    pub fn into_results(self) -> Vec<SearchResult> {
        match self {
            GateDecision::Accepted(results) => results,
            GateDecision::Rejected => Vec::new(),
        }
    }
}

/// Gate parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GatePolicy {
    /// Minimum best score
    pub accept_threshold: f32,
    /// Minimum `best - second` margin; 0 disables the margin rule
    pub min_gap_delta: f32,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self::from(&GateSettings::default())
    }
}

impl From<&GateSettings> for GatePolicy {
    fn from(settings: &GateSettings) -> Self {
        Self {
            accept_threshold: settings.accept_threshold,
            min_gap_delta: settings.min_gap_delta,
        }
    }
}

impl GatePolicy {
    pub fn new(accept_threshold: f32, min_gap_delta: f32) -> Self {
        Self {
            accept_threshold,
            min_gap_delta,
        }
    }

    pub fn decide(&self, results: Vec<SearchResult>) -> GateDecision {
        decide(results, self.accept_threshold, self.min_gap_delta)
    }
}

/// Accept `results` iff `best >= accept_threshold` and, when there is a
/// runner-up, `best - second >= min_gap_delta`.
pub fn decide(
    results: Vec<SearchResult>,
    accept_threshold: f32,
    min_gap_delta: f32,
) -> GateDecision {
    let Some(best) = results.first() else {
        return GateDecision::Rejected;
    };

    let gap = results.get(1).map(|second| best.score - second.score);
    let gap_ok = gap.map_or(true, |gap| gap >= min_gap_delta);
    let score_ok = best.score >= accept_threshold;

    if score_ok && gap_ok {
        GateDecision::Accepted(results)
    } else {
        debug!(
            best = best.score,
            ?gap,
            accept_threshold,
            min_gap_delta,
            "Gate rejected match"
        );
        GateDecision::Rejected
    }
}
