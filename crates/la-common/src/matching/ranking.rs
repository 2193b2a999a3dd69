use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::{quality::quality_vectors, weights::WeightTriple};
use crate::{Candidate, LeadRequirements};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankingError {
    #[error("no suitable candidate: candidate pool is empty")]
    NoCandidates,
}

/// Score components for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityBreakdown {
    pub candidate_id: i64,
    /// Position of the candidate in the input pool.
    pub input_index: usize,
    pub load_balance_total: f64,
    pub load_balance_active: f64,
    pub skill_quality: f64,
    pub score: f64,
}

/// Result of a ranking run: breakdowns ordered by descending score plus the
/// inputs that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Priorities {
    pub ranked: Vec<PriorityBreakdown>,
    pub best_id: i64,
    /// Weights after normalization.
    pub weights: WeightTriple,
    /// Largest `L` in the pool, floored to 1.
    pub l_max: u32,
    /// Largest `A` in the pool, floored to 1.
    pub a_max: u32,
}

impl Priorities {
    pub fn best(&self) -> Option<&PriorityBreakdown> {
        self.ranked.first()
    }

    /// Candidates from the same pool, in ranked order.
    pub fn ordered<'a>(&self, candidates: &'a [Candidate]) -> Vec<&'a Candidate> {
        self.ranked
            .iter()
            .filter_map(|entry| candidates.get(entry.input_index))
            .collect()
    }
}

fn sort_key(score: f64) -> f64 {
    if score.is_nan() {
        f64::NEG_INFINITY
    } else {
        score
    }
}

/// Rank a pool by `p1 * total-load balance + p2 * active-load balance + p3 * skill quality`.
///
/// The pool must already be restricted to assignable agents. Equal scores
/// keep input order, so the first-seen candidate wins a tie.
pub fn compute_priorities(
    candidates: &[Candidate],
    requirements: &LeadRequirements,
    weights: WeightTriple,
) -> Result<Priorities, RankingError> {
    if candidates.is_empty() {
        return Err(RankingError::NoCandidates);
    }

    let weights = weights.normalized();
    let l_max = candidates
        .iter()
        .map(|c| c.total_leads)
        .max()
        .unwrap_or(0)
        .max(1);
    let a_max = candidates
        .iter()
        .map(|c| c.active_leads)
        .max()
        .unwrap_or(0)
        .max(1);
    let (l_max_f, a_max_f) = (f64::from(l_max), f64::from(a_max));

    let mut ranked: Vec<PriorityBreakdown> = candidates
        .iter()
        .enumerate()
        .map(|(input_index, candidate)| {
            let load_balance_total = (l_max_f - f64::from(candidate.total_leads)) / l_max_f;
            let load_balance_active = (a_max_f - f64::from(candidate.active_leads)) / a_max_f;
            let skill_quality =
                quality_vectors(candidate.skills.as_slice(), requirements.as_slice());
            let score = load_balance_total * weights.total_load
                + load_balance_active * weights.active_load
                + skill_quality * weights.skill;

            PriorityBreakdown {
                candidate_id: candidate.id,
                input_index,
                load_balance_total,
                load_balance_active,
                skill_quality,
                score,
            }
        })
        .collect();

    // Strict `>` so the earliest candidate keeps a tie.
    let mut best = 0;
    for (idx, entry) in ranked.iter().enumerate().skip(1) {
        if sort_key(entry.score) > sort_key(ranked[best].score) {
            best = idx;
        }
    }
    let best_id = ranked[best].candidate_id;

    // sort_by is stable: ties stay in input order.
    ranked.sort_by(|a, b| {
        sort_key(b.score)
            .partial_cmp(&sort_key(a.score))
            .unwrap_or(Ordering::Equal)
    });

    debug!(
        pool = candidates.len(),
        best_id,
        best_score = ranked[0].score,
        l_max,
        a_max,
        "ranked assignment candidates"
    );

    Ok(Priorities {
        ranked,
        best_id,
        weights,
        l_max,
        a_max,
    })
}

/// Only the winner's id from [`compute_priorities`].
pub fn select_best(
    candidates: &[Candidate],
    requirements: &LeadRequirements,
    weights: WeightTriple,
) -> Result<i64, RankingError> {
    compute_priorities(candidates, requirements, weights).map(|p| p.best_id)
}
