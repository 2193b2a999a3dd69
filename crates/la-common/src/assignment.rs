#![allow(async_fn_in_trait)]

use std::convert::Infallible;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::matching::{
    eligibility::{EligibilityPolicy, is_assignable},
    ranking::{Priorities, RankingError, compute_priorities},
    weights::WeightTriple,
};
use crate::{AgentRecord, Candidate, LeadRequirements};

/// Supplies the pool for one assignment: eligible agents with `L`/`A` counted at call time.
///
/// Implementations must return a coherent snapshot; the ranker trusts it as-is.
pub trait CandidateSource {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn fetch_candidates(&self) -> Result<Vec<Candidate>, Self::Error>;
}

#[derive(Debug, Error)]
pub enum AssignmentError {
    #[error("failed to load candidates: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error(transparent)]
    Ranking(#[from] RankingError),
}

/// Outcome of an auto-assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub assignee_id: i64,
    pub priorities: Priorities,
    pub decided_at: DateTime<Utc>,
}

/// Agents plus their counters held in memory. Eligibility is applied on fetch.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCandidateSource {
    agents: Vec<(AgentRecord, u32, u32)>,
    policy: EligibilityPolicy,
}

impl InMemoryCandidateSource {
    pub fn new(policy: EligibilityPolicy) -> Self {
        Self {
            agents: Vec::new(),
            policy,
        }
    }

    pub fn with_agent(mut self, agent: AgentRecord, total_leads: u32, active_leads: u32) -> Self {
        self.agents.push((agent, total_leads, active_leads));
        self
    }

    pub fn push(&mut self, agent: AgentRecord, total_leads: u32, active_leads: u32) {
        self.agents.push((agent, total_leads, active_leads));
    }
}

impl CandidateSource for InMemoryCandidateSource {
    type Error = Infallible;

    async fn fetch_candidates(&self) -> Result<Vec<Candidate>, Self::Error> {
        Ok(self
            .agents
            .iter()
            .filter(|(agent, _, _)| is_assignable(agent, &self.policy))
            .map(|(agent, total, active)| agent.clone().into_candidate(*total, *active))
            .collect())
    }
}

/// Fetch one snapshot from `source`, rank it, and pick the assignee.
#[instrument(skip_all)]
pub async fn auto_assign<S>(
    source: &S,
    requirements: &LeadRequirements,
    weights: WeightTriple,
) -> Result<Assignment, AssignmentError>
where
    S: CandidateSource,
{
    let candidates = source
        .fetch_candidates()
        .await
        .map_err(|e| AssignmentError::Source(Box::new(e)))?;

    let priorities = compute_priorities(&candidates, requirements, weights)?;
    info!(
        assignee_id = priorities.best_id,
        pool = candidates.len(),
        "auto-assignment decided"
    );

    Ok(Assignment {
        assignee_id: priorities.best_id,
        priorities,
        decided_at: Utc::now(),
    })
}
