//! Lead assignment scoring engine.
//!
//! Two independent pieces:
//! - fuzzy person search ([`fuzzy_match`], [`search_directory`]) built on
//!   [`levenshtein`];
//! - assignee ranking ([`compute_priorities`], [`select_best`]) combining
//!   workload balance with [`quality`] of the skill match.
//!
//! Everything here is pure and synchronous except [`auto_assign`], which pulls
//! one candidate snapshot from a [`CandidateSource`] before ranking.

pub use la_common::assignment::{
    Assignment, AssignmentError, CandidateSource, InMemoryCandidateSource, auto_assign,
};
pub use la_common::config::{EngineConfig, load_dotenv, load_dotenv_from};
pub use la_common::logging::{
    DEFAULT_DIRECTIVES, LogSettings, init_tracing_subscriber, init_with_settings,
    install_tracing_panic_hook,
};
pub use la_common::matching::{
    DEFAULT_MAX_DIST, EligibilityPolicy, Priorities, PriorityBreakdown, QualityError,
    RankingError, SkillComponent, SkillValue, WeightTriple, compute_priorities, filter_assignable,
    fuzzy_match, fuzzy_match_with, is_assignable, levenshtein, levenshtein_opt, normalize_role,
    quality, quality_vectors, search_directory, select_best,
};
pub use la_common::{
    AgentRecord, Candidate, LeadRequirements, PersonRecord, SKILL_DIMENSIONS, SkillVector,
};

pub mod db {
    pub use la_common::db::*;
}

/// Directory search using the configured tolerance.
pub fn search_with_config<'a>(
    config: &EngineConfig,
    records: &'a [PersonRecord],
    query: &str,
) -> Vec<&'a PersonRecord> {
    search_directory(records, query, config.fuzzy_max_dist)
}

/// Rank with the configured default weights.
pub fn rank_with_config(
    config: &EngineConfig,
    candidates: &[Candidate],
    requirements: &LeadRequirements,
) -> Result<Priorities, RankingError> {
    compute_priorities(candidates, requirements, config.default_weights)
}
