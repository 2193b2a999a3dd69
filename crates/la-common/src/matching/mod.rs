pub mod distance;
pub mod eligibility;
pub mod fuzzy;
pub mod quality;
pub mod ranking;
pub mod weights;

pub use distance::{levenshtein, levenshtein_opt};
pub use eligibility::{EligibilityPolicy, filter_assignable, is_assignable, normalize_role};
pub use fuzzy::{DEFAULT_MAX_DIST, fuzzy_match, fuzzy_match_with, search_directory};
pub use quality::{QualityError, SkillComponent, SkillValue, quality, quality_vectors};
pub use ranking::{Priorities, PriorityBreakdown, RankingError, compute_priorities, select_best};
pub use weights::WeightTriple;
