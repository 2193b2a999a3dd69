pub mod candidates;
pub mod pool;
pub mod util;

pub use candidates::{
    CandidateFetchError, PgCandidateSource, RoleSchema, fetch_candidates,
    fetch_candidates_for_schema,
};
pub use pool::{DbPoolError, PgPool, PoolSettings, create_pool_from_url};
