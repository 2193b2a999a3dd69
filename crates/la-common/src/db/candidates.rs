use deadpool_postgres::PoolError;
use tokio_postgres::Error as PgError;
use tracing::{debug, instrument, warn};

use super::util::TimedClientExt;
use crate::assignment::CandidateSource;
use crate::db::{DbPoolError, PgPool, PoolSettings};
use crate::matching::eligibility::EligibilityPolicy;
use crate::{Candidate, SkillVector};

#[derive(Debug, thiserror::Error)]
pub enum CandidateFetchError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("postgres error: {0}")]
    Postgres(#[from] PgError),
    #[error("failed to map candidate row: {0}")]
    Mapping(String),
}

/// How users are linked to roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleSchema {
    /// `users.role_id -> roles.id`.
    RoleColumn,
    /// `user_roles(user_id, role_id) -> roles.id`.
    RoleTable,
}

const HAS_ROLE_COLUMN_SQL: &str = "SELECT 1 FROM information_schema.columns \
    WHERE table_schema = current_schema() AND table_name = 'users' AND column_name = 'role_id'";

// One statement per schema so `L` and `A` come from the same snapshot. Rows are
// ordered by display name; the ranker keeps the first of equal scores.
const CANDIDATES_BY_ROLE_COLUMN_SQL: &str = "SELECT \
        u.id::bigint AS id,\
        COALESCE(u.full_name, u.login) AS name,\
        COALESCE(u.skill_products, 0)::float8 AS skill_products,\
        COALESCE(u.skill_objections, 0)::float8 AS skill_objections,\
        COALESCE(u.skill_sales, 0)::float8 AS skill_sales,\
        COUNT(l.id) AS total_leads,\
        COUNT(l.id) FILTER (WHERE l.is_active) AS active_leads \
    FROM users u \
    JOIN roles r ON r.id = u.role_id \
    LEFT JOIN leads l ON l.current_assignee_id = u.id \
    WHERE u.is_active AND lower(btrim(r.code)) = ANY($1) \
    GROUP BY u.id, u.full_name, u.login, u.skill_products, u.skill_objections, u.skill_sales \
    ORDER BY name, u.id";

// A user holding several executor roles must still count each lead once.
const CANDIDATES_BY_ROLE_TABLE_SQL: &str = "SELECT \
        u.id::bigint AS id,\
        COALESCE(u.full_name, u.login) AS name,\
        COALESCE(u.skill_products, 0)::float8 AS skill_products,\
        COALESCE(u.skill_objections, 0)::float8 AS skill_objections,\
        COALESCE(u.skill_sales, 0)::float8 AS skill_sales,\
        COUNT(l.id) AS total_leads,\
        COUNT(l.id) FILTER (WHERE l.is_active) AS active_leads \
    FROM users u \
    LEFT JOIN leads l ON l.current_assignee_id = u.id \
    WHERE u.is_active AND EXISTS (\
        SELECT 1 FROM user_roles ur JOIN roles r ON r.id = ur.role_id \
        WHERE ur.user_id = u.id AND lower(btrim(r.code)) = ANY($1)) \
    GROUP BY u.id, u.full_name, u.login, u.skill_products, u.skill_objections, u.skill_sales \
    ORDER BY name, u.id";

impl RoleSchema {
    fn candidates_sql(self) -> &'static str {
        match self {
            RoleSchema::RoleColumn => CANDIDATES_BY_ROLE_COLUMN_SQL,
            RoleSchema::RoleTable => CANDIDATES_BY_ROLE_TABLE_SQL,
        }
    }

    /// `RoleColumn` when `users.role_id` exists, otherwise `RoleTable`.
    /// A failed lookup also means `RoleTable`.
    pub async fn detect(pool: &PgPool) -> Result<Self, CandidateFetchError> {
        let client = pool.get().await?;
        match client
            .timed_query(HAS_ROLE_COLUMN_SQL, &[], "detect_role_schema")
            .await
        {
            Ok(rows) if !rows.is_empty() => Ok(RoleSchema::RoleColumn),
            Ok(_) => Ok(RoleSchema::RoleTable),
            Err(err) => {
                warn!(error = %err, "role schema lookup failed; assuming user_roles");
                Ok(RoleSchema::RoleTable)
            }
        }
    }
}

fn counter(value: i64, column: &str, id: i64) -> Result<u32, CandidateFetchError> {
    u32::try_from(value).map_err(|_| {
        CandidateFetchError::Mapping(format!("{column}={value} out of range for user {id}"))
    })
}

/// Build a candidate from the selected columns.
pub(crate) fn candidate_from_columns(
    id: i64,
    name: Option<String>,
    skills: [f64; 3],
    total_leads: i64,
    active_leads: i64,
) -> Result<Candidate, CandidateFetchError> {
    let total = counter(total_leads, "total_leads", id)?;
    let active = counter(active_leads, "active_leads", id)?;
    if active > total {
        return Err(CandidateFetchError::Mapping(format!(
            "active_leads={active} exceeds total_leads={total} for user {id}"
        )));
    }

    Ok(Candidate {
        id,
        name,
        skills: SkillVector(skills.to_vec()),
        total_leads: total,
        active_leads: active,
    })
}

/// Active users in the policy's roles, with lead counters computed now.
/// Detects the role schema first; see [`fetch_candidates_for_schema`].
pub async fn fetch_candidates(
    pool: &PgPool,
    policy: &EligibilityPolicy,
) -> Result<Vec<Candidate>, CandidateFetchError> {
    let schema = RoleSchema::detect(pool).await?;
    fetch_candidates_for_schema(pool, policy, schema).await
}

#[instrument(skip(pool, policy), fields(roles = policy.roles.len()))]
pub async fn fetch_candidates_for_schema(
    pool: &PgPool,
    policy: &EligibilityPolicy,
    schema: RoleSchema,
) -> Result<Vec<Candidate>, CandidateFetchError> {
    let client = pool.get().await?;
    let roles = policy.normalized_roles();

    let rows = client
        .timed_query(schema.candidates_sql(), &[&roles], "fetch_candidates")
        .await?;

    let candidates = rows
        .into_iter()
        .map(|row| {
            candidate_from_columns(
                row.try_get("id")?,
                row.try_get("name")?,
                [
                    row.try_get("skill_products")?,
                    row.try_get("skill_objections")?,
                    row.try_get("skill_sales")?,
                ],
                row.try_get("total_leads")?,
                row.try_get("active_leads")?,
            )
        })
        .collect::<Result<Vec<_>, CandidateFetchError>>()?;

    debug!(count = candidates.len(), ?schema, "fetched assignment candidates");
    Ok(candidates)
}

/// [`CandidateSource`] backed by Postgres.
#[derive(Clone)]
pub struct PgCandidateSource {
    pool: PgPool,
    policy: EligibilityPolicy,
    schema: Option<RoleSchema>,
}

impl PgCandidateSource {
    pub fn new(pool: PgPool, policy: EligibilityPolicy) -> Self {
        Self {
            pool,
            policy,
            schema: None,
        }
    }

    /// Build the pool from `settings` and wrap it.
    pub fn connect(
        settings: &PoolSettings,
        policy: EligibilityPolicy,
    ) -> Result<Self, DbPoolError> {
        Ok(Self::new(settings.build()?, policy))
    }

    /// Skip schema detection on every fetch.
    pub fn with_schema(mut self, schema: RoleSchema) -> Self {
        self.schema = Some(schema);
        self
    }
}

impl CandidateSource for PgCandidateSource {
    type Error = CandidateFetchError;

    async fn fetch_candidates(&self) -> Result<Vec<Candidate>, Self::Error> {
        match self.schema {
            Some(schema) => fetch_candidates_for_schema(&self.pool, &self.policy, schema).await,
            None => fetch_candidates(&self.pool, &self.policy).await,
        }
    }
}
