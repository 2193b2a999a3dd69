use tracing::debug;

use super::distance::levenshtein;
use crate::PersonRecord;

/// Default tolerance: catches one or two typos without matching unrelated names.
pub const DEFAULT_MAX_DIST: usize = 2;

/// Fuzzy predicate with the default tolerance.
pub fn fuzzy_match(full_name: Option<&str>, login: Option<&str>, query: &str) -> bool {
    fuzzy_match_with(full_name, login, query, DEFAULT_MAX_DIST)
}

/// True when the query is blank, or when either the name or the login is
/// within `max_dist` edits of the trimmed, lower-cased query.
pub fn fuzzy_match_with(
    full_name: Option<&str>,
    login: Option<&str>,
    query: &str,
    max_dist: usize,
) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();

    let name = full_name.unwrap_or_default().to_lowercase();
    let login = login.unwrap_or_default().to_lowercase();

    levenshtein(&name, &query).min(levenshtein(&login, &query)) <= max_dist
}

/// Directory search: records matching `query`, in input order.
pub fn search_directory<'a>(
    records: &'a [PersonRecord],
    query: &str,
    max_dist: usize,
) -> Vec<&'a PersonRecord> {
    let hits: Vec<_> = records
        .iter()
        .filter(|record| {
            fuzzy_match_with(
                record.full_name.as_deref(),
                record.login.as_deref(),
                query,
                max_dist,
            )
        })
        .collect();

    debug!(
        total = records.len(),
        hits = hits.len(),
        max_dist,
        "directory_search"
    );
    hits
}
