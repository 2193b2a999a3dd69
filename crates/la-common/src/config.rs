use std::path::Path;

use crate::matching::{
    eligibility::EligibilityPolicy, fuzzy::DEFAULT_MAX_DIST, weights::WeightTriple,
};

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Edit-distance tolerance for directory search.
    pub fuzzy_max_dist: usize,
    /// Weights used when the caller does not supply its own.
    pub default_weights: WeightTriple,
    /// Roles allowed to own a lead (`LA_EXECUTOR_ROLES`).
    pub executor_roles: EligibilityPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fuzzy_max_dist: DEFAULT_MAX_DIST,
            default_weights: WeightTriple::default(),
            executor_roles: EligibilityPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Read `LA_*` variables; anything missing or unparsable keeps its default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parse_f64 = |key: &str, fallback: f64| {
            lookup(key)
                .and_then(|s| s.trim().parse::<f64>().ok())
                .unwrap_or(fallback)
        };

        let fuzzy_max_dist = lookup("LA_FUZZY_MAX_DIST")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.fuzzy_max_dist);

        let default_weights = WeightTriple::new(
            parse_f64("LA_WEIGHT_TOTAL", defaults.default_weights.total_load),
            parse_f64("LA_WEIGHT_ACTIVE", defaults.default_weights.active_load),
            parse_f64("LA_WEIGHT_SKILL", defaults.default_weights.skill),
        );

        let executor_roles = lookup("LA_EXECUTOR_ROLES")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|roles| !roles.is_empty())
            .map(EligibilityPolicy::with_roles)
            .unwrap_or(defaults.executor_roles);

        Self {
            fuzzy_max_dist,
            default_weights,
            executor_roles,
        }
    }
}

/// Load `.env` from the working directory or a parent if present.
/// Returns false when none was found; variables already set win.
pub fn load_dotenv() -> bool {
    dotenvy::dotenv().is_ok()
}

/// Load a specific env file. Returns false when it is missing or unreadable.
pub fn load_dotenv_from(path: impl AsRef<Path>) -> bool {
    dotenvy::from_path(path.as_ref()).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = EngineConfig::from_lookup(|_| None);
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.fuzzy_max_dist, 2);
    }

    #[test]
    fn reads_overrides() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            ("LA_FUZZY_MAX_DIST", "3"),
            ("LA_WEIGHT_TOTAL", "0.5"),
            ("LA_WEIGHT_ACTIVE", "0.25"),
            ("LA_WEIGHT_SKILL", " 0.25 "),
            ("LA_EXECUTOR_ROLES", "agent, closer ,"),
        ]));

        assert_eq!(config.fuzzy_max_dist, 3);
        assert_eq!(config.default_weights, WeightTriple::new(0.5, 0.25, 0.25));
        assert_eq!(config.executor_roles.roles, vec!["agent", "closer"]);
    }

    #[test]
    fn garbage_values_fall_back() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            ("LA_FUZZY_MAX_DIST", "-1"),
            ("LA_WEIGHT_SKILL", "lots"),
            ("LA_EXECUTOR_ROLES", " , "),
        ]));

        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn missing_env_file_reports_false() {
        let path = std::env::temp_dir().join(format!("la-missing-{}.env", std::process::id()));
        assert!(!load_dotenv_from(&path));
    }

    #[test]
    fn env_file_feeds_engine_config() {
        let path = std::env::temp_dir().join(format!("la-config-{}.env", std::process::id()));
        std::fs::write(&path, "LA_TEST_DOTENV_MAX_DIST=4\n").unwrap();

        assert!(load_dotenv_from(&path));
        let config = EngineConfig::from_lookup(|key| match key {
            "LA_FUZZY_MAX_DIST" => std::env::var("LA_TEST_DOTENV_MAX_DIST").ok(),
            _ => None,
        });
        assert_eq!(config.fuzzy_max_dist, 4);

        std::fs::remove_file(&path).unwrap();
    }
}
