use serde::{Deserialize, Serialize};

use crate::AgentRecord;

/// Roles allowed to own a lead.
pub const DEFAULT_EXECUTOR_ROLES: [&str; 3] = ["agent", "manager", "admin"];

/// Which agents may enter a ranking pool. Applied before ranking; the ranker
/// itself never looks at roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityPolicy {
    pub roles: Vec<String>,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            roles: DEFAULT_EXECUTOR_ROLES.iter().map(|r| r.to_string()).collect(),
        }
    }
}

impl EligibilityPolicy {
    pub fn with_roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allows_role(&self, role_code: &str) -> bool {
        let role_code = normalize_role(role_code);
        self.roles.iter().any(|r| normalize_role(r) == role_code)
    }

    /// Role codes in the form the database filter compares against.
    pub fn normalized_roles(&self) -> Vec<String> {
        self.roles.iter().map(|r| normalize_role(r)).collect()
    }
}

/// Trimmed, Unicode lower-case role code. The SQL supplier applies the same
/// fold with `lower(btrim(..))`.
pub fn normalize_role(code: &str) -> String {
    code.trim().to_lowercase()
}

/// Active agent holding one of the policy's roles.
pub fn is_assignable(agent: &AgentRecord, policy: &EligibilityPolicy) -> bool {
    agent.is_active
        && agent
            .role_code
            .as_deref()
            .is_some_and(|role| policy.allows_role(role))
}

/// Keep assignable agents, preserving order.
pub fn filter_assignable<'a, I>(agents: I, policy: &EligibilityPolicy) -> Vec<&'a AgentRecord>
where
    I: IntoIterator<Item = &'a AgentRecord>,
{
    agents
        .into_iter()
        .filter(|agent| is_assignable(agent, policy))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(id: i64, active: bool, role: Option<&str>) -> AgentRecord {
        AgentRecord {
            id,
            is_active: active,
            role_code: role.map(str::to_string),
            ..AgentRecord::default()
        }
    }

    #[test]
    fn default_policy_accepts_executor_roles() {
        let policy = EligibilityPolicy::default();
        assert!(is_assignable(&agent(1, true, Some("agent")), &policy));
        assert!(is_assignable(&agent(2, true, Some("Manager")), &policy));
        assert!(is_assignable(&agent(3, true, Some(" admin ")), &policy));
    }

    #[test]
    fn rejects_inactive_and_non_executor_agents() {
        let policy = EligibilityPolicy::default();
        assert!(!is_assignable(&agent(1, false, Some("agent")), &policy));
        assert!(!is_assignable(&agent(2, true, Some("client")), &policy));
        assert!(!is_assignable(&agent(3, true, None), &policy));
    }

    #[test]
    fn custom_roles_replace_defaults() {
        let policy = EligibilityPolicy::with_roles(["closer"]);
        assert!(is_assignable(&agent(1, true, Some("closer")), &policy));
        assert!(!is_assignable(&agent(2, true, Some("agent")), &policy));
    }

    #[test]
    fn role_match_folds_non_ascii_case() {
        let policy = EligibilityPolicy::with_roles(["Менеджер"]);
        assert!(policy.allows_role(" МЕНЕДЖЕР "));
        assert!(policy.allows_role("менеджер"));
        assert_eq!(policy.normalized_roles(), vec!["менеджер"]);
    }

    #[test]
    fn filter_preserves_order() {
        let agents = vec![
            agent(3, true, Some("admin")),
            agent(1, false, Some("agent")),
            agent(2, true, Some("agent")),
            agent(4, true, Some("client")),
        ];

        let kept: Vec<_> = filter_assignable(&agents, &EligibilityPolicy::default())
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(kept, vec![3, 2]);
    }
}
