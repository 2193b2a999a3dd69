pub mod assignment;
pub mod config;
pub mod db;
pub mod logging;
pub mod matching;

use serde::{Deserialize, Serialize};

use matching::quality::{QualityError, SkillComponent, SkillValue};

/// Number of proficiency dimensions: products, objection handling, sales.
pub const SKILL_DIMENSIONS: usize = 3;

/// Already-coerced proficiency values in dimension order.
///
/// Shorter vectors stay short (no zero padding); longer vectors keep their
/// extra components, which scoring ignores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillVector(pub Vec<f64>);

impl SkillVector {
    pub fn new(products: f64, objections: f64, sales: f64) -> Self {
        Self(vec![products, objections, sales])
    }

    /// Coerce raw components (numbers or numeric strings) into a vector.
    pub fn try_from_components<T: SkillValue>(components: &[T]) -> Result<Self, QualityError> {
        components
            .iter()
            .enumerate()
            .map(|(index, component)| component.to_skill_f64(index))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f64>> for SkillVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl TryFrom<Vec<SkillComponent>> for SkillVector {
    type Error = QualityError;

    fn try_from(components: Vec<SkillComponent>) -> Result<Self, Self::Error> {
        Self::try_from_components(&components)
    }
}

/// What a lead needs per dimension. Same shape as [`SkillVector`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadRequirements(pub SkillVector);

impl LeadRequirements {
    pub fn new(products: f64, objections: f64, sales: f64) -> Self {
        Self(SkillVector::new(products, objections, sales))
    }

    pub fn as_slice(&self) -> &[f64] {
        self.0.as_slice()
    }
}

impl From<Vec<f64>> for LeadRequirements {
    fn from(values: Vec<f64>) -> Self {
        Self(SkillVector(values))
    }
}

/// An agent that may receive a lead, with workload counters taken at snapshot time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub skills: SkillVector,
    /// Leads ever assigned to this agent (`L`).
    #[serde(default)]
    pub total_leads: u32,
    /// Leads assigned to this agent that are still active (`A`).
    #[serde(default)]
    pub active_leads: u32,
}

impl Candidate {
    pub fn new(id: i64, skills: SkillVector, total_leads: u32, active_leads: u32) -> Self {
        Self {
            id,
            name: None,
            skills,
            total_leads,
            active_leads,
        }
    }
}

/// Agent row before eligibility filtering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub role_code: Option<String>,
    #[serde(default)]
    pub skills: SkillVector,
}

impl AgentRecord {
    pub fn into_candidate(self, total_leads: u32, active_leads: u32) -> Candidate {
        Candidate {
            id: self.id,
            name: self.name,
            skills: self.skills,
            total_leads,
            active_leads,
        }
    }
}

/// Directory entry searched by the fuzzy matcher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: i64,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub login: Option<String>,
}
