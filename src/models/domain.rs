use serde::{Deserialize, Serialize};
use validator::Validate;

/// Number of weekday availability flags carried by every freelancer
pub const DAYS_PER_WEEK: usize = 7;

/// Freelancer with skills, experience and weekly availability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Freelancer {
    #[validate(range(min = 1))]
    pub id: u32,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: u32,
    #[serde(default)]
    pub availability: [bool; DAYS_PER_WEEK],
}

impl Freelancer {
    /// Exact, case-sensitive skill lookup
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }
}

/// Project with required skills and an experience threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Project {
    #[validate(range(min = 1))]
    pub id: u32,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default, alias = "requiredSkills")]
    pub required_skills: Vec<String>,
    #[serde(default, alias = "minExperience")]
    pub min_experience: u32,
    #[serde(default, alias = "deadlineDays")]
    pub deadline_days: u32,
}

/// Weighted edge between a freelancer and a project, only built for weight > 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityEdge {
    pub freelancer_id: u32,
    pub project_id: u32,
    pub weight: u8,
}

/// One pairing chosen by the assignment solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub freelancer_id: u32,
    pub project_id: u32,
    pub score: u8,
}

/// Scoring weights
///
/// The final score divides by the weight sum, so the default 70/30 split
/// keeps the score on the 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    pub skills: u32,
    pub experience: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 70,
            experience: 30,
        }
    }
}
