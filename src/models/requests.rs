use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{Freelancer, Project};

/// Request to compute assignments for an explicit set of records
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ComputeMatchesRequest {
    #[validate(nested)]
    #[serde(default)]
    pub freelancers: Vec<Freelancer>,
    #[validate(nested)]
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Query string carrying a single skill name
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SkillQuery {
    #[validate(length(max = 50))]
    #[serde(default)]
    pub skill: String,
}
