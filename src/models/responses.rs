use serde::{Deserialize, Serialize};
use crate::models::domain::{Freelancer, Project};

/// Full match report returned by the matches endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchesResponse {
    pub run_id: uuid::Uuid,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub total_freelancers: usize,
    pub total_projects: usize,
    pub matches: Vec<MatchEntry>,
    pub statistics: MatchStatistics,
}

/// One row of the report: a freelancer with its project, or an unmatched project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchEntry {
    pub freelancer: Option<Freelancer>,
    pub project: Option<Project>,
    pub score: u8,
}

/// Assigned / unassigned freelancer counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchStatistics {
    pub assigned_count: usize,
    pub assigned_percentage: f64,
    pub unassigned_count: usize,
    pub unassigned_percentage: f64,
}

/// Skill existence response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillExistsResponse {
    pub skill: String,
    pub possibly_exists: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
