// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Freelancer, Project, CompatibilityEdge, Assignment, ScoringWeights, DAYS_PER_WEEK};
pub use requests::{ComputeMatchesRequest, SkillQuery};
pub use responses::{MatchesResponse, MatchEntry, MatchStatistics, SkillExistsResponse, HealthResponse, ErrorResponse};
