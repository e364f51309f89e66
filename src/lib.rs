//! Gig Match - freelancer to project matching service
//!
//! Scores every freelancer / project pair, keeps the compatible pairs as a
//! weighted bipartite graph and solves the assignment problem exactly so the
//! total compatibility of the chosen one-to-one pairing is maximal. A Bloom
//! filter over freelancer skills answers fast "is this skill present at all"
//! lookups.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{calculate_compatibility, BipartiteGraph, CostMatrix, MatchError, MatchResult, Matcher, MembershipFilter, SkillRegistry};
pub use models::{Assignment, Freelancer, Project, ScoringWeights};
pub use services::{CsvDataset, IngestError};
