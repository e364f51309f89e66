// Core algorithm exports
pub mod assignment;
pub mod error;
pub mod graph;
pub mod matcher;
pub mod membership;
pub mod scoring;

pub use assignment::{CostMatrix, UNREACHABLE};
pub use error::MatchError;
pub use graph::{BipartiteGraph, GraphBuilder, Node};
pub use matcher::{Matcher, MatchResult};
pub use membership::{FilterParams, MembershipFilter, SkillRegistry};
pub use scoring::{calculate_compatibility, score_breakdown, ScoreBreakdown, MAX_SCORE};
