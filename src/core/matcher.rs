use crate::core::{
    assignment::CostMatrix,
    error::MatchError,
    graph::{BipartiteGraph, Node},
    scoring::score_breakdown,
};
use crate::models::{Assignment, Freelancer, Project, ScoringWeights};

/// Result of the matching process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub assignments: Vec<Assignment>,
    pub total_freelancers: usize,
    pub total_projects: usize,
    pub edge_count: usize,
}

impl MatchResult {
    pub fn total_score(&self) -> u32 {
        self.assignments.iter().map(|a| u32::from(a.score)).sum()
    }

    pub fn assignment_for_freelancer(&self, freelancer_id: u32) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.freelancer_id == freelancer_id)
    }

    pub fn assignment_for_project(&self, project_id: u32) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.project_id == project_id)
    }
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Score every freelancer / project pair
/// 2. Keep positive scores as edges of a bipartite graph
/// 3. Turn the graph into a padded cost matrix
/// 4. Solve the assignment problem exactly and map rows back to ids
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Compute the one-to-one assignment with the highest total score
    ///
    /// # Arguments
    /// * `freelancers` - The freelancer pool, never modified
    /// * `projects` - The project pool, never modified
    ///
    /// # Returns
    /// MatchResult with one assignment per matched freelancer, in input order.
    /// Empty inputs or pools without a single compatible pair give an empty
    /// assignment list.
    pub fn compute_assignments(
        &self,
        freelancers: &[Freelancer],
        projects: &[Project],
    ) -> Result<MatchResult, MatchError> {
        let graph = BipartiteGraph::from_compatibility(freelancers, projects, &self.weights)?;

        let isolated = (0..graph.num_freelancers())
            .filter(|&f| graph.degree(Node::Freelancer(f)) == 0)
            .count();
        tracing::debug!(
            "Compatibility graph: {} freelancers ({} without any compatible project), {} projects, {} edges",
            freelancers.len(),
            isolated,
            projects.len(),
            graph.edge_count()
        );
        if tracing::enabled!(tracing::Level::TRACE) {
            for edge in graph.edges(freelancers, projects) {
                tracing::trace!(
                    "Edge freelancer {} -> project {}: {}",
                    edge.freelancer_id,
                    edge.project_id,
                    edge.weight
                );
            }
        }

        let mut assignments = Vec::new();
        if graph.edge_count() > 0 {
            let matrix = CostMatrix::from_graph(&graph)?;
            for (row, col) in matrix.solve()? {
                // Solved pairs are always real edges
                let Some(score) = graph.weight(row, col) else {
                    continue;
                };
                let (freelancer, project) = (&freelancers[row], &projects[col]);

                let breakdown = score_breakdown(freelancer, project, &self.weights);
                tracing::debug!(
                    "Assigned freelancer {} to project {}: score {} ({} skills matched, skill {}%, experience {}%)",
                    freelancer.id,
                    project.id,
                    score,
                    breakdown.matched_skills,
                    breakdown.skill_percentage,
                    breakdown.experience_percentage
                );

                assignments.push(Assignment {
                    freelancer_id: freelancer.id,
                    project_id: project.id,
                    score,
                });
            }
        }

        Ok(MatchResult {
            assignments,
            total_freelancers: freelancers.len(),
            total_projects: projects.len(),
            edge_count: graph.edge_count(),
        })
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn create_freelancer(id: u32, skills: &[&str], experience: u32) -> Freelancer {
        Freelancer {
            id,
            name: format!("Freelancer {}", id),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            experience,
            availability: [false; 7],
        }
    }

    fn create_project(id: u32, required: &[&str], min_experience: u32) -> Project {
        Project {
            id,
            name: format!("Project {}", id),
            required_skills: required.iter().map(|s| s.to_string()).collect(),
            min_experience,
            deadline_days: 14,
        }
    }

    #[test]
    fn test_compute_assignments_basic() {
        let matcher = Matcher::with_default_weights();
        let freelancers = vec![
            create_freelancer(1, &["python", "sql"], 5),
            create_freelancer(2, &["java"], 1),
        ];
        let projects = vec![
            create_project(101, &["python"], 3),
            create_project(102, &["python", "sql"], 5),
        ];

        let result = matcher.compute_assignments(&freelancers, &projects).unwrap();

        // Freelancer 2 shares no skill with any project
        assert_eq!(result.assignments.len(), 1);
        assert_eq!(result.assignments[0].freelancer_id, 1);
        assert_eq!(result.assignments[0].score, 100);
        assert!(result.assignment_for_freelancer(2).is_none());
    }

    #[test]
    fn test_three_freelancers_two_projects() {
        let matcher = Matcher::with_default_weights();
        let freelancers = vec![
            create_freelancer(1, &["rust", "go"], 2),
            create_freelancer(2, &["rust"], 10),
            create_freelancer(3, &["go", "sql"], 4),
        ];
        let projects = vec![
            create_project(101, &["rust", "go"], 4),
            create_project(102, &["go", "sql"], 4),
        ];

        let result = matcher.compute_assignments(&freelancers, &projects).unwrap();

        assert_eq!(result.assignments.len(), 2);
        let used: HashSet<u32> = result.assignments.iter().map(|a| a.project_id).collect();
        assert_eq!(used.len(), 2);

        // F1 -> P101 (85) + F3 -> P102 (100) = 185 is the best pairing
        assert_eq!(result.total_score(), 185);
    }

    #[test]
    fn test_assigned_score_matches_breakdown() {
        let matcher = Matcher::with_default_weights();
        let freelancers = vec![create_freelancer(1, &["rust"], 2)];
        let projects = vec![create_project(101, &["rust", "go", "sql"], 3)];

        let result = matcher.compute_assignments(&freelancers, &projects).unwrap();

        let expected = score_breakdown(&freelancers[0], &projects[0], matcher.weights());
        assert_eq!(result.assignments.len(), 1);
        assert_eq!(result.assignments[0].score, expected.score);
        assert_eq!(result.assignments[0].score, 42);
    }

    #[test]
    fn test_empty_freelancers() {
        let matcher = Matcher::with_default_weights();
        let projects = vec![create_project(101, &["rust"], 1)];

        let result = matcher.compute_assignments(&[], &projects).unwrap();

        assert!(result.assignments.is_empty());
        assert_eq!(result.total_projects, 1);
    }

    #[test]
    fn test_no_viable_edges() {
        let matcher = Matcher::with_default_weights();
        let freelancers = vec![create_freelancer(1, &["cobol"], 40)];
        let projects = vec![create_project(101, &["rust"], 1)];

        let result = matcher.compute_assignments(&freelancers, &projects).unwrap();

        assert!(result.assignments.is_empty());
        assert_eq!(result.edge_count, 0);
    }
}
