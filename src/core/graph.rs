use crate::core::error::MatchError;
use crate::core::scoring::{calculate_compatibility, MAX_SCORE};
use crate::models::{CompatibilityEdge, Freelancer, Project, ScoringWeights};

/// A node of the bipartite graph, addressed by its position in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    Freelancer(usize),
    Project(usize),
}

/// Adjacency entry stored once per edge endpoint
#[derive(Debug, Clone, Copy)]
struct HalfEdge {
    target: usize,
    weight: u8,
}

/// Collects edges before they are frozen into a [`BipartiteGraph`]
#[derive(Debug)]
pub struct GraphBuilder {
    num_freelancers: usize,
    num_projects: usize,
    edges: Vec<(usize, usize, u8)>,
}

impl GraphBuilder {
    pub fn new(num_freelancers: usize, num_projects: usize) -> Self {
        Self {
            num_freelancers,
            num_projects,
            edges: Vec::new(),
        }
    }

    /// Add an undirected edge between freelancer `f` and project `p`
    ///
    /// Zero-weight edges are dropped and `Ok(false)` is returned.
    pub fn add_edge(&mut self, f: usize, p: usize, weight: u8) -> Result<bool, MatchError> {
        if f >= self.num_freelancers {
            return Err(MatchError::NodeOutOfRange {
                kind: "freelancer",
                index: f,
                count: self.num_freelancers,
            });
        }
        if p >= self.num_projects {
            return Err(MatchError::NodeOutOfRange {
                kind: "project",
                index: p,
                count: self.num_projects,
            });
        }
        if weight > MAX_SCORE {
            return Err(MatchError::InvalidWeight(weight));
        }
        if weight == 0 {
            return Ok(false);
        }

        self.edges
            .try_reserve(1)
            .map_err(MatchError::allocation("graph edge list"))?;
        self.edges.push((f, p, weight));
        Ok(true)
    }

    /// Freeze the collected edges into compressed per-node adjacency ranges
    pub fn build(self) -> Result<BipartiteGraph, MatchError> {
        let num_nodes = self.num_freelancers + self.num_projects;

        let mut offsets = Vec::new();
        offsets
            .try_reserve_exact(num_nodes + 1)
            .map_err(MatchError::allocation("graph offsets"))?;
        offsets.resize(num_nodes + 1, 0usize);

        // Degree count, shifted by one so the prefix sum yields start offsets
        for &(f, p, _) in &self.edges {
            offsets[f + 1] += 1;
            offsets[self.num_freelancers + p + 1] += 1;
        }
        for i in 0..num_nodes {
            offsets[i + 1] += offsets[i];
        }

        let mut half_edges = Vec::new();
        half_edges
            .try_reserve_exact(self.edges.len() * 2)
            .map_err(MatchError::allocation("graph adjacency"))?;
        half_edges.resize(self.edges.len() * 2, HalfEdge { target: 0, weight: 0 });

        let mut cursor = offsets.clone();
        for &(f, p, weight) in &self.edges {
            let project_node = self.num_freelancers + p;

            half_edges[cursor[f]] = HalfEdge { target: project_node, weight };
            cursor[f] += 1;

            half_edges[cursor[project_node]] = HalfEdge { target: f, weight };
            cursor[project_node] += 1;
        }

        Ok(BipartiteGraph {
            num_freelancers: self.num_freelancers,
            num_projects: self.num_projects,
            offsets,
            half_edges,
        })
    }
}

/// Bipartite compatibility graph between freelancers and projects
///
/// Nodes are dense indices: freelancers occupy `0..F`, projects `F..F+P`.
/// Each node owns a contiguous range of the shared half-edge array, so
/// neighbor enumeration is a slice walk and the whole graph is dropped in
/// one go at the end of a request.
#[derive(Debug, Clone)]
pub struct BipartiteGraph {
    num_freelancers: usize,
    num_projects: usize,
    offsets: Vec<usize>,
    half_edges: Vec<HalfEdge>,
}

impl BipartiteGraph {
    pub fn builder(num_freelancers: usize, num_projects: usize) -> GraphBuilder {
        GraphBuilder::new(num_freelancers, num_projects)
    }

    /// Score every freelancer / project pair and keep the positive ones
    pub fn from_compatibility(
        freelancers: &[Freelancer],
        projects: &[Project],
        weights: &ScoringWeights,
    ) -> Result<Self, MatchError> {
        let mut builder = GraphBuilder::new(freelancers.len(), projects.len());

        for (i, freelancer) in freelancers.iter().enumerate() {
            for (j, project) in projects.iter().enumerate() {
                let score = calculate_compatibility(freelancer, project, weights);
                builder.add_edge(i, j, score)?;
            }
        }

        builder.build()
    }

    pub fn num_freelancers(&self) -> usize {
        self.num_freelancers
    }

    pub fn num_projects(&self) -> usize {
        self.num_projects
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.half_edges.len() / 2
    }

    /// Neighbors of `node` with the edge weight, in insertion order
    ///
    /// Nodes outside the graph have no neighbors.
    pub fn neighbors(&self, node: Node) -> impl Iterator<Item = (Node, u8)> + '_ {
        let range = self
            .dense_index(node)
            .map(|idx| self.offsets[idx]..self.offsets[idx + 1])
            .unwrap_or(0..0);

        self.half_edges[range]
            .iter()
            .map(move |edge| (self.node_at(edge.target), edge.weight))
    }

    pub fn degree(&self, node: Node) -> usize {
        self.dense_index(node)
            .map(|idx| self.offsets[idx + 1] - self.offsets[idx])
            .unwrap_or(0)
    }

    /// Weight of the edge between freelancer `f` and project `p`, if any
    pub fn weight(&self, f: usize, p: usize) -> Option<u8> {
        self.neighbors(Node::Freelancer(f))
            .find(|(node, _)| *node == Node::Project(p))
            .map(|(_, weight)| weight)
    }

    /// Edges translated back to record ids
    pub fn edges<'a>(
        &'a self,
        freelancers: &'a [Freelancer],
        projects: &'a [Project],
    ) -> impl Iterator<Item = CompatibilityEdge> + 'a {
        (0..self.num_freelancers.min(freelancers.len())).flat_map(move |f| {
            self.neighbors(Node::Freelancer(f))
                .filter_map(move |(node, weight)| match node {
                    Node::Project(p) => projects.get(p).map(|project| CompatibilityEdge {
                        freelancer_id: freelancers[f].id,
                        project_id: project.id,
                        weight,
                    }),
                    Node::Freelancer(_) => None,
                })
        })
    }

    #[inline]
    fn dense_index(&self, node: Node) -> Option<usize> {
        match node {
            Node::Freelancer(f) if f < self.num_freelancers => Some(f),
            Node::Project(p) if p < self.num_projects => Some(self.num_freelancers + p),
            _ => None,
        }
    }

    #[inline]
    fn node_at(&self, idx: usize) -> Node {
        if idx < self.num_freelancers {
            Node::Freelancer(idx)
        } else {
            Node::Project(idx - self.num_freelancers)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_visible_from_both_sides() {
        let mut builder = BipartiteGraph::builder(2, 2);
        builder.add_edge(0, 1, 80).unwrap();
        builder.add_edge(1, 1, 40).unwrap();
        let graph = builder.build().unwrap();

        assert_eq!(graph.edge_count(), 2);

        let from_freelancer: Vec<_> = graph.neighbors(Node::Freelancer(0)).collect();
        assert_eq!(from_freelancer, vec![(Node::Project(1), 80)]);

        let from_project: Vec<_> = graph.neighbors(Node::Project(1)).collect();
        assert_eq!(
            from_project,
            vec![(Node::Freelancer(0), 80), (Node::Freelancer(1), 40)]
        );

        assert_eq!(graph.degree(Node::Project(0)), 0);
    }

    #[test]
    fn test_zero_weight_not_materialized() {
        let mut builder = BipartiteGraph::builder(1, 1);
        assert!(!builder.add_edge(0, 0, 0).unwrap());
        let graph = builder.build().unwrap();

        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.neighbors(Node::Freelancer(0)).count(), 0);
        assert_eq!(graph.weight(0, 0), None);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut builder = BipartiteGraph::builder(1, 1);
        assert!(matches!(
            builder.add_edge(1, 0, 10),
            Err(MatchError::NodeOutOfRange { kind: "freelancer", .. })
        ));
        assert!(matches!(
            builder.add_edge(0, 3, 10),
            Err(MatchError::NodeOutOfRange { kind: "project", .. })
        ));
        assert!(matches!(builder.add_edge(0, 0, 101), Err(MatchError::InvalidWeight(101))));
    }

    #[test]
    fn test_empty_graph() {
        let graph = BipartiteGraph::builder(0, 0).build().unwrap();

        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.neighbors(Node::Freelancer(0)).count(), 0);
        assert_eq!(graph.neighbors(Node::Project(0)).count(), 0);
    }

    #[test]
    fn test_from_compatibility() {
        let freelancers = vec![
            Freelancer {
                id: 1,
                name: "Ada".to_string(),
                skills: vec!["rust".to_string()],
                experience: 5,
                availability: [false; 7],
            },
            Freelancer {
                id: 2,
                name: "Bob".to_string(),
                skills: vec!["cobol".to_string()],
                experience: 30,
                availability: [false; 7],
            },
        ];
        let projects = vec![Project {
            id: 101,
            name: "Engine".to_string(),
            required_skills: vec!["rust".to_string()],
            min_experience: 2,
            deadline_days: 10,
        }];

        let graph =
            BipartiteGraph::from_compatibility(&freelancers, &projects, &ScoringWeights::default())
                .unwrap();

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.weight(0, 0), Some(100));
        assert_eq!(graph.weight(1, 0), None);

        let edges: Vec<_> = graph.edges(&freelancers, &projects).collect();
        assert_eq!(
            edges,
            vec![CompatibilityEdge { freelancer_id: 1, project_id: 101, weight: 100 }]
        );
    }
}
