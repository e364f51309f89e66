// Criterion benchmarks for Gig Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gig_match::core::{
    calculate_compatibility, BipartiteGraph, CostMatrix, FilterParams, Matcher, MembershipFilter,
};
use gig_match::models::{Freelancer, Project, ScoringWeights};

const SKILLS: &[&str] = &[
    "rust", "go", "python", "sql", "java", "react", "docker", "kubernetes", "aws", "typescript",
    "spark", "terraform", "graphql", "swift", "kotlin",
];

fn create_freelancer(id: usize) -> Freelancer {
    Freelancer {
        id: id as u32 + 1,
        name: format!("Freelancer {}", id),
        skills: (0..3).map(|k| SKILLS[(id * 3 + k * 5) % SKILLS.len()].to_string()).collect(),
        experience: (id % 12) as u32,
        availability: [id % 2 == 0; 7],
    }
}

fn create_project(id: usize) -> Project {
    Project {
        id: 101 + id as u32,
        name: format!("Project {}", id),
        required_skills: (0..2).map(|k| SKILLS[(id * 7 + k * 4) % SKILLS.len()].to_string()).collect(),
        min_experience: (id % 8) as u32,
        deadline_days: 30,
    }
}

fn bench_compatibility(c: &mut Criterion) {
    let freelancer = create_freelancer(4);
    let project = create_project(9);
    let weights = ScoringWeights::default();

    c.bench_function("calculate_compatibility", |b| {
        b.iter(|| calculate_compatibility(black_box(&freelancer), black_box(&project), &weights));
    });
}

fn bench_graph_build(c: &mut Criterion) {
    let freelancers: Vec<Freelancer> = (0..100).map(create_freelancer).collect();
    let projects: Vec<Project> = (0..100).map(create_project).collect();
    let weights = ScoringWeights::default();

    c.bench_function("graph_build_100x100", |b| {
        b.iter(|| {
            BipartiteGraph::from_compatibility(black_box(&freelancers), black_box(&projects), &weights)
        });
    });
}

fn bench_solver(c: &mut Criterion) {
    let mut group = c.benchmark_group("assignment");

    for size in [10, 25, 50, 100].iter() {
        let freelancers: Vec<Freelancer> = (0..*size).map(create_freelancer).collect();
        let projects: Vec<Project> = (0..*size).map(create_project).collect();
        let graph = BipartiteGraph::from_compatibility(&freelancers, &projects, &ScoringWeights::default())
            .expect("graph");
        let matrix = CostMatrix::from_graph(&graph).expect("matrix");

        group.bench_with_input(BenchmarkId::new("solve", size), size, |b, _| {
            b.iter(|| black_box(&matrix).solve());
        });
    }

    group.finish();
}

fn bench_matching(c: &mut Criterion) {
    let matcher = Matcher::with_default_weights();
    let freelancers: Vec<Freelancer> = (0..100).map(create_freelancer).collect();
    let projects: Vec<Project> = (0..80).map(create_project).collect();

    c.bench_function("compute_assignments_100x80", |b| {
        b.iter(|| matcher.compute_assignments(black_box(&freelancers), black_box(&projects)));
    });
}

fn bench_membership(c: &mut Criterion) {
    let freelancers: Vec<Freelancer> = (0..100).map(create_freelancer).collect();
    let filter = MembershipFilter::from_freelancers(FilterParams::default(), &freelancers);

    c.bench_function("membership_build_100", |b| {
        b.iter(|| MembershipFilter::from_freelancers(FilterParams::default(), black_box(&freelancers)));
    });

    c.bench_function("membership_check", |b| {
        b.iter(|| filter.check(black_box("kubernetes")));
    });
}

criterion_group!(
    benches,
    bench_compatibility,
    bench_graph_build,
    bench_solver,
    bench_matching,
    bench_membership
);

criterion_main!(benches);
