use actix_web::{web, HttpResponse};
use std::collections::HashSet;
use std::sync::Arc;
use validator::Validate;

use crate::core::{MatchResult, Matcher, SkillRegistry};
use crate::models::{
    ComputeMatchesRequest, Freelancer, HealthResponse, MatchEntry, MatchStatistics, MatchesResponse,
    Project,
};
use crate::routes::error::ApiError;
use crate::services::CsvDataset;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<CsvDataset>,
    pub skills: Arc<SkillRegistry>,
    pub matcher: Matcher,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches", web::get().to(get_matches))
        .route("/matches/compute", web::post().to(compute_matches));
}

/// Run CPU-bound or file-bound work off the async workers
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Task(e.to_string()))?
}

/// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Match the configured CSV dataset
///
/// GET /api/v1/matches
///
/// Also builds the skill filter from the loaded freelancers if this is the
/// first request to touch it.
async fn get_matches(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let state = state.into_inner();

    let report = run_blocking(move || {
        let freelancers = state.dataset.load_freelancers()?;
        let projects = state.dataset.load_projects()?;

        state.skills.build(&freelancers);

        let result = state.matcher.compute_assignments(&freelancers, &projects)?;
        Ok(build_match_report(&freelancers, &projects, &result))
    })
    .await?;

    tracing::info!(
        "Match run {}: {} of {} freelancers assigned across {} projects",
        report.run_id,
        report.statistics.assigned_count,
        report.total_freelancers,
        report.total_projects
    );

    Ok(HttpResponse::Ok().json(report))
}

/// Match freelancers and projects supplied in the request body
///
/// POST /api/v1/matches/compute
///
/// Request body:
/// ```json
/// {
///   "freelancers": [{"id": 1, "name": "string", "skills": ["string"], "experience": 3}],
///   "projects": [{"id": 101, "name": "string", "required_skills": ["string"], "min_experience": 2, "deadline_days": 30}]
/// }
/// ```
async fn compute_matches(
    state: web::Data<AppState>,
    req: web::Json<ComputeMatchesRequest>,
) -> Result<HttpResponse, ApiError> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for compute request: {}", errors);
        return Err(ApiError::Validation(errors.to_string()));
    }

    let ComputeMatchesRequest { freelancers, projects } = req.into_inner();
    check_request_bounds(&state.dataset, &freelancers, &projects)?;

    let matcher = state.matcher.clone();
    let report = run_blocking(move || {
        let result = matcher.compute_assignments(&freelancers, &projects)?;
        Ok(build_match_report(&freelancers, &projects, &result))
    })
    .await?;

    tracing::info!(
        "Computed run {}: {} assignments for {} freelancers / {} projects",
        report.run_id,
        report.statistics.assigned_count,
        report.total_freelancers,
        report.total_projects
    );

    Ok(HttpResponse::Ok().json(report))
}

/// Same capacity bounds as CSV ingestion, plus unique ids on each side
fn check_request_bounds(
    dataset: &CsvDataset,
    freelancers: &[Freelancer],
    projects: &[Project],
) -> Result<(), ApiError> {
    let limits = dataset.limits();

    if freelancers.len() > limits.max_freelancers {
        return Err(ApiError::Validation(format!(
            "at most {} freelancers per request",
            limits.max_freelancers
        )));
    }
    if projects.len() > limits.max_projects {
        return Err(ApiError::Validation(format!(
            "at most {} projects per request",
            limits.max_projects
        )));
    }

    let too_many_skills = freelancers
        .iter()
        .map(|f| (f.id, f.skills.len()))
        .chain(projects.iter().map(|p| (p.id, p.required_skills.len())))
        .find(|(_, count)| *count > limits.max_skills);
    if let Some((id, count)) = too_many_skills {
        return Err(ApiError::Validation(format!(
            "record {} lists {} skills (limit {})",
            id, count, limits.max_skills
        )));
    }

    let mut seen = HashSet::new();
    if let Some(f) = freelancers.iter().find(|f| !seen.insert(f.id)) {
        return Err(ApiError::Validation(format!("duplicate freelancer id {}", f.id)));
    }
    seen.clear();
    if let Some(p) = projects.iter().find(|p| !seen.insert(p.id)) {
        return Err(ApiError::Validation(format!("duplicate project id {}", p.id)));
    }

    Ok(())
}

/// Shape a match result into the report returned to clients
///
/// One entry per freelancer in input order (project `None` when unassigned),
/// followed by one entry per project nobody was assigned to.
pub fn build_match_report(
    freelancers: &[Freelancer],
    projects: &[Project],
    result: &MatchResult,
) -> MatchesResponse {
    let mut matches = Vec::with_capacity(freelancers.len() + projects.len());
    let mut assigned_count = 0;

    for freelancer in freelancers {
        let assigned = result
            .assignment_for_freelancer(freelancer.id)
            .and_then(|a| {
                projects
                    .iter()
                    .find(|p| p.id == a.project_id)
                    .map(|p| (p.clone(), a.score))
            });

        let (project, score) = match assigned {
            Some((project, score)) => {
                assigned_count += 1;
                (Some(project), score)
            }
            None => (None, 0),
        };

        matches.push(MatchEntry {
            freelancer: Some(freelancer.clone()),
            project,
            score,
        });
    }

    for project in projects {
        if result.assignment_for_project(project.id).is_none() {
            matches.push(MatchEntry {
                freelancer: None,
                project: Some(project.clone()),
                score: 0,
            });
        }
    }

    let total = freelancers.len();
    let unassigned_count = total - assigned_count;

    MatchesResponse {
        run_id: uuid::Uuid::new_v4(),
        generated_at: chrono::Utc::now(),
        total_freelancers: total,
        total_projects: projects.len(),
        matches,
        statistics: MatchStatistics {
            assigned_count,
            assigned_percentage: percentage(assigned_count, total),
            unassigned_count,
            unassigned_percentage: percentage(unassigned_count, total),
        },
    }
}

#[inline]
fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    // One decimal place
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}
