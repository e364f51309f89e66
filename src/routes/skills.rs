use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::models::{SkillExistsResponse, SkillQuery};
use crate::routes::error::ApiError;
use crate::routes::matches::{run_blocking, AppState};

/// Configure skill lookup routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/freelancers", web::get().to(find_by_skill))
        .route("/skills/exists", web::get().to(skill_exists));
}

fn validated_skill(query: web::Query<SkillQuery>) -> Result<String, ApiError> {
    if let Err(errors) = query.validate() {
        return Err(ApiError::Validation(errors.to_string()));
    }
    Ok(query.into_inner().skill)
}

/// Freelancers holding an exact skill
///
/// GET /api/v1/freelancers?skill=rust
///
/// An empty skill matches nobody.
async fn find_by_skill(
    state: web::Data<AppState>,
    query: web::Query<SkillQuery>,
) -> Result<HttpResponse, ApiError> {
    let skill = validated_skill(query)?;
    let dataset = state.dataset.clone();

    let found = run_blocking(move || {
        let freelancers = dataset.load_freelancers()?;
        Ok(freelancers
            .into_iter()
            .filter(|f| !skill.is_empty() && f.has_skill(&skill))
            .collect::<Vec<_>>())
    })
    .await?;

    tracing::debug!("Skill scan returned {} freelancers", found.len());
    Ok(HttpResponse::Ok().json(found))
}

/// Probabilistic skill check against the shared filter
///
/// GET /api/v1/skills/exists?skill=rust
///
/// `possibly_exists: false` is definitive. The filter is built from the
/// dataset on first use.
async fn skill_exists(
    state: web::Data<AppState>,
    query: web::Query<SkillQuery>,
) -> Result<HttpResponse, ApiError> {
    let skill = validated_skill(query)?;

    if skill.is_empty() {
        return Ok(HttpResponse::Ok().json(SkillExistsResponse {
            skill,
            possibly_exists: false,
        }));
    }

    let possibly_exists = match state.skills.filter().map(|filter| filter.check(&skill)) {
        Some(found) => found,
        None => {
            let state = state.into_inner();
            let lookup = skill.clone();
            run_blocking(move || {
                let filter = state.skills.build_with(|| state.dataset.load_freelancers())?;
                Ok(filter.check(&lookup))
            })
            .await?
        }
    };

    Ok(HttpResponse::Ok().json(SkillExistsResponse {
        skill,
        possibly_exists,
    }))
}
